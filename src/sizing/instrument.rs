//! B3 futures instruments and their point values

use super::SizingError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Futures contract traded by the strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Instrument {
    /// Mini Ibovespa index
    Win,
    /// Mini US dollar
    Wdo,
    /// Full Ibovespa index
    Ind,
    /// Full US dollar
    Dol,
}

impl Instrument {
    pub const ALL: [Instrument; 4] = [
        Instrument::Win,
        Instrument::Wdo,
        Instrument::Ind,
        Instrument::Dol,
    ];

    /// Money value (BRL) of a one-point move for one contract
    pub fn multiplier(self) -> Decimal {
        match self {
            Instrument::Win => dec!(0.20),
            Instrument::Wdo => dec!(10),
            Instrument::Ind => dec!(1),
            Instrument::Dol => dec!(50),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Instrument::Win => "WIN",
            Instrument::Wdo => "WDO",
            Instrument::Ind => "IND",
            Instrument::Dol => "DOL",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Instrument {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_uppercase();
        Instrument::ALL
            .into_iter()
            .find(|i| i.symbol() == symbol)
            .ok_or_else(|| SizingError::UnknownInstrument(s.to_string()))
    }
}
