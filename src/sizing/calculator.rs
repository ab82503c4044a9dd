//! Risk-based contract sizing
//!
//! `contracts = floor((capital * max_loss_pct / 100) / (stop_points * multiplier))`

use super::{Instrument, SizingError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Inputs for one sizing calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizingInput {
    /// Account capital
    pub capital: Decimal,
    /// Stop-loss distance in points
    pub stop_points: Decimal,
    /// Profit target distance in points
    pub target_points: Decimal,
    /// Maximum loss per trade as a percentage of capital (2 = 2%)
    pub max_loss_pct: Decimal,
    /// Money value of one point per contract
    pub multiplier: Decimal,
}

impl SizingInput {
    /// Inputs using an instrument's point value
    pub fn for_instrument(
        capital: Decimal,
        stop_points: Decimal,
        target_points: Decimal,
        max_loss_pct: Decimal,
        instrument: Instrument,
    ) -> Self {
        Self {
            capital,
            stop_points,
            target_points,
            max_loss_pct,
            multiplier: instrument.multiplier(),
        }
    }

    fn validate(&self) -> Result<(), SizingError> {
        if self.capital <= Decimal::ZERO {
            return Err(SizingError::InvalidInput("capital must be positive"));
        }
        if self.stop_points <= Decimal::ZERO {
            return Err(SizingError::InvalidInput("stop points must be positive"));
        }
        if self.target_points < Decimal::ZERO {
            return Err(SizingError::InvalidInput("target points cannot be negative"));
        }
        if self.max_loss_pct <= Decimal::ZERO || self.max_loss_pct > Decimal::ONE_HUNDRED {
            return Err(SizingError::InvalidInput(
                "max loss percentage must be in (0, 100]",
            ));
        }
        if self.multiplier <= Decimal::ZERO {
            return Err(SizingError::InvalidInput("multiplier must be positive"));
        }
        Ok(())
    }
}

/// Sizing outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizingResult {
    /// Whole contracts that fit the risk budget (may be zero)
    pub contracts: u64,
    /// Risk budget in money
    pub max_loss_amount: Decimal,
    pub profit_per_contract: Decimal,
    pub loss_per_contract: Decimal,
    /// Profit if the target is hit with `contracts`
    pub total_profit: Decimal,
    /// `total_profit / max_loss_amount`
    pub payoff_ratio: Decimal,
}

/// Compute contract count and payoff for a trade
pub fn compute_sizing(input: &SizingInput) -> Result<SizingResult, SizingError> {
    input.validate()?;

    let max_loss_amount = input
        .capital
        .checked_mul(input.max_loss_pct)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .filter(|v| !v.is_zero())
        .ok_or(SizingError::InvalidInput("risk budget is out of range"))?;
    let loss_per_contract = input
        .stop_points
        .checked_mul(input.multiplier)
        .filter(|v| !v.is_zero())
        .ok_or(SizingError::InvalidInput("risk per contract is out of range"))?;
    let contracts = max_loss_amount
        .checked_div(loss_per_contract)
        .and_then(|v| v.floor().to_u64())
        .ok_or(SizingError::InvalidInput("contract count out of range"))?;
    let profit_per_contract = input
        .target_points
        .checked_mul(input.multiplier)
        .ok_or(SizingError::InvalidInput("profit per contract is out of range"))?;
    let total_profit = Decimal::from(contracts)
        .checked_mul(profit_per_contract)
        .ok_or(SizingError::InvalidInput("total profit is out of range"))?;
    let payoff_ratio = total_profit
        .checked_div(max_loss_amount)
        .ok_or(SizingError::InvalidInput("payoff ratio is out of range"))?;

    Ok(SizingResult {
        contracts,
        max_loss_amount,
        profit_per_contract,
        loss_per_contract,
        total_profit,
        payoff_ratio,
    })
}
