//! Size command implementation

use crate::sizing::{compute_sizing, Instrument, SizingInput};
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct SizeArgs {
    /// Account capital
    #[arg(long)]
    pub capital: Decimal,

    /// Stop-loss distance in points
    #[arg(long)]
    pub stop: Decimal,

    /// Profit target distance in points
    #[arg(long)]
    pub target: Decimal,

    /// Maximum loss per trade, percent of capital
    #[arg(long, default_value = "2")]
    pub risk_pct: Decimal,

    /// Futures contract: WIN, WDO, IND or DOL
    #[arg(long, default_value = "WIN")]
    pub instrument: Instrument,

    /// Point value overriding the instrument's
    #[arg(long)]
    pub multiplier: Option<Decimal>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl SizeArgs {
    pub fn input(&self) -> SizingInput {
        let mut input = SizingInput::for_instrument(
            self.capital,
            self.stop,
            self.target,
            self.risk_pct,
            self.instrument,
        );
        if let Some(multiplier) = self.multiplier {
            input.multiplier = multiplier;
        }
        input
    }

    pub fn execute(&self) -> anyhow::Result<()> {
        let result = compute_sizing(&self.input())?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        println!("Position size ({})", self.instrument);
        println!("  Contracts:           {}", result.contracts);
        println!("  Max loss:            {:.2}", result.max_loss_amount);
        println!("  Loss per contract:   {:.2}", result.loss_per_contract);
        println!("  Profit per contract: {:.2}", result.profit_per_contract);
        println!("  Total profit:        {:.2}", result.total_profit);
        println!("  Payoff ratio:        {:.2}", result.payoff_ratio);
        Ok(())
    }
}
