//! Position sizing module
//!
//! Contract count for a futures trade from account capital, risk budget and
//! stop distance

mod calculator;
mod instrument;

pub use calculator::{compute_sizing, SizingInput, SizingResult};
pub use instrument::Instrument;

use thiserror::Error;

/// Sizing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    /// An input is out of range; nothing is computed
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Instrument symbol not recognized
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),
}
