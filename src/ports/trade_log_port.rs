//! Trade log persistence port trait.

use std::path::PathBuf;

use crate::domain::error::HighedgeError;
use crate::domain::order::Trade;

/// Port for writing the write-once trade log of a finished run.
pub trait TradeLogPort {
    /// Persist `trades` under a name derived from `label`; returns where they went.
    fn write(&self, label: &str, trades: &[Trade]) -> Result<PathBuf, HighedgeError>;
}
