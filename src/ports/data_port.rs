//! Historical market data port trait.

use crate::domain::bar::Bar;
use crate::domain::error::HighedgeError;
use crate::domain::timeframe::Timeframe;
use chrono::NaiveDateTime;

pub trait DataPort {
    /// Bars for `symbol` within `[start, end]`, oldest first.
    ///
    /// An empty range is reported as `HighedgeError::NoData`.
    fn get_historical_bars(
        &self,
        symbol: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, HighedgeError>;
}
