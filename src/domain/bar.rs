//! OHLCV bar representation.

use chrono::NaiveDateTime;

/// One bar of market data. Bars are consumed strictly in timestamp order.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// high - low, ignoring gaps against the previous close.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}
