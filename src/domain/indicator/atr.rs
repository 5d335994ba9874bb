//! Average True Range, simplified.
//!
//! ATR(n) = mean(H - L) over the last n bars. Gaps against the previous close
//! are ignored.

use super::RollingWindow;
use crate::domain::bar::Bar;

#[derive(Debug, Clone)]
pub struct RangeAtr {
    ranges: RollingWindow,
}

impl RangeAtr {
    pub fn new(window: usize) -> Self {
        RangeAtr {
            ranges: RollingWindow::new(window),
        }
    }

    pub fn update(&mut self, bar: &Bar) -> Option<f64> {
        self.ranges.push(bar.range());
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        if self.ranges.is_full() {
            Some(self.ranges.mean())
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.ranges.clear();
    }
}
