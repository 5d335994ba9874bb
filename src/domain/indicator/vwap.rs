//! Rolling volume-weighted average price.
//!
//! VWAP(n) = sum(C*V) / sum(V) over the last n bars. When the window carries
//! no volume the current close is returned instead.

use super::RollingWindow;

#[derive(Debug, Clone)]
pub struct RollingVwap {
    volumes: RollingWindow,
    price_volumes: RollingWindow,
}

impl RollingVwap {
    pub fn new(window: usize) -> Self {
        RollingVwap {
            volumes: RollingWindow::new(window),
            price_volumes: RollingWindow::new(window),
        }
    }

    pub fn update(&mut self, price: f64, volume: f64) -> Option<f64> {
        self.volumes.push(volume);
        self.price_volumes.push(price * volume);

        if !self.is_full() {
            return None;
        }

        let total_volume = self.volumes.sum();
        if total_volume == 0.0 {
            Some(price)
        } else {
            Some(self.price_volumes.sum() / total_volume)
        }
    }

    pub fn is_full(&self) -> bool {
        self.volumes.is_full() && self.price_volumes.is_full()
    }

    pub fn reset(&mut self) {
        self.volumes.clear();
        self.price_volumes.clear();
    }
}
