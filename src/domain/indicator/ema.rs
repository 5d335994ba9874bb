//! Exponential Moving Average pair.
//!
//! k = 2/(n+1). Once `max(short, long)` closes have been seen, both EMAs are
//! seeded with the current close (not an SMA), then EMA[i] = C[i]*k + EMA[i-1]*(1-k).

/// Smoothing factor for an EMA over `window` bars.
pub fn smoothing_factor(window: usize) -> f64 {
    2.0 / (window as f64 + 1.0)
}

/// alpha*price + (1-alpha)*prev, written so a constant series stays exactly constant.
pub fn ema_step(prev: f64, price: f64, alpha: f64) -> f64 {
    prev + alpha * (price - prev)
}

#[derive(Debug, Clone)]
pub struct EmaPair {
    warmup: usize,
    seen: usize,
    alpha_short: f64,
    alpha_long: f64,
    short: Option<f64>,
    long: Option<f64>,
}

impl EmaPair {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        let short_window = short_window.max(1);
        let long_window = long_window.max(1);
        EmaPair {
            warmup: short_window.max(long_window),
            seen: 0,
            alpha_short: smoothing_factor(short_window),
            alpha_long: smoothing_factor(long_window),
            short: None,
            long: None,
        }
    }

    /// Feed one close. Returns `(short, long)` once warmed up.
    pub fn update(&mut self, price: f64) -> Option<(f64, f64)> {
        if self.seen < self.warmup {
            self.seen += 1;
        }
        if self.seen < self.warmup {
            return None;
        }
        Some(self.step(price))
    }

    /// Seed both EMAs at `price` on the first call, advance them afterwards.
    /// Skips the warm-up count; callers that gate on their own buffers use this.
    pub fn step(&mut self, price: f64) -> (f64, f64) {
        let (short, long) = match (self.short, self.long) {
            (Some(s), Some(l)) => (
                ema_step(s, price, self.alpha_short),
                ema_step(l, price, self.alpha_long),
            ),
            _ => (price, price),
        };
        self.short = Some(short);
        self.long = Some(long);
        (short, long)
    }

    /// Closes needed before `update` produces a value.
    pub fn warmup(&self) -> usize {
        self.warmup
    }

    pub fn short(&self) -> Option<f64> {
        self.short
    }

    pub fn long(&self) -> Option<f64> {
        self.long
    }

    pub fn reset(&mut self) {
        self.seen = 0;
        self.short = None;
        self.long = None;
    }
}
