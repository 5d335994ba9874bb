//! Streaming technical indicators.
//!
//! - `RollingWindow`: bounded buffer shared by the rolling indicators
//! - `IndicatorSet`: EMA pair, VWAP z-score and ATR maintained bar by bar
//! - `IndicatorSnapshot`: the per-bar output, only produced once every buffer is full

pub mod atr;
pub mod ema;
pub mod stddev;
pub mod vwap;

use std::collections::VecDeque;

use crate::domain::bar::Bar;
use atr::RangeAtr;
use ema::EmaPair;
use stddev::{population_stddev, z_score};
use vwap::RollingVwap;

/// Fixed-capacity FIFO of values; pushing past capacity evicts the oldest.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        RollingWindow {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.sum() / self.values.len() as f64
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + Clone + '_ {
        self.values.iter().copied()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Window lengths for an `IndicatorSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorWindows {
    pub short: usize,
    pub long: usize,
    pub zscore: usize,
    pub atr: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub short_ema: f64,
    pub long_ema: f64,
    pub vwap: f64,
    pub stdev: f64,
    pub zscore: f64,
    pub atr: f64,
}

#[derive(Debug, Clone)]
pub struct IndicatorSet {
    seen: usize,
    ema: EmaPair,
    closes: RollingWindow,
    vwap: RollingVwap,
    atr: RangeAtr,
}

impl IndicatorSet {
    pub fn new(windows: IndicatorWindows) -> Self {
        IndicatorSet {
            seen: 0,
            ema: EmaPair::new(windows.short, windows.long),
            closes: RollingWindow::new(windows.zscore),
            vwap: RollingVwap::new(windows.zscore),
            atr: RangeAtr::new(windows.atr),
        }
    }

    /// Feed one bar. The rolling buffers always advance; the EMA pair is only
    /// seeded on the first bar where the long window and every buffer are full.
    pub fn update(&mut self, bar: &Bar) -> Option<IndicatorSnapshot> {
        self.seen = self.seen.saturating_add(1);
        self.closes.push(bar.close);
        let vwap = self.vwap.update(bar.close, bar.volume);
        let atr = self.atr.update(bar);

        if self.seen < self.ema.warmup() || !self.closes.is_full() {
            return None;
        }
        let vwap = vwap?;
        let atr = atr?;
        let (short_ema, long_ema) = self.ema.step(bar.close);

        let stdev = population_stddev(self.closes.iter());
        Some(IndicatorSnapshot {
            short_ema,
            long_ema,
            vwap,
            stdev,
            zscore: z_score(bar.close, vwap, stdev),
            atr,
        })
    }

    pub fn short_ema(&self) -> Option<f64> {
        self.ema.short()
    }

    pub fn long_ema(&self) -> Option<f64> {
        self.ema.long()
    }

    pub fn atr(&self) -> Option<f64> {
        self.atr.value()
    }

    pub fn reset(&mut self) {
        self.seen = 0;
        self.ema.reset();
        self.closes.clear();
        self.vwap.reset();
        self.atr.reset();
    }
}
