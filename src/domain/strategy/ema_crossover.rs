//! Fixed-size EMA crossover.
//!
//! Buys when the short EMA is above the long EMA and the book is not already
//! long; sells when it is below and the book is not already short. Every
//! order is `size` units, so a reversal from long to short is a single sell.

use tracing::info;

use crate::domain::bar::Bar;
use crate::domain::indicator::ema::EmaPair;
use crate::domain::order::{OrderIntent, Side};
use crate::domain::strategy::Strategy;
use crate::domain::strategy::high_edge::PositionState;
use crate::domain::venue::VenueSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct EmaCrossoverParams {
    pub short_window: usize,
    pub long_window: usize,
    pub size: f64,
}

impl Default for EmaCrossoverParams {
    fn default() -> Self {
        EmaCrossoverParams {
            short_window: 5,
            long_window: 20,
            size: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmaCrossoverStrategy {
    symbol: String,
    params: EmaCrossoverParams,
    emas: EmaPair,
    position: PositionState,
}

impl EmaCrossoverStrategy {
    pub fn new(symbol: &str, params: EmaCrossoverParams) -> Self {
        EmaCrossoverStrategy {
            symbol: symbol.to_string(),
            emas: EmaPair::new(params.short_window, params.long_window),
            position: PositionState::Flat,
            params,
        }
    }

    pub fn position(&self) -> PositionState {
        self.position
    }
}

impl Strategy for EmaCrossoverStrategy {
    fn name(&self) -> &'static str {
        "ema_crossover"
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn on_start(&mut self, start_equity: f64) {
        self.emas.reset();
        self.position = PositionState::Flat;
        info!(symbol = %self.symbol, start_equity, "ema_crossover started");
    }

    fn step(&mut self, bar: &Bar, _venue: &VenueSnapshot) -> Vec<OrderIntent> {
        let Some((short, long)) = self.emas.update(bar.close) else {
            return Vec::new();
        };

        let side = if short > long && self.position != PositionState::Long {
            self.position = PositionState::Long;
            Side::Buy
        } else if short < long && self.position != PositionState::Short {
            self.position = PositionState::Short;
            Side::Sell
        } else {
            return Vec::new();
        };

        info!(symbol = %self.symbol, %side, short, long, price = bar.close, "crossover");
        vec![OrderIntent::market(side, self.params.size, bar.close, &self.symbol)]
    }
}
