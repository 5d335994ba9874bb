//! Strategy contract, configuration and factory.
//!
//! A strategy sees one bar plus a snapshot of the venue per step and answers
//! with the orders it wants placed. It never calls the venue itself.

pub mod ema_crossover;
pub mod high_edge;

use std::fmt;
use std::str::FromStr;

use super::bar::Bar;
use super::error::HighedgeError;
use super::order::OrderIntent;
use super::timeframe::Timeframe;
use super::venue::VenueSnapshot;
use ema_crossover::{EmaCrossoverParams, EmaCrossoverStrategy};
use high_edge::{HighEdgeParams, HighEdgeStrategy};

pub trait Strategy {
    fn name(&self) -> &'static str;

    fn symbol(&self) -> &str;

    /// Called once before the first bar with the venue's equity.
    fn on_start(&mut self, start_equity: f64);

    fn step(&mut self, bar: &Bar, venue: &VenueSnapshot) -> Vec<OrderIntent>;

    /// Called once after the last bar, also when the run stops early.
    fn on_stop(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    HighEdge,
    EmaCrossover,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::HighEdge => "high_edge",
            StrategyKind::EmaCrossover => "ema_crossover",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = HighedgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "high_edge" | "highedge" => Ok(StrategyKind::HighEdge),
            "ema_crossover" | "ema" => Ok(StrategyKind::EmaCrossover),
            other => Err(HighedgeError::UnsupportedStrategy {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyParams {
    HighEdge(HighEdgeParams),
    EmaCrossover(EmaCrossoverParams),
}

impl StrategyParams {
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyParams::HighEdge(_) => StrategyKind::HighEdge,
            StrategyParams::EmaCrossover(_) => StrategyKind::EmaCrossover,
        }
    }
}

/// What to trade, on which bars, and with which parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub params: StrategyParams,
}

pub fn build_strategy(config: &StrategyConfig) -> Box<dyn Strategy> {
    match &config.params {
        StrategyParams::HighEdge(params) => {
            Box::new(HighEdgeStrategy::new(&config.symbol, params.clone()))
        }
        StrategyParams::EmaCrossover(params) => {
            Box::new(EmaCrossoverStrategy::new(&config.symbol, params.clone()))
        }
    }
}
