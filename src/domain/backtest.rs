//! Backtest orchestration.
//!
//! Replays historical bars through a strategy against the simulated engine:
//! mark, snapshot, step, fill, once per bar. Positions still open after the
//! last bar are settled at its close, then the trade log is written.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{info, info_span};

use super::bar::Bar;
use super::error::HighedgeError;
use super::execution::{PerformanceReport, SimulatedExecutionEngine, SimulationConfig};
use super::strategy::{Strategy, StrategyConfig, build_strategy};
use super::venue::VenueSnapshot;
use crate::ports::data_port::DataPort;
use crate::ports::trade_log_port::TradeLogPort;
use crate::ports::venue_port::VenuePort;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub strategy: StrategyConfig,
    pub simulation: SimulationConfig,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub report: PerformanceReport,
    pub bars: usize,
    pub trade_log: PathBuf,
}

/// Drive `strategy` over `bars`, filling every intent on `engine`.
///
/// Does not settle positions; callers decide what happens after the last bar.
pub fn replay(
    bars: &[Bar],
    strategy: &mut dyn Strategy,
    engine: &mut SimulatedExecutionEngine,
) -> Result<(), HighedgeError> {
    let symbol = strategy.symbol().to_string();
    for bar in bars {
        engine.mark(&symbol, bar.close);
        let venue = VenueSnapshot::capture(&*engine);
        for intent in strategy.step(bar, &venue) {
            engine.place_order(&intent)?;
        }
    }
    Ok(())
}

/// Run a complete backtest and return its performance report.
pub fn run_backtest(
    data: &dyn DataPort,
    trade_log: &dyn TradeLogPort,
    config: &BacktestConfig,
) -> Result<BacktestResult, HighedgeError> {
    let sc = &config.strategy;
    let span = info_span!(
        "backtest",
        symbol = %sc.symbol,
        timeframe = %sc.timeframe,
        strategy = %sc.params.kind()
    );
    let _guard = span.enter();

    let bars = data.get_historical_bars(&sc.symbol, config.start, config.end, sc.timeframe)?;
    let Some(last) = bars.last() else {
        return Err(HighedgeError::NoData {
            symbol: sc.symbol.clone(),
            timeframe: sc.timeframe.to_string(),
        });
    };
    let last_close = last.close;
    info!(bars = bars.len(), start = %config.start, end = %config.end, "bars loaded");

    let mut engine = SimulatedExecutionEngine::new(config.simulation);
    let mut strategy = build_strategy(sc);

    strategy.on_start(engine.equity());
    let outcome = replay(&bars, strategy.as_mut(), &mut engine);
    strategy.on_stop();
    outcome?;

    engine.close_positions(last_close);

    let path = trade_log.write(strategy.name(), engine.trades())?;
    let report = engine.performance();
    info!(
        final_cash = report.final_cash,
        total_return = report.total_return,
        trades = report.trade_count,
        trade_log = %path.display(),
        "backtest complete"
    );

    Ok(BacktestResult {
        report,
        bars: bars.len(),
        trade_log: path,
    })
}
