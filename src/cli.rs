//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_trade_log::JsonTradeLogAdapter;
use crate::adapters::line_feed::LineFeedAdapter;
use crate::adapters::shadow_venue::ShadowVenue;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    RunMode, read_f64, read_kind, read_period, read_timeframe, read_usize, read_venue,
    validate_config,
};
use crate::domain::error::HighedgeError;
use crate::domain::execution::{SimulatedExecutionEngine, SimulationConfig};
use crate::domain::live::{LiveSession, LiveSummary};
use crate::domain::risk::RiskLimits;
use crate::domain::strategy::ema_crossover::EmaCrossoverParams;
use crate::domain::strategy::high_edge::HighEdgeParams;
use crate::domain::strategy::{StrategyConfig, StrategyKind, StrategyParams, build_strategy};
use crate::domain::venue::VenueKind;
use crate::ports::config_port::ConfigPort;
use crate::ports::venue_port::VenuePort;

#[derive(Parser, Debug)]
#[command(name = "highedge", about = "Momentum / mean-reversion strategy runner")]
pub struct Cli {
    /// Log filter, e.g. `info` or `highedge=debug`; HIGHEDGE_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
    /// `text` or `json`
    #[arg(long, global = true, default_value = "text")]
    pub log_format: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay historical bars through the strategy on the simulated engine
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory for the trade log, overriding [trade_log] dir
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Check a configuration file without running anything
    Validate {
        #[arg(short, long)]
        config: PathBuf,
        /// Validate for a live session instead of a backtest
        #[arg(long)]
        live: bool,
    },
    /// Run the strategy on bars read from stdin
    Live {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest { config, out_dir } => run_backtest(&config, out_dir.as_deref()),
        Command::Validate { config, live } => run_validate(&config, live),
        Command::Live { config } => run_live(&config),
    }
}

fn fail(err: &HighedgeError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, HighedgeError> {
    FileConfigAdapter::from_file(path)
}

pub fn build_simulation_config(config: &dyn ConfigPort) -> Result<SimulationConfig, HighedgeError> {
    let defaults = SimulationConfig::default();
    Ok(SimulationConfig {
        start_cash: read_f64(config, "simulation", "start_cash", defaults.start_cash)?,
        slippage: read_f64(config, "simulation", "slippage", defaults.slippage)?,
        commission: read_f64(config, "simulation", "commission", defaults.commission)?,
    })
}

fn build_high_edge_params(config: &dyn ConfigPort) -> Result<HighEdgeParams, HighedgeError> {
    let d = HighEdgeParams::default();
    Ok(HighEdgeParams {
        short_window: read_usize(config, "strategy", "short_window", d.short_window)?,
        long_window: read_usize(config, "strategy", "long_window", d.long_window)?,
        ema_threshold: read_f64(config, "strategy", "ema_threshold", d.ema_threshold)?,
        zscore_window: read_usize(config, "strategy", "zscore_window", d.zscore_window)?,
        zscore_threshold: read_f64(config, "strategy", "zscore_threshold", d.zscore_threshold)?,
        atr_window: read_usize(config, "strategy", "atr_window", d.atr_window)?,
        stop_atr_mult: read_f64(config, "strategy", "stop_atr_mult", d.stop_atr_mult)?,
        target_mult: read_f64(config, "strategy", "target_mult", d.target_mult)?,
        size_fraction: read_f64(config, "strategy", "size_fraction", d.size_fraction)?,
        cooldown: read_usize(config, "strategy", "cooldown", d.cooldown)?,
        risk: RiskLimits {
            daily_drawdown: read_f64(config, "strategy", "daily_drawdown", d.risk.daily_drawdown)?,
            max_total_positions: read_usize(
                config,
                "strategy",
                "max_total_positions",
                d.risk.max_total_positions,
            )?,
            max_positions_per_symbol: read_usize(
                config,
                "strategy",
                "max_positions_per_symbol",
                d.risk.max_positions_per_symbol,
            )?,
        },
    })
}

fn build_ema_crossover_params(
    config: &dyn ConfigPort,
) -> Result<EmaCrossoverParams, HighedgeError> {
    let d = EmaCrossoverParams::default();
    Ok(EmaCrossoverParams {
        short_window: read_usize(config, "strategy", "short_window", d.short_window)?,
        long_window: read_usize(config, "strategy", "long_window", d.long_window)?,
        size: read_f64(config, "strategy", "size", d.size)?,
    })
}

pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, HighedgeError> {
    let params = match read_kind(config)? {
        StrategyKind::HighEdge => StrategyParams::HighEdge(build_high_edge_params(config)?),
        StrategyKind::EmaCrossover => {
            StrategyParams::EmaCrossover(build_ema_crossover_params(config)?)
        }
    };
    Ok(StrategyConfig {
        symbol: config.require_string("strategy", "symbol")?.to_uppercase(),
        timeframe: read_timeframe(config)?,
        params,
    })
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, HighedgeError> {
    let (start, end) = read_period(config)?;
    Ok(BacktestConfig {
        strategy: build_strategy_config(config)?,
        simulation: build_simulation_config(config)?,
        start,
        end,
    })
}

/// Load, validate and run a backtest. Returns the result for the caller to report.
pub fn execute_backtest(
    config_path: &Path,
    out_dir: Option<&Path>,
) -> Result<BacktestResult, HighedgeError> {
    let adapter = load_config(config_path)?;
    validate_config(&adapter, RunMode::Backtest)?;
    let bt_config = build_backtest_config(&adapter)?;

    let data_dir = PathBuf::from(adapter.get_string_or("data", "dir", "data"));
    let log_dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => PathBuf::from(adapter.get_string_or("trade_log", "dir", "backtests")),
    };

    let data = CsvAdapter::new(data_dir);
    let trade_log = JsonTradeLogAdapter::new(log_dir);
    backtest_engine::run_backtest(&data, &trade_log, &bt_config)
}

fn run_backtest(config_path: &Path, out_dir: Option<&Path>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let result = match execute_backtest(config_path, out_dir) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    let report = &result.report;
    eprintln!("Bars: {}", result.bars);
    eprintln!("Trades: {}", report.trade_count);
    eprintln!("Final cash: {:.2}", report.final_cash);
    eprintln!("Total return: {:.4}%", report.total_return * 100.0);
    eprintln!("Trade log: {}", result.trade_log.display());

    match serde_json::to_string_pretty(report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&HighedgeError::from(e)),
    }
}

fn run_validate(config_path: &Path, live: bool) -> ExitCode {
    let mode = if live {
        RunMode::Live
    } else {
        RunMode::Backtest
    };
    let checked = load_config(config_path).and_then(|adapter| {
        validate_config(&adapter, mode)?;
        build_strategy_config(&adapter)
    });
    match checked {
        Ok(sc) => {
            eprintln!(
                "Config is valid: {} on {} ({})",
                sc.params.kind(),
                sc.symbol,
                sc.timeframe
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Run a live session over `bars`, against the venue selected by `[live] venue`.
pub fn execute_live<R: io::Read>(
    config: &dyn ConfigPort,
    bars: R,
    stop: &AtomicBool,
) -> Result<LiveSummary, HighedgeError> {
    validate_config(config, RunMode::Live)?;
    let strategy_config = build_strategy_config(config)?;
    let simulation = build_simulation_config(config)?;

    let mut venue: Box<dyn VenuePort> = match read_venue(config)? {
        VenueKind::Simulated => Box::new(SimulatedExecutionEngine::new(simulation)),
        VenueKind::Shadow => Box::new(ShadowVenue::new(simulation.start_cash)),
    };
    let mut strategy = build_strategy(&strategy_config);
    let mut stream = LineFeedAdapter::new(bars);

    LiveSession::new(strategy.as_mut(), venue.as_mut(), stop).run(&mut stream)
}

/// Raise `stop` on Ctrl-C so the session ends between bars and runs its stop hook.
/// A pending stdin read still has to return before the flag is seen.
pub fn install_stop_handler(stop: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::warn!("received interrupt; stopping after the current bar");
        stop.store(true, Ordering::SeqCst);
    }) {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler; stop on end of input only");
    }
}

fn run_live(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let stop = Arc::new(AtomicBool::new(false));
    install_stop_handler(Arc::clone(&stop));
    match execute_live(&adapter, io::stdin().lock(), &stop) {
        Ok(summary) => {
            eprintln!(
                "Session ended ({:?}): {} bars, {} orders",
                summary.stop_reason, summary.bars, summary.orders
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timeframe::Timeframe;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn strategy_config_uses_defaults() {
        let config = make_config("[strategy]\nsymbol = spy\n");
        let sc = build_strategy_config(&config).unwrap();
        assert_eq!(sc.symbol, "SPY");
        assert_eq!(sc.timeframe, Timeframe::OneMinute);
        assert_eq!(sc.params, StrategyParams::HighEdge(HighEdgeParams::default()));
    }

    #[test]
    fn strategy_config_reads_overrides() {
        let config = make_config(
            "[strategy]\nsymbol = QQQ\ntimeframe = 5Min\ncooldown = 0\nmax_positions_per_symbol = 1\n",
        );
        let sc = build_strategy_config(&config).unwrap();
        match sc.params {
            StrategyParams::HighEdge(p) => {
                assert_eq!(p.cooldown, 0);
                assert_eq!(p.risk.max_positions_per_symbol, 1);
                assert_eq!(p.long_window, 60);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(sc.timeframe, Timeframe::FiveMinutes);
    }

    #[test]
    fn ema_crossover_kind() {
        let config =
            make_config("[strategy]\nkind = ema_crossover\nsymbol = SPY\nshort_window = 3\n");
        let sc = build_strategy_config(&config).unwrap();
        assert_eq!(
            sc.params,
            StrategyParams::EmaCrossover(EmaCrossoverParams {
                short_window: 3,
                long_window: 20,
                size: 1.0,
            })
        );
    }

    #[test]
    fn simulation_config_defaults() {
        let config = make_config("[simulation]\nstart_cash = 5000\n");
        let sim = build_simulation_config(&config).unwrap();
        assert_eq!(sim.start_cash, 5000.0);
        assert_eq!(sim.slippage, 0.0001);
        assert_eq!(sim.commission, 0.0002);
    }

    #[test]
    fn backtest_config_requires_period() {
        let config = make_config("[strategy]\nsymbol = SPY\n");
        assert!(matches!(
            build_backtest_config(&config),
            Err(HighedgeError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn execute_live_shadow_over_reader() {
        let config = make_config("[strategy]\nkind = ema_crossover\nsymbol = SPY\nshort_window = 1\nlong_window = 2\n[live]\nvenue = shadow\n");
        let input = "2024-01-02 09:30:00,1,1,1,10,1\n\
                     2024-01-02 09:30:01,1,1,1,11,1\n\
                     2024-01-02 09:30:02,1,1,1,12,1\n";
        let stop = AtomicBool::new(false);
        let summary = execute_live(&config, input.as_bytes(), &stop).unwrap();
        assert_eq!(summary.bars, 3);
        assert_eq!(summary.orders, 1);
    }

    #[test]
    fn execute_live_rejects_daily_bars() {
        let config = make_config("[strategy]\nsymbol = SPY\ntimeframe = 1D\n");
        let stop = AtomicBool::new(false);
        assert!(matches!(
            execute_live(&config, "".as_bytes(), &stop),
            Err(HighedgeError::UnsupportedTimeframe { .. })
        ));
    }

    #[test]
    fn raised_stop_flag_cancels_live_run() {
        let config = make_config("[strategy]\nsymbol = SPY\n[live]\nvenue = shadow\n");
        let stop = Arc::new(AtomicBool::new(false));
        install_stop_handler(Arc::clone(&stop));
        assert!(!stop.load(Ordering::SeqCst));

        let raiser = Arc::clone(&stop);
        std::thread::spawn(move || raiser.store(true, Ordering::SeqCst))
            .join()
            .unwrap();

        let input = "2024-01-02 09:30:00,1,1,1,10,1\n";
        let summary = execute_live(&config, input.as_bytes(), &stop).unwrap();
        assert_eq!(summary.bars, 0);
        assert_eq!(
            summary.stop_reason,
            crate::domain::live::StopReason::Cancelled
        );
    }
}
