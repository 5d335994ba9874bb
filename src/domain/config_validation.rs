//! Configuration validation.
//!
//! Every key is checked before a run starts, so a bad file fails with exit
//! code 2 and a message naming the section and key. The typed readers here
//! are shared with the config builders in `cli`.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::error::HighedgeError;
use crate::domain::strategy::StrategyKind;
use crate::domain::timeframe::Timeframe;
use crate::domain::venue::VenueKind;
use crate::ports::config_port::ConfigPort;

/// What the configuration is about to be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Backtest,
    Live,
}

pub fn validate_config(config: &dyn ConfigPort, mode: RunMode) -> Result<(), HighedgeError> {
    validate_simulation_config(config)?;
    validate_strategy_config(config, mode)?;
    if mode == RunMode::Live {
        validate_live_config(config)?;
    }
    Ok(())
}

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), HighedgeError> {
    let start_cash = read_f64(config, "simulation", "start_cash", 100_000.0)?;
    ensure(start_cash > 0.0, "simulation", "start_cash", "start_cash must be positive")?;

    let slippage = read_f64(config, "simulation", "slippage", 0.0001)?;
    ensure(
        (0.0..1.0).contains(&slippage),
        "simulation",
        "slippage",
        "slippage must be in [0, 1)",
    )?;

    let commission = read_f64(config, "simulation", "commission", 0.0002)?;
    ensure(
        (0.0..1.0).contains(&commission),
        "simulation",
        "commission",
        "commission must be in [0, 1)",
    )
}

pub fn validate_strategy_config(
    config: &dyn ConfigPort,
    mode: RunMode,
) -> Result<(), HighedgeError> {
    config.require_string("strategy", "symbol")?;

    let timeframe = read_timeframe(config)?;
    match mode {
        RunMode::Backtest if !timeframe.supports_historical() => {
            return Err(HighedgeError::UnsupportedTimeframe {
                value: format!("{timeframe} (historical data)"),
            });
        }
        RunMode::Live if !timeframe.supports_live() => {
            return Err(HighedgeError::UnsupportedTimeframe {
                value: format!("{timeframe} (live stream)"),
            });
        }
        _ => {}
    }

    if mode == RunMode::Backtest {
        let (start, end) = read_period(config)?;
        ensure(start < end, "strategy", "start", "start must be before end")?;
    }

    match read_kind(config)? {
        StrategyKind::HighEdge => validate_high_edge(config),
        StrategyKind::EmaCrossover => validate_ema_crossover(config),
    }
}

pub fn validate_live_config(config: &dyn ConfigPort) -> Result<(), HighedgeError> {
    read_venue(config).map(|_| ())
}

fn validate_high_edge(config: &dyn ConfigPort) -> Result<(), HighedgeError> {
    read_window(config, "short_window", 5, 1)?;
    read_window(config, "long_window", 60, 1)?;
    read_window(config, "zscore_window", 60, 2)?;
    read_window(config, "atr_window", 1, 1)?;
    read_usize(config, "strategy", "cooldown", 5)?;
    read_window(config, "max_total_positions", 10, 1)?;
    read_window(config, "max_positions_per_symbol", 3, 1)?;

    let ema_threshold = read_f64(config, "strategy", "ema_threshold", 0.001)?;
    ensure(
        ema_threshold >= 0.0,
        "strategy",
        "ema_threshold",
        "ema_threshold must be non-negative",
    )?;

    let zscore_threshold = read_f64(config, "strategy", "zscore_threshold", 1.0)?;
    ensure(
        zscore_threshold >= 0.0,
        "strategy",
        "zscore_threshold",
        "zscore_threshold must be non-negative",
    )?;

    let stop_atr_mult = read_f64(config, "strategy", "stop_atr_mult", 1.2)?;
    ensure(
        stop_atr_mult > 0.0,
        "strategy",
        "stop_atr_mult",
        "stop_atr_mult must be positive",
    )?;

    let target_mult = read_f64(config, "strategy", "target_mult", 1.8)?;
    ensure(
        target_mult > 0.0,
        "strategy",
        "target_mult",
        "target_mult must be positive",
    )?;

    let size_fraction = read_f64(config, "strategy", "size_fraction", 0.1)?;
    ensure(
        size_fraction > 0.0 && size_fraction <= 1.0,
        "strategy",
        "size_fraction",
        "size_fraction must be in (0, 1]",
    )?;

    let daily_drawdown = read_f64(config, "strategy", "daily_drawdown", 0.03)?;
    ensure(
        daily_drawdown > 0.0 && daily_drawdown <= 1.0,
        "strategy",
        "daily_drawdown",
        "daily_drawdown must be in (0, 1]",
    )
}

fn validate_ema_crossover(config: &dyn ConfigPort) -> Result<(), HighedgeError> {
    read_window(config, "short_window", 5, 1)?;
    read_window(config, "long_window", 20, 1)?;
    let size = read_f64(config, "strategy", "size", 1.0)?;
    ensure(size > 0.0, "strategy", "size", "size must be positive")
}

fn ensure(ok: bool, section: &str, key: &str, reason: &str) -> Result<(), HighedgeError> {
    if ok {
        Ok(())
    } else {
        Err(invalid(section, key, reason))
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> HighedgeError {
    HighedgeError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn read_window(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
    min: usize,
) -> Result<usize, HighedgeError> {
    let value = read_usize(config, "strategy", key, default)?;
    ensure(
        value >= min,
        "strategy",
        key,
        &format!("{key} must be at least {min}"),
    )?;
    Ok(value)
}

/// A float value, `default` when absent. Unparseable text is an error.
pub fn read_f64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, HighedgeError> {
    read_parsed(config, section, key, default, "a number")
}

/// A non-negative integer value, `default` when absent.
pub fn read_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, HighedgeError> {
    read_parsed(config, section, key, default, "a non-negative integer")
}

fn read_parsed<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
    expected: &str,
) -> Result<T, HighedgeError> {
    match config.get_string(section, key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| invalid(section, key, &format!("{key} must be {expected}, got '{raw}'"))),
        _ => Ok(default),
    }
}

pub fn read_kind(config: &dyn ConfigPort) -> Result<StrategyKind, HighedgeError> {
    match config.get_string("strategy", "kind") {
        Some(s) if !s.trim().is_empty() => s.parse(),
        _ => Ok(StrategyKind::HighEdge),
    }
}

pub fn read_timeframe(config: &dyn ConfigPort) -> Result<Timeframe, HighedgeError> {
    match config.get_string("strategy", "timeframe") {
        Some(s) if !s.trim().is_empty() => s.parse(),
        _ => Ok(Timeframe::OneMinute),
    }
}

pub fn read_venue(config: &dyn ConfigPort) -> Result<VenueKind, HighedgeError> {
    match config.get_string("live", "venue") {
        Some(s) if !s.trim().is_empty() => s.parse(),
        _ => Ok(VenueKind::Shadow),
    }
}

/// `[strategy] start` and `end`. A bare date for `end` covers the whole day.
pub fn read_period(config: &dyn ConfigPort) -> Result<(NaiveDateTime, NaiveDateTime), HighedgeError> {
    let start = config.require_string("strategy", "start")?;
    let end = config.require_string("strategy", "end")?;
    let start = parse_bound(&start, false)
        .ok_or_else(|| invalid("strategy", "start", "expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"))?;
    let end = parse_bound(&end, true)
        .ok_or_else(|| invalid("strategy", "end", "expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"))?;
    Ok((start, end))
}

/// Parse a period bound. Date-only values snap to the start of the day, or
/// to its last second when `end_of_day` is set.
pub fn parse_bound(value: &str, end_of_day: bool) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59)?
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)?
    };
    Some(date.and_time(time))
}
