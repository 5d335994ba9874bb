#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
pub use highedge::domain::bar::Bar;
use highedge::domain::error::HighedgeError;
use highedge::domain::order::{OrderIntent, Side, Trade};
use highedge::domain::position::Position;
use highedge::domain::timeframe::Timeframe;
use highedge::domain::venue::{Account, OrderAck, OrderStatusFilter, VenueOrder};
use highedge::ports::data_port::DataPort;
use highedge::ports::trade_log_port::TradeLogPort;
use highedge::ports::venue_port::VenuePort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn get_historical_bars(
        &self,
        symbol: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        _timeframe: Timeframe,
    ) -> Result<Vec<Bar>, HighedgeError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(HighedgeError::DataAccess {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.timestamp >= start && b.timestamp <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Trade log that keeps every write in memory.
#[derive(Default)]
pub struct MemoryTradeLog {
    pub writes: RefCell<Vec<(String, Vec<Trade>)>>,
}

impl TradeLogPort for MemoryTradeLog {
    fn write(&self, label: &str, trades: &[Trade]) -> Result<PathBuf, HighedgeError> {
        self.writes
            .borrow_mut()
            .push((label.to_string(), trades.to_vec()));
        Ok(PathBuf::from(format!("memory/{label}.json")))
    }
}

/// Venue whose queries fail on demand; orders are acknowledged and recorded.
pub struct FlakyVenue {
    pub equity: f64,
    pub fail_account: bool,
    pub fail_positions: bool,
    pub fail_orders: bool,
    pub placed: Vec<OrderIntent>,
}

impl FlakyVenue {
    pub fn new(equity: f64) -> Self {
        Self {
            equity,
            fail_account: false,
            fail_positions: false,
            fail_orders: false,
            placed: Vec::new(),
        }
    }
}

fn down(what: &str) -> HighedgeError {
    HighedgeError::Venue {
        reason: format!("{what} unavailable"),
    }
}

impl VenuePort for FlakyVenue {
    fn place_order(&mut self, intent: &OrderIntent) -> Result<OrderAck, HighedgeError> {
        self.placed.push(intent.clone());
        Ok(OrderAck::Acknowledged)
    }

    fn get_account(&self) -> Result<Account, HighedgeError> {
        if self.fail_account {
            return Err(down("account"));
        }
        Ok(Account {
            cash: self.equity,
            equity: self.equity,
        })
    }

    fn get_all_positions(&self) -> Result<Vec<Position>, HighedgeError> {
        if self.fail_positions {
            return Err(down("positions"));
        }
        Ok(Vec::new())
    }

    fn get_orders(
        &self,
        _status: OrderStatusFilter,
        _side: Option<Side>,
    ) -> Result<Vec<VenueOrder>, HighedgeError> {
        if self.fail_orders {
            return Err(down("orders"));
        }
        Ok(Vec::new())
    }
}

pub fn ts(minute: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
        + chrono::Duration::minutes(minute as i64)
}

pub fn make_bar(minute: usize, close: f64, high: f64, low: f64, volume: f64) -> Bar {
    Bar {
        timestamp: ts(minute),
        open: close,
        high,
        low,
        close,
        volume,
    }
}

/// Closes alternating 100 / 110, each with a two-point range.
pub fn zigzag_bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let close = if i % 2 == 0 { 100.0 } else { 110.0 };
            make_bar(i, close, close + 1.0, close - 1.0, 1_000.0)
        })
        .collect()
}

/// A steady uptrend with small ranges.
pub fn trending_bars(n: usize, start: f64, step: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let close = start + step * i as f64;
            make_bar(i, close, close + 0.1, close - 0.1, 500.0)
        })
        .collect()
}

/// Render bars as CSV rows (no header).
pub fn csv_rows(bars: &[Bar]) -> String {
    bars.iter()
        .map(|b| {
            format!(
                "{},{},{},{},{},{}\n",
                b.timestamp.format("%Y-%m-%d %H:%M:%S"),
                b.open,
                b.high,
                b.low,
                b.close,
                b.volume
            )
        })
        .collect()
}
