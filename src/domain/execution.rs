//! Simulated order execution.
//!
//! Fills every market order immediately at `price * (1 ± slippage)` and keeps
//! one position record per fill. Records are not netted: an exit fill opens
//! an offsetting record next to the entry it closes.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use super::error::HighedgeError;
use super::order::{OrderIntent, Side, Trade};
use super::position::{Position, PositionSide};
use super::venue::{Account, OrderAck, OrderStatusFilter, VenueOrder};
use crate::ports::venue_port::VenuePort;

/// Cash and cost parameters of a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub start_cash: f64,
    /// Fraction of price, applied against the trader on every fill.
    pub slippage: f64,
    /// Fraction of fill notional charged per fill.
    pub commission: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            start_cash: 100_000.0,
            slippage: 0.0001,
            commission: 0.0002,
        }
    }
}

/// Fill price after slippage: buys pay up, sells give up.
pub fn apply_slippage(price: f64, side: Side, slippage: f64) -> f64 {
    match side {
        Side::Buy => price * (1.0 + slippage),
        Side::Sell => price * (1.0 - slippage),
    }
}

/// Commission: |fill_price * size| * rate.
pub fn calculate_commission(fill_price: f64, size: f64, rate: f64) -> f64 {
    (fill_price * size).abs() * rate
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub start_cash: f64,
    pub final_cash: f64,
    pub total_return: f64,
    #[serde(rename = "trades")]
    pub trade_count: usize,
}

#[derive(Debug, Clone)]
pub struct SimulatedExecutionEngine {
    config: SimulationConfig,
    cash: f64,
    positions: Vec<Position>,
    trades: Vec<Trade>,
    marks: HashMap<String, f64>,
}

impl SimulatedExecutionEngine {
    pub fn new(config: SimulationConfig) -> Self {
        SimulatedExecutionEngine {
            config,
            cash: config.start_cash,
            positions: Vec::new(),
            trades: Vec::new(),
            marks: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Record the latest price for `symbol`, used to value open positions.
    pub fn mark(&mut self, symbol: &str, price: f64) {
        self.marks.insert(symbol.to_string(), price);
    }

    /// Cash plus the signed value of every open record at its mark price.
    /// Records whose symbol was never marked are valued at entry.
    pub fn equity(&self) -> f64 {
        self.cash
            + self
                .positions
                .iter()
                .map(|p| {
                    let price = self.marks.get(&p.symbol).copied().unwrap_or(p.entry_price);
                    p.signed_value(price)
                })
                .sum::<f64>()
    }

    /// Fill a market order of `size` at `price`.
    pub fn execute(
        &mut self,
        symbol: &str,
        side: Side,
        size: f64,
        price: f64,
    ) -> Result<Trade, HighedgeError> {
        if !(size.is_finite() && size > 0.0) {
            return Err(HighedgeError::Venue {
                reason: format!("order size must be positive, got {size}"),
            });
        }
        if !(price.is_finite() && price > 0.0) {
            return Err(HighedgeError::Venue {
                reason: format!("order price must be positive, got {price}"),
            });
        }

        let fill_price = apply_slippage(price, side, self.config.slippage);
        let cost = fill_price * size;
        let commission = calculate_commission(fill_price, size, self.config.commission);

        match side {
            Side::Buy => self.cash -= cost + commission,
            Side::Sell => self.cash += cost - commission,
        }

        let trade = Trade {
            side,
            size,
            fill_price,
            commission,
        };
        self.trades.push(trade.clone());
        self.positions.push(Position {
            symbol: symbol.to_string(),
            side: PositionSide::from(side),
            size,
            entry_price: fill_price,
            commission_paid: commission,
        });

        debug!(
            %symbol,
            %side,
            size,
            fill_price,
            commission,
            cash = self.cash,
            "order filled"
        );
        Ok(trade)
    }

    /// Settle every open record at `last_price` and clear them.
    ///
    /// Each record adds its own settlement P&L to cash; a second call finds
    /// nothing left to settle. Returns the amount credited.
    pub fn close_positions(&mut self, last_price: f64) -> f64 {
        let settled: f64 = self
            .positions
            .iter()
            .map(|p| p.settlement_pnl(last_price))
            .sum();
        let count = self.positions.len();
        self.cash += settled;
        self.positions.clear();
        if count > 0 {
            info!(records = count, last_price, settled, "positions settled");
        }
        settled
    }

    pub fn performance(&self) -> PerformanceReport {
        let start_cash = self.config.start_cash;
        let total_return = if start_cash != 0.0 {
            (self.cash - start_cash) / start_cash
        } else {
            0.0
        };
        PerformanceReport {
            start_cash,
            final_cash: self.cash,
            total_return,
            trade_count: self.trades.len(),
        }
    }
}

impl VenuePort for SimulatedExecutionEngine {
    fn place_order(&mut self, intent: &OrderIntent) -> Result<OrderAck, HighedgeError> {
        let trade = self.execute(&intent.symbol, intent.side, intent.size, intent.price)?;
        Ok(OrderAck::Filled(trade))
    }

    fn get_account(&self) -> Result<Account, HighedgeError> {
        Ok(Account {
            cash: self.cash,
            equity: self.equity(),
        })
    }

    fn get_all_positions(&self) -> Result<Vec<Position>, HighedgeError> {
        Ok(self.positions.clone())
    }

    /// Orders fill on placement, so nothing is ever resting.
    fn get_orders(
        &self,
        _status: OrderStatusFilter,
        _side: Option<Side>,
    ) -> Result<Vec<VenueOrder>, HighedgeError> {
        Ok(Vec::new())
    }

    fn mark_price(&mut self, symbol: &str, price: f64) {
        self.mark(symbol, price);
    }
}
