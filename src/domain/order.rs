//! Order intents and executed trades.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
}

/// An order the strategy wants placed. Never edited after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub side: Side,
    pub size: f64,
    pub price: f64,
    pub symbol: String,
    pub order_type: OrderType,
}

impl OrderIntent {
    pub fn market(side: Side, size: f64, price: f64, symbol: &str) -> Self {
        OrderIntent {
            side,
            size,
            price,
            symbol: symbol.to_string(),
            order_type: OrderType::Market,
        }
    }
}

/// Executed order, as written to the trade log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub side: Side,
    pub size: f64,
    #[serde(rename = "price")]
    pub fill_price: f64,
    pub commission: f64,
}
