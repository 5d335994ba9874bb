//! Open position records held by an execution venue.

use super::order::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSide {
    Long,
    Short,
}

impl From<Side> for PositionSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => PositionSide::Long,
            Side::Sell => PositionSide::Short,
        }
    }
}

/// One record per fill. Records are never netted against each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub side: PositionSide,
    pub size: f64,
    pub entry_price: f64,
    pub commission_paid: f64,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long
    }

    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short
    }

    /// Settlement P&L at `price`, net of the entry commission.
    pub fn settlement_pnl(&self, price: f64) -> f64 {
        let gross = match self.side {
            PositionSide::Long => (price - self.entry_price) * self.size,
            PositionSide::Short => (self.entry_price - price) * self.size,
        };
        gross - self.commission_paid
    }

    /// Signed notional at `price`: positive for long, negative for short.
    pub fn signed_value(&self, price: f64) -> f64 {
        match self.side {
            PositionSide::Long => self.size * price,
            PositionSide::Short => -self.size * price,
        }
    }
}
