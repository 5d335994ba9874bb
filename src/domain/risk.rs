//! Pre-entry risk checks.
//!
//! The gate is stateless: every call is evaluated against the start-of-run
//! equity and the current venue snapshot. A rejection is an ordinary outcome,
//! not an error.

use std::fmt;

use super::venue::VenueSnapshot;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskLimits {
    /// Fractional drop from start equity that blocks new entries.
    pub daily_drawdown: f64,
    pub max_total_positions: usize,
    pub max_positions_per_symbol: usize,
}

impl Default for RiskLimits {
    fn default() -> Self {
        RiskLimits {
            daily_drawdown: 0.03,
            max_total_positions: 10,
            max_positions_per_symbol: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RiskRejection {
    Drawdown { drawdown: f64, limit: f64 },
    TotalPositions { open: usize, limit: usize },
    SymbolPositions { open: usize, limit: usize },
    PendingOrder,
}

impl fmt::Display for RiskRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskRejection::Drawdown { drawdown, limit } => {
                write!(f, "drawdown {drawdown:.4} reached limit {limit:.4}")
            }
            RiskRejection::TotalPositions { open, limit } => {
                write!(f, "{open} open positions, limit {limit}")
            }
            RiskRejection::SymbolPositions { open, limit } => {
                write!(f, "{open} open positions for symbol, limit {limit}")
            }
            RiskRejection::PendingOrder => f.write_str("symbol already has an open order"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskGate {
    limits: RiskLimits,
}

impl RiskGate {
    pub fn new(limits: RiskLimits) -> Self {
        RiskGate { limits }
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Approve or reject a new entry in `symbol`. Checks run in a fixed
    /// order and the first failure is reported.
    pub fn evaluate(
        &self,
        symbol: &str,
        start_equity: f64,
        equity: f64,
        venue: &VenueSnapshot,
    ) -> Result<(), RiskRejection> {
        let drawdown = drawdown(start_equity, equity);
        if drawdown >= self.limits.daily_drawdown {
            return Err(RiskRejection::Drawdown {
                drawdown,
                limit: self.limits.daily_drawdown,
            });
        }

        let open = venue.total_positions();
        if open >= self.limits.max_total_positions {
            return Err(RiskRejection::TotalPositions {
                open,
                limit: self.limits.max_total_positions,
            });
        }

        let open = venue.positions_for(symbol);
        if open >= self.limits.max_positions_per_symbol {
            return Err(RiskRejection::SymbolPositions {
                open,
                limit: self.limits.max_positions_per_symbol,
            });
        }

        if venue.has_open_order(symbol) {
            return Err(RiskRejection::PendingOrder);
        }

        Ok(())
    }
}

/// `(start - equity) / start`; zero when there is no meaningful start equity.
pub fn drawdown(start_equity: f64, equity: f64) -> f64 {
    if start_equity > 0.0 {
        (start_equity - equity) / start_equity
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Side;
    use crate::domain::position::{Position, PositionSide};
    use crate::domain::venue::{Account, VenueOrder};

    fn position(symbol: &str) -> Position {
        Position {
            symbol: symbol.into(),
            side: PositionSide::Long,
            size: 1.0,
            entry_price: 100.0,
            commission_paid: 0.0,
        }
    }

    fn snapshot(positions: Vec<Position>, open_orders: Vec<VenueOrder>) -> VenueSnapshot {
        VenueSnapshot {
            account: Some(Account {
                cash: 100_000.0,
                equity: 100_000.0,
            }),
            positions,
            open_orders,
        }
    }

    #[test]
    fn clean_venue_is_approved() {
        let gate = RiskGate::new(RiskLimits::default());
        assert!(
            gate.evaluate("SPY", 100_000.0, 100_000.0, &snapshot(vec![], vec![]))
                .is_ok()
        );
    }

    #[test]
    fn drawdown_at_limit_rejects() {
        let gate = RiskGate::new(RiskLimits::default());
        let result = gate.evaluate("SPY", 100_000.0, 97_000.0, &snapshot(vec![], vec![]));
        assert!(matches!(result, Err(RiskRejection::Drawdown { .. })));
    }

    #[test]
    fn drawdown_just_under_limit_passes() {
        let gate = RiskGate::new(RiskLimits::default());
        assert!(
            gate.evaluate("SPY", 100_000.0, 97_500.0, &snapshot(vec![], vec![]))
                .is_ok()
        );
    }

    #[test]
    fn equity_gain_is_never_drawdown() {
        assert!(drawdown(100.0, 150.0) < 0.0);
        assert_eq!(drawdown(0.0, 50.0), 0.0);
    }

    #[test]
    fn per_symbol_cap() {
        let gate = RiskGate::new(RiskLimits {
            max_positions_per_symbol: 1,
            ..RiskLimits::default()
        });
        let venue = snapshot(vec![position("SPY")], vec![]);
        assert_eq!(
            gate.evaluate("SPY", 100_000.0, 100_000.0, &venue),
            Err(RiskRejection::SymbolPositions { open: 1, limit: 1 })
        );
        assert!(gate.evaluate("QQQ", 100_000.0, 100_000.0, &venue).is_ok());
    }

    #[test]
    fn total_cap_checked_before_symbol_cap() {
        let gate = RiskGate::new(RiskLimits {
            daily_drawdown: 0.03,
            max_total_positions: 2,
            max_positions_per_symbol: 1,
        });
        let venue = snapshot(vec![position("SPY"), position("QQQ")], vec![]);
        assert_eq!(
            gate.evaluate("SPY", 100_000.0, 100_000.0, &venue),
            Err(RiskRejection::TotalPositions { open: 2, limit: 2 })
        );
    }

    #[test]
    fn open_order_for_symbol_rejects() {
        let gate = RiskGate::new(RiskLimits::default());
        let venue = snapshot(
            vec![],
            vec![VenueOrder {
                symbol: "SPY".into(),
                side: Side::Buy,
                size: 5.0,
            }],
        );
        assert_eq!(
            gate.evaluate("SPY", 100_000.0, 100_000.0, &venue),
            Err(RiskRejection::PendingOrder)
        );
        assert!(gate.evaluate("QQQ", 100_000.0, 100_000.0, &venue).is_ok());
    }

    #[test]
    fn rejection_display() {
        let r = RiskRejection::SymbolPositions { open: 3, limit: 3 };
        assert_eq!(r.to_string(), "3 open positions for symbol, limit 3");
    }
}
