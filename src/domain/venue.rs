//! Venue-facing value types and the per-bar venue snapshot.
//!
//! The strategy never talks to a venue directly. The caller queries the venue
//! before each step and hands the answers over as a [`VenueSnapshot`].

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use super::error::HighedgeError;
use super::order::{Side, Trade};
use super::position::Position;
use crate::ports::venue_port::VenuePort;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Account {
    pub cash: f64,
    pub equity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatusFilter {
    Open,
    Closed,
    All,
}

/// An order resting at the venue.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueOrder {
    pub symbol: String,
    pub side: Side,
    pub size: f64,
}

/// Answer to `place_order`: a simulated fill or a plain acknowledgement.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderAck {
    Filled(Trade),
    Acknowledged,
}

/// Venue implementations selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueKind {
    Simulated,
    Shadow,
}

impl fmt::Display for VenueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VenueKind::Simulated => f.write_str("simulated"),
            VenueKind::Shadow => f.write_str("shadow"),
        }
    }
}

impl FromStr for VenueKind {
    type Err = HighedgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simulated" | "paper" => Ok(VenueKind::Simulated),
            "shadow" => Ok(VenueKind::Shadow),
            other => Err(HighedgeError::UnsupportedVenue {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueSnapshot {
    /// `None` when the account query failed; no entries are sized that bar.
    pub account: Option<Account>,
    pub positions: Vec<Position>,
    pub open_orders: Vec<VenueOrder>,
}

impl VenueSnapshot {
    /// Query the venue. Failures are logged and fail open: a failed
    /// position or order listing is treated as empty.
    pub fn capture<V: VenuePort + ?Sized>(venue: &V) -> Self {
        let account = match venue.get_account() {
            Ok(account) => Some(account),
            Err(err) => {
                warn!(error = %err, "account query failed; entries blocked for this bar");
                None
            }
        };

        let positions = venue.get_all_positions().unwrap_or_else(|err| {
            warn!(error = %err, "position query failed; assuming no open positions");
            Vec::new()
        });

        let open_orders = venue
            .get_orders(OrderStatusFilter::Open, None)
            .unwrap_or_else(|err| {
                warn!(error = %err, "order query failed; assuming no conflicting orders");
                Vec::new()
            });

        VenueSnapshot {
            account,
            positions,
            open_orders,
        }
    }

    pub fn total_positions(&self) -> usize {
        self.positions.len()
    }

    pub fn positions_for(&self, symbol: &str) -> usize {
        self.positions.iter().filter(|p| p.symbol == symbol).count()
    }

    pub fn has_open_order(&self, symbol: &str) -> bool {
        self.open_orders.iter().any(|o| o.symbol == symbol)
    }
}
