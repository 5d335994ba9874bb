//! Shadow venue: logs what the strategy would trade without trading it.

use crate::domain::error::HighedgeError;
use crate::domain::order::{OrderIntent, Side};
use crate::domain::position::Position;
use crate::domain::venue::{Account, OrderAck, OrderStatusFilter, VenueOrder};
use crate::ports::venue_port::VenuePort;
use tracing::info;

/// Reports a fixed account with no positions or orders, so every signal the
/// risk gate allows is emitted.
pub struct ShadowVenue {
    cash: f64,
    signals: Vec<OrderIntent>,
}

impl ShadowVenue {
    pub fn new(cash: f64) -> Self {
        Self {
            cash,
            signals: Vec::new(),
        }
    }

    pub fn signals(&self) -> &[OrderIntent] {
        &self.signals
    }
}

impl VenuePort for ShadowVenue {
    fn place_order(&mut self, intent: &OrderIntent) -> Result<OrderAck, HighedgeError> {
        info!(
            symbol = %intent.symbol,
            side = %intent.side,
            size = intent.size,
            price = intent.price,
            "shadow signal"
        );
        self.signals.push(intent.clone());
        Ok(OrderAck::Acknowledged)
    }

    fn get_account(&self) -> Result<Account, HighedgeError> {
        Ok(Account {
            cash: self.cash,
            equity: self.cash,
        })
    }

    fn get_all_positions(&self) -> Result<Vec<Position>, HighedgeError> {
        Ok(Vec::new())
    }

    fn get_orders(
        &self,
        _status: OrderStatusFilter,
        _side: Option<Side>,
    ) -> Result<Vec<VenueOrder>, HighedgeError> {
        Ok(Vec::new())
    }
}
