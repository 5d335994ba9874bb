//! Execution venue port trait.
//!
//! The same four-call contract is served by the simulated engine, the shadow
//! venue, and any live broker adapter.

use crate::domain::error::HighedgeError;
use crate::domain::order::{OrderIntent, Side};
use crate::domain::position::Position;
use crate::domain::venue::{Account, OrderAck, OrderStatusFilter, VenueOrder};

pub trait VenuePort {
    fn place_order(&mut self, intent: &OrderIntent) -> Result<OrderAck, HighedgeError>;

    fn get_account(&self) -> Result<Account, HighedgeError>;

    fn get_all_positions(&self) -> Result<Vec<Position>, HighedgeError>;

    /// Orders matching `status`; `side = None` means both sides.
    fn get_orders(
        &self,
        status: OrderStatusFilter,
        side: Option<Side>,
    ) -> Result<Vec<VenueOrder>, HighedgeError>;

    /// Latest traded price for `symbol`. Venues that mark positions
    /// themselves ignore it.
    fn mark_price(&mut self, _symbol: &str, _price: f64) {}
}
