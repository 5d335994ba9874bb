//! Live session: drive a strategy from a bar stream against a venue.
//!
//! Unlike a backtest there is no settlement at the end. Whatever the venue
//! holds when the stream ends or the session is cancelled stays open.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, info_span, warn};

use super::error::HighedgeError;
use super::strategy::Strategy;
use super::venue::{OrderAck, VenueSnapshot};
use crate::ports::bar_stream_port::BarStreamPort;
use crate::ports::venue_port::VenuePort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    StreamEnded,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSummary {
    pub bars: usize,
    pub orders: usize,
    pub stop_reason: StopReason,
}

pub struct LiveSession<'a> {
    strategy: &'a mut dyn Strategy,
    venue: &'a mut dyn VenuePort,
    stop: &'a AtomicBool,
}

impl<'a> LiveSession<'a> {
    pub fn new(
        strategy: &'a mut dyn Strategy,
        venue: &'a mut dyn VenuePort,
        stop: &'a AtomicBool,
    ) -> Self {
        LiveSession {
            strategy,
            venue,
            stop,
        }
    }

    /// Run until the stream ends, `stop` is raised, or a fatal error occurs.
    ///
    /// The start account is required; per-bar venue queries fail open.
    /// `on_stop` runs on every exit path once `on_start` has run.
    pub fn run(&mut self, stream: &mut dyn BarStreamPort) -> Result<LiveSummary, HighedgeError> {
        let span = info_span!(
            "live",
            symbol = %self.strategy.symbol(),
            strategy = self.strategy.name()
        );
        let _guard = span.enter();

        let account = self.venue.get_account()?;
        self.strategy.on_start(account.equity);
        info!(cash = account.cash, equity = account.equity, "live session started");

        let outcome = self.drive(stream);
        self.strategy.on_stop();

        match &outcome {
            Ok(summary) => info!(
                bars = summary.bars,
                orders = summary.orders,
                reason = ?summary.stop_reason,
                "live session stopped"
            ),
            Err(err) => warn!(error = %err, "live session aborted"),
        }
        outcome
    }

    fn drive(&mut self, stream: &mut dyn BarStreamPort) -> Result<LiveSummary, HighedgeError> {
        let mut bars = 0;
        let mut orders = 0;
        let symbol = self.strategy.symbol().to_string();

        loop {
            if self.stop.load(Ordering::SeqCst) {
                return Ok(LiveSummary {
                    bars,
                    orders,
                    stop_reason: StopReason::Cancelled,
                });
            }
            let Some(bar) = stream.next_bar()? else {
                return Ok(LiveSummary {
                    bars,
                    orders,
                    stop_reason: StopReason::StreamEnded,
                });
            };
            bars += 1;

            self.venue.mark_price(&symbol, bar.close);
            let snapshot = VenueSnapshot::capture(&*self.venue);
            for intent in self.strategy.step(&bar, &snapshot) {
                match self.venue.place_order(&intent)? {
                    OrderAck::Filled(trade) => info!(
                        side = %trade.side,
                        size = trade.size,
                        price = trade.fill_price,
                        "order filled"
                    ),
                    OrderAck::Acknowledged => info!(
                        side = %intent.side,
                        size = intent.size,
                        "order acknowledged"
                    ),
                }
                orders += 1;
            }
        }
    }
}
