//! Momentum / mean-reversion strategy with ATR brackets.
//!
//! Each bar:
//! 1. Update indicators and advance the cooldown counter.
//! 2. While in a position, exit on the first touch of stop or target.
//! 3. While flat, combine the reversion and momentum signals and enter if the
//!    signal is new, the cooldown has elapsed, and the risk gate approves.
//!
//! Only one position is held at a time. Exits always close the full size.

use tracing::{debug, info};

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorSet, IndicatorSnapshot, IndicatorWindows};
use crate::domain::order::{OrderIntent, Side};
use crate::domain::risk::{RiskGate, RiskLimits};
use crate::domain::strategy::Strategy;
use crate::domain::venue::VenueSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct HighEdgeParams {
    pub short_window: usize,
    pub long_window: usize,
    /// Momentum fires when |short EMA - long EMA| exceeds this fraction of price.
    pub ema_threshold: f64,
    pub zscore_window: usize,
    pub zscore_threshold: f64,
    pub atr_window: usize,
    pub stop_atr_mult: f64,
    /// Target distance as a multiple of stop distance.
    pub target_mult: f64,
    /// Fraction of equity committed per entry.
    pub size_fraction: f64,
    /// Bars that must pass after an entry or exit before the next entry.
    pub cooldown: usize,
    pub risk: RiskLimits,
}

impl Default for HighEdgeParams {
    fn default() -> Self {
        HighEdgeParams {
            short_window: 5,
            long_window: 60,
            ema_threshold: 0.001,
            zscore_window: 60,
            zscore_threshold: 1.0,
            atr_window: 1,
            stop_atr_mult: 1.2,
            target_mult: 1.8,
            size_fraction: 0.1,
            cooldown: 5,
            risk: RiskLimits::default(),
        }
    }
}

impl HighEdgeParams {
    pub fn windows(&self) -> IndicatorWindows {
        IndicatorWindows {
            short: self.short_window,
            long: self.long_window,
            zscore: self.zscore_window,
            atr: self.atr_window,
        }
    }
}

/// Directional view for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Short,
    Neutral,
    Long,
}

impl Signal {
    pub fn side(&self) -> Option<Side> {
        match self {
            Signal::Long => Some(Side::Buy),
            Signal::Short => Some(Side::Sell),
            Signal::Neutral => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
    Short,
}

/// Short EMA leading the long EMA by more than `threshold * price`.
pub fn momentum_signal(short_ema: f64, long_ema: f64, price: f64, threshold: f64) -> Signal {
    let diff = short_ema - long_ema;
    let band = threshold * price;
    if diff > band {
        Signal::Long
    } else if diff < -band {
        Signal::Short
    } else {
        Signal::Neutral
    }
}

/// Fade stretched prices: far below VWAP is a long, far above a short.
pub fn reversion_signal(zscore: f64, threshold: f64) -> Signal {
    if zscore < -threshold {
        Signal::Long
    } else if zscore > threshold {
        Signal::Short
    } else {
        Signal::Neutral
    }
}

/// Reversion takes precedence whenever it has an opinion.
pub fn combined_signal(reversion: Signal, momentum: Signal) -> Signal {
    if reversion != Signal::Neutral {
        reversion
    } else {
        momentum
    }
}

/// Stop and target prices for an entry at `price`.
pub fn bracket(side: Side, price: f64, stop_distance: f64, target_distance: f64) -> (f64, f64) {
    match side {
        Side::Buy => (price - stop_distance, price + target_distance),
        Side::Sell => (price + stop_distance, price - target_distance),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OpenTrade {
    side: Side,
    entry_price: f64,
    stop_price: f64,
    target_price: f64,
    size: f64,
}

#[derive(Debug, Clone)]
pub struct HighEdgeStrategy {
    symbol: String,
    params: HighEdgeParams,
    risk: RiskGate,
    indicators: IndicatorSet,
    position: PositionState,
    open_trade: Option<OpenTrade>,
    bars_since_last_entry: usize,
    prev_signal: Signal,
    start_equity: f64,
}

impl HighEdgeStrategy {
    pub fn new(symbol: &str, params: HighEdgeParams) -> Self {
        HighEdgeStrategy {
            symbol: symbol.to_string(),
            risk: RiskGate::new(params.risk),
            indicators: IndicatorSet::new(params.windows()),
            position: PositionState::Flat,
            open_trade: None,
            // Start out of cooldown so the first signal can trade.
            bars_since_last_entry: params.cooldown,
            prev_signal: Signal::Neutral,
            start_equity: 0.0,
            params,
        }
    }

    pub fn position(&self) -> PositionState {
        self.position
    }

    pub fn entry_price(&self) -> Option<f64> {
        self.open_trade.map(|t| t.entry_price)
    }

    pub fn stop_price(&self) -> Option<f64> {
        self.open_trade.map(|t| t.stop_price)
    }

    pub fn target_price(&self) -> Option<f64> {
        self.open_trade.map(|t| t.target_price)
    }

    pub fn position_size(&self) -> Option<f64> {
        self.open_trade.map(|t| t.size)
    }

    pub fn bars_since_last_entry(&self) -> usize {
        self.bars_since_last_entry
    }

    pub fn prev_signal(&self) -> Signal {
        self.prev_signal
    }

    pub fn start_equity(&self) -> f64 {
        self.start_equity
    }

    fn check_exit(&mut self, bar: &Bar) -> Option<OrderIntent> {
        let trade = self.open_trade?;
        let hit = match trade.side {
            Side::Buy => bar.low <= trade.stop_price || bar.high >= trade.target_price,
            Side::Sell => bar.high >= trade.stop_price || bar.low <= trade.target_price,
        };
        if !hit {
            return None;
        }
        let side = trade.side.opposite();

        info!(
            symbol = %self.symbol,
            %side,
            size = trade.size,
            price = bar.close,
            stop = trade.stop_price,
            target = trade.target_price,
            "exit"
        );
        self.position = PositionState::Flat;
        self.open_trade = None;
        self.bars_since_last_entry = 0;
        Some(OrderIntent::market(side, trade.size, bar.close, &self.symbol))
    }

    fn check_entry(
        &mut self,
        bar: &Bar,
        ind: &IndicatorSnapshot,
        venue: &VenueSnapshot,
    ) -> Option<OrderIntent> {
        let price = bar.close;
        let signal = combined_signal(
            reversion_signal(ind.zscore, self.params.zscore_threshold),
            momentum_signal(ind.short_ema, ind.long_ema, price, self.params.ema_threshold),
        );
        let side = signal.side()?;
        if signal == self.prev_signal || self.bars_since_last_entry < self.params.cooldown {
            return None;
        }

        let Some(account) = venue.account else {
            debug!(symbol = %self.symbol, "no account snapshot; entry skipped");
            return None;
        };
        if let Err(rejection) =
            self.risk
                .evaluate(&self.symbol, self.start_equity, account.equity, venue)
        {
            debug!(symbol = %self.symbol, %rejection, "entry rejected by risk gate");
            return None;
        }

        let size = account.equity * self.params.size_fraction / price;
        if !(size.is_finite() && size > 0.0) {
            debug!(symbol = %self.symbol, size, "entry size not positive; skipped");
            return None;
        }

        let stop_distance = self.params.stop_atr_mult * ind.atr;
        let target_distance = self.params.target_mult * stop_distance;
        let (stop_price, target_price) = bracket(side, price, stop_distance, target_distance);

        self.position = match side {
            Side::Buy => PositionState::Long,
            Side::Sell => PositionState::Short,
        };
        self.open_trade = Some(OpenTrade {
            side,
            entry_price: price,
            stop_price,
            target_price,
            size,
        });
        self.prev_signal = signal;
        self.bars_since_last_entry = 0;

        info!(
            symbol = %self.symbol,
            %side,
            size,
            price,
            stop = stop_price,
            target = target_price,
            zscore = ind.zscore,
            atr = ind.atr,
            "entry"
        );
        Some(OrderIntent::market(side, size, price, &self.symbol))
    }
}

impl Strategy for HighEdgeStrategy {
    fn name(&self) -> &'static str {
        "high_edge"
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Begin a fresh session: indicators warm up again and the position is flat.
    fn on_start(&mut self, start_equity: f64) {
        self.indicators.reset();
        self.position = PositionState::Flat;
        self.open_trade = None;
        self.prev_signal = Signal::Neutral;
        self.bars_since_last_entry = self.params.cooldown;
        self.start_equity = start_equity;
        info!(symbol = %self.symbol, start_equity, "high_edge started");
    }

    fn step(&mut self, bar: &Bar, venue: &VenueSnapshot) -> Vec<OrderIntent> {
        let snapshot = self.indicators.update(bar);
        self.bars_since_last_entry = self.bars_since_last_entry.saturating_add(1);

        if self.position != PositionState::Flat {
            return self.check_exit(bar).into_iter().collect();
        }

        let Some(ind) = snapshot else {
            return Vec::new();
        };
        self.check_entry(bar, &ind, venue).into_iter().collect()
    }

    fn on_stop(&mut self) {
        info!(
            symbol = %self.symbol,
            position = ?self.position,
            "high_edge stopped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::{Position, PositionSide};
    use crate::domain::venue::Account;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn bar(i: usize, close: f64, high: f64, low: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap()
                + chrono::Duration::minutes(i as i64),
            open: close,
            high,
            low,
            close,
            volume: 1_000.0,
        }
    }

    /// Closes alternate 100 / 110 with a range of 2 around each close.
    fn zigzag(i: usize) -> Bar {
        let close = if i % 2 == 0 { 100.0 } else { 110.0 };
        bar(i, close, close + 1.0, close - 1.0)
    }

    /// Windows of one or two bars so every value can be checked by hand:
    /// both EMAs equal the close, and the two-bar z-score is +1 on an up bar
    /// and -1 on a down bar.
    fn hand_params(cooldown: usize) -> HighEdgeParams {
        HighEdgeParams {
            short_window: 1,
            long_window: 1,
            ema_threshold: 0.001,
            zscore_window: 2,
            zscore_threshold: 0.5,
            atr_window: 1,
            stop_atr_mult: 1.0,
            target_mult: 1.0,
            size_fraction: 0.1,
            cooldown,
            risk: RiskLimits::default(),
        }
    }

    fn venue(equity: f64) -> VenueSnapshot {
        VenueSnapshot {
            account: Some(Account {
                cash: equity,
                equity,
            }),
            positions: vec![],
            open_orders: vec![],
        }
    }

    fn started(params: HighEdgeParams) -> HighEdgeStrategy {
        let mut s = HighEdgeStrategy::new("SPY", params);
        s.on_start(100_000.0);
        s
    }

    #[test]
    fn momentum_signal_thresholds() {
        assert_eq!(momentum_signal(101.0, 100.0, 100.0, 0.001), Signal::Long);
        assert_eq!(momentum_signal(99.0, 100.0, 100.0, 0.001), Signal::Short);
        assert_eq!(momentum_signal(100.05, 100.0, 100.0, 0.001), Signal::Neutral);
    }

    #[test]
    fn reversion_signal_thresholds() {
        assert_eq!(reversion_signal(-1.5, 1.0), Signal::Long);
        assert_eq!(reversion_signal(1.5, 1.0), Signal::Short);
        assert_eq!(reversion_signal(1.0, 1.0), Signal::Neutral);
    }

    #[test]
    fn reversion_overrides_momentum() {
        assert_eq!(combined_signal(Signal::Short, Signal::Long), Signal::Short);
        assert_eq!(combined_signal(Signal::Neutral, Signal::Long), Signal::Long);
        assert_eq!(combined_signal(Signal::Neutral, Signal::Neutral), Signal::Neutral);
    }

    #[test]
    fn bracket_orientation() {
        assert_eq!(bracket(Side::Buy, 100.0, 2.0, 3.0), (98.0, 103.0));
        assert_eq!(bracket(Side::Sell, 100.0, 2.0, 3.0), (102.0, 97.0));
    }

    #[test]
    fn no_orders_during_warmup() {
        let mut s = started(HighEdgeParams::default());
        for i in 0..59 {
            assert!(s.step(&zigzag(i), &venue(100_000.0)).is_empty());
        }
        assert_eq!(s.position(), PositionState::Flat);
    }

    #[test]
    fn up_bar_enters_short_with_bracket() {
        let mut s = started(hand_params(5));
        assert!(s.step(&zigzag(0), &venue(100_000.0)).is_empty());

        let orders = s.step(&zigzag(1), &venue(100_000.0));
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.price, 110.0);
        assert_relative_eq!(order.size, 100_000.0 * 0.1 / 110.0, epsilon = 1e-9);

        assert_eq!(s.position(), PositionState::Short);
        assert_eq!(s.entry_price(), Some(110.0));
        assert_relative_eq!(s.stop_price().unwrap(), 112.0, epsilon = 1e-9);
        assert_relative_eq!(s.target_price().unwrap(), 108.0, epsilon = 1e-9);
        assert_eq!(s.prev_signal(), Signal::Short);
        assert_eq!(s.bars_since_last_entry(), 0);
    }

    #[test]
    fn restart_clears_position_and_warmup() {
        let mut s = started(hand_params(5));
        s.step(&zigzag(0), &venue(100_000.0));
        assert_eq!(s.step(&zigzag(1), &venue(100_000.0)).len(), 1);
        assert_eq!(s.position(), PositionState::Short);

        s.on_start(50_000.0);

        assert_eq!(s.position(), PositionState::Flat);
        assert_eq!(s.entry_price(), None);
        assert_eq!(s.stop_price(), None);
        assert_eq!(s.prev_signal(), Signal::Neutral);
        assert_eq!(s.bars_since_last_entry(), 5);
        assert_eq!(s.start_equity(), 50_000.0);

        // Indicators warm up again before the same short can fire.
        assert!(s.step(&zigzag(2), &venue(50_000.0)).is_empty());
        let orders = s.step(&zigzag(3), &venue(50_000.0));
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].side, Side::Sell);
    }

    #[test]
    fn target_touch_exits_full_size() {
        let mut s = started(hand_params(5));
        s.step(&zigzag(0), &venue(100_000.0));
        let entry = s.step(&zigzag(1), &venue(100_000.0)).remove(0);

        // Low of 99 is through the 108 target.
        let exit = s.step(&zigzag(2), &venue(100_000.0));
        assert_eq!(exit.len(), 1);
        assert_eq!(exit[0].side, Side::Buy);
        assert_eq!(exit[0].size, entry.size);
        assert_eq!(exit[0].price, 100.0);
        assert_eq!(s.position(), PositionState::Flat);
        assert_eq!(s.stop_price(), None);
        assert_eq!(s.bars_since_last_entry(), 0);
        // The last signal survives the exit.
        assert_eq!(s.prev_signal(), Signal::Short);
    }

    #[test]
    fn long_stop_touch_exits() {
        let mut s = started(hand_params(0));
        s.step(&zigzag(0), &venue(100_000.0));
        s.step(&zigzag(1), &venue(100_000.0));
        s.step(&zigzag(2), &venue(100_000.0));
        // Down bar after the short exit: new long signal, cooldown of zero.
        let entry = s.step(&bar(3, 95.0, 96.0, 94.0), &venue(100_000.0));
        assert_eq!(entry[0].side, Side::Buy);
        assert_eq!(s.position(), PositionState::Long);
        let stop = s.stop_price().unwrap();
        let target = s.target_price().unwrap();
        assert!(stop < 95.0 && target > 95.0);

        // Inside the bracket: hold.
        assert!(s.step(&bar(4, 95.0, 95.5, 94.5), &venue(100_000.0)).is_empty());
        // Low touches the stop exactly.
        let exit = s.step(&bar(5, 94.0, 95.0, stop), &venue(100_000.0));
        assert_eq!(exit[0].side, Side::Sell);
        assert_eq!(s.position(), PositionState::Flat);
    }

    #[test]
    fn repeated_signal_does_not_reenter() {
        let mut s = started(hand_params(0));
        s.step(&zigzag(0), &venue(100_000.0));
        s.step(&zigzag(1), &venue(100_000.0)); // short entry
        s.step(&zigzag(2), &venue(100_000.0)); // exit
        // Another up bar repeats the short signal.
        assert!(s.step(&zigzag(3), &venue(100_000.0)).is_empty());
        assert_eq!(s.position(), PositionState::Flat);
    }

    #[test]
    fn cooldown_spaces_entries() {
        let mut s = started(hand_params(5));
        let mut entries = Vec::new();
        let mut flat_before = true;
        for i in 0..20 {
            let orders = s.step(&zigzag(i), &venue(100_000.0));
            if flat_before && !orders.is_empty() {
                entries.push(i);
            }
            flat_before = s.position() == PositionState::Flat;
        }
        assert_eq!(entries, vec![1, 8, 15]);
        for pair in entries.windows(2) {
            assert!(pair[1] - pair[0] >= 5);
        }
    }

    #[test]
    fn missing_account_blocks_entry() {
        let mut s = started(hand_params(0));
        s.step(&zigzag(0), &VenueSnapshot::default());
        assert!(s.step(&zigzag(1), &VenueSnapshot::default()).is_empty());
        assert_eq!(s.position(), PositionState::Flat);
        // Signal memory is untouched, so the next opportunity still trades.
        assert_eq!(s.prev_signal(), Signal::Neutral);
    }

    #[test]
    fn drawdown_blocks_entry() {
        let mut s = started(hand_params(0));
        s.step(&zigzag(0), &venue(96_000.0));
        assert!(s.step(&zigzag(1), &venue(96_000.0)).is_empty());
    }

    #[test]
    fn per_symbol_cap_blocks_entry() {
        let mut params = hand_params(0);
        params.risk.max_positions_per_symbol = 1;
        let mut s = started(params);
        let mut v = venue(100_000.0);
        v.positions.push(Position {
            symbol: "SPY".into(),
            side: PositionSide::Long,
            size: 1.0,
            entry_price: 100.0,
            commission_paid: 0.0,
        });
        s.step(&zigzag(0), &v);
        assert!(s.step(&zigzag(1), &v).is_empty());
    }

    #[test]
    fn zero_equity_sizes_nothing() {
        let mut s = HighEdgeStrategy::new("SPY", hand_params(0));
        s.on_start(0.0);
        s.step(&zigzag(0), &venue(0.0));
        assert!(s.step(&zigzag(1), &venue(0.0)).is_empty());
        assert_eq!(s.position(), PositionState::Flat);
    }

    #[test]
    fn flat_market_never_trades() {
        let mut s = started(HighEdgeParams::default());
        for i in 0..200 {
            assert!(s.step(&bar(i, 100.0, 100.5, 99.5), &venue(100_000.0)).is_empty());
        }
    }
}
