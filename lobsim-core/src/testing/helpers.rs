//! Test helper utilities for creating events and policies

use crate::core::{fixed_point, ReplayResult, Timestamp, NANOS_PER_SEC};
use crate::data::{LevelsBuilder, MarketEvent, F_LAST};
use crate::engine::{MarketView, QuotingPolicy};
use crate::orderbook::OrderManager;

/// One cent in fixed point
pub const CENT: u64 = 10_000_000;

/// Fixed-point price from a float, e.g. `px(10.05)`
pub fn px(value: f64) -> u64 {
    fixed_point::from_f64(value)
}

/// Evenly spaced ten-level book one cent wide, `size` lots per level
pub fn ladder_event(ts: Timestamp, best_bid: u64, size: u64, flags: u8) -> MarketEvent {
    LevelsBuilder::ladder(best_bid, best_bid + CENT, CENT, size).into_event(ts, flags)
}

/// Book update with an explicit top level on each side and nothing below
pub fn top_of_book_event(
    ts: Timestamp,
    bid: (u64, u64),
    ask: (u64, u64),
    flags: u8,
) -> MarketEvent {
    LevelsBuilder::new()
        .bid_level(0, bid.0, bid.1)
        .ask_level(0, ask.0, ask.1)
        .into_event(ts, flags)
}

/// Trade print that closes its batch
pub fn boundary_trade(ts: Timestamp, price: u64, size: u64, depth: u8) -> MarketEvent {
    MarketEvent::trade(ts, price, size, depth, F_LAST)
}

/// Quoting policy backed by a closure
///
/// ```rust
/// use lobsim_core::core::Side;
/// use lobsim_core::testing::FnPolicy;
///
/// let policy = FnPolicy::new(|view, orders| {
///     orders.place(view.best(Side::Bid), 10, Side::Bid);
/// });
/// # let _ = policy;
/// ```
pub struct FnPolicy<F> {
    decide: F,
    pub calls: u64,
}

impl<F> FnPolicy<F>
where
    F: FnMut(&MarketView<'_>, &mut dyn OrderManager),
{
    pub fn new(decide: F) -> Self {
        Self { decide, calls: 0 }
    }
}

impl<F> QuotingPolicy for FnPolicy<F>
where
    F: FnMut(&MarketView<'_>, &mut dyn OrderManager),
{
    fn decide<M: OrderManager>(&mut self, view: &MarketView<'_>, orders: &mut M) -> ReplayResult<()> {
        self.calls += 1;
        (self.decide)(view, orders);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "FnPolicy"
    }
}

/// Deterministic session: the best bid walks a triangle wave of
/// `amplitude` cents around `base`, one book update per 100ms, a trade at
/// the best bid every fifth event, every third event a batch boundary
pub fn oscillating_session(events: usize, base: u64, amplitude: u64) -> Vec<MarketEvent> {
    let step = NANOS_PER_SEC / 10;
    let period = (2 * amplitude).max(1);
    (0..events)
        .map(|i| {
            let ts = i as u64 * step;
            let phase = (i as u64 / 4) % period;
            let offset = if phase < amplitude { phase } else { period - phase };
            let best_bid = base + offset * CENT;
            let flags = if i % 3 == 2 { F_LAST } else { 0 };
            if i % 5 == 4 {
                MarketEvent::trade(ts, best_bid, 30, 0, flags)
            } else {
                ladder_event(ts, best_bid, 200 + (i as u64 % 7) * 10, flags)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px() {
        assert_eq!(px(10.05), 10_050_000_000);
    }

    #[test]
    fn test_oscillating_session_is_ordered() {
        let events = oscillating_session(500, px(10.0), 5);
        assert_eq!(events.len(), 500);
        assert!(events.windows(2).all(|w| w[0].ts_event() <= w[1].ts_event()));
        assert!(events.iter().any(|e| e.is_trade()));
        assert!(events.iter().any(|e| e.is_boundary(F_LAST)));
    }
}
