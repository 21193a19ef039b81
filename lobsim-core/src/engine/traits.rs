//! Quoting policy contract
//!
//! The engine calls a [`QuotingPolicy`] synchronously at each batch
//! boundary. The policy reads a [`MarketView`] and acts only through the
//! [`OrderManager`] it is handed; it owns no engine state.

use crate::analytics::VolatilitySample;
use crate::core::{ReplayResult, Side, Timestamp};
use crate::orderbook::{CombinedOrderBook, OrderManager};

/// Read-only state handed to the policy
#[derive(Debug, Clone, Copy)]
pub struct MarketView<'a> {
    pub ts_event: Timestamp,
    pub book: &'a CombinedOrderBook,
    /// Signed inventory in lots
    pub position: i64,
    /// Volatility cached at the last refresh, if any lookup has hit yet
    pub volatility: Option<&'a VolatilitySample>,
}

impl<'a> MarketView<'a> {
    #[inline]
    pub fn best(&self, side: Side) -> u64 {
        self.book.best(side)
    }

    #[inline]
    pub fn mid_price(&self) -> Option<u64> {
        self.book.mid_price()
    }

    /// Cached 1-minute midprice deviation
    #[inline]
    pub fn vol_1m(&self) -> Option<f64> {
        self.volatility.and_then(|v| v.vol_1m)
    }
}

/// Trading decisions at batch boundaries
///
/// Implementations are monomorphised into the engine; the order manager is
/// a generic parameter, not a trait object.
pub trait QuotingPolicy {
    /// Checked once before the first event
    ///
    /// A policy that cannot produce prices must fail here instead of
    /// trading on placeholders.
    fn preflight(&self) -> ReplayResult<()> {
        Ok(())
    }

    /// React to the current book, issuing place/cancel commands
    fn decide<M: OrderManager>(&mut self, view: &MarketView<'_>, orders: &mut M) -> ReplayResult<()>;

    /// Policy name for logging
    fn name(&self) -> &'static str;
}

/// Policy that never quotes, for replays that only exercise the book
#[derive(Debug, Clone, Copy, Default)]
pub struct Passive;

impl QuotingPolicy for Passive {
    #[inline(always)]
    fn decide<M: OrderManager>(&mut self, _view: &MarketView<'_>, _orders: &mut M) -> ReplayResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Passive"
    }
}
