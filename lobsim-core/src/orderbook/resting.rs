//! Bot-owned resting orders and the order-management interface
//!
//! One price key per level, one size per key. `place` overwrites, it never
//! accumulates, and a key disappears the moment its size reaches zero. The
//! maps are ordered so best-price queries are O(log n) without a scan.

use crate::core::Side;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Commands a quoting policy may issue against the bot's resting orders
///
/// Both commands are synchronous and always accepted. There is no
/// rejection or acknowledgement path.
pub trait OrderManager {
    /// Set the resting size at `price` to exactly `size`
    ///
    /// A size of zero removes the key.
    fn place(&mut self, price: u64, size: u64, side: Side);

    /// Remove the order at `price`, silently ignoring unknown prices
    fn cancel(&mut self, price: u64, side: Side);

    /// Current resting orders on one side, keyed by price
    fn orders(&self, side: Side) -> &BTreeMap<u64, u64>;
}

/// Per-side price → size maps for the bot's own orders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestingOrders {
    bids: BTreeMap<u64, u64>,
    asks: BTreeMap<u64, u64>,
}

impl RestingOrders {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    fn side_mut(&mut self, side: Side) -> &mut BTreeMap<u64, u64> {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    #[inline(always)]
    fn side_ref(&self, side: Side) -> &BTreeMap<u64, u64> {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Resting size at an exact price, 0 if nothing rests there
    #[inline]
    pub fn size_at(&self, side: Side, price: u64) -> u64 {
        self.side_ref(side).get(&price).copied().unwrap_or(0)
    }

    #[inline]
    pub fn contains(&self, side: Side, price: u64) -> bool {
        self.side_ref(side).contains_key(&price)
    }

    /// Highest resting bid
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.keys().next_back().copied()
    }

    /// Lowest resting ask
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.keys().next().copied()
    }

    #[inline]
    pub fn best(&self, side: Side) -> Option<u64> {
        match side {
            Side::Bid => self.best_bid(),
            Side::Ask => self.best_ask(),
        }
    }

    /// Number of distinct price keys on one side
    pub fn count(&self, side: Side) -> usize {
        self.side_ref(side).len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Total resting size on one side
    pub fn total_size(&self, side: Side) -> u64 {
        self.side_ref(side).values().sum()
    }

    /// Take up to `quantity` off the order at `price`
    ///
    /// Returns the size actually removed, never more than what was resting.
    /// The key is deleted once its size reaches zero.
    pub fn reduce(&mut self, side: Side, price: u64, quantity: u64) -> u64 {
        let book = self.side_mut(side);
        let Some(resting) = book.get_mut(&price) else {
            return 0;
        };
        let taken = quantity.min(*resting);
        *resting -= taken;
        if *resting == 0 {
            book.remove(&price);
        }
        taken
    }
}

impl OrderManager for RestingOrders {
    fn place(&mut self, price: u64, size: u64, side: Side) {
        if size == 0 {
            self.cancel(price, side);
            return;
        }
        debug!("place {} {} @ {}", side, size, price);
        self.side_mut(side).insert(price, size);
    }

    fn cancel(&mut self, price: u64, side: Side) {
        match self.side_mut(side).remove(&price) {
            Some(size) => debug!("cancel {} {} @ {}", side, size, price),
            None => trace!("cancel {} @ {} ignored, no resting order", side, price),
        }
    }

    #[inline]
    fn orders(&self, side: Side) -> &BTreeMap<u64, u64> {
        self.side_ref(side)
    }
}
