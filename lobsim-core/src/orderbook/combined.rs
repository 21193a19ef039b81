//! Combined market + bot order book
//!
//! A fixed 10-level book rebuilt wholesale from every book-update row. Each
//! level's size is the market's visible size plus whatever the bot has
//! resting at exactly that price. Trades never touch it; only the next
//! book update does.

use super::resting::{OrderManager, RestingOrders};
use crate::core::Side;
use crate::data::{BookLevels, ORDERBOOK_DEPTH};

/// Ten-level combined book, best level first on both sides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombinedOrderBook {
    levels: BookLevels,
    /// Number of reconstructions applied
    updates: u64,
}

impl CombinedOrderBook {
    /// Empty book: ten zero levels per side
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole book from a raw row plus the bot's resting orders
    ///
    /// Nothing from the previous state survives. Resting orders at prices
    /// outside the visible ten levels do not appear in the book.
    pub fn reconstruct(&mut self, raw: &BookLevels, orders: &RestingOrders) {
        let mut levels = *raw;
        for side in [Side::Bid, Side::Ask] {
            let resting = orders.orders(side);
            if resting.is_empty() {
                continue;
            }
            let (prices, sizes) = match side {
                Side::Bid => (&levels.bid_prices, &mut levels.bid_sizes),
                Side::Ask => (&levels.ask_prices, &mut levels.ask_sizes),
            };
            for (price, size) in prices.iter().zip(sizes.iter_mut()) {
                if let Some(bot) = resting.get(price) {
                    *size = size.saturating_add(*bot);
                }
            }
        }
        self.levels = levels;
        self.updates += 1;
    }

    /// Raw level arrays
    #[inline(always)]
    pub fn levels(&self) -> &BookLevels {
        &self.levels
    }

    /// Reconstructions applied so far
    pub fn update_count(&self) -> u64 {
        self.updates
    }

    #[inline(always)]
    pub fn best_bid_price(&self) -> u64 {
        self.levels.best_bid_price()
    }

    #[inline(always)]
    pub fn best_ask_price(&self) -> u64 {
        self.levels.best_ask_price()
    }

    /// Best price on one side (level 0)
    #[inline(always)]
    pub fn best(&self, side: Side) -> u64 {
        self.levels.prices(side)[0]
    }

    /// Overflow-safe mid of the top level, `None` while either side is empty
    #[inline]
    pub fn mid_price(&self) -> Option<u64> {
        self.levels.mid_price()
    }

    /// Combined size at a depth index
    ///
    /// Indices past the last level read as zero.
    #[inline]
    pub fn size_at(&self, side: Side, depth: usize) -> u64 {
        self.levels.sizes(side).get(depth).copied().unwrap_or(0)
    }

    /// Price at a depth index, zero past the last level
    #[inline]
    pub fn price_at(&self, side: Side, depth: usize) -> u64 {
        self.levels.prices(side).get(depth).copied().unwrap_or(0)
    }

    /// All levels on one side as (price, size) pairs
    ///
    /// Always exactly `ORDERBOOK_DEPTH` entries, empty levels included.
    pub fn side_levels(&self, side: Side) -> [(u64, u64); ORDERBOOK_DEPTH] {
        let prices = self.levels.prices(side);
        let sizes = self.levels.sizes(side);
        std::array::from_fn(|i| (prices[i], sizes[i]))
    }

    /// Number of populated levels on one side
    pub fn depth(&self, side: Side) -> usize {
        self.levels.prices(side).iter().take_while(|&&p| p > 0).count()
    }

    /// Sum of sizes over the first `max_levels` on one side
    pub fn total_liquidity(&self, side: Side, max_levels: usize) -> u64 {
        let max_levels = max_levels.min(ORDERBOOK_DEPTH);
        self.levels.sizes(side).iter().take(max_levels).sum()
    }

    /// Check if book is crossed (bid >= ask)
    #[inline]
    pub fn is_crossed(&self) -> bool {
        let bid = self.best_bid_price();
        let ask = self.best_ask_price();
        bid > 0 && ask > 0 && bid >= ask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LevelsBuilder;
    use proptest::prelude::*;

    const TEN: u64 = 10_000_000_000;
    const TICK: u64 = 10_000_000;

    #[test]
    fn test_new_book_is_empty() {
        let book = CombinedOrderBook::new();
        assert_eq!(book.mid_price(), None);
        assert_eq!(book.depth(Side::Bid), 0);
        assert_eq!(book.side_levels(Side::Ask).len(), ORDERBOOK_DEPTH);
    }

    #[test]
    fn test_reconstruct_adds_resting_at_exact_price() {
        let raw = LevelsBuilder::ladder(TEN, TEN + TICK, TICK, 50).build();
        let mut orders = RestingOrders::new();
        orders.place(TEN - TICK, 25, Side::Bid);
        orders.place(TEN + 3 * TICK, 5, Side::Ask);
        // Between levels: never matched
        orders.place(TEN + 3 * TICK + 1, 7, Side::Ask);

        let mut book = CombinedOrderBook::new();
        book.reconstruct(&raw, &orders);

        assert_eq!(book.size_at(Side::Bid, 0), 50);
        assert_eq!(book.size_at(Side::Bid, 1), 75);
        assert_eq!(book.size_at(Side::Ask, 2), 55);
        assert_eq!(book.total_liquidity(Side::Ask, ORDERBOOK_DEPTH), 505);
    }

    #[test]
    fn test_reconstruct_replaces_wholesale() {
        let mut orders = RestingOrders::new();
        orders.place(TEN, 100, Side::Bid);

        let mut book = CombinedOrderBook::new();
        book.reconstruct(&LevelsBuilder::ladder(TEN, TEN + TICK, TICK, 10).build(), &orders);
        assert_eq!(book.size_at(Side::Bid, 0), 110);

        // Next row no longer shows the level; prior sizes must not leak
        let thinner = LevelsBuilder::new().bid_level(0, TEN - TICK, 4).build();
        book.reconstruct(&thinner, &orders);
        assert_eq!(book.size_at(Side::Bid, 0), 4);
        assert_eq!(book.size_at(Side::Bid, 1), 0);
        assert_eq!(book.best_ask_price(), 0);
        assert_eq!(book.update_count(), 2);
    }

    #[test]
    fn test_out_of_range_depth_reads_zero() {
        let mut book = CombinedOrderBook::new();
        book.reconstruct(
            &LevelsBuilder::ladder(TEN, TEN + TICK, TICK, 10).build(),
            &RestingOrders::new(),
        );
        assert_eq!(book.size_at(Side::Bid, ORDERBOOK_DEPTH), 0);
        assert_eq!(book.price_at(Side::Ask, 255), 0);
    }

    #[test]
    fn test_always_ten_levels_and_sizes_dominate_market() {
        proptest!(|(
            best in 1_000u64..1_000_000,
            size in 0u64..1_000,
            bot_level in 0usize..ORDERBOOK_DEPTH,
            bot_size in 1u64..1_000,
        )| {
            let raw = LevelsBuilder::ladder(best, best + 1, 1, size).build();
            let mut orders = RestingOrders::new();
            orders.place(raw.bid_prices[bot_level], bot_size, Side::Bid);

            let mut book = CombinedOrderBook::new();
            book.reconstruct(&raw, &orders);

            prop_assert_eq!(book.side_levels(Side::Bid).len(), ORDERBOOK_DEPTH);
            prop_assert_eq!(book.side_levels(Side::Ask).len(), ORDERBOOK_DEPTH);
            for i in 0..ORDERBOOK_DEPTH {
                prop_assert!(book.size_at(Side::Bid, i) >= raw.bid_sizes[i]);
                prop_assert_eq!(book.size_at(Side::Ask, i), raw.ask_sizes[i]);
            }
            prop_assert_eq!(book.size_at(Side::Bid, bot_level), size + bot_size);
        });
    }
}
