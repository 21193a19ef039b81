//! Fluent builder for book-update rows
//!
//! Keeps array sizing tied to `ORDERBOOK_DEPTH` so tests, benches and the
//! synthetic session generator never hand-write ten-element arrays.
//!
//! # Example
//!
//! ```rust
//! use lobsim_core::data::snapshot_builder::LevelsBuilder;
//!
//! // Evenly spaced ladder around 10.00/10.01, 100 lots per level
//! let levels = LevelsBuilder::ladder(10_000_000_000, 10_010_000_000, 10_000_000, 100).build();
//! assert_eq!(levels.bid_prices[1], 9_990_000_000);
//!
//! // Explicit top of book only
//! let event = LevelsBuilder::new()
//!     .bid_level(0, 10_000_000_000, 100)
//!     .ask_level(0, 10_010_000_000, 80)
//!     .into_event(1_000, 128);
//! assert_eq!(event.ts_event(), 1_000);
//! ```

use super::constants::ORDERBOOK_DEPTH;
use super::types::{BookLevels, MarketEvent};
use crate::core::Timestamp;

/// Builder for `BookLevels`
#[derive(Debug, Clone, Default)]
pub struct LevelsBuilder {
    levels: BookLevels,
}

impl LevelsBuilder {
    /// Start from an empty (all-zero) book
    pub fn new() -> Self {
        Self::default()
    }

    /// Evenly spaced ladder: bids step down from `best_bid`, asks step up
    /// from `best_ask`, every level carrying `size`
    pub fn ladder(best_bid: u64, best_ask: u64, tick: u64, size: u64) -> Self {
        let mut levels = BookLevels::default();
        for i in 0..ORDERBOOK_DEPTH {
            let offset = tick * i as u64;
            levels.bid_prices[i] = best_bid.saturating_sub(offset);
            levels.ask_prices[i] = best_ask + offset;
            levels.bid_sizes[i] = size;
            levels.ask_sizes[i] = size;
        }
        Self { levels }
    }

    /// Set a single bid level
    ///
    /// # Panics
    ///
    /// Panics if `level >= ORDERBOOK_DEPTH`.
    pub fn bid_level(mut self, level: usize, price: u64, size: u64) -> Self {
        assert!(
            level < ORDERBOOK_DEPTH,
            "Bid level {} exceeds ORDERBOOK_DEPTH {}",
            level,
            ORDERBOOK_DEPTH
        );
        self.levels.bid_prices[level] = price;
        self.levels.bid_sizes[level] = size;
        self
    }

    /// Set a single ask level
    ///
    /// # Panics
    ///
    /// Panics if `level >= ORDERBOOK_DEPTH`.
    pub fn ask_level(mut self, level: usize, price: u64, size: u64) -> Self {
        assert!(
            level < ORDERBOOK_DEPTH,
            "Ask level {} exceeds ORDERBOOK_DEPTH {}",
            level,
            ORDERBOOK_DEPTH
        );
        self.levels.ask_prices[level] = price;
        self.levels.ask_sizes[level] = size;
        self
    }

    pub fn build(self) -> BookLevels {
        self.levels
    }

    /// Wrap the built levels in a book-update row
    pub fn into_event(self, ts_event: Timestamp, flags: u8) -> MarketEvent {
        MarketEvent::book(ts_event, self.levels, flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_is_monotonic() {
        let levels = LevelsBuilder::ladder(10_000_000_000, 10_010_000_000, 10_000_000, 50).build();
        for i in 1..ORDERBOOK_DEPTH {
            assert!(levels.bid_prices[i] < levels.bid_prices[i - 1]);
            assert!(levels.ask_prices[i] > levels.ask_prices[i - 1]);
        }
        assert!(levels.bid_sizes.iter().all(|&s| s == 50));
    }

    #[test]
    #[should_panic(expected = "exceeds ORDERBOOK_DEPTH")]
    fn test_level_out_of_range_panics() {
        let _ = LevelsBuilder::new().bid_level(ORDERBOOK_DEPTH, 1, 1);
    }
}
