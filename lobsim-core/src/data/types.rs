//! Row types produced by the ingestion layer
//!
//! Rows arrive pre-sorted by `ts_event`, pre-filtered to one instrument and
//! one trading session. Prices use 9-decimal fixed-point, sizes are lots.

use super::constants::ORDERBOOK_DEPTH;
use crate::core::{fixed_point, Side, Timestamp};
use serde::{Deserialize, Serialize};

/// Ten levels per side of a market-by-price snapshot
///
/// Bids are sorted descending (best first), asks ascending (best first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookLevels {
    pub bid_prices: [u64; ORDERBOOK_DEPTH],
    pub bid_sizes: [u64; ORDERBOOK_DEPTH],
    pub ask_prices: [u64; ORDERBOOK_DEPTH],
    pub ask_sizes: [u64; ORDERBOOK_DEPTH],
}

impl BookLevels {
    #[inline(always)]
    pub fn prices(&self, side: Side) -> &[u64; ORDERBOOK_DEPTH] {
        match side {
            Side::Bid => &self.bid_prices,
            Side::Ask => &self.ask_prices,
        }
    }

    #[inline(always)]
    pub fn sizes(&self, side: Side) -> &[u64; ORDERBOOK_DEPTH] {
        match side {
            Side::Bid => &self.bid_sizes,
            Side::Ask => &self.ask_sizes,
        }
    }

    #[inline(always)]
    pub fn best_bid_price(&self) -> u64 {
        self.bid_prices[0]
    }

    #[inline(always)]
    pub fn best_ask_price(&self) -> u64 {
        self.ask_prices[0]
    }

    /// Mid of the top level, `None` while either side is empty
    #[inline]
    pub fn mid_price(&self) -> Option<u64> {
        let (bid, ask) = (self.best_bid_price(), self.best_ask_price());
        if bid == 0 || ask == 0 {
            return None;
        }
        Some(fixed_point::mid(bid, ask))
    }
}

/// One replayed row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MarketEvent {
    /// Full 10-level snapshot of the visible market
    BookUpdate {
        ts_event: Timestamp,
        #[serde(default)]
        flags: u8,
        levels: BookLevels,
    },
    /// Trade print against the visible book
    Trade {
        ts_event: Timestamp,
        #[serde(default)]
        flags: u8,
        price: u64,
        size: u64,
        /// Level the trade printed at in the book preceding it
        depth: u8,
    },
}

impl MarketEvent {
    pub fn book(ts_event: Timestamp, levels: BookLevels, flags: u8) -> Self {
        MarketEvent::BookUpdate {
            ts_event,
            flags,
            levels,
        }
    }

    pub fn trade(ts_event: Timestamp, price: u64, size: u64, depth: u8, flags: u8) -> Self {
        MarketEvent::Trade {
            ts_event,
            flags,
            price,
            size,
            depth,
        }
    }

    #[inline(always)]
    pub fn ts_event(&self) -> Timestamp {
        match self {
            MarketEvent::BookUpdate { ts_event, .. } | MarketEvent::Trade { ts_event, .. } => {
                *ts_event
            }
        }
    }

    #[inline(always)]
    pub fn flags(&self) -> u8 {
        match self {
            MarketEvent::BookUpdate { flags, .. } | MarketEvent::Trade { flags, .. } => *flags,
        }
    }

    /// True when this row closes an atomic batch
    #[inline(always)]
    pub fn is_boundary(&self, threshold: u8) -> bool {
        self.flags() >= threshold
    }

    #[inline(always)]
    pub fn is_trade(&self) -> bool {
        matches!(self, MarketEvent::Trade { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::constants::F_LAST;

    #[test]
    fn test_boundary_flag() {
        let ev = MarketEvent::trade(1, 10_000_000_000, 5, 0, F_LAST);
        assert!(ev.is_boundary(F_LAST));
        assert!(!MarketEvent::trade(1, 10_000_000_000, 5, 0, 0).is_boundary(F_LAST));
        // 130 = F_LAST | F_SNAPSHOT-style extra bits still counts
        assert!(MarketEvent::trade(1, 10_000_000_000, 5, 0, 130).is_boundary(F_LAST));
    }

    #[test]
    fn test_mid_requires_both_sides() {
        let mut levels = BookLevels::default();
        assert_eq!(levels.mid_price(), None);
        levels.bid_prices[0] = 10_000_000_000;
        levels.ask_prices[0] = 10_020_000_000;
        assert_eq!(levels.mid_price(), Some(10_010_000_000));
    }

    #[test]
    fn test_parses_trade_row() {
        let row = r#"{"action":"trade","ts_event":42,"flags":128,"price":10000000000,"size":40,"depth":0}"#;
        let ev: MarketEvent = serde_json::from_str(row).unwrap();
        assert_eq!(ev, MarketEvent::trade(42, 10_000_000_000, 40, 0, 128));
    }

    #[test]
    fn test_parses_book_row_without_flags() {
        let zeros = "[0,0,0,0,0,0,0,0,0,0]";
        let row = format!(
            r#"{{"action":"book_update","ts_event":7,"levels":{{"bid_prices":{z},"bid_sizes":{z},"ask_prices":{z},"ask_sizes":{z}}}}}"#,
            z = zeros
        );
        let ev: MarketEvent = serde_json::from_str(&row).unwrap();
        assert_eq!(ev.ts_event(), 7);
        assert_eq!(ev.flags(), 0);
        assert!(!ev.is_trade());
    }
}
