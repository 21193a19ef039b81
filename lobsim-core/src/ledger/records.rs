//! Append-only log rows
//!
//! Prices stay in 9-decimal fixed point. The `*_f64` helpers exist for
//! statistics only; accounting goes through `Decimal`.

use crate::core::{fixed_point, Side, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One bot execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillRecord {
    pub ts_event: Timestamp,
    pub price: u64,
    /// Positive when the bot bought, negative when it sold
    pub size: i64,
    /// Mid of the last reconstructed book at fill time
    pub mid: Option<u64>,
}

impl FillRecord {
    pub fn new(ts_event: Timestamp, price: u64, executed: u64, side: Side, mid: Option<u64>) -> Self {
        Self {
            ts_event,
            price,
            size: executed as i64 * side.sign(),
            mid,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        if self.size >= 0 {
            Side::Bid
        } else {
            Side::Ask
        }
    }

    #[inline]
    pub fn abs_size(&self) -> u64 {
        self.size.unsigned_abs()
    }

    /// Signed notional, positive for buys
    pub fn notional(&self) -> Decimal {
        fixed_point::to_decimal(self.price) * Decimal::from(self.size)
    }

    /// Edge captured against the reference mid, `None` without a mid
    pub fn edge(&self) -> Option<Decimal> {
        let mid = fixed_point::to_decimal(self.mid?);
        Some((mid - fixed_point::to_decimal(self.price)) * Decimal::from(self.size))
    }
}

/// Market top of book next to the bot's own best quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub ts_event: Timestamp,
    pub market_bid: u64,
    pub market_ask: u64,
    pub bot_bid: Option<u64>,
    pub bot_ask: Option<u64>,
}

impl QuoteSnapshot {
    #[inline]
    pub fn bot_quotes(&self) -> (Option<u64>, Option<u64>) {
        (self.bot_bid, self.bot_ask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fill_sign_follows_side() {
        let buy = FillRecord::new(1, 10_000_000_000, 40, Side::Bid, None);
        let sell = FillRecord::new(1, 10_000_000_000, 40, Side::Ask, None);
        assert_eq!(buy.size, 40);
        assert_eq!(sell.size, -40);
        assert_eq!(sell.side(), Side::Ask);
        assert_eq!(sell.abs_size(), 40);
    }

    #[test]
    fn test_notional_and_edge() {
        // Sold 10 at 10.02 with mid 10.01: edge = (10.01 - 10.02) * -10 = 0.10
        let fill = FillRecord::new(5, 10_020_000_000, 10, Side::Ask, Some(10_010_000_000));
        assert_eq!(fill.notional(), dec!(-100.2));
        assert_eq!(fill.edge(), Some(dec!(0.10)));
        assert_eq!(FillRecord { mid: None, ..fill }.edge(), None);
    }
}
