//! Pro-rata fill matching against the last reconstructed book
//!
//! When a trade prints at a price where the bot rests, the bot is assumed
//! to fill in the same proportion of its size as the trade consumed of the
//! visible size at that level:
//!
//! ```text
//! fraction = min(trade_size / book_size, 1)      book_size == 0 -> 1
//! executed = min(ceil(resting * fraction), resting)
//! ```
//!
//! `book_size` is read from the book as it stood before the trade. Trades
//! never rebuild the book, so every trade in one batch sees the same
//! pre-batch sizes, fills earlier in the batch notwithstanding.

use crate::core::{Side, Timestamp};
use crate::ledger::{FillRecord, InventoryLedger};
use crate::orderbook::{CombinedOrderBook, OrderManager, RestingOrders};
use tracing::{trace, warn};

/// A trade print as seen by the matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradePrint {
    pub ts_event: Timestamp,
    pub price: u64,
    pub size: u64,
    /// Level index in the book preceding the trade
    pub depth: u8,
}

/// Decides how much of the bot's resting size a trade consumes
pub trait FillPolicy {
    /// Match one trade, mutating resting orders and the ledger
    ///
    /// Returns the fill appended to the ledger, if any.
    fn on_trade(
        &mut self,
        trade: &TradePrint,
        book: &CombinedOrderBook,
        orders: &mut RestingOrders,
        ledger: &mut InventoryLedger,
    ) -> Option<FillRecord>;

    /// Policy name for logging
    fn name(&self) -> &'static str;
}

/// Size executed against a resting order
///
/// Exact integer ceiling of `resting * trade_size / book_size`, never more
/// than `resting`. Zero visible size means the trade consumed the level.
#[inline]
pub fn executed_size(resting: u64, trade_size: u64, book_size: u64) -> u64 {
    if book_size == 0 || trade_size >= book_size {
        return resting;
    }
    let numerator = resting as u128 * trade_size as u128;
    let executed = numerator.div_ceil(book_size as u128);
    executed.min(resting as u128) as u64
}

/// Side of the bot order a trade at `price` would hit
///
/// Bids are checked first, matching the order the book is read in.
#[inline]
pub fn resolve_side(orders: &RestingOrders, price: u64) -> Option<Side> {
    if orders.contains(Side::Bid, price) {
        Some(Side::Bid)
    } else if orders.contains(Side::Ask, price) {
        Some(Side::Ask)
    } else {
        None
    }
}

/// Proportional fill against visible depth
#[derive(Debug, Clone, Copy, Default)]
pub struct ProRataFill;

impl FillPolicy for ProRataFill {
    fn on_trade(
        &mut self,
        trade: &TradePrint,
        book: &CombinedOrderBook,
        orders: &mut RestingOrders,
        ledger: &mut InventoryLedger,
    ) -> Option<FillRecord> {
        let Some(side) = resolve_side(orders, trade.price) else {
            trace!("trade @ {} misses bot orders", trade.price);
            return None;
        };

        let resting = orders.size_at(side, trade.price);
        let book_size = book.size_at(side, trade.depth as usize);
        if book_size == 0 {
            warn!(
                "zero book size at {} depth {} for trade @ {}, treating as full consumption",
                side, trade.depth, trade.price
            );
        }

        let executed = executed_size(resting, trade.size, book_size);
        if executed == 0 {
            trace!("trade @ {} of size 0 leaves bot order untouched", trade.price);
            return None;
        }

        let taken = orders.reduce(side, trade.price, executed);
        debug_assert_eq!(taken, executed);
        Some(ledger.record_fill(trade.ts_event, trade.price, taken, side, book.mid_price()))
    }

    fn name(&self) -> &'static str {
        "ProRataFill"
    }
}

/// Matcher that never fills, for quote-only replays
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFill;

impl FillPolicy for NoFill {
    #[inline(always)]
    fn on_trade(
        &mut self,
        _trade: &TradePrint,
        _book: &CombinedOrderBook,
        _orders: &mut RestingOrders,
        _ledger: &mut InventoryLedger,
    ) -> Option<FillRecord> {
        None
    }

    fn name(&self) -> &'static str {
        "NoFill"
    }
}
