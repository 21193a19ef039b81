//! Inventory ledger
//!
//! Owns the bot's signed position and the two append-only logs a run
//! produces. Nothing is ever removed or rewritten once appended.

pub mod records;

pub use records::{FillRecord, QuoteSnapshot};

use crate::core::{Side, Timestamp};
use tracing::debug;

/// Position plus fill and quote history for one run
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    position: i64,
    volume: u64,
    fills: Vec<FillRecord>,
    quotes: Vec<QuoteSnapshot>,
    /// Bot quotes of the last snapshot; `None` until the first one
    last_quote: Option<(Option<u64>, Option<u64>)>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an execution and append it to the fill log
    pub fn record_fill(
        &mut self,
        ts_event: Timestamp,
        price: u64,
        executed: u64,
        side: Side,
        mid: Option<u64>,
    ) -> FillRecord {
        let fill = FillRecord::new(ts_event, price, executed, side, mid);
        self.position += fill.size;
        self.volume += executed;
        debug!(
            "fill {} {} @ {} -> position {}",
            side, executed, price, self.position
        );
        self.fills.push(fill);
        fill
    }

    /// Append a quote snapshot when the bot's best prices moved
    ///
    /// The first call always records. Returns whether a row was appended.
    pub fn record_quote_if_changed(
        &mut self,
        ts_event: Timestamp,
        market_bid: u64,
        market_ask: u64,
        bot_bid: Option<u64>,
        bot_ask: Option<u64>,
    ) -> bool {
        let current = (bot_bid, bot_ask);
        if self.last_quote == Some(current) {
            return false;
        }
        self.last_quote = Some(current);
        self.quotes.push(QuoteSnapshot {
            ts_event,
            market_bid,
            market_ask,
            bot_bid,
            bot_ask,
        });
        true
    }

    #[inline(always)]
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Total unsigned size traded
    pub fn volume(&self) -> u64 {
        self.volume
    }

    pub fn fills(&self) -> &[FillRecord] {
        &self.fills
    }

    pub fn quotes(&self) -> &[QuoteSnapshot] {
        &self.quotes
    }

    /// Hand both logs over, consuming the ledger
    pub fn into_logs(self) -> (Vec<FillRecord>, Vec<QuoteSnapshot>) {
        (self.fills, self.quotes)
    }
}
