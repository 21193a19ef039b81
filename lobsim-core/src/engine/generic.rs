//! Generic Replay Engine - Zero Dynamic Dispatch
//!
//! The engine is generic over how trades fill the bot ([`FillPolicy`]) and
//! how the bot quotes ([`QuotingPolicy`]). Both are resolved at compile time.
//!
//! ## Event Processing
//!
//! ```text
//!                  process_event(&MarketEvent)
//!                              │
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │ ts >= current_ts ?    │──No──▶ SequencingViolation
//!                  └───────────────────────┘
//!                              │ Yes
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │ every N events:       │
//!                  │ refresh volatility    │
//!                  └───────────────────────┘
//!                              │
//!                 BookUpdate   │   Trade
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//!     ┌─────────────────┐            ┌───────────────────┐
//!     │ reconstruct     │            │ FillPolicy::      │
//!     │ combined book   │            │ on_trade (stale   │
//!     └─────────────────┘            │ book, no rebuild) │
//!              │                     └───────────────────┘
//!              └───────────────┬───────────────┘
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │ flags >= threshold ?  │──Yes──▶ QuotingPolicy::decide
//!                  └───────────────────────┘
//!                              │
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │ bot quotes changed ?  │──Yes──▶ append QuoteSnapshot
//!                  └───────────────────────┘
//! ```
//!
//! All state lives in the engine value. Two engines never share anything,
//! so multiple instruments are simply multiple engines.

use super::traits::{MarketView, QuotingPolicy};
use crate::analytics::{summarize, RunSummary, RunWindow, VolatilityContext, VolatilitySample};
use crate::config::SimConfig;
use crate::core::{ReplayError, ReplayResult, Side, Timestamp};
use crate::data::{EventFeed, MarketEvent};
use crate::execution::{FillPolicy, TradePrint};
use crate::ledger::InventoryLedger;
use crate::orderbook::{CombinedOrderBook, OrderManager, RestingOrders};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Replay engine over one instrument
///
/// Type parameters:
/// - `F`: fill model applied to trade prints
/// - `Q`: quoting policy invoked at batch boundaries
pub struct Engine<F: FillPolicy, Q: QuotingPolicy> {
    fill_policy: F,
    quoting: Q,
    config: SimConfig,

    /// Precomputed per-second context
    volatility: VolatilityContext,
    /// Sample from the last successful refresh
    cached_volatility: Option<VolatilitySample>,

    book: CombinedOrderBook,
    orders: RestingOrders,
    ledger: InventoryLedger,

    current_ts: Timestamp,
    first_ts: Option<Timestamp>,

    stats: EngineStats,
}

impl<F: FillPolicy, Q: QuotingPolicy> Engine<F, Q> {
    /// Create an engine with default settings
    pub fn new(fill_policy: F, quoting: Q, volatility: VolatilityContext) -> Self {
        Self::build(fill_policy, quoting, SimConfig::default(), volatility)
    }

    /// Create an engine with explicit settings
    pub fn with_config(
        fill_policy: F,
        quoting: Q,
        config: SimConfig,
        volatility: VolatilityContext,
    ) -> ReplayResult<Self> {
        config.validate()?;
        Ok(Self::build(fill_policy, quoting, config, volatility))
    }

    fn build(fill_policy: F, quoting: Q, config: SimConfig, volatility: VolatilityContext) -> Self {
        info!(
            "Initializing engine: {} + {} ({} volatility seconds)",
            fill_policy.name(),
            quoting.name(),
            volatility.len()
        );

        Self {
            fill_policy,
            quoting,
            config,
            volatility,
            cached_volatility: None,
            book: CombinedOrderBook::new(),
            orders: RestingOrders::new(),
            ledger: InventoryLedger::new(),
            current_ts: 0,
            first_ts: None,
            stats: EngineStats::default(),
        }
    }

    /// Fail early if the quoting policy cannot trade
    pub fn preflight(&self) -> ReplayResult<()> {
        self.quoting.preflight()
    }

    /// Process a single market event
    ///
    /// An event older than the last processed one aborts with
    /// `SequencingViolation` and leaves the engine state untouched.
    pub fn process_event(&mut self, event: &MarketEvent) -> ReplayResult<()> {
        let ts = event.ts_event();
        if ts < self.current_ts {
            return Err(ReplayError::SequencingViolation {
                previous: self.current_ts,
                received: ts,
            });
        }

        if self.stats.events_processed % self.config.vol_refresh_interval == 0 {
            self.refresh_volatility(ts);
        }

        match event {
            MarketEvent::BookUpdate { levels, .. } => {
                self.book.reconstruct(levels, &self.orders);
                if self.book.is_crossed() {
                    debug!("crossed book at ts {}", ts);
                }
                self.stats.book_updates += 1;
            }
            MarketEvent::Trade {
                price, size, depth, ..
            } => {
                let trade = TradePrint {
                    ts_event: ts,
                    price: *price,
                    size: *size,
                    depth: *depth,
                };
                self.stats.trades += 1;
                if self
                    .fill_policy
                    .on_trade(&trade, &self.book, &mut self.orders, &mut self.ledger)
                    .is_some()
                {
                    self.stats.fills += 1;
                }
            }
        }

        self.current_ts = ts;
        self.first_ts.get_or_insert(ts);
        self.stats.events_processed += 1;

        if event.is_boundary(self.config.boundary_flag_threshold) {
            let view = MarketView {
                ts_event: ts,
                book: &self.book,
                position: self.ledger.position(),
                volatility: self.cached_volatility.as_ref(),
            };
            self.quoting.decide(&view, &mut self.orders)?;
            self.stats.policy_invocations += 1;
        }

        if self.ledger.record_quote_if_changed(
            ts,
            self.book.best_bid_price(),
            self.book.best_ask_price(),
            self.orders.best_bid(),
            self.orders.best_ask(),
        ) {
            self.stats.quote_snapshots += 1;
        }

        if self.stats.events_processed % self.config.progress_interval == 0 {
            info!(
                "Processed {} events, ts {}, position {}, bid orders {:?}, ask orders {:?}",
                self.stats.events_processed,
                self.current_ts,
                self.ledger.position(),
                self.orders.orders(Side::Bid),
                self.orders.orders(Side::Ask),
            );
        }

        Ok(())
    }

    /// Look up the second containing `ts`; a miss keeps the stale sample
    fn refresh_volatility(&mut self, ts: Timestamp) {
        match self.volatility.lookup_ts(ts) {
            Some(sample) => {
                self.cached_volatility = Some(*sample);
                self.stats.vol_refreshes += 1;
            }
            None => {
                debug!("no volatility sample for ts {}, keeping cached value", ts);
                self.stats.vol_misses += 1;
            }
        }
    }

    /// Run the engine over a feed until it is exhausted
    pub fn run<E: EventFeed>(&mut self, mut feed: E) -> Result<EngineStats> {
        self.preflight()?;
        info!("Starting replay loop");

        while let Some(event) = feed.next_event()? {
            self.process_event(&event)?;
        }

        info!("Market feed ended. Stats: {:?}", self.stats());
        Ok(self.stats())
    }

    /// Summary statistics over the logs so far
    pub fn summarize(&self) -> ReplayResult<RunSummary> {
        summarize(
            self.ledger.fills(),
            self.ledger.quotes(),
            &self.volatility,
            self.run_window(),
            self.config.maker_rebate_per_unit,
        )
    }

    /// First and last processed timestamps
    pub fn run_window(&self) -> RunWindow {
        RunWindow::new(self.first_ts.unwrap_or(0), self.current_ts)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            final_position: self.ledger.position(),
            ..self.stats
        }
    }

    pub fn book(&self) -> &CombinedOrderBook {
        &self.book
    }

    pub fn orders(&self) -> &RestingOrders {
        &self.orders
    }

    /// Mutable access to resting orders, for seeding a run
    pub fn orders_mut(&mut self) -> &mut RestingOrders {
        &mut self.orders
    }

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    #[inline]
    pub fn position(&self) -> i64 {
        self.ledger.position()
    }

    pub fn current_ts(&self) -> Timestamp {
        self.current_ts
    }

    pub fn cached_volatility(&self) -> Option<&VolatilitySample> {
        self.cached_volatility.as_ref()
    }

    pub fn volatility(&self) -> &VolatilityContext {
        &self.volatility
    }

    pub fn quoting(&self) -> &Q {
        &self.quoting
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Consume the engine, keeping only the ledger
    pub fn into_ledger(self) -> InventoryLedger {
        self.ledger
    }
}

/// Engine statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub events_processed: u64,
    pub book_updates: u64,
    pub trades: u64,
    pub fills: u64,
    pub policy_invocations: u64,
    pub quote_snapshots: u64,
    /// Cadence points where the volatility lookup hit
    pub vol_refreshes: u64,
    /// Cadence points where it missed and the cache went stale
    pub vol_misses: u64,
    pub final_position: i64,
}
