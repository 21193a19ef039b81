//! Lobsim Core - Limit Order Book Replay for Market-Making Research
//!
//! Replays historical 10-level book snapshots and trade prints against a
//! simulated market maker. The bot's resting orders are merged into the
//! visible book on every update, trades fill the bot pro-rata against
//! visible depth, and the run ends with PnL and execution analytics.
//!
//! ## Core Modules
//! - `core`: fixed-point prices, `Side`, `ReplayError`
//! - `data`: event rows and feeds
//! - `orderbook`: combined book and resting orders
//! - `execution`: fill matching
//! - `ledger`: position plus fill and quote logs
//! - `analytics`: volatility context and run summary
//! - `engine`: the replay state machine, generic over fill and quoting policy
//! - `replay`: one-call driver producing a `ReplayReport`

pub mod analytics;
pub mod config;
pub mod core;
pub mod data;
pub mod engine;
pub mod execution;
pub mod ledger;
pub mod orderbook;
pub mod replay;
pub mod testing;

pub use crate::core::{fixed_point, ReplayError, ReplayResult, Side, Timestamp};
pub use crate::engine::{Engine, EngineStats, MarketView, QuotingPolicy};
pub use crate::replay::{replay, ReplayReport};

/// Prelude for convenient imports
pub mod prelude {
    // Core types
    pub use crate::core::{fixed_point, ReplayError, ReplayResult, Side, Timestamp};

    // Data feed
    pub use crate::data::{EventFeed, LevelsBuilder, MarketEvent, VecFeed, F_LAST};

    // Engine
    pub use crate::engine::{Engine, EngineStats, MarketView, Passive, QuotingPolicy};
    pub use crate::execution::{FillPolicy, NoFill, ProRataFill};
    pub use crate::orderbook::{CombinedOrderBook, OrderManager, RestingOrders};

    // Results
    pub use crate::analytics::{RunSummary, VolatilityContext};
    pub use crate::config::SimConfig;
    pub use crate::replay::{replay, ReplayReport};
}
