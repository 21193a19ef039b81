//! Replay engine
//!
//! - `generic`: the event-processing state machine
//! - `traits`: the quoting policy contract and the view it receives

pub mod generic;
pub mod traits;

pub use generic::{Engine, EngineStats};
pub use traits::{MarketView, Passive, QuotingPolicy};
