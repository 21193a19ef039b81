//! Domain-specific error types for the replay engine
//!
//! Every variant is a caller or data contract violation. Conditions the
//! engine tolerates by design (zero depth at a fill level, a missing
//! volatility sample, cancelling an order that is already gone) never
//! surface here.

use super::types::Timestamp;
use thiserror::Error;

/// Errors raised while configuring, running or summarising a replay
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// An event arrived with a timestamp earlier than the last one processed.
    /// Book state cannot be trusted past this point, so the run aborts.
    #[error("sequencing violation: event at {received}ns precedes current time {previous}ns")]
    SequencingViolation {
        /// Timestamp of the last processed event
        previous: Timestamp,
        /// Timestamp of the offending event
        received: Timestamp,
    },

    /// A side tag outside {BID, ASK}
    #[error("invalid side tag {tag:?}, expected BID or ASK")]
    InvalidSide { tag: String },

    /// The quoting policy has no concrete pricing model
    #[error("pricing model {model} does not implement target prices")]
    UnimplementedPolicy { model: &'static str },

    /// Aggregation was requested over a run that produced no fills
    #[error("cannot summarise a run with an empty fill log")]
    EmptyFillLog,

    /// A configuration value is out of range
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Result alias used across the engine
pub type ReplayResult<T> = Result<T, ReplayError>;
