//! Testing utilities for unit tests, integration tests and benches
//!
//! Provides:
//! - price and event builders in fixed point
//! - `FnPolicy`: a quoting policy from a closure
//! - deterministic synthetic sessions

pub mod helpers;

pub use helpers::*;
