//! Core value types shared by every component
//!
//! - `Side`: bid/ask tag with the sign convention used for fills
//! - `Timestamp`: nanoseconds since the Unix epoch
//! - `fixed_point`: 9-decimal price arithmetic
//! - `ReplayError`: the engine's error taxonomy

pub mod errors;
pub mod types;

pub use errors::{ReplayError, ReplayResult};
pub use types::{fixed_point, floor_to_second, Side, Timestamp, NANOS_PER_SEC};
