//! Compile-time defaults for the replay engine
//!
//! Runtime values live in [`super::SimConfig`]; these seed its `Default`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Flags value at or above which an event closes an atomic batch
pub const BOUNDARY_FLAG_THRESHOLD: u8 = crate::data::F_LAST;

/// Events between refreshes of the cached volatility sample
pub const VOL_REFRESH_INTERVAL: u64 = 100;

/// Events between progress log lines
pub const PROGRESS_INTERVAL: u64 = 50_000;

/// Maker rebate per unit of traded volume
pub const MAKER_REBATE_PER_UNIT: Decimal = dec!(0.0020);
