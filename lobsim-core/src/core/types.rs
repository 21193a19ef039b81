//! Core value types for the replay engine
//!
//! Prices are `u64` fixed-point with 9 decimal places, sizes are integer lots,
//! positions are signed lots and timestamps are nanoseconds since the Unix epoch.

use super::errors::ReplayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nanoseconds since the Unix epoch
pub type Timestamp = u64;

/// Nanoseconds per second
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Truncate a timestamp to the whole second it falls in
#[inline(always)]
pub const fn floor_to_second(ts: Timestamp) -> u64 {
    ts / NANOS_PER_SEC
}

/// Book side of a resting order or level
///
/// Single byte enum for minimal size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    Bid = 0,
    Ask = 1,
}

impl Side {
    /// Position change per executed lot when an order on this side fills
    ///
    /// A filled bid means the bot bought (+1), a filled ask means it sold (-1).
    #[inline(always)]
    pub const fn sign(self) -> i64 {
        match self {
            Side::Bid => 1,
            Side::Ask => -1,
        }
    }

    /// True if `candidate` would improve on `reference` for this side
    ///
    /// Bids improve upwards, asks improve downwards.
    #[inline(always)]
    pub fn is_more_aggressive(self, candidate: u64, reference: u64) -> bool {
        match self {
            Side::Bid => candidate > reference,
            Side::Ask => candidate < reference,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "BID"),
            Side::Ask => write!(f, "ASK"),
        }
    }
}

impl FromStr for Side {
    type Err = ReplayError;

    /// Parse a side tag as found in vendor rows and config files
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "BID" | "B" | "BUY" => Ok(Side::Bid),
            "ASK" | "A" | "SELL" => Ok(Side::Ask),
            _ => Err(ReplayError::InvalidSide {
                tag: tag.to_string(),
            }),
        }
    }
}

/// Fixed-point conversion utilities
///
/// Prices carry 9 decimal places, matching the feed format.
pub mod fixed_point {
    use rust_decimal::Decimal;

    /// Scale factor for 9 decimal places
    pub const SCALE: u64 = 1_000_000_000;

    /// Number of decimal places encoded in `SCALE`
    pub const DECIMALS: u32 = 9;

    /// Convert f64 to fixed-point, rounding to the nearest unit
    ///
    /// Negative and non-finite inputs map to 0.
    #[inline(always)]
    pub fn from_f64(value: f64) -> u64 {
        if !value.is_finite() || value <= 0.0 {
            return 0;
        }
        (value * SCALE as f64).round() as u64
    }

    /// Convert fixed-point to f64
    #[inline(always)]
    pub fn to_f64(value: u64) -> f64 {
        value as f64 / SCALE as f64
    }

    /// Exact conversion to Decimal (used for accounting)
    #[inline]
    pub fn to_decimal(value: u64) -> Decimal {
        Decimal::from_i128_with_scale(value as i128, DECIMALS)
    }

    /// Convert a Decimal to fixed-point, truncating below 1e-9
    #[inline]
    pub fn from_decimal(value: Decimal) -> u64 {
        use rust_decimal::prelude::ToPrimitive;
        (value * Decimal::from(SCALE)).trunc().to_u64().unwrap_or(0)
    }

    /// Overflow-safe midpoint of two fixed-point prices
    #[inline(always)]
    pub fn mid(a: u64, b: u64) -> u64 {
        a / 2 + b / 2 + (a % 2 + b % 2) / 2
    }

    /// Round a price to the nearest multiple of `tick`
    ///
    /// Halves round up. A zero tick leaves the price unchanged.
    #[inline]
    pub fn round_to_tick(price: u64, tick: u64) -> u64 {
        if tick == 0 {
            return price;
        }
        let rem = price % tick;
        if rem * 2 >= tick {
            price - rem + tick
        } else {
            price - rem
        }
    }
}
