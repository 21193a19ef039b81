//! Statistics around a replay
//!
//! - `volatility`: the per-second context precomputed before the run
//! - `aggregator`: the summary computed after it

pub mod aggregator;
pub mod volatility;

pub use aggregator::{summarize, time_weighted_size_moments, RunSummary, RunWindow};
pub use volatility::{VolatilityContext, VolatilitySample, VOL_WINDOWS_SECS};
