use super::constants::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Engine settings for one replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Flags value at or above which the quoting policy runs
    pub boundary_flag_threshold: u8,

    /// Refresh cached volatility every N events (first event included)
    pub vol_refresh_interval: u64,

    /// Log progress every N events
    pub progress_interval: u64,

    /// Rebate credited per unit of volume
    pub maker_rebate_per_unit: Decimal,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            boundary_flag_threshold: BOUNDARY_FLAG_THRESHOLD,
            vol_refresh_interval: VOL_REFRESH_INTERVAL,
            progress_interval: PROGRESS_INTERVAL,
            maker_rebate_per_unit: MAKER_REBATE_PER_UNIT,
        }
    }
}
