//! Market maker parameters
//!
//! Prices are written as decimals in config files and converted to fixed
//! point once, when the market maker is built.

use ::config::{Config as ConfigLoader, Environment, File};
use anyhow::{Context, Result};
use lobsim_core::core::{ReplayError, ReplayResult};
use lobsim_core::data::ORDERBOOK_DEPTH;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Levels per side an order may rest within before it is cancelled
pub const TOP_LEVELS: usize = 10;

/// Fraction of the reference level's size to quote
pub const ORDER_SIZE_RATIO: f64 = 0.1;

/// Hard cap on a single order, in lots
pub const MAX_ORDER_SIZE: u64 = 100;

/// Book level whose size drives order sizing
pub const SIZING_LEVEL: usize = 1;

/// Environment prefix for overrides, e.g. `LOBSIM_MM_MAX_ORDER_SIZE=50`
pub const ENV_PREFIX: &str = "LOBSIM_MM";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketMakerConfig {
    pub top_levels: usize,
    pub order_size_ratio: f64,
    pub max_order_size: u64,
    pub sizing_level: usize,
    /// Minimum move of the target before an order is replaced
    pub reprice_threshold: Decimal,
    /// Targets are rounded to this grid
    pub tick_size: Decimal,
}

impl Default for MarketMakerConfig {
    fn default() -> Self {
        Self {
            top_levels: TOP_LEVELS,
            order_size_ratio: ORDER_SIZE_RATIO,
            max_order_size: MAX_ORDER_SIZE,
            sizing_level: SIZING_LEVEL,
            reprice_threshold: dec!(0.02),
            tick_size: dec!(0.01),
        }
    }
}

impl MarketMakerConfig {
    /// Load from a file with `LOBSIM_MM_*` environment overrides and validate
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let cfg: MarketMakerConfig = ConfigLoader::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to build market maker config from {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize market maker config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ReplayResult<()> {
        if self.top_levels == 0 || self.top_levels > ORDERBOOK_DEPTH {
            return Err(invalid(format!(
                "top_levels must be within 1..={}, got {}",
                ORDERBOOK_DEPTH, self.top_levels
            )));
        }
        if self.sizing_level >= ORDERBOOK_DEPTH {
            return Err(invalid(format!(
                "sizing_level must be below {}, got {}",
                ORDERBOOK_DEPTH, self.sizing_level
            )));
        }
        if !(self.order_size_ratio.is_finite() && self.order_size_ratio > 0.0) {
            return Err(invalid(format!(
                "order_size_ratio must be positive, got {}",
                self.order_size_ratio
            )));
        }
        if self.max_order_size == 0 {
            return Err(invalid("max_order_size must be positive".to_string()));
        }
        if self.tick_size <= Decimal::ZERO {
            return Err(invalid("tick_size must be positive".to_string()));
        }
        if self.reprice_threshold < Decimal::ZERO {
            return Err(invalid("reprice_threshold cannot be negative".to_string()));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> ReplayError {
    ReplayError::InvalidConfig { reason }
}
