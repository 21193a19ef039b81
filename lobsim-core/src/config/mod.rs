//! Replay configuration
//!
//! Defaults come from `constants`. A file (JSON or TOML) may set any subset
//! of fields, and `LOBSIM_SIM_*` environment variables override both.

pub mod constants;
pub mod types;

pub use types::SimConfig;

use crate::core::{ReplayError, ReplayResult};
use ::config::{Config as ConfigLoader, Environment, File};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;
use tracing::info;

/// Environment prefix for overrides, e.g. `LOBSIM_SIM_VOL_REFRESH_INTERVAL=50`
pub const ENV_PREFIX: &str = "LOBSIM_SIM";

impl SimConfig {
    /// Load from a file (format taken from its extension) with environment
    /// variable overrides, then validate
    ///
    /// Fields missing from both keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = ConfigLoader::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to build config from {}", path.display()))?;

        let cfg: SimConfig = config
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize config {}", path.display()))?;

        cfg.validate()?;
        info!("Loaded simulation config from {}", path.display());
        Ok(cfg)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ReplayResult<()> {
        if self.vol_refresh_interval == 0 {
            return Err(invalid("vol_refresh_interval must be positive"));
        }
        if self.progress_interval == 0 {
            return Err(invalid("progress_interval must be positive"));
        }
        if self.maker_rebate_per_unit < Decimal::ZERO {
            return Err(invalid("maker_rebate_per_unit cannot be negative"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ReplayError {
    ReplayError::InvalidConfig {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn json_file() -> tempfile::NamedTempFile {
        tempfile::Builder::new().suffix(".json").tempfile().unwrap()
    }

    #[test]
    fn test_default_validates() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.boundary_flag_threshold, 128);
        assert_eq!(config.vol_refresh_interval, 100);
        assert_eq!(config.maker_rebate_per_unit, dec!(0.0020));
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimConfig::default();

        config.vol_refresh_interval = 0;
        assert!(matches!(config.validate(), Err(ReplayError::InvalidConfig { .. })));
        config.vol_refresh_interval = 100;

        config.progress_interval = 0;
        assert!(config.validate().is_err());
        config.progress_interval = 1;

        config.maker_rebate_per_unit = dec!(-0.001);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = json_file();
        write!(file, r#"{{"vol_refresh_interval": 10, "maker_rebate_per_unit": "0.001"}}"#).unwrap();

        let config = SimConfig::load(file.path()).unwrap();
        assert_eq!(config.vol_refresh_interval, 10);
        assert_eq!(config.maker_rebate_per_unit, dec!(0.001));
        assert_eq!(config.progress_interval, constants::PROGRESS_INTERVAL);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = json_file();
        write!(file, r#"{{"vol_refresh_interval": 0}}"#).unwrap();
        let err = SimConfig::load(file.path()).unwrap_err();
        assert!(err.downcast_ref::<ReplayError>().is_some());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = json_file();
        write!(file, r#"{{"boundary_flag_threshold": 100}}"#).unwrap();

        std::env::set_var("LOBSIM_SIM_BOUNDARY_FLAG_THRESHOLD", "64");
        let loaded = SimConfig::load(file.path());
        std::env::remove_var("LOBSIM_SIM_BOUNDARY_FLAG_THRESHOLD");

        let config = loaded.unwrap();
        assert_eq!(config.boundary_flag_threshold, 64);
        assert_eq!(config.vol_refresh_interval, constants::VOL_REFRESH_INTERVAL);
    }
}
