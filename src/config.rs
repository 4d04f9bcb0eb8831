//! Runtime configuration for the dashboard.
//!
//! Everything has a default; environment variables only override.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::data::error::DataError;

/// Directory holding the three cleaned country files.
pub const DATA_DIR_VAR: &str = "SOLAR_DATA_DIR";
/// Upper bound on rows drawn in the RH scatter plot.
pub const SAMPLE_SIZE_VAR: &str = "SOLAR_SAMPLE_SIZE";
/// Seed of the scatter sample generator.
pub const SAMPLE_SEED_VAR: &str = "SOLAR_SAMPLE_SEED";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_SAMPLE_SIZE: usize = 2000;
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub sample_size: usize,
    pub sample_seed: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            sample_size: DEFAULT_SAMPLE_SIZE,
            sample_seed: DEFAULT_SAMPLE_SEED,
        }
    }
}

impl DashboardConfig {
    /// Defaults with `SOLAR_DATA_DIR`, `SOLAR_SAMPLE_SIZE` and
    /// `SOLAR_SAMPLE_SEED` applied when set.
    pub fn from_env() -> Result<Self, DataError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`DashboardConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DataError> {
        let defaults = Self::default();
        Ok(Self {
            data_dir: lookup(DATA_DIR_VAR)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            sample_size: parse_var(&lookup, SAMPLE_SIZE_VAR)?.unwrap_or(defaults.sample_size),
            sample_seed: parse_var(&lookup, SAMPLE_SEED_VAR)?.unwrap_or(defaults.sample_seed),
        })
    }

    pub fn log_config(&self) {
        log::info!("Configuration loaded:");
        log::info!("  data dir    : {}", self.data_dir.display());
        log::info!("  sample size : {}", self.sample_size);
        log::info!("  sample seed : {}", self.sample_seed);
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, DataError> {
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| DataError::InvalidConfig { var, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_overrides() {
        let cfg = DashboardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.sample_size, 2000);
        assert_eq!(cfg.sample_seed, 42);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = DashboardConfig::from_lookup(|var| match var {
            DATA_DIR_VAR => Some("/srv/solar".into()),
            SAMPLE_SIZE_VAR => Some(" 500 ".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/solar"));
        assert_eq!(cfg.sample_size, 500);
        assert_eq!(cfg.sample_seed, 42);
    }

    #[test]
    fn bad_number_is_reported() {
        let err = DashboardConfig::from_lookup(|var| {
            (var == SAMPLE_SEED_VAR).then(|| "forty-two".to_string())
        })
        .unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidConfig { var: SAMPLE_SEED_VAR, .. }
        ));
    }
}
