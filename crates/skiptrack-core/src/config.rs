//! TOML-based engine configuration.
//!
//! Holds the empirical constants of the prediction engine:
//! - Normal-Inverse-Gamma priors and skip-detection bands
//! - Credible interval quantile and the no-history fallback
//! - Confidence scoring and reversed-entry handling
//!
//! Configuration is read from `~/.config/skiptrack/config.toml`. A missing file
//! means defaults; the engine never writes it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::prediction::{CycleForecaster, EstimatorConfig, ForecastConfig, SkipAwareEstimator};

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
}

/// Returns `~/.config/skiptrack[-dev]/` based on SKIPTRACK_ENV.
///
/// Set SKIPTRACK_ENV=dev to use the development directory.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(".config");

    let env = std::env::var("SKIPTRACK_ENV").unwrap_or_else(|_| "production".to_string());

    Ok(if env == "dev" {
        base_dir.join("skiptrack-dev")
    } else {
        base_dir.join("skiptrack")
    })
}

impl EngineConfig {
    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, or defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Check the constants for values the model cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let est = &self.estimator;
        if est.prior_n <= 0.0 {
            return Err(invalid("estimator.prior_n", "must be positive"));
        }
        if est.prior_a <= 1.0 {
            return Err(invalid(
                "estimator.prior_a",
                "must be greater than 1 for the variance estimate to exist",
            ));
        }
        if est.prior_b <= 0.0 {
            return Err(invalid("estimator.prior_b", "must be positive"));
        }
        if est.z_score <= 0.0 {
            return Err(invalid("estimator.z_score", "must be positive"));
        }
        for (key, band) in [
            ("estimator.two_cycle_band", est.two_cycle_band),
            ("estimator.three_cycle_band", est.three_cycle_band),
        ] {
            if band.lower >= band.upper {
                return Err(invalid(key, "lower must be below upper"));
            }
        }

        let fc = &self.forecast;
        if fc.min_confidence > fc.max_confidence {
            return Err(invalid(
                "forecast.min_confidence",
                "must not exceed forecast.max_confidence",
            ));
        }
        if fc.max_confidence > 100 {
            return Err(invalid("forecast.max_confidence", "must be at most 100"));
        }
        if fc.variance_weight < 0.0 {
            return Err(invalid("forecast.variance_weight", "must not be negative"));
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = key
            .split('.')
            .try_fold(&json, |current, part| current.get(part))?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn estimator(&self) -> SkipAwareEstimator {
        SkipAwareEstimator::with_config(self.estimator)
    }

    pub fn forecaster(&self) -> CycleForecaster {
        CycleForecaster::with_config(self.estimator, self.forecast)
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}
