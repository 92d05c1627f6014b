//! Core error types for skiptrack-core.
//!
//! The prediction operations themselves are total and never fail. Errors only
//! surface at the edges: parsing dates handed over by a caller, loading the
//! engine configuration, and the checked forecast path.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for skiptrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home or config directory could not be determined
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A date string that is neither `YYYY-MM-DD` nor RFC 3339
    #[error("Invalid date '{input}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate { input: String },

    /// History entry whose end precedes its start
    #[error("Invalid history entry: end_date ({end}) is before start_date ({start})")]
    ReversedEntry {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
