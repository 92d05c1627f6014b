//! # SkipTrack Core Library
//!
//! This library predicts the next menstrual period from a short, noisy and
//! possibly incomplete history of recorded periods. Every call recomputes
//! from the history it is given; nothing is cached between calls, so the
//! engine can be shared freely across users and threads.
//!
//! ## Architecture
//!
//! - **Date Differ**: recorded start dates to whole-day cycle lengths
//! - **Skip-Aware Estimator**: splits gaps that span two or three cycles, then
//!   runs a Normal-Inverse-Gamma conjugate update for the mean cycle length
//! - **Forecaster**: projects the next start and end dates and scores confidence
//!
//! ## Key Components
//!
//! - [`cycle_lengths_from_start_dates`]: the date differ
//! - [`SkipAwareEstimator`] / [`estimate`]: posterior mean and 80% interval
//! - [`CycleForecaster`] / [`forecast`]: next-period forecast
//! - [`EngineConfig`]: tunable constants loaded from TOML

pub mod config;
pub mod error;
pub mod prediction;

pub use config::EngineConfig;
pub use error::{ConfigError, CoreError, ValidationError};
pub use prediction::{
    cycle_lengths_from_start_dates, cycle_status, estimate, forecast, parse_day, parse_days,
    CycleForecaster, CycleHistoryEntry, CyclePhase, CycleStatus, EstimationResult,
    EstimatorConfig, ForecastConfig, ForecastResult, ReversedEntryPolicy, SkipAwareEstimator,
};
