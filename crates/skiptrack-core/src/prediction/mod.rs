//! Prediction engine
//!
//! Three layers, leaves first: the date differ turns recorded start dates into
//! cycle lengths, the skip-aware estimator turns cycle lengths into a posterior
//! mean with a credible interval, and the forecaster combines that with the
//! recorded period durations into the next-period forecast.

mod dates;
mod estimator;
mod forecast;
mod serde_dates;
mod status;

pub use dates::{add_days, cycle_lengths_from_start_dates, parse_day, parse_days};

pub use estimator::{
    clean_skips, estimate, median, EstimationResult, EstimatorConfig, MedianConvention,
    Posterior, SkipAwareEstimator, SkipBand, SkipCleaning,
};

pub use forecast::{
    forecast, period_duration, population_std_dev, CycleForecaster, CycleHistoryEntry,
    ForecastConfig, ForecastResult, ReversedEntryPolicy,
};

pub use status::{cycle_status, CyclePhase, CycleStatus};

/// Round to `places` decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(24.379_6, 2), 24.38);
        assert_eq!(round_to(0.125, 3), 0.125);
        assert_eq!(round_to(0.333_333, 3), 0.333);
        assert_eq!(round_to(28.0, 2), 28.0);
    }
}
