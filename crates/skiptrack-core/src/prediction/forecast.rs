//! Next-period forecasting from a recorded history.
//!
//! The forecaster differences the recorded start dates, hands the gaps to the
//! [`SkipAwareEstimator`], averages the recorded period durations and projects
//! the next period from the most recent start. Confidence starts from the
//! amount of history and is penalised by the spread of the cycle lengths.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::dates::{add_days, cycle_lengths_from_start_dates};
use super::estimator::{EstimatorConfig, SkipAwareEstimator};
use super::serde_dates::{day_or_empty, lenient_day};
use crate::error::ValidationError;

/// One recorded period as supplied by the caller.
///
/// Either date may be missing; such entries are discarded before any
/// computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleHistoryEntry {
    #[serde(default, deserialize_with = "lenient_day")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_day")]
    pub end_date: Option<NaiveDate>,
}

impl CycleHistoryEntry {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }

    /// Both dates, when present.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start_date?, self.end_date?))
    }

    pub fn is_valid(&self) -> bool {
        self.span().is_some()
    }

    pub fn is_reversed(&self) -> bool {
        matches!(self.span(), Some((start, end)) if end < start)
    }
}

/// The forecast handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    #[serde(with = "day_or_empty")]
    pub next_start_date: Option<NaiveDate>,
    #[serde(with = "day_or_empty")]
    pub next_end_date: Option<NaiveDate>,
    pub mean_cycle_length: f64,
    pub mean_period_duration: u32,
    /// 0-100
    pub confidence: u8,
}

impl ForecastResult {
    /// Every day of the predicted period, first to last inclusive.
    pub fn predicted_period_days(&self) -> Vec<NaiveDate> {
        match (self.next_start_date, self.next_end_date) {
            (Some(start), Some(end)) => start.iter_days().take_while(|d| *d <= end).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.next_start_date.is_none()
    }
}

/// What to do with an entry whose end date precedes its start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReversedEntryPolicy {
    /// Keep the entry and count its duration as one day.
    #[default]
    Clamp,
    /// Discard the entry like one with a missing date.
    Drop,
    /// Refuse the whole history.
    Reject,
}

/// Forecast tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Base confidence with one valid entry
    #[serde(default = "default_single_entry_confidence")]
    pub single_entry_confidence: f64,

    /// Base confidence with two valid entries
    #[serde(default = "default_two_entry_confidence")]
    pub two_entry_confidence: f64,

    /// Base confidence with three or more valid entries
    #[serde(default = "default_established_confidence")]
    pub established_confidence: f64,

    /// Points subtracted per day of cycle-length standard deviation
    #[serde(default = "default_variance_weight")]
    pub variance_weight: f64,

    #[serde(default = "default_min_confidence")]
    pub min_confidence: u8,

    #[serde(default = "default_max_confidence")]
    pub max_confidence: u8,

    /// Reported cycle length when there is no usable history
    #[serde(default = "default_cycle_length")]
    pub default_cycle_length: f64,

    /// Reported period duration when there is no usable history
    #[serde(default = "default_period_duration")]
    pub default_period_duration: u32,

    #[serde(default)]
    pub reversed_entries: ReversedEntryPolicy,
}

fn default_single_entry_confidence() -> f64 {
    40.0
}
fn default_two_entry_confidence() -> f64 {
    65.0
}
fn default_established_confidence() -> f64 {
    85.0
}
fn default_variance_weight() -> f64 {
    2.0
}
fn default_min_confidence() -> u8 {
    10
}
fn default_max_confidence() -> u8 {
    98
}
fn default_cycle_length() -> f64 {
    28.0
}
fn default_period_duration() -> u32 {
    5
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            single_entry_confidence: default_single_entry_confidence(),
            two_entry_confidence: default_two_entry_confidence(),
            established_confidence: default_established_confidence(),
            variance_weight: default_variance_weight(),
            min_confidence: default_min_confidence(),
            max_confidence: default_max_confidence(),
            default_cycle_length: default_cycle_length(),
            default_period_duration: default_period_duration(),
            reversed_entries: ReversedEntryPolicy::default(),
        }
    }
}

/// Inclusive length of a period in days, never below one.
pub fn period_duration(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(1)
}

/// Population standard deviation, `None` when empty.
pub fn population_std_dev(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<i64>() as f64 / n;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    Some(variance.sqrt())
}

/// Stateless forecaster.
#[derive(Debug, Clone, Default)]
pub struct CycleForecaster {
    estimator: SkipAwareEstimator,
    config: ForecastConfig,
}

impl CycleForecaster {
    /// Create a forecaster with default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecaster with custom constants.
    pub fn with_config(estimator: EstimatorConfig, config: ForecastConfig) -> Self {
        Self {
            estimator: SkipAwareEstimator::with_config(estimator),
            config,
        }
    }

    /// Forecast the next period.
    ///
    /// Never fails. A [`ReversedEntryPolicy::Reject`] policy is downgraded to
    /// [`ReversedEntryPolicy::Clamp`] here; use [`Self::try_forecast`] to get
    /// the rejection.
    pub fn forecast(&self, history: &[CycleHistoryEntry]) -> ForecastResult {
        let drop_reversed = self.config.reversed_entries == ReversedEntryPolicy::Drop;
        let spans = usable_spans(history, drop_reversed);
        self.forecast_spans(&spans, history.len())
    }

    /// Forecast the next period, honouring the configured reversed-entry
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ReversedEntry`] for the first entry whose
    /// end precedes its start when the policy is [`ReversedEntryPolicy::Reject`].
    pub fn try_forecast(
        &self,
        history: &[CycleHistoryEntry],
    ) -> Result<ForecastResult, ValidationError> {
        if self.config.reversed_entries == ReversedEntryPolicy::Reject {
            if let Some((start, end)) = history
                .iter()
                .filter(|entry| entry.is_reversed())
                .find_map(CycleHistoryEntry::span)
            {
                return Err(ValidationError::ReversedEntry { start, end });
            }
        }
        Ok(self.forecast(history))
    }

    /// Checked forecast from a JSON array of `{startDate, endDate}` objects.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a JSON array of objects, or if
    /// [`Self::try_forecast`] rejects the history.
    pub fn forecast_json(&self, json: &str) -> crate::error::Result<ForecastResult> {
        let history: Vec<CycleHistoryEntry> = serde_json::from_str(json)?;
        Ok(self.try_forecast(&history)?)
    }

    fn forecast_spans(&self, valid: &[(NaiveDate, NaiveDate)], submitted: usize) -> ForecastResult {
        if valid.is_empty() {
            debug!(entries = submitted, "no usable history, returning default forecast");
            return self.empty_forecast();
        }

        // Newest first; only the head is needed for projection.
        let mut newest_first: Vec<NaiveDate> = valid.iter().map(|(start, _)| *start).collect();
        newest_first.sort_unstable_by(|a, b| b.cmp(a));
        let most_recent_start = newest_first[0];

        let cycle_lengths = cycle_lengths_from_start_dates(&newest_first);
        let samples: Vec<f64> = cycle_lengths.iter().map(|&d| d as f64).collect();
        let estimation = self.estimator.estimate(&samples);

        let durations: Vec<i64> = valid
            .iter()
            .map(|(start, end)| period_duration(*start, *end))
            .collect();
        assert!(!durations.is_empty(), "durations derived from non-empty history");
        let mean_duration = durations.iter().sum::<i64>() as f64 / durations.len() as f64;

        let next_start_date = add_days(most_recent_start, estimation.mean_cycle_length);
        let next_end_date = next_start_date.and_then(|start| add_days(start, mean_duration - 1.0));

        let confidence = self.confidence(valid.len(), &cycle_lengths);

        debug!(
            entries = valid.len(),
            ?cycle_lengths,
            mean_cycle_length = estimation.mean_cycle_length,
            mean_duration,
            confidence,
            "forecast derived"
        );

        ForecastResult {
            next_start_date,
            next_end_date,
            mean_cycle_length: estimation.mean_cycle_length,
            mean_period_duration: mean_duration.round() as u32,
            confidence,
        }
    }

    fn empty_forecast(&self) -> ForecastResult {
        ForecastResult {
            next_start_date: None,
            next_end_date: None,
            mean_cycle_length: self.config.default_cycle_length,
            mean_period_duration: self.config.default_period_duration,
            confidence: 0,
        }
    }

    /// Confidence from history size, penalised by cycle-length spread.
    fn confidence(&self, valid_entries: usize, cycle_lengths: &[i64]) -> u8 {
        let mut score = match valid_entries {
            0 => 0.0,
            1 => self.config.single_entry_confidence,
            2 => self.config.two_entry_confidence,
            _ => self.config.established_confidence,
        };

        if cycle_lengths.len() >= 2 {
            if let Some(std_dev) = population_std_dev(cycle_lengths) {
                score -= self.config.variance_weight * std_dev;
            }
        }

        let (min, max) = (self.config.min_confidence, self.config.max_confidence);
        let (lo, hi) = (min.min(max), min.max(max));
        score.round().clamp(f64::from(lo), f64::from(hi)) as u8
    }
}

/// Entries with both dates present. Reversed entries are dropped or kept
/// (their duration clamps to one day).
fn usable_spans(history: &[CycleHistoryEntry], drop_reversed: bool) -> Vec<(NaiveDate, NaiveDate)> {
    let mut valid = Vec::with_capacity(history.len());

    for entry in history {
        let Some((start, end)) = entry.span() else {
            debug!("skipping history entry with a missing date");
            continue;
        };

        if entry.is_reversed() {
            if drop_reversed {
                warn!(%start, %end, "dropping history entry that ends before it starts");
                continue;
            }
            warn!(%start, %end, "history entry ends before it starts, counting one day");
        }

        valid.push((start, end));
    }

    valid
}

/// Forecast with the default constants.
pub fn forecast(history: &[CycleHistoryEntry]) -> ForecastResult {
    CycleForecaster::new().forecast(history)
}
