//! Skip-aware Bayesian estimation of the mean cycle length.
//!
//! Recorded gaps that look like two or three merged cycles (a forgotten log
//! entry) are split before a Normal-Inverse-Gamma conjugate update against a
//! population prior. The estimator holds no state between calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::round_to;

/// Which element stands in for the median of an even-length sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianConvention {
    /// Element at index `len / 2` of the sorted sample.
    #[default]
    UpperMiddle,
    /// Mean of the two middle elements.
    Average,
}

/// Open interval of multiples of the median that marks a merged gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkipBand {
    pub lower: f64,
    pub upper: f64,
}

impl SkipBand {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Strict containment: values on either edge are not a match.
    pub fn contains(&self, length: f64, median: f64) -> bool {
        length > self.lower * median && length < self.upper * median
    }
}

/// Output of one estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationResult {
    /// Posterior mean cycle length in days, two decimals
    pub mean_cycle_length: f64,
    /// Lower edge of the 80% credible interval, two decimals
    pub ci80_lower: f64,
    /// Upper edge of the 80% credible interval, two decimals
    pub ci80_upper: f64,
    /// Smoothed skip indicator, three decimals
    pub skip_probability: f64,
}

/// Tunable constants of the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Prior mean cycle length (days)
    #[serde(default = "default_prior_mu")]
    pub prior_mu: f64,

    /// Prior pseudo-observation count
    #[serde(default = "default_prior_n")]
    pub prior_n: f64,

    /// Inverse-gamma shape; must stay above 1 for the variance mean to exist
    #[serde(default = "default_prior_a")]
    pub prior_a: f64,

    /// Inverse-gamma scale
    #[serde(default = "default_prior_b")]
    pub prior_b: f64,

    /// Gap treated as two merged cycles
    #[serde(default = "default_two_cycle_band")]
    pub two_cycle_band: SkipBand,

    /// Gap treated as three merged cycles
    #[serde(default = "default_three_cycle_band")]
    pub three_cycle_band: SkipBand,

    /// Normal quantile for the credible interval (1.28 ~ 80%)
    #[serde(default = "default_z_score")]
    pub z_score: f64,

    #[serde(default)]
    pub median: MedianConvention,

    /// Returned unchanged when there is no history at all
    #[serde(default = "default_fallback")]
    pub fallback: EstimationResult,
}

fn default_prior_mu() -> f64 {
    28.0
}
fn default_prior_n() -> f64 {
    1.0
}
fn default_prior_a() -> f64 {
    2.0
}
fn default_prior_b() -> f64 {
    20.0
}
fn default_two_cycle_band() -> SkipBand {
    SkipBand::new(1.6, 2.4)
}
fn default_three_cycle_band() -> SkipBand {
    SkipBand::new(2.6, 3.4)
}
fn default_z_score() -> f64 {
    1.28
}
fn default_fallback() -> EstimationResult {
    EstimationResult {
        mean_cycle_length: 28.0,
        ci80_lower: 21.0,
        ci80_upper: 35.0,
        skip_probability: 0.05,
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            prior_mu: default_prior_mu(),
            prior_n: default_prior_n(),
            prior_a: default_prior_a(),
            prior_b: default_prior_b(),
            two_cycle_band: default_two_cycle_band(),
            three_cycle_band: default_three_cycle_band(),
            z_score: default_z_score(),
            median: MedianConvention::default(),
            fallback: default_fallback(),
        }
    }
}

/// Result of the skip detection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipCleaning {
    /// Lengths after splitting merged gaps, in input order
    pub cleaned: Vec<f64>,
    /// Median the bands were measured against
    pub median: f64,
    /// Number of input gaps that were split
    pub splits: usize,
}

impl SkipCleaning {
    pub fn had_skip(&self) -> bool {
        self.splits > 0
    }
}

/// Normal-Inverse-Gamma posterior parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posterior {
    pub n: f64,
    pub mu: f64,
    pub a: f64,
    pub b: f64,
}

impl Posterior {
    /// The prior itself, as a posterior over zero observations.
    pub fn prior(config: &EstimatorConfig) -> Self {
        Self {
            n: config.prior_n,
            mu: config.prior_mu,
            a: config.prior_a,
            b: config.prior_b,
        }
    }

    /// Conjugate update of the prior with `samples`.
    pub fn update(config: &EstimatorConfig, samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::prior(config);
        }

        let n = samples.len() as f64;
        let sample_mean = samples.iter().sum::<f64>() / n;
        let sum_sq_diff: f64 = samples.iter().map(|x| (x - sample_mean).powi(2)).sum();

        let post_n = config.prior_n + n;
        let post_mu = (config.prior_n * config.prior_mu + n * sample_mean) / post_n;
        let post_a = config.prior_a + n / 2.0;
        let post_b = config.prior_b
            + 0.5
                * (sum_sq_diff
                    + (config.prior_n * n * (sample_mean - config.prior_mu).powi(2)) / post_n);

        Self {
            n: post_n,
            mu: post_mu,
            a: post_a,
            b: post_b,
        }
    }

    /// Mean of the inverse-gamma variance posterior. Requires `a > 1`.
    pub fn expected_variance(&self) -> f64 {
        debug_assert!(self.a > 1.0, "inverse-gamma mean undefined for a <= 1");
        self.b / (self.a - 1.0)
    }
}

/// Median of `values` under the given convention, `None` when empty.
pub fn median(values: &[f64], convention: MedianConvention) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;

    let value = match convention {
        MedianConvention::UpperMiddle => sorted[mid],
        MedianConvention::Average if sorted.len() % 2 == 0 => (sorted[mid - 1] + sorted[mid]) / 2.0,
        MedianConvention::Average => sorted[mid],
    };
    Some(value)
}

/// Split gaps that look like two or three merged cycles.
pub fn clean_skips(lengths: &[f64], config: &EstimatorConfig) -> SkipCleaning {
    let Some(median) = median(lengths, config.median) else {
        return SkipCleaning {
            cleaned: Vec::new(),
            median: 0.0,
            splits: 0,
        };
    };

    let mut cleaned = Vec::with_capacity(lengths.len() + 2);
    let mut splits = 0;

    for &length in lengths {
        let parts = if config.two_cycle_band.contains(length, median) {
            2
        } else if config.three_cycle_band.contains(length, median) {
            3
        } else {
            1
        };

        if parts > 1 {
            debug!(length, median, parts, "splitting merged cycle gap");
            splits += 1;
        }

        let piece = length / parts as f64;
        cleaned.extend(std::iter::repeat(piece).take(parts));
    }

    SkipCleaning {
        cleaned,
        median,
        splits,
    }
}

/// Stateless estimator bound to a set of constants.
#[derive(Debug, Clone, Default)]
pub struct SkipAwareEstimator {
    config: EstimatorConfig,
}

impl SkipAwareEstimator {
    /// Create an estimator with the default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an estimator with custom constants.
    pub fn with_config(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Estimate the mean cycle length and its 80% credible interval.
    pub fn estimate(&self, cycle_lengths: &[f64]) -> EstimationResult {
        if cycle_lengths.is_empty() {
            return self.config.fallback;
        }

        let cleaning = clean_skips(cycle_lengths, &self.config);
        let posterior = Posterior::update(&self.config, &cleaning.cleaned);
        let sd = posterior.expected_variance().sqrt();

        debug!(
            observed = cycle_lengths.len(),
            cleaned = cleaning.cleaned.len(),
            post_mu = posterior.mu,
            post_a = posterior.a,
            post_b = posterior.b,
            "posterior updated"
        );

        let skip_count = if cleaning.cleaned.len() != cycle_lengths.len() {
            1.0
        } else {
            0.0
        };
        let skip_probability = (skip_count + 0.5) / (cycle_lengths.len() as f64 + 1.0);

        EstimationResult {
            mean_cycle_length: round_to(posterior.mu, 2),
            ci80_lower: round_to(posterior.mu - self.config.z_score * sd, 2),
            ci80_upper: round_to(posterior.mu + self.config.z_score * sd, 2),
            skip_probability: round_to(skip_probability, 3),
        }
    }
}

/// Estimate with the default constants.
pub fn estimate(cycle_lengths: &[f64]) -> EstimationResult {
    SkipAwareEstimator::new().estimate(cycle_lengths)
}
