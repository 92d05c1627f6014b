//! Integration tests for the prediction pipeline.

use chrono::{NaiveDate, TimeDelta};
use skiptrack_core::{
    cycle_lengths_from_start_dates, estimate, forecast, parse_days, CycleHistoryEntry,
    EngineConfig, ForecastResult,
};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Periods of `duration` days starting every `gap` days from `first`.
fn regular_history(first: &str, gap: i64, duration: i64, count: usize) -> Vec<CycleHistoryEntry> {
    let first = day(first);
    (0..count as i64)
        .map(|i| {
            let start = first + TimeDelta::days(i * gap);
            CycleHistoryEntry::new(start, start + TimeDelta::days(duration - 1))
        })
        .collect()
}

#[test]
fn test_date_differ_on_iso_strings() {
    let ordered = parse_days(["2024-01-01", "2024-01-29", "2024-02-26"]).unwrap();
    let shuffled = parse_days(["2024-01-29", "2024-02-26", "2024-01-01"]).unwrap();
    assert_eq!(cycle_lengths_from_start_dates(&ordered), vec![28, 28]);
    assert_eq!(cycle_lengths_from_start_dates(&shuffled), vec![28, 28]);
}

#[test]
fn test_estimate_empty_is_population_prior() {
    let result = estimate(&[]);
    assert_eq!(
        (result.mean_cycle_length, result.ci80_lower, result.ci80_upper, result.skip_probability),
        (28.0, 21.0, 35.0, 0.05)
    );
}

#[test]
fn test_estimate_regular_history() {
    let result = estimate(&[28.0, 28.0, 28.0]);
    assert!((result.mean_cycle_length - 28.0).abs() <= 0.5);
    assert_eq!(result.skip_probability, 0.125);
}

#[test]
fn test_estimate_detects_forgotten_period() {
    let result = estimate(&[28.0, 28.0, 58.0]);
    assert_eq!(result.skip_probability, 0.375);
    // Without splitting, the 58-day gap would drag the mean past 35.
    assert!(result.mean_cycle_length < 29.0);
}

#[test]
fn test_forecast_empty() {
    let result = forecast(&[]);
    assert_eq!(
        result,
        ForecastResult {
            next_start_date: None,
            next_end_date: None,
            mean_cycle_length: 28.0,
            mean_period_duration: 5,
            confidence: 0,
        }
    );
}

#[test]
fn test_forecast_three_regular_cycles() {
    let history = regular_history("2024-01-01", 28, 5, 3);
    let result = forecast(&history);
    assert_eq!(result.confidence, 85);
    assert_eq!(result.next_start_date, Some(day("2024-02-26") + TimeDelta::days(28)));
    assert_eq!(result.mean_period_duration, 5);
}

#[test]
fn test_consistent_fourth_cycle_keeps_confidence() {
    let three = forecast(&regular_history("2024-01-01", 28, 5, 3));
    let four = forecast(&regular_history("2024-01-01", 28, 5, 4));
    assert_eq!(four.confidence, three.confidence);
    assert_eq!(four.mean_cycle_length, 28.0);
}

#[test]
fn test_forgotten_log_does_not_break_forecast() {
    // March was never logged, so one recorded gap spans two cycles.
    let mut history = regular_history("2024-01-01", 28, 5, 3);
    history.push(CycleHistoryEntry::new(day("2024-04-22"), day("2024-04-26")));
    history.push(CycleHistoryEntry::new(day("2024-05-20"), day("2024-05-24")));

    let result = forecast(&history);
    assert!((result.mean_cycle_length - 28.0).abs() < 1.0);
    assert_eq!(result.next_start_date, Some(day("2024-06-17")));
}

#[test]
fn test_forecast_is_idempotent() {
    let history = regular_history("2023-11-03", 31, 6, 5);
    let first = forecast(&history);
    let second = forecast(&history);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_forecast_from_stored_json() {
    let json = r#"[
        {"startDate": "2024-02-26T00:00:00.000Z", "endDate": "2024-03-01T00:00:00.000Z"},
        {"startDate": "2024-01-01T00:00:00.000Z", "endDate": "2024-01-05T00:00:00.000Z"},
        {"startDate": "2024-01-29T00:00:00.000Z", "endDate": "2024-02-02T00:00:00.000Z"},
        {"startDate": "", "endDate": ""}
    ]"#;
    let result = EngineConfig::default().forecaster().forecast_json(json).unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["nextStartDate"], "2024-03-25");
    assert_eq!(value["nextEndDate"], "2024-03-29");
    assert_eq!(value["meanCycleLength"], 28.0);
    assert_eq!(value["confidence"], 85);
}

#[test]
fn test_configured_confidence_bases() {
    let cfg = EngineConfig::from_toml_str(
        "[forecast]\nsingle_entry_confidence = 30.0\nmax_confidence = 90\n",
    )
    .unwrap();
    let forecaster = cfg.forecaster();
    let result = forecaster.forecast(&regular_history("2024-01-01", 28, 5, 1));
    assert_eq!(result.confidence, 30);
}
