//! Integration tests for loading the engine configuration from disk.

use std::io::Write;

use skiptrack_core::{ConfigError, CycleHistoryEntry, EngineConfig, ReversedEntryPolicy};

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[estimator]
prior_mu = 30.0
z_score = 1.645

[forecast]
reversed_entries = "drop"
"#
    )
    .unwrap();

    let cfg = EngineConfig::load_from(file.path()).unwrap();
    assert_eq!(cfg.estimator.prior_mu, 30.0);
    assert_eq!(cfg.estimator.z_score, 1.645);
    assert_eq!(cfg.forecast.reversed_entries, ReversedEntryPolicy::Drop);

    // The configured prior is what a one-gap history is shrunk toward.
    let result = cfg.estimator().estimate(&[26.0]);
    assert_eq!(result.mean_cycle_length, 28.0);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::LoadFailed { .. }));
}

#[test]
fn test_load_invalid_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[estimator]\nprior_n = 0.0").unwrap();
    let err = EngineConfig::load_from(file.path()).unwrap_err();
    assert!(err.to_string().contains("estimator.prior_n"));
}

#[test]
fn test_reject_policy_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[forecast]\nreversed_entries = \"reject\"").unwrap();
    let cfg = EngineConfig::load_from(file.path()).unwrap();

    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
    let history = [CycleHistoryEntry::new(start, end)];
    assert!(cfg.forecaster().try_forecast(&history).is_err());
}
