use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use skiptrack_core::{
    cycle_lengths_from_start_dates, parse_days, CycleHistoryEntry, EngineConfig,
    ReversedEntryPolicy,
};
use tracing::debug;

#[derive(Args)]
pub struct LengthsArgs {
    /// Period start dates (YYYY-MM-DD or RFC 3339), in any order
    dates: Vec<String>,
}

#[derive(Args)]
pub struct EstimateArgs {
    /// Observed cycle lengths in days
    lengths: Vec<f64>,
}

#[derive(Args)]
pub struct ForecastArgs {
    /// JSON file with an array of {"startDate", "endDate"} objects ("-" for stdin)
    #[arg(long)]
    history: Option<PathBuf>,

    /// Fail on entries that end before they start
    #[arg(long)]
    strict: bool,
}

pub fn lengths(args: LengthsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dates = parse_days(&args.dates)?;
    let lengths = cycle_lengths_from_start_dates(&dates);
    println!("{}", serde_json::to_string_pretty(&lengths)?);
    Ok(())
}

pub fn estimate(args: EstimateArgs, cfg: &EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(bad) = args.lengths.iter().find(|l| !l.is_finite() || **l <= 0.0) {
        return Err(format!("cycle lengths must be positive, got {bad}").into());
    }
    let result = cfg.estimator().estimate(&args.lengths);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub fn forecast(args: ForecastArgs, cfg: &EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_history(args.history.as_ref())?;
    let history: Vec<CycleHistoryEntry> = serde_json::from_str(&raw)?;
    debug!(entries = history.len(), "history loaded");

    let mut cfg = cfg.clone();
    if args.strict {
        cfg.forecast.reversed_entries = ReversedEntryPolicy::Reject;
    }

    let result = cfg.forecaster().try_forecast(&history)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn read_history(path: Option<&PathBuf>) -> Result<String, std::io::Error> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
