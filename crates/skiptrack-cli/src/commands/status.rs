use clap::Args;
use skiptrack_core::{cycle_status, parse_day};

#[derive(Args)]
pub struct StatusArgs {
    /// First day of the most recent period
    #[arg(long)]
    last_period: String,

    /// Cycle length in days (fractional values are rounded)
    #[arg(long, default_value_t = 28.0)]
    cycle_length: f64,

    /// Period duration in days
    #[arg(long, default_value_t = 5)]
    period_duration: i64,

    /// Day to evaluate (defaults to today)
    #[arg(long)]
    today: Option<String>,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let last_period = parse_day(&args.last_period)?;
    let today = match args.today {
        Some(s) => parse_day(&s)?,
        None => chrono::Local::now().date_naive(),
    };

    let status = cycle_status(
        last_period,
        args.cycle_length.round() as i64,
        args.period_duration,
        today,
    );
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
