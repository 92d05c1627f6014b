use std::path::PathBuf;

use clap::{Parser, Subcommand};
use skiptrack_core::EngineConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "skiptrack", version, about = "SkipTrack cycle prediction CLI")]
struct Cli {
    /// Engine configuration file (defaults to ~/.config/skiptrack/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cycle lengths between period start dates
    Lengths(commands::predict::LengthsArgs),
    /// Skip-aware estimate of the mean cycle length
    Estimate(commands::predict::EstimateArgs),
    /// Forecast the next period from a JSON history
    Forecast(commands::predict::ForecastArgs),
    /// Current position within the cycle
    Status(commands::status::StatusArgs),
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "skiptrack_core=debug,skiptrack=debug,warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env("SKIPTRACK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let cfg = match path {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::load()?,
    };
    Ok(cfg)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(cli.config.as_ref()).and_then(|cfg| match cli.command {
        Commands::Lengths(args) => commands::predict::lengths(args),
        Commands::Estimate(args) => commands::predict::estimate(args, &cfg),
        Commands::Forecast(args) => commands::predict::forecast(args, &cfg),
        Commands::Status(args) => commands::status::run(args),
        Commands::Config { action } => commands::config::run(action, &cfg, cli.config.as_deref()),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
