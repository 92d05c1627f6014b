use std::path::Path;

use clap::Subcommand;
use skiptrack_core::EngineConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dot-separated key (e.g. "estimator.prior_mu")
        key: String,
    },
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file location
    Path,
}

pub fn run(
    action: ConfigAction,
    cfg: &EngineConfig,
    override_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => match cfg.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::Show => {
            print!("{}", cfg.to_toml_string()?);
        }
        ConfigAction::Path => {
            let path = match override_path {
                Some(path) => path.to_path_buf(),
                None => EngineConfig::path()?,
            };
            println!("{}", path.display());
        }
    }
    Ok(())
}
