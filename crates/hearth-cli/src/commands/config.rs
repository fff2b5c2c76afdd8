use std::path::Path;

use clap::Subcommand;
use hearth_core::EngineConfig;

use super::{load_config, print_json, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dot-separated key (e.g. "jokers.monthly_allocation")
        key: String,
    },
    /// Set a config value
    Set {
        /// Dot-separated key
        key: String,
        /// New value
        value: String,
    },
    /// Show the whole config
    Show,
    /// Print the config file location
    Path,
    /// Reset config to defaults
    Reset,
}

fn save(config: &EngineConfig, path: Option<&Path>) -> CliResult {
    match path {
        Some(p) => config.save_to(p)?,
        None => config.save()?,
    }
    Ok(())
}

pub fn run(action: ConfigAction, config_path: Option<&Path>) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config(config_path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(config_path)?;
            config.set(&key, &value)?;
            save(&config, config_path)?;
            println!("ok");
        }
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            print_json(&config)?;
        }
        ConfigAction::Path => {
            let path = match config_path {
                Some(p) => p.to_path_buf(),
                None => EngineConfig::path()?,
            };
            println!("{}", path.display());
        }
        ConfigAction::Reset => {
            save(&EngineConfig::default(), config_path)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
