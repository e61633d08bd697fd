//! `dataproc config` subcommands

use crate::cli::args::ConfigCommands;
use crate::config::{ConfigStore, ConfigValue};
use anyhow::{bail, Result};
use std::path::Path;
use tracing::info;

pub fn run_config_command(command: ConfigCommands, config_path: &Path) -> Result<()> {
    let (mut store, _outcome) = ConfigStore::open(config_path);

    match command {
        ConfigCommands::Show => {
            println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
        }
        ConfigCommands::Get { key } => match store.value(&key) {
            Some(value) => println!("{}", value),
            None => bail!("Configuration key '{}' not found", key),
        },
        ConfigCommands::Set { key, value } => {
            let value = parse_value(value);
            println!("{} = {}", key, value);
            store.set(key, value);
            store.persist()?;
            info!("Saved configuration to {}", config_path.display());
        }
    }

    Ok(())
}

/// JSON if it parses, a plain string otherwise
fn parse_value(raw: String) -> ConfigValue {
    serde_json::from_str(&raw).unwrap_or(ConfigValue::String(raw))
}
