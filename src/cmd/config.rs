//! Configuration view and initialization commands — `vitrine config`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use vitrine::config::{AppConfig, DEFAULT_CONFIG_FILE};

use super::super::{Cli, ConfigCommands};

pub fn cmd_config(cli: &Cli, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => {
            let config = AppConfig::load(cli.config.as_deref())?;
            match &cli.config {
                Some(path) => println!("# Config file: {}", path.display()),
                None if PathBuf::from(DEFAULT_CONFIG_FILE).exists() => {
                    println!("# Config file: {}", DEFAULT_CONFIG_FILE)
                }
                None => println!("# No {} found; defaults + environment", DEFAULT_CONFIG_FILE),
            }
            println!();
            print!("{}", config.to_toml_string()?);
        }
        Some(ConfigCommands::Validate) => {
            let config = AppConfig::load(cli.config.as_deref())?;
            config.validate()?;
            println!("Configuration is valid.");
        }
        Some(ConfigCommands::Init) => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            if path.exists() {
                anyhow::bail!("{} already exists; not overwriting", path.display());
            }
            let content = AppConfig::default().to_toml_string()?;
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote default configuration to {}", path.display());
        }
    }
    Ok(())
}
