use crate::config::{self, Config};
use anyhow::{Context, Result};
use std::path::Path;

pub fn list(config: &Config) -> Result<()> {
    let mut shown = config.clone();
    if shown.google.client_secret.is_some() {
        shown.google.client_secret = Some("********".to_string());
    }
    let toml_str = toml::to_string_pretty(&shown).context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

pub fn get(key: &str, config: &Config) -> Result<()> {
    println!("{}", config.get_value(key)?);
    Ok(())
}

/// Update one key in the config file at `path`, validating the result
pub fn set(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = config::load_from_path(path)?;
    config.set_value(key, value)?;
    config::save_to_path(&config, path)?;
    println!("✓ {} = {}", key, config.get_value(key)?);
    Ok(())
}
