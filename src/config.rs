// src/config.rs

//! Configuration loading utilities.
//!
//! Configuration is read once per invocation: a TOML file (or built-in
//! defaults), then environment overrides, then validation.

use std::path::Path;

use crate::error::Result;
use crate::models::Config;

/// Load configuration from a TOML file, then apply environment overrides.
///
/// A missing file means defaults; a malformed one is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        Config::load(path)?
    } else {
        log::info!("No config file at {}. Using defaults.", path.display());
        Config::default()
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

/// Load configuration for serverless deployments.
///
/// Reads the file named by `CONFIG_PATH` when set, otherwise starts from
/// defaults; environment overrides apply either way.
pub fn load_from_env() -> Result<Config> {
    let mut config = match std::env::var("CONFIG_PATH") {
        Ok(path) => Config::load(&path)?,
        Err(_) => Config::default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}
