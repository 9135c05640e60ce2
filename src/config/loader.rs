//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. TOML config file (explicit path, or `codecompanion.toml` if present)
//! 3. Environment variables (CODECOMPANION_* prefix, `__` as section separator,
//!    e.g. `CODECOMPANION_PROVIDER__API_KEY` -> `provider.api_key`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::Path;

use tracing::debug;

use super::types::Config;
use crate::types::{CompanionError, Result};

/// Default config file looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "codecompanion.toml";

/// Environment variable prefix.
const ENV_PREFIX: &str = "CODECOMPANION_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with the full resolution chain:
    /// defaults → file → env vars. Validates before returning.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(CompanionError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            debug!("Loading config from: {DEFAULT_CONFIG_FILE}");
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| CompanionError::Config(format!("Configuration error: {e}")))?;

        config.validate()?;

        Ok(config)
    }

    /// Write the built-in defaults to `path` as a starting point for editing.
    pub fn write_default(path: &Path) -> Result<()> {
        let rendered = toml::to_string_pretty(&Config::default())
            .map_err(|e| CompanionError::Config(e.to_string()))?;
        std::fs::write(path, rendered)?;
        Ok(())
    }

    /// Load configuration from a specific file only (defaults + that file).
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| CompanionError::Config(format!("Configuration error: {e}")))?;

        config.validate()?;

        Ok(config)
    }
}
