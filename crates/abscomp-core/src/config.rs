//! Configuration file discovery, parsing, and validation
//!
//! This module handles:
//! - Config file discovery (`--config`, `absconfig.toml`, XDG config dir)
//! - TOML parsing with serde
//! - Validation and error reporting

mod discovery;
mod types;
mod validation;


use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

pub use discovery::{ConfigDiscovery, ConfigFiles, PROJECT_CONFIG};
pub use types::{ComparisonConfig, Config, FetchConfig, LibraryConfig, SCHEMA_VERSION, SchemaConfig};
pub use validation::{ConfigValidator, MAX_PAGE_SIZE};

use crate::error::Result;

/// A validated configuration and the file it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    /// File the configuration was read from
    pub path: PathBuf,
    /// Parsed and validated configuration
    pub config: Config,
}

/// Configuration manager that coordinates discovery, parsing, and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Locate, parse, and validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no config file is found, an explicit `--config`
    /// path does not exist, or the file is unreadable or invalid.
    pub fn load(cli_config_path: Option<&Path>) -> Result<LoadedConfig> {
        let files = ConfigDiscovery::discover(cli_config_path);

        let Some(path) = files.selected() else {
            let global = ConfigDiscovery::global_config_path()
                .map(|p| format!(" or {}", p.display()))
                .unwrap_or_default();
            anyhow::bail!("No configuration file found; create ./{PROJECT_CONFIG}{global}");
        };

        if files.cli.is_some() && !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        debug!(path = %path.display(), "loading configuration");
        let config = Self::load_file(path)?;

        Ok(LoadedConfig {
            path: path.to_path_buf(),
            config,
        })
    }

    /// Parse and validate a single config file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails validation.
    pub fn load_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Parse and validate config text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or fails validation.
    pub fn parse(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
