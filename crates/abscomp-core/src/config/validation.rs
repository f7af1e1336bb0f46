//! Configuration validation and error reporting

use std::collections::HashSet;

use super::types::{Config, LibraryConfig, SCHEMA_VERSION};
use crate::error::Result;

/// Largest page size the server is asked for
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(config: &Config) -> Result<()> {
        if config.schema.version != SCHEMA_VERSION {
            anyhow::bail!(
                "Unsupported schema version \"{}\" (expected \"{SCHEMA_VERSION}\")",
                config.schema.version
            );
        }

        Self::validate_library("abs_lib_one", &config.abs_lib_one)?;
        Self::validate_library("abs_lib_two", &config.abs_lib_two)?;

        let fields = &config.comparison.fields;
        if fields.is_empty() {
            anyhow::bail!("comparison.fields must name at least one field");
        }
        let mut seen = HashSet::with_capacity(fields.len());
        for field in fields {
            if !seen.insert(field) {
                anyhow::bail!("comparison.fields lists \"{field}\" more than once");
            }
        }

        if !(1..=MAX_PAGE_SIZE).contains(&config.fetch.page_size) {
            anyhow::bail!(
                "fetch.page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                config.fetch.page_size
            );
        }
        if config.fetch.timeout_secs == 0 {
            anyhow::bail!("fetch.timeout_secs must be greater than zero");
        }

        Ok(())
    }

    fn validate_library(section: &str, library: &LibraryConfig) -> Result<()> {
        let url = library.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("[{section}] url must start with http:// or https://, got \"{url}\"");
        }
        if library.token.trim().is_empty() {
            anyhow::bail!("[{section}] token cannot be empty");
        }
        if library.library.trim().is_empty() {
            anyhow::bail!("[{section}] library cannot be empty");
        }
        Ok(())
    }
}
