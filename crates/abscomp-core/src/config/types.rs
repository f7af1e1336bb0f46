//! Configuration types and structures

use std::fmt;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::comparison::{FieldDiffer, TextCase};
use crate::error::Result;
use crate::model::{LibrarySide, TrackedField};
use crate::normalize::{KeyStrategy, Normalizer};

/// Schema version this build understands
pub const SCHEMA_VERSION: &str = "1";

const REDACTED: &str = "<redacted>";

/// Configuration schema marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Schema version, currently always "1"
    pub version: String,
}

/// Connection settings for one Audiobookshelf library
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryConfig {
    /// Server base URL, e.g. `https://abs.example.com`
    pub url: String,
    /// API token sent as a bearer credential
    pub token: String,
    /// Library identifier on that server
    pub library: String,
}

impl fmt::Debug for LibraryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryConfig")
            .field("url", &self.url)
            .field("token", &REDACTED)
            .field("library", &self.library)
            .finish()
    }
}

/// Matching and field comparison settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparisonConfig {
    /// How canonical keys are derived
    #[serde(default)]
    pub key: KeyStrategy,

    /// Fields extracted and compared, in report order
    #[serde(default = "default_fields")]
    pub fields: Vec<TrackedField>,

    /// Whether text comparison respects capitalization
    #[serde(default)]
    pub text_case: TextCase,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            key: KeyStrategy::default(),
            fields: default_fields(),
            text_case: TextCase::default(),
        }
    }
}

fn default_fields() -> Vec<TrackedField> {
    TrackedField::DEFAULTS.to_vec()
}

/// HTTP fetch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

const fn default_page_size() -> u32 {
    100
}

const fn default_timeout_secs() -> u64 {
    30
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Schema marker
    pub schema: SchemaConfig,

    /// Library A, the baseline
    pub abs_lib_one: LibraryConfig,

    /// Library B, the candidate
    pub abs_lib_two: LibraryConfig,

    /// Matching and comparison rules
    #[serde(default)]
    pub comparison: ComparisonConfig,

    /// HTTP fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Connection settings for one side of the comparison
    #[must_use]
    pub const fn library(&self, side: LibrarySide) -> &LibraryConfig {
        match side {
            LibrarySide::A => &self.abs_lib_one,
            LibrarySide::B => &self.abs_lib_two,
        }
    }

    /// Normalizer built from the comparison settings
    #[must_use]
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.comparison.key, &self.comparison.fields)
    }

    /// Field differ built from the comparison settings
    #[must_use]
    pub fn differ(&self) -> FieldDiffer {
        self.normalizer().differ(self.comparison.text_case)
    }

    /// Copy of this configuration with both tokens replaced
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.abs_lib_one.token = REDACTED.to_string();
        config.abs_lib_two.token = REDACTED.to_string();
        config
    }

    /// Redacted configuration rendered back to TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_redacted_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.redacted()).context("Failed to render configuration")
    }
}
