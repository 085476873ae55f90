//! Corpus configuration, loaded from TOML.
//!
//! Every section and key is optional; missing values fall back to the
//! defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::export::Format;
use crate::filters::Filters;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Exact case matching. Default: false
    pub case_sensitive: bool,
}

/// Input screening for one side of the corpus (texts or entities).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Apply `filters` when inputs are set
    pub filter: bool,
    pub filters: Filters,
    /// Entity texts dropped regardless of `filter`. Ignored for texts.
    pub excludes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: Format,
    /// Batch size for training exports; None means one batch
    pub chunk_size: Option<usize>,
}

// =============================================================================
// Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub matching: MatchingConfig,
    pub texts: InputConfig,
    pub entities: InputConfig,
    pub export: ExportConfig,
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Shorthand for a default config with the given case mode.
    pub fn case_sensitive(case_sensitive: bool) -> Self {
        let mut config = Self::default();
        config.matching.case_sensitive = case_sensitive;
        config
    }
}
