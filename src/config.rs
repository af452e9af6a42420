//! Configuration management for querybox.
//!
//! Loads settings from a TOML file. Every section is optional and falls back
//! to the built-in defaults.

use crate::error::{QueryBoxError, Result};
use crate::tui::autocomplete::{Limits, MAX_COLUMN_CANDIDATES, MAX_TABLE_CANDIDATES};
use crate::tui::query_box::{QueryBoxOptions, DEFAULT_BLUR_DELAY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// JSON schema file. The demo schema is used when unset.
    #[serde(default)]
    pub schema_path: Option<PathBuf>,

    /// Candidate limits and blur timing.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Input presentation.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Completion settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Maximum table candidates shown.
    #[serde(default = "default_max_tables")]
    pub max_tables: usize,

    /// Maximum column candidates shown.
    #[serde(default = "default_max_columns")]
    pub max_columns: usize,

    /// Grace period between losing focus and closing the dropdown.
    #[serde(default = "default_blur_delay_ms")]
    pub blur_delay_ms: u64,
}

fn default_max_tables() -> usize {
    MAX_TABLE_CANDIDATES
}

fn default_max_columns() -> usize {
    MAX_COLUMN_CANDIDATES
}

fn default_blur_delay_ms() -> u64 {
    DEFAULT_BLUR_DELAY.as_millis() as u64
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            max_tables: default_max_tables(),
            max_columns: default_max_columns(),
            blur_delay_ms: default_blur_delay_ms(),
        }
    }
}

/// Input presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiConfig {
    /// Text shown while the query is empty.
    #[serde(default)]
    pub placeholder: String,

    /// Start in read-only mode.
    #[serde(default)]
    pub disabled: bool,
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("querybox")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| QueryBoxError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            QueryBoxError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let limits = [
            ("max_tables", self.completion.max_tables, MAX_TABLE_CANDIDATES),
            ("max_columns", self.completion.max_columns, MAX_COLUMN_CANDIDATES),
        ];
        for (name, value, max) in limits {
            if !(1..=max).contains(&value) {
                return Err(QueryBoxError::config(format!(
                    "Configuration error in {}:\n  completion.{name} must be between 1 and {max}, got {value}",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Builds the query box options. `read_only` forces the box disabled.
    pub fn query_box_options(&self, read_only: bool) -> QueryBoxOptions {
        QueryBoxOptions {
            placeholder: self.ui.placeholder.clone(),
            disabled: self.ui.disabled || read_only,
            limits: Limits {
                max_tables: self.completion.max_tables.clamp(1, MAX_TABLE_CANDIDATES),
                max_columns: self.completion.max_columns.clamp(1, MAX_COLUMN_CANDIDATES),
            },
            blur_delay: Duration::from_millis(self.completion.blur_delay_ms),
        }
    }
}
