//! Coordinator configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! initial_page = 1
//! fetch_delay_ms = 800
//! fallback_error_message = "An unknown error occurred"
//! page_bound = "unbounded"   # or "total"
//! history_limit = 100
//! ```

use crate::core::DEFAULT_HISTORY_LIMIT;
use crate::fetch::{DEFAULT_ERROR_MESSAGE, DEFAULT_FETCH_DELAY};
use crate::pagination::PageBound;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {source}")]
    ParseError {
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Settings for a coordinator and its stand-in data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page fetched on start-up
    pub initial_page: u32,
    /// Delay of the built-in `DelayedSource`, in milliseconds
    pub fetch_delay_ms: u64,
    /// Stored when a fetch fails without a message
    pub fallback_error_message: String,
    /// Whether `NextPage` stops at the known total
    pub page_bound: PageBound,
    /// Transitions kept per machine, and page-change fetches kept by the
    /// coordinator
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_page: 1,
            fetch_delay_ms: DEFAULT_FETCH_DELAY.as_millis() as u64,
            fallback_error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            page_bound: PageBound::Unbounded,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|source| ConfigError::ParseError { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields `Config::default()`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Checks:
    /// - `initial_page` is at least 1
    /// - `fallback_error_message` is not blank
    /// - `history_limit` is at least 1
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_page == 0 {
            return Err(ConfigError::ValidationError {
                message: "initial_page must be at least 1".to_string(),
            });
        }

        if self.fallback_error_message.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "fallback_error_message must not be empty".to_string(),
            });
        }

        if self.history_limit == 0 {
            return Err(ConfigError::ValidationError {
                message: "history_limit must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }
}
