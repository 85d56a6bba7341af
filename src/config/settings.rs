//! Configuration settings and validation.

use crate::{Error, Result};
use std::path::PathBuf;

/// Default listing page size (entries displayed per page).
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Main configuration for treeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the `SQLite` index database.
    pub data_dir: PathBuf,

    /// Listing page size for browse queries.
    pub page_size: usize,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON logging output.
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl Config {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::config("page_size cannot be 0"));
        }

        if self.page_size > 1000 {
            return Err(Error::config("page_size cannot exceed 1000"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Get the path to the `SQLite` index database file.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("treeline.db")
    }
}
