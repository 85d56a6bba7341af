//! Configuration management for treeline.
//!
//! Supports configuration from:
//! - Command-line arguments (highest priority)
//! - Environment variables

mod settings;

pub use settings::{Config, DEFAULT_PAGE_SIZE};
