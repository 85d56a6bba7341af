//! Error types and Result aliases for treeline.
//!
//! This module defines the error hierarchy used throughout the crate.
//! All public functions return `Result<T, Error>` or `Result<T>`.

use thiserror::Error;

/// Result type alias using treeline's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for treeline operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Store error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Filesystem scan error.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Storage-specific errors.
///
/// Any storage error aborts the run that raised it; no automatic retry
/// or backoff is attempted.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The store rejected or could not complete an operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// `SQLite` adapter error.
    #[error("database error: {0}")]
    Database(String),

    /// A stored value could not be encoded or decoded.
    #[error("codec error for {entity}: {reason}")]
    Codec {
        entity: &'static str,
        reason: String,
    },

    /// Schema migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

/// Filesystem scan errors.
///
/// Hash computation failures (a file disappearing between listing and
/// read) surface as `ReadFile`.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A directory could not be listed.
    #[error("failed to read directory '{path}': {reason}")]
    ReadDir { path: String, reason: String },

    /// A file could not be read or stat'd.
    #[error("failed to read file '{path}': {reason}")]
    ReadFile { path: String, reason: String },

    /// An entry resolved outside the scan root.
    #[error("path '{path}' is not under scan root '{root}'")]
    OutsideRoot { path: String, root: String },
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl StorageError {
    /// Create a codec error.
    pub fn codec(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::Codec {
            entity,
            reason: reason.into(),
        }
    }
}

impl ScanError {
    /// Create a read-dir error from an I/O failure.
    pub fn read_dir(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::ReadDir {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    /// Create a read-file error from an I/O failure.
    pub fn read_file(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::ReadFile {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests;
