//! Data models and key codecs for the index layout.
//!
//! The in-memory model keeps entry kinds as a tagged enum; the `"0:"` /
//! `"1:"` sort-key prefix that makes directories sort before files in
//! column order exists only at this codec boundary, never in callers.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::Result;

/// Width of a zero-padded version-id column key.
///
/// Version ids are Unix milliseconds; padding keeps lexicographic column
/// order identical to numeric order.
pub const VERSION_KEY_WIDTH: usize = 20;

/// Cached snapshot of a directory child, as stored in the directory view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntryInfo {
    /// A child directory.
    Directory,
    /// A child file with its latest known metadata.
    File { size: u64, mtime: i64 },
}

impl EntryInfo {
    /// Whether this entry is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// One recorded version of a file in the authoritative history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// File size in bytes at the time of recording.
    pub size: u64,
    /// Filesystem mtime (Unix seconds) at the time of recording.
    pub mtime: i64,
    /// Whole-file blake3 digest, hex-encoded.
    pub content_hash: String,
}

/// Composite row key: `owner:path`.
///
/// The scan root's relative path is the empty string, so the root
/// directory's row key is `owner:`.
#[must_use]
pub fn row_key(owner: &str, path: &str) -> String {
    format!("{owner}:{path}")
}

/// Encode a directory child's column key.
///
/// Directories get `"0:"`, files `"1:"`, so every directory sorts
/// strictly before every file within one listing.
#[must_use]
pub fn entry_sort_key(name: &str, is_directory: bool) -> String {
    if is_directory {
        format!("0:{name}")
    } else {
        format!("1:{name}")
    }
}

/// Strip the type prefix from a sort key, yielding the display name.
///
/// Keys without a recognized prefix are returned unchanged; the view
/// only ever contains keys this module produced.
#[must_use]
pub fn display_name(sort_key: &str) -> &str {
    sort_key
        .strip_prefix("0:")
        .or_else(|| sort_key.strip_prefix("1:"))
        .unwrap_or(sort_key)
}

/// Encode a version id as a fixed-width column key.
#[must_use]
pub fn version_key(version_id: i64) -> String {
    format!("{version_id:0width$}", width = VERSION_KEY_WIDTH)
}

/// Decode a version-id column key.
///
/// # Errors
///
/// Returns a codec error if the key is not a decimal integer.
pub fn parse_version_key(key: &str) -> Result<i64> {
    key.parse::<i64>()
        .map_err(|e| StorageError::codec("versionId", format!("'{key}': {e}")).into())
}

/// Serialize a model value for storage.
///
/// # Errors
///
/// Returns a codec error if serialization fails.
pub fn encode<T: Serialize>(entity: &'static str, value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| StorageError::codec(entity, e.to_string()).into())
}

/// Deserialize a stored value.
///
/// # Errors
///
/// Returns a codec error if the bytes are not a valid encoding of `T`.
pub fn decode<T: for<'de> Deserialize<'de>>(entity: &'static str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::codec(entity, e.to_string()).into())
}
