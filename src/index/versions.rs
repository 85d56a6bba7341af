//! Content-addressed version tracking.
//!
//! Decides, per file, whether a new version must be recorded. The
//! decision is made on a whole-file blake3 digest: size or mtime
//! changes alone never trigger a new version, and unchanged content
//! never produces one.

use std::path::Path;

use blake3::Hasher;

use crate::error::ScanError;
use crate::storage::{
    decode, encode, parse_version_key, row_key, version_key, ColumnStore, GetOptions, StoreHandle,
    Table, VersionInfo,
};
use crate::Result;

/// Outcome of a change-detection check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOutcome {
    /// Content hash matches the latest recorded version; nothing written.
    Unchanged,
    /// A new version was appended to the file's history.
    Recorded {
        version_id: i64,
        size: u64,
        mtime: i64,
    },
}

/// Tracks file version history in the store.
pub struct VersionTracker {
    store: StoreHandle,
}

impl VersionTracker {
    /// Create a tracker over the given store.
    #[must_use]
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Check a file's content against its recorded history and append a
    /// new version if the content changed.
    ///
    /// Reads only the most recent version (reverse, count-1 range read);
    /// the store may serve a stale latest under eventual consistency,
    /// which at worst double-records a version, never loses one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or stat'd, or if the
    /// store read or write fails. Either aborts the surrounding scan.
    pub fn check_and_record(
        &self,
        owner: &str,
        relative_path: &str,
        absolute_path: &Path,
    ) -> Result<VersionOutcome> {
        let key = row_key(owner, relative_path);
        let previous = self.latest_version(&key)?;

        let bytes = std::fs::read(absolute_path)
            .map_err(|e| ScanError::read_file(absolute_path, &e))?;
        let content_hash = hash_bytes(&bytes);

        if let Some((_, prev_info)) = &previous {
            if prev_info.content_hash == content_hash {
                tracing::debug!(key = %key, "File unchanged, skipping");
                return Ok(VersionOutcome::Unchanged);
            }
        }

        let metadata = std::fs::metadata(absolute_path)
            .map_err(|e| ScanError::read_file(absolute_path, &e))?;
        let mtime = unix_mtime(&metadata);
        let size = metadata.len();

        // Monotonic tiebreaker: two versions committed within one clock
        // tick get distinct, strictly increasing ids.
        let version_id = match previous {
            Some((prev_id, _)) => now_millis().max(prev_id + 1),
            None => now_millis(),
        };

        let info = VersionInfo {
            size,
            mtime,
            content_hash,
        };
        self.store.insert(
            Table::Files,
            &key,
            vec![(version_key(version_id), encode("VersionInfo", &info)?)],
        )?;

        tracing::info!(key = %key, version_id, size, "Recorded new version");

        Ok(VersionOutcome::Recorded {
            version_id,
            size,
            mtime,
        })
    }

    /// Fetch the most recent version of a file, if any.
    fn latest_version(&self, key: &str) -> Result<Option<(i64, VersionInfo)>> {
        let columns = self.store.get(Table::Files, key, &GetOptions::latest())?;
        match columns.into_iter().next() {
            Some((col_key, value)) => {
                let version_id = parse_version_key(&col_key)?;
                let info = decode::<VersionInfo>("VersionInfo", &value)?;
                Ok(Some((version_id, info)))
            }
            None => Ok(None),
        }
    }
}

/// Whole-file blake3 digest, hex-encoded.
///
/// The empty file hashes to the well-defined empty-content digest and
/// is tracked like any other file.
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize().to_hex().to_string()
}

/// Current Unix time in milliseconds.
fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Filesystem mtime as Unix seconds.
fn unix_mtime(metadata: &std::fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(0))
        .unwrap_or(0)
}
