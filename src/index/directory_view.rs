//! Materialized directory view maintenance.
//!
//! One row per directory maps sort keys to cached child snapshots, so
//! the browsing side renders a whole listing page from a single range
//! read. The view is a cache over the authoritative file history:
//! last-write-wins per child, never deleted.

use crate::storage::{encode, entry_sort_key, row_key, ColumnStore, EntryInfo, StoreHandle, Table};
use crate::Result;

/// Writes per-directory listing rows.
pub struct DirectoryViewUpdater {
    store: StoreHandle,
}

impl DirectoryViewUpdater {
    /// Create an updater over the given store.
    #[must_use]
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Record a child directory under its parent's listing.
    ///
    /// Idempotent: re-invoking with the same arguments writes the same
    /// value again.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn upsert_directory(&self, owner: &str, dir_path: &str, name: &str) -> Result<()> {
        self.store.insert(
            Table::Directories,
            &row_key(owner, dir_path),
            vec![(
                entry_sort_key(name, true),
                encode("EntryInfo", &EntryInfo::Directory)?,
            )],
        )
    }

    /// Record (or refresh) a child file's cached latest metadata under
    /// its parent's listing.
    ///
    /// Replaces any prior cached value for that child.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn upsert_file(
        &self,
        owner: &str,
        dir_path: &str,
        name: &str,
        size: u64,
        mtime: i64,
    ) -> Result<()> {
        self.store.insert(
            Table::Directories,
            &row_key(owner, dir_path),
            vec![(
                entry_sort_key(name, false),
                encode("EntryInfo", &EntryInfo::File { size, mtime })?,
            )],
        )
    }
}
