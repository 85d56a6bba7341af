//! Recursive tree scanner.
//!
//! Walks a directory tree depth-first on a single thread, keeping the
//! directory view, version history, and search postings current. The
//! walk is fail-fast: the first filesystem or store error aborts the
//! whole run.
//!
//! Concurrent scans of the same owner tree are not supported: version
//! check-then-append is not atomic, so the caller must serialize runs
//! per owner.

use std::path::{Component, Path};
use std::sync::atomic::{AtomicU64, Ordering};

use super::directory_view::DirectoryViewUpdater;
use super::search::SearchIndexer;
use super::versions::{VersionOutcome, VersionTracker};
use crate::error::ScanError;
use crate::storage::StoreHandle;
use crate::Result;

/// Platform noise entries skipped during scans.
const EXCLUDED_NAMES: &[&str] = &[".DS_Store", "Icon\r"];

/// Scan statistics.
#[derive(Debug, Default)]
pub struct ScanStats {
    pub directories_visited: AtomicU64,
    pub files_seen: AtomicU64,
    pub files_unchanged: AtomicU64,
    pub versions_recorded: AtomicU64,
}

impl ScanStats {
    /// Create new stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of current stats.
    #[must_use]
    pub fn snapshot(&self) -> ScanStatsSnapshot {
        ScanStatsSnapshot {
            directories_visited: self.directories_visited.load(Ordering::Relaxed),
            files_seen: self.files_seen.load(Ordering::Relaxed),
            files_unchanged: self.files_unchanged.load(Ordering::Relaxed),
            versions_recorded: self.versions_recorded.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of scan stats.
#[derive(Debug, Clone, Copy)]
pub struct ScanStatsSnapshot {
    pub directories_visited: u64,
    pub files_seen: u64,
    pub files_unchanged: u64,
    pub versions_recorded: u64,
}

/// Sequential depth-first tree scanner.
///
/// Holds one handle to the store, passed to each collaborator at
/// construction; nothing here is process-global.
pub struct TreeScanner {
    versions: VersionTracker,
    view: DirectoryViewUpdater,
    search: SearchIndexer,
    stats: ScanStats,
}

impl TreeScanner {
    /// Create a scanner with all collaborators over one store handle.
    #[must_use]
    pub fn new(store: StoreHandle) -> Self {
        Self {
            versions: VersionTracker::new(store.clone()),
            view: DirectoryViewUpdater::new(store.clone()),
            search: SearchIndexer::new(store),
            stats: ScanStats::new(),
        }
    }

    /// Recursively index `root` under `owner`.
    ///
    /// The root's relative path is the empty string; children are keyed
    /// by their path relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns the first filesystem or store error encountered; no
    /// partial-failure isolation per entry.
    pub fn scan(&self, owner: &str, root: &Path) -> Result<ScanStatsSnapshot> {
        tracing::info!(owner, root = %root.display(), "Starting tree scan");

        self.scan_directory(owner, root, root)?;

        let snapshot = self.stats.snapshot();
        tracing::info!(
            owner,
            root = %root.display(),
            directories = snapshot.directories_visited,
            files = snapshot.files_seen,
            unchanged = snapshot.files_unchanged,
            recorded = snapshot.versions_recorded,
            "Tree scan complete"
        );

        Ok(snapshot)
    }

    fn scan_directory(&self, owner: &str, root: &Path, dir: &Path) -> Result<()> {
        self.stats.directories_visited.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(dir = %dir.display(), "Scanning directory");

        let dir_rel = relative_key(root, dir)?;

        let mut entries = Vec::new();
        let reader = std::fs::read_dir(dir).map_err(|e| ScanError::read_dir(dir, &e))?;
        for entry in reader {
            let entry = entry.map_err(|e| ScanError::read_dir(dir, &e))?;
            entries.push(entry);
        }
        // deterministic walk order; the store does not depend on it
        entries.sort_by_key(std::fs::DirEntry::file_name);

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            if EXCLUDED_NAMES.contains(&name.as_str()) {
                continue;
            }

            let path = entry.path();
            // full stat, so directory symlinks classify as directories
            let metadata = std::fs::metadata(&path)
                .map_err(|e| ScanError::read_file(&path, &e))?;

            if metadata.is_dir() {
                self.view.upsert_directory(owner, &dir_rel, &name)?;
                self.scan_directory(owner, root, &path)?;
            } else {
                self.stats.files_seen.fetch_add(1, Ordering::Relaxed);
                let file_rel = relative_key(root, &path)?;

                match self.versions.check_and_record(owner, &file_rel, &path)? {
                    VersionOutcome::Unchanged => {
                        self.stats.files_unchanged.fetch_add(1, Ordering::Relaxed);
                    }
                    VersionOutcome::Recorded { size, mtime, .. } => {
                        self.view.upsert_file(owner, &dir_rel, &name, size, mtime)?;
                        self.search.index(owner, &name, &file_rel)?;
                        self.stats.versions_recorded.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Path relative to the scan root, as a `/`-joined key.
///
/// The root itself maps to the empty string.
fn relative_key(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| ScanError::OutsideRoot {
        path: path.display().to_string(),
        root: root.display().to_string(),
    })?;

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    Ok(parts.join("/"))
}
