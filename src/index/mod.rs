//! Ingestion and indexing engine.
//!
//! The scanner walks a file tree depth-first and drives three
//! collaborators per entry: the version tracker (content-addressed
//! change detection), the directory view updater (materialized
//! listings), and the search indexer (filename postings).

mod directory_view;
mod scanner;
mod search;
mod versions;

pub use directory_view::DirectoryViewUpdater;
pub use scanner::{ScanStats, ScanStatsSnapshot, TreeScanner};
pub use search::{tokenize, SearchIndexer};
pub use versions::{hash_bytes, VersionOutcome, VersionTracker};
