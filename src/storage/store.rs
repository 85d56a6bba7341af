//! Abstract ordered wide-column store contract.
//!
//! The index core only ever talks to a [`ColumnStore`]: an ordered
//! key-value service where each row holds a sorted mapping of column
//! keys to opaque values, supporting range reads by column key. The
//! store is assumed eventually consistent; callers must tolerate stale
//! reads when deciding "latest version".

use std::sync::Arc;

use crate::Result;

/// Logical tables in the index layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    /// Materialized directory listings: `owner:dirPath -> {sortKey: EntryInfo}`.
    Directories,
    /// Authoritative append-only version log: `owner:filePath -> {versionId: VersionInfo}`.
    Files,
    /// Filename search postings: `owner:token -> {filePath: marker}`.
    Search,
}

impl Table {
    /// Stable name, used by adapters that need one (SQL table names, logs).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Directories => "directory_view",
            Self::Files => "file_history",
            Self::Search => "search_postings",
        }
    }
}

/// A single column: key plus serialized value.
pub type Column = (String, Vec<u8>);

/// Options for range reads over one row's columns.
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Start column key, inclusive. `None` reads from an end of the row.
    pub start: Option<String>,
    /// Maximum number of columns to return. `None` means unbounded.
    pub count: Option<usize>,
    /// Iterate column keys in descending order.
    pub reversed: bool,
}

impl GetOptions {
    /// Read every column of a row in ascending key order.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Read only the last column of a row (highest key).
    #[must_use]
    pub fn latest() -> Self {
        Self {
            start: None,
            count: Some(1),
            reversed: true,
        }
    }

    /// Read a bounded page starting at an optional cursor.
    #[must_use]
    pub fn page(start: Option<String>, count: usize, reversed: bool) -> Self {
        Self {
            start,
            count: Some(count),
            reversed,
        }
    }
}

/// One insert destined for a [`ColumnStore::batch_write`] unit.
#[derive(Debug, Clone)]
pub struct WriteOp {
    pub table: Table,
    pub row: String,
    pub columns: Vec<Column>,
}

impl WriteOp {
    /// Build a single-column write.
    #[must_use]
    pub fn single(table: Table, row: impl Into<String>, key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            table,
            row: row.into(),
            columns: vec![(key.into(), value)],
        }
    }
}

/// Ordered wide-column store.
///
/// Last write wins per `(row, column)`. Implementations must keep each
/// row's columns sorted by column key so range reads are well-defined.
pub trait ColumnStore: Send + Sync {
    /// Upsert columns under a row.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot complete the write.
    fn insert(&self, table: Table, row: &str, columns: Vec<Column>) -> Result<()>;

    /// Range-read up to `opts.count` columns from one row.
    ///
    /// Returns columns in the traversal order requested (ascending, or
    /// descending when `opts.reversed`). A missing row reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot complete the read.
    fn get(&self, table: Table, row: &str, opts: &GetOptions) -> Result<Vec<Column>>;

    /// Batched [`ColumnStore::get`] across many rows.
    ///
    /// The result preserves the order of `rows`; missing rows appear
    /// with an empty column list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot complete the read.
    fn multi_get(
        &self,
        table: Table,
        rows: &[String],
        opts: &GetOptions,
    ) -> Result<Vec<(String, Vec<Column>)>>;

    /// Apply a group of inserts as one indivisible unit.
    ///
    /// Either every operation becomes visible or none does.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch cannot be applied; on error no
    /// operation from the batch is visible.
    fn batch_write(&self, ops: Vec<WriteOp>) -> Result<()>;
}

/// Shared store handle passed into each component at construction.
pub type StoreHandle = Arc<dyn ColumnStore>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert_eq!(Table::Directories.name(), "directory_view");
        assert_eq!(Table::Files.name(), "file_history");
        assert_eq!(Table::Search.name(), "search_postings");
    }

    #[test]
    fn test_get_options_latest() {
        let opts = GetOptions::latest();
        assert!(opts.start.is_none());
        assert_eq!(opts.count, Some(1));
        assert!(opts.reversed);
    }

    #[test]
    fn test_get_options_page() {
        let opts = GetOptions::page(Some("1:a.txt".to_string()), 26, false);
        assert_eq!(opts.start.as_deref(), Some("1:a.txt"));
        assert_eq!(opts.count, Some(26));
        assert!(!opts.reversed);
    }

    #[test]
    fn test_write_op_single() {
        let op = WriteOp::single(Table::Search, "alice:salsa", "Recipes/salsa.txt", vec![]);
        assert_eq!(op.row, "alice:salsa");
        assert_eq!(op.columns.len(), 1);
        assert_eq!(op.columns[0].0, "Recipes/salsa.txt");
    }
}
