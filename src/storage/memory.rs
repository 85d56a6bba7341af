//! In-process reference implementation of the column store.
//!
//! Rows are `BTreeMap`s keyed by column key, so range reads fall out of
//! ordered iteration. All mutation happens under one lock, which makes
//! `batch_write` trivially atomic. Intended for tests and small local
//! runs; persistent deployments use the `SQLite` adapter.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use super::store::{Column, ColumnStore, GetOptions, Table, WriteOp};
use crate::error::StorageError;
use crate::Result;

type Row = BTreeMap<String, Vec<u8>>;

/// In-memory ordered wide-column store.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<BTreeMap<(Table, String), Row>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with `StorageError::Unavailable`.
    ///
    /// Used by tests to exercise fail-fast and batch atomicity paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of rows currently held in a table.
    #[must_use]
    pub fn row_count(&self, table: Table) -> usize {
        self.tables
            .lock()
            .keys()
            .filter(|(t, _)| *t == table)
            .count()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("write failure injected".to_string()).into());
        }
        Ok(())
    }

    fn read_row(row: &Row, opts: &GetOptions) -> Vec<Column> {
        let limit = opts.count.unwrap_or(usize::MAX);
        let clone_col = |(k, v): (&String, &Vec<u8>)| (k.clone(), v.clone());

        match (&opts.start, opts.reversed) {
            (Some(start), false) => row
                .range::<String, _>((Bound::Included(start), Bound::Unbounded))
                .take(limit)
                .map(clone_col)
                .collect(),
            (Some(start), true) => row
                .range::<String, _>((Bound::Unbounded, Bound::Included(start)))
                .rev()
                .take(limit)
                .map(clone_col)
                .collect(),
            (None, false) => row.iter().take(limit).map(clone_col).collect(),
            (None, true) => row.iter().rev().take(limit).map(clone_col).collect(),
        }
    }
}

impl ColumnStore for MemoryStore {
    fn insert(&self, table: Table, row: &str, columns: Vec<Column>) -> Result<()> {
        self.check_writable()?;
        let mut tables = self.tables.lock();
        let entry = tables.entry((table, row.to_string())).or_default();
        for (key, value) in columns {
            entry.insert(key, value);
        }
        Ok(())
    }

    fn get(&self, table: Table, row: &str, opts: &GetOptions) -> Result<Vec<Column>> {
        let tables = self.tables.lock();
        Ok(tables
            .get(&(table, row.to_string()))
            .map(|r| Self::read_row(r, opts))
            .unwrap_or_default())
    }

    fn multi_get(
        &self,
        table: Table,
        rows: &[String],
        opts: &GetOptions,
    ) -> Result<Vec<(String, Vec<Column>)>> {
        let tables = self.tables.lock();
        Ok(rows
            .iter()
            .map(|row| {
                let columns = tables
                    .get(&(table, row.clone()))
                    .map(|r| Self::read_row(r, opts))
                    .unwrap_or_default();
                (row.clone(), columns)
            })
            .collect())
    }

    fn batch_write(&self, ops: Vec<WriteOp>) -> Result<()> {
        self.check_writable()?;
        // single lock span: all ops land or none do
        let mut tables = self.tables.lock();
        for op in ops {
            let entry = tables.entry((op.table, op.row)).or_default();
            for (key, value) in op.columns {
                entry.insert(key, value);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("rows", &self.tables.lock().len())
            .finish_non_exhaustive()
    }
}
