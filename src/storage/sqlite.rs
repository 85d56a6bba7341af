//! `SQLite`-backed column store adapter.
//!
//! Maps the ordered wide-column contract onto one SQL table per logical
//! table, `(row_key, col_key, value)` with a composite primary key.
//! Range reads become `ORDER BY col_key` queries; batch writes run in a
//! single transaction, giving the all-or-nothing semantics the contract
//! requires.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};

use super::schema::{migrate, verify_schema, SCHEMA_VERSION};
use super::store::{Column, ColumnStore, GetOptions, Table, WriteOp};
use crate::error::StorageError;
use crate::Result;

/// `SQLite` column store.
///
/// Wraps a connection with WAL mode and performance settings. Clone is
/// cheap - it just clones the Arc.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: String,
}

impl SqliteStore {
    /// Open a store at the given path.
    ///
    /// Creates the database file and parent directories if they don't
    /// exist, configures the connection, and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, configured,
    /// or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let path_str = path.to_string_lossy().to_string();

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StorageError::Database(format!("failed to open database: {e}")))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path_str,
        };

        store.configure()?;
        store.init_schema()?;

        Ok(store)
    }

    /// Open an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StorageError::Database(format!("failed to open in-memory database: {e}"))
        })?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: ":memory:".to_string(),
        };

        store.configure()?;
        store.init_schema()?;

        Ok(store)
    }

    /// Configure database settings for optimal performance.
    fn configure(&self) -> Result<()> {
        {
            let conn = self.conn.lock();

            conn.execute_batch(
                "
                PRAGMA journal_mode = WAL;
                PRAGMA synchronous = NORMAL;
                PRAGMA cache_size = -64000;  -- 64MB cache
                PRAGMA temp_store = MEMORY;
                ",
            )
            .map_err(|e| StorageError::Database(format!("failed to configure database: {e}")))?;
        }

        tracing::debug!(path = %self.path, "Database configured with WAL mode");

        Ok(())
    }

    /// Run migrations and verify the schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrate(&conn)?;
        verify_schema(&conn)?;
        tracing::debug!(path = %self.path, version = SCHEMA_VERSION, "Schema ready");
        Ok(())
    }

    /// Get the database path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn insert_with_conn(conn: &Connection, table: Table, row: &str, columns: &[Column]) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (row_key, col_key, value) VALUES (?, ?, ?) \
             ON CONFLICT (row_key, col_key) DO UPDATE SET value = excluded.value",
            table.name()
        );
        let mut stmt = conn
            .prepare_cached(&sql)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        for (key, value) in columns {
            stmt.execute(rusqlite::params![row, key, value])
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }

        Ok(())
    }

    fn get_with_conn(
        conn: &Connection,
        table: Table,
        row: &str,
        opts: &GetOptions,
    ) -> Result<Vec<Column>> {
        let order = if opts.reversed { "DESC" } else { "ASC" };
        let sql = match (&opts.start, opts.reversed) {
            (Some(_), false) => format!(
                "SELECT col_key, value FROM {} WHERE row_key = ?1 AND col_key >= ?2 \
                 ORDER BY col_key {order} LIMIT ?3",
                table.name()
            ),
            (Some(_), true) => format!(
                "SELECT col_key, value FROM {} WHERE row_key = ?1 AND col_key <= ?2 \
                 ORDER BY col_key {order} LIMIT ?3",
                table.name()
            ),
            (None, _) => format!(
                "SELECT col_key, value FROM {} WHERE row_key = ?1 \
                 ORDER BY col_key {order} LIMIT ?2",
                table.name()
            ),
        };

        let limit = opts
            .count
            .map_or(-1i64, |c| i64::try_from(c).unwrap_or(i64::MAX));

        let mut stmt = conn
            .prepare_cached(&sql)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let map_row = |sql_row: &rusqlite::Row<'_>| {
            Ok((sql_row.get::<_, String>(0)?, sql_row.get::<_, Vec<u8>>(1)?))
        };

        let rows = match &opts.start {
            Some(start) => stmt
                .query_map(rusqlite::params![row, start, limit], map_row)
                .map_err(|e| StorageError::Database(e.to_string()))?
                .collect::<std::result::Result<Vec<_>, _>>(),
            None => stmt
                .query_map(rusqlite::params![row, limit], map_row)
                .map_err(|e| StorageError::Database(e.to_string()))?
                .collect::<std::result::Result<Vec<_>, _>>(),
        };

        rows.map_err(|e| StorageError::Database(e.to_string()).into())
    }
}

impl ColumnStore for SqliteStore {
    fn insert(&self, table: Table, row: &str, columns: Vec<Column>) -> Result<()> {
        let conn = self.conn.lock();
        Self::insert_with_conn(&conn, table, row, &columns)
    }

    fn get(&self, table: Table, row: &str, opts: &GetOptions) -> Result<Vec<Column>> {
        let conn = self.conn.lock();
        Self::get_with_conn(&conn, table, row, opts)
    }

    fn multi_get(
        &self,
        table: Table,
        rows: &[String],
        opts: &GetOptions,
    ) -> Result<Vec<(String, Vec<Column>)>> {
        let conn = self.conn.lock();
        rows.iter()
            .map(|row| Ok((row.clone(), Self::get_with_conn(&conn, table, row, opts)?)))
            .collect()
    }

    fn batch_write(&self, ops: Vec<WriteOp>) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| StorageError::Database(format!("failed to begin transaction: {e}")))?;

        for op in &ops {
            if let Err(e) = Self::insert_with_conn(&conn, op.table, &op.row, &op.columns) {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(e);
            }
        }

        conn.execute_batch("COMMIT")
            .map_err(|e| StorageError::Database(format!("failed to commit: {e}")))?;

        Ok(())
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
