//! Database schema definitions and migrations for the `SQLite` adapter.
//!
//! Provides versioned schema migrations for safe database upgrades.

use rusqlite::Connection;

use super::store::Table;
use crate::error::StorageError;
use crate::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if migrations fail.
pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| StorageError::Migration(format!("failed to create migrations table: {e}")))?;

    let current_version = get_current_version(conn)?;
    tracing::info!(
        current = current_version,
        target = SCHEMA_VERSION,
        "Checking database migrations"
    );

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// Get the current schema version.
fn get_current_version(conn: &Connection) -> Result<i32> {
    let result = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    );

    match result {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(StorageError::Migration(format!("failed to get version: {e}")).into()),
    }
}

/// Record a migration as applied.
fn record_migration(conn: &Connection, version: i32) -> Result<()> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let now_i64 = i64::try_from(now).unwrap_or_default();

    conn.execute(
        "INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)",
        rusqlite::params![version, now_i64],
    )
    .map_err(|e| StorageError::Migration(format!("failed to record migration: {e}")))?;

    Ok(())
}

/// Migration v1: one wide-column table per logical table.
///
/// Each logical table maps to `(row_key, col_key, value)` with the
/// primary key providing both upsert-by-column semantics and the
/// ordered column iteration range reads depend on.
fn migrate_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Applying migration v1: Initial schema");

    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS directory_view (
            row_key TEXT NOT NULL,
            col_key TEXT NOT NULL,
            value BLOB NOT NULL,
            PRIMARY KEY (row_key, col_key)
        );

        CREATE TABLE IF NOT EXISTS file_history (
            row_key TEXT NOT NULL,
            col_key TEXT NOT NULL,
            value BLOB NOT NULL,
            PRIMARY KEY (row_key, col_key)
        );

        CREATE TABLE IF NOT EXISTS search_postings (
            row_key TEXT NOT NULL,
            col_key TEXT NOT NULL,
            value BLOB NOT NULL,
            PRIMARY KEY (row_key, col_key)
        );
        ",
    )
    .map_err(|e| StorageError::Migration(format!("migration v1 failed: {e}")))?;

    record_migration(conn, 1)?;
    tracing::info!("Migration v1 applied");

    Ok(())
}

/// Verify the expected tables exist.
///
/// # Errors
///
/// Returns an error if any table is missing.
pub fn verify_schema(conn: &Connection) -> Result<()> {
    for table in [Table::Directories, Table::Files, Table::Search] {
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
                [table.name()],
                |row| row.get(0),
            )
            .map_err(|e| StorageError::Migration(format!("schema check failed: {e}")))?;

        if count == 0 {
            return Err(
                StorageError::Migration(format!("missing table '{}'", table.name())).into(),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_and_verify() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        verify_schema(&conn).unwrap();
        assert_eq!(get_current_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_current_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_verify_fails_without_migration() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(verify_schema(&conn).is_err());
    }
}
