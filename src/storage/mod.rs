//! Ordered wide-column storage.
//!
//! This module provides:
//! - The abstract [`ColumnStore`] contract the index core is written
//!   against
//! - An in-memory reference implementation for tests and local runs
//! - A persistent `SQLite` adapter with schema migrations
//! - The data models and key codecs shared by the index and query layers

mod memory;
mod models;
mod schema;
mod sqlite;
mod store;

pub use memory::MemoryStore;
pub use models::{
    decode, display_name, encode, entry_sort_key, parse_version_key, row_key, version_key,
    EntryInfo, VersionInfo, VERSION_KEY_WIDTH,
};
pub use schema::{migrate, verify_schema, SCHEMA_VERSION};
pub use sqlite::SqliteStore;
pub use store::{Column, ColumnStore, GetOptions, StoreHandle, Table, WriteOp};
