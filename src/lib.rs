//! treeline - versioned file-tree index.
//!
//! Indexes a hierarchical file tree into a queryable, versioned store:
//! a recursive scan detects changed files by content hash, maintains a
//! materialized per-directory listing, and tokenizes filenames for
//! whole-token search. The browsing side pages through directories,
//! inspects version history, and searches without re-scanning the
//! filesystem.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod index;
pub mod observability;
pub mod query;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
