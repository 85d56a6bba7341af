//! treeline - versioned file-tree index.
//!
//! CLI entry point: scan a tree into the index, then browse listings,
//! version history, and filename search against the indexed data.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use treeline::index::TreeScanner;
use treeline::observability::init_tracing;
use treeline::query::{self, PageRequest};
use treeline::storage::{EntryInfo, SqliteStore};
use treeline::{Config, Result};

/// treeline - versioned file-tree index
#[derive(Parser, Debug)]
#[command(name = "treeline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory for the `SQLite` index database
    #[arg(short, long, env = "TREELINE_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TREELINE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "TREELINE_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recursively index a directory tree for an owner
    Scan {
        /// Owner namespace the tree is indexed under
        owner: String,
        /// Root directory to scan
        root: PathBuf,
    },
    /// List one page of a directory's indexed children
    Ls {
        /// Owner namespace
        owner: String,
        /// Directory path relative to the scan root (empty for the root)
        #[arg(default_value = "")]
        path: String,
        /// Cursor column key to start at (from a previous page)
        #[arg(long)]
        start: Option<String>,
        /// Walk backwards from the cursor
        #[arg(long)]
        rev: bool,
        /// Entries per page (defaults to the configured page size)
        #[arg(long, env = "TREELINE_PAGE_SIZE")]
        page_size: Option<usize>,
    },
    /// Show a file's full version history
    Versions {
        /// Owner namespace
        owner: String,
        /// File path relative to the scan root
        path: String,
    },
    /// Whole-token filename search
    Search {
        /// Owner namespace
        owner: String,
        /// Search term (matched against filename tokens)
        term: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_json);

    let config = Config {
        data_dir: cli.data_dir,
        log_level: cli.log_level,
        log_json: cli.log_json,
        ..Config::default()
    };
    config.validate()?;

    let store = Arc::new(SqliteStore::open(config.database_path())?);

    match cli.command {
        Command::Scan { owner, root } => {
            let scanner = TreeScanner::new(store);
            let stats = scanner.scan(&owner, &root)?;
            println!(
                "scanned {} directories, {} files: {} new versions, {} unchanged",
                stats.directories_visited,
                stats.files_seen,
                stats.versions_recorded,
                stats.files_unchanged
            );
        }
        Command::Ls {
            owner,
            path,
            start,
            rev,
            page_size,
        } => {
            let request = PageRequest {
                start,
                page_size: page_size.unwrap_or(config.page_size),
                reversed: rev,
            };
            let page = query::list_directory(store.as_ref(), &owner, &path, &request)?;

            for entry in &page.entries {
                match &entry.info {
                    EntryInfo::Directory => println!("{}/", entry.name),
                    EntryInfo::File { size, mtime } => {
                        println!("{:<40} {:>10}  {}", entry.name, size, format_time(*mtime));
                    }
                }
            }
            if let Some(next) = &page.next {
                println!("-- next page: --start '{next}'");
            }
            if let Some(resume) = &page.start {
                println!("-- resumed at: {resume}");
            }
        }
        Command::Versions { owner, path } => {
            let versions = query::file_versions(store.as_ref(), &owner, &path)?;
            if versions.is_empty() {
                println!("no versions recorded for {path}");
            }
            for version in versions {
                println!(
                    "{}  {:>10} bytes  mtime {}  {}",
                    version.version_id,
                    version.info.size,
                    format_time(version.info.mtime),
                    version.info.content_hash
                );
            }
        }
        Command::Search { owner, term } => {
            let hits = query::search_filenames(store.as_ref(), &owner, &term)?;
            if hits.is_empty() {
                println!("no files match '{term}'");
            }
            for hit in hits {
                match hit.latest {
                    Some(latest) => println!(
                        "{:<50} {:>10} bytes  {}",
                        hit.path,
                        latest.info.size,
                        format_time(latest.info.mtime)
                    ),
                    None => println!("{}", hit.path),
                }
            }
        }
    }

    Ok(())
}

/// Render a Unix-seconds timestamp for display.
fn format_time(unix_seconds: i64) -> String {
    chrono::DateTime::from_timestamp(unix_seconds, 0)
        .map_or_else(|| unix_seconds.to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}
