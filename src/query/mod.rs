//! Read contract over the index layout.
//!
//! Thin, store-only queries for the browsing side: paged directory
//! listings, full file version history, and filename search. The store
//! supports only forward/backward range iteration from a column key, so
//! pagination is cursor-based; there is no numeric offset addressing.

use crate::storage::{
    decode, display_name, parse_version_key, row_key, ColumnStore, EntryInfo, GetOptions, Table,
    VersionInfo,
};
use crate::Result;

/// One entry of a directory listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Raw sort key, usable as a pagination cursor.
    pub sort_key: String,
    /// Display name with the type prefix stripped.
    pub name: String,
    /// Cached snapshot of the child.
    pub info: EntryInfo,
}

/// A directory listing page request.
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// Cursor column key to start at (inclusive), if resuming.
    pub start: Option<String>,
    /// Number of entries to return per page.
    pub page_size: usize,
    /// Walk backwards from the cursor (previous-page support).
    pub reversed: bool,
}

impl PageRequest {
    /// First page with the given size.
    #[must_use]
    pub fn first(page_size: usize) -> Self {
        Self {
            start: None,
            page_size,
            reversed: false,
        }
    }
}

/// A page of directory entries plus traversal cursors.
#[derive(Debug, Clone)]
pub struct DirectoryPage {
    /// Entries in ascending sort-key order (directories before files).
    pub entries: Vec<DirEntry>,
    /// Cursor for the next page, if one exists.
    pub next: Option<String>,
    /// Adjusted start cursor after a reversed walk; `None` once the
    /// walk reached the beginning of the listing.
    pub start: Option<String>,
}

/// One recorded file version with its decoded id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileVersion {
    pub version_id: i64,
    pub info: VersionInfo,
}

/// A filename search hit with the file's latest version summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Path relative to the scan root.
    pub path: String,
    /// Latest recorded version, if the history row was readable.
    pub latest: Option<FileVersion>,
}

/// List one page of a directory's children.
///
/// Reads `page_size + 1` columns so the lookahead column, when present,
/// becomes the next-page cursor. Reverse traversal issues the same
/// range read backwards and reverses the result locally, returning the
/// adjusted `start` cursor for resuming.
///
/// # Errors
///
/// Returns an error if the store read fails or a stored entry cannot
/// be decoded.
pub fn list_directory(
    store: &dyn ColumnStore,
    owner: &str,
    dir_path: &str,
    request: &PageRequest,
) -> Result<DirectoryPage> {
    let lookahead = request.page_size + 1;
    let opts = GetOptions::page(request.start.clone(), lookahead, request.reversed);
    let mut columns = store.get(Table::Directories, &row_key(owner, dir_path), &opts)?;

    let mut start = request.start.clone();
    if request.reversed {
        columns.reverse();
        // a full backwards page means there may be more before it, so
        // the caller resumes from the lookahead; a short page means we
        // hit the beginning
        start = if columns.len() == lookahead {
            None
        } else {
            columns.first().map(|(key, _)| key.clone())
        };
    }

    let mut next = None;
    if columns.len() == lookahead {
        next = columns.last().map(|(key, _)| key.clone());
        columns.pop();
    }

    let entries = columns
        .into_iter()
        .map(|(key, value)| {
            let info = decode::<EntryInfo>("EntryInfo", &value)?;
            Ok(DirEntry {
                name: display_name(&key).to_string(),
                sort_key: key,
                info,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DirectoryPage { entries, next, start })
}

/// Full version history of a file, in insertion order.
///
/// # Errors
///
/// Returns an error if the store read fails or a stored version cannot
/// be decoded.
pub fn file_versions(
    store: &dyn ColumnStore,
    owner: &str,
    file_path: &str,
) -> Result<Vec<FileVersion>> {
    let columns = store.get(Table::Files, &row_key(owner, file_path), &GetOptions::all())?;

    columns
        .into_iter()
        .map(|(key, value)| {
            Ok(FileVersion {
                version_id: parse_version_key(&key)?,
                info: decode::<VersionInfo>("VersionInfo", &value)?,
            })
        })
        .collect()
}

/// Whole-token filename search.
///
/// Looks up the postings row for the (lowercased) term, then fetches
/// only each hit's latest version for summary display via a batched
/// reverse count-1 read.
///
/// # Errors
///
/// Returns an error if a store read fails or a stored version cannot
/// be decoded.
pub fn search_filenames(
    store: &dyn ColumnStore,
    owner: &str,
    term: &str,
) -> Result<Vec<SearchHit>> {
    let token = term.trim().to_lowercase();
    let postings = store.get(Table::Search, &row_key(owner, &token), &GetOptions::all())?;

    let paths: Vec<String> = postings.into_iter().map(|(path, _)| path).collect();
    let rows: Vec<String> = paths.iter().map(|p| row_key(owner, p)).collect();
    let summaries = store.multi_get(Table::Files, &rows, &GetOptions::latest())?;

    paths
        .into_iter()
        .zip(summaries)
        .map(|(path, (_, columns))| {
            let latest = match columns.into_iter().next() {
                Some((key, value)) => Some(FileVersion {
                    version_id: parse_version_key(&key)?,
                    info: decode::<VersionInfo>("VersionInfo", &value)?,
                }),
                None => None,
            };
            Ok(SearchHit { path, latest })
        })
        .collect()
}
