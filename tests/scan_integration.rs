//! Integration tests for the tree scanner and read contract.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;
use treeline::index::TreeScanner;
use treeline::query::{file_versions, list_directory, search_filenames, PageRequest};
use treeline::storage::{ColumnStore, GetOptions, MemoryStore, SqliteStore, Table};

/// Build a small tree: two directories, three files.
fn build_tree(tmp: &TempDir) {
    let root = tmp.path();
    fs::create_dir(root.join("Documents")).unwrap();
    fs::create_dir(root.join("Music")).unwrap();
    fs::write(root.join("readme.txt"), "hello").unwrap();
    fs::write(root.join("Documents/notes.txt"), "some notes").unwrap();
    fs::write(root.join("Documents/My.File.TXT"), "mixed case name").unwrap();
}

/// Test that a scan populates listings, history, and search end to end.
#[test]
fn test_scan_end_to_end_on_sqlite() {
    let tmp = TempDir::new().unwrap();
    build_tree(&tmp);

    // keep the database outside the scanned root
    let data = TempDir::new().unwrap();
    let store = Arc::new(SqliteStore::open(data.path().join("index.db")).unwrap());

    let scanner = TreeScanner::new(store.clone());
    let stats = scanner.scan("alice", tmp.path()).unwrap();
    assert_eq!(stats.versions_recorded, 3);

    let page = list_directory(store.as_ref(), "alice", "", &PageRequest::first(25)).unwrap();
    let names: Vec<_> = page.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Documents", "Music", "readme.txt"]);

    let versions = file_versions(store.as_ref(), "alice", "Documents/notes.txt").unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].info.size, 10);

    let hits = search_filenames(store.as_ref(), "alice", "notes").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, "Documents/notes.txt");
}

/// Test that scanning an unchanged tree twice records nothing new.
#[test]
fn test_idempotent_rescan() {
    let tmp = TempDir::new().unwrap();
    build_tree(&tmp);

    let store = Arc::new(MemoryStore::new());
    TreeScanner::new(store.clone()).scan("alice", tmp.path()).unwrap();

    let listing_before = store
        .get(Table::Directories, "alice:", &GetOptions::all())
        .unwrap();

    let stats = TreeScanner::new(store.clone())
        .scan("alice", tmp.path())
        .unwrap();
    assert_eq!(stats.versions_recorded, 0);

    let listing_after = store
        .get(Table::Directories, "alice:", &GetOptions::all())
        .unwrap();
    assert_eq!(listing_before, listing_after);

    let versions = file_versions(store.as_ref(), "alice", "readme.txt").unwrap();
    assert_eq!(versions.len(), 1);
}

/// Test that a content change between scans produces exactly one new
/// version with a larger id and a different hash.
#[test]
fn test_change_detection_across_scans() {
    let tmp = TempDir::new().unwrap();
    build_tree(&tmp);

    let store = Arc::new(MemoryStore::new());
    TreeScanner::new(store.clone()).scan("alice", tmp.path()).unwrap();

    fs::write(tmp.path().join("readme.txt"), "hello, changed").unwrap();
    TreeScanner::new(store.clone()).scan("alice", tmp.path()).unwrap();

    let versions = file_versions(store.as_ref(), "alice", "readme.txt").unwrap();
    assert_eq!(versions.len(), 2);
    assert!(versions[1].version_id > versions[0].version_id);
    assert_ne!(versions[1].info.content_hash, versions[0].info.content_hash);

    // the cached listing reflects the new size
    let page = list_directory(store.as_ref(), "alice", "", &PageRequest::first(25)).unwrap();
    let readme = page.entries.iter().find(|e| e.name == "readme.txt").unwrap();
    assert_eq!(
        readme.info,
        treeline::storage::EntryInfo::File {
            size: 14,
            mtime: versions[1].info.mtime
        }
    );
}

/// Test that touching mtime without changing bytes records nothing.
#[test]
fn test_metadata_only_change_is_noop() {
    let tmp = TempDir::new().unwrap();
    build_tree(&tmp);

    let store = Arc::new(MemoryStore::new());
    TreeScanner::new(store.clone()).scan("alice", tmp.path()).unwrap();

    // rewriting identical bytes bumps mtime only
    fs::write(tmp.path().join("readme.txt"), "hello").unwrap();
    let stats = TreeScanner::new(store.clone())
        .scan("alice", tmp.path())
        .unwrap();
    assert_eq!(stats.versions_recorded, 0);

    let versions = file_versions(store.as_ref(), "alice", "readme.txt").unwrap();
    assert_eq!(versions.len(), 1);
}

/// Test that mixed-case dotted filenames index under lowercase tokens.
#[test]
fn test_filename_tokens_searchable() {
    let tmp = TempDir::new().unwrap();
    build_tree(&tmp);

    let store = Arc::new(MemoryStore::new());
    TreeScanner::new(store.clone()).scan("alice", tmp.path()).unwrap();

    for term in ["my", "file", "txt", "MY"] {
        let hits = search_filenames(store.as_ref(), "alice", term).unwrap();
        assert!(
            hits.iter().any(|h| h.path == "Documents/My.File.TXT"),
            "term '{term}' should match My.File.TXT"
        );
    }

    // parent directory names are not indexed
    let hits = search_filenames(store.as_ref(), "alice", "documents").unwrap();
    assert!(hits.is_empty());
}

/// Test the 30-children pagination walk from the read contract.
#[test]
fn test_pagination_walk() {
    let tmp = TempDir::new().unwrap();
    for i in 0..30 {
        fs::write(tmp.path().join(format!("file{i:02}.txt")), format!("{i}")).unwrap();
    }

    let store = Arc::new(MemoryStore::new());
    TreeScanner::new(store.clone()).scan("alice", tmp.path()).unwrap();

    // 25 displayed + 1 lookahead
    let first = list_directory(store.as_ref(), "alice", "", &PageRequest::first(25)).unwrap();
    assert_eq!(first.entries.len(), 25);
    let cursor = first.next.expect("expected a next-page cursor");

    let second = list_directory(
        store.as_ref(),
        "alice",
        "",
        &PageRequest {
            start: Some(cursor),
            page_size: 25,
            reversed: false,
        },
    )
    .unwrap();
    assert_eq!(second.entries.len(), 5);
    assert!(second.next.is_none());

    // no entry is duplicated or dropped across the two pages
    let mut all: Vec<_> = first
        .entries
        .iter()
        .chain(second.entries.iter())
        .map(|e| e.name.clone())
        .collect();
    all.dedup();
    assert_eq!(all.len(), 30);
}

/// Test that directories precede files for every valid start cursor.
#[test]
fn test_ordering_invariant_for_all_cursors() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("beta")).unwrap();
    fs::create_dir(tmp.path().join("zulu")).unwrap();
    fs::write(tmp.path().join("alpha.txt"), "a").unwrap();
    fs::write(tmp.path().join("mid.txt"), "m").unwrap();

    let store = Arc::new(MemoryStore::new());
    TreeScanner::new(store.clone()).scan("alice", tmp.path()).unwrap();

    let full = list_directory(store.as_ref(), "alice", "", &PageRequest::first(25)).unwrap();
    let cursors: Vec<Option<String>> = std::iter::once(None)
        .chain(full.entries.iter().map(|e| Some(e.sort_key.clone())))
        .collect();

    for cursor in cursors {
        let page = list_directory(
            store.as_ref(),
            "alice",
            "",
            &PageRequest {
                start: cursor.clone(),
                page_size: 25,
                reversed: false,
            },
        )
        .unwrap();

        let mut seen_file = false;
        for entry in &page.entries {
            if entry.info.is_directory() {
                assert!(
                    !seen_file,
                    "directory after file with cursor {cursor:?}"
                );
            } else {
                seen_file = true;
            }
        }
    }
}

/// Test that a failed posting batch leaves no partial token sets.
#[test]
fn test_search_batch_atomicity() {
    let store = Arc::new(MemoryStore::new());
    let indexer = treeline::index::SearchIndexer::new(store.clone());

    store.set_fail_writes(true);
    assert!(indexer.index("alice", "My.File.TXT", "My.File.TXT").is_err());
    store.set_fail_writes(false);

    for term in ["my", "file", "txt"] {
        let hits = search_filenames(store.as_ref(), "alice", term).unwrap();
        assert!(hits.is_empty(), "no postings expected for '{term}'");
    }
}
