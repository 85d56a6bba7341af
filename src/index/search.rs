//! Filename search indexing.
//!
//! Whole-token matching only: the filename is split into words and each
//! word is indexed. No stemming, no minimum token length, no stop-word
//! removal. Postings are append-only; a rename never retracts old
//! tokens.

use crate::storage::{row_key, ColumnStore, StoreHandle, Table, WriteOp};
use crate::Result;

/// Writes token -> path postings for filenames.
pub struct SearchIndexer {
    store: StoreHandle,
}

impl SearchIndexer {
    /// Create an indexer over the given store.
    #[must_use]
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Index a filename under all of its tokens.
    ///
    /// All postings for one file are submitted as a single atomic
    /// batch: either every token points at `full_path` afterwards, or
    /// (on failure) none does.
    ///
    /// Returns the number of tokens indexed.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch write fails; no postings from the
    /// batch are visible in that case.
    pub fn index(&self, owner: &str, filename: &str, full_path: &str) -> Result<usize> {
        let tokens = tokenize(filename);
        if tokens.is_empty() {
            return Ok(0);
        }

        let ops = tokens
            .iter()
            .map(|token| {
                WriteOp::single(Table::Search, row_key(owner, token), full_path, Vec::new())
            })
            .collect();

        self.store.batch_write(ops)?;

        tracing::debug!(filename, tokens = tokens.len(), "Indexed filename");

        Ok(tokens.len())
    }
}

/// Split a filename into search tokens.
///
/// Splits on runs of `.` or whitespace, drops empty tokens, lowercases,
/// and deduplicates while preserving first-seen order.
#[must_use]
pub fn tokenize(filename: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for word in filename.split(|c: char| c == '.' || c.is_whitespace()) {
        if word.is_empty() {
            continue;
        }
        let token = word.to_lowercase();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{GetOptions, MemoryStore};
    use std::sync::Arc;

    #[test]
    fn test_tokenize_dots_and_case() {
        assert_eq!(tokenize("My.File.TXT"), vec!["my", "file", "txt"]);
    }

    #[test]
    fn test_tokenize_whitespace() {
        assert_eq!(tokenize("meeting notes 2024.pdf"), vec!["meeting", "notes", "2024", "pdf"]);
    }

    #[test]
    fn test_tokenize_runs_and_edges() {
        // leading dot and consecutive separators produce no empty tokens
        assert_eq!(tokenize(".vimrc"), vec!["vimrc"]);
        assert_eq!(tokenize("a..b  c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tokenize_dedup() {
        assert_eq!(tokenize("backup.backup.tar"), vec!["backup", "tar"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("...").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_index_writes_posting_per_token() {
        let store = Arc::new(MemoryStore::new());
        let indexer = SearchIndexer::new(store.clone());

        let count = indexer
            .index("alice", "My.File.TXT", "Documents/My.File.TXT")
            .unwrap();
        assert_eq!(count, 3);

        for token in ["my", "file", "txt"] {
            let row = format!("alice:{token}");
            let postings = store.get(Table::Search, &row, &GetOptions::all()).unwrap();
            assert_eq!(postings.len(), 1, "token '{token}' should have one posting");
            assert_eq!(postings[0].0, "Documents/My.File.TXT");
        }
    }

    #[test]
    fn test_index_batch_is_all_or_nothing() {
        let store = Arc::new(MemoryStore::new());
        let indexer = SearchIndexer::new(store.clone());

        store.set_fail_writes(true);
        let err = indexer.index("alice", "My.File.TXT", "My.File.TXT");
        assert!(err.is_err());

        store.set_fail_writes(false);
        for token in ["my", "file", "txt"] {
            let row = format!("alice:{token}");
            let postings = store.get(Table::Search, &row, &GetOptions::all()).unwrap();
            assert!(postings.is_empty(), "no postings expected for '{token}'");
        }
    }

    #[test]
    fn test_index_empty_filename_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let indexer = SearchIndexer::new(store.clone());

        assert_eq!(indexer.index("alice", "...", "odd").unwrap(), 0);
        assert_eq!(store.row_count(Table::Search), 0);
    }

    #[test]
    fn test_index_accumulates_paths_per_token() {
        let store = Arc::new(MemoryStore::new());
        let indexer = SearchIndexer::new(store.clone());

        indexer.index("alice", "salsa.txt", "Recipes/salsa.txt").unwrap();
        indexer.index("alice", "salsa verde.txt", "Recipes/salsa verde.txt").unwrap();

        let postings = store
            .get(Table::Search, "alice:salsa", &GetOptions::all())
            .unwrap();
        assert_eq!(postings.len(), 2);
    }

    #[test]
    fn test_full_path_not_tokenized() {
        let store = Arc::new(MemoryStore::new());
        let indexer = SearchIndexer::new(store.clone());

        // search considers the filename only, not parent directory names
        indexer
            .index("alice", "salsa.txt", "Recipes/mexican/salsa.txt")
            .unwrap();

        let postings = store
            .get(Table::Search, "alice:recipes", &GetOptions::all())
            .unwrap();
        assert!(postings.is_empty());
    }
}
