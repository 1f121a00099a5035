//! Per-directory file count statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::{Entry, ROOT_FOLDER};

/// File counts aggregated over one walk.
///
/// Every directory seen during the walk has a key in `directory_counts`,
/// including empty ones. The walk root is keyed as [`ROOT_FOLDER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Total number of files.
    pub total_files: u64,
    /// Files directly inside each directory, keyed by relative path.
    pub directory_counts: BTreeMap<String, u64>,
}

impl Default for Stats {
    fn default() -> Self {
        let mut directory_counts = BTreeMap::new();
        directory_counts.insert(ROOT_FOLDER.to_string(), 0);
        Self {
            total_files: 0,
            directory_counts,
        }
    }
}

impl Stats {
    /// Create empty stats with the root folder registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory. An existing count is left untouched.
    pub fn record_dir(&mut self, path: &str) {
        self.directory_counts.entry(path.to_string()).or_insert(0);
    }

    /// Count a file inside `folder`.
    pub fn record_file(&mut self, folder: &str) {
        self.total_files += 1;
        *self.directory_counts.entry(folder.to_string()).or_insert(0) += 1;
    }

    /// Fold one walk entry into the counts.
    pub fn record(&mut self, entry: &Entry) {
        if entry.is_dir() {
            self.record_dir(&entry.name);
        } else if entry.depth > 0 {
            self.record_file(&entry.parent_folder);
        } else {
            self.record_file(ROOT_FOLDER);
        }
    }

    /// Number of files directly inside `folder`, if it was seen.
    pub fn count_for(&self, folder: &str) -> Option<u64> {
        self.directory_counts.get(folder).copied()
    }

    /// Number of directories seen, excluding the root.
    pub fn total_dirs(&self) -> usize {
        self.directory_counts.len().saturating_sub(1)
    }

    /// Check that `total_files` matches the sum of all directory counts.
    pub fn is_consistent(&self) -> bool {
        self.directory_counts.values().sum::<u64>() == self.total_files
    }
}
