//! Tracked files and their resume offsets.

use std::collections::BTreeMap;

/// Scan progress for one file in the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// 1-based number of the first line not yet scanned.
    pub resume_offset: u64,
    /// Matches reported for this file since it was discovered.
    pub matches_found: usize,
}

impl TrackedFile {
    /// A freshly discovered file, scanned from line 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resume_offset: 1,
            matches_found: 0,
        }
    }
}

impl Default for TrackedFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Files being watched, keyed by name relative to the watched directory.
#[derive(Debug, Default, Clone)]
pub struct WatchSet {
    files: BTreeMap<String, TrackedFile>,
}

impl WatchSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `name` from line 1.
    ///
    /// Returns `false` and leaves the existing entry untouched if `name` is
    /// already tracked.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.files.contains_key(&name) {
            return false;
        }
        self.files.insert(name, TrackedFile::new());
        true
    }

    /// Stop tracking `name`.
    pub fn remove(&mut self, name: &str) -> Option<TrackedFile> {
        self.files.remove(name)
    }

    /// Look up a tracked file.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TrackedFile> {
        self.files.get(name)
    }

    /// Whether `name` is tracked.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Replace the resume offset of `name` and add to its match count.
    ///
    /// Returns `false` if `name` is not tracked.
    pub fn advance(&mut self, name: &str, next_line: u64, new_matches: usize) -> bool {
        match self.files.get_mut(name) {
            Some(file) => {
                file.resume_offset = next_line;
                file.matches_found += new_matches;
                true
            }
            None => false,
        }
    }

    /// Tracked names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Number of tracked files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
