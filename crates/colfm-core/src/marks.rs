//! The process-wide set of marked paths.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;

/// Marked absolute paths, in the order they were marked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkSet {
    paths: IndexSet<PathBuf>,
}

impl MarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Mark `path`, or unmark it if already marked. Returns the new state.
    pub fn toggle(&mut self, path: &Path) -> bool {
        if self.paths.shift_remove(path) {
            false
        } else {
            self.paths.insert(path.to_path_buf());
            true
        }
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// Parse a newline- or NUL-delimited list. Blank lines are skipped.
    pub fn parse(text: &str) -> Self {
        text.split(['\n', '\0'])
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    /// Newline-delimited serialization, one path per line.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for path in &self.paths {
            out.push_str(&path.to_string_lossy());
            out.push('\n');
        }
        out
    }
}

impl FromIterator<PathBuf> for MarkSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}
