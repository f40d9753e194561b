//! Sort state shared by every column.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr, IntoEnumIterator};

/// Key used to order entries within a column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// File name, directories first.
    #[default]
    Name,
    /// Last dot-separated component of the name, directories first.
    Extension,
    /// Size in bytes, directories first.
    Size,
    /// Access time.
    Atime,
    /// Status change time.
    Ctime,
    /// Modification time.
    Mtime,
}

impl SortKey {
    /// Cycle to the next sort key.
    pub fn next(self) -> Self {
        let current = self as usize;
        let next = (current + 1) % Self::iter().count();
        Self::from_repr(next).unwrap_or_default()
    }

    /// Whether this key keeps directories ahead of files.
    pub fn directories_first(self) -> bool {
        matches!(self, Self::Name | Self::Extension | Self::Size)
    }
}

/// The process-wide `(key, reverse)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: SortKey,
    pub reverse: bool,
}

impl SortState {
    pub fn new(key: SortKey, reverse: bool) -> Self {
        Self { key, reverse }
    }

    /// Short label for the status line, e.g. `name` or `size-r`.
    pub fn label(&self) -> String {
        if self.reverse {
            format!("{}-r", self.key)
        } else {
            self.key.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_cycle() {
        let mut key = SortKey::Name;
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(key);
            key = key.next();
        }
        assert_eq!(key, SortKey::Name);
        assert_eq!(
            seen,
            vec![
                SortKey::Name,
                SortKey::Extension,
                SortKey::Size,
                SortKey::Atime,
                SortKey::Ctime,
                SortKey::Mtime
            ]
        );
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("mtime".parse::<SortKey>().ok(), Some(SortKey::Mtime));
        assert_eq!(SortKey::Extension.to_string(), "extension");
    }

    #[test]
    fn test_label() {
        assert_eq!(SortState::new(SortKey::Size, true).label(), "size-r");
    }
}
