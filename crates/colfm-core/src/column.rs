//! A single Miller column: one listing plus a cursor.

use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use crate::config::{ACTIVE_BONUS, WidthBounds};
use crate::console::{Attr, Surface};
use crate::entry::Entry;
use crate::error::BrowseError;
use crate::marks::MarkSet;
use crate::sort::SortState;

/// Listing filters and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Show names starting with `.`.
    pub dotfiles: bool,
    /// Show names ending with `~`.
    pub backups: bool,
    pub sort: SortState,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            dotfiles: false,
            backups: true,
            sort: SortState::default(),
        }
    }
}

/// Everything needed to (re)build a column's entries.
#[derive(Debug, Clone, Copy)]
pub struct ListContext<'a> {
    pub options: ListOptions,
    pub favorites: &'a [(PathBuf, String)],
    pub marks: &'a MarkSet,
}

/// Where a column's entries come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Directory(PathBuf),
    /// The static favorites root.
    Favorites,
    /// The marked paths.
    Selection,
}

/// Screen placement for [`Column::draw`].
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub x: u16,
    pub y: u16,
    pub width: usize,
    pub height: usize,
    pub active: bool,
}

/// One directory's listing with its cursor.
#[derive(Debug, Clone)]
pub struct Column {
    source: Source,
    entries: Vec<Entry>,
    cursor: usize,
    /// Index of the column that was active when this one was pushed.
    parent: usize,
}

impl Column {
    /// Build a column for `source`, listing it immediately.
    pub fn new(source: Source, ctx: &ListContext<'_>, parent: usize) -> Self {
        let mut column = Self {
            source,
            entries: Vec::new(),
            cursor: 0,
            parent,
        };
        column.entries = column.build(ctx);
        column
    }

    pub fn directory(path: impl Into<PathBuf>, ctx: &ListContext<'_>, parent: usize) -> Self {
        Self::new(Source::Directory(path.into()), ctx, parent)
    }

    fn build(&self, ctx: &ListContext<'_>) -> Vec<Entry> {
        let entries = match &self.source {
            Source::Directory(path) => list(path, &ctx.options),
            Source::Favorites => ctx
                .favorites
                .iter()
                .map(|(path, label)| Entry::favorite(path, label.as_str()))
                .collect(),
            Source::Selection => ctx
                .marks
                .iter()
                .map(|path| Entry::favorite(path, path.to_string_lossy()))
                .collect(),
        };
        non_empty(entries, "empty")
    }

    /// Re-list in place, keeping the cursor on the same name when possible.
    pub fn refresh(&mut self, ctx: &ListContext<'_>) {
        let name = self.selected().name().to_string();
        self.entries = self.build(ctx);
        self.cursor = self
            .entries
            .iter()
            .position(|e| !e.is_placeholder() && e.name() == name)
            .unwrap_or(0);
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// The listed directory, for real directory columns.
    pub fn directory_path(&self) -> Option<&Path> {
        match &self.source {
            Source::Directory(path) => Some(path),
            _ => None,
        }
    }

    /// Selection columns span the whole terminal.
    pub fn is_full_width(&self) -> bool {
        self.source == Source::Selection
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn parent(&self) -> usize {
        self.parent
    }

    pub fn selected(&self) -> &Entry {
        &self.entries[self.cursor]
    }

    /// Set the cursor, clamped to the entries.
    pub fn set_cursor(&mut self, index: usize) {
        self.cursor = index.min(self.entries.len() - 1);
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let target = self.cursor.saturating_add_signed(delta);
        self.set_cursor(target);
    }

    /// Step forward, wrapping to the first entry.
    pub fn next(&mut self) {
        self.cursor = (self.cursor + 1) % self.entries.len();
    }

    pub fn first(&mut self) {
        self.cursor = 0;
    }

    pub fn last(&mut self) {
        self.cursor = self.entries.len() - 1;
    }

    /// Put the cursor on `name`. A directory that exists on disk but is not
    /// listed (hidden, say) is added to the listing first.
    pub fn select_by_name(&mut self, name: &str) {
        if let Some(index) = self
            .entries
            .iter()
            .position(|e| !e.is_placeholder() && e.name() == name)
        {
            self.cursor = index;
            return;
        }
        if let Source::Directory(dir) = &self.source {
            let candidate = dir.join(name);
            if candidate.is_dir() {
                self.entries.retain(|e| !e.is_placeholder());
                self.entries.push(Entry::file(candidate));
                self.cursor = self.entries.len() - 1;
                return;
            }
        }
        self.cursor = 0;
    }

    /// Display width of this column.
    pub fn width(&self, active: bool, bounds: &WidthBounds) -> usize {
        let widest = self
            .entries
            .iter()
            .map(Entry::display_width)
            .max()
            .unwrap_or(0);
        let cap = if active { bounds.max_active } else { bounds.max };
        let bonus = if active { ACTIVE_BONUS } else { 0 };
        widest.max(bounds.min).min(cap) + bonus
    }

    /// First entry index shown when `height` rows are visible.
    pub fn scroll_offset(&self, height: usize) -> usize {
        (self.cursor + 1).saturating_sub(height)
    }

    pub fn draw(&self, surface: &mut dyn Surface, at: Placement, marks: &MarkSet) {
        let skip = self.scroll_offset(at.height);
        let visible = self.entries.iter().enumerate().skip(skip).take(at.height);
        for (row, (index, entry)) in visible.enumerate() {
            let attr = Attr {
                highlight: index == self.cursor,
                bold: entry.is_marked(marks),
            };
            surface.put(
                at.y + row as u16,
                at.x,
                &entry.format(at.width, at.active),
                attr,
            );
        }
    }
}

/// List `path` as entries, filtered and sorted. Failures become a placeholder.
pub fn list(path: &Path, options: &ListOptions) -> Vec<Entry> {
    let read = match std::fs::read_dir(path) {
        Ok(read) => read,
        Err(e) => {
            let err = BrowseError::io(path, e);
            tracing::debug!("listing failed: {err}");
            return vec![Entry::empty(err.reason())];
        }
    };
    let mut entries: Vec<Entry> = read
        .filter_map(|item| match item {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::debug!(path = %path.display(), "skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|item| {
            let name = item.file_name();
            let name = name.to_string_lossy();
            (options.dotfiles || !name.starts_with('.'))
                && (options.backups || !name.ends_with('~'))
        })
        .map(|item| Entry::file(item.path()))
        .collect();
    sort_entries(&mut entries, options.sort);
    non_empty(entries, "empty")
}

/// Stable sort by the entries' sort keys.
pub fn sort_entries(entries: &mut [Entry], sort: SortState) {
    if sort.reverse {
        entries.sort_by_cached_key(|e| Reverse(e.sort_key(sort.key)));
    } else {
        entries.sort_by_cached_key(|e| e.sort_key(sort.key));
    }
}

fn non_empty(entries: Vec<Entry>, reason: &str) -> Vec<Entry> {
    if entries.is_empty() {
        vec![Entry::empty(reason)]
    } else {
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortKey;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "aaaa").unwrap();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join(".hidden"), "").unwrap();
        fs::write(root.join("notes~"), "").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        temp
    }

    fn names(column: &Column) -> Vec<&str> {
        column.entries().iter().map(Entry::name).collect()
    }

    fn ctx(options: ListOptions, marks: &MarkSet) -> ListContext<'_> {
        ListContext {
            options,
            favorites: &[],
            marks,
        }
    }

    #[test]
    fn test_list_filters_and_orders() {
        let temp = fixture();
        let marks = MarkSet::new();
        let column = Column::directory(temp.path(), &ctx(ListOptions::default(), &marks), 0);
        assert_eq!(names(&column), vec!["sub", "a.txt", "b.txt", "notes~"]);

        let options = ListOptions {
            dotfiles: true,
            backups: false,
            ..ListOptions::default()
        };
        let column = Column::directory(temp.path(), &ctx(options, &marks), 0);
        assert_eq!(names(&column), vec!["sub", ".hidden", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_empty_and_unreadable_become_placeholders() {
        let temp = fixture();
        let marks = MarkSet::new();
        let c = ctx(ListOptions::default(), &marks);

        let empty = Column::directory(temp.path().join("sub"), &c, 0);
        assert_eq!(empty.len(), 1);
        assert!(empty.selected().is_placeholder());

        let missing = Column::directory(temp.path().join("nope"), &c, 0);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing.selected().ls_l(), "-- not found --");
    }

    #[test]
    fn test_cursor_is_clamped() {
        let temp = fixture();
        let marks = MarkSet::new();
        let mut column = Column::directory(temp.path(), &ctx(ListOptions::default(), &marks), 0);
        column.move_cursor(-5);
        assert_eq!(column.cursor(), 0);
        column.move_cursor(100);
        assert_eq!(column.cursor(), column.len() - 1);
        column.next();
        assert_eq!(column.cursor(), 0);
        column.set_cursor(99);
        assert_eq!(column.cursor(), column.len() - 1);
    }

    #[test]
    fn test_refresh_keeps_name() {
        let temp = fixture();
        let marks = MarkSet::new();
        let mut column = Column::directory(temp.path(), &ctx(ListOptions::default(), &marks), 0);
        column.select_by_name("b.txt");

        let by_size = ListOptions {
            sort: SortState::new(SortKey::Size, true),
            ..ListOptions::default()
        };
        column.refresh(&ctx(by_size, &marks));
        assert_eq!(column.selected().name(), "b.txt");

        fs::remove_file(temp.path().join("b.txt")).unwrap();
        column.refresh(&ctx(by_size, &marks));
        assert_eq!(column.cursor(), 0);
    }

    #[test]
    fn test_select_by_name_synthesizes_hidden_directory() {
        let temp = fixture();
        fs::create_dir(temp.path().join(".config")).unwrap();
        let marks = MarkSet::new();
        let mut column = Column::directory(temp.path(), &ctx(ListOptions::default(), &marks), 0);

        column.select_by_name(".config");
        assert_eq!(column.selected().name(), ".config");
        assert!(column.selected().is_dir());

        column.select_by_name("does-not-exist");
        assert_eq!(column.cursor(), 0);
    }

    #[test]
    fn test_width_bounds() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("x"), "").unwrap();
        fs::write(temp.path().join("a".repeat(50)), "").unwrap();
        let marks = MarkSet::new();
        let bounds = WidthBounds::default();
        let column = Column::directory(temp.path(), &ctx(ListOptions::default(), &marks), 0);
        assert_eq!(column.width(false, &bounds), 20);
        assert_eq!(column.width(true, &bounds), 40);

        let small = TempDir::new().unwrap();
        fs::write(small.path().join("x"), "").unwrap();
        let column = Column::directory(small.path(), &ctx(ListOptions::default(), &marks), 0);
        assert_eq!(column.width(false, &bounds), 8);
        assert_eq!(column.width(true, &bounds), 13);
    }

    #[test]
    fn test_scroll_offset() {
        let temp = TempDir::new().unwrap();
        for i in 0..30 {
            fs::write(temp.path().join(format!("f{i:02}")), "").unwrap();
        }
        let marks = MarkSet::new();
        let mut column = Column::directory(temp.path(), &ctx(ListOptions::default(), &marks), 0);
        assert_eq!(column.scroll_offset(10), 0);
        column.set_cursor(9);
        assert_eq!(column.scroll_offset(10), 0);
        column.set_cursor(25);
        assert_eq!(column.scroll_offset(10), 16);
    }
}
