//! The navigation stack: columns from a root down to the active one.

use std::path::{Component, Path, PathBuf};

use crate::column::{Column, ListContext, Source};
use crate::entry::EntryKind;
use crate::shadow::ShadowFs;

/// What activating the selected entry did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A new column was pushed.
    Descended,
    /// The entry is not navigable; the caller should show it in the viewer.
    View(PathBuf),
    /// Nothing to do (placeholder or missing entry).
    Ignored,
}

/// Columns ordered root to leaf. The last column is always the active one.
///
/// The stack owns every column; a column's parent is an index into
/// `columns`. The root is its own parent.
#[derive(Debug, Clone)]
pub struct NavStack {
    columns: Vec<Column>,
}

impl NavStack {
    /// A stack holding only the favorites root.
    pub fn favorites(ctx: &ListContext<'_>) -> Self {
        Self {
            columns: vec![Column::new(Source::Favorites, ctx, 0)],
        }
    }

    /// A stack holding only the selection pseudo-directory.
    pub fn selection(ctx: &ListContext<'_>) -> Self {
        Self {
            columns: vec![Column::new(Source::Selection, ctx, 0)],
        }
    }

    /// Rebuild a stack from the favorites root down to `path`.
    ///
    /// Each directory segment is selected and descended into. A final
    /// non-directory segment is only selected. When `prior` held a column for
    /// the resulting directory, its cursor is carried over.
    pub fn open(
        path: &Path,
        ctx: &ListContext<'_>,
        prior: Option<&NavStack>,
    ) -> Self {
        let mut stack = Self::favorites(ctx);
        stack.active_mut().select_by_name("/");
        stack.push(PathBuf::from("/"), ctx);

        let mut reached = true;
        for component in path.components() {
            match component {
                Component::Normal(part) => {
                    let part = part.to_string_lossy();
                    let active = stack.active_mut();
                    active.select_by_name(&part);
                    let selected = active.selected();
                    if selected.name() != part || !selected.is_dir() {
                        reached = false;
                        break;
                    }
                    let Some(next) = selected.path().map(Path::to_path_buf) else {
                        reached = false;
                        break;
                    };
                    stack.push(next, ctx);
                }
                Component::ParentDir => {
                    stack.leave();
                }
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            }
        }

        if reached {
            if let (Some(prior), Some(dir)) = (prior, stack.directory()) {
                let cursor = prior
                    .columns
                    .iter()
                    .find(|c| c.directory_path() == Some(dir))
                    .map(Column::cursor);
                if let Some(cursor) = cursor {
                    stack.active_mut().set_cursor(cursor);
                }
            }
        }
        stack
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn active_index(&self) -> usize {
        self.columns.len() - 1
    }

    pub fn active(&self) -> &Column {
        &self.columns[self.active_index()]
    }

    pub fn active_mut(&mut self) -> &mut Column {
        let index = self.active_index();
        &mut self.columns[index]
    }

    /// Directory listed by the active column, if it is a real directory.
    pub fn directory(&self) -> Option<&Path> {
        self.active().directory_path()
    }

    /// Deepest real directory on the stack.
    pub fn working_directory(&self) -> Option<&Path> {
        self.columns.iter().rev().find_map(Column::directory_path)
    }

    /// Push a column listing `path` on top of the active one.
    pub fn push(&mut self, path: PathBuf, ctx: &ListContext<'_>) {
        let parent = self.active_index();
        tracing::debug!(path = %path.display(), "descend");
        self.columns.push(Column::directory(path, ctx, parent));
    }

    /// Activate the active column's selected entry.
    pub fn activate(&mut self, ctx: &ListContext<'_>, shadow: &dyn ShadowFs) -> Activation {
        let selected = self.active().selected();
        if selected.is_placeholder() || selected.kind() == EntryKind::Missing {
            return Activation::Ignored;
        }
        let Some(path) = selected.path().map(Path::to_path_buf) else {
            return Activation::Ignored;
        };
        if selected.is_dir() {
            self.push(path, ctx);
            Activation::Descended
        } else if let Some(shadow) = shadow.shadow(&path) {
            self.push(shadow, ctx);
            Activation::Descended
        } else {
            Activation::View(path)
        }
    }

    /// Make the active column's parent active, dropping the abandoned
    /// columns. Returns `false` at the root.
    pub fn leave(&mut self) -> bool {
        let active = self.active_index();
        let parent = self.columns[active].parent();
        if parent >= active {
            return false;
        }
        self.columns.truncate(parent + 1);
        true
    }

    /// Re-list every column.
    pub fn refresh(&mut self, ctx: &ListContext<'_>) {
        for column in &mut self.columns {
            column.refresh(ctx);
        }
    }

    /// Re-list only columns built from the mark set.
    pub fn refresh_selection(&mut self, ctx: &ListContext<'_>) {
        for column in &mut self.columns {
            if column.source() == &Source::Selection {
                column.refresh(ctx);
            }
        }
    }
}
