//! Multiple independent navigation stacks.

use crate::column::ListContext;
use crate::shadow::NoShadow;
use crate::stack::{Activation, NavStack};

/// Manager for multiple tabs.
///
/// There is always at least one tab. Switching tabs changes which stack is
/// live without touching any of them.
#[derive(Debug, Clone)]
pub struct TabManager {
    /// All open tabs.
    tabs: Vec<NavStack>,
    /// Index of the current tab.
    current: usize,
}

impl TabManager {
    /// Create a tab manager with one initial tab.
    pub fn new(initial: NavStack) -> Self {
        Self {
            tabs: vec![initial],
            current: 0,
        }
    }

    /// Get the number of open tabs.
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &NavStack {
        &self.tabs[self.current]
    }

    pub fn current_mut(&mut self) -> &mut NavStack {
        &mut self.tabs[self.current]
    }

    pub fn tabs(&self) -> &[NavStack] {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut [NavStack] {
        &mut self.tabs
    }

    /// Move `delta` tabs forward (negative for backward), wrapping.
    pub fn switch(&mut self, delta: isize) {
        let len = self.tabs.len() as isize;
        self.current = (self.current as isize + delta).rem_euclid(len) as usize;
    }

    /// Open the current tab's selected directory in a new tab placed right
    /// after the current one, and switch to it.
    ///
    /// Returns false when the selection is not a directory. The original tab
    /// is left untouched.
    pub fn open_child_tab(&mut self, ctx: &ListContext<'_>) -> bool {
        let mut child = self.current().clone();
        if !child.active().selected().is_dir() {
            return false;
        }
        if child.activate(ctx, &NoShadow) != Activation::Descended {
            return false;
        }
        self.tabs.insert(self.current + 1, child);
        self.current += 1;
        tracing::info!(tabs = self.tabs.len(), "opened tab");
        true
    }

    /// Close the current tab. Returns false if it is the last one.
    pub fn close(&mut self) -> bool {
        if self.tabs.len() <= 1 {
            return false;
        }
        self.tabs.remove(self.current);
        self.current %= self.tabs.len();
        tracing::info!(tabs = self.tabs.len(), "closed tab");
        true
    }
}
