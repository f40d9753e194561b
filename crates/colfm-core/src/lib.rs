//! Core state machine for colfm.
//!
//! Entries, Miller columns, the navigation stack, tabs, the mark set and the
//! modal overlays all live here. Terminal access goes through the
//! [`Console`] and [`Surface`] traits, which a front end implements.

mod browser;
mod column;
mod config;
mod console;
mod entry;
mod error;
mod key;
mod marks;
mod shadow;
mod sort;
mod stack;
mod state;
mod tabs;

pub mod line_edit;
pub mod overlay;
pub mod screen;

pub use browser::{Browser, MARKED_ENV, Step};
pub use column::{Column, ListContext, ListOptions, Placement, Source, list, sort_entries};
pub use config::{
    ACTIVE_BONUS, Config, Favorite, SIDEBAR_MIN_WIDTH, WidthBounds, WidthBoundsBuilder,
    expand_tilde,
};
pub use console::{Attr, Console, Surface};
pub use entry::{
    ELLIPSIS, EmptyPlaceholder, Entry, EntryKind, FavoriteEntry, FileEntry, SortValue,
    human_size, mode_string, truncate,
};
pub use error::{BrowseError, ConfigError, StateError};
pub use key::{Action, Key};
pub use marks::MarkSet;
pub use shadow::{AvfsShadow, NoShadow, ShadowFs};
pub use sort::{SortKey, SortState};
pub use stack::{Activation, NavStack};
pub use state::StateStore;
pub use tabs::TabManager;
