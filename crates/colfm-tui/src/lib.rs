//! Terminal user interface for colfm.
//!
//! Implements the core's [`Console`](colfm_core::Console) on top of ratatui
//! and crossterm, and draws the browser as Miller columns.
//!
//! # Usage
//!
//! ```rust,no_run
//! use colfm_core::{Browser, Config, MarkSet};
//! use std::path::Path;
//!
//! let browser = Browser::new(Config::default(), Path::new("/tmp"), MarkSet::new());
//! let browser = colfm_tui::run(browser).unwrap();
//! ```

pub mod app;
mod event;
pub mod logging;
mod theme;
mod ui;

pub use app::{App, AppResult, TerminalConsole};
pub use theme::{Theme, ThemeVariant};
pub use ui::MillerView;

/// Run the TUI until the user quits, handing the browser back afterwards.
pub fn run(browser: colfm_core::Browser) -> AppResult<colfm_core::Browser> {
    App::new(browser).run()
}
