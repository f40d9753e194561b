//! Collaborator interfaces: the drawing surface and the interactive console.
//!
//! The core never talks to a terminal library directly. A front end supplies
//! a [`Surface`] to draw into and a [`Console`] that reads keys, redraws the
//! screen and hands the terminal to child processes.

use std::io;
use std::process::{Command, ExitStatus};

use crate::browser::Browser;
use crate::key::Key;

/// Text attributes for a drawn cell run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attr {
    /// Cursor row.
    pub highlight: bool,
    /// Marked entry.
    pub bold: bool,
}

impl Attr {
    pub const PLAIN: Self = Self {
        highlight: false,
        bold: false,
    };
}

/// A character grid that can be written at positions.
pub trait Surface {
    /// Write `text` starting at `(row, col)`. Text past the right edge is clipped.
    fn put(&mut self, row: u16, col: u16, text: &str, attr: Attr);

    /// `(columns, rows)`.
    fn size(&self) -> (u16, u16);
}

/// The interactive terminal as seen by the core.
pub trait Console {
    /// Block until the next key press.
    fn read_key(&mut self) -> io::Result<Key>;

    /// Redraw the whole screen. `status` replaces the status line when set.
    fn draw(&mut self, browser: &Browser, status: Option<&str>) -> io::Result<()>;

    /// Suspend the screen, run `command` in the foreground, then resume.
    fn run_foreground(&mut self, command: &mut Command) -> io::Result<ExitStatus>;

    /// `(columns, rows)`.
    fn size(&self) -> (u16, u16);
}
