//! Terminal console and the application wrapper around the browser.

use std::io;
use std::process::{Command, ExitStatus};

use color_eyre::eyre::WrapErr;
use colfm_core::{Browser, Console, Key};
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;

use crate::event::key_press;
use crate::theme::Theme;
use crate::ui::MillerView;

/// Application result type.
pub type AppResult<T> = color_eyre::Result<T>;

/// Size assumed when the terminal cannot report one.
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// The real terminal, driven through ratatui and crossterm.
pub struct TerminalConsole {
    terminal: DefaultTerminal,
    theme: Theme,
}

impl TerminalConsole {
    /// Enter raw mode and the alternate screen.
    pub fn new(theme: Theme) -> io::Result<Self> {
        Ok(Self {
            terminal: ratatui::try_init()?,
            theme,
        })
    }
}

impl Console for TerminalConsole {
    fn read_key(&mut self) -> io::Result<Key> {
        loop {
            let event = event::read()?;
            if let Event::Resize(..) = event {
                // Let the caller redraw at the new size.
                return Ok(Key::Other);
            }
            if let Some(key) = key_press(&event) {
                return Ok(key);
            }
        }
    }

    fn draw(&mut self, browser: &Browser, status: Option<&str>) -> io::Result<()> {
        let theme = &self.theme;
        self.terminal.draw(|frame| {
            let view = MillerView::new(browser, theme).status(status);
            frame.render_widget(view, frame.area());
        })?;
        Ok(())
    }

    fn run_foreground(&mut self, command: &mut Command) -> io::Result<ExitStatus> {
        ratatui::restore();
        let status = command.status();
        self.terminal = ratatui::try_init()?;
        self.terminal.clear()?;
        status
    }

    fn size(&self) -> (u16, u16) {
        self.terminal
            .size()
            .map(|size| (size.width, size.height))
            .unwrap_or(FALLBACK_SIZE)
    }
}

impl Drop for TerminalConsole {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

/// Main application: a browser plus its theme.
pub struct App {
    browser: Browser,
    theme: Theme,
}

impl App {
    pub fn new(browser: Browser) -> Self {
        let theme = Theme::from_config(&browser.config().colors);
        Self { browser, theme }
    }

    /// Run until the user quits. Returns the browser so its state can be saved.
    pub fn run(mut self) -> AppResult<Browser> {
        let mut console =
            TerminalConsole::new(self.theme).wrap_err("failed to initialise the terminal")?;
        let result = self.browser.run(&mut console);
        drop(console);
        result.wrap_err("terminal I/O failed")?;
        Ok(self.browser)
    }
}
