//! Miller columns widget: the whole browser screen.

use colfm_core::{Browser, screen};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use crate::theme::Theme;
use crate::ui::BufferSurface;

/// Renders the browser's columns, sidebar, marks and status line.
pub struct MillerView<'a> {
    browser: &'a Browser,
    theme: &'a Theme,
    /// Replaces the status line (prompts, one-shot messages).
    status: Option<&'a str>,
}

impl<'a> MillerView<'a> {
    pub fn new(browser: &'a Browser, theme: &'a Theme) -> Self {
        Self {
            browser,
            theme,
            status: None,
        }
    }

    pub fn status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for MillerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        buf.set_style(area, self.theme.normal);
        let status_row = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        buf.set_style(status_row, self.theme.status);

        let mut surface = BufferSurface::new(buf, area, self.theme);
        screen::draw_screen(self.browser, &mut surface, self.status);
    }
}
