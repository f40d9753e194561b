//! UI components and widgets.

mod miller;

pub use miller::MillerView;

use colfm_core::{Attr, Surface};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::theme::Theme;

/// A [`Surface`] writing into a ratatui buffer area.
///
/// Row 0 gets the header style, the last two rows the marks and status
/// styles. Highlight and bold attributes are patched on top.
pub struct BufferSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    theme: &'a Theme,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, theme: &'a Theme) -> Self {
        Self { buf, area, theme }
    }

    fn style_for(&self, row: u16, attr: Attr) -> Style {
        let height = self.area.height;
        let mut style = if row == 0 {
            self.theme.header
        } else if row + 1 == height {
            self.theme.status
        } else if row + 2 == height {
            self.theme.marks
        } else {
            self.theme.normal
        };
        if attr.bold {
            style = style.patch(self.theme.marked);
        }
        if attr.highlight {
            style = style.patch(self.theme.highlight);
        }
        style
    }
}

impl Surface for BufferSurface<'_> {
    fn put(&mut self, row: u16, col: u16, text: &str, attr: Attr) {
        if row >= self.area.height || col >= self.area.width {
            return;
        }
        let style = self.style_for(row, attr);
        let room = (self.area.width - col) as usize;
        self.buf
            .set_stringn(self.area.x + col, self.area.y + row, text, room, style);
    }

    fn size(&self) -> (u16, u16) {
        (self.area.width, self.area.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_clips_at_edge() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        let theme = Theme::dark();
        let mut surface = BufferSurface::new(&mut buf, area, &theme);
        surface.put(2, 6, "abcdef", Attr::PLAIN);
        surface.put(9, 0, "offscreen", Attr::PLAIN);

        assert_eq!(buf[(6, 2)].symbol(), "a");
        assert_eq!(buf[(9, 2)].symbol(), "d");
    }

    #[test]
    fn test_row_and_attr_styles() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        let theme = Theme::dark();
        let mut surface = BufferSurface::new(&mut buf, area, &theme);
        surface.put(0, 0, "h", Attr::PLAIN);
        surface.put(4, 0, "s", Attr::PLAIN);
        surface.put(2, 0, "x", Attr { highlight: true, bold: false });
        surface.put(3, 0, "m", Attr { highlight: false, bold: true });

        assert_eq!(buf[(0, 0)].fg, theme.header.fg.unwrap());
        assert_eq!(buf[(0, 4)].bg, theme.status.bg.unwrap());
        assert_eq!(buf[(0, 2)].bg, theme.highlight.bg.unwrap());
        assert_eq!(buf[(0, 3)].fg, theme.marked.fg.unwrap());
    }
}
