//! Screen composition: header, Miller columns, sidebar, marks and status line.
//!
//! Row 0 holds the header, columns start at row 2, the marks line sits just
//! above the status line on the last row.

use itertools::Itertools;

use crate::browser::Browser;
use crate::column::{Placement, Source};
use crate::config::SIDEBAR_MIN_WIDTH;
use crate::console::{Attr, Surface};
use crate::entry::truncate;
use crate::marks::MarkSet;

/// First row used by columns.
pub const COLUMNS_TOP: u16 = 2;

/// Rows not available to columns: header, spacer, marks line, status line.
const RESERVED_ROWS: u16 = 4;

/// Where the sidebar goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarArea {
    pub x: u16,
    pub width: usize,
}

/// Computed screen geometry for one frame.
#[derive(Debug, Clone)]
pub struct ScreenLayout {
    /// `(column index, placement)` for each visible column, left to right.
    pub columns: Vec<(usize, Placement)>,
    pub sidebar: Option<SidebarArea>,
}

/// Fit columns right to left from the active one; leading columns that do
/// not fit are skipped. The sidebar, when shown, takes what is left over.
pub fn layout(browser: &Browser, (cols, rows): (u16, u16)) -> ScreenLayout {
    let stack = browser.stack();
    let bounds = &browser.config().widths;
    let height = rows.saturating_sub(RESERVED_ROWS) as usize;
    let total = cols as usize;
    let active_index = stack.active_index();
    let sidebar = browser.sidebar_visible();

    let widths: Vec<usize> = stack
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let active = i == active_index;
            if active && column.is_full_width() {
                total.saturating_sub(1)
            } else {
                column.width(active, bounds)
            }
        })
        .collect();

    let mut used = if sidebar { SIDEBAR_MIN_WIDTH } else { 0 };
    let mut fitting = 0;
    for width in widths.iter().rev() {
        used += width + 1;
        if used > total {
            break;
        }
        fitting += 1;
    }
    // Always show the active column, clipped if needed.
    let fitting = fitting.max(1);
    let skip = widths.len() - fitting;

    let mut x = 0usize;
    let mut columns = Vec::with_capacity(fitting);
    for (i, &width) in widths.iter().enumerate().skip(skip) {
        columns.push((
            i,
            Placement {
                x: x as u16,
                y: COLUMNS_TOP,
                width,
                height,
                active: i == active_index,
            },
        ));
        x += width + 1;
    }

    let sidebar = sidebar.then(|| SidebarArea {
        x: x.min(total) as u16,
        width: total.saturating_sub(x + 1),
    });
    ScreenLayout { columns, sidebar }
}

/// Draw the whole screen. `status` replaces the default status line.
pub fn draw_screen(browser: &Browser, surface: &mut dyn Surface, status: Option<&str>) {
    let size = surface.size();
    let (cols, rows) = size;
    if rows == 0 || cols == 0 {
        return;
    }

    surface.put(0, 0, &header(browser), Attr::PLAIN);

    let frame = layout(browser, size);
    let stack = browser.stack();
    for (index, placement) in &frame.columns {
        stack.columns()[*index].draw(surface, *placement, browser.marks());
    }

    if let Some(area) = frame.sidebar {
        let height = rows.saturating_sub(RESERVED_ROWS) as usize;
        let preview = stack.active().selected().preview();
        for (row, line) in preview.lines().take(height).enumerate() {
            let line: String = line.chars().take(area.width).collect();
            surface.put(COLUMNS_TOP + row as u16, area.x, &line, Attr::PLAIN);
        }
    }

    if rows >= 2 {
        let marks = marks_line(browser.marks(), cols as usize);
        surface.put(rows - 2, 0, &marks, Attr::PLAIN);
    }
    let status = match status {
        Some(text) => format!("colfm - {} - {text}", browser.options().sort.label()),
        None => status_line(browser),
    };
    surface.put(rows - 1, 0, &status, Attr::PLAIN);
}

/// Tab indicator plus the active location.
pub fn header(browser: &Browser) -> String {
    let tabs = browser.tabs();
    let indicator = if tabs.len() > 1 {
        format!("[{}/{}] ", tabs.current_index() + 1, tabs.len())
    } else {
        String::new()
    };
    let location = match browser.stack().active().source() {
        Source::Directory(path) => path.display().to_string(),
        Source::Favorites => "favorites".to_string(),
        Source::Selection => "selection".to_string(),
    };
    format!("{indicator}{location}")
}

/// The marked paths as `[a b c]`, shortened to `width`.
pub fn marks_line(marks: &MarkSet, width: usize) -> String {
    let joined = marks.iter().map(|p| p.display()).join(" ");
    truncate(&format!("[{joined}]"), width)
}

/// `colfm - <sort> - <ls -l of the selection>`.
pub fn status_line(browser: &Browser) -> String {
    format!(
        "colfm - {} - {}",
        browser.options().sort.label(),
        browser.stack().active().selected().ls_l()
    )
}
