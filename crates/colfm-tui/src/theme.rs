//! Color theme for the TUI.
//!
//! A small semantic palette (Tailwind CSS slate plus accents) with dark and
//! light variants. Entries from the `[colors]` config table override single
//! roles.

use std::collections::BTreeMap;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};

/// Theme variant (dark or light).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Current theme variant.
    pub variant: ThemeVariant,

    /// Column entries and sidebar text.
    pub normal: Style,
    /// The cursor row.
    pub highlight: Style,
    /// Marked entries.
    pub marked: Style,

    // Header/Footer
    pub header: Style,
    pub marks: Style,
    pub status: Style,
}

impl Theme {
    /// Dark theme using a slate-based palette.
    pub fn dark() -> Self {
        let slate_50 = Color::Rgb(248, 250, 252);
        let slate_100 = Color::Rgb(241, 245, 249);
        let slate_300 = Color::Rgb(203, 213, 225);
        let slate_700 = Color::Rgb(51, 65, 85);
        let slate_800 = Color::Rgb(30, 41, 59);

        let blue_400 = Color::Rgb(96, 165, 250);
        let amber_500 = Color::Rgb(245, 158, 11);

        Self {
            variant: ThemeVariant::Dark,
            normal: Style::new().fg(slate_300),
            highlight: Style::new().bg(slate_700).fg(slate_50),
            marked: Style::new().fg(amber_500).add_modifier(Modifier::BOLD),
            header: Style::new().fg(blue_400).add_modifier(Modifier::BOLD),
            marks: Style::new().fg(amber_500),
            status: Style::new().bg(slate_800).fg(slate_100),
        }
    }

    /// Light theme using a slate-based palette.
    pub fn light() -> Self {
        let slate_100 = Color::Rgb(241, 245, 249);
        let slate_200 = Color::Rgb(226, 232, 240);
        let slate_700 = Color::Rgb(51, 65, 85);
        let slate_900 = Color::Rgb(15, 23, 42);

        let blue_700 = Color::Rgb(29, 78, 216);
        let amber_600 = Color::Rgb(217, 119, 6);

        Self {
            variant: ThemeVariant::Light,
            normal: Style::new().fg(slate_700),
            highlight: Style::new().bg(slate_200).fg(slate_900),
            marked: Style::new().fg(amber_600).add_modifier(Modifier::BOLD),
            header: Style::new().fg(blue_700).add_modifier(Modifier::BOLD),
            marks: Style::new().fg(amber_600),
            status: Style::new().bg(slate_100).fg(slate_900),
        }
    }

    /// Create theme from variant.
    pub fn from_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self::dark(),
            ThemeVariant::Light => Self::light(),
        }
    }

    /// Build a theme from the `[colors]` table.
    ///
    /// The `theme` key picks the variant (`dark` or `light`); every other key
    /// names a role and holds `"<fg>"` or `"<fg> on <bg>"`. Unknown roles and
    /// unparseable colors are logged and skipped.
    pub fn from_config(colors: &BTreeMap<String, String>) -> Self {
        let variant = match colors.get("theme").map(String::as_str) {
            Some("light") => ThemeVariant::Light,
            _ => ThemeVariant::Dark,
        };
        let mut theme = Self::from_variant(variant);
        for (role, value) in colors.iter().filter(|(k, _)| k.as_str() != "theme") {
            let Some(style) = parse_style(value) else {
                tracing::warn!(role = %role, value = %value, "ignoring unparseable color");
                continue;
            };
            let Some(slot) = theme.role_mut(role) else {
                tracing::warn!(role = %role, "ignoring unknown color role");
                continue;
            };
            *slot = slot.patch(style);
        }
        theme
    }

    fn role_mut(&mut self, role: &str) -> Option<&mut Style> {
        match role {
            "normal" => Some(&mut self.normal),
            "highlight" => Some(&mut self.highlight),
            "marked" => Some(&mut self.marked),
            "header" => Some(&mut self.header),
            "marks" => Some(&mut self.marks),
            "status" => Some(&mut self.status),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Parse `"<fg>"` or `"<fg> on <bg>"`.
fn parse_style(value: &str) -> Option<Style> {
    let (fg, bg) = match value.split_once(" on ") {
        Some((fg, bg)) => (fg.trim(), Some(bg.trim())),
        None => (value.trim(), None),
    };
    let mut style = Style::new().fg(Color::from_str(fg).ok()?);
    if let Some(bg) = bg {
        style = style.bg(Color::from_str(bg).ok()?);
    }
    Some(style)
}
