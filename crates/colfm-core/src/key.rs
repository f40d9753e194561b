//! Terminal-independent key events.

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable character.
    Char(char),
    /// Character with Control held.
    Ctrl(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// Anything the front end could not map.
    Other,
}

impl Key {
    /// Cursor movement keys, which end an incremental search.
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            Self::Up
                | Self::Down
                | Self::Left
                | Self::Right
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
                | Self::Tab
                | Self::BackTab
        )
    }
}

/// A browser command bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Activate,
    Leave,
    LineDown,
    LineUp,
    HalfPageDown,
    HalfPageUp,
    First,
    Last,
    ToggleDotfiles,
    ToggleBackups,
    ToggleSidebar,
    ToggleSelectionView,
    CycleSort,
    ToggleReverse,
    Search,
    Select,
    ToggleMark,
    ClearMarks,
    OpenTab,
    CloseTab,
    NextTab,
    PrevTab,
    Shell,
    Mkdir,
    GoTo,
    CopyMarks,
    MoveMarks,
    DeleteMarks,
    Refresh,
    Quit,
}

impl Action {
    /// The command bound to `key`, if any.
    pub fn from_key(key: Key) -> Option<Self> {
        let action = match key {
            Key::Char('l') | Key::Right | Key::Enter => Self::Activate,
            Key::Char('h') | Key::Left => Self::Leave,
            Key::Char('j') | Key::Down => Self::LineDown,
            Key::Char('k') | Key::Up => Self::LineUp,
            Key::Char('J') | Key::PageDown => Self::HalfPageDown,
            Key::Char('K') | Key::PageUp => Self::HalfPageUp,
            Key::Char('g') | Key::Home => Self::First,
            Key::Char('G') | Key::End => Self::Last,
            Key::Char('.') => Self::ToggleDotfiles,
            Key::Char('~') => Self::ToggleBackups,
            Key::Char('v') => Self::ToggleSidebar,
            Key::Char('V') => Self::ToggleSelectionView,
            Key::Char('s') => Self::CycleSort,
            Key::Char('S') => Self::ToggleReverse,
            Key::Char('/') => Self::Search,
            Key::Char('%') => Self::Select,
            Key::Char('m') | Key::Char(' ') => Self::ToggleMark,
            Key::Char('C') => Self::ClearMarks,
            Key::Char('t') => Self::OpenTab,
            Key::Char('T') => Self::CloseTab,
            Key::Tab => Self::NextTab,
            Key::BackTab => Self::PrevTab,
            Key::Char('!') => Self::Shell,
            Key::Char('+') => Self::Mkdir,
            Key::Char(':') => Self::GoTo,
            Key::Char('c') => Self::CopyMarks,
            Key::Char('M') => Self::MoveMarks,
            Key::Char('D') => Self::DeleteMarks,
            Key::Char('R') => Self::Refresh,
            Key::Char('q') => Self::Quit,
            _ => return None,
        };
        Some(action)
    }
}
