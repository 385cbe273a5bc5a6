//! Terminal-agnostic keyboard input.

/// Keyboard input abstraction.
///
/// Decouples the session state machine from how keys arrive (raw SSH channel
/// bytes, crossterm events), so tests can drive it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Control chord, e.g. `Ctrl('c')`.
    Ctrl(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Tab key (next tab).
    Tab,
    /// Shift+Tab (previous tab).
    BackTab,
    /// Escape key (quit).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Home key.
    Home,
    /// End key.
    End,
}

impl KeyInput {
    /// Keys that end the session: `ctrl+c`, `q`, `esc`.
    pub fn is_quit(self) -> bool {
        matches!(self, Self::Ctrl('c') | Self::Char('q') | Self::Esc)
    }
}
