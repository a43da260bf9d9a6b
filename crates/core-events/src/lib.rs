//! Input vocabulary shared by the dispatcher, the renderer, and the
//! display surface: normalized key events plus the pointer/resize/focus
//! notifications a surface delivers.
//!
//! Delivery is synchronous and single-threaded: the surface hands one
//! event at a time to the event loop, which runs it to completion before
//! asking for the next. Nothing here queues.

use std::fmt;

/// Normalized logical keys. Keypad variants arrive already collapsed onto
/// these; `BackTab` is the shifted-Tab key as terminals report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
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
    Insert,
    Delete,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// A key with no modifiers held.
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CTRL)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// Events delivered by the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Button press at a screen cell (column, row).
    Pointer {
        column: u16,
        row: u16,
        button: PointerButton,
    },
    /// New surface size in cells (columns, rows).
    Resize(u16, u16),
    FocusGained,
    FocusLost,
}
