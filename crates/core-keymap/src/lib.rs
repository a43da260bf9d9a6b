//! Key binding table.
//!
//! A binding matches when the event key equals the binding key and the
//! event's modifier state, restricted to the binding's mask, equals the
//! binding's required state. Resolution scans the table in order and the
//! first match wins; that order is a documented contract: bindings with
//! more specific masks must be listed before broader ones sharing the same
//! key, so e.g. plain `Delete` (mask SHIFT, state empty) never swallows
//! `Shift+Delete`.
//!
//! Keys that resolve to no binding fall through to literal character
//! insertion unless the CTRL modifier is held.

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

/// Editing operations the editor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    PageUp,
    PageDown,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
    TabRight,
    TabLeft,
    Backspace,
    DeleteChar,
    DeleteLine,
    InsertLine,
    InsertSpace,
    SplitLine,
    Save,
    Quit,
}

/// One row of the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub code: KeyCode,
    /// Modifier bits that must be set (within `mask`).
    pub state: KeyModifiers,
    /// Modifier bits considered when matching; bits outside are ignored.
    pub mask: KeyModifiers,
    /// Whether the command edits the document (drives the `changed` flag).
    pub mutates: bool,
    pub command: Command,
}

impl Binding {
    const fn new(
        code: KeyCode,
        state: KeyModifiers,
        mask: KeyModifiers,
        mutates: bool,
        command: Command,
    ) -> Self {
        Self {
            code,
            state,
            mask,
            mutates,
            command,
        }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.mods.intersection(self.mask) == self.state
    }
}

const NONE: KeyModifiers = KeyModifiers::empty();
const CTRL: KeyModifiers = KeyModifiers::CTRL;
const ALT: KeyModifiers = KeyModifiers::ALT;
const SHIFT: KeyModifiers = KeyModifiers::SHIFT;

/// Default editor bindings, in match order.
const EDITOR_BINDINGS: &[Binding] = &[
    // Cursor movement. Masking CTRL keeps the plain arrows from matching
    // the Ctrl+arrow chords bound further down.
    Binding::new(KeyCode::Down, NONE, CTRL, false, Command::CursorDown),
    Binding::new(KeyCode::Up, NONE, CTRL, false, Command::CursorUp),
    Binding::new(KeyCode::Left, NONE, CTRL, false, Command::CursorLeft),
    Binding::new(KeyCode::Right, NONE, CTRL, false, Command::CursorRight),
    // Line start/end.
    Binding::new(KeyCode::Home, NONE, CTRL, false, Command::LineStart),
    Binding::new(KeyCode::Left, CTRL, CTRL, false, Command::LineStart),
    Binding::new(KeyCode::End, NONE, CTRL, false, Command::LineEnd),
    Binding::new(KeyCode::Right, CTRL, CTRL, false, Command::LineEnd),
    // Document start/end.
    Binding::new(KeyCode::Home, CTRL, CTRL, false, Command::DocumentStart),
    Binding::new(KeyCode::Up, CTRL, CTRL, false, Command::DocumentStart),
    Binding::new(KeyCode::End, CTRL, CTRL, false, Command::DocumentEnd),
    Binding::new(KeyCode::Down, CTRL, CTRL, false, Command::DocumentEnd),
    // Tab stops (cursor hops only, no text change).
    Binding::new(KeyCode::Tab, NONE, SHIFT, false, Command::TabRight),
    Binding::new(KeyCode::BackTab, SHIFT, SHIFT, false, Command::TabLeft),
    Binding::new(KeyCode::Tab, SHIFT, SHIFT, false, Command::TabLeft),
    // Paging.
    Binding::new(KeyCode::PageUp, NONE, NONE, false, Command::PageUp),
    Binding::new(KeyCode::PageDown, NONE, NONE, false, Command::PageDown),
    // Character deletion.
    Binding::new(KeyCode::Backspace, NONE, NONE, true, Command::Backspace),
    Binding::new(KeyCode::Delete, NONE, SHIFT, true, Command::DeleteChar),
    // Line deletion/insertion.
    Binding::new(KeyCode::Delete, SHIFT, SHIFT, true, Command::DeleteLine),
    Binding::new(KeyCode::Char('k'), CTRL, CTRL, true, Command::DeleteLine),
    Binding::new(KeyCode::Insert, NONE, SHIFT, true, Command::InsertSpace),
    Binding::new(KeyCode::Insert, SHIFT, SHIFT, true, Command::InsertLine),
    Binding::new(KeyCode::Char('l'), CTRL, CTRL, true, Command::InsertLine),
    // Split the current line.
    Binding::new(KeyCode::Enter, NONE, SHIFT, true, Command::SplitLine),
    // Session commands.
    Binding::new(KeyCode::Char('q'), CTRL, CTRL, false, Command::Quit),
    Binding::new(KeyCode::Char('q'), ALT, ALT, false, Command::Quit),
    Binding::new(KeyCode::Char('s'), CTRL, CTRL, false, Command::Save),
    Binding::new(KeyCode::Char('s'), ALT, ALT, false, Command::Save),
];

/// Ordered command table with first-match-wins resolution.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::editor_default()
    }
}

impl Keymap {
    /// The built-in editor table.
    pub fn editor_default() -> Self {
        Self {
            bindings: EDITOR_BINDINGS.to_vec(),
        }
    }

    pub fn from_bindings(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    /// First binding matching `key`, scanning in table order.
    pub fn resolve(&self, key: &KeyEvent) -> Option<&Binding> {
        let found = self.bindings.iter().find(|b| b.matches(key));
        trace!(
            target: "dispatch",
            key = %key,
            command = ?found.map(|b| b.command),
            "resolve"
        );
        found
    }

    /// Literal-insertion fallback for keys no binding claims. Control
    /// chords never insert; unprintable characters are ignored.
    pub fn literal_fallback(key: &KeyEvent) -> Option<char> {
        if key.mods.contains(KeyModifiers::CTRL) {
            return None;
        }
        match key.code {
            KeyCode::Char(c) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}
