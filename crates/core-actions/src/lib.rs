//! Command execution: turns resolved key bindings into document and
//! cursor mutations, inside the per-command processing bracket.

pub mod dispatcher;

pub use dispatcher::{DispatchResult, dispatch, place_cursor};

/// Outcome of the modal quit confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitChoice {
    /// Save, then quit (the quit is abandoned if the save fails).
    Yes,
    /// Quit without saving.
    No,
    /// Stay in the editor; nothing changes.
    Cancel,
}

/// Seam for the quit dialog. The production implementation paints a modal
/// prompt on the display surface and blocks for a choice; tests supply a
/// canned answer.
pub trait QuitConfirm {
    fn ask(&mut self) -> QuitChoice;
}

/// A fixed answer, for tests and headless use.
pub struct PresetConfirm(pub QuitChoice);

impl QuitConfirm for PresetConfirm {
    fn ask(&mut self) -> QuitChoice {
        self.0
    }
}
