//! Dispatch: one key event in, one completed command out.
//!
//! Events that arrive while a command is processing are dropped, not
//! queued; delivery is synchronous and single-threaded, so the
//! `input_disabled` flag only guards against re-entrant dispatch from a
//! modal sub-dialog. A dispatched event runs the full bracket:
//! `begin_command`, the bound operation (or literal insertion), then
//! `finish_command`, which re-parks the document cursor and re-enables
//! input. Viewport scrolling happens afterwards in the renderer.

use crate::{QuitChoice, QuitConfirm};
use core_events::KeyEvent;
use core_keymap::{Command, Keymap};
use core_state::EditorState;
use tracing::{debug, trace};

mod edit;
mod motion;

/// Result of dispatching a single input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// The event was processed (a repaint pass is due).
    pub consumed: bool,
    /// The editor should close.
    pub quit: bool,
}

impl DispatchResult {
    pub fn consumed() -> Self {
        Self {
            consumed: true,
            quit: false,
        }
    }

    pub fn ignored() -> Self {
        Self {
            consumed: false,
            quit: false,
        }
    }

    pub fn quit() -> Self {
        Self {
            consumed: true,
            quit: true,
        }
    }
}

/// Run one key event through the command table.
pub fn dispatch(
    key: &KeyEvent,
    state: &mut EditorState,
    keymap: &Keymap,
    confirm: &mut dyn QuitConfirm,
) -> DispatchResult {
    if state.input_disabled {
        trace!(target: "dispatch", key = %key, "dropped while processing");
        return DispatchResult::ignored();
    }

    state.begin_command();
    let mut quit = false;

    if let Some(binding) = keymap.resolve(key) {
        let binding = *binding;
        match binding.command {
            Command::CursorUp => motion::cursor_up(state),
            Command::CursorDown => motion::cursor_down(state),
            Command::CursorLeft => motion::cursor_left(state),
            Command::CursorRight => motion::cursor_right(state),
            Command::PageUp => motion::page_up(state),
            Command::PageDown => motion::page_down(state),
            Command::LineStart => motion::line_start(state),
            Command::LineEnd => motion::line_end(state),
            Command::DocumentStart => motion::document_start(state),
            Command::DocumentEnd => motion::document_end(state),
            Command::TabRight => motion::tab_right(state),
            Command::TabLeft => motion::tab_left(state),
            Command::Backspace => edit::backspace(state),
            Command::DeleteChar => edit::delete_char(state),
            Command::DeleteLine => edit::delete_line(state),
            Command::InsertLine => edit::insert_line(state),
            Command::InsertSpace => edit::insert_space(state),
            Command::SplitLine => edit::split_line(state),
            Command::Save => {
                if state.changed {
                    // Failure is surfaced via the status notice; flags stay put.
                    let _ = state.save_file();
                }
            }
            Command::Quit => quit = process_quit(state, confirm),
        }
        if binding.mutates {
            state.changed = true;
        }
    } else if let Some(ch) = Keymap::literal_fallback(key) {
        edit::char_typed(state, ch);
        state.changed = true;
    }

    state.finish_command();
    if quit {
        DispatchResult::quit()
    } else {
        DispatchResult::consumed()
    }
}

/// Move the cursor to a document cell, as a pointer click does. The
/// column is clamped to the right edge of the viewport, the row to the
/// virtual end-of-text position.
pub fn place_cursor(state: &mut EditorState, col: usize, row: usize) {
    if state.input_disabled {
        return;
    }
    let view = state.view;
    let col = col.min(view.origin_col + view.cols - 1);
    let row = row.min(view.origin_row + view.rows - 1).min(state.doc.len());
    state.cursor.col = col;
    state.cursor.row = row;
    state.doc.seek(row);
}

/// Ask before closing over unsaved changes. Returns whether the editor
/// should actually quit.
fn process_quit(state: &mut EditorState, confirm: &mut dyn QuitConfirm) -> bool {
    if !state.changed {
        return true;
    }
    let choice = confirm.ask();
    debug!(target: "dispatch", choice = ?choice, "quit confirmation");
    match choice {
        // A failed save keeps the editor open rather than dropping the
        // unsaved buffer.
        QuitChoice::Yes => state.save_file().is_ok(),
        QuitChoice::No => true,
        QuitChoice::Cancel => false,
    }
}
