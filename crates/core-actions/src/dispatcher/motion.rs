//! Cursor movement. None of these touch the document; the row stays in
//! `[0, line_count]` and the column stays non-negative but may run past
//! the line end.

use core_state::EditorState;

/// Tab-stop width for the cursor hop commands (distinct from the file
/// loader's tab expansion width).
const TAB_STOP: usize = 4;

pub fn cursor_down(state: &mut EditorState) {
    if state.cursor.row < state.doc.len() {
        state.cursor.row += 1;
    }
}

pub fn cursor_up(state: &mut EditorState) {
    if state.cursor.row > 0 {
        state.cursor.row -= 1;
    }
}

pub fn cursor_left(state: &mut EditorState) {
    if state.cursor.col > 0 {
        state.cursor.col -= 1;
    }
}

pub fn cursor_right(state: &mut EditorState) {
    state.cursor.col += 1;
}

pub fn page_up(state: &mut EditorState) {
    state.cursor.row = state.cursor.row.saturating_sub(state.view.rows);
}

pub fn page_down(state: &mut EditorState) {
    state.cursor.row = (state.cursor.row + state.view.rows).min(state.doc.len());
}

pub fn line_start(state: &mut EditorState) {
    state.cursor.col = 0;
}

pub fn line_end(state: &mut EditorState) {
    state.cursor.col = state.current_line_len();
}

pub fn document_start(state: &mut EditorState) {
    state.cursor.col = 0;
    state.cursor.row = 0;
}

pub fn document_end(state: &mut EditorState) {
    state.cursor.col = 0;
    state.cursor.row = state.doc.len();
}

/// Hop right to the next tab stop.
pub fn tab_right(state: &mut EditorState) {
    let col = state.cursor.col + 1;
    state.cursor.col = if col % TAB_STOP != 0 {
        col + TAB_STOP - col % TAB_STOP
    } else {
        col
    };
}

/// Hop left to the previous tab stop.
pub fn tab_left(state: &mut EditorState) {
    if state.cursor.col > 0 {
        let col = state.cursor.col - 1;
        state.cursor.col = col - col % TAB_STOP;
    }
}
