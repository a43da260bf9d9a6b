//! Text mutation commands. Every edit that can leave trailing whitespace
//! re-trims the touched line, and every edit pushes the repaint region it
//! dirtied onto the state's damage tracker.

use core_state::{DamageRect, EditorState};
use core_text::Line;

/// Insert a typed character at the cursor. A cursor on the virtual
/// end-of-text row first materializes an empty line there; a cursor past
/// the line end materializes the gap as spaces.
pub fn char_typed(state: &mut EditorState, ch: char) {
    if state.cursor.row == state.doc.len() {
        insert_line(state);
    }
    let col = state.cursor.col;
    let row = state.cursor.row;
    if let Some(line) = state.doc.line_mut(row) {
        line.pad_to(col);
        line.insert_at(col, ch);
        line.trim_trailing();
    }
    state.cursor.col += 1;
    state.damage.mark(DamageRect::line_tail(col, row));
}

/// Delete the character before the cursor. At column zero the current
/// line is joined onto the previous one and the cursor lands at the seam.
pub fn backspace(state: &mut EditorState) {
    let col = state.cursor.col;
    let row = state.cursor.row;
    let lines = state.doc.len();
    if col > 0 {
        if row >= lines {
            return;
        }
        state.cursor.col = col - 1;
        delete_char(state);
        return;
    }
    if row == 0 {
        return;
    }
    let prev_row = row - 1;
    let prev_len = state.doc.line(prev_row).map_or(0, |l| l.len());
    if row < lines {
        if let Some(tail) = state.doc.remove_line(row) {
            if let Some(prev) = state.doc.line_mut(prev_row) {
                prev.append_str(tail.as_str());
                prev.trim_trailing();
            }
        }
        state.damage.mark(DamageRect::below(prev_row));
    }
    state.cursor.col = prev_len;
    state.cursor.row = prev_row;
}

/// Delete the character under the cursor; the line is re-trimmed even
/// when the cursor sits past its end.
pub fn delete_char(state: &mut EditorState) {
    let col = state.cursor.col;
    let row = state.cursor.row;
    if let Some(line) = state.doc.line_mut(row) {
        if col < line.len() {
            line.remove_at(col);
        }
        line.trim_trailing();
        state.damage.mark(DamageRect::line_tail(col, row));
    }
}

/// Insert a space at the cursor without advancing it.
pub fn insert_space(state: &mut EditorState) {
    char_typed(state, ' ');
    state.cursor.col -= 1;
}

/// Remove the whole line under the cursor; no-op on the virtual row.
pub fn delete_line(state: &mut EditorState) {
    let row = state.cursor.row;
    if state.doc.remove_line(row).is_some() {
        state.damage.mark(DamageRect::below(row));
    }
}

/// Insert an empty line above the current one (the cursor ends up on it).
pub fn insert_line(state: &mut EditorState) {
    let row = state.cursor.row;
    state.doc.insert_after(row, Line::new());
    state.damage.mark(DamageRect::below(row));
}

/// Split the current line at the cursor; the cursor moves to the start of
/// the new line. On the virtual row this appends an empty line instead.
pub fn split_line(state: &mut EditorState) {
    let col = state.cursor.col;
    let row = state.cursor.row;
    if row < state.doc.len() {
        let tail = match state.doc.line_mut(row) {
            Some(line) if col < line.len() => {
                let tail = line.col_slice(col, usize::MAX).to_string();
                line.truncate(col);
                line.trim_trailing();
                Line::from(tail)
            }
            _ => Line::new(),
        };
        state.doc.insert_before(row + 1, tail);
    } else {
        state.doc.push_line(Line::new());
    }
    state.cursor.col = 0;
    state.cursor.row = row + 1;
    state.damage.mark(DamageRect::below(row));
}
