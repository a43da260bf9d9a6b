//! Status line composition.
//!
//! Fixed field layout: `col=` at column 0, `row=` at column 8 (both
//! 1-based values), the modified/saved marker at column 19, and the quit
//! hint right-aligned 15 columns from the edge. An I/O notice, when
//! present, takes the marker slot until the next successful save clears
//! it.

use core_state::EditorState;

const ROW_FIELD: usize = 8;
const MARKER_FIELD: usize = 19;
const HINT: &str = "Ctrl+Q to quit";
const HINT_FIELD_WIDTH: usize = 15;

/// Compose the full-width status line text.
pub fn format_status(state: &EditorState, width: usize) -> String {
    let mut cells = vec![' '; width];
    place(&mut cells, 0, &format!("col={}", state.cursor.col + 1));
    place(&mut cells, ROW_FIELD, &format!("row={}", state.cursor.row + 1));
    if let Some(notice) = &state.notice {
        place(&mut cells, MARKER_FIELD, notice);
    } else if state.changed {
        place(&mut cells, MARKER_FIELD, "Modified");
    } else if state.saved {
        place(&mut cells, MARKER_FIELD, "Saved");
    }
    if width > HINT_FIELD_WIDTH + MARKER_FIELD + 8 {
        place(&mut cells, width - HINT_FIELD_WIDTH, HINT);
    }
    cells.into_iter().collect()
}

/// Write `text` into the cell row at `offset`, clipping at the edge.
fn place(cells: &mut [char], offset: usize, text: &str) {
    for (i, ch) in text.chars().enumerate() {
        match cells.get_mut(offset + i) {
            Some(cell) => *cell = ch,
            None => break,
        }
    }
}
