//! The frame engine: replays accumulated damage onto a display surface.
//!
//! One frame per dispatched event. The pass erases the previously painted
//! cursor cell, aligns the viewport with the cursor and folds the scroll
//! into the damage set (a small vertical shift becomes a surface blit
//! plus a revealed strip, anything else a full repaint), repaints the
//! damaged document regions clipped to the viewport, and finishes with
//! the status line and the cursor glyph.

use crate::status::format_status;
use crate::viewport::{ScrollPolicy, policy_for, scroll_to_cursor};
use anyhow::Result;
use core_state::{DamageRect, EditorState};
use core_terminal::{CellStyle, Surface};
use tracing::trace;

/// Rows reserved at the top of the surface for the status line.
pub const STATUS_ROWS: usize = 1;

/// The virtual line shown at row `line_count`.
pub const END_OF_TEXT: &str = "[* End of text *]";

#[derive(Debug, Default)]
pub struct RenderEngine {
    /// Document cell last painted in cursor style, if any.
    last_cursor: Option<(usize, usize)>,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint one frame.
    pub fn render(&mut self, state: &mut EditorState, surface: &mut dyn Surface) -> Result<()> {
        self.erase_cursor(state, surface)?;
        self.sync_viewport(state, surface)?;

        let (full, rects) = state.damage.take();
        if full {
            let view = state.view;
            self.paint_region(
                state,
                surface,
                DamageRect::new(view.origin_col, view.origin_row, view.cols, view.rows),
            )?;
        } else {
            for rect in rects {
                self.paint_region(state, surface, rect)?;
            }
        }

        self.paint_status(state, surface)?;
        self.paint_cursor(state, surface)?;
        surface.flush()
    }

    /// Repaint the old cursor cell as plain text. Runs before any scroll
    /// so the stale inverse cell cannot be blitted elsewhere.
    fn erase_cursor(&mut self, state: &EditorState, surface: &mut dyn Surface) -> Result<()> {
        if let Some((col, row)) = self.last_cursor.take()
            && state.view.contains(col, row)
        {
            let text = cell_char(state, col, row).to_string();
            let (x, y) = screen_cell(state, col, row);
            surface.draw_text(x, y, &text, CellStyle::Text)?;
        }
        Ok(())
    }

    /// Bring the cursor into view and translate the resulting shift into
    /// damage. Horizontal blits are not available on a terminal surface,
    /// so any horizontal shift escalates to a full repaint (the heuristic
    /// permits that: a full repaint is always correct, only slower).
    fn sync_viewport(&mut self, state: &mut EditorState, surface: &mut dyn Surface) -> Result<()> {
        let shift = scroll_to_cursor(&mut state.view, state.cursor);
        if shift.is_zero() {
            return Ok(());
        }
        trace!(
            target: "render.scroll",
            dcols = shift.dcols,
            drows = shift.drows,
            "viewport shifted"
        );
        let view = state.view;
        if shift.dcols != 0 {
            state.damage.mark_full();
            return Ok(());
        }
        match policy_for(shift.drows, view.rows) {
            ScrollPolicy::Keep => {}
            ScrollPolicy::Repaint => state.damage.mark_full(),
            ScrollPolicy::Blit(rows) => {
                if surface.scroll_rows(rows as i32)? {
                    // Only the strip the shift revealed needs glyphs; the
                    // blit also moved the status row, repainted below.
                    let strip = rows.unsigned_abs();
                    let first = if rows > 0 {
                        view.origin_row + view.rows - strip
                    } else {
                        view.origin_row
                    };
                    state.damage.mark(DamageRect::new(0, first, usize::MAX, strip));
                } else {
                    state.damage.mark_full();
                }
            }
        }
        Ok(())
    }

    /// Repaint a document-space rectangle clipped to the viewport. Rows
    /// beyond the virtual end-of-text line blank out; the sentinel line
    /// itself is synthesized, never read from the document.
    fn paint_region(
        &self,
        state: &EditorState,
        surface: &mut dyn Surface,
        rect: DamageRect,
    ) -> Result<()> {
        let view = state.view;
        let x0 = rect.col.max(view.origin_col);
        let y0 = rect.row.max(view.origin_row);
        let x1 = rect
            .col
            .saturating_add(rect.cols)
            .min(view.origin_col + view.cols);
        let y1 = rect
            .row
            .saturating_add(rect.rows)
            .min(view.origin_row + view.rows);
        if x1 <= x0 || y1 <= y0 {
            return Ok(());
        }
        let width = x1 - x0;
        for row in y0..y1 {
            let mut text = match row_text(state, row) {
                Some(content) => {
                    let mut t = String::with_capacity(width);
                    t.extend(content.chars().skip(x0).take(width));
                    t
                }
                None => String::new(),
            };
            while text.chars().count() < width {
                text.push(' ');
            }
            let (x, y) = screen_cell(state, x0, row);
            surface.draw_text(x, y, &text, CellStyle::Text)?;
        }
        Ok(())
    }

    fn paint_status(&self, state: &EditorState, surface: &mut dyn Surface) -> Result<()> {
        let text = format_status(state, state.view.cols);
        surface.draw_text(0, 0, &text, CellStyle::Status)
    }

    /// Draw the cursor cell in inverse video. Hidden while unfocused or
    /// mid-command, and when the cursor sits outside the viewport.
    fn paint_cursor(&mut self, state: &EditorState, surface: &mut dyn Surface) -> Result<()> {
        let cursor = state.cursor;
        if !state.focused
            || state.input_disabled
            || !state.view.contains(cursor.col, cursor.row)
        {
            return Ok(());
        }
        let text = cell_char(state, cursor.col, cursor.row).to_string();
        let (x, y) = screen_cell(state, cursor.col, cursor.row);
        surface.draw_text(x, y, &text, CellStyle::Cursor)?;
        self.last_cursor = Some((cursor.col, cursor.row));
        Ok(())
    }
}

/// Display content of a document row: stored line, synthesized sentinel,
/// or nothing past the end.
fn row_text(state: &EditorState, row: usize) -> Option<&str> {
    if row < state.doc.len() {
        state.doc.line(row).map(|l| l.as_str())
    } else if row == state.doc.len() {
        Some(END_OF_TEXT)
    } else {
        None
    }
}

/// Character shown in a single cell (space when past the line end).
fn cell_char(state: &EditorState, col: usize, row: usize) -> char {
    row_text(state, row)
        .and_then(|t| t.chars().nth(col))
        .unwrap_or(' ')
}

/// Map a document cell to surface coordinates. The caller guarantees the
/// cell is inside the viewport.
fn screen_cell(state: &EditorState, col: usize, row: usize) -> (u16, u16) {
    let view = state.view;
    (
        (col - view.origin_col) as u16,
        (row - view.origin_row + STATUS_ROWS) as u16,
    )
}
