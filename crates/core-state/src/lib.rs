//! Editor state: the document, cursor and viewport positions, and the
//! session flags the dispatcher and renderer coordinate through.
//!
//! The state machine is implicit in the flags. `input_disabled` brackets
//! command processing: it is raised before a command runs and cleared in
//! `finish_command`, and because event delivery is synchronous and
//! single-threaded it acts as a re-entrancy guard, not a lock. `changed`
//! and `saved` track the document against its file; a failed save leaves
//! both untouched and records a notice for the status line instead.
//!
//! Cursor coordinates are document cells. `cursor.row` ranges over
//! `[0, line_count]`; the top of that range is the virtual insertion
//! point after the last line, which the document never stores. The column
//! is clamped at zero but free to run past the line end; the gap becomes
//! real spaces only when a character is inserted there.

use core_text::{Document, TextError};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub mod damage;
pub use damage::{DamageRect, DamageTracker, TO_EDGE};

/// Name a document starts with before any path is assigned.
pub const UNNAMED_FILE: &str = "noname.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub col: usize,
    pub row: usize,
}

/// The visible window into the document: origin and size, both in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub origin_col: usize,
    pub origin_row: usize,
    pub cols: usize,
    pub rows: usize,
}

impl Viewport {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            origin_col: 0,
            origin_row: 0,
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    pub fn contains(&self, col: usize, row: usize) -> bool {
        col >= self.origin_col
            && col < self.origin_col + self.cols
            && row >= self.origin_row
            && row < self.origin_row + self.rows
    }

    /// Recompute the size after a surface resize; both extents stay >= 1.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
    }
}

#[derive(Debug)]
pub struct EditorState {
    pub doc: Document,
    pub cursor: Cursor,
    pub view: Viewport,
    pub changed: bool,
    pub saved: bool,
    pub input_disabled: bool,
    pub focused: bool,
    /// Status-line notice for the last I/O failure; cleared by the next
    /// successful save or load.
    pub notice: Option<String>,
    pub damage: DamageTracker,
    file_name: PathBuf,
    file_name_set: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
            cursor: Cursor::default(),
            view: Viewport::new(80, 24),
            changed: false,
            saved: false,
            input_disabled: false,
            focused: true,
            notice: None,
            damage: DamageTracker::new(),
            file_name: PathBuf::from(UNNAMED_FILE),
            file_name_set: false,
        }
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    pub fn set_file_name(&mut self, path: impl Into<PathBuf>) {
        self.file_name = path.into();
        self.file_name_set = true;
    }

    pub fn display_name(&self) -> Cow<'_, str> {
        self.file_name.to_string_lossy()
    }

    /// Replace the document with the file at `path`. The name sticks even
    /// when the load fails (the editor keeps editing toward that path);
    /// the failure is recorded for the status line.
    pub fn open(&mut self, path: &Path) -> Result<(), TextError> {
        self.set_file_name(path);
        match self.doc.load(path) {
            Ok(()) => {
                self.changed = false;
                self.saved = false;
                self.notice = None;
                self.cursor = Cursor::default();
                Ok(())
            }
            Err(err) => {
                warn!(target: "text.io", error = %err, "open failed");
                self.notice = Some(format!("cannot open {}", self.display_name()));
                Err(err)
            }
        }
    }

    /// Write the document to its file. Flags move only on success; a
    /// failure leaves `changed` set and surfaces a notice (the original
    /// editor failed silently here).
    pub fn save_file(&mut self) -> Result<(), TextError> {
        match self.doc.save(&self.file_name) {
            Ok(()) => {
                self.changed = false;
                self.saved = true;
                self.notice = None;
                Ok(())
            }
            Err(err) => {
                warn!(target: "text.io", error = %err, "save failed");
                self.notice = Some(format!("cannot save {}", self.display_name()));
                Err(err)
            }
        }
    }

    /// Enter the command-processing bracket: input is ignored and the
    /// cursor glyph is hidden until `finish_command`.
    pub fn begin_command(&mut self) {
        self.input_disabled = true;
    }

    /// Leave the command-processing bracket: propagate `changed` into
    /// `saved`, park the document cursor at the edit row, re-enable input.
    pub fn finish_command(&mut self) {
        if self.changed {
            self.saved = false;
        }
        let row = self.cursor.row.min(self.doc.len());
        self.doc.seek(row);
        self.input_disabled = false;
        debug!(
            target: "dispatch",
            col = self.cursor.col,
            row = self.cursor.row,
            changed = self.changed,
            "command finished"
        );
    }

    /// Keep the cursor row inside `[0, line_count]`. The column is never
    /// clamped downward to the line: columns past the end are legal.
    pub fn clamp_cursor_row(&mut self) {
        let max = self.doc.len();
        if self.cursor.row > max {
            self.cursor.row = max;
        }
    }

    /// Cell length of the line under the cursor; zero on the virtual
    /// end-of-text row.
    pub fn current_line_len(&self) -> usize {
        self.doc.line(self.cursor.row).map_or(0, |l| l.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Line;

    #[test]
    fn new_state_is_clean_and_unnamed() {
        let state = EditorState::new();
        assert!(!state.changed);
        assert!(!state.saved);
        assert!(!state.input_disabled);
        assert!(state.focused);
        assert_eq!(state.display_name(), UNNAMED_FILE);
    }

    #[test]
    fn command_bracket_toggles_input() {
        let mut state = EditorState::new();
        state.begin_command();
        assert!(state.input_disabled);
        state.changed = true;
        state.saved = true;
        state.finish_command();
        assert!(!state.input_disabled);
        assert!(!state.saved, "changed text is not saved text");
    }

    #[test]
    fn clamp_cursor_row_allows_virtual_end() {
        let mut state = EditorState::new();
        state.doc.push_line(Line::from("a"));
        state.doc.push_line(Line::from("b"));
        state.cursor.row = 99;
        state.clamp_cursor_row();
        assert_eq!(state.cursor.row, 2);
    }

    #[test]
    fn save_failure_keeps_changed_and_sets_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = EditorState::new();
        state.doc.push_line(Line::from("x"));
        state.changed = true;
        state.set_file_name(dir.path().join("no-such-dir").join("f.txt"));
        assert!(state.save_file().is_err());
        assert!(state.changed);
        assert!(!state.saved);
        assert!(state.notice.is_some());
    }

    #[test]
    fn save_success_flips_flags_and_clears_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = EditorState::new();
        state.doc.push_line(Line::from("x"));
        state.changed = true;
        state.notice = Some("old".into());
        state.set_file_name(dir.path().join("f.txt"));
        state.save_file().unwrap();
        assert!(!state.changed);
        assert!(state.saved);
        assert!(state.notice.is_none());
    }

    #[test]
    fn open_failure_keeps_name_and_sets_notice() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.txt");
        let mut state = EditorState::new();
        assert!(state.open(&missing).is_err());
        assert_eq!(state.file_name(), missing.as_path());
        assert!(state.notice.is_some());
        assert_eq!(state.doc.len(), 0);
    }

    #[test]
    fn viewport_contains_and_resize_floor() {
        let mut view = Viewport::new(10, 5);
        assert!(view.contains(0, 0));
        assert!(view.contains(9, 4));
        assert!(!view.contains(10, 0));
        view.resize(0, 0);
        assert_eq!((view.cols, view.rows), (1, 1));
    }
}
