//! Cursor-tracked document storage.
//!
//! Lines are linked into a ring through an index arena. Index `HEAD` is the
//! sentinel that closes the ring; it never carries content. A single movable
//! cursor sits between two lines: `cursor` is the arena index of the node
//! just after it, `cursor_pos` the number of lines before it. Sequential
//! access near the last edit is O(1); `seek` to an arbitrary row costs
//! O(distance from the cursor). Node linkage is never exposed; callers see
//! row indices only.
//!
//! Row `line_count` is the virtual end-of-text position used by editors for
//! the cursor; it is never stored here.

use crate::{Line, TextError};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

const HEAD: usize = 0;
const READ_CHUNK: usize = 512;

pub const DEFAULT_TAB_WIDTH: usize = 8;

#[derive(Debug)]
struct Node {
    line: Line,
    prev: usize,
    next: usize,
}

/// An ordered sequence of [`Line`]s, indexed `0..len`, with a movable
/// internal cursor and a flat-file load/save round trip.
#[derive(Debug)]
pub struct Document {
    arena: Vec<Node>,
    free: Vec<usize>,
    cursor: usize,
    cursor_pos: usize,
    len: usize,
    tab_width: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_tab_width(DEFAULT_TAB_WIDTH)
    }

    pub fn with_tab_width(tab_width: usize) -> Self {
        Self {
            arena: vec![Node {
                line: Line::default(),
                prev: HEAD,
                next: HEAD,
            }],
            free: Vec::new(),
            cursor: HEAD,
            cursor_pos: 0,
            len: 0,
            tab_width: tab_width.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, tab_width: usize) {
        self.tab_width = tab_width.max(1);
    }

    /// Number of lines before the internal cursor.
    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.arena.push(Node {
            line: Line::default(),
            prev: HEAD,
            next: HEAD,
        });
        self.free.clear();
        self.cursor = HEAD;
        self.cursor_pos = 0;
        self.len = 0;
    }

    /// Move the cursor so `row` lines lie before it, clamped to the
    /// document. Returns the position actually reached.
    pub fn seek(&mut self, row: usize) -> usize {
        while self.cursor_pos > row && !self.at_start() {
            self.cursor = self.arena[self.cursor].prev;
            self.cursor_pos -= 1;
        }
        while self.cursor_pos < row && !self.at_end() {
            self.cursor = self.arena[self.cursor].next;
            self.cursor_pos += 1;
        }
        self.cursor_pos
    }

    /// Borrow the line at `row` without moving the cursor. The walk starts
    /// from the cursor, so nearby rows are cheap.
    pub fn line(&self, row: usize) -> Option<&Line> {
        if row >= self.len {
            return None;
        }
        let mut pos = self.cursor_pos;
        let mut idx = self.cursor;
        if row < pos {
            while pos != row {
                idx = self.arena[idx].prev;
                pos -= 1;
            }
        } else {
            while pos != row {
                idx = self.arena[idx].next;
                pos += 1;
            }
        }
        Some(&self.arena[idx].line)
    }

    /// Mutably borrow the line at `row`, parking the cursor there.
    pub fn line_mut(&mut self, row: usize) -> Option<&mut Line> {
        if row >= self.len {
            return None;
        }
        self.seek(row);
        Some(&mut self.arena[self.cursor].line)
    }

    /// Splice `line` in at index `row` (the old occupant shifts down); the
    /// cursor ends up just past the new line.
    pub fn insert_before(&mut self, row: usize, line: Line) {
        self.seek(row);
        let idx = self.alloc(line);
        let before = self.arena[self.cursor].prev;
        self.link(before, idx);
        self.link(idx, self.cursor);
        self.len += 1;
        self.cursor_pos += 1;
    }

    /// Splice `line` in at index `row` (the old occupant shifts down); the
    /// cursor ends up on the new line.
    pub fn insert_after(&mut self, row: usize, line: Line) {
        self.insert_before(row, line);
        self.cursor = self.arena[self.cursor].prev;
        self.cursor_pos -= 1;
    }

    /// Remove and return the line at `row`; the cursor is left where the
    /// removed line was. `None` when `row` is out of range.
    pub fn remove_line(&mut self, row: usize) -> Option<Line> {
        if row >= self.len {
            return None;
        }
        self.seek(row);
        let idx = self.cursor;
        let prev = self.arena[idx].prev;
        let next = self.arena[idx].next;
        self.link(prev, next);
        self.cursor = next;
        self.len -= 1;
        let line = std::mem::take(&mut self.arena[idx].line);
        self.free.push(idx);
        Some(line)
    }

    /// Append a line at the end of the document.
    pub fn push_line(&mut self, line: Line) {
        self.insert_before(self.len, line);
    }

    pub fn iter(&self) -> Lines<'_> {
        Lines {
            doc: self,
            idx: self.arena[HEAD].next,
        }
    }

    /// Replace the content with the file at `path`.
    ///
    /// The file is streamed in fixed-size chunks and split on `'\n'`. Tabs
    /// expand to spaces up to the next multiple of the tab width, `"\r\n"`
    /// collapses to a plain line break (a CR not followed by LF is kept),
    /// and each produced line is trimmed of trailing whitespace. A final
    /// fragment with no newline still becomes a line; an empty file yields
    /// zero lines. Invalid UTF-8 is replaced, not rejected.
    pub fn load(&mut self, path: &Path) -> Result<(), TextError> {
        self.clear();
        let mut file = File::open(path).map_err(|e| io_error("open", path, e))?;
        let mut chunk = [0u8; READ_CHUNK];
        let mut pending: Vec<u8> = Vec::with_capacity(READ_CHUNK);
        let mut col = 0usize;
        let mut prev_cr = false;
        loop {
            let n = file
                .read(&mut chunk)
                .map_err(|e| io_error("read", path, e))?;
            if n == 0 {
                break;
            }
            for &byte in &chunk[..n] {
                if byte == b'\n' {
                    self.finish_line(&mut pending);
                    col = 0;
                    prev_cr = false;
                    continue;
                }
                if prev_cr {
                    // The CR was not part of a CRLF pair; keep it.
                    pending.push(b'\r');
                    col += 1;
                }
                if byte == b'\t' {
                    let spaces = self.tab_width - col % self.tab_width;
                    pending.extend(std::iter::repeat_n(b' ', spaces));
                    col += spaces;
                } else if byte != b'\r' {
                    pending.push(byte);
                    col += 1;
                }
                prev_cr = byte == b'\r';
            }
        }
        if !pending.is_empty() {
            self.finish_line(&mut pending);
        }
        debug!(target: "text.io", path = %path.display(), lines = self.len, "loaded");
        Ok(())
    }

    /// Write every line followed by exactly one `'\n'`. A failed write
    /// surfaces as an error; whatever was already flushed stays on disk.
    pub fn save(&self, path: &Path) -> Result<(), TextError> {
        let file = File::create(path).map_err(|e| io_error("create", path, e))?;
        let mut out = BufWriter::new(file);
        for line in self.iter() {
            out.write_all(line.as_str().as_bytes())
                .map_err(|e| io_error("write", path, e))?;
            out.write_all(b"\n").map_err(|e| io_error("write", path, e))?;
        }
        out.flush().map_err(|e| io_error("write", path, e))?;
        debug!(target: "text.io", path = %path.display(), lines = self.len, "saved");
        Ok(())
    }

    fn finish_line(&mut self, pending: &mut Vec<u8>) {
        let mut line = Line::from(String::from_utf8_lossy(pending).as_ref());
        line.trim_trailing();
        self.push_line(line);
        pending.clear();
    }

    fn at_start(&self) -> bool {
        self.arena[self.cursor].prev == HEAD
    }

    fn at_end(&self) -> bool {
        self.cursor == HEAD
    }

    fn alloc(&mut self, line: Line) -> usize {
        if let Some(idx) = self.free.pop() {
            self.arena[idx].line = line;
            idx
        } else {
            self.arena.push(Node {
                line,
                prev: HEAD,
                next: HEAD,
            });
            self.arena.len() - 1
        }
    }

    fn link(&mut self, from: usize, to: usize) {
        self.arena[from].next = to;
        self.arena[to].prev = from;
    }
}

fn io_error(op: &'static str, path: &Path, source: std::io::Error) -> TextError {
    TextError::Io {
        op,
        path: path.to_path_buf(),
        source,
    }
}

pub struct Lines<'a> {
    doc: &'a Document,
    idx: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a Line;

    fn next(&mut self) -> Option<&'a Line> {
        if self.idx == HEAD {
            return None;
        }
        let node = &self.doc.arena[self.idx];
        self.idx = node.next;
        Some(&node.line)
    }
}
