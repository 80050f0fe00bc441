//! Multi-line session state: the ordered lines being composed and the current-line index,
//! plus the history store contract and the history navigator.
//!
//! Line model:
//! - `lines` never contains line-break characters; the visual order is the index order.
//! - `cursor_line` may equal `lines.len()`, meaning "a line that is being typed but has not
//!   been stored yet". [`Session::sync`] materializes it.
//! - Every structural mutation (split, join, move, paste) takes the text of the line the
//!   single-line editor just returned and syncs it first, so the in-flight edit is never lost.
//!
//! The viewport (first visible line) is owned by the renderer; this crate is terminal-free.

pub mod history;
pub mod navigator;

pub use history::{History, MemoryHistory};
pub use navigator::{Direction, HistoryNav};

use tracing::trace;

/// Where the single-line editor should put its cursor when it re-enters a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Start,
    End,
    /// Byte offset into the line (always a grapheme boundary).
    Byte(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    lines: Vec<String>,
    cursor_line: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every line and put the cursor on `cursor_line` (clamped to the last line).
    pub fn replace(&mut self, lines: Vec<String>, cursor_line: usize) {
        self.lines = lines;
        self.cursor_line = cursor_line.min(self.lines.len().saturating_sub(1));
        trace!(target: "editor.session", lines = self.lines.len(), cursor_line = self.cursor_line, "replace");
    }

    /// Replace with the lines of a multi-line `text` (split on `\n`).
    pub fn replace_text(&mut self, text: &str, cursor_line: usize) {
        self.replace(split_lines(text), cursor_line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True when every line is empty (or there are none).
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(String::is_empty)
    }

    /// Text of the current line ("" for the not-yet-stored line).
    pub fn current(&self) -> &str {
        self.lines
            .get(self.cursor_line)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// All lines joined with `\n`.
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }

    /// Store `text` as the current line, appending when the cursor is past the last line.
    pub fn sync(&mut self, text: &str) {
        if self.cursor_line >= self.lines.len() {
            self.lines.push(text.to_string());
            self.cursor_line = self.lines.len() - 1;
        } else if self.lines[self.cursor_line] != text {
            self.lines[self.cursor_line] = text.to_string();
        }
    }

    /// Split the current line at byte `at`; the cursor moves to column 0 of the new line.
    pub fn split_line(&mut self, text: &str, at: usize) {
        let at = floor_char_boundary(text, at);
        let (left, right) = text.split_at(at);
        self.sync(left);
        self.lines.insert(self.cursor_line + 1, right.to_string());
        self.cursor_line += 1;
        trace!(target: "editor.session", cursor_line = self.cursor_line, "split_line");
    }

    /// Append the current line to the one above. Returns the byte column of the seam, or
    /// `None` on the first line.
    pub fn join_above(&mut self, text: &str) -> Option<usize> {
        self.sync(text);
        if self.cursor_line == 0 {
            return None;
        }
        let current = self.lines.remove(self.cursor_line);
        self.cursor_line -= 1;
        let above = &mut self.lines[self.cursor_line];
        let seam = above.len();
        above.push_str(&current);
        trace!(target: "editor.session", cursor_line = self.cursor_line, "join_above");
        Some(seam)
    }

    /// Pull the next line onto the end of the current one. Returns the byte column of the
    /// seam, or `None` on the last line.
    pub fn join_below(&mut self, text: &str) -> Option<usize> {
        self.sync(text);
        if self.cursor_line + 1 >= self.lines.len() {
            return None;
        }
        let below = self.lines.remove(self.cursor_line + 1);
        let current = &mut self.lines[self.cursor_line];
        let seam = current.len();
        current.push_str(&below);
        trace!(target: "editor.session", cursor_line = self.cursor_line, "join_below");
        Some(seam)
    }

    /// Move to the previous line. Returns false on the first line.
    pub fn move_up(&mut self, text: &str) -> bool {
        self.sync(text);
        if self.cursor_line == 0 {
            return false;
        }
        self.cursor_line -= 1;
        true
    }

    /// Move to the next line. Returns false on the last line.
    pub fn move_down(&mut self, text: &str) -> bool {
        self.sync(text);
        if self.cursor_line + 1 >= self.lines.len() {
            return false;
        }
        self.cursor_line += 1;
        true
    }

    /// Insert possibly multi-line `pasted` into the current line at byte `at`.
    ///
    /// The first pasted line is appended to the text left of the cursor, middle lines become
    /// whole lines and the last pasted line is prepended to the text right of the cursor.
    /// Returns the byte column just after the inserted text on the (new) current line.
    pub fn paste(&mut self, text: &str, at: usize, pasted: &str) -> usize {
        let at = floor_char_boundary(text, at);
        let (left, right) = text.split_at(at);
        let mut pieces = pasted.split('\n');
        let first = pieces.next().unwrap_or("");
        let rest: Vec<&str> = pieces.collect();
        let Some((last, middle)) = rest.split_last() else {
            let mut line = String::with_capacity(text.len() + pasted.len());
            line.push_str(left);
            line.push_str(first);
            let col = line.len();
            line.push_str(right);
            self.sync(&line);
            return col;
        };
        self.sync(&format!("{left}{first}"));
        let mut index = self.cursor_line;
        for piece in middle {
            index += 1;
            self.lines.insert(index, (*piece).to_string());
        }
        index += 1;
        self.lines.insert(index, format!("{last}{right}"));
        self.cursor_line = index;
        trace!(target: "editor.session", added = rest.len(), cursor_line = index, "paste_lines");
        last.len()
    }
}

/// Split a multi-line record into lines (at least one, possibly empty).
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

fn floor_char_boundary(s: &str, mut at: usize) -> usize {
    if at >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(at) {
        at -= 1;
    }
    at
}
