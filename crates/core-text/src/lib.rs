//! Text primitives for Stanza: the single-line edit buffer, grapheme/width helpers,
//! character-cell layout, paste normalization and the completion field tokenizer.

pub mod cells;
pub mod fields;
pub mod motion;
pub mod segment;
pub mod width;

pub use width::egc_width;

/// Single-line edit buffer with a grapheme-aligned cursor.
///
/// The cursor is stored as a byte offset that always sits on a grapheme boundary; callers
/// that speak in "character units" use [`LineBuffer::cursor`] / [`LineBuffer::set_cursor`],
/// which count grapheme clusters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
    cursor: usize,
}

impl LineBuffer {
    /// Buffer holding `text` with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    /// Buffer holding `text` with the cursor on grapheme `col` (clamped).
    pub fn with_cursor(text: impl Into<String>, col: usize) -> Self {
        let mut b = Self::new(text);
        b.set_cursor(col);
        b
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset of the cursor.
    pub fn cursor_byte(&self) -> usize {
        self.cursor
    }

    /// Cursor position in grapheme clusters.
    pub fn cursor(&self) -> usize {
        grapheme::count(&self.text[..self.cursor])
    }

    /// Number of grapheme clusters in the line.
    pub fn len(&self) -> usize {
        grapheme::count(&self.text)
    }

    pub fn set_cursor(&mut self, col: usize) {
        self.cursor = grapheme::byte_of(&self.text, col);
    }

    /// Place the cursor on the first grapheme boundary at or after `byte`.
    pub fn set_cursor_byte(&mut self, byte: usize) {
        self.cursor = grapheme::snap_forward(&self.text, byte);
    }

    pub fn at_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.text.len()
    }

    /// Text before and after the cursor.
    pub fn split(&self) -> (&str, &str) {
        self.text.split_at(self.cursor)
    }

    pub fn move_left(&mut self) -> bool {
        if self.at_start() {
            return false;
        }
        self.cursor = grapheme::prev_boundary(&self.text, self.cursor);
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.cursor = grapheme::next_boundary(&self.text, self.cursor);
        true
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn move_word_left(&mut self) {
        self.cursor = motion::word_start_before(&self.text, self.cursor);
    }

    pub fn move_word_right(&mut self) {
        self.cursor = motion::word_end_after(&self.text, self.cursor);
    }

    /// Insert `s` at the cursor and place the cursor after it.
    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor = grapheme::snap_forward(&self.text, self.cursor + s.len());
    }

    pub fn insert_char(&mut self, c: char) {
        let mut tmp = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut tmp));
    }

    /// Delete the grapheme before the cursor. Returns false at the start of the line.
    pub fn delete_before(&mut self) -> bool {
        if self.at_start() {
            return false;
        }
        let start = grapheme::prev_boundary(&self.text, self.cursor);
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
        true
    }

    /// Delete the grapheme under the cursor. Returns false at the end of the line.
    pub fn delete_at(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        let end = grapheme::next_boundary(&self.text, self.cursor);
        self.text.replace_range(self.cursor..end, "");
        true
    }

    /// Remove and return everything from the cursor to the end of the line.
    pub fn kill_to_end(&mut self) -> String {
        self.text.split_off(self.cursor)
    }

    /// Remove and return everything before the cursor.
    pub fn kill_to_start(&mut self) -> String {
        let killed: String = self.text.drain(..self.cursor).collect();
        self.cursor = 0;
        killed
    }

    /// Remove and return the word before the cursor (and any blanks after it).
    pub fn kill_word_before(&mut self) -> String {
        let start = motion::word_start_before(&self.text, self.cursor);
        let killed: String = self.text.drain(start..self.cursor).collect();
        self.cursor = start;
        killed
    }

    /// Replace the byte range `[start, cursor)` with `with` (completion insert).
    pub fn replace_before_cursor(&mut self, start: usize, with: &str) {
        let start = start.min(self.cursor);
        self.text.replace_range(start..self.cursor, with);
        self.cursor = grapheme::snap_forward(&self.text, start + with.len());
    }
}

/// Grapheme utilities. These are pure helpers operating on a single line.
pub mod grapheme {
    use unicode_segmentation::UnicodeSegmentation;

    /// Iterate grapheme clusters in a line.
    pub fn iter(line: &str) -> impl Iterator<Item = &str> {
        line.graphemes(true)
    }

    pub fn count(line: &str) -> usize {
        line.graphemes(true).count()
    }

    /// Byte offset of grapheme index `col` (the line length when past the end).
    pub fn byte_of(line: &str, col: usize) -> usize {
        line.grapheme_indices(true)
            .nth(col)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len())
    }

    /// Previous grapheme boundary (0 when already at or before the first boundary).
    pub fn prev_boundary(line: &str, byte: usize) -> usize {
        if byte == 0 || byte > line.len() {
            return 0;
        }
        line.grapheme_indices(true)
            .map(|(idx, _)| idx)
            .take_while(|idx| *idx < byte)
            .last()
            .unwrap_or(0)
    }

    /// Next grapheme boundary (`line.len()` at or beyond the end).
    pub fn next_boundary(line: &str, byte: usize) -> usize {
        line.grapheme_indices(true)
            .map(|(idx, _)| idx)
            .find(|idx| *idx > byte)
            .unwrap_or(line.len())
    }

    /// The smallest grapheme boundary at or after `byte`.
    pub fn snap_forward(line: &str, byte: usize) -> usize {
        if byte >= line.len() {
            return line.len();
        }
        line.grapheme_indices(true)
            .map(|(idx, _)| idx)
            .find(|idx| *idx >= byte)
            .unwrap_or(line.len())
    }

    /// Naive word classification: alphanumeric or underscore start.
    pub fn is_word(g: &str) -> bool {
        g.chars()
            .next()
            .map(|c| c == '_' || c.is_alphanumeric())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn grapheme_basic_emoji() {
        let s = "a😀b";
        let after_a = grapheme::next_boundary(s, 0);
        let after_emoji = grapheme::next_boundary(s, after_a);
        assert_eq!(after_emoji, 1 + "😀".len());
        assert_eq!(grapheme::prev_boundary(s, after_emoji), after_a);
    }

    #[test]
    fn grapheme_combining_mark_is_one_unit() {
        let s = "e\u{0301}";
        assert_eq!(grapheme::next_boundary(s, 0), s.len());
        assert_eq!(grapheme::count(s), 1);
    }

    #[test]
    fn cursor_counts_graphemes_not_bytes() {
        let mut b = LineBuffer::new("漢字");
        assert_eq!(b.cursor(), 2);
        assert_eq!(b.cursor_byte(), 6);
        b.move_left();
        assert_eq!(b.cursor(), 1);
        assert_eq!(b.cursor_byte(), 3);
    }

    #[test]
    fn insert_in_middle_advances_cursor() {
        let mut b = LineBuffer::with_cursor("abc", 1);
        b.insert_str("😀");
        assert_eq!(b.as_str(), "a😀bc");
        assert_eq!(b.cursor(), 2);
    }

    #[test]
    fn insert_combining_mark_merges_with_base() {
        let mut b = LineBuffer::with_cursor("eb", 1);
        b.insert_char('\u{0301}');
        assert_eq!(b.len(), 2);
        assert_eq!(b.cursor(), 1);
    }

    #[test]
    fn delete_before_and_at() {
        let mut b = LineBuffer::new("ab😀c");
        assert!(b.delete_before());
        assert!(b.delete_before());
        assert_eq!(b.as_str(), "ab");
        assert!(!b.delete_at());
        b.move_home();
        assert!(!b.delete_before());
        assert!(b.delete_at());
        assert_eq!(b.as_str(), "b");
    }

    #[test]
    fn kills_return_removed_text() {
        let mut b = LineBuffer::with_cursor("select foo bar", 7);
        assert_eq!(b.kill_to_end(), "foo bar");
        assert_eq!(b.kill_word_before(), "select ");
        assert!(b.is_empty());

        let mut b = LineBuffer::with_cursor("abc def", 4);
        assert_eq!(b.kill_to_start(), "abc ");
        assert_eq!(b.as_str(), "def");
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn replace_before_cursor_keeps_tail() {
        let mut b = LineBuffer::with_cursor("sel from", 3);
        b.replace_before_cursor(0, "SELECT ");
        assert_eq!(b.as_str(), "SELECT  from");
        assert_eq!(b.cursor_byte(), 7);
    }

    #[test]
    fn word_moves() {
        let mut b = LineBuffer::new("ab cd");
        b.move_word_left();
        assert_eq!(b.cursor(), 3);
        b.move_home();
        b.move_word_right();
        assert_eq!(b.cursor(), 2);
    }
}
