//! Incremental-search status line.
//!
//! Format: `(i-search)[<query>]:<found>`. Line breaks inside a multi-line match are shown as
//! [`NEWLINE_MARK`] so the status always occupies one row, and the text is cut before the
//! last column so the terminal never wraps it.

use core_text::cells::cells;

/// Stand-in for `\n` inside a displayed match.
pub const NEWLINE_MARK: &str = "\u{21B2} ";

pub fn search_status(query: &str, found: &str, width: usize) -> String {
    let raw = format!("(i-search)[{query}]:{}", found.replace('\n', NEWLINE_MARK));
    let mut out = String::with_capacity(raw.len());
    for cell in cells(&raw) {
        if cell.col + cell.width >= width {
            break;
        }
        cell.push_to(&mut out);
    }
    out
}
