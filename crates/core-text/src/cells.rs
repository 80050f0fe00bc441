//! Character-cell layout of one logical line.
//!
//! A line is laid out left to right as a sequence of [`Cell`]s. Tabs advance to the next
//! multiple of [`TAB_STOP`] (relative to the start of the text, not the screen), control
//! characters below 0x20 and DEL are shown in caret form (`^@`, `^A`, ..., `^?`) and take two
//! columns, everything else uses the grapheme width engine.

use crate::segment::segment;
use std::fmt::Write as _;

pub const TAB_STOP: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind<'a> {
    Text(&'a str),
    /// Tab expanded to this many spaces.
    Tab(usize),
    /// Control character rendered as `^` + caret letter.
    Control(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell<'a> {
    /// Byte offset of the grapheme inside the line.
    pub byte: usize,
    /// Column (cells from the text start) at which the cell begins.
    pub col: usize,
    pub width: usize,
    pub kind: CellKind<'a>,
}

impl Cell<'_> {
    /// Append the visible form of this cell.
    pub fn push_to(&self, out: &mut String) {
        match self.kind {
            CellKind::Text(s) => out.push_str(s),
            CellKind::Tab(n) => out.extend(std::iter::repeat_n(' ', n)),
            CellKind::Control(c) => {
                let _ = write!(out, "^{}", caret_letter(c));
            }
        }
    }
}

fn caret_letter(c: char) -> char {
    match c {
        '\u{7F}' => '?',
        c => char::from_u32(c as u32 + 0x40).unwrap_or('?'),
    }
}

fn as_control(g: &str) -> Option<char> {
    let mut chars = g.chars();
    let c = chars.next()?;
    (chars.next().is_none() && c != '\t' && ((c as u32) < 0x20 || c == '\u{7F}')).then_some(c)
}

/// Lay out `line` into cells.
pub fn cells(line: &str) -> impl Iterator<Item = Cell<'_>> + '_ {
    let mut col = 0usize;
    segment(line).map(move |seg| {
        let (kind, width) = if seg.cluster == "\t" {
            let n = TAB_STOP - col % TAB_STOP;
            (CellKind::Tab(n), n)
        } else if let Some(c) = as_control(seg.cluster) {
            (CellKind::Control(c), 2)
        } else {
            (CellKind::Text(seg.cluster), seg.width as usize)
        };
        let cell = Cell {
            byte: seg.start,
            col,
            width,
            kind,
        };
        col += width;
        cell
    })
}

/// Total rendered width of `line`.
pub fn line_width(line: &str) -> usize {
    cells(line).map(|c| c.width).sum()
}

/// Column at which the grapheme starting at `byte` is drawn (`line_width` at the end).
pub fn column_at(line: &str, byte: usize) -> usize {
    cells(line)
        .take_while(|c| c.byte < byte)
        .map(|c| c.width)
        .sum()
}

/// Printable width of a prompt, ignoring ANSI escape sequences.
pub fn prompt_width(prompt: &str) -> usize {
    line_width(&strip_ansi_escapes::strip_str(prompt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rendered(line: &str) -> String {
        let mut out = String::new();
        for c in cells(line) {
            c.push_to(&mut out);
        }
        out
    }

    #[test]
    fn tabs_round_to_four_columns() {
        assert_eq!(rendered("a\tb"), "a   b");
        assert_eq!(rendered("abcd\tx"), "abcd    x");
        assert_eq!(line_width("ab\t"), 4);
    }

    #[test]
    fn control_chars_use_caret_form() {
        assert_eq!(rendered("a\u{1}b"), "a^Ab");
        assert_eq!(rendered("\u{0}"), "^@");
        assert_eq!(rendered("\u{7F}"), "^?");
        assert_eq!(line_width("a\u{1}b"), 4);
    }

    #[test]
    fn columns_account_for_wide_chars() {
        let line = "漢a";
        assert_eq!(column_at(line, 0), 0);
        assert_eq!(column_at(line, "漢".len()), 2);
        assert_eq!(column_at(line, line.len()), 3);
    }

    #[test]
    fn prompt_width_ignores_sgr() {
        assert_eq!(prompt_width("\u{1B}[32m[1] \u{1B}[0m"), 4);
        assert_eq!(prompt_width("\u{1B}]0;title\u{07}> "), 2);
    }
}
