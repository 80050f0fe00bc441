//! Word motion helpers over a single line.
//!
//! These operate on a `&str` + byte offset pair and are free of editor state. Offsets are
//! always grapheme boundaries.

use crate::grapheme;
use unicode_segmentation::UnicodeSegmentation;

/// Start of the whitespace-delimited word before `byte` (unix-word-rubout semantics:
/// trailing whitespace is skipped first, then the word).
pub fn word_start_before(line: &str, byte: usize) -> usize {
    let byte = byte.min(line.len());
    let mut start = byte;
    let mut seen_word = false;
    for (idx, g) in line[..byte].grapheme_indices(true).rev() {
        let blank = g.chars().all(char::is_whitespace);
        if blank && seen_word {
            break;
        }
        seen_word |= !blank;
        start = idx;
    }
    start
}

/// End of the alphanumeric word at or after `byte`.
pub fn word_end_after(line: &str, byte: usize) -> usize {
    let mut pos = byte.min(line.len());
    let mut seen_word = false;
    while pos < line.len() {
        let next = grapheme::next_boundary(line, pos);
        let is_word = grapheme::is_word(&line[pos..next]);
        if !is_word && seen_word {
            break;
        }
        seen_word |= is_word;
        pos = next;
    }
    pos
}
