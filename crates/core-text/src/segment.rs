//! Normalization + segmentation adapter.
//!
//! Contract:
//! - `segment` splits a line into grapheme clusters with byte ranges and cell widths.
//! - `normalize_paste` prepares externally supplied text (bracketed paste, clipboard) for
//!   insertion: NFC, and every CRLF / lone CR folded into LF.
//! - Does not log content; callers log lengths only.

use crate::egc_width;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub cluster: &'a str,
    pub start: usize, // byte offset (inclusive)
    pub end: usize,   // byte offset (exclusive)
    pub width: u16,   // terminal cell width
}

/// Segment `line` into grapheme clusters with widths and byte ranges.
pub fn segment(line: &str) -> impl Iterator<Item = Segment<'_>> + '_ {
    line.grapheme_indices(true).map(|(start, g)| Segment {
        cluster: g,
        start,
        end: start + g.len(),
        width: egc_width(g),
    })
}

/// NFC-normalize pasted text and unify line breaks to `\n`.
pub fn normalize_paste(input: &str) -> String {
    let unified = input.replace("\r\n", "\n").replace('\r', "\n");
    unified.nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn segments_cover_line_in_order() {
        let s = "漢😀e\u{0301}a";
        let segs: Vec<_> = segment(s).collect();
        assert_eq!(segs.len(), 4);
        let mut prev_end = 0;
        for seg in &segs {
            assert_eq!(seg.start, prev_end);
            prev_end = seg.end;
        }
        assert_eq!(prev_end, s.len());
        assert_eq!(segs[0].width, 2);
        assert_eq!(segs[2].cluster, "e\u{0301}");
    }

    #[test]
    fn paste_line_breaks_are_unified() {
        assert_eq!(normalize_paste("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn paste_is_nfc() {
        assert_eq!(normalize_paste("e\u{0301}"), "\u{00E9}");
    }
}
