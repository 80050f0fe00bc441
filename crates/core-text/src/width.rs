//! Grapheme cluster display width.
//!
//! `egc_width` is the single authority for how many terminal cells one grapheme cluster
//! occupies. Every column computation in the editor (cursor placement, truncation at the
//! right margin, completion grid layout) funnels through it so the painter and the cursor
//! arithmetic never disagree.
//!
//! The classifier is heuristic and biased toward over-estimating emoji composites:
//! an extra blank cell is harmless, an under-estimate makes the cursor drift.

/// Semantic classification of a single grapheme cluster (EGC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EgcKind {
    Ascii,
    Narrow,
    Wide,
    /// Pictographic, flag, keycap, skin tone or ZWJ composite.
    Emoji,
    /// Base + combining mark(s); `true` when the base itself is wide.
    Combining(bool),
}

const ZWJ: char = '\u{200D}';
const KEYCAP_COMBINING: char = '\u{20E3}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_skin_tone_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

// Emoji blocks plus the misc symbols / dingbats ranges where legacy emoji live.
fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{1AB0}'..='\u{1AFF}').contains(&c)
        || ('\u{1DC0}'..='\u{1DFF}').contains(&c)
        || ('\u{20D0}'..='\u{20FF}').contains(&c)
        || ('\u{FE20}'..='\u{FE2F}').contains(&c)
}

fn char_is_wide(c: char) -> bool {
    unicode_width::UnicodeWidthChar::width(c).unwrap_or(1) == 2
}

fn classify(egc: &str) -> EgcKind {
    let mut chars = egc.chars();
    let Some(first) = chars.next() else {
        return EgcKind::Narrow;
    };
    if chars.next().is_none() {
        if first.is_ascii() {
            return EgcKind::Ascii;
        }
        if is_extended_pictographic(first) || is_regional_indicator(first) {
            return EgcKind::Emoji;
        }
        return if char_is_wide(first) {
            EgcKind::Wide
        } else {
            EgcKind::Narrow
        };
    }

    let mut pictographic = 0usize;
    let mut regional = 0usize;
    let mut has_zwj = false;
    let mut has_skin = false;
    let mut has_combining = false;
    let mut any_wide = false;
    let mut ends_with_keycap = false;
    for c in egc.chars() {
        if is_extended_pictographic(c) {
            pictographic += 1;
        }
        if is_regional_indicator(c) {
            regional += 1;
        }
        has_zwj |= c == ZWJ;
        has_skin |= is_skin_tone_modifier(c);
        has_combining |= is_combining_mark(c);
        any_wide |= char_is_wide(c);
        ends_with_keycap = c == KEYCAP_COMBINING;
    }

    let keycap_base = first.is_ascii_digit() || first == '#' || first == '*';
    if (ends_with_keycap && keycap_base)
        || regional == 2
        || (has_zwj && pictographic >= 2)
        || (pictographic >= 1 && has_skin)
        || pictographic >= 1
    {
        return EgcKind::Emoji;
    }
    if has_combining {
        let base_wide = is_extended_pictographic(first) || char_is_wide(first);
        return EgcKind::Combining(base_wide);
    }
    if any_wide {
        return EgcKind::Wide;
    }
    if regional > 0 {
        return EgcKind::Emoji;
    }
    EgcKind::Narrow
}

/// Return the display column width for a single grapheme cluster (EGC).
///
/// Precondition: `egc` is one grapheme cluster as produced by `unicode-segmentation`.
/// Empty input returns 0. Control characters are reported as width 1 here; the cell
/// renderer (`cells`) expands them to their two-column caret form.
#[inline]
pub fn egc_width(egc: &str) -> u16 {
    if egc.is_empty() {
        return 0;
    }
    match classify(egc) {
        EgcKind::Ascii | EgcKind::Narrow => 1,
        EgcKind::Wide | EgcKind::Emoji => 2,
        EgcKind::Combining(true) => 2,
        EgcKind::Combining(false) => 1,
    }
}
