//! Quote- and delimiter-aware field splitting used by completion.
//!
//! Quoting is a bitmask with one bit per character of `quotes`: meeting the quote at index
//! `j` toggles bit `j`. Whitespace and delimiters only split while the mask is zero, so an
//! unterminated quote of any kind suppresses splitting for the rest of the input. Quote
//! characters are stripped from every emitted field.

const SPACES: &[char] = &[' ', '\t', '\r', '\n', '\u{0B}', '\u{0C}'];

fn is_space(c: char) -> bool {
    SPACES.contains(&c)
}

/// One bit per quote character, growing past 64 quotes instead of wrapping.
#[derive(Debug, Default)]
struct QuoteMask {
    words: Vec<u64>,
}

impl QuoteMask {
    fn toggle(&mut self, j: usize) {
        let word = j / 64;
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        self.words[word] ^= 1 << (j % 64);
    }

    fn is_clear(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }
}

fn quote_index(quotes: &str, c: char) -> Option<usize> {
    quotes.chars().position(|q| q == c)
}

fn strip_quotes(s: &str, quotes: &str) -> String {
    s.chars().filter(|c| !quotes.contains(*c)).collect()
}

/// Split `line` into fields.
///
/// A delimiter becomes its own one-character field. The text before a delimiter is always
/// emitted, so a delimiter right after whitespace yields an empty field first.
pub fn tokenize(line: &str, quotes: &str, delimiters: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut rest = line;
    loop {
        rest = rest.trim_start_matches(is_space);
        if rest.is_empty() {
            break;
        }
        let mut mask = QuoteMask::default();
        // (end of field, start of remainder, delimiter)
        let mut split = None;
        for (i, c) in rest.char_indices() {
            if let Some(j) = quote_index(quotes, c) {
                mask.toggle(j);
            } else if mask.is_clear() && is_space(c) {
                split = Some((i, i, None));
                break;
            } else if mask.is_clear() && delimiters.contains(c) {
                split = Some((i, i + c.len_utf8(), Some(c)));
                break;
            }
        }
        let Some((end, next, delimiter)) = split else {
            fields.push(strip_quotes(rest, quotes));
            break;
        };
        fields.push(strip_quotes(&rest[..end], quotes));
        if let Some(d) = delimiter {
            fields.push(d.to_string());
        }
        rest = &rest[next..];
    }
    fields
}

/// Byte offset where the field under the cursor begins.
///
/// `before_cursor` is the current line up to the cursor; the field starts after the last
/// whitespace or delimiter seen while no quote is open.
pub fn current_field_start(before_cursor: &str, quotes: &str, delimiters: &str) -> usize {
    let mut mask = QuoteMask::default();
    let mut start = 0usize;
    for (i, c) in before_cursor.char_indices() {
        if let Some(j) = quote_index(quotes, c) {
            mask.toggle(j);
        } else if mask.is_clear() && (is_space(c) || delimiters.contains(c)) {
            start = i + c.len_utf8();
        }
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_on_whitespace_runs() {
        assert_eq!(
            tokenize("aaa bbb ccc", "\"", ""),
            vec!["aaa", "bbb", "ccc"]
        );
        assert_eq!(tokenize("  aaa \t bbb  ", "\"", ""), vec!["aaa", "bbb"]);
    }

    #[test]
    fn quotes_protect_spaces_and_are_stripped() {
        assert_eq!(
            tokenize(r#"aaa "b b " ccc"#, "\"", ""),
            vec!["aaa", "b b ", "ccc"]
        );
        assert_eq!(tokenize(r#"x"y z"w"#, "\"", ""), vec!["xy zw"]);
    }

    #[test]
    fn delimiter_is_its_own_field() {
        assert_eq!(tokenize("aaa&ccc", "\"", "&"), vec!["aaa", "&", "ccc"]);
        assert_eq!(tokenize("aaa&", "\"", "&"), vec!["aaa", "&"]);
    }

    #[test]
    fn delimiter_after_space_emits_empty_field() {
        assert_eq!(tokenize("a &b", "\"", "&"), vec!["a", "", "&", "b"]);
    }

    #[test]
    fn quote_bits_are_independent() {
        // The single quote opens inside the double-quoted span and is never closed, so the
        // mask stays non-zero after the closing double quote.
        assert_eq!(
            tokenize(r#""it's" a&b"#, "\"'", "&"),
            vec!["its a&b"]
        );
    }

    #[test]
    fn distant_quotes_keep_separate_bits() {
        let quotes: String = (0..70).filter_map(|i| char::from_u32(0x100 + i)).collect();
        // quotes 0 and 64 are both left open, so nothing splits
        assert_eq!(tokenize("\u{100}a \u{140}b c", &quotes, ""), vec!["a b c"]);
        assert_eq!(current_field_start("\u{100}a \u{140}b c", &quotes, ""), 0);
    }

    #[test]
    fn field_start_respects_quotes() {
        assert_eq!(current_field_start("select fo", "\"", ""), 7);
        assert_eq!(current_field_start(r#"open "my fi"#, "\"", ""), 5);
        assert_eq!(current_field_start("a&b", "\"", "&"), 2);
        assert_eq!(current_field_start("", "\"", ""), 0);
    }
}
