//! Field-based completion.
//!
//! The candidate callback sees every field before the cursor: fields of the lines above the
//! current one, then the fields of the current line up to the cursor. The last field is the
//! word being completed (empty when the cursor follows whitespace or a delimiter).
//! Candidates are matched against that word case-insensitively:
//! * one match replaces the word, quoted with the first quote character when it contains
//!   whitespace or a delimiter, followed by the configured postfix;
//! * several matches extend the word to their longest common prefix and are listed.

use core_text::LineBuffer;
use core_text::fields::{current_field_start, tokenize};
use tracing::debug;

type Candidates = Box<dyn FnMut(&[String]) -> (Vec<String>, Vec<String>)>;

pub struct Completion {
    delimiters: String,
    quotes: String,
    postfix: String,
    candidates: Candidates,
}

impl Completion {
    /// `candidates(fields)` returns `(completion set, listing set)`; an empty listing set
    /// lists the matching completions instead.
    pub fn new(
        delimiters: impl Into<String>,
        quotes: impl Into<String>,
        postfix: impl Into<String>,
        candidates: impl FnMut(&[String]) -> (Vec<String>, Vec<String>) + 'static,
    ) -> Self {
        Self {
            delimiters: delimiters.into(),
            quotes: quotes.into(),
            postfix: postfix.into(),
            candidates: Box::new(candidates),
        }
    }

    /// Complete the word before the cursor. Returns the candidates to list, if any.
    pub(crate) fn complete(&mut self, lines_above: &[String], buf: &mut LineBuffer) -> Option<Vec<String>> {
        let (q, d) = (self.quotes.as_str(), self.delimiters.as_str());
        let before = buf.split().0;
        let mut fields: Vec<String> = lines_above.iter().flat_map(|l| tokenize(l, q, d)).collect();
        fields.extend(tokenize(before, q, d));
        let start = current_field_start(before, q, d);
        if start == before.len() {
            fields.push(String::new());
        }
        let word: String = before[start..].chars().filter(|c| !q.contains(*c)).collect();

        let (completions, listing) = (self.candidates)(&fields);
        let matches: Vec<String> = completions
            .into_iter()
            .filter(|c| starts_with_ci(c, &word))
            .collect();
        debug!(target: "editor.complete", fields = fields.len(), matches = matches.len(), "complete");

        match matches.as_slice() {
            [] => None,
            [only] => {
                let mut text = self.quoted(only);
                text.push_str(&self.postfix);
                buf.replace_before_cursor(start, &text);
                None
            }
            many => {
                let prefix = common_prefix_ci(many);
                if prefix.chars().count() > word.chars().count() {
                    buf.replace_before_cursor(start, &prefix);
                }
                Some(if listing.is_empty() { matches } else { listing })
            }
        }
    }

    fn quoted(&self, candidate: &str) -> String {
        let needs = candidate
            .chars()
            .any(|c| c.is_whitespace() || self.delimiters.contains(c));
        match self.quotes.chars().next() {
            Some(q) if needs => format!("{q}{candidate}{q}"),
            _ => candidate.to_string(),
        }
    }
}

fn eq_ci(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn starts_with_ci(s: &str, prefix: &str) -> bool {
    let mut chars = s.chars();
    prefix
        .chars()
        .all(|p| chars.next().is_some_and(|c| eq_ci(c, p)))
}

/// Longest prefix (spelled as in the first candidate) shared by all candidates.
fn common_prefix_ci(candidates: &[String]) -> String {
    let Some((first, rest)) = candidates.split_first() else {
        return String::new();
    };
    let mut len = first.len();
    for other in rest {
        let shared: usize = first
            .chars()
            .zip(other.chars())
            .take_while(|(a, b)| eq_ci(*a, *b))
            .map(|(a, _)| a.len_utf8())
            .sum();
        len = len.min(shared);
    }
    first[..len].to_string()
}
