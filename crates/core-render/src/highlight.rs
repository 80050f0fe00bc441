//! Highlight engine: ordered (pattern → color) rules over the whole multi-line text.
//!
//! Every byte starts with the default color; each rule then overwrites the bytes of all its
//! non-overlapping matches, so the last-listed rule wins on overlap. Rules run against the
//! lines joined with `\n`, which lets a pattern span line boundaries. The result is memoized
//! on exact text equality: an unchanged buffer is never re-scanned and yields the identical
//! map.

use crate::color::{ColorId, ColorTable};
use regex::Regex;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct HighlightRule {
    pub pattern: Regex,
    pub color: String,
}

impl HighlightRule {
    pub fn new(pattern: &str, color: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            color: color.into(),
        })
    }
}

#[derive(Debug, Default)]
struct Memo {
    text: String,
    colors: Vec<ColorId>,
    /// Byte offset of each line inside `text`.
    starts: Vec<usize>,
}

#[derive(Debug, Default)]
pub struct Highlighter {
    table: ColorTable,
    rules: Vec<(Regex, ColorId)>,
    default: ColorId,
    reset: ColorId,
    memo: Memo,
    scratch: String,
    recomputes: u64,
}

/// Per-byte colors of the lines last passed to [`Highlighter::refresh`].
#[derive(Debug, Clone, Copy)]
pub struct LineColors<'a> {
    colors: &'a [ColorId],
    starts: &'a [usize],
    text_len: usize,
}

impl<'a> LineColors<'a> {
    /// Colors for line `index` (empty when highlighting is off or the line is unknown).
    pub fn line(&self, index: usize) -> &'a [ColorId] {
        if self.colors.is_empty() {
            return &[];
        }
        let Some(&start) = self.starts.get(index) else {
            return &[];
        };
        // the separator `\n` after a line is not part of it
        let end = self
            .starts
            .get(index + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text_len);
        self.colors.get(start..end).unwrap_or(&[])
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install rules; `default` colors unmatched text, `reset` is written after a colored line.
    pub fn set_rules(&mut self, rules: Vec<HighlightRule>, default: &str, reset: &str) {
        self.table = ColorTable::new();
        self.default = self.table.intern(default);
        self.reset = self.table.intern(reset);
        self.rules = rules
            .into_iter()
            .map(|r| {
                let id = self.table.intern(&r.color);
                (r.pattern, id)
            })
            .collect();
        self.memo = Memo::default();
        trace!(target: "render.highlight", rules = self.rules.len(), colors = self.table.len(), "rules_set");
    }

    pub fn is_enabled(&self) -> bool {
        !self.rules.is_empty()
    }

    pub fn table(&self) -> &ColorTable {
        &self.table
    }

    pub fn default_color(&self) -> ColorId {
        self.default
    }

    pub fn reset_color(&self) -> ColorId {
        self.reset
    }

    /// Number of times the color map was actually recomputed.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Bring the color map up to date with `lines`. Returns true when it was recomputed.
    pub fn refresh(&mut self, lines: &[String]) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.scratch.clear();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.scratch.push('\n');
            }
            self.scratch.push_str(line);
        }
        if self.scratch == self.memo.text && !self.memo.starts.is_empty() {
            return false;
        }
        std::mem::swap(&mut self.scratch, &mut self.memo.text);
        let text = &self.memo.text;

        let mut colors = vec![self.default; text.len()];
        for (pattern, id) in &self.rules {
            for m in pattern.find_iter(text) {
                colors[m.start()..m.end()].fill(*id);
            }
        }
        let mut starts = Vec::with_capacity(lines.len().max(1));
        starts.push(0);
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));

        self.memo.colors = colors;
        self.memo.starts = starts;
        self.recomputes += 1;
        trace!(target: "render.highlight", len = text.len(), lines = self.memo.starts.len(), "recomputed");
        true
    }

    pub fn view(&self) -> LineColors<'_> {
        LineColors {
            colors: &self.memo.colors,
            starts: &self.memo.starts,
            text_len: self.memo.text.len(),
        }
    }
}
