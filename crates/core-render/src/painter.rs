//! Incremental painter for the multi-line block.
//!
//! The painter owns the viewport and remembers where the terminal cursor is, as a row
//! relative to the top of the block (the row showing `viewport.first_line`). Every paint is
//! expressed with relative motion from that row, so redraw cost is proportional to the
//! rows that changed, never to the buffer size. Only [`Painter::repaint`] uses an absolute
//! home + clear-screen.
//!
//! Row model:
//! * `cursor_row`: row the terminal cursor is on; every motion ends at column 0 of a row,
//!   except after [`Painter::paint_current`] which leaves the cursor inside the row.
//! * `block_rows`: rows below the top that already exist on screen. Moving to a row past
//!   them emits `\r\n` so the terminal scrolls instead of clamping at the bottom.
//! * `rows[r]`: fingerprint of what row `r` shows; `None` when unknown or blank. The row
//!   holding the line being edited is always `None` because its visible slice depends on
//!   horizontal scroll.

use crate::color::{ColorId, ColorTable};
use crate::highlight::Highlighter;
use crate::viewport::{Scroll, Viewport};
use crate::writer::Writer;
use ahash::AHasher;
use core_text::cells::{cells, prompt_width};
use std::hash::{Hash, Hasher};
use tracing::trace;

/// Columns kept free at the right edge so the terminal never auto-wraps.
pub const RIGHT_MARGIN: usize = 1;

/// What to paint: the lines and the highlight state they were colored with.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub lines: &'a [String],
    pub highlight: &'a Highlighter,
}

impl<'a> Frame<'a> {
    pub fn new(lines: &'a [String], highlight: &'a Highlighter) -> Self {
        Self { lines, highlight }
    }

    fn colors(&self, index: usize) -> &'a [ColorId] {
        self.highlight.view().line(index)
    }
}

/// Render `text` starting `skip` columns in, at most `limit` columns wide, switching color
/// escapes only where the color id changes.
pub fn render_line(
    text: &str,
    colors: &[ColorId],
    table: &ColorTable,
    reset: ColorId,
    skip: usize,
    limit: usize,
) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut current: Option<ColorId> = None;
    for cell in cells(text) {
        let end = cell.col + cell.width;
        if end <= skip {
            continue;
        }
        let visible_start = cell.col.max(skip) - skip;
        if visible_start + (end - cell.col.max(skip)) > limit {
            break;
        }
        if let Some(&c) = colors.get(cell.byte)
            && current != Some(c)
        {
            out.push_str(table.seq(c));
            current = Some(c);
        }
        if cell.col < skip {
            // wide cell cut by the left edge
            out.extend(std::iter::repeat_n(' ', end - skip));
        } else {
            cell.push_to(&mut out);
        }
    }
    if current.is_some() {
        out.push_str(table.seq(reset));
    }
    out
}

fn fingerprint(prompt: &str, text: &str, colors: &[ColorId]) -> u64 {
    let mut hasher = AHasher::default();
    prompt.hash(&mut hasher);
    text.hash(&mut hasher);
    colors.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug)]
pub struct Painter {
    width: usize,
    viewport: Viewport,
    cursor_row: usize,
    block_rows: usize,
    rows: Vec<Option<u64>>,
}

impl Painter {
    /// `height` is the number of rows available for lines (status rows already excluded).
    pub fn new(width: u16, height: usize) -> Self {
        Self {
            width: width as usize,
            viewport: Viewport::new(0, height),
            cursor_row: 0,
            block_rows: 1,
            rows: Vec::new(),
        }
    }

    /// Forget everything about the screen: the next paint starts a fresh block on the
    /// current row, scrolled to the top.
    pub fn reset(&mut self) {
        self.viewport.first_line = 0;
        self.detach();
    }

    /// Forget the rows of the current block but keep the viewport.
    fn detach(&mut self) {
        self.cursor_row = 0;
        self.block_rows = 1;
        self.rows.clear();
    }

    /// Scroll back to the first line (before painting wholly different content).
    pub fn home_view(&mut self) {
        self.viewport.first_line = 0;
    }

    pub fn resize(&mut self, width: u16, height: usize) {
        self.width = width as usize;
        self.viewport.set_height(height);
        self.rows.clear();
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn headline(&self) -> usize {
        self.viewport.first_line
    }

    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    pub fn fix_view(&mut self, cursor_line: usize) -> Scroll {
        let scroll = self.viewport.fix(cursor_line);
        if scroll != Scroll::Still {
            trace!(target: "render.paint", headline = self.viewport.first_line, delta = scroll.delta(), "scrolled");
        }
        scroll
    }

    /// Text columns available after a prompt of width `prompt_cols`.
    pub fn text_limit(&self, prompt_cols: usize) -> usize {
        self.width
            .saturating_sub(RIGHT_MARGIN)
            .saturating_sub(prompt_cols)
            .max(1)
    }

    /// Move to column 0 of `row`, growing the block with `\r\n` when needed.
    pub fn goto_row(&mut self, w: &mut Writer, row: usize) {
        if row < self.cursor_row {
            w.up(self.cursor_row - row);
        } else if row > self.cursor_row {
            let last_existing = self.block_rows.saturating_sub(1);
            if self.cursor_row < last_existing {
                w.down(row.min(last_existing) - self.cursor_row);
            }
            for _ in last_existing.max(self.cursor_row)..row {
                w.new_row();
            }
            self.block_rows = self.block_rows.max(row + 1);
        }
        w.line_start();
        self.cursor_row = row;
    }

    /// Row of `line` when visible.
    pub fn row_of(&self, line: usize) -> Option<usize> {
        self.viewport.row_of(line)
    }

    fn paint_row(
        &mut self,
        w: &mut Writer,
        frame: &Frame<'_>,
        prompt: &mut dyn FnMut(usize) -> String,
        line: usize,
    ) {
        let Some(row) = self.row_of(line) else {
            return;
        };
        let text = frame.lines.get(line).map(String::as_str).unwrap_or("");
        let p = prompt(line);
        let colors = frame.colors(line);
        let limit = self.text_limit(prompt_width(&p));
        self.goto_row(w, row);
        w.print(p.as_str());
        w.print(render_line(
            text,
            colors,
            frame.highlight.table(),
            frame.highlight.reset_color(),
            0,
            limit,
        ));
        w.clear_row();
        self.store(row, Some(fingerprint(&p, text, colors)));
    }

    fn store(&mut self, row: usize, fp: Option<u64>) {
        if self.rows.len() <= row {
            self.rows.resize(row + 1, None);
        }
        self.rows[row] = fp;
    }

    /// Paint lines `[from, to)` clipped to the window, then clear everything below the last
    /// painted row. Returns the number of rows painted.
    pub fn print_range(
        &mut self,
        w: &mut Writer,
        frame: &Frame<'_>,
        prompt: &mut dyn FnMut(usize) -> String,
        from: usize,
        to: usize,
    ) -> usize {
        let start = from.max(self.viewport.first_line);
        let end = to.min(self.viewport.end()).min(frame.lines.len());
        let mut painted = 0;
        for line in start..end {
            self.paint_row(w, frame, prompt, line);
            painted += 1;
        }
        if painted == 0 {
            let row = start.saturating_sub(self.viewport.first_line);
            if row >= self.block_rows {
                return 0;
            }
            self.goto_row(w, row);
            w.clear_below();
            self.rows.truncate(row);
        } else {
            w.clear_below();
            self.rows.truncate(self.cursor_row + 1);
        }
        trace!(target: "render.paint", from = start, to = end, painted, "print_range");
        painted
    }

    /// Repaint only rows whose content changed since they were last painted, skipping the
    /// row of `skip_line`. Rows past the last line are cleared.
    pub fn refresh_stale(
        &mut self,
        w: &mut Writer,
        frame: &Frame<'_>,
        prompt: &mut dyn FnMut(usize) -> String,
        skip_line: usize,
    ) -> usize {
        let first = self.viewport.first_line;
        let end = self.viewport.end().min(frame.lines.len());
        let mut repainted = 0;
        for line in first..end {
            if line == skip_line {
                continue;
            }
            let row = line - first;
            let text = &frame.lines[line];
            let p = prompt(line);
            let fp = fingerprint(&p, text, frame.colors(line));
            if self.rows.get(row).copied().flatten() != Some(fp) {
                self.paint_row(w, frame, prompt, line);
                repainted += 1;
            }
        }
        let used = end.saturating_sub(first);
        if self.rows.iter().skip(used).any(Option::is_some) {
            self.goto_row(w, used);
            w.clear_below();
            self.rows.truncate(used);
        }
        if repainted > 0 {
            trace!(target: "render.paint", repainted, "refresh_stale");
        }
        repainted
    }

    /// Clear the screen and paint the whole window from the headline.
    pub fn repaint(
        &mut self,
        w: &mut Writer,
        frame: &Frame<'_>,
        prompt: &mut dyn FnMut(usize) -> String,
    ) {
        w.clear_screen();
        self.cursor_row = 0;
        self.block_rows = 1;
        self.rows.clear();
        let first = self.viewport.first_line;
        self.print_range(w, frame, prompt, first, self.viewport.end());
        trace!(target: "render.paint", headline = first, "repaint");
    }

    /// Paint the line being edited (`text` may differ from `frame.lines`) with its first
    /// `skip` columns scrolled off, and leave the terminal cursor on `cursor_col`.
    #[allow(clippy::too_many_arguments)]
    pub fn paint_current(
        &mut self,
        w: &mut Writer,
        frame: &Frame<'_>,
        prompt: &str,
        line: usize,
        text: &str,
        skip: usize,
        cursor_col: usize,
    ) {
        let Some(row) = self.row_of(line) else {
            return;
        };
        let pw = prompt_width(prompt);
        let limit = self.text_limit(pw);
        let colors = if frame.lines.get(line).map(String::as_str) == Some(text) {
            frame.colors(line)
        } else {
            &[]
        };
        self.goto_row(w, row);
        w.print(prompt);
        w.print(render_line(
            text,
            colors,
            frame.highlight.table(),
            frame.highlight.reset_color(),
            skip,
            limit,
        ));
        w.clear_row();
        w.line_start();
        w.right(pw + cursor_col.saturating_sub(skip));
        self.store(row, None);
    }

    /// Paint `text` on the row just below the last visible line (status line) and come back
    /// to the start of `return_line`'s row.
    pub fn paint_status(
        &mut self,
        w: &mut Writer,
        text: &str,
        line_count: usize,
        return_line: usize,
    ) {
        let status_row = line_count
            .saturating_sub(self.viewport.first_line)
            .min(self.viewport.height);
        w.hide_cursor();
        self.goto_row(w, status_row);
        w.print(text);
        w.clear_row();
        if let Some(row) = self.row_of(return_line) {
            self.goto_row(w, row);
        }
        w.show_cursor();
    }

    /// Erase everything below the last row of the window that holds a line.
    pub fn clear_below_lines(&mut self, w: &mut Writer, line_count: usize) {
        let used = line_count
            .saturating_sub(self.viewport.first_line)
            .min(self.viewport.height);
        if used < self.block_rows {
            self.goto_row(w, used);
            w.clear_below();
            self.rows.truncate(used);
        }
    }

    /// Leave the block: move to a fresh row under the last painted line. The next paint
    /// starts a new block there with the same viewport.
    pub fn leave_block(&mut self, w: &mut Writer, line_count: usize) {
        let used = line_count
            .saturating_sub(self.viewport.first_line)
            .min(self.viewport.height)
            .max(1);
        self.goto_row(w, used - 1);
        w.new_row();
        self.detach();
        trace!(target: "render.paint", rows = used, "leave_block");
    }
}
