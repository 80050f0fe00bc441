//! Editor state shared by every line read: session, painter, highlighter, history,
//! clipboard and the configurable hooks. Implements [`LineHandler`] so the single-line
//! editor routes commands and painting through it.

use crate::action::{PendingAction, Step};
use crate::complete::Completion;
use crate::isearch::Search;
use core_keymap::Command;
use core_line::{Flow, LineHandler};
use core_render::listing::listing_rows;
use core_render::status::search_status;
use core_render::{Frame, Highlighter, Painter, Scroll, Writer};
use core_state::{Column, Direction, History, HistoryNav, MemoryHistory, Session};
use core_terminal::{Clipboard, MemoryClipboard, terminal_size};
use core_text::LineBuffer;
use core_text::cells::{column_at, prompt_width};
use core_text::segment::normalize_paste;
use std::io::{self, Write};
use tracing::{debug, info, trace, warn};

pub(crate) type PromptFn = Box<dyn FnMut(usize) -> String>;
pub(crate) type SubmitFn = Box<dyn FnMut(&[String], usize) -> bool>;

/// Rows available for lines: one row stays free for the search status.
pub(crate) fn view_height(rows: u16) -> usize {
    (rows as usize).saturating_sub(1).max(1)
}

pub(crate) fn default_prompt(line: usize) -> String {
    format!("{}> ", line + 1)
}

pub(crate) struct Engine {
    pub(crate) session: Session,
    pub(crate) painter: Painter,
    pub(crate) highlight: Highlighter,
    pub(crate) prompt: PromptFn,
    pub(crate) history: Box<dyn History>,
    pub(crate) nav: HistoryNav,
    pub(crate) clipboard: Box<dyn Clipboard>,
    pub(crate) default_lines: Vec<String>,
    pub(crate) move_end: bool,
    pub(crate) submit_when: Option<SubmitFn>,
    pub(crate) completion: Option<Completion>,
    pub(crate) fixed_size: Option<(u16, u16)>,
}

impl Engine {
    pub(crate) fn new() -> Self {
        let (cols, rows) = crate::DEFAULT_VIEW;
        Self {
            session: Session::new(),
            painter: Painter::new(cols, view_height(rows)),
            highlight: Highlighter::new(),
            prompt: Box::new(default_prompt),
            history: Box::new(MemoryHistory::new()),
            nav: HistoryNav::new(false),
            clipboard: Box::new(MemoryClipboard::new()),
            default_lines: Vec::new(),
            move_end: false,
            submit_when: None,
            completion: None,
            fixed_size: None,
        }
    }

    fn size(&self) -> (u16, u16) {
        self.fixed_size.unwrap_or_else(terminal_size)
    }

    /// Start a read: seed the session, reset history navigation and paint a fresh block.
    pub(crate) fn begin(&mut self, w: &mut Writer) -> Column {
        let (lines, cursor, column) = match (self.default_lines.len(), self.move_end) {
            (0, _) => (Vec::new(), 0, Column::Start),
            (n, true) => (self.default_lines.clone(), n - 1, Column::End),
            (_, false) => (self.default_lines.clone(), 0, Column::Start),
        };
        self.session.replace(lines, cursor);
        self.nav.reset(&*self.history);
        let (cols, rows) = self.size();
        self.painter.resize(cols, view_height(rows));
        self.painter.reset();
        self.redraw(w, Some(0));
        info!(
            target: "editor.session",
            lines = self.session.len(),
            history = self.history.len(),
            cols,
            rows,
            "read_start"
        );
        column
    }

    /// Bring the screen in line with the session after a structural change. Rows from
    /// line `from` down are repainted (the whole window when the view scrolled); other
    /// rows only when their content or colors changed.
    pub(crate) fn redraw(&mut self, w: &mut Writer, from: Option<usize>) {
        let line = self.session.cursor_line();
        self.highlight.refresh(self.session.lines());
        let scroll = self.painter.fix_view(line);
        let frame = Frame::new(self.session.lines(), &self.highlight);
        let prompt = &mut *self.prompt;
        if scroll != Scroll::Still {
            let first = self.painter.headline();
            self.painter.print_range(w, &frame, prompt, first, usize::MAX);
        } else if let Some(from) = from {
            self.painter.print_range(w, &frame, prompt, from, usize::MAX);
        }
        self.painter.refresh_stale(w, &frame, prompt, line);
    }

    /// Repaint every visible row so the line being edited loses its horizontal scroll.
    fn settle_rows(&mut self, w: &mut Writer) {
        self.highlight.refresh(self.session.lines());
        let frame = Frame::new(self.session.lines(), &self.highlight);
        self.painter
            .refresh_stale(w, &frame, &mut *self.prompt, usize::MAX);
    }

    /// Leave the block for good, with the last line visible.
    pub(crate) fn leave(&mut self, w: &mut Writer) {
        let len = self.session.len().max(1);
        if self.painter.fix_view(len - 1) != Scroll::Still {
            self.highlight.refresh(self.session.lines());
            let frame = Frame::new(self.session.lines(), &self.highlight);
            let first = self.painter.headline();
            self.painter
                .print_range(w, &frame, &mut *self.prompt, first, usize::MAX);
        }
        self.settle_rows(w);
        self.painter.clear_below_lines(w, len);
        self.painter.leave_block(w, len);
    }

    /// Echo `^C` under the block; the next read starts a fresh block below it.
    pub(crate) fn interrupted(&mut self, w: &mut Writer) {
        self.leave(w);
        w.print("^C");
        w.clear_row();
        w.new_row();
        info!(target: "editor.session", lines = self.session.len(), "interrupted");
    }

    pub(crate) fn apply(
        &mut self,
        w: &mut Writer,
        action: PendingAction,
        text: &str,
        cursor: usize,
    ) -> Step {
        trace!(target: "editor.session", action = action.name(), line = self.session.cursor_line(), "apply");
        match action {
            PendingAction::NewLine => {
                self.session.split_line(text, cursor);
                let above = self.session.cursor_line().saturating_sub(1);
                self.redraw(w, Some(above));
                Step::Edit(Column::Start)
            }
            PendingAction::Submit => {
                self.session.sync(text);
                self.leave(w);
                info!(target: "editor.session", lines = self.session.len(), "submitted");
                Step::Done
            }
            PendingAction::MoveUp => {
                if self.session.move_up(text) {
                    self.redraw(w, None);
                    Step::Edit(Column::End)
                } else {
                    self.history_step(w, Direction::Previous, cursor)
                }
            }
            PendingAction::MoveDown => {
                if self.session.move_down(text) {
                    self.redraw(w, None);
                    Step::Edit(Column::Start)
                } else {
                    self.history_step(w, Direction::Next, cursor)
                }
            }
            PendingAction::JoinAbove => match self.session.join_above(text) {
                Some(seam) => {
                    self.redraw(w, Some(self.session.cursor_line()));
                    Step::Edit(Column::Byte(seam))
                }
                None => Step::Edit(Column::Byte(cursor)),
            },
            PendingAction::JoinBelow => match self.session.join_below(text) {
                Some(seam) => {
                    self.redraw(w, Some(self.session.cursor_line()));
                    Step::Edit(Column::Byte(seam))
                }
                None => Step::Edit(Column::Byte(cursor)),
            },
            PendingAction::PreviousHistory => {
                self.session.sync(text);
                self.history_step(w, Direction::Previous, cursor)
            }
            PendingAction::NextHistory => {
                self.session.sync(text);
                self.history_step(w, Direction::Next, cursor)
            }
            PendingAction::Paste(pasted) => {
                let from = self.session.cursor_line();
                let col = self.session.paste(text, cursor, &pasted);
                self.redraw(w, Some(from));
                Step::Edit(Column::Byte(col))
            }
            PendingAction::Repaint(size) => {
                self.session.sync(text);
                self.repaint(w, size);
                Step::Edit(Column::Byte(cursor))
            }
            PendingAction::ShowListing(items) => {
                self.session.sync(text);
                self.show_listing(w, &items);
                Step::Edit(Column::Byte(cursor))
            }
            PendingAction::EndOfInput => {
                self.session.sync(text);
                self.leave(w);
                info!(target: "editor.session", "end_of_input");
                Step::EndOfInput
            }
            PendingAction::Search => {
                // driven by the async search loop, never applied here
                Step::Edit(Column::Byte(cursor))
            }
        }
    }

    /// Recall the neighbouring history slot. The session must already hold the current line.
    fn history_step(&mut self, w: &mut Writer, dir: Direction, cursor: usize) -> Step {
        let joined = self.session.joined();
        let Some(record) = self.nav.step(&*self.history, dir, &joined) else {
            debug!(target: "editor.history", dir = ?dir, ptr = self.nav.ptr(), "history_boundary");
            return Step::Edit(Column::Byte(cursor));
        };
        self.load_record(w, &record, dir);
        Step::Edit(Column::End)
    }

    /// Replace the lines with `record`; the cursor lands on its last line after moving
    /// back, on its first line after moving forward.
    fn load_record(&mut self, w: &mut Writer, record: &str, dir: Direction) {
        let count = record.split('\n').count();
        let line = match dir {
            Direction::Previous => count - 1,
            Direction::Next => 0,
        };
        self.session.replace_text(record, line);
        self.painter.home_view();
        self.redraw(w, Some(0));
    }

    pub(crate) fn repaint(&mut self, w: &mut Writer, size: Option<(u16, u16)>) {
        if let Some((cols, rows)) = size
            && self.fixed_size.is_none()
        {
            self.painter.resize(cols, view_height(rows));
            debug!(target: "render.paint", cols, rows, "resized");
        }
        self.highlight.refresh(self.session.lines());
        self.painter.fix_view(self.session.cursor_line());
        let frame = Frame::new(self.session.lines(), &self.highlight);
        self.painter.repaint(w, &frame, &mut *self.prompt);
    }

    fn show_listing(&mut self, w: &mut Writer, items: &[String]) {
        self.settle_rows(w);
        let len = self.session.len().max(1);
        self.painter.clear_below_lines(w, len);
        self.painter.leave_block(w, len);
        let rows = listing_rows(items, self.painter.width());
        for row in &rows {
            w.print(row.as_str());
            w.clear_row();
            w.new_row();
        }
        debug!(target: "editor.complete", items = items.len(), rows = rows.len(), "listing");
        self.redraw(w, Some(0));
    }

    pub(crate) fn paint_search(&mut self, w: &mut Writer, search: &Search) {
        let status = search_status(search.query(), search.found_text(), self.painter.width());
        self.painter.paint_status(
            w,
            &status,
            self.session.len(),
            self.session.cursor_line(),
        );
    }

    pub(crate) fn end_search(&mut self, w: &mut Writer) {
        self.painter.clear_below_lines(w, self.session.len());
    }

    /// Load the matched record (cursor on its last line). Without a match the block is
    /// replaced by a single empty line.
    pub(crate) fn commit_search(&mut self, w: &mut Writer, search: &Search) -> Column {
        self.end_search(w);
        let record = match search.hit() {
            Some((index, record)) => {
                let joined = self.session.joined();
                self.nav.jump(&*self.history, index, &joined);
                info!(target: "editor.isearch", index, query_len = search.query().len(), "committed");
                record.to_string()
            }
            None => {
                info!(target: "editor.isearch", query_len = search.query().len(), "committed_without_match");
                String::new()
            }
        };
        self.load_record(w, &record, Direction::Previous);
        Column::End
    }

    fn should_submit(&mut self, buf: &LineBuffer) -> bool {
        let Some(pred) = self.submit_when.as_mut() else {
            return false;
        };
        self.session.sync(buf.as_str());
        pred(self.session.lines(), self.session.cursor_line())
    }

    fn insert_pasted(&mut self, raw: &str, buf: &mut LineBuffer) -> Flow<PendingAction> {
        let text = normalize_paste(raw);
        debug!(target: "editor.paste", len = text.len(), lines = text.matches('\n').count() + 1, "paste");
        if text.contains('\n') {
            Flow::Accept(PendingAction::Paste(text))
        } else {
            buf.insert_str(&text);
            Flow::Continue
        }
    }

    fn yank(&mut self, buf: &mut LineBuffer) -> Flow<PendingAction> {
        match self.clipboard.read() {
            Ok(text) if !text.is_empty() => self.insert_pasted(&text, buf),
            Ok(_) => Flow::Continue,
            Err(e) => {
                warn!(target: "editor.paste", error = %e, "clipboard_read_failed");
                Flow::Continue
            }
        }
    }

    fn complete(&mut self, buf: &mut LineBuffer) -> Flow<PendingAction> {
        let Some(completion) = self.completion.as_mut() else {
            return Flow::Continue;
        };
        let line = self.session.cursor_line().min(self.session.len());
        let above = &self.session.lines()[..line];
        match completion.complete(above, buf) {
            Some(items) => Flow::Accept(PendingAction::ShowListing(items)),
            None => Flow::Continue,
        }
    }
}

impl LineHandler for Engine {
    type Action = PendingAction;

    fn text_columns(&mut self) -> usize {
        let prompt = (self.prompt)(self.session.cursor_line());
        self.painter.text_limit(prompt_width(&prompt))
    }

    fn paint<W: Write>(&mut self, out: &mut W, buf: &LineBuffer, skip: usize) -> io::Result<()> {
        self.session.sync(buf.as_str());
        let line = self.session.cursor_line();
        let mut w = Writer::new();
        if self.highlight.refresh(self.session.lines()) {
            let frame = Frame::new(self.session.lines(), &self.highlight);
            self.painter
                .refresh_stale(&mut w, &frame, &mut *self.prompt, line);
        }
        let prompt = (self.prompt)(line);
        let col = column_at(buf.as_str(), buf.cursor_byte());
        let frame = Frame::new(self.session.lines(), &self.highlight);
        self.painter
            .paint_current(&mut w, &frame, &prompt, line, buf.as_str(), skip, col);
        w.flush(out)
    }

    fn dispatch(&mut self, cmd: Command, buf: &mut LineBuffer) -> Flow<PendingAction> {
        let line = self.session.cursor_line();
        let has_next = line + 1 < self.session.len();
        let action = match cmd {
            Command::NewLine if self.should_submit(buf) => PendingAction::Submit,
            Command::NewLine => PendingAction::NewLine,
            Command::Submit => PendingAction::Submit,
            Command::PreviousLine => PendingAction::MoveUp,
            Command::NextLine => PendingAction::MoveDown,
            Command::PreviousHistory => PendingAction::PreviousHistory,
            Command::NextHistory => PendingAction::NextHistory,
            Command::BackwardChar if buf.at_start() && line > 0 => PendingAction::MoveUp,
            Command::ForwardChar if buf.at_end() && has_next => PendingAction::MoveDown,
            Command::BackwardDeleteChar if buf.at_start() && line > 0 => PendingAction::JoinAbove,
            Command::DeleteOrEof if buf.is_empty() && self.session.is_blank() => {
                PendingAction::EndOfInput
            }
            Command::DeleteChar | Command::DeleteOrEof if buf.at_end() && has_next => {
                PendingAction::JoinBelow
            }
            Command::IsearchBackward => PendingAction::Search,
            Command::Repaint => PendingAction::Repaint(None),
            Command::Yank => return self.yank(buf),
            Command::Complete => return self.complete(buf),
            _ => return Flow::Default,
        };
        Flow::Accept(action)
    }

    fn paste(&mut self, text: &str, buf: &mut LineBuffer) -> Flow<PendingAction> {
        self.insert_pasted(text, buf)
    }

    fn resize(&mut self, cols: u16, rows: u16) -> Flow<PendingAction> {
        Flow::Accept(PendingAction::Repaint(Some((cols, rows))))
    }

    fn killed(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Err(e) = self.clipboard.write(text) {
            warn!(target: "editor.paste", error = %e, "clipboard_write_failed");
        }
    }
}
