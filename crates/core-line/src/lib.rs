//! Single-line editing primitive.
//!
//! [`LineEditor::read_line`] edits exactly one line. It owns the key → command mapping and
//! the built-in editing commands; everything else is decided by a [`LineHandler`]:
//!
//! * every resolved command is offered to [`LineHandler::dispatch`] first. `Flow::Default`
//!   runs the built-in behavior, `Flow::Continue` means the handler already did the work,
//!   `Flow::Accept(action)` finishes the line and hands `action` back to the caller.
//! * painting the row is delegated to [`LineHandler::paint`]; the editor only decides the
//!   horizontal scroll offset that keeps the cursor visible.
//!
//! The only suspension point is the wait for the next input event, which also observes
//! cancellation.

use core_events::{CancelToken, InputEvent, KeySource, WaitError, wait_event};
use core_keymap::{Command, Keymap, Resolution};
use core_text::LineBuffer;
use core_text::cells::column_at;
use std::io::{self, Write};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum LineError {
    /// The interrupt key was pressed and no handler claimed it.
    #[error("interrupted")]
    Interrupted,
    #[error("operation cancelled")]
    Cancelled,
    #[error("input stream closed")]
    InputClosed,
    #[error("terminal i/o: {0}")]
    Io(#[from] io::Error),
}

impl From<WaitError> for LineError {
    fn from(e: WaitError) -> Self {
        match e {
            WaitError::Cancelled => LineError::Cancelled,
            WaitError::Closed => LineError::InputClosed,
        }
    }
}

/// Handler verdict for one command or event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow<A> {
    Default,
    Continue,
    Accept(A),
}

/// Where the cursor starts on the seeded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Start,
    End,
    /// Byte offset, snapped forward to a grapheme boundary.
    Byte(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome<A> {
    pub text: String,
    /// Cursor byte offset at the moment the line was accepted.
    pub cursor: usize,
    pub action: A,
}

pub trait LineHandler {
    type Action;

    /// Columns available for text on the row being edited.
    fn text_columns(&mut self) -> usize;

    /// Paint the row for `buf`, with the first `skip` columns scrolled off, leaving the
    /// terminal cursor on the buffer cursor.
    fn paint<W: Write>(&mut self, out: &mut W, buf: &LineBuffer, skip: usize) -> io::Result<()>;

    fn dispatch(&mut self, cmd: Command, buf: &mut LineBuffer) -> Flow<Self::Action>;

    /// Bracketed paste. Inserted verbatim unless the handler says otherwise.
    fn paste(&mut self, text: &str, buf: &mut LineBuffer) -> Flow<Self::Action> {
        buf.insert_str(text);
        Flow::Continue
    }

    fn resize(&mut self, _cols: u16, _rows: u16) -> Flow<Self::Action> {
        Flow::Continue
    }

    /// Text removed by a kill command.
    fn killed(&mut self, _text: &str) {}
}

#[derive(Debug, Default)]
pub struct LineEditor {
    keymap: Keymap,
    skip: usize,
}

impl LineEditor {
    pub fn new(keymap: Keymap) -> Self {
        Self { keymap, skip: 0 }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    /// Columns currently scrolled off the left edge.
    pub fn scroll(&self) -> usize {
        self.skip
    }

    pub async fn read_line<K, H, W>(
        &mut self,
        keys: &mut K,
        cancel: &CancelToken,
        handler: &mut H,
        out: &mut W,
        seed: &str,
        hint: CursorHint,
    ) -> Result<LineOutcome<H::Action>, LineError>
    where
        K: KeySource,
        H: LineHandler,
        W: Write,
    {
        let mut buf = LineBuffer::new(seed);
        match hint {
            CursorHint::Start => buf.move_home(),
            CursorHint::End => buf.move_end(),
            CursorHint::Byte(b) => buf.set_cursor_byte(b),
        }
        self.skip = 0;
        self.refresh(handler, out, &buf)?;

        loop {
            let flow = match wait_event(keys, cancel).await? {
                InputEvent::Key(key) => match self.keymap.resolve(&key) {
                    Resolution::Command(cmd) => match handler.dispatch(cmd, &mut buf) {
                        Flow::Default => self.builtin(cmd, &mut buf, handler)?,
                        other => other,
                    },
                    Resolution::SelfInsert(c) => {
                        buf.insert_char(c);
                        Flow::Continue
                    }
                    Resolution::Unbound => {
                        trace!(target: "input.event", key = %key, "unbound_key");
                        continue;
                    }
                },
                InputEvent::Paste(text) => {
                    trace!(target: "input.paste", len = text.len(), "paste_event");
                    handler.paste(&text, &mut buf)
                }
                InputEvent::Resize(cols, rows) => handler.resize(cols, rows),
            };
            if let Flow::Accept(action) = flow {
                let cursor = buf.cursor_byte();
                return Ok(LineOutcome {
                    text: buf.into_string(),
                    cursor,
                    action,
                });
            }
            self.refresh(handler, out, &buf)?;
        }
    }

    fn builtin<H: LineHandler>(
        &mut self,
        cmd: Command,
        buf: &mut LineBuffer,
        handler: &mut H,
    ) -> Result<Flow<H::Action>, LineError> {
        match cmd {
            Command::BackwardChar => {
                buf.move_left();
            }
            Command::ForwardChar => {
                buf.move_right();
            }
            Command::BackwardWord => buf.move_word_left(),
            Command::ForwardWord => buf.move_word_right(),
            Command::BeginningOfLine => buf.move_home(),
            Command::EndOfLine => buf.move_end(),
            Command::BackwardDeleteChar => {
                buf.delete_before();
            }
            Command::DeleteChar | Command::DeleteOrEof => {
                buf.delete_at();
            }
            Command::KillLine => {
                let killed = buf.kill_to_end();
                handler.killed(&killed);
            }
            Command::UnixLineDiscard => {
                let killed = buf.kill_to_start();
                handler.killed(&killed);
            }
            Command::UnixWordRubout => {
                buf.kill_word_before();
            }
            Command::Interrupt => return Err(LineError::Interrupted),
            other => {
                trace!(target: "input.event", command = %other, "no_builtin");
            }
        }
        Ok(Flow::Continue)
    }

    fn refresh<H: LineHandler, W: Write>(
        &mut self,
        handler: &mut H,
        out: &mut W,
        buf: &LineBuffer,
    ) -> io::Result<()> {
        let limit = handler.text_columns().max(1);
        let col = column_at(buf.as_str(), buf.cursor_byte());
        if col < self.skip {
            self.skip = col;
        } else if col >= self.skip + limit {
            self.skip = col + 1 - limit;
        }
        handler.paint(out, buf, self.skip)?;
        out.flush()
    }
}
