//! Multi-line editor built on the single-line primitive.
//!
//! [`MultiLineEditor::read`] composes several logical lines. Each call into the line editor
//! edits exactly one line; commands that have to leave that line come back as a
//! [`PendingAction`] which the engine applies before re-entering the (new) current line.
//!
//! Lifecycle of one read:
//! 1. `begin` seeds the session from the default lines, resets history navigation and
//!    paints a fresh block on the current terminal row.
//! 2. Lines are edited until an action ends the read: submit returns the lines, the
//!    delete-or-EOF key on an empty buffer returns [`ReadError::EndOfInput`].
//! 3. The interrupt key echoes `^C` and restarts from step 1; it is never returned.
//!
//! Cancellation and I/O errors end the read; the block is left with a final newline so the
//! terminal is in a sane state.

mod action;
mod complete;
mod engine;
mod error;
mod isearch;

pub use action::PendingAction;
pub use complete::Completion;
pub use core_keymap::Command;
pub use core_render::HighlightRule;
pub use core_state::{History, MemoryHistory};
pub use core_terminal::{Clipboard, MemoryClipboard, SystemClipboard};
pub use error::{ReadError, SetupError};

use action::{Step, hint};
use core_events::{CancelToken, InputEvent, KeyEvent, KeySource, wait_event};
use core_line::{LineEditor, LineError};
use core_render::Writer;
use core_state::Column;
use engine::Engine;
use isearch::{Search, SearchKey, classify};
use std::io::Write;
use tracing::{debug, info};

/// View size used until the first read queries the terminal.
pub const DEFAULT_VIEW: (u16, u16) = core_terminal::FALLBACK_SIZE;

enum Exit {
    Lines(Vec<String>),
    EndOfInput,
}

pub struct MultiLineEditor<W: Write> {
    out: W,
    line: LineEditor,
    engine: Engine,
}

impl<W: Write> MultiLineEditor<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            line: LineEditor::default(),
            engine: Engine::new(),
        }
    }

    /// Use a fixed view size instead of querying the terminal (resize events still repaint).
    pub fn with_view_size(mut self, cols: u16, rows: u16) -> Self {
        self.engine.fixed_size = Some((cols, rows));
        self
    }

    /// Prompt printed before line `index` (0-based). Escape sequences are allowed.
    pub fn set_prompt(&mut self, f: impl FnMut(usize) -> String + 'static) {
        self.engine.prompt = Box::new(f);
    }

    pub fn set_highlight_rules(&mut self, rules: Vec<HighlightRule>, default: &str, reset: &str) {
        self.engine.highlight.set_rules(rules, default, reset);
    }

    /// Compile `(pattern, color)` pairs and install them.
    pub fn set_highlight_patterns<'a>(
        &mut self,
        rules: impl IntoIterator<Item = (&'a str, &'a str)>,
        default: &str,
        reset: &str,
    ) -> Result<(), SetupError> {
        let rules = rules
            .into_iter()
            .map(|(pattern, color)| HighlightRule::new(pattern, color))
            .collect::<Result<Vec<_>, _>>()?;
        self.set_highlight_rules(rules, default, reset);
        Ok(())
    }

    pub fn set_history(&mut self, store: Box<dyn History>, cycling: bool) {
        self.engine.history = store;
        self.engine.nav.set_cycling(cycling);
    }

    pub fn set_clipboard(&mut self, clip: Box<dyn Clipboard>) {
        self.engine.clipboard = clip;
    }

    pub fn bind_key(&mut self, key: KeyEvent, cmd: Command) {
        self.line.keymap_mut().bind(key, cmd);
    }

    /// Bind by name, e.g. `("C_O", "SUBMIT")`.
    pub fn bind_key_named(&mut self, key: &str, cmd: &str) -> Result<(), SetupError> {
        self.line.keymap_mut().bind_named(key, cmd)?;
        Ok(())
    }

    /// Lines every read starts with. `move_end` puts the cursor at the end of the last
    /// line, otherwise it starts at the beginning of the first.
    pub fn set_default_lines(&mut self, seed: Vec<String>, move_end: bool) {
        self.engine.default_lines = seed;
        self.engine.move_end = move_end;
    }

    /// Make the new-line key submit when `f(lines, cursor_line)` holds.
    pub fn submit_on_enter_when(&mut self, f: impl FnMut(&[String], usize) -> bool + 'static) {
        self.engine.submit_when = Some(Box::new(f));
    }

    pub fn bind_completion(&mut self, c: Completion) {
        self.engine.completion = Some(c);
    }

    pub fn lines(&self) -> &[String] {
        self.engine.session.lines()
    }

    pub fn cursor_line(&self) -> usize {
        self.engine.session.cursor_line()
    }

    pub fn headline(&self) -> usize {
        self.engine.painter.headline()
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read one multi-line input.
    pub async fn read<K: KeySource>(
        &mut self,
        keys: &mut K,
        cancel: &CancelToken,
    ) -> Result<Vec<String>, ReadError> {
        loop {
            let err = match self.read_session(keys, cancel).await {
                Ok(Exit::Lines(lines)) => return Ok(lines),
                Ok(Exit::EndOfInput) => return Err(ReadError::EndOfInput),
                Err(LineError::Interrupted) => {
                    let mut w = Writer::new();
                    self.engine.interrupted(&mut w);
                    w.flush(&mut self.out)?;
                    continue;
                }
                Err(LineError::Cancelled) => ReadError::Cancelled,
                Err(LineError::InputClosed) => ReadError::InputClosed,
                Err(LineError::Io(e)) => ReadError::Io(e),
            };
            info!(target: "editor.session", error = %err, "read_aborted");
            let mut w = Writer::new();
            self.engine.leave(&mut w);
            let _ = w.flush(&mut self.out);
            return Err(err);
        }
    }

    async fn read_session<K: KeySource>(
        &mut self,
        keys: &mut K,
        cancel: &CancelToken,
    ) -> Result<Exit, LineError> {
        let mut w = Writer::new();
        let mut column = self.engine.begin(&mut w);
        w.flush(&mut self.out)?;
        loop {
            let seed = self.engine.session.current().to_string();
            let outcome = self
                .line
                .read_line(
                    keys,
                    cancel,
                    &mut self.engine,
                    &mut self.out,
                    &seed,
                    hint(column),
                )
                .await?;
            let step = match outcome.action {
                action::PendingAction::Search => {
                    let column = self
                        .search(keys, cancel, &outcome.text, outcome.cursor)
                        .await?;
                    Step::Edit(column)
                }
                action => {
                    let mut w = Writer::new();
                    let step = self
                        .engine
                        .apply(&mut w, action, &outcome.text, outcome.cursor);
                    w.flush(&mut self.out)?;
                    step
                }
            };
            match step {
                Step::Edit(next) => column = next,
                Step::Done => return Ok(Exit::Lines(self.engine.session.lines().to_vec())),
                Step::EndOfInput => return Ok(Exit::EndOfInput),
            }
        }
    }

    /// Incremental search sub-loop; reads keys directly until commit or abort.
    async fn search<K: KeySource>(
        &mut self,
        keys: &mut K,
        cancel: &CancelToken,
        text: &str,
        cursor: usize,
    ) -> Result<Column, LineError> {
        self.engine.session.sync(text);
        let mut search = Search::new(&*self.engine.history);
        debug!(target: "editor.isearch", history = self.engine.history.len(), "isearch_start");
        loop {
            let mut w = Writer::new();
            self.engine.paint_search(&mut w, &search);
            w.flush(&mut self.out)?;

            let event = wait_event(keys, cancel).await?;
            let history = &*self.engine.history;
            match event {
                InputEvent::Key(key) => match classify(&key) {
                    SearchKey::Insert(c) => search.push(c, history),
                    SearchKey::DeleteChar => search.pop(history),
                    SearchKey::Repeat(dir) => search.repeat(dir, history),
                    SearchKey::Commit => {
                        let mut w = Writer::new();
                        let column = self.engine.commit_search(&mut w, &search);
                        w.flush(&mut self.out)?;
                        return Ok(column);
                    }
                    SearchKey::Abort => {
                        let mut w = Writer::new();
                        self.engine.end_search(&mut w);
                        w.flush(&mut self.out)?;
                        debug!(target: "editor.isearch", "aborted");
                        return Ok(Column::Byte(cursor));
                    }
                    SearchKey::Ignore => {}
                },
                InputEvent::Paste(pasted) => {
                    for c in pasted.chars().filter(|c| !c.is_control()) {
                        search.push(c, history);
                    }
                }
                InputEvent::Resize(cols, rows) => {
                    let mut w = Writer::new();
                    self.engine.repaint(&mut w, Some((cols, rows)));
                    w.flush(&mut self.out)?;
                }
            }
        }
    }
}
