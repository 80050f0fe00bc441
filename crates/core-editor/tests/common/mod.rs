#![allow(dead_code)] // Shared across the scenario binaries; each uses a subset of helpers.

use core_editor::{MultiLineEditor, ReadError};
use core_events::{CancelToken, InputEvent, KeyCode, KeyEvent, KeyModifiers, typed};
use core_input::script;

pub const COLS: u16 = 40;
pub const ROWS: u16 = 10;

pub type Editor = MultiLineEditor<Vec<u8>>;

pub fn editor() -> Editor {
    MultiLineEditor::new(Vec::new()).with_view_size(COLS, ROWS)
}

pub fn key(code: KeyCode) -> InputEvent {
    InputEvent::Key(KeyEvent::plain(code))
}

pub fn ctrl(c: char) -> InputEvent {
    InputEvent::Key(KeyEvent::ctrl(c))
}

pub fn alt(c: char) -> InputEvent {
    InputEvent::Key(KeyEvent::alt(c))
}

pub fn ctrl_key(code: KeyCode) -> InputEvent {
    InputEvent::Key(KeyEvent::new(code, KeyModifiers::CTRL))
}

pub fn text(s: &str) -> Vec<InputEvent> {
    typed(s).collect()
}

pub fn repeat(ev: InputEvent, n: usize) -> Vec<InputEvent> {
    std::iter::repeat_n(ev, n).collect()
}

/// Concatenate script fragments.
pub fn seq(parts: Vec<Vec<InputEvent>>) -> Vec<InputEvent> {
    parts.into_iter().flatten().collect()
}

/// Run one read over `events`.
pub async fn read(
    ed: &mut Editor,
    events: Vec<InputEvent>,
) -> Result<Vec<String>, ReadError> {
    let mut keys = script(events);
    ed.read(&mut keys, &CancelToken::never()).await
}

pub fn lines(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

pub fn painted(ed: &Editor) -> String {
    String::from_utf8_lossy(ed.output()).into_owned()
}
