//! core-keymap: key chord → editor command resolution.
//!
//! Design principles:
//! - Fixed command vocabulary ([`Command`]); the engine matches on it exhaustively.
//! - Pure and deterministic: resolution depends only on the key and the table.
//! - Later bindings override earlier ones for the same key (logged at TRACE).
//! - Printable keys with no binding resolve to [`Resolution::SelfInsert`].
//!
//! Command and key names are textual (`C_J`, `M_P`, `SUBMIT`) so bindings can be supplied
//! from configuration.

use ahash::AHashMap;
use core_events::{KeyCode, KeyEvent, KeyModifiers, KeyParseError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

// -------------------------------------------------------------------------------------------------
// Commands
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    BackwardChar,
    ForwardChar,
    BackwardWord,
    ForwardWord,
    BeginningOfLine,
    EndOfLine,
    BackwardDeleteChar,
    DeleteChar,
    DeleteOrEof,
    KillLine,
    UnixLineDiscard,
    UnixWordRubout,
    Yank,
    NewLine,
    Submit,
    PreviousLine,
    NextLine,
    PreviousHistory,
    NextHistory,
    IsearchBackward,
    Repaint,
    Complete,
    Interrupt,
}

const COMMAND_NAMES: &[(Command, &str)] = &[
    (Command::BackwardChar, "BACKWARD_CHAR"),
    (Command::ForwardChar, "FORWARD_CHAR"),
    (Command::BackwardWord, "BACKWARD_WORD"),
    (Command::ForwardWord, "FORWARD_WORD"),
    (Command::BeginningOfLine, "BEGINNING_OF_LINE"),
    (Command::EndOfLine, "END_OF_LINE"),
    (Command::BackwardDeleteChar, "BACKWARD_DELETE_CHAR"),
    (Command::DeleteChar, "DELETE_CHAR"),
    (Command::DeleteOrEof, "DELETE_OR_EOF"),
    (Command::KillLine, "KILL_LINE"),
    (Command::UnixLineDiscard, "UNIX_LINE_DISCARD"),
    (Command::UnixWordRubout, "UNIX_WORD_RUBOUT"),
    (Command::Yank, "YANK"),
    (Command::NewLine, "NEWLINE"),
    (Command::Submit, "SUBMIT"),
    (Command::PreviousLine, "PREVIOUS_LINE"),
    (Command::NextLine, "NEXT_LINE"),
    (Command::PreviousHistory, "PREVIOUS_HISTORY"),
    (Command::NextHistory, "NEXT_HISTORY"),
    (Command::IsearchBackward, "ISEARCH_BACKWARD"),
    (Command::Repaint, "REPAINT"),
    (Command::Complete, "COMPLETE"),
    (Command::Interrupt, "INTERRUPT"),
];

impl Command {
    pub fn name(self) -> &'static str {
        COMMAND_NAMES
            .iter()
            .find(|(c, _)| *c == self)
            .map(|(_, n)| *n)
            .unwrap_or("UNKNOWN")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        COMMAND_NAMES
            .iter()
            .find(|(_, n)| *n == wanted)
            .map(|(c, _)| *c)
            .ok_or_else(|| KeymapError::UnknownCommand(s.to_string()))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeymapError {
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
}

impl From<KeyParseError> for KeymapError {
    fn from(e: KeyParseError) -> Self {
        KeymapError::UnknownKey(e.0)
    }
}

// -------------------------------------------------------------------------------------------------
// Bindings
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub key: KeyEvent,
    pub command: Command,
}

/// Default emacs-style bindings.
pub fn default_bindings() -> Vec<Binding> {
    use Command as C;
    let plain = KeyEvent::plain;
    let ctrl = KeyEvent::ctrl;
    let alt = KeyEvent::alt;
    let chord = |code, mods| KeyEvent::new(code, mods);
    let table = [
        (plain(KeyCode::Left), C::BackwardChar),
        (ctrl('b'), C::BackwardChar),
        (plain(KeyCode::Right), C::ForwardChar),
        (ctrl('f'), C::ForwardChar),
        (alt('b'), C::BackwardWord),
        (alt('f'), C::ForwardWord),
        (plain(KeyCode::Home), C::BeginningOfLine),
        (ctrl('a'), C::BeginningOfLine),
        (plain(KeyCode::End), C::EndOfLine),
        (ctrl('e'), C::EndOfLine),
        (plain(KeyCode::Backspace), C::BackwardDeleteChar),
        (ctrl('h'), C::BackwardDeleteChar),
        (plain(KeyCode::Delete), C::DeleteChar),
        (ctrl('d'), C::DeleteOrEof),
        (ctrl('k'), C::KillLine),
        (ctrl('u'), C::UnixLineDiscard),
        (ctrl('w'), C::UnixWordRubout),
        (ctrl('y'), C::Yank),
        (plain(KeyCode::Enter), C::NewLine),
        (ctrl('m'), C::NewLine),
        (ctrl('j'), C::Submit),
        (chord(KeyCode::Enter, KeyModifiers::CTRL), C::Submit),
        (chord(KeyCode::Enter, KeyModifiers::ALT), C::Submit),
        (plain(KeyCode::Up), C::PreviousLine),
        (ctrl('p'), C::PreviousLine),
        (plain(KeyCode::Down), C::NextLine),
        (ctrl('n'), C::NextLine),
        (chord(KeyCode::Up, KeyModifiers::CTRL), C::PreviousHistory),
        (alt('p'), C::PreviousHistory),
        (chord(KeyCode::Down, KeyModifiers::CTRL), C::NextHistory),
        (alt('n'), C::NextHistory),
        (ctrl('r'), C::IsearchBackward),
        (ctrl('l'), C::Repaint),
        (plain(KeyCode::Tab), C::Complete),
        (ctrl('i'), C::Complete),
        (ctrl('c'), C::Interrupt),
    ];
    table
        .into_iter()
        .map(|(key, command)| Binding { key, command })
        .collect()
}

// -------------------------------------------------------------------------------------------------
// Resolution
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Command(Command),
    SelfInsert(char),
    Unbound,
}

#[derive(Debug, Clone)]
pub struct Keymap {
    table: AHashMap<KeyEvent, Command>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::build(default_bindings())
    }
}

impl Keymap {
    /// An empty keymap (every printable key self-inserts, nothing else is bound).
    pub fn empty() -> Self {
        Self {
            table: AHashMap::new(),
        }
    }

    pub fn build(bindings: impl IntoIterator<Item = Binding>) -> Self {
        let mut map = Self::empty();
        for b in bindings {
            map.bind(b.key, b.command);
        }
        map
    }

    pub fn bind(&mut self, key: KeyEvent, command: Command) {
        let key = key.normalized();
        if let Some(prev) = self.table.insert(key, command) {
            trace!(target: "input.map", key = %key, prev = %prev, now = %command, "binding_override");
        }
    }

    /// Bind from textual names, e.g. `("C_O", "SUBMIT")`.
    pub fn bind_named(&mut self, key: &str, command: &str) -> Result<(), KeymapError> {
        let key: KeyEvent = key.parse()?;
        let command: Command = command.parse()?;
        self.bind(key, command);
        Ok(())
    }

    pub fn resolve(&self, key: &KeyEvent) -> Resolution {
        let key = key.normalized();
        if let Some(cmd) = self.table.get(&key) {
            return Resolution::Command(*cmd);
        }
        match key.printable() {
            Some(c) => Resolution::SelfInsert(c),
            None => Resolution::Unbound,
        }
    }

    /// Keys bound to `command`, in no particular order.
    pub fn keys_for(&self, command: Command) -> Vec<KeyEvent> {
        self.table
            .iter()
            .filter(|(_, c)| **c == command)
            .map(|(k, _)| *k)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_cover_navigation_and_submit() {
        let map = Keymap::default();
        assert_eq!(
            map.resolve(&KeyEvent::plain(KeyCode::Up)),
            Resolution::Command(Command::PreviousLine)
        );
        assert_eq!(
            map.resolve(&KeyEvent::ctrl('J')),
            Resolution::Command(Command::Submit)
        );
        assert_eq!(
            map.resolve(&KeyEvent::new(KeyCode::Down, KeyModifiers::CTRL)),
            Resolution::Command(Command::NextHistory)
        );
        assert_eq!(
            map.resolve(&KeyEvent::plain(KeyCode::Enter)),
            Resolution::Command(Command::NewLine)
        );
    }

    #[test]
    fn printable_keys_self_insert() {
        let map = Keymap::default();
        assert_eq!(
            map.resolve(&KeyEvent::plain(KeyCode::Char('x'))),
            Resolution::SelfInsert('x')
        );
        assert_eq!(map.resolve(&KeyEvent::ctrl('q')), Resolution::Unbound);
    }

    #[test]
    fn later_binding_overrides() {
        let mut map = Keymap::default();
        map.bind_named("C_J", "NEWLINE").unwrap();
        map.bind_named("ENTER", "submit").unwrap();
        assert_eq!(
            map.resolve(&KeyEvent::ctrl('j')),
            Resolution::Command(Command::NewLine)
        );
        assert_eq!(
            map.resolve(&KeyEvent::plain(KeyCode::Enter)),
            Resolution::Command(Command::Submit)
        );
    }

    #[test]
    fn bad_names_are_errors() {
        let mut map = Keymap::empty();
        assert_eq!(
            map.bind_named("C_NOPE", "SUBMIT"),
            Err(KeymapError::UnknownKey("C_NOPE".into()))
        );
        assert_eq!(
            map.bind_named("C_O", "LAUNCH_ROCKETS"),
            Err(KeymapError::UnknownCommand("LAUNCH_ROCKETS".into()))
        );
    }

    #[test]
    fn command_names_round_trip() {
        for (cmd, name) in COMMAND_NAMES {
            assert_eq!(cmd.to_string(), *name);
            assert_eq!(name.parse::<Command>().unwrap(), *cmd);
        }
    }
}
