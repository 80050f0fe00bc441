//! Core input event types, key sources and cancellation for Stanza.
//!
//! Everything the editor consumes from the outside world arrives as an
//! [`InputEvent`] pulled from a [`KeySource`]. The only suspension point of a
//! read is "wait for the next event", so that wait is also where external
//! cancellation is observed ([`wait_event`]).
//!
//! Invariants:
//! * A `KeySource` returning `None` means the stream is closed for good.
//! * A fired [`CancelToken`] stays fired; every later wait returns
//!   [`WaitError::Cancelled`] immediately.
//! * Key names (`C_A`, `M_P`, `C_UP`, ...) round-trip through `Display` /
//!   `FromStr` so keymaps can be configured from text.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Logical key press (press or auto-repeat).
    Key(KeyEvent),
    /// Bracketed paste payload (never logged verbatim; log `len()` only).
    Paste(String),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

/// Logical key identity. Printable keys are always `Char`; control chords are
/// `Char` + `KeyModifiers::CTRL` (so Ctrl-A is `Char('a')` with CTRL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Key without modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Ctrl chord on a letter; the letter is stored lower-case.
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c.to_ascii_lowercase()), KeyModifiers::CTRL)
    }

    /// Alt (meta) chord on a character.
    pub const fn alt(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::ALT)
    }

    /// Returns the character to insert for a printable key, `None` for chords and named keys.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c)
                if !self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT)
                    && !c.is_control() =>
            {
                Some(c)
            }
            _ => None,
        }
    }

    /// Normalize SHIFT away for printable characters (the character already carries case).
    pub fn normalized(self) -> Self {
        match self.code {
            KeyCode::Char(c) if self.mods.contains(KeyModifiers::CTRL) => Self {
                code: KeyCode::Char(c.to_ascii_lowercase()),
                mods: self.mods - KeyModifiers::SHIFT,
            },
            KeyCode::Char(_) => Self {
                code: self.code,
                mods: self.mods - KeyModifiers::SHIFT,
            },
            _ => self,
        }
    }
}

/// Build the key events for typing `text` (a `\r` or `\n` becomes Enter, `\t` Tab).
pub fn typed(text: &str) -> impl Iterator<Item = InputEvent> + '_ {
    text.chars().map(|c| {
        let key = match c {
            '\r' | '\n' => KeyEvent::plain(KeyCode::Enter),
            '\t' => KeyEvent::plain(KeyCode::Tab),
            other => KeyEvent::plain(KeyCode::Char(other)),
        };
        InputEvent::Key(key)
    })
}

impl From<KeyEvent> for InputEvent {
    fn from(key: KeyEvent) -> Self {
        InputEvent::Key(key)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(KeyModifiers::CTRL) {
            f.write_str("C_")?;
        }
        if self.mods.contains(KeyModifiers::ALT) {
            f.write_str("M_")?;
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            f.write_str("S_")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("SPACE"),
            KeyCode::Char(c) if self.mods.contains(KeyModifiers::CTRL) => {
                write!(f, "{}", c.to_ascii_uppercase())
            }
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Enter => f.write_str("ENTER"),
            KeyCode::Esc => f.write_str("ESC"),
            KeyCode::Backspace => f.write_str("BACKSPACE"),
            KeyCode::Tab => f.write_str("TAB"),
            KeyCode::Up => f.write_str("UP"),
            KeyCode::Down => f.write_str("DOWN"),
            KeyCode::Left => f.write_str("LEFT"),
            KeyCode::Right => f.write_str("RIGHT"),
            KeyCode::Home => f.write_str("HOME"),
            KeyCode::End => f.write_str("END"),
            KeyCode::Delete => f.write_str("DEL"),
            KeyCode::PageUp => f.write_str("PAGEUP"),
            KeyCode::PageDown => f.write_str("PAGEDOWN"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown key name `{0}`")]
pub struct KeyParseError(pub String);

impl FromStr for KeyEvent {
    type Err = KeyParseError;

    /// Parse names such as `C_J`, `M_P`, `C_UP`, `ENTER`, `x`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mods = KeyModifiers::empty();
        let mut rest = s.trim();
        loop {
            let upper = rest.to_ascii_uppercase();
            if upper.starts_with("C_") && rest.len() > 2 {
                mods |= KeyModifiers::CTRL;
            } else if upper.starts_with("M_") && rest.len() > 2 {
                mods |= KeyModifiers::ALT;
            } else if upper.starts_with("S_") && rest.len() > 2 {
                mods |= KeyModifiers::SHIFT;
            } else {
                break;
            }
            rest = &rest[2..];
        }
        let code = match rest.to_ascii_uppercase().as_str() {
            "ENTER" | "RETURN" => KeyCode::Enter,
            "ESC" | "ESCAPE" => KeyCode::Esc,
            "BACKSPACE" | "BS" => KeyCode::Backspace,
            "TAB" => KeyCode::Tab,
            "UP" => KeyCode::Up,
            "DOWN" => KeyCode::Down,
            "LEFT" => KeyCode::Left,
            "RIGHT" => KeyCode::Right,
            "HOME" => KeyCode::Home,
            "END" => KeyCode::End,
            "DEL" | "DELETE" => KeyCode::Delete,
            "PAGEUP" => KeyCode::PageUp,
            "PAGEDOWN" => KeyCode::PageDown,
            "SPACE" => KeyCode::Char(' '),
            _ => {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if mods.contains(KeyModifiers::CTRL) => {
                        KeyCode::Char(c.to_ascii_lowercase())
                    }
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(KeyParseError(s.to_string())),
                }
            }
        };
        Ok(KeyEvent::new(code, mods))
    }
}

// -------------------------------------------------------------------------------------------------
// Key sources
// -------------------------------------------------------------------------------------------------

/// Anything that can hand the editor its next input event.
///
/// The terminal implementation is an mpsc receiver fed by the `core-input` task; tests feed a
/// pre-filled channel. Returning `None` signals end of stream.
pub trait KeySource {
    fn next_event(&mut self) -> impl Future<Output = Option<InputEvent>>;
}

impl KeySource for mpsc::Receiver<InputEvent> {
    fn next_event(&mut self) -> impl Future<Output = Option<InputEvent>> {
        self.recv()
    }
}

impl KeySource for mpsc::UnboundedReceiver<InputEvent> {
    fn next_event(&mut self) -> impl Future<Output = Option<InputEvent>> {
        self.recv()
    }
}

// -------------------------------------------------------------------------------------------------
// Cancellation
// -------------------------------------------------------------------------------------------------

/// Owner side of a cancellation pair. Cloning shares the same signal.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
        tracing::debug!(target: "input.cancel", "cancel_signalled");
    }
}

/// Observer side of a cancellation pair, checked at every blocking key wait.
#[derive(Clone, Debug)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

/// Create a linked handle/token pair.
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: Arc::new(tx) }, CancelToken { rx })
}

impl CancelToken {
    /// A token that can never fire.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the paired handle cancels; pends forever when the handle is gone.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum WaitError {
    #[error("operation cancelled")]
    Cancelled,
    #[error("input stream closed")]
    Closed,
}

/// Wait for the next event, racing the cancellation token.
pub async fn wait_event<K: KeySource>(
    keys: &mut K,
    cancel: &CancelToken,
) -> Result<InputEvent, WaitError> {
    if cancel.is_cancelled() {
        return Err(WaitError::Cancelled);
    }
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(WaitError::Cancelled),
        ev = keys.next_event() => ev.ok_or(WaitError::Closed),
    }
}
