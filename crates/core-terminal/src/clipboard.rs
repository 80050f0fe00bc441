//! Clipboards used by kill / yank.
//!
//! An empty clipboard reads as `""`, never as an error.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard error: {0}")]
    System(#[from] arboard::Error),
}

pub trait Clipboard {
    fn read(&mut self) -> Result<String, ClipboardError>;
    fn write(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Process-local clipboard; the default for an editor.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    text: String,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Clipboard for MemoryClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        Ok(self.text.clone())
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.text.clear();
        self.text.push_str(text);
        Ok(())
    }
}

/// OS clipboard through `arboard`, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self { inner: None }
    }

    fn ensure(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        let clipboard = match self.inner.take() {
            Some(c) => c,
            None => {
                debug!(target: "runtime", "system_clipboard_open");
                arboard::Clipboard::new()?
            }
        };
        Ok(self.inner.insert(clipboard))
    }
}

impl Clipboard for SystemClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        match self.ensure()?.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.ensure()?.set_text(text.to_string())?;
        Ok(())
    }
}
