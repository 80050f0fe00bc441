//! Terminal backend: raw mode, size query and clipboards.
//!
//! The editor paints inline, below whatever the shell printed before it, so the backend
//! only toggles raw mode. There is no alternate screen.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{SetTitle, disable_raw_mode, enable_raw_mode},
};
use std::io::stdout;
use tracing::debug;

pub mod clipboard;
pub mod size;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, SystemClipboard};
pub use size::{FALLBACK_SIZE, terminal_size};

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
}

pub struct CrosstermBackend {
    entered: bool,
}

/// RAII guard restoring cooked mode even if the caller early-returns or panics.
pub struct RawModeGuard<'a> {
    backend: &'a mut CrosstermBackend,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Enter raw mode and return a guard that leaves it on drop.
    pub fn enter_guard(&mut self) -> Result<RawModeGuard<'_>> {
        self.enter()?;
        Ok(RawModeGuard { backend: self })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            self.entered = true;
            debug!(target: "runtime", "raw_mode_on");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            disable_raw_mode()?;
            self.entered = false;
            debug!(target: "runtime", "raw_mode_off");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl Drop for RawModeGuard<'_> {
    fn drop(&mut self) {
        let _ = self.backend.leave();
    }
}
