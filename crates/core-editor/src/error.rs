use core_keymap::KeymapError;
use std::io;
use thiserror::Error;

/// Why [`crate::MultiLineEditor::read`] returned without lines.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("read cancelled")]
    Cancelled,
    /// The delete-or-EOF key on an empty buffer.
    #[error("end of input")]
    EndOfInput,
    #[error("input stream closed")]
    InputClosed,
    #[error("terminal i/o: {0}")]
    Io(#[from] io::Error),
}

/// Configuration rejected before any interactive use.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Keymap(#[from] KeymapError),
    #[error("invalid highlight pattern: {0}")]
    Pattern(#[from] regex::Error),
}
