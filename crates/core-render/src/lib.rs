//! Rendering for the multi-line block: viewport, highlighting and the incremental painter.
//!
//! The block is painted with relative cursor motion only (up/down/right, carriage return,
//! `\r\n` to grow). The painter tracks which row the terminal cursor is on so any row can
//! be reached from any other without querying the terminal; only an explicit repaint uses
//! home + clear-screen.
//!
//! Components:
//! - `viewport`: vertical window onto the lines (`fix` keeps the cursor line visible).
//! - `color`: per-editor escape-sequence interning, compared by id while painting.
//! - `highlight`: ordered regex rules over the joined text, memoized on exact text.
//! - `writer`: batch of terminal commands flushed through crossterm.
//! - `painter`: row cache + `print_range` / `refresh_stale` / `repaint` / current-row paint.
//! - `status`: incremental-search status line.
//! - `listing`: completion candidate grid.

pub mod color;
pub mod highlight;
pub mod listing;
pub mod painter;
pub mod status;
pub mod viewport;
pub mod writer;

pub use color::{ColorId, ColorTable};
pub use highlight::{HighlightRule, Highlighter, LineColors};
pub use painter::{Frame, Painter, render_line};
pub use viewport::{Scroll, Viewport};
pub use writer::Writer;
