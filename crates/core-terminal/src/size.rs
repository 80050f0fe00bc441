//! Terminal size query.

use tracing::warn;

/// Size assumed when the output is not a terminal (pipes, CI).
pub const FALLBACK_SIZE: (u16, u16) = (80, 25);

/// Current `(columns, rows)`, falling back to [`FALLBACK_SIZE`] when the query fails or
/// reports a zero dimension.
pub fn terminal_size() -> (u16, u16) {
    match crossterm::terminal::size() {
        Ok((cols, rows)) => sanitize(cols, rows),
        Err(e) => {
            warn!(target: "runtime", error = %e, "terminal_size_failed");
            FALLBACK_SIZE
        }
    }
}

fn sanitize(cols: u16, rows: u16) -> (u16, u16) {
    if cols == 0 || rows == 0 {
        FALLBACK_SIZE
    } else {
        (cols, rows)
    }
}
