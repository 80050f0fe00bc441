//! Terminal input service: crossterm `EventStream` translated into [`InputEvent`]s.
//!
//! The editor never touches crossterm events directly; it pulls from the receiving end of the
//! channel handed to [`spawn_async_input`]. Tests use [`script`] to pre-fill a channel instead.

mod async_service;
mod key_token;

pub use async_service::AsyncInputShutdown;

use async_service::spawn_async_event_task;
use core_events::InputEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default capacity for the input channel between the reader task and the editor.
pub const INPUT_CHANNEL_CAPACITY: usize = 256;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: mpsc::Sender<InputEvent>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}

/// Build a closed, pre-filled event channel.
///
/// The receiver yields `events` in order and then reports end of stream.
pub fn script<I>(events: I) -> mpsc::UnboundedReceiver<InputEvent>
where
    I: IntoIterator<Item = InputEvent>,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let mut count = 0usize;
    for ev in events {
        if tx.send(ev).is_err() {
            break;
        }
        count += 1;
    }
    tracing::trace!(target: "input.script", count, "script_loaded");
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeySource, typed};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn script_replays_then_closes() {
        let mut rx = script(typed("ab"));
        let mut seen = Vec::new();
        while let Some(ev) = rx.next_event().await {
            seen.push(ev);
        }
        assert_eq!(seen, typed("ab").collect::<Vec<_>>());
    }
}
