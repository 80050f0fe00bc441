use crate::key_token::map_key_event;
use core_events::InputEvent;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event as CEvent, EventStream,
    KeyEvent as CKeyEvent,
};
use std::io;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{debug, info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Spawn the terminal reader task. Bracketed paste is switched on for the lifetime of the task.
pub(crate) fn spawn_async_event_task(
    sender: Sender<InputEvent>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = task::spawn(async move {
        let span = tracing::debug_span!(target: "input.thread", "input_async_task");
        let _enter = span.enter();

        if let Err(join_err) = task::spawn_blocking(|| set_bracketed_paste(true)).await {
            debug!(target: "input.paste", ?join_err, "enable_failed_join");
        }

        let stream = EventStream::new();
        AsyncEventStreamTask::new(sender, stream, listener)
            .run()
            .await;

        if let Err(join_err) = task::spawn_blocking(|| set_bracketed_paste(false)).await {
            debug!(target: "input.paste", ?join_err, "disable_failed_join");
        }
    });

    (handle, shutdown)
}

fn set_bracketed_paste(on: bool) {
    let mut out = io::stdout();
    let res = if on {
        crossterm::execute!(out, EnableBracketedPaste)
    } else {
        crossterm::execute!(out, DisableBracketedPaste)
    };
    if let Err(e) = res {
        debug!(target: "input.paste", ?e, on, "toggle_failed");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    Running,
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Running => "running",
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<InputEvent>,
    stream: S,
    shutdown: ShutdownListener,
    exit_reason: ExitReason,
    stream_error: Option<io::ErrorKind>,
    forwarded: u64,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<InputEvent>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
            exit_reason: ExitReason::Running,
            stream_error: None,
            forwarded: 0,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        self.exit_reason = ExitReason::StreamEnded;
        loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => {
                    self.exit_reason = ExitReason::ShutdownSignal;
                    break;
                }
                result = self.stream.next() => result,
            };

            let Some(result) = maybe_result else {
                break;
            };

            let keep_going = match result {
                Ok(CEvent::Key(key)) => self.handle_key_event(key).await,
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.event", w, h, "resize");
                    self.send_event(InputEvent::Resize(w, h)).await
                }
                Ok(CEvent::Paste(data)) => {
                    trace!(target: "input.paste", len = data.len(), "paste_event");
                    self.send_event(InputEvent::Paste(data)).await
                }
                // Focus and mouse reports are not consumed by the editor.
                Ok(_) => true,
                Err(err) => {
                    self.exit_reason = ExitReason::StreamError;
                    self.stream_error = Some(err.kind());
                    false
                }
            };
            if !keep_going {
                break;
            }
        }

        let reason = match self.exit_reason {
            ExitReason::Running => ExitReason::StreamEnded,
            other => other,
        };

        if matches!(reason, ExitReason::StreamError) {
            if let Some(kind) = self.stream_error {
                warn!(target: "input.thread", error_kind = ?kind, "async_input_task_stream_error");
            } else {
                warn!(target: "input.thread", "async_input_task_stream_error");
            }
        }

        info!(
            target: "input.thread",
            reason = reason.as_str(),
            forwarded = self.forwarded,
            "async_input_task_stopped"
        );
    }

    async fn handle_key_event(&mut self, key: CKeyEvent) -> bool {
        let Some(mapped) = map_key_event(&key) else {
            return true;
        };
        trace!(
            target: "input.event",
            kind = "keypress",
            repeat = key.is_repeat(),
            mods = ?mapped.mods,
        );
        self.send_event(InputEvent::Key(mapped)).await
    }

    async fn send_event(&mut self, event: InputEvent) -> bool {
        match self.sender.send(event).await {
            Ok(()) => {
                self.forwarded += 1;
                true
            }
            Err(_) => {
                if !matches!(self.exit_reason, ExitReason::ShutdownSignal) {
                    self.exit_reason = ExitReason::ChannelClosed;
                }
                false
            }
        }
    }
}
