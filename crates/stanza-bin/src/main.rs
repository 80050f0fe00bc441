//! Stanza entrypoint: a small multi-line REPL that echoes each submitted block.
use anyhow::Result;
use clap::Parser;
use core_config::{Config, load_from};
use core_editor::{MemoryClipboard, MultiLineEditor, ReadError, SystemClipboard};
use core_events::{CancelHandle, CancelToken, InputEvent, cancellation};
use core_input::{AsyncInputShutdown, INPUT_CHANNEL_CAPACITY};
use core_state::MemoryHistory;
use core_terminal::{CrosstermBackend, TerminalBackend};
use std::cell::RefCell;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "stanza.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "stanza", version, about = "Multi-line line editor demo")]
struct Args {
    /// Optional configuration file path (overrides discovery of `stanza.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Keep kills and yanks inside the process instead of using the OS clipboard.
    #[arg(long = "no-system-clipboard")]
    pub no_system_clipboard: bool,
    /// Give up on a read after this many seconds.
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        // An already installed global subscriber keeps its writer; the guard is dropped.
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

struct Repl {
    editor: MultiLineEditor<Stdout>,
    history: Rc<RefCell<MemoryHistory>>,
    keys: mpsc::Receiver<InputEvent>,
    timeout: Option<Duration>,
}

impl Repl {
    fn new(config: &Config, args: &Args, keys: mpsc::Receiver<InputEvent>) -> Result<Self> {
        let history = Rc::new(RefCell::new(match config.file.history.limit {
            Some(limit) => MemoryHistory::with_limit(limit),
            None => MemoryHistory::new(),
        }));
        let mut editor = MultiLineEditor::new(io::stdout());
        editor.set_history(Box::new(Rc::clone(&history)), config.file.history.cycling);
        if args.no_system_clipboard {
            editor.set_clipboard(Box::new(MemoryClipboard::new()));
        } else {
            editor.set_clipboard(Box::new(SystemClipboard::new()));
        }
        config.apply(&mut editor)?;
        Ok(Self {
            editor,
            history,
            keys,
            timeout: args.timeout.map(Duration::from_secs),
        })
    }

    async fn run(&mut self) -> Result<()> {
        loop {
            let (token, timer) = self.arm_timeout();
            let result = self.editor.read(&mut self.keys, &token).await;
            if let Some(timer) = timer {
                timer.abort();
            }
            match result {
                Ok(lines) => {
                    echo(self.editor.output_mut(), &lines)?;
                    self.history.borrow_mut().push(lines.join("\n"));
                }
                Err(ReadError::EndOfInput) => {
                    info!(target: "runtime", "end_of_input");
                    return Ok(());
                }
                Err(ReadError::InputClosed) => {
                    warn!(target: "runtime", "input_closed");
                    return Ok(());
                }
                Err(ReadError::Cancelled) => {
                    info!(target: "runtime", "read_timed_out");
                    return Ok(());
                }
                Err(ReadError::Io(e)) => {
                    error!(target: "runtime", error = %e, "terminal_io_failed");
                    return Err(e.into());
                }
            }
        }
    }

    fn arm_timeout(&self) -> (CancelToken, Option<JoinHandle<()>>) {
        let Some(after) = self.timeout else {
            return (CancelToken::never(), None);
        };
        let (handle, token) = cancellation();
        (token, Some(tokio::spawn(cancel_after(handle, after))))
    }
}

async fn cancel_after(handle: CancelHandle, after: Duration) {
    tokio::time::sleep(after).await;
    handle.cancel();
}

/// Print a submitted block back, one row per line. Raw mode needs explicit `\r`.
fn echo<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        write!(out, "{line}\r\n")?;
    }
    out.flush()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let config = load_from(args.config.clone())?;
    let (tx, rx) = mpsc::channel::<InputEvent>(INPUT_CHANNEL_CAPACITY);
    let mut repl = Repl::new(&config, &args, rx)?;

    startup.backend.set_title("Stanza")?;
    let guard = startup.backend.enter_guard()?;
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx);
    let outcome = repl.run().await;
    shutdown_input(input_task, input_shutdown).await;
    drop(guard);

    info!(target: "runtime", records = repl.history.borrow().entries().len(), "shutdown");
    outcome
}

async fn shutdown_input(task: JoinHandle<()>, shutdown: AsyncInputShutdown) {
    shutdown.signal();
    if let Err(e) = task.await {
        warn!(target: "input.thread", error = %e, "input_task_join_failed");
    }
}
