//! Interactive terminal dashboard.
//!
//! The dashboard draws the windowed view of a record source and lets the
//! user scroll, zoom and change the date and time-of-day range. Loading
//! runs on a background [`LoadWorker`]; the UI loop polls for key events
//! every 100ms and drains load events without blocking.

pub mod app;
pub mod input;
pub mod messages;
pub mod ui;
pub mod worker;

pub use app::App;
pub use messages::{Command, LoadEvent};
pub use worker::{LoadWorker, RecordLoader};

use std::fs::File;
use std::io::{self, stdout};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use battview_types::{ViewState, Window};
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::WindowConfig;
use crate::source::SourceSpec;

/// Environment variable naming a file to write dashboard logs to.
pub const LOG_ENV: &str = "BATTVIEW_LOG";

/// What the dashboard shows on start.
#[derive(Debug, Clone)]
pub struct TuiOptions {
    pub source: SourceSpec,
    /// Initial date interval and time-of-day bound.
    pub initial: ViewState,
    pub window: WindowConfig,
}

/// Set up the terminal for TUI rendering.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Log to the file named by [`LOG_ENV`], if set.
///
/// The dashboard owns the terminal, so it never logs to stderr.
pub fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV).filter(|p| !p.is_empty()) else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.to_string_lossy()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    // Another subscriber may already be installed by the CLI
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

/// Run the dashboard until the user quits.
pub async fn run(options: TuiOptions) -> Result<()> {
    let TuiOptions {
        source,
        initial,
        window,
    } = options;
    if source.is_stdin() {
        bail!("The dashboard cannot read records from stdin. Pass a .json or .csv file");
    }
    source.resolved_format()?;
    let policy = window.policy()?;

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(32);
    let (event_tx, mut event_rx) = mpsc::channel::<LoadEvent>(32);

    let worker = LoadWorker::new(cmd_rx, event_tx, source.clone());
    let worker_handle = tokio::spawn(worker.run());

    let initial = initial.with_window(Window::new(0, window.default_size));
    let mut app = App::new(source.label(), policy, window.large_zoom_step, initial);
    info!(source = %source.location, "Starting dashboard");

    let mut terminal = setup_terminal()?;

    let _ = cmd_tx.try_send(app.request_reload());

    let result = run_event_loop(&mut terminal, &mut app, &cmd_tx, &mut event_rx).await;

    let _ = cmd_tx.try_send(Command::Shutdown);

    restore_terminal()?;

    let _ = worker_handle.await;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    command_tx: &mpsc::Sender<Command>,
    event_rx: &mut mpsc::Receiver<LoadEvent>,
) -> Result<()> {
    while !app.should_quit() {
        app.clean_expired_messages();

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let action = input::handle_key(key.code, app.show_help);
            if let Some(cmd) = input::apply_action(app, action) {
                let _ = command_tx.try_send(cmd);
            }
        }

        while let Ok(event) = event_rx.try_recv() {
            app.handle_load_event(event);
        }
    }

    Ok(())
}
