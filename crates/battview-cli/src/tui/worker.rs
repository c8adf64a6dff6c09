//! Background worker that loads the record source.
//!
//! Loading and decoding can take a while for large exports, so it runs off
//! the UI loop. The worker receives [`Command`]s over a channel and reports
//! [`LoadEvent`]s back. A new reload cancels the one in flight; every event
//! carries the generation of the request it answers so the UI can drop
//! stale results.

use anyhow::Result;
use battview_types::{Telemetry, TimedRecord};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::messages::{Command, LoadEvent};
use crate::source::SourceSpec;

/// Something the worker can load records from.
///
/// `load` runs on a blocking thread.
pub trait RecordLoader: Clone + Send + Sync + 'static {
    /// Name used in log messages.
    fn describe(&self) -> &str;

    /// Read and decode the records.
    fn load(&self) -> Result<Vec<TimedRecord<Telemetry>>>;
}

impl RecordLoader for SourceSpec {
    fn describe(&self) -> &str {
        &self.location
    }

    fn load(&self) -> Result<Vec<TimedRecord<Telemetry>>> {
        SourceSpec::load(self)
    }
}

/// Loads records on request.
pub struct LoadWorker<L = SourceSpec> {
    command_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<LoadEvent>,
    loader: L,
    /// Token of the load currently in flight.
    cancel_token: CancellationToken,
}

impl<L: RecordLoader> LoadWorker<L> {
    pub fn new(
        command_rx: mpsc::Receiver<Command>,
        event_tx: mpsc::Sender<LoadEvent>,
        loader: L,
    ) -> Self {
        Self {
            command_rx,
            event_tx,
            loader,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Run until [`Command::Shutdown`] is received or the channel closes.
    pub async fn run(mut self) {
        info!(source = %self.loader.describe(), "LoadWorker started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                Command::Reload { generation } => self.handle_reload(generation),
                Command::Shutdown => {
                    info!("LoadWorker received shutdown command");
                    break;
                }
            }
        }

        self.cancel_token.cancel();
        info!("LoadWorker stopped");
    }

    fn handle_reload(&mut self, generation: u64) {
        // Supersede whatever is still loading
        self.cancel_token.cancel();
        self.cancel_token = CancellationToken::new();
        let cancel_token = self.cancel_token.clone();

        let loader = self.loader.clone();
        let event_tx = self.event_tx.clone();
        debug!(generation, "Starting load");

        tokio::spawn(async move {
            let load = tokio::task::spawn_blocking(move || loader.load());
            let event = tokio::select! {
                result = load => match result {
                    Ok(Ok(records)) => LoadEvent::Loaded { generation, records },
                    Ok(Err(e)) => {
                        warn!(generation, "Load failed: {:#}", e);
                        LoadEvent::Failed { generation, error: format!("{:#}", e) }
                    }
                    Err(e) => {
                        error!(generation, "Load task panicked: {}", e);
                        LoadEvent::Failed { generation, error: e.to_string() }
                    }
                },
                _ = cancel_token.cancelled() => {
                    debug!(generation, "Load superseded");
                    return;
                }
            };
            if let Err(e) = event_tx.send(event).await {
                error!("Failed to send load event: {}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, mpsc as std_mpsc};
    use std::time::Duration;

    /// Loader whose first call blocks until the gate is opened.
    #[derive(Clone)]
    struct GatedLoader {
        calls: Arc<AtomicUsize>,
        gate: Arc<Mutex<std_mpsc::Receiver<()>>>,
    }

    impl GatedLoader {
        fn new() -> (Self, std_mpsc::Sender<()>) {
            let (open_tx, open_rx) = std_mpsc::channel();
            let loader = Self {
                calls: Arc::new(AtomicUsize::new(0)),
                gate: Arc::new(Mutex::new(open_rx)),
            };
            (loader, open_tx)
        }
    }

    impl RecordLoader for GatedLoader {
        fn describe(&self) -> &str {
            "gated"
        }

        fn load(&self) -> Result<Vec<TimedRecord<Telemetry>>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                let _ = self.gate.lock().unwrap().recv();
            }
            Ok(vec![TimedRecord::new(
                format!("call-{}", call),
                Telemetry::default(),
            )])
        }
    }

    fn spawn_worker<L: RecordLoader>(
        loader: L,
    ) -> (mpsc::Sender<Command>, mpsc::Receiver<LoadEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, event_rx) = mpsc::channel(8);
        tokio::spawn(LoadWorker::new(cmd_rx, event_tx, loader).run());
        (cmd_tx, event_rx)
    }

    #[tokio::test]
    async fn test_reload_loads_records() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"time":"2024-01-02T08:00:00","soc":50}},{{"time":"2024-01-01T08:00:00","soc":60}}]"#
        )
        .unwrap();

        let source = SourceSpec::new(file.path().to_string_lossy(), None);
        let (cmd_tx, mut event_rx) = spawn_worker(source);
        cmd_tx.send(Command::Reload { generation: 1 }).await.unwrap();

        match event_rx.recv().await.unwrap() {
            LoadEvent::Loaded { generation, records } => {
                assert_eq!(generation, 1);
                assert_eq!(records.len(), 2);
                assert_eq!(records[0].time, "2024-01-01T08:00:00");
            }
            LoadEvent::Failed { error, .. } => panic!("unexpected failure: {}", error),
        }
        cmd_tx.send(Command::Shutdown).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let source = SourceSpec::new(path.to_string_lossy(), None);
        let (cmd_tx, mut event_rx) = spawn_worker(source);
        cmd_tx.send(Command::Reload { generation: 7 }).await.unwrap();

        let event = event_rx.recv().await.unwrap();
        assert_eq!(event.generation(), 7);
        assert!(matches!(event, LoadEvent::Failed { .. }));
    }

    #[tokio::test]
    async fn test_worker_stops_when_channel_closes() {
        let (cmd_tx, cmd_rx) = mpsc::channel(1);
        let (event_tx, _event_rx) = mpsc::channel(1);
        let handle = tokio::spawn(
            LoadWorker::new(cmd_rx, event_tx, SourceSpec::new("unused.json", None)).run(),
        );
        drop(cmd_tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_newer_reload_cancels_load_in_flight() {
        let (loader, open_gate) = GatedLoader::new();
        let calls = Arc::clone(&loader.calls);
        let (cmd_tx, mut event_rx) = spawn_worker(loader);

        cmd_tx.send(Command::Reload { generation: 1 }).await.unwrap();
        while calls.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        cmd_tx.send(Command::Reload { generation: 2 }).await.unwrap();
        match event_rx.recv().await.unwrap() {
            LoadEvent::Loaded { generation, records } => {
                assert_eq!(generation, 2);
                assert_eq!(records[0].time, "call-1");
            }
            LoadEvent::Failed { error, .. } => panic!("unexpected failure: {}", error),
        }

        // The first load finishes only now; its result must never arrive.
        open_gate.send(()).unwrap();
        let late = tokio::time::timeout(Duration::from_millis(200), event_rx.recv()).await;
        assert!(late.is_err(), "superseded load produced {:?}", late);

        cmd_tx.send(Command::Shutdown).await.unwrap();
    }
}
