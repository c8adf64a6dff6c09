//! Message types for communication between the dashboard and its loader.
//!
//! - [`Command`]: sent from the UI loop to the [`LoadWorker`](super::LoadWorker)
//! - [`LoadEvent`]: sent back when a load finishes

use battview_types::{Telemetry, TimedRecord};

/// Requests handled by the background loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load the source again. Any load still in flight is cancelled.
    Reload { generation: u64 },
    /// Stop the worker.
    Shutdown,
}

/// Results reported by the background loader.
#[derive(Debug)]
pub enum LoadEvent {
    Loaded {
        generation: u64,
        records: Vec<TimedRecord<Telemetry>>,
    },
    Failed {
        generation: u64,
        error: String,
    },
}

impl LoadEvent {
    /// Generation of the request this event answers.
    pub fn generation(&self) -> u64 {
        match self {
            LoadEvent::Loaded { generation, .. } | LoadEvent::Failed { generation, .. } => {
                *generation
            }
        }
    }
}
