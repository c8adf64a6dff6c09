//! Pipeline diagnostics counters.
//!
//! Parse failures and window clamps are recovered locally and never abort
//! a recompute pass. They are counted here so they stay observable.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Snapshot of [`PipelineMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Completed recompute passes.
    pub passes: u64,
    /// Records whose timestamp was parsed (successfully or not).
    pub stamped: u64,
    /// Timestamps that matched no supported format.
    pub parse_failures: u64,
    /// Records excluded by an active range filter.
    pub filtered_out: u64,
    /// Labels that fell back to the raw timestamp string.
    pub raw_labels: u64,
    /// Window requests that had to be clamped.
    pub clamps: u64,
}

impl PipelineStats {
    /// Fraction of stamped records that failed to parse.
    pub fn failure_rate(&self) -> Option<f64> {
        if self.stamped == 0 {
            None
        } else {
            Some(self.parse_failures as f64 / self.stamped as f64)
        }
    }
}

/// Thread-safe counters shared by a pipeline and its window controller.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    passes: AtomicU64,
    stamped: AtomicU64,
    parse_failures: AtomicU64,
    filtered_out: AtomicU64,
    raw_labels: AtomicU64,
    clamps: AtomicU64,
}

impl PipelineMetrics {
    /// Create new empty metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create shared metrics.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub(crate) fn record_pass(&self) {
        self.passes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stamped(&self, count: u64) {
        self.stamped.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_filtered_out(&self, count: u64) {
        self.filtered_out.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_raw_label(&self) {
        self.raw_labels.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_clamp(&self) {
        self.clamps.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of the current counters.
    pub fn snapshot(&self) -> PipelineStats {
        PipelineStats {
            passes: self.passes.load(Ordering::Relaxed),
            stamped: self.stamped.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            filtered_out: self.filtered_out.load(Ordering::Relaxed),
            raw_labels: self.raw_labels.load(Ordering::Relaxed),
            clamps: self.clamps.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.passes.store(0, Ordering::Relaxed);
        self.stamped.store(0, Ordering::Relaxed);
        self.parse_failures.store(0, Ordering::Relaxed);
        self.filtered_out.store(0, Ordering::Relaxed);
        self.raw_labels.store(0, Ordering::Relaxed);
        self.clamps.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_start_empty() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.snapshot(), PipelineStats::default());
        assert_eq!(metrics.snapshot().failure_rate(), None);
    }

    #[test]
    fn test_metrics_record_and_reset() {
        let metrics = PipelineMetrics::shared();
        metrics.record_pass();
        metrics.record_stamped(4);
        metrics.record_parse_failure();
        metrics.record_filtered_out(2);
        metrics.record_raw_label();
        metrics.record_clamp();
        metrics.record_clamp();

        let stats = metrics.snapshot();
        assert_eq!(stats.passes, 1);
        assert_eq!(stats.stamped, 4);
        assert_eq!(stats.parse_failures, 1);
        assert_eq!(stats.filtered_out, 2);
        assert_eq!(stats.raw_labels, 1);
        assert_eq!(stats.clamps, 2);
        assert_eq!(stats.failure_rate(), Some(0.25));

        metrics.reset();
        assert_eq!(metrics.snapshot(), PipelineStats::default());
    }

    #[test]
    fn test_stats_serialization() {
        let stats = PipelineStats {
            parse_failures: 3,
            ..Default::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"parse_failures\":3"));
    }
}
