//! The single recompute pass.
//!
//! [`ViewPipeline::recompute`] is the only way to obtain a [`DerivedView`].
//! Every pass runs stamp, filter, label and window against one immutable
//! [`ViewState`], so a derived view never mixes an old interval with a new
//! window.

use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, instrument};

use battview_types::{TimedRecord, ViewState};

use crate::filter::{RangeFilter, stamp};
use crate::label::{DisplayLabeler, Granularity, LabeledRecord};
use crate::metrics::PipelineMetrics;
use crate::timestamp::TimestampParser;
use crate::window::{WindowController, WindowPolicy, WindowView};

/// Stateless pipeline from raw records to a windowed, labeled view.
#[derive(Debug, Clone)]
pub struct ViewPipeline {
    parser: TimestampParser,
    controller: WindowController,
    metrics: Arc<PipelineMetrics>,
}

impl Default for ViewPipeline {
    fn default() -> Self {
        Self::new(WindowPolicy::default())
    }
}

impl ViewPipeline {
    /// Create a pipeline with the default parser.
    pub fn new(policy: WindowPolicy) -> Self {
        let metrics = PipelineMetrics::shared();
        Self {
            parser: TimestampParser::new(),
            controller: WindowController::with_metrics(policy, Arc::clone(&metrics)),
            metrics,
        }
    }

    /// Replace the timestamp parser.
    #[must_use]
    pub fn with_parser(mut self, parser: TimestampParser) -> Self {
        self.parser = parser;
        self
    }

    /// The window policy in use.
    pub fn policy(&self) -> WindowPolicy {
        self.controller.policy()
    }

    /// The window controller, for computing scroll and zoom targets.
    pub fn controller(&self) -> &WindowController {
        &self.controller
    }

    /// Counters shared by every pass.
    pub fn metrics(&self) -> &Arc<PipelineMetrics> {
        &self.metrics
    }

    /// Derive the view of `records` for `state`.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn recompute<'a, P>(
        &self,
        records: &'a [TimedRecord<P>],
        state: &ViewState,
    ) -> DerivedView<'a, P> {
        let stamped = stamp(records, &self.parser, &self.metrics);
        let parse_failures = stamped.iter().filter(|s| s.instant.is_none()).count();

        let filtered = RangeFilter::from_state(state).apply(stamped, &self.metrics);
        let labeler = DisplayLabeler::new(state.interval());
        let labeled = labeler.label(filtered, &self.metrics);
        let window = self.controller.clamp(labeled.len(), state.window());

        self.metrics.record_pass();
        debug!(
            kept = labeled.len(),
            parse_failures,
            offset = window.clamped_offset,
            size = window.size,
            "Recomputed view"
        );

        DerivedView {
            records: labeled,
            window,
            granularity: labeler.granularity(),
            parse_failures,
            state: state.with_window(window.window()),
        }
    }
}

/// Result of one recompute pass.
#[derive(Debug)]
pub struct DerivedView<'a, P> {
    records: Vec<LabeledRecord<'a, P>>,
    window: WindowView,
    granularity: Granularity,
    parse_failures: usize,
    state: ViewState,
}

impl<'a, P> DerivedView<'a, P> {
    /// Every record that passed the filter, labeled.
    pub fn records(&self) -> &[LabeledRecord<'a, P>] {
        &self.records
    }

    /// The records inside the window.
    pub fn visible(&self) -> &[LabeledRecord<'a, P>] {
        &self.records[self.window.range()]
    }

    /// The resolved window.
    pub fn window(&self) -> WindowView {
        self.window
    }

    /// Visible index range within [`records`](Self::records).
    pub fn range(&self) -> Range<usize> {
        self.window.range()
    }

    /// Largest valid offset for the current window size.
    pub fn max_offset(&self) -> usize {
        self.window.max_offset
    }

    /// Offset of the first visible record after clamping.
    pub fn clamped_offset(&self) -> usize {
        self.window.clamped_offset
    }

    /// Label granularity chosen for this pass.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Records in the input whose timestamp could not be parsed.
    pub fn parse_failures(&self) -> usize {
        self.parse_failures
    }

    /// The input state with its window replaced by the clamped one.
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Number of filtered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the filter excluded every record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
