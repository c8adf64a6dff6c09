//! Application state for the dashboard.
//!
//! [`App`] owns the loaded records and the current [`ViewState`]. Every
//! change to the range or window goes through [`App::refresh`], which runs
//! the view pipeline once and keeps an owned [`ViewSnapshot`] for drawing.

use std::time::{Duration, Instant};

use battview_core::{Granularity, TimestampParser, ViewPipeline, WindowPolicy, WindowView};
use battview_types::{
    DateSelection, Interval, Metric, Telemetry, TimeOfDayBound, TimedRecord, ViewState, Window,
};
use time::Date;
use tracing::debug;

use super::messages::{Command, LoadEvent};

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Date range presets, anchored on the newest record's day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DatePreset {
    #[default]
    All,
    LastDay,
    Last7Days,
    Last30Days,
    Last90Days,
}

impl DatePreset {
    pub fn next(self) -> Self {
        match self {
            DatePreset::All => DatePreset::LastDay,
            DatePreset::LastDay => DatePreset::Last7Days,
            DatePreset::Last7Days => DatePreset::Last30Days,
            DatePreset::Last30Days => DatePreset::Last90Days,
            DatePreset::Last90Days => DatePreset::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DatePreset::All => "All dates",
            DatePreset::LastDay => "Last day",
            DatePreset::Last7Days => "Last 7 days",
            DatePreset::Last30Days => "Last 30 days",
            DatePreset::Last90Days => "Last 90 days",
        }
    }

    fn days(self) -> Option<i64> {
        match self {
            DatePreset::All => None,
            DatePreset::LastDay => Some(1),
            DatePreset::Last7Days => Some(7),
            DatePreset::Last30Days => Some(30),
            DatePreset::Last90Days => Some(90),
        }
    }

    /// The interval this preset selects, ending on `newest`.
    pub fn interval(self, newest: Option<Date>) -> Option<Interval> {
        let days = self.days()?;
        let end = newest?;
        let start = end
            .checked_sub(time::Duration::days(days - 1))
            .unwrap_or(Date::MIN);
        Some(DateSelection::range(start, end).interval())
    }
}

/// Daily time-of-day presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimePreset {
    #[default]
    AllDay,
    Daytime,
    Evening,
    Night,
}

impl TimePreset {
    pub fn next(self) -> Self {
        match self {
            TimePreset::AllDay => TimePreset::Daytime,
            TimePreset::Daytime => TimePreset::Evening,
            TimePreset::Evening => TimePreset::Night,
            TimePreset::Night => TimePreset::AllDay,
        }
    }

    pub fn bound(self) -> Option<TimeOfDayBound> {
        match self {
            TimePreset::AllDay => None,
            TimePreset::Daytime => Some(TimeOfDayBound::new(6, 0, 18, 0)),
            TimePreset::Evening => Some(TimeOfDayBound::new(18, 0, 23, 59)),
            TimePreset::Night => Some(TimeOfDayBound::new(0, 0, 6, 0)),
        }
    }
}

/// Which series the chart draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesToggles {
    pub soc: bool,
    pub soh: bool,
    /// Predicted and actual, drawn together.
    pub prediction: bool,
}

impl Default for SeriesToggles {
    fn default() -> Self {
        Self {
            soc: true,
            soh: true,
            prediction: true,
        }
    }
}

impl SeriesToggles {
    /// Metrics to draw, in display order.
    pub fn metrics(&self) -> Vec<Metric> {
        let mut metrics = Vec::new();
        if self.soc {
            metrics.push(Metric::StateOfCharge);
        }
        if self.soh {
            metrics.push(Metric::StateOfHealth);
        }
        if self.prediction {
            metrics.extend([Metric::Predicted, Metric::Actual]);
        }
        metrics
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    created: Instant,
}

/// One visible row, owned so it can outlive the pipeline pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub time: String,
    pub display_time: String,
    pub telemetry: Telemetry,
}

/// What the last pipeline pass produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub rows: Vec<Row>,
    pub window: WindowView,
    /// Records left after filtering.
    pub total: usize,
    pub parse_failures: usize,
    pub granularity: Granularity,
}

impl ViewSnapshot {
    fn empty() -> Self {
        Self {
            rows: Vec::new(),
            window: WindowView {
                clamped_offset: 0,
                max_offset: 0,
                size: 0,
                start: 0,
                end: 0,
            },
            total: 0,
            parse_failures: 0,
            granularity: Granularity::Minute,
        }
    }

    /// Values of one metric across the visible rows.
    pub fn series(&self, metric: Metric) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.telemetry.value(metric)).collect()
    }
}

/// Dashboard state.
pub struct App {
    pub source_label: String,
    records: Vec<TimedRecord<Telemetry>>,
    newest: Option<Date>,
    pipeline: ViewPipeline,
    state: ViewState,
    large_zoom_step: usize,
    /// Interval given on the command line; replaced by the first preset.
    custom_interval: Option<Interval>,
    pub date_preset: DatePreset,
    pub time_preset: TimePreset,
    /// Time-of-day bound given on the command line.
    custom_bound: Option<TimeOfDayBound>,
    pub series: SeriesToggles,
    pub show_help: bool,
    pub loading: bool,
    status: Option<StatusMessage>,
    should_quit: bool,
    generation: u64,
    snapshot: ViewSnapshot,
}

impl App {
    pub fn new(
        source_label: impl Into<String>,
        policy: WindowPolicy,
        large_zoom_step: usize,
        initial: ViewState,
    ) -> Self {
        let mut app = Self {
            source_label: source_label.into(),
            records: Vec::new(),
            newest: None,
            pipeline: ViewPipeline::new(policy),
            state: initial,
            large_zoom_step: large_zoom_step.max(1),
            custom_interval: initial.interval().copied(),
            date_preset: DatePreset::All,
            time_preset: TimePreset::AllDay,
            custom_bound: initial.time_of_day().copied(),
            series: SeriesToggles::default(),
            show_help: false,
            loading: false,
            status: None,
            should_quit: false,
            generation: 0,
            snapshot: ViewSnapshot::empty(),
        };
        app.refresh();
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn snapshot(&self) -> &ViewSnapshot {
        &self.snapshot
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Number of records loaded, before filtering.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Label for the active date range.
    pub fn date_label(&self) -> String {
        match (self.custom_interval, self.state.interval()) {
            (Some(_), Some(i)) => format!(
                "{} to {}",
                i.start().date(),
                i.end().date()
            ),
            _ => self.date_preset.label().to_string(),
        }
    }

    /// Label for the active time-of-day bound.
    pub fn time_label(&self) -> String {
        self.state
            .time_of_day()
            .map_or_else(|| "All day".to_string(), ToString::to_string)
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            created: Instant::now(),
        });
    }

    pub fn clean_expired_messages(&mut self) {
        if self
            .status
            .as_ref()
            .is_some_and(|s| s.created.elapsed() > STATUS_TTL)
        {
            self.status = None;
        }
    }

    /// Start a reload and return the command to send.
    pub fn request_reload(&mut self) -> Command {
        self.generation += 1;
        self.loading = true;
        Command::Reload {
            generation: self.generation,
        }
    }

    /// Apply a loader event, ignoring answers to superseded requests.
    pub fn handle_load_event(&mut self, event: LoadEvent) {
        if event.generation() != self.generation {
            debug!(
                got = event.generation(),
                want = self.generation,
                "Dropping stale load event"
            );
            return;
        }
        self.loading = false;
        match event {
            LoadEvent::Loaded { records, .. } => {
                let count = records.len();
                self.set_records(records);
                self.set_status(format!("Loaded {} records", count), StatusLevel::Info);
            }
            LoadEvent::Failed { error, .. } => {
                self.set_status(format!("Load failed: {}", error), StatusLevel::Error);
            }
        }
    }

    /// Replace the records and recompute.
    pub fn set_records(&mut self, records: Vec<TimedRecord<Telemetry>>) {
        let parser = TimestampParser::new();
        self.newest = records
            .iter()
            .filter_map(|r| parser.parse(&r.time).ok())
            .max()
            .map(|t| t.date());
        self.records = records;
        if self.custom_interval.is_none() {
            self.state = self
                .state
                .with_interval(self.date_preset.interval(self.newest));
        }
        self.refresh();
    }

    /// Run the pipeline for the current state.
    pub fn refresh(&mut self) {
        let view = self.pipeline.recompute(&self.records, &self.state);
        // Nothing loaded yet: keep the requested window for the first load
        if !self.records.is_empty() {
            self.state = view.state();
        }
        self.snapshot = ViewSnapshot {
            rows: view
                .visible()
                .iter()
                .map(|r| Row {
                    time: r.record.time.clone(),
                    display_time: r.display_time.clone(),
                    telemetry: r.record.payload,
                })
                .collect(),
            window: view.window(),
            total: view.len(),
            parse_failures: view.parse_failures(),
            granularity: view.granularity(),
        };
    }

    fn set_window(&mut self, view: WindowView) {
        self.state = self.state.with_window(view.window());
        self.refresh();
    }

    fn window(&self) -> Window {
        self.state.window()
    }

    /// Records moved by one scroll step.
    pub fn scroll_step(&self) -> i64 {
        i64::try_from((self.window().size / 4).max(1)).unwrap_or(1)
    }

    pub fn scroll_left(&mut self) {
        let view =
            self.pipeline
                .controller()
                .scroll_by(self.window(), -self.scroll_step(), self.snapshot.total);
        self.set_window(view);
    }

    pub fn scroll_right(&mut self) {
        let view =
            self.pipeline
                .controller()
                .scroll_by(self.window(), self.scroll_step(), self.snapshot.total);
        self.set_window(view);
    }

    pub fn scroll_to_start(&mut self) {
        let view = self
            .pipeline
            .controller()
            .scroll_to_start(self.window(), self.snapshot.total);
        self.set_window(view);
    }

    pub fn scroll_to_end(&mut self) {
        let view = self
            .pipeline
            .controller()
            .scroll_to_end(self.window(), self.snapshot.total);
        self.set_window(view);
    }

    pub fn zoom_in(&mut self) {
        let view = self
            .pipeline
            .controller()
            .zoom_in(self.window(), self.snapshot.total);
        self.set_window(view);
    }

    pub fn zoom_out(&mut self) {
        let view = self
            .pipeline
            .controller()
            .zoom_out(self.window(), self.snapshot.total);
        self.set_window(view);
    }

    pub fn zoom_out_large(&mut self) {
        let delta = i64::try_from(self.large_zoom_step).unwrap_or(i64::MAX);
        let view = self
            .pipeline
            .controller()
            .zoom(self.window(), delta, self.snapshot.total);
        self.set_window(view);
    }

    /// Move to the next date preset, dropping any command-line interval.
    pub fn cycle_date_preset(&mut self) {
        if self.custom_interval.take().is_none() {
            self.date_preset = self.date_preset.next();
        }
        self.state = self
            .state
            .with_interval(self.date_preset.interval(self.newest));
        self.refresh();
    }

    /// Move to the next time-of-day preset, dropping any command-line bound.
    pub fn cycle_time_preset(&mut self) {
        if self.custom_bound.take().is_none() {
            self.time_preset = self.time_preset.next();
        }
        self.state = self.state.with_time_of_day(self.time_preset.bound());
        self.refresh();
    }

    pub fn toggle_series(&mut self, metric: Metric) {
        match metric {
            Metric::StateOfCharge => self.series.soc = !self.series.soc,
            Metric::StateOfHealth => self.series.soh = !self.series.soh,
            Metric::Predicted | Metric::Actual => self.series.prediction = !self.series.prediction,
        }
    }
}
