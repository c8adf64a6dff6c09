//! Time-windowed view pipeline for battery telemetry.
//!
//! This crate turns a slice of [`TimedRecord`]s into what a chart needs to
//! draw: the records inside a date and time-of-day range, a display label
//! for each one, and a clamped scroll/zoom window over the result.
//!
//! # Components
//!
//! - [`TimestampParser`]: raw timestamp strings to UTC instants, trying an
//!   ordered list of [`TimestampFormat`]s
//! - [`RangeFilter`]: date interval and daily time-of-day bound
//! - [`DisplayLabeler`]: labels whose [`Granularity`] follows the selected span
//! - [`WindowController`]: scroll offset and zoom size, always clamped
//! - [`ViewPipeline`]: runs all four in one pass per [`ViewState`]
//!
//! # Example
//!
//! ```
//! use battview_core::ViewPipeline;
//! use battview_types::{DateSelection, Telemetry, TimedRecord, ViewState, Window};
//! use time::macros::date;
//!
//! let records = vec![
//!     TimedRecord::new("2024-01-01T08:00:00", Telemetry::default()),
//!     TimedRecord::new("2024-01-02T08:00:00", Telemetry::default()),
//!     TimedRecord::new("not-a-date", Telemetry::default()),
//! ];
//!
//! let pipeline = ViewPipeline::default();
//! let state = ViewState::new()
//!     .with_interval(Some(DateSelection::single(date!(2024 - 01 - 01)).interval()))
//!     .with_window(Window::new(0, 30));
//!
//! let view = pipeline.recompute(&records, &state);
//! assert_eq!(view.len(), 1);
//! assert_eq!(view.visible()[0].display_time, "08:00");
//! assert_eq!(view.parse_failures(), 1);
//! ```

pub mod error;
pub mod filter;
pub mod label;
pub mod metrics;
pub mod timestamp;
pub mod view;
pub mod window;

pub use error::{Error, Result};
pub use filter::{RangeFilter, Stamped, filter, stamp};
pub use label::{DisplayLabeler, Granularity, LabeledRecord, label};
pub use metrics::{PipelineMetrics, PipelineStats};
pub use timestamp::{TimestampFormat, TimestampParser, month_abbrev, parse};
pub use view::{DerivedView, ViewPipeline};
pub use window::{
    DEFAULT_MIN_SIZE, DEFAULT_ZOOM_STEP, WindowController, WindowPolicy, WindowView,
};

// Re-export the shared data model so callers need only one dependency.
pub use battview_types::{
    DateSelection, Interval, Metric, ParseError, RangeError, Telemetry, TimeOfDayBound,
    TimedRecord, ViewState, Window,
};
