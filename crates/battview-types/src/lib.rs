//! Platform-agnostic types for battery telemetry views.
//!
//! This crate provides the shared data model used by the view pipeline
//! (`battview-core`) and its front ends (`battview-cli`).
//!
//! # Features
//!
//! - Telemetry records carrying a raw timestamp string
//! - Date intervals, time-of-day bounds and scroll/zoom windows
//! - An immutable [`ViewState`] replaced on every user interaction
//! - Error types for parsing and out-of-range requests
//!
//! # Example
//!
//! ```
//! use battview_types::{DateSelection, Telemetry, TimedRecord, ViewState, Window};
//! use time::macros::date;
//!
//! let record = TimedRecord::new("2024-01-03T14:05:00", Telemetry::default());
//! let state = ViewState::new()
//!     .with_interval(Some(DateSelection::single(date!(2024 - 01 - 03)).interval()))
//!     .with_window(Window::new(0, 30));
//! assert!(state.is_filtered());
//! # let _ = record;
//! ```

pub mod error;
pub mod types;
pub mod view;

pub use error::{ParseError, ParseResult, RangeError};
pub use types::{Metric, Telemetry, TimedRecord};
pub use view::{
    DEFAULT_WINDOW_SIZE, DateSelection, Interval, TimeOfDayBound, ViewState, Window, parse_date,
};
