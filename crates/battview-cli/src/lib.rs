//! Command-line interface and terminal dashboard for battery telemetry.
//!
//! This crate wraps [`battview_core`] in a `battview` binary that loads
//! record exports, filters them to a date and time-of-day range and prints
//! a scrollable window of the result.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `view` | Filter, label and window a record source |
//! | `parse` | Show how timestamps are recognized |
//! | `inspect` | Summarize a record source |
//! | `tui` | Interactive dashboard |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Record sources
//!
//! A source is a JSON array of objects or a CSV file with a header row.
//! Each record has a `time` field and any of `soc`, `soh`, `predicted`
//! and `actual`. Pass `-` to read JSON from stdin.
//!
//! # Output Formats
//!
//! - **Text** (default): a table of the visible window
//! - **JSON**: the window, the active filters and the records
//! - **CSV**: one row per record with its display label
//!
//! # Configuration
//!
//! Settings live in `~/.config/battview/config.toml` (or the platform
//! equivalent, or the path in `BATTVIEW_CONFIG`):
//!
//! - `source`: default record source
//! - `format`, `style`, `no_color`: output defaults
//! - `[window]`: `min_size`, `zoom_step`, `large_zoom_step`, `default_size`
//!
//! # Examples
//!
//! ```bash
//! battview view pack.json --from 2024-01-01 --to 2024-01-07 --between 06:00-18:00
//! battview view pack.csv --offset 40 --size 20 --format csv
//! battview parse "Wed Jan 03 14:05:00 2024" 2024-01-03T14:05:00+02:00
//! battview tui pack.json
//! ```

pub use battview_core;
pub use battview_types;

pub mod config;
pub mod source;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod commands;
#[cfg(feature = "cli")]
pub mod format;
#[cfg(feature = "cli")]
pub mod style;

// Publicly exposed for the battview-tui crate to use
#[cfg(feature = "tui")]
pub mod tui;
