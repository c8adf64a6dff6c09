//! Terminal dashboard for battery telemetry.
//!
//! This crate provides a standalone binary wrapper around battview-cli's
//! dashboard. The implementation lives in `battview-cli` with the `tui`
//! feature enabled.
//!
//! For the dashboard itself, see [`battview_cli::tui`].

pub use battview_cli::tui;
