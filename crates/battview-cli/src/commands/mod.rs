//! Command implementations for the CLI.

mod config;
mod inspect;
mod parse;
mod view;

pub use config::cmd_config;
pub use inspect::{FormatCount, InspectReport, cmd_inspect, inspect_records};
pub use parse::{ParseOutcome, cmd_parse, parse_timestamps};
pub use view::{ViewArgs, cmd_view};
