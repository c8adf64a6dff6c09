//! CLI argument definitions using clap.

use std::path::PathBuf;

use battview_types::{DateSelection, Interval, TimeOfDayBound};
use clap::{Args, Parser, Subcommand, ValueEnum};
use time::Date;

use crate::source::{InputFormat, SourceSpec};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    /// Parse a format name as stored in the config file.
    pub fn from_config(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }
}

/// Visual styling mode for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StyleMode {
    /// Standard styling with colors
    Minimal,
    /// Rich styling with tables and colors (default)
    #[default]
    Rich,
    /// Plain text with no decorations (for scripting)
    Plain,
}

impl StyleMode {
    /// Parse a style name as stored in the config file.
    pub fn from_config(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }
}

/// Reusable record source arguments
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Record file (.json or .csv), or '-' for stdin. Defaults to the configured source
    pub source: Option<String>,

    /// Input format (detected from the file extension by default)
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormat>,
}

impl SourceArgs {
    /// Resolve against a configured default source.
    pub fn resolve(&self, configured: Option<&str>) -> Option<SourceSpec> {
        self.source
            .as_deref()
            .or(configured)
            .map(|location| SourceSpec::new(location, self.input_format))
    }
}

/// Reusable date and time-of-day range arguments
#[derive(Debug, Clone, Default, Args)]
pub struct RangeArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<Date>,

    /// Last day to include (YYYY-MM-DD); requires --from
    #[arg(long, value_parser = parse_date_arg, requires = "from")]
    pub to: Option<Date>,

    /// Daily time-of-day window, e.g. 06:00-18:00
    #[arg(long, value_name = "HH:MM-HH:MM", value_parser = parse_bound_arg)]
    pub between: Option<TimeOfDayBound>,
}

impl RangeArgs {
    /// The selected date interval, if any.
    pub fn interval(&self) -> Option<Interval> {
        let start = self.from?;
        let selection = match self.to {
            Some(end) => DateSelection::range(start, end),
            None => DateSelection::single(start),
        };
        Some(selection.interval())
    }
}

fn parse_date_arg(s: &str) -> Result<Date, String> {
    battview_types::parse_date(s).map_err(|e| e.to_string())
}

fn parse_bound_arg(s: &str) -> Result<TimeOfDayBound, String> {
    s.parse::<TimeOfDayBound>().map_err(|e| e.to_string())
}

#[derive(Parser)]
#[command(name = "battview")]
#[command(author, version, about = "Time-windowed views over battery telemetry", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Visual styling mode (minimal, rich, plain)
    #[arg(long, global = true, value_enum, env = "BATTVIEW_STYLE")]
    pub style: Option<StyleMode>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter, label and window a record source
    View {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// Index of the first visible record (clamped to the valid range)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        offset: i64,

        /// Number of visible records (clamped to the valid range)
        #[arg(long, allow_negative_numbers = true)]
        size: Option<i64>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Omit header row in CSV output (useful for appending)
        #[arg(long)]
        no_header: bool,

        /// Print every filtered record instead of only the window
        #[arg(long)]
        all: bool,
    },

    /// Show how timestamps are recognized
    Parse {
        /// Timestamps to parse
        #[arg(required = true)]
        timestamps: Vec<String>,

        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Summarize a record source
    Inspect {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Launch interactive terminal dashboard
    #[cfg(feature = "tui")]
    Tui {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        range: RangeArgs,
    },
}

/// Configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// Default record source
    Source,
    /// Default output format
    Format,
    /// Disable colored output
    NoColor,
    /// Default visual style
    Style,
    /// Smallest window size
    MinSize,
    /// Zoom step
    ZoomStep,
    /// Large zoom step (dashboard)
    LargeZoomStep,
    /// Default window size
    DefaultSize,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        /// Configuration key to remove
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}
