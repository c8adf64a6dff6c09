//! View command implementation.

use std::path::PathBuf;

use anyhow::Result;
use battview_core::ViewPipeline;
use battview_types::{Interval, TimeOfDayBound, ViewState, Window};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::config::{Config, resolve_size};
use crate::format::{FormatOptions, format_view_csv, format_view_json, format_view_text};
use crate::source::SourceSpec;
use crate::util::write_output;

/// Arguments for the view command.
pub struct ViewArgs<'a> {
    pub source: SourceSpec,
    pub interval: Option<Interval>,
    pub time_of_day: Option<TimeOfDayBound>,
    pub offset: i64,
    pub size: Option<i64>,
    pub all: bool,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub config: &'a Config,
    pub opts: &'a FormatOptions,
}

pub fn cmd_view(args: ViewArgs<'_>) -> Result<()> {
    let ViewArgs {
        source,
        interval,
        time_of_day,
        offset,
        size,
        all,
        format,
        output,
        config,
        opts,
    } = args;

    let records = source.load()?;
    let pipeline = ViewPipeline::new(config.window.policy()?);

    // Negative and oversized requests are resolved before they enter the state
    let size = resolve_size(size, config);
    let requested = pipeline
        .controller()
        .view(records.len(), offset, size)
        .window();
    let state = ViewState::new()
        .with_interval(interval)
        .with_time_of_day(time_of_day)
        .with_window(Window::new(requested.offset, requested.size));

    let view = pipeline.recompute(&records, &state);
    debug!(stats = ?pipeline.metrics().snapshot(), "View pipeline finished");

    let content = match format {
        OutputFormat::Json => format_view_json(source.label(), &view, all, opts)?,
        OutputFormat::Text => format_view_text(source.label(), &view, all, opts),
        OutputFormat::Csv => format_view_csv(&view, all, opts)?,
    };
    write_output(output, &content)
}
