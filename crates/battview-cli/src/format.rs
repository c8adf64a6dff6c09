//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use battview_core::{DerivedView, Granularity, LabeledRecord, TimestampFormat, WindowView};
use battview_types::{Interval, Telemetry};
use serde::Serialize;
use time::OffsetDateTime;

use crate::cli::StyleMode;
use crate::commands::{InspectReport, ParseOutcome};
use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Visual styling mode.
    pub style: StyleMode,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            no_color: false,
            no_header: false,
            compact: false,
            style: StyleMode::Rich,
        }
    }
}

impl FormatOptions {
    pub fn new(no_color: bool, style: StyleMode) -> Self {
        // Plain mode automatically disables colors for pipe-friendliness
        let effective_no_color = no_color || style == StyleMode::Plain;
        Self {
            no_color: effective_no_color,
            no_header: false,
            compact: false,
            style,
        }
    }

    /// Check if rich styling is enabled.
    pub fn is_rich(&self) -> bool {
        self.style == StyleMode::Rich
    }

    /// Create with no_header option for CSV output.
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

/// A CSV writer over an in-memory buffer, with `\n` record terminators.
pub fn csv_writer(opts: &FormatOptions, header: &[&str]) -> Result<csv::Writer<Vec<u8>>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    if !opts.no_header {
        writer.write_record(header)?;
    }
    Ok(writer)
}

/// Flush a [`csv_writer`] and return its contents.
pub fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Format an instant as RFC 3339 UTC.
#[must_use]
pub fn format_instant(t: OffsetDateTime) -> String {
    TimestampFormat::Rfc3339.render(t)
}

fn csv_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ============================================================================
// View formatting
// ============================================================================

/// The rows a view prints: the window, or everything with `--all`.
fn view_rows<'v, 'a>(
    view: &'v DerivedView<'a, Telemetry>,
    all: bool,
) -> &'v [LabeledRecord<'a, Telemetry>] {
    if all { view.records() } else { view.visible() }
}

fn view_summary(view: &DerivedView<'_, Telemetry>) -> String {
    let window = view.window();
    format!(
        "Window: offset {} (max {}), size {}, labels by {}",
        window.clamped_offset, window.max_offset, window.size, view.granularity()
    )
}

#[must_use]
pub fn format_view_text(
    source: &str,
    view: &DerivedView<'_, Telemetry>,
    all: bool,
    opts: &FormatOptions,
) -> String {
    use tabled::builder::Builder;

    let mut output = String::new();

    if view.is_empty() {
        output.push_str(&format!("{}: no records match the selected range.\n", source));
    } else {
        let rows = view_rows(view, all);
        let range = view.range();
        let title = if all {
            format!("{}: all {} records", source, view.len())
        } else {
            format!(
                "{}: records {}-{} of {}",
                source,
                range.start + 1,
                range.end,
                view.len()
            )
        };
        if opts.is_rich() {
            output.push_str(&style::format_title(&title, opts.no_color));
        } else {
            output.push_str(&title);
        }
        output.push_str("\n\n");

        // Narrow terminals drop the raw timestamp column
        let show_raw = style::terminal_width() >= 90;

        let mut builder = Builder::default();
        let mut header = vec!["Label"];
        if show_raw {
            header.push("Timestamp");
        }
        header.extend(["SoC", "SoH", "Predicted", "Actual"]);
        builder.push_record(header);

        for row in rows {
            let t = &row.record.payload;
            let mut cells = vec![row.display_time.clone()];
            if show_raw {
                cells.push(row.record.time.clone());
            }
            cells.extend([
                style::format_soc_colored(t.soc, opts.no_color),
                style::format_soh_colored(t.soh, opts.no_color),
                style::format_value(t.predicted),
                style::format_actual_colored(t.actual, t.predicted, opts.no_color),
            ]);
            builder.push_record(cells);
        }

        let mut table = builder.build();
        style::apply_table_style(&mut table, opts.style);
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output.push_str(&view_summary(view));
    output.push('\n');

    if view.parse_failures() > 0 {
        output.push_str(&style::format_warning(
            &format!(
                "{} record(s) have unrecognized timestamps",
                view.parse_failures()
            ),
            opts.no_color,
        ));
        output.push('\n');
    }

    output
}

/// Format a view as CSV, one row per labeled record.
pub fn format_view_csv(
    view: &DerivedView<'_, Telemetry>,
    all: bool,
    opts: &FormatOptions,
) -> Result<String> {
    let mut writer = csv_writer(
        opts,
        &["time", "display_time", "soc", "soh", "predicted", "actual"],
    )?;
    for row in view_rows(view, all) {
        let t = &row.record.payload;
        writer.write_record([
            row.record.time.clone(),
            row.display_time.clone(),
            csv_value(t.soc),
            csv_value(t.soh),
            csv_value(t.predicted),
            csv_value(t.actual),
        ])?;
    }
    finish_csv(writer)
}

/// Format a view as JSON: the window, the active filters and the rows.
pub fn format_view_json(
    source: &str,
    view: &DerivedView<'_, Telemetry>,
    all: bool,
    opts: &FormatOptions,
) -> Result<String> {
    #[derive(Serialize)]
    struct ViewJson<'v, 'a> {
        source: &'v str,
        total: usize,
        parse_failures: usize,
        granularity: Granularity,
        #[serde(skip_serializing_if = "Option::is_none")]
        interval: Option<Interval>,
        #[serde(skip_serializing_if = "Option::is_none")]
        time_of_day: Option<String>,
        window: WindowView,
        records: &'v [LabeledRecord<'a, Telemetry>],
    }

    let state = view.state();
    opts.as_json(&ViewJson {
        source,
        total: view.len(),
        parse_failures: view.parse_failures(),
        granularity: view.granularity(),
        interval: state.interval().copied(),
        time_of_day: state.time_of_day().map(ToString::to_string),
        window: view.window(),
        records: view_rows(view, all),
    })
}

// ============================================================================
// Parse formatting
// ============================================================================

#[must_use]
pub fn format_parse_text(outcomes: &[ParseOutcome], opts: &FormatOptions) -> String {
    use tabled::builder::Builder;

    let mut builder = Builder::default();
    builder.push_record(["Input", "Format", "UTC"]);
    for outcome in outcomes {
        let (format, utc) = match (&outcome.format, &outcome.utc, &outcome.error) {
            (Some(format), Some(utc), _) => (format.to_string(), utc.clone()),
            (_, _, Some(error)) => ("-".to_string(), style::format_warning(error, opts.no_color)),
            _ => ("-".to_string(), "-".to_string()),
        };
        builder.push_record([outcome.input.clone(), format, utc]);
    }

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);
    format!("{}\n", table)
}

pub fn format_parse_json(outcomes: &[ParseOutcome], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&outcomes)
}

// ============================================================================
// Inspect formatting
// ============================================================================

#[must_use]
pub fn format_inspect_text(report: &InspectReport, opts: &FormatOptions) -> String {
    let no_color = opts.no_color;
    let mut lines = vec![
        style::format_title(&report.source, no_color),
        style::format_field("Records", &report.records.to_string(), no_color),
        style::format_field(
            "Unrecognized",
            &report.parse_failures.to_string(),
            no_color,
        ),
    ];

    if let (Some(first), Some(last)) = (&report.first, &report.last) {
        lines.push(style::format_field("First", first, no_color));
        lines.push(style::format_field("Last", last, no_color));
    }
    if let Some(days) = report.span_days {
        lines.push(style::format_field(
            "Span",
            &format!("{} day(s), labels by {}", days, Granularity::for_span(days)),
            no_color,
        ));
    }

    let metrics = if report.metrics.is_empty() {
        "none".to_string()
    } else {
        report
            .metrics
            .iter()
            .map(|m| m.label())
            .collect::<Vec<_>>()
            .join(", ")
    };
    lines.push(style::format_field("Metrics", &metrics, no_color));

    for count in &report.formats {
        lines.push(style::format_field(
            &format!("Format {}", count.format),
            &count.count.to_string(),
            no_color,
        ));
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

pub fn format_inspect_json(report: &InspectReport, opts: &FormatOptions) -> Result<String> {
    opts.as_json(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use battview_core::ViewPipeline;
    use battview_types::{DateSelection, TimedRecord, ViewState, Window};
    use time::macros::{date, datetime};

    fn plain() -> FormatOptions {
        FormatOptions::new(true, StyleMode::Plain)
    }

    fn records() -> Vec<TimedRecord<Telemetry>> {
        vec![
            TimedRecord::new(
                "2024-01-01T08:00:00",
                Telemetry {
                    soc: Some(81.5),
                    soh: Some(97.0),
                    predicted: None,
                    actual: None,
                },
            ),
            TimedRecord::new(
                "2024-01-02T08:00:00",
                Telemetry {
                    soc: Some(79.0),
                    ..Default::default()
                },
            ),
            TimedRecord::new("not, a date", Telemetry::default()),
        ]
    }

    #[test]
    fn test_plain_style_disables_color() {
        let opts = FormatOptions::new(false, StyleMode::Plain);
        assert!(opts.no_color);
        assert!(!opts.is_rich());
    }

    #[test]
    fn test_csv_writer_quotes_fields() {
        let mut writer = csv_writer(&plain(), &["a", "b"]).unwrap();
        writer.write_record(["plain", "a,b"]).unwrap();
        writer.write_record(["say \"hi\"", ""]).unwrap();
        assert_eq!(
            finish_csv(writer).unwrap(),
            "a,b\nplain,\"a,b\"\n\"say \"\"hi\"\"\",\n"
        );
    }

    #[test]
    fn test_format_instant() {
        assert_eq!(
            format_instant(datetime!(2024-01-03 14:05:00 UTC)),
            "2024-01-03T14:05:00Z"
        );
    }

    #[test]
    fn test_view_csv() {
        let data = records();
        let view = ViewPipeline::default().recompute(&data, &ViewState::new());
        let csv = format_view_csv(&view, false, &plain()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "time,display_time,soc,soh,predicted,actual");
        assert_eq!(lines[1], "2024-01-01T08:00:00,08:00,81.5,97,,");
        assert_eq!(lines[3], "\"not, a date\",\"not, a date\",,,,");

        let no_header = format_view_csv(&view, false, &plain().with_no_header(true)).unwrap();
        assert!(no_header.starts_with("2024-01-01T08:00:00"));
    }

    #[test]
    fn test_view_text_reports_window_and_failures() {
        let data = records();
        let view = ViewPipeline::default().recompute(&data, &ViewState::new());
        let text = format_view_text("pack.json", &view, false, &plain());
        assert!(text.contains("pack.json: records 1-3 of 3"));
        assert!(text.contains("Window: offset 0 (max 0), size 10, labels by minute"));
        assert!(text.contains("1 record(s) have unrecognized timestamps"));
    }

    #[test]
    fn test_view_text_empty() {
        let data = records();
        let state = ViewState::new()
            .with_interval(Some(DateSelection::single(date!(2023 - 01 - 01)).interval()));
        let view = ViewPipeline::default().recompute(&data, &state);
        let text = format_view_text("pack.json", &view, false, &plain());
        assert!(text.contains("no records match"));
    }

    #[test]
    fn test_view_json() {
        let data = records();
        let state = ViewState::new()
            .with_interval(Some(DateSelection::single(date!(2024 - 01 - 01)).interval()))
            .with_window(Window::new(5, 20));
        let view = ViewPipeline::default().recompute(&data, &state);
        let json = format_view_json("pack.json", &view, false, &plain().with_compact(true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total"], 1);
        assert_eq!(value["parse_failures"], 1);
        assert_eq!(value["granularity"], "minute");
        assert_eq!(value["window"]["clamped_offset"], 0);
        assert_eq!(value["records"][0]["display_time"], "08:00");
        assert_eq!(value["records"][0]["soc"], 81.5);
        assert_eq!(value["interval"]["start"], "2024-01-01T00:00:00Z");
        assert!(value.get("time_of_day").is_none());
    }

    #[test]
    fn test_compact_json_is_single_line() {
        let opts = plain().with_compact(true);
        let json = opts.as_json(&vec![1, 2, 3]).unwrap();
        assert_eq!(json, "[1,2,3]\n");
    }
}
