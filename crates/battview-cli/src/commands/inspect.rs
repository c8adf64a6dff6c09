//! Inspect command implementation.

use std::path::PathBuf;

use anyhow::Result;
use battview_core::{Metric, Telemetry, TimedRecord, TimestampFormat, TimestampParser};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_inspect_json, format_inspect_text, format_instant};
use crate::source::SourceSpec;
use crate::util::write_output;

/// Number of records recognized in one timestamp format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatCount {
    pub format: TimestampFormat,
    pub count: usize,
}

/// Summary of a record source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub source: String,
    pub records: usize,
    pub parse_failures: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    /// Whole days between the first and last recognized timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_days: Option<i64>,
    /// Series with at least one value.
    pub metrics: Vec<Metric>,
    pub formats: Vec<FormatCount>,
}

/// Summarize records without filtering them.
pub fn inspect_records(
    source: &str,
    records: &[TimedRecord<Telemetry>],
    parser: &TimestampParser,
) -> InspectReport {
    let mut formats: Vec<FormatCount> = parser
        .formats()
        .iter()
        .map(|&format| FormatCount { format, count: 0 })
        .collect();
    let mut parse_failures = 0;
    let mut first = None;
    let mut last = None;

    for record in records {
        match parser.detect(&record.time) {
            Ok((format, t)) => {
                if let Some(entry) = formats.iter_mut().find(|c| c.format == format) {
                    entry.count += 1;
                }
                first = Some(first.map_or(t, |f: time::OffsetDateTime| f.min(t)));
                last = Some(last.map_or(t, |l: time::OffsetDateTime| l.max(t)));
            }
            Err(_) => parse_failures += 1,
        }
    }

    let metrics = Metric::ALL
        .into_iter()
        .filter(|&m| records.iter().any(|r| r.payload.value(m).is_some()))
        .collect();
    formats.retain(|c| c.count > 0);

    InspectReport {
        source: source.to_string(),
        records: records.len(),
        parse_failures,
        first: first.map(format_instant),
        last: last.map(format_instant),
        span_days: first.zip(last).map(|(f, l)| (l - f).whole_days()),
        metrics,
        formats,
    }
}

pub fn cmd_inspect(
    source: SourceSpec,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let records = source.load()?;
    let report = inspect_records(source.label(), &records, &TimestampParser::new());

    let content = match format {
        OutputFormat::Json => format_inspect_json(&report, opts)?,
        OutputFormat::Text | OutputFormat::Csv => format_inspect_text(&report, opts),
    };
    write_output(output, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StyleMode;

    fn records() -> Vec<TimedRecord<Telemetry>> {
        let soc = |v| Telemetry {
            soc: Some(v),
            ..Default::default()
        };
        vec![
            TimedRecord::new("2024-01-01T08:00:00", soc(90.0)),
            TimedRecord::new("Wed Jan 10 08:00:00 2024", soc(80.0)),
            TimedRecord::new(
                "2024-01-05T08:00:00Z",
                Telemetry {
                    actual: Some(70.0),
                    ..Default::default()
                },
            ),
            TimedRecord::new("yesterday", Telemetry::default()),
        ]
    }

    #[test]
    fn test_inspect_records() {
        let report = inspect_records("pack.json", &records(), &TimestampParser::new());

        assert_eq!(report.records, 4);
        assert_eq!(report.parse_failures, 1);
        assert_eq!(report.first.as_deref(), Some("2024-01-01T08:00:00Z"));
        assert_eq!(report.last.as_deref(), Some("2024-01-10T08:00:00Z"));
        assert_eq!(report.span_days, Some(9));
        assert_eq!(report.metrics, vec![Metric::StateOfCharge, Metric::Actual]);
        assert_eq!(
            report.formats,
            vec![
                FormatCount {
                    format: TimestampFormat::Rfc3339,
                    count: 1
                },
                FormatCount {
                    format: TimestampFormat::IsoLocal,
                    count: 1
                },
                FormatCount {
                    format: TimestampFormat::Clock,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_inspect_empty() {
        let report = inspect_records("empty.json", &[], &TimestampParser::new());
        assert_eq!(report.records, 0);
        assert!(report.first.is_none());
        assert!(report.span_days.is_none());
        assert!(report.formats.is_empty());
    }

    #[test]
    fn test_inspect_text() {
        let report = inspect_records("pack.json", &records(), &TimestampParser::new());
        let text = format_inspect_text(&report, &FormatOptions::new(true, StyleMode::Plain));
        assert!(text.contains("Records:        4"));
        assert!(text.contains("Unrecognized:   1"));
        assert!(text.contains("9 day(s), labels by day"));
        assert!(text.contains("SoC, Actual"));
        assert!(text.contains("Format clock:   1"));
    }
}
