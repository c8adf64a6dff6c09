//! Loading telemetry records from JSON and CSV exports.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use battview_core::TimestampParser;
use battview_types::{Telemetry, TimedRecord};
use serde::Deserialize;
use tracing::{debug, info};

/// Source location meaning standard input.
pub const STDIN: &str = "-";

/// Serialization format of a record source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum InputFormat {
    /// A JSON array of `{ "time": ..., "soc": ... }` objects.
    Json,
    /// CSV with a `time` column and any of `soc,soh,predicted,actual`.
    Csv,
}

impl InputFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Where records come from and how to decode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// File path, or `-` for standard input.
    pub location: String,
    /// Explicit format; detected from the extension when `None`.
    pub format: Option<InputFormat>,
}

impl SourceSpec {
    pub fn new(location: impl Into<String>, format: Option<InputFormat>) -> Self {
        Self {
            location: location.into(),
            format,
        }
    }

    /// Whether this source reads standard input.
    pub fn is_stdin(&self) -> bool {
        self.location == STDIN
    }

    /// The format that will be used to decode this source.
    pub fn resolved_format(&self) -> Result<InputFormat> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        if self.is_stdin() {
            return Ok(InputFormat::Json);
        }
        match InputFormat::from_path(Path::new(&self.location)) {
            Some(format) => Ok(format),
            None => bail!(
                "Cannot detect the format of '{}'. Use --input-format json or --input-format csv",
                self.location
            ),
        }
    }

    /// Short name for headers and messages.
    pub fn label(&self) -> &str {
        if self.is_stdin() {
            return "stdin";
        }
        Path::new(&self.location)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.location)
    }

    /// Read, decode and sort the records.
    pub fn load(&self) -> Result<Vec<TimedRecord<Telemetry>>> {
        let format = self.resolved_format()?;
        let records = if self.is_stdin() {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read records from stdin")?;
            decode(input.as_bytes(), format)?
        } else {
            let file = File::open(&self.location)
                .with_context(|| format!("Failed to open {}", self.location))?;
            decode(file, format).with_context(|| format!("Failed to load {}", self.location))?
        };

        let records = sort_records(records, &TimestampParser::new());
        info!(count = records.len(), source = %self.label(), %format, "Loaded records");
        Ok(records)
    }
}

/// Decode records of the given format from a reader.
pub fn decode<R: Read>(reader: R, format: InputFormat) -> Result<Vec<TimedRecord<Telemetry>>> {
    match format {
        InputFormat::Json => read_json(reader),
        InputFormat::Csv => read_csv(reader),
    }
}

fn read_json<R: Read>(reader: R) -> Result<Vec<TimedRecord<Telemetry>>> {
    serde_json::from_reader(reader).context("Invalid JSON: expected an array of records")
}

/// One CSV row. The `csv` crate does not support flattened fields, so the
/// telemetry columns are listed here and folded into a record afterwards.
#[derive(Debug, Deserialize)]
struct CsvRow {
    time: String,
    #[serde(default)]
    soc: Option<f64>,
    #[serde(default)]
    soh: Option<f64>,
    #[serde(default)]
    predicted: Option<f64>,
    #[serde(default)]
    actual: Option<f64>,
}

impl From<CsvRow> for TimedRecord<Telemetry> {
    fn from(row: CsvRow) -> Self {
        TimedRecord::new(
            row.time,
            Telemetry {
                soc: row.soc,
                soh: row.soh,
                predicted: row.predicted,
                actual: row.actual,
            },
        )
    }
}

fn read_csv<R: Read>(reader: R) -> Result<Vec<TimedRecord<Telemetry>>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV header")?;
    if !headers.iter().any(|h| h == "time") {
        bail!("CSV header has no 'time' column");
    }

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let row = row.with_context(|| format!("Invalid CSV row at line {}", i + 2))?;
        records.push(row.into());
    }
    debug!(rows = records.len(), "Decoded CSV");
    Ok(records)
}

/// Stable sort by parsed instant. Rows whose timestamp cannot be parsed
/// keep their relative order after all dated rows.
pub fn sort_records<P>(
    mut records: Vec<TimedRecord<P>>,
    parser: &TimestampParser,
) -> Vec<TimedRecord<P>> {
    records.sort_by_cached_key(|r| match parser.parse(&r.time) {
        Ok(t) => (false, Some(t)),
        Err(_) => (true, None),
    });
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("data/export.JSON")),
            Some(InputFormat::Json)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("export.csv")),
            Some(InputFormat::Csv)
        );
        assert_eq!(InputFormat::from_path(Path::new("export.txt")), None);
        assert_eq!(InputFormat::from_path(Path::new("export")), None);
    }

    #[test]
    fn test_resolved_format() {
        assert_eq!(
            SourceSpec::new("-", None).resolved_format().unwrap(),
            InputFormat::Json
        );
        assert_eq!(
            SourceSpec::new("x.txt", Some(InputFormat::Csv))
                .resolved_format()
                .unwrap(),
            InputFormat::Csv
        );
        assert!(SourceSpec::new("x.txt", None).resolved_format().is_err());
    }

    #[test]
    fn test_label() {
        assert_eq!(SourceSpec::new("-", None).label(), "stdin");
        assert_eq!(
            SourceSpec::new("/tmp/exports/pack.csv", None).label(),
            "pack.csv"
        );
    }

    #[test]
    fn test_decode_json() {
        let json = r#"[
            {"time": "2024-01-03T14:05:00", "soc": 81.5, "soh": 97.0},
            {"time": "Wed Jan 03 15:05:00 2024", "predicted": 80.0, "actual": 79.5}
        ]"#;
        let records = decode(json.as_bytes(), InputFormat::Json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].payload.soc, Some(81.5));
        assert_eq!(records[0].payload.actual, None);
        assert_eq!(records[1].payload.actual, Some(79.5));
    }

    #[test]
    fn test_decode_json_rejects_object() {
        assert!(decode(r#"{"time": "x"}"#.as_bytes(), InputFormat::Json).is_err());
    }

    #[test]
    fn test_decode_csv_with_missing_columns() {
        let csv = "time,soc,actual\n2024-01-03T14:05:00,81.5,\n2024-01-03T15:05:00, 80.0 ,79.0\n";
        let records = decode(csv.as_bytes(), InputFormat::Csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].payload.actual, None);
        assert_eq!(records[1].payload.soc, Some(80.0));
        assert_eq!(records[1].payload.soh, None);
    }

    #[test]
    fn test_decode_csv_requires_time_column() {
        let csv = "timestamp,soc\n2024-01-03T14:05:00,81.5\n";
        assert!(decode(csv.as_bytes(), InputFormat::Csv).is_err());
    }

    #[test]
    fn test_sort_records_puts_unparseable_last() {
        let records = vec![
            TimedRecord::new("bad-1", 0),
            TimedRecord::new("2024-01-03T15:00:00", 1),
            TimedRecord::new("bad-2", 2),
            TimedRecord::new("Wed Jan 03 14:00:00 2024", 3),
        ];
        let sorted = sort_records(records, &TimestampParser::new());
        let order: Vec<i32> = sorted.iter().map(|r| r.payload).collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "time,soc").unwrap();
        writeln!(file, "2024-01-02T00:00:00,50").unwrap();
        writeln!(file, "2024-01-01T00:00:00,60").unwrap();

        let spec = SourceSpec::new(file.path().to_string_lossy(), None);
        let records = spec.load().unwrap();
        assert_eq!(records[0].time, "2024-01-01T00:00:00");
        assert_eq!(records[1].payload.soc, Some(50.0));
    }

    #[test]
    fn test_load_missing_file() {
        let spec = SourceSpec::new("/definitely/not/here.json", None);
        let err = spec.load().unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
