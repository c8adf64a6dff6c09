//! Parse command implementation.

use std::path::PathBuf;

use anyhow::{Result, bail};
use battview_core::{TimestampFormat, TimestampParser};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::format::{
    FormatOptions, csv_writer, finish_csv, format_instant, format_parse_json, format_parse_text,
};
use crate::util::write_output;

/// How one input string was recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<TimestampFormat>,
    /// The instant in RFC 3339 UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParseOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Run every input through the parser's format list.
pub fn parse_timestamps(inputs: &[String], parser: &TimestampParser) -> Vec<ParseOutcome> {
    inputs
        .iter()
        .map(|input| match parser.detect(input) {
            Ok((format, t)) => ParseOutcome {
                input: input.clone(),
                format: Some(format),
                utc: Some(format_instant(t)),
                error: None,
            },
            Err(e) => ParseOutcome {
                input: input.clone(),
                format: None,
                utc: None,
                error: Some(e.to_string()),
            },
        })
        .collect()
}

fn format_parse_csv(outcomes: &[ParseOutcome], opts: &FormatOptions) -> Result<String> {
    let mut writer = csv_writer(opts, &["input", "format", "utc"])?;
    for outcome in outcomes {
        writer.write_record([
            outcome.input.as_str(),
            outcome.format.map(|f| f.name()).unwrap_or_default(),
            outcome.utc.as_deref().unwrap_or_default(),
        ])?;
    }
    finish_csv(writer)
}

pub fn cmd_parse(
    timestamps: &[String],
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let outcomes = parse_timestamps(timestamps, &TimestampParser::new());

    let content = match format {
        OutputFormat::Json => format_parse_json(&outcomes, opts)?,
        OutputFormat::Text => format_parse_text(&outcomes, opts),
        OutputFormat::Csv => format_parse_csv(&outcomes, opts)?,
    };
    write_output(output, &content)?;

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        bail!("{} of {} timestamp(s) not recognized", failed, outcomes.len());
    }
    Ok(())
}
