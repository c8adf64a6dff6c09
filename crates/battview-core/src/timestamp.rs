//! Timestamp parsing for telemetry rows.
//!
//! Rows arrive with their time as text in one of a few shapes. The parser
//! holds an ordered list of [`TimestampFormat`] matchers and returns the
//! first one that accepts the input.
//!
//! | Format | Example |
//! |--------|---------|
//! | [`TimestampFormat::Rfc3339`] | `2024-01-03T14:05:00Z`, `2024-01-03T16:05:00+02:00` |
//! | [`TimestampFormat::IsoLocal`] | `2024-01-03T14:05:00`, `2024-01-03T14:05:00.250` |
//! | [`TimestampFormat::Clock`] | `Wed Jan 03 14:05:00 2024`, `Wed Jan  3 14:05:00 UTC 2024` |
//!
//! Fractional seconds are accepted in every format and dropped by
//! [`TimestampFormat::render`]. All instants are returned in UTC. Inputs without an explicit offset are
//! taken as UTC wall-clock time.
//!
//! # Example
//!
//! ```
//! use battview_core::timestamp::{TimestampFormat, TimestampParser};
//!
//! let parser = TimestampParser::new();
//! let a = parser.parse("Wed Jan 03 14:05:00 2024").unwrap();
//! let b = parser.parse("2024-01-03T14:05:00").unwrap();
//! assert_eq!(a, b);
//!
//! let (format, _) = parser.detect("2024-01-03T14:05:00Z").unwrap();
//! assert_eq!(format, TimestampFormat::Rfc3339);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Month, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use battview_types::{ParseError, ParseResult};

const ISO_LOCAL: &[BorrowedFormatItem<'static>] =
    format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

/// English month abbreviations, in calendar order.
const MONTHS: [(&str, Month); 12] = [
    ("Jan", Month::January),
    ("Feb", Month::February),
    ("Mar", Month::March),
    ("Apr", Month::April),
    ("May", Month::May),
    ("Jun", Month::June),
    ("Jul", Month::July),
    ("Aug", Month::August),
    ("Sep", Month::September),
    ("Oct", Month::October),
    ("Nov", Month::November),
    ("Dec", Month::December),
];

/// English weekday abbreviations, Monday first.
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Three-letter English abbreviation for a month.
pub fn month_abbrev(month: Month) -> &'static str {
    MONTHS[usize::from(u8::from(month)) - 1].0
}

fn month_from_abbrev(token: &str) -> Option<Month> {
    MONTHS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token))
        .map(|&(_, month)| month)
}

/// A supported textual timestamp shape.
///
/// This enum is marked `#[non_exhaustive]`; supporting another shape means
/// adding a variant and listing it in [`TimestampFormat::DEFAULT_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TimestampFormat {
    /// RFC 3339 with an explicit offset.
    Rfc3339,
    /// `YYYY-MM-DDTHH:mm:ss` without an offset.
    IsoLocal,
    /// `Weekday Mon DD HH:mm:ss [Zone] Year`, as printed by `date(1)`.
    Clock,
}

impl TimestampFormat {
    /// Order in which formats are tried by [`TimestampParser::new`].
    ///
    /// `Rfc3339` comes before `IsoLocal` so that an explicit offset is
    /// honored rather than rejected as trailing input.
    pub const DEFAULT_ORDER: [TimestampFormat; 3] = [
        TimestampFormat::Rfc3339,
        TimestampFormat::IsoLocal,
        TimestampFormat::Clock,
    ];

    /// Short name for display.
    pub fn name(self) -> &'static str {
        match self {
            TimestampFormat::Rfc3339 => "rfc3339",
            TimestampFormat::IsoLocal => "iso-local",
            TimestampFormat::Clock => "clock",
        }
    }

    /// Try to parse `raw` in this format.
    pub fn try_parse(self, raw: &str) -> Option<OffsetDateTime> {
        let raw = raw.trim();
        match self {
            TimestampFormat::Rfc3339 => OffsetDateTime::parse(raw, &Rfc3339)
                .ok()
                .map(|t| t.to_offset(UtcOffset::UTC)),
            TimestampFormat::IsoLocal => parse_iso_local(raw),
            TimestampFormat::Clock => parse_clock(raw),
        }
    }

    /// Render an instant in this format, at second precision, in UTC.
    ///
    /// ```
    /// use battview_core::timestamp::TimestampFormat;
    /// use time::macros::datetime;
    ///
    /// let t = datetime!(2024-01-03 14:05:00 UTC);
    /// assert_eq!(TimestampFormat::IsoLocal.render(t), "2024-01-03T14:05:00");
    /// assert_eq!(TimestampFormat::Clock.render(t), "Wed Jan 03 14:05:00 2024");
    /// assert_eq!(TimestampFormat::Rfc3339.render(t), "2024-01-03T14:05:00Z");
    /// ```
    pub fn render(self, t: OffsetDateTime) -> String {
        let t = t.to_offset(UtcOffset::UTC);
        match self {
            TimestampFormat::Rfc3339 => format!("{}Z", iso_local_string(t)),
            TimestampFormat::IsoLocal => iso_local_string(t),
            TimestampFormat::Clock => format!(
                "{} {} {:02} {:02}:{:02}:{:02} {:04}",
                WEEKDAYS[usize::from(t.weekday().number_days_from_monday())],
                month_abbrev(t.month()),
                t.day(),
                t.hour(),
                t.minute(),
                t.second(),
                t.year()
            ),
        }
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn iso_local_string(t: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        t.year(),
        u8::from(t.month()),
        t.day(),
        t.hour(),
        t.minute(),
        t.second()
    )
}

fn parse_iso_local(raw: &str) -> Option<OffsetDateTime> {
    PrimitiveDateTime::parse(raw, ISO_LOCAL)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Reassemble a `date(1)`-style timestamp into ISO form and parse that.
fn parse_clock(raw: &str) -> Option<OffsetDateTime> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let (weekday, month, day, clock, year) = match tokens.as_slice() {
        [weekday, month, day, clock, year] => (*weekday, *month, *day, *clock, *year),
        [weekday, month, day, clock, _zone, year] => (*weekday, *month, *day, *clock, *year),
        _ => return None,
    };

    if !WEEKDAYS.iter().any(|w| w.eq_ignore_ascii_case(weekday)) {
        return None;
    }
    let month = month_from_abbrev(month)?;
    if day.is_empty() || day.len() > 2 || !day.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let iso = format!("{}-{:02}-{:0>2}T{}", year, u8::from(month), day, clock);
    parse_iso_local(&iso)
}

/// Ordered list of timestamp matchers; the first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParser {
    formats: Vec<TimestampFormat>,
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampParser {
    /// A parser trying [`TimestampFormat::DEFAULT_ORDER`].
    pub fn new() -> Self {
        Self::with_formats(TimestampFormat::DEFAULT_ORDER)
    }

    /// A parser trying the given formats in order.
    pub fn with_formats(formats: impl IntoIterator<Item = TimestampFormat>) -> Self {
        Self {
            formats: formats.into_iter().collect(),
        }
    }

    /// The formats tried, in order.
    pub fn formats(&self) -> &[TimestampFormat] {
        &self.formats
    }

    /// Parse a raw timestamp into a UTC instant.
    pub fn parse(&self, raw: &str) -> ParseResult<OffsetDateTime> {
        self.detect(raw).map(|(_, t)| t)
    }

    /// Parse a raw timestamp and report which format matched.
    pub fn detect(&self, raw: &str) -> ParseResult<(TimestampFormat, OffsetDateTime)> {
        self.formats
            .iter()
            .find_map(|&format| format.try_parse(raw).map(|t| (format, t)))
            .ok_or_else(|| ParseError::UnrecognizedTimestamp(raw.to_string()))
    }
}

/// Parse a raw timestamp with the default format order.
pub fn parse(raw: &str) -> ParseResult<OffsetDateTime> {
    TimestampParser::new().parse(raw)
}
