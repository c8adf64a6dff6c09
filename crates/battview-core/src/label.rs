//! Display labels with span-adaptive granularity.
//!
//! The label of a record depends on how wide the selected interval is: a
//! few days of data are labeled by clock time, a month by day of month and
//! anything longer by month name.

use std::fmt;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

use battview_types::{Interval, TimedRecord};

use crate::filter::Stamped;
use crate::metrics::PipelineMetrics;
use crate::timestamp::{TimestampParser, month_abbrev};

/// Widest span, in whole days, still labeled by clock time.
pub const MINUTE_SPAN_DAYS: i64 = 7;
/// Widest span, in whole days, still labeled by day of month.
pub const DAY_SPAN_DAYS: i64 = 31;

/// How precisely a label identifies its record's time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// `HH:MM`.
    Minute,
    /// Zero-padded day of month, e.g. `03`.
    DayOfMonth,
    /// English month abbreviation, e.g. `Jan`.
    Month,
}

impl Granularity {
    /// Granularity for a span measured in whole days.
    pub fn for_span(days: i64) -> Self {
        match days {
            ..=MINUTE_SPAN_DAYS => Self::Minute,
            ..=DAY_SPAN_DAYS => Self::DayOfMonth,
            _ => Self::Month,
        }
    }

    /// Granularity for an optional interval. No interval means clock time.
    pub fn for_interval(interval: Option<&Interval>) -> Self {
        interval.map_or(Self::Minute, |i| Self::for_span(i.whole_days()))
    }

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::DayOfMonth => "day",
            Self::Month => "month",
        }
    }

    /// Render an instant at this granularity.
    pub fn format(self, t: OffsetDateTime) -> String {
        match self {
            Self::Minute => format!("{:02}:{:02}", t.hour(), t.minute()),
            Self::DayOfMonth => format!("{:02}", t.day()),
            Self::Month => month_abbrev(t.month()).to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A filtered record with its derived display label.
#[derive(Debug, Serialize)]
pub struct LabeledRecord<'a, P> {
    /// The source record.
    #[serde(flatten)]
    pub record: &'a TimedRecord<P>,
    /// Parsed instant; `None` when the raw timestamp was unrecognized.
    #[serde(skip)]
    pub instant: Option<OffsetDateTime>,
    /// Label shown in place of the raw timestamp.
    pub display_time: String,
}

impl<P> Clone for LabeledRecord<'_, P> {
    fn clone(&self) -> Self {
        Self {
            record: self.record,
            instant: self.instant,
            display_time: self.display_time.clone(),
        }
    }
}

/// Whether the raw string carries the ISO date/time separator.
///
/// Only a `T` directly after a digit counts, so weekday names such as
/// `Tue` or `Thu` do not.
pub fn has_time_separator(raw: &str) -> bool {
    raw.as_bytes()
        .windows(2)
        .any(|w| w[0].is_ascii_digit() && w[1] == b'T')
}

/// Derives labels for stamped records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLabeler {
    granularity: Granularity,
    unbounded: bool,
}

impl DisplayLabeler {
    /// Labeler for the given interval (or none).
    pub fn new(interval: Option<&Interval>) -> Self {
        Self {
            granularity: Granularity::for_interval(interval),
            unbounded: interval.is_none(),
        }
    }

    /// The granularity in use.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Label a single record. Returns `None` when the raw string is used
    /// unchanged.
    pub fn label_one(&self, raw: &str, instant: Option<OffsetDateTime>) -> Option<String> {
        let t = instant?;
        if self.unbounded && !has_time_separator(raw) {
            return None;
        }
        Some(self.granularity.format(t))
    }

    /// Label every stamped record, preserving order.
    pub fn label<'a, P>(
        &self,
        stamped: Vec<Stamped<'a, P>>,
        metrics: &PipelineMetrics,
    ) -> Vec<LabeledRecord<'a, P>> {
        stamped
            .into_iter()
            .map(|s| {
                let display_time = match self.label_one(&s.record.time, s.instant) {
                    Some(label) => label,
                    None => {
                        if s.instant.is_none() {
                            debug!("Using raw label for '{}'", s.record.time);
                        }
                        metrics.record_raw_label();
                        s.record.time.clone()
                    }
                };
                LabeledRecord {
                    record: s.record,
                    instant: s.instant,
                    display_time,
                }
            })
            .collect()
    }
}

/// Label records for an optional interval with the default parser.
///
/// ```
/// use battview_core::label::label;
/// use battview_types::{DateSelection, TimedRecord};
/// use time::macros::date;
///
/// let records = vec![TimedRecord::new("2024-01-02T09:30:00", ())];
/// let interval = DateSelection::range(date!(2024 - 01 - 01), date!(2024 - 01 - 04)).interval();
/// let labeled = label(&records, Some(&interval));
/// assert_eq!(labeled[0].display_time, "09:30");
/// ```
pub fn label<'a, P>(
    records: &'a [TimedRecord<P>],
    interval: Option<&Interval>,
) -> Vec<LabeledRecord<'a, P>> {
    let metrics = PipelineMetrics::new();
    let stamped = crate::filter::stamp(records, &TimestampParser::new(), &metrics);
    DisplayLabeler::new(interval).label(stamped, &metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use battview_types::DateSelection;
    use time::macros::{date, datetime};

    fn labels(times: &[&str], interval: Option<&Interval>) -> Vec<String> {
        let records: Vec<_> = times.iter().map(|t| TimedRecord::new(*t, ())).collect();
        label(&records, interval)
            .into_iter()
            .map(|r| r.display_time)
            .collect()
    }

    #[test]
    fn test_granularity_thresholds() {
        assert_eq!(Granularity::for_span(0), Granularity::Minute);
        assert_eq!(Granularity::for_span(7), Granularity::Minute);
        assert_eq!(Granularity::for_span(8), Granularity::DayOfMonth);
        assert_eq!(Granularity::for_span(31), Granularity::DayOfMonth);
        assert_eq!(Granularity::for_span(32), Granularity::Month);
        assert_eq!(Granularity::for_interval(None), Granularity::Minute);
    }

    #[test]
    fn test_granularity_format() {
        let t = datetime!(2024-03-05 07:04:00 UTC);
        assert_eq!(Granularity::Minute.format(t), "07:04");
        assert_eq!(Granularity::DayOfMonth.format(t), "05");
        assert_eq!(Granularity::Month.format(t), "Mar");
    }

    #[test]
    fn test_three_day_span_uses_clock_time() {
        let interval = DateSelection::range(date!(2024 - 01 - 01), date!(2024 - 01 - 03)).interval();
        let out = labels(
            &["2024-01-01T08:15:00", "Tue Jan 02 17:45:00 2024"],
            Some(&interval),
        );
        assert_eq!(out, vec!["08:15", "17:45"]);
    }

    #[test]
    fn test_two_week_span_uses_day_of_month() {
        let interval = DateSelection::range(date!(2024 - 01 - 01), date!(2024 - 01 - 14)).interval();
        let out = labels(&["2024-01-03T08:15:00"], Some(&interval));
        assert_eq!(out, vec!["03"]);
    }

    #[test]
    fn test_forty_day_span_uses_month_name() {
        let interval = DateSelection::range(date!(2024 - 01 - 01), date!(2024 - 02 - 09)).interval();
        let out = labels(
            &["2024-01-20T08:15:00", "2024-02-05T10:00:00"],
            Some(&interval),
        );
        assert_eq!(out, vec!["Jan", "Feb"]);
    }

    #[test]
    fn test_no_interval_depends_on_separator() {
        let out = labels(
            &["2024-01-03T14:05:00", "Wed Jan 03 14:05:00 2024", "not-a-date"],
            None,
        );
        assert_eq!(out, vec!["14:05", "Wed Jan 03 14:05:00 2024", "not-a-date"]);
    }

    #[test]
    fn test_unparseable_keeps_raw_string_with_interval() {
        let interval = DateSelection::single(date!(2024 - 01 - 01)).interval();
        assert_eq!(labels(&["garbage"], Some(&interval)), vec!["garbage"]);
    }

    #[test]
    fn test_has_time_separator() {
        assert!(has_time_separator("2024-01-03T14:05:00"));
        assert!(!has_time_separator("Tue Jan 02 17:45:00 2024"));
        assert!(!has_time_separator("Thu"));
        assert!(!has_time_separator(""));
    }

    #[test]
    fn test_raw_labels_are_counted() {
        let records = vec![
            TimedRecord::new("2024-01-03T14:05:00", ()),
            TimedRecord::new("not-a-date", ()),
        ];
        let metrics = PipelineMetrics::new();
        let stamped = crate::filter::stamp(&records, &TimestampParser::new(), &metrics);
        let labeled = DisplayLabeler::new(None).label(stamped, &metrics);
        assert_eq!(labeled.len(), 2);
        assert_eq!(metrics.snapshot().raw_labels, 1);
    }

    #[test]
    fn test_labeled_record_serializes_flat() {
        let records = vec![TimedRecord::new("2024-01-03T14:05:00", ())];
        let labeled = label(&records, None);
        let json = serde_json::to_value(&labeled[0]).unwrap();
        assert_eq!(json["time"], "2024-01-03T14:05:00");
        assert_eq!(json["display_time"], "14:05");
    }
}
