//! User-interaction state for a time-windowed view.
//!
//! All types here are plain values. A view is driven by replacing its
//! [`ViewState`] wholesale on every interaction, never by mutating part of
//! it in place.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::macros::{format_description, time};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::error::{ParseError, ParseResult};

/// Last representable instant of a day.
const END_OF_DAY: Time = time!(23:59:59.999_999_999);

/// Default number of records in the visible window.
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// Parse a calendar date in `YYYY-MM-DD` form.
///
/// ```
/// use battview_types::parse_date;
///
/// let date = parse_date("2024-01-03").unwrap();
/// assert_eq!(date.day(), 3);
/// assert!(parse_date("03/01/2024").is_err());
/// ```
pub fn parse_date(s: &str) -> ParseResult<Date> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| ParseError::InvalidDate(s.to_string()))
}

/// An inclusive range of absolute instants.
///
/// Both ends are normalized to UTC and ordered so that `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval {
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    start: OffsetDateTime,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    end: OffsetDateTime,
}

impl Interval {
    /// Create an interval from two instants, in either order.
    pub fn new(a: OffsetDateTime, b: OffsetDateTime) -> Self {
        let a = a.to_offset(time::UtcOffset::UTC);
        let b = b.to_offset(time::UtcOffset::UTC);
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// The whole of a single calendar day (UTC).
    pub fn single_day(date: Date) -> Self {
        Self::days(date, date)
    }

    /// From the start of `from` through the end of `to`, inclusive of the
    /// entire final day.
    pub fn days(from: Date, to: Date) -> Self {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        Self {
            start: from.midnight().assume_utc(),
            end: PrimitiveDateTime::new(to, END_OF_DAY).assume_utc(),
        }
    }

    /// Start of the interval (inclusive).
    pub fn start(&self) -> OffsetDateTime {
        self.start
    }

    /// End of the interval (inclusive).
    pub fn end(&self) -> OffsetDateTime {
        self.end
    }

    /// Whether `t` lies within the interval, ends included.
    pub fn contains(&self, t: OffsetDateTime) -> bool {
        self.start <= t && t <= self.end
    }

    /// Number of whole days between start and end.
    ///
    /// A single-day selection spans 0 whole days.
    pub fn whole_days(&self) -> i64 {
        (self.end - self.start).whole_days()
    }
}

impl From<DateSelection> for Interval {
    fn from(selection: DateSelection) -> Self {
        selection.interval()
    }
}

/// A calendar selection as made in a date picker: one date, or a start and
/// an end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateSelection {
    /// First selected date.
    pub start: Date,
    /// Last selected date; `None` for a single-day selection.
    pub end: Option<Date>,
}

impl DateSelection {
    /// A single selected day.
    pub fn single(date: Date) -> Self {
        Self {
            start: date,
            end: None,
        }
    }

    /// A multi-day selection.
    pub fn range(start: Date, end: Date) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// The inclusive interval this selection covers.
    ///
    /// The end boundary is always the end of the last selected day.
    pub fn interval(&self) -> Interval {
        Interval::days(self.start, self.end.unwrap_or(self.start))
    }
}

/// A daily hour:minute window, applied independently of any date interval.
///
/// Bounds are inclusive at minute resolution. A bound whose start is later
/// than its end would cross midnight; such bounds are representable but
/// match nothing (see [`TimeOfDayBound::crosses_midnight`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeOfDayBound {
    start_hour: u8,
    start_minute: u8,
    end_hour: u8,
    end_minute: u8,
}

impl TimeOfDayBound {
    /// Create a bound, clamping hours to 23 and minutes to 59.
    pub fn new(start_hour: u8, start_minute: u8, end_hour: u8, end_minute: u8) -> Self {
        Self {
            start_hour: start_hour.min(23),
            start_minute: start_minute.min(59),
            end_hour: end_hour.min(23),
            end_minute: end_minute.min(59),
        }
    }

    /// Start as `(hour, minute)`.
    pub fn start(&self) -> (u8, u8) {
        (self.start_hour, self.start_minute)
    }

    /// End as `(hour, minute)`.
    pub fn end(&self) -> (u8, u8) {
        (self.end_hour, self.end_minute)
    }

    /// Whether the bound's start is later than its end.
    pub fn crosses_midnight(&self) -> bool {
        self.start() > self.end()
    }

    /// Whether an hour:minute lies within the bound.
    pub fn contains(&self, hour: u8, minute: u8) -> bool {
        let hm = (hour, minute);
        self.start() <= hm && hm <= self.end()
    }
}

impl fmt::Display for TimeOfDayBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_hour, self.start_minute, self.end_hour, self.end_minute
        )
    }
}

impl FromStr for TimeOfDayBound {
    type Err = ParseError;

    /// Parse `HH:MM-HH:MM`.
    ///
    /// ```
    /// use battview_types::TimeOfDayBound;
    ///
    /// let bound: TimeOfDayBound = "06:00-18:30".parse().unwrap();
    /// assert_eq!(bound.start(), (6, 0));
    /// assert_eq!(bound.end(), (18, 30));
    /// assert!("6pm-9pm".parse::<TimeOfDayBound>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| ParseError::time_of_day(s, "expected HH:MM-HH:MM"))?;
        let (sh, sm) = parse_hour_minute(s, start)?;
        let (eh, em) = parse_hour_minute(s, end)?;
        Ok(Self::new(sh, sm, eh, em))
    }
}

fn parse_hour_minute(input: &str, part: &str) -> ParseResult<(u8, u8)> {
    let (h, m) = part
        .trim()
        .split_once(':')
        .ok_or_else(|| ParseError::time_of_day(input, format!("'{}' is not HH:MM", part)))?;
    let hour: u8 = h
        .parse()
        .map_err(|_| ParseError::time_of_day(input, format!("invalid hour '{}'", h)))?;
    let minute: u8 = m
        .parse()
        .map_err(|_| ParseError::time_of_day(input, format!("invalid minute '{}'", m)))?;
    if hour > 23 {
        return Err(ParseError::time_of_day(
            input,
            format!("hour {} out of range", hour),
        ));
    }
    if minute > 59 {
        return Err(ParseError::time_of_day(
            input,
            format!("minute {} out of range", minute),
        ));
    }
    Ok((hour, minute))
}

/// A scroll offset and zoom size over a filtered sequence.
///
/// A `Window` is a request; the window controller in `battview-core`
/// derives the clamped view from it for a given sequence length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Window {
    /// Index of the first visible record.
    pub offset: usize,
    /// Number of visible records (zoom level). Never 0.
    pub size: usize,
}

impl Window {
    /// Create a window. A size of 0 is raised to 1.
    pub fn new(offset: usize, size: usize) -> Self {
        Self {
            offset,
            size: size.max(1),
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(0, DEFAULT_WINDOW_SIZE)
    }
}

/// Everything the user has selected for a view.
///
/// Replaced wholesale on every interaction via the `with_*` builders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    interval: Option<Interval>,
    time_of_day: Option<TimeOfDayBound>,
    window: Window,
}

impl ViewState {
    /// An unfiltered view with the default window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Active date interval, if any.
    pub fn interval(&self) -> Option<&Interval> {
        self.interval.as_ref()
    }

    /// Active time-of-day bound, if any.
    pub fn time_of_day(&self) -> Option<&TimeOfDayBound> {
        self.time_of_day.as_ref()
    }

    /// Requested window.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Replace the date interval.
    #[must_use]
    pub fn with_interval(self, interval: Option<Interval>) -> Self {
        Self { interval, ..self }
    }

    /// Replace the time-of-day bound.
    #[must_use]
    pub fn with_time_of_day(self, time_of_day: Option<TimeOfDayBound>) -> Self {
        Self {
            time_of_day,
            ..self
        }
    }

    /// Replace the window.
    #[must_use]
    pub fn with_window(self, window: Window) -> Self {
        Self { window, ..self }
    }

    /// Whether any record filter is active.
    pub fn is_filtered(&self) -> bool {
        self.interval.is_some() || self.time_of_day.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_single_day_interval_covers_whole_day() {
        let interval = DateSelection::single(date!(2024 - 01 - 01)).interval();
        assert_eq!(interval.start(), datetime!(2024-01-01 00:00:00 UTC));
        assert!(interval.contains(datetime!(2024-01-01 23:59:59 UTC)));
        assert!(!interval.contains(datetime!(2024-01-02 00:00:00 UTC)));
        assert_eq!(interval.whole_days(), 0);
    }

    #[test]
    fn test_multi_day_interval_includes_final_day() {
        let interval = DateSelection::range(date!(2024 - 01 - 01), date!(2024 - 01 - 03)).interval();
        assert!(interval.contains(datetime!(2024-01-03 18:00:00 UTC)));
        assert!(!interval.contains(datetime!(2024-01-04 00:00:00 UTC)));
        assert_eq!(interval.whole_days(), 2);
    }

    #[test]
    fn test_interval_orders_endpoints() {
        let a = datetime!(2024-02-01 00:00:00 UTC);
        let b = datetime!(2024-01-01 00:00:00 UTC);
        let interval = Interval::new(a, b);
        assert_eq!(interval.start(), b);
        assert_eq!(interval.end(), a);

        let swapped = Interval::days(date!(2024 - 01 - 10), date!(2024 - 01 - 01));
        assert_eq!(swapped.start(), datetime!(2024-01-01 00:00:00 UTC));
    }

    #[test]
    fn test_interval_normalizes_to_utc() {
        let interval = Interval::new(
            datetime!(2024-01-01 02:00:00 +02:00),
            datetime!(2024-01-01 05:00:00 UTC),
        );
        assert_eq!(interval.start(), datetime!(2024-01-01 00:00:00 UTC));
        assert_eq!(interval.start().offset(), time::UtcOffset::UTC);
    }

    #[test]
    fn test_time_of_day_contains() {
        let bound = TimeOfDayBound::new(6, 0, 18, 30);
        assert!(bound.contains(6, 0));
        assert!(bound.contains(12, 15));
        assert!(bound.contains(18, 30));
        assert!(!bound.contains(18, 31));
        assert!(!bound.contains(5, 59));
        assert!(!bound.crosses_midnight());
    }

    #[test]
    fn test_time_of_day_clamps_components() {
        let bound = TimeOfDayBound::new(30, 75, 24, 60);
        assert_eq!(bound.start(), (23, 59));
        assert_eq!(bound.end(), (23, 59));
    }

    #[test]
    fn test_time_of_day_crossing_midnight_matches_nothing() {
        let bound = TimeOfDayBound::new(22, 0, 2, 0);
        assert!(bound.crosses_midnight());
        assert!(!bound.contains(23, 0));
        assert!(!bound.contains(1, 0));
    }

    #[test]
    fn test_time_of_day_parse_errors() {
        assert!("".parse::<TimeOfDayBound>().is_err());
        assert!("06:00".parse::<TimeOfDayBound>().is_err());
        assert!("24:00-25:00".parse::<TimeOfDayBound>().is_err());
        assert!("06:60-07:00".parse::<TimeOfDayBound>().is_err());
        assert!("aa:00-07:00".parse::<TimeOfDayBound>().is_err());

        let bound: TimeOfDayBound = " 08:15 - 17:45 ".parse().unwrap();
        assert_eq!(bound.to_string(), "08:15-17:45");
    }

    #[test]
    fn test_window_size_never_zero() {
        assert_eq!(Window::new(3, 0).size, 1);
        assert_eq!(Window::default().size, DEFAULT_WINDOW_SIZE);
    }

    #[test]
    fn test_view_state_builders_replace_fields() {
        let state = ViewState::new();
        assert!(!state.is_filtered());

        let interval = Interval::single_day(date!(2024 - 01 - 01));
        let next = state
            .with_interval(Some(interval))
            .with_window(Window::new(5, 20));
        assert!(next.is_filtered());
        assert_eq!(next.interval(), Some(&interval));
        assert_eq!(next.window(), Window::new(5, 20));
        // The original value is untouched.
        assert_eq!(state.window(), Window::default());

        let cleared = next.with_interval(None);
        assert!(!cleared.is_filtered());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-03").unwrap(), date!(2024 - 01 - 03));
        assert!(matches!(
            parse_date("2024-13-01"),
            Err(ParseError::InvalidDate(_))
        ));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn crossing_bound_matches_nothing(
                sh in 0u8..24, sm in 0u8..60, eh in 0u8..24, em in 0u8..60,
                h in 0u8..24, m in 0u8..60,
            ) {
                let bound = TimeOfDayBound::new(sh, sm, eh, em);
                if bound.crosses_midnight() {
                    prop_assert!(!bound.contains(h, m));
                }
            }

            #[test]
            fn bound_contains_its_ends(
                sh in 0u8..24, sm in 0u8..60, eh in 0u8..24, em in 0u8..60,
            ) {
                let bound = TimeOfDayBound::new(sh, sm, eh, em);
                prop_assume!(!bound.crosses_midnight());
                prop_assert!(bound.contains(sh, sm));
                prop_assert!(bound.contains(eh, em));
            }

            #[test]
            fn day_interval_never_inverted(a in 0i32..3000, b in 0i32..3000) {
                let base = date!(2020 - 01 - 01);
                let from = base + time::Duration::days(i64::from(a));
                let to = base + time::Duration::days(i64::from(b));
                let interval = Interval::days(from, to);
                prop_assert!(interval.start() <= interval.end());
                prop_assert_eq!(interval.whole_days(), i64::from((a - b).abs()));
            }
        }
    }
}
