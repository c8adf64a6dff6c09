//! Date-range and time-of-day filtering.
//!
//! Records are first *stamped*: each record's raw timestamp is parsed once
//! and the result (or the failure) travels with it through the rest of the
//! pipeline. A [`RangeFilter`] then keeps the stamped records that fall
//! inside the active [`Interval`] and [`TimeOfDayBound`].
//!
//! Records whose timestamp could not be parsed are excluded by any active
//! filter: a record that cannot be dated is outside every requested range.
//! With no filter active they are all kept.

use time::OffsetDateTime;
use tracing::{debug, warn};

use battview_types::{Interval, TimeOfDayBound, TimedRecord, ViewState};

use crate::metrics::PipelineMetrics;
use crate::timestamp::TimestampParser;

/// A record paired with its parsed instant.
#[derive(Debug)]
pub struct Stamped<'a, P> {
    /// The underlying record.
    pub record: &'a TimedRecord<P>,
    /// Parsed instant, or `None` when the timestamp was unrecognized.
    pub instant: Option<OffsetDateTime>,
}

// Manual impls: the record is borrowed, so `P` need not be `Clone`.
impl<P> Clone for Stamped<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Stamped<'_, P> {}

/// Parse every record's timestamp once.
///
/// Failures are logged at `debug` and counted; the record is kept with no
/// instant so later stages can decide how to degrade.
pub fn stamp<'a, P>(
    records: &'a [TimedRecord<P>],
    parser: &TimestampParser,
    metrics: &PipelineMetrics,
) -> Vec<Stamped<'a, P>> {
    metrics.record_stamped(records.len() as u64);
    records
        .iter()
        .map(|record| {
            let instant = match parser.parse(&record.time) {
                Ok(t) => Some(t),
                Err(e) => {
                    debug!("Skipping date for record: {}", e);
                    metrics.record_parse_failure();
                    None
                }
            };
            Stamped { record, instant }
        })
        .collect()
}

/// Keeps records inside a date interval and a daily time-of-day bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeFilter {
    interval: Option<Interval>,
    time_of_day: Option<TimeOfDayBound>,
}

impl RangeFilter {
    /// Create a filter. `None` disables the corresponding axis.
    pub fn new(interval: Option<Interval>, time_of_day: Option<TimeOfDayBound>) -> Self {
        Self {
            interval,
            time_of_day,
        }
    }

    /// The filter described by a view state.
    pub fn from_state(state: &ViewState) -> Self {
        Self::new(state.interval().copied(), state.time_of_day().copied())
    }

    /// Whether either axis is active.
    pub fn is_active(&self) -> bool {
        self.interval.is_some() || self.time_of_day.is_some()
    }

    /// Whether a record with the given instant passes the filter.
    pub fn matches(&self, instant: Option<OffsetDateTime>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(t) = instant else {
            return false;
        };
        if let Some(interval) = &self.interval
            && !interval.contains(t)
        {
            return false;
        }
        if let Some(bound) = &self.time_of_day
            && !bound.contains(t.hour(), t.minute())
        {
            return false;
        }
        true
    }

    /// Keep the stamped records that pass, preserving their order.
    pub fn apply<'a, P>(
        &self,
        stamped: Vec<Stamped<'a, P>>,
        metrics: &PipelineMetrics,
    ) -> Vec<Stamped<'a, P>> {
        if !self.is_active() {
            return stamped;
        }
        if let Some(bound) = &self.time_of_day
            && bound.crosses_midnight()
        {
            warn!(
                "Time-of-day bound {} crosses midnight; no records will match",
                bound
            );
        }

        let before = stamped.len();
        let kept: Vec<_> = stamped
            .into_iter()
            .filter(|s| self.matches(s.instant))
            .collect();
        metrics.record_filtered_out((before - kept.len()) as u64);
        kept
    }
}

/// Filter records by an optional interval and time-of-day bound.
///
/// Convenience wrapper over [`stamp`] and [`RangeFilter::apply`] with the
/// default parser and throwaway metrics.
///
/// ```
/// use battview_core::filter::filter;
/// use battview_types::{DateSelection, TimedRecord};
/// use time::macros::date;
///
/// let records = vec![
///     TimedRecord::new("2024-01-01T08:00:00", ()),
///     TimedRecord::new("2024-01-02T08:00:00", ()),
/// ];
/// let interval = DateSelection::single(date!(2024 - 01 - 01)).interval();
/// let kept = filter(&records, Some(&interval), None);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].time, "2024-01-01T08:00:00");
/// ```
pub fn filter<'a, P>(
    records: &'a [TimedRecord<P>],
    interval: Option<&Interval>,
    time_of_day: Option<&TimeOfDayBound>,
) -> Vec<&'a TimedRecord<P>> {
    let metrics = PipelineMetrics::new();
    let stamped = stamp(records, &TimestampParser::new(), &metrics);
    RangeFilter::new(interval.copied(), time_of_day.copied())
        .apply(stamped, &metrics)
        .into_iter()
        .map(|s| s.record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use battview_types::DateSelection;
    use time::macros::date;

    fn records(times: &[&str]) -> Vec<TimedRecord<usize>> {
        times
            .iter()
            .enumerate()
            .map(|(i, t)| TimedRecord::new(*t, i))
            .collect()
    }

    fn payloads(kept: &[&TimedRecord<usize>]) -> Vec<usize> {
        kept.iter().map(|r| r.payload).collect()
    }

    #[test]
    fn test_single_day_selection_keeps_only_that_day() {
        let data = records(&["2024-01-01T08:00:00", "2024-01-02T08:00:00"]);
        let interval = DateSelection::single(date!(2024 - 01 - 01)).interval();
        let kept = filter(&data, Some(&interval), None);
        assert_eq!(payloads(&kept), vec![0]);
    }

    #[test]
    fn test_multi_day_selection_includes_last_day() {
        let data = records(&[
            "2023-12-31T23:59:59",
            "2024-01-01T00:00:00",
            "2024-01-03T23:30:00",
            "2024-01-04T00:00:00",
        ]);
        let interval = DateSelection::range(date!(2024 - 01 - 01), date!(2024 - 01 - 03)).interval();
        let kept = filter(&data, Some(&interval), None);
        assert_eq!(payloads(&kept), vec![1, 2]);
    }

    #[test]
    fn test_no_filter_is_identity_including_unparseable() {
        let data = records(&["2024-01-01T08:00:00", "not-a-date", "Tue Jan 02 08:00:00 2024"]);
        let kept = filter(&data, None, None);
        assert_eq!(payloads(&kept), vec![0, 1, 2]);
    }

    #[test]
    fn test_unparseable_excluded_when_filtering() {
        let data = records(&["2024-01-01T08:00:00", "not-a-date"]);
        let interval = DateSelection::single(date!(2024 - 01 - 01)).interval();
        assert_eq!(payloads(&filter(&data, Some(&interval), None)), vec![0]);

        let bound = TimeOfDayBound::new(0, 0, 23, 59);
        assert_eq!(payloads(&filter(&data, None, Some(&bound))), vec![0]);
    }

    #[test]
    fn test_time_of_day_filter_on_each_day() {
        let data = records(&[
            "2024-01-01T05:59:00",
            "2024-01-01T06:00:00",
            "2024-01-01T18:30:59",
            "2024-01-01T18:31:00",
            "2024-01-02T12:00:00",
        ]);
        let bound = TimeOfDayBound::new(6, 0, 18, 30);
        let kept = filter(&data, None, Some(&bound));
        assert_eq!(payloads(&kept), vec![1, 2, 4]);
    }

    #[test]
    fn test_interval_and_time_of_day_combine() {
        let data = records(&[
            "2024-01-01T07:00:00",
            "2024-01-01T20:00:00",
            "2024-01-02T07:00:00",
        ]);
        let interval = DateSelection::single(date!(2024 - 01 - 01)).interval();
        let bound = TimeOfDayBound::new(6, 0, 12, 0);
        let kept = filter(&data, Some(&interval), Some(&bound));
        assert_eq!(payloads(&kept), vec![0]);
    }

    #[test]
    fn test_bound_crossing_midnight_matches_nothing() {
        let data = records(&["2024-01-01T23:00:00", "2024-01-02T01:00:00"]);
        let bound = TimeOfDayBound::new(22, 0, 2, 0);
        assert!(filter(&data, None, Some(&bound)).is_empty());
    }

    #[test]
    fn test_apply_counts_filtered_records() {
        let data = records(&["2024-01-01T08:00:00", "2024-01-05T08:00:00", "bad"]);
        let metrics = PipelineMetrics::new();
        let stamped = stamp(&data, &TimestampParser::new(), &metrics);
        let interval = DateSelection::single(date!(2024 - 01 - 01)).interval();
        let kept = RangeFilter::new(Some(interval), None).apply(stamped, &metrics);

        assert_eq!(kept.len(), 1);
        let stats = metrics.snapshot();
        assert_eq!(stats.stamped, 3);
        assert_eq!(stats.parse_failures, 1);
        assert_eq!(stats.filtered_out, 2);
    }

    #[test]
    fn test_filter_from_state() {
        let state = ViewState::new();
        assert!(!RangeFilter::from_state(&state).is_active());

        let state = state.with_time_of_day(Some(TimeOfDayBound::new(1, 0, 2, 0)));
        assert!(RangeFilter::from_state(&state).is_active());
    }
}

/// Property-based tests for ordering and idempotence.
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::timestamp::TimestampFormat;
    use proptest::prelude::*;

    fn record_times() -> impl Strategy<Value = Vec<String>> {
        // Mostly valid timestamps in early 2024, with the odd garbage row.
        proptest::collection::vec(
            prop_oneof![
                8 => (1_704_067_200i64..1_709_251_200).prop_map(|secs| {
                    let t = OffsetDateTime::from_unix_timestamp(secs).expect("in range");
                    TimestampFormat::IsoLocal.render(t)
                }),
                1 => "[a-z]{1,8}",
            ],
            0..60,
        )
    }

    fn filter_args() -> impl Strategy<Value = (Option<Interval>, Option<TimeOfDayBound>)> {
        let interval = proptest::option::of((1u8..=29, 0u8..=29).prop_map(|(start, len)| {
            let from = time::Date::from_calendar_date(2024, time::Month::February, start)
                .expect("valid day");
            let to = from.saturating_add(time::Duration::days(i64::from(len)));
            Interval::days(from, to)
        }));
        let bound = proptest::option::of((0u8..24, 0u8..60, 0u8..24, 0u8..60).prop_map(
            |(sh, sm, eh, em)| TimeOfDayBound::new(sh, sm, eh, em),
        ));
        (interval, bound)
    }

    proptest! {
        #[test]
        fn output_is_ordered_subsequence(times in record_times(), (interval, bound) in filter_args()) {
            let data: Vec<TimedRecord<usize>> = times
                .iter()
                .enumerate()
                .map(|(i, t)| TimedRecord::new(t.as_str(), i))
                .collect();
            let kept = filter(&data, interval.as_ref(), bound.as_ref());
            let indices: Vec<usize> = kept.iter().map(|r| r.payload).collect();
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn filtering_is_idempotent(times in record_times(), (interval, bound) in filter_args()) {
            let data: Vec<TimedRecord<usize>> = times
                .iter()
                .enumerate()
                .map(|(i, t)| TimedRecord::new(t.as_str(), i))
                .collect();
            let once: Vec<TimedRecord<usize>> = filter(&data, interval.as_ref(), bound.as_ref())
                .into_iter()
                .cloned()
                .collect();
            let twice: Vec<TimedRecord<usize>> = filter(&once, interval.as_ref(), bound.as_ref())
                .into_iter()
                .cloned()
                .collect();
            prop_assert_eq!(once, twice);
        }
    }
}
