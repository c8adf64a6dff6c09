//! Record types for battery telemetry.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single telemetry row with its raw timestamp.
///
/// The timestamp is kept exactly as fetched. It is parsed on demand by the
/// pipeline in `battview-core`, which means a record with an unrecognized
/// timestamp can still be carried through and shown with its raw text.
///
/// The payload is opaque to the pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimedRecord<P> {
    /// Raw timestamp string in one of the supported textual formats.
    pub time: String,
    /// Record payload.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub payload: P,
}

impl<P> TimedRecord<P> {
    /// Create a record from a raw timestamp and payload.
    pub fn new(time: impl Into<String>, payload: P) -> Self {
        Self {
            time: time.into(),
            payload,
        }
    }
}

/// Battery telemetry values for one sample.
///
/// Every field is optional: sources commonly carry only a subset (a
/// state-of-health export has no prediction columns, for instance).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Telemetry {
    /// State of charge in percent.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub soc: Option<f64>,
    /// State of health in percent.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub soh: Option<f64>,
    /// Model-predicted value.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub predicted: Option<f64>,
    /// Measured value the prediction is compared against.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub actual: Option<f64>,
}

impl Telemetry {
    /// Get the value of a metric, if present.
    #[must_use]
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::StateOfCharge => self.soc,
            Metric::StateOfHealth => self.soh,
            Metric::Predicted => self.predicted,
            Metric::Actual => self.actual,
        }
    }

    /// Whether no metric carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Metric::ALL.iter().all(|&m| self.value(m).is_none())
    }
}

/// A plottable telemetry series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Metric {
    /// State of charge.
    StateOfCharge,
    /// State of health.
    StateOfHealth,
    /// Predicted value.
    Predicted,
    /// Actual (measured) value.
    Actual,
}

impl Metric {
    /// All metrics in display order.
    pub const ALL: [Metric; 4] = [
        Metric::StateOfCharge,
        Metric::StateOfHealth,
        Metric::Predicted,
        Metric::Actual,
    ];

    /// Column/field key used by sources and CSV output.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Metric::StateOfCharge => "soc",
            Metric::StateOfHealth => "soh",
            Metric::Predicted => "predicted",
            Metric::Actual => "actual",
        }
    }

    /// Short human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Metric::StateOfCharge => "SoC",
            Metric::StateOfHealth => "SoH",
            Metric::Predicted => "Predicted",
            Metric::Actual => "Actual",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = String;

    /// Parse a metric from its key or label (case-insensitive).
    ///
    /// ```
    /// use battview_types::Metric;
    ///
    /// assert_eq!("soc".parse::<Metric>(), Ok(Metric::StateOfCharge));
    /// assert_eq!("SoH".parse::<Metric>(), Ok(Metric::StateOfHealth));
    /// assert!("voltage".parse::<Metric>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Metric::ALL
            .into_iter()
            .find(|m| m.key() == lower || m.label().to_ascii_lowercase() == lower)
            .ok_or_else(|| {
                format!(
                    "Unknown metric '{}'. Valid values: soc, soh, predicted, actual",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_record_new() {
        let record = TimedRecord::new("2024-01-03T14:05:00", 42u8);
        assert_eq!(record.time, "2024-01-03T14:05:00");
        assert_eq!(record.payload, 42);
    }

    #[test]
    fn test_telemetry_value_lookup() {
        let t = Telemetry {
            soc: Some(81.5),
            soh: None,
            predicted: Some(80.0),
            actual: Some(79.2),
        };
        assert_eq!(t.value(Metric::StateOfCharge), Some(81.5));
        assert_eq!(t.value(Metric::StateOfHealth), None);
        assert_eq!(t.value(Metric::Predicted), Some(80.0));
        assert_eq!(t.value(Metric::Actual), Some(79.2));
        assert!(!t.is_empty());
        assert!(Telemetry::default().is_empty());
    }

    #[test]
    fn test_metric_keys_are_unique() {
        let mut keys: Vec<_> = Metric::ALL.iter().map(|m| m.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Metric::ALL.len());
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("predicted".parse::<Metric>(), Ok(Metric::Predicted));
        assert_eq!(" ACTUAL ".parse::<Metric>(), Ok(Metric::Actual));
        let err = "volts".parse::<Metric>().unwrap_err();
        assert!(err.contains("volts"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_record_json_is_flat() {
        let record = TimedRecord::new(
            "2024-01-03T14:05:00",
            Telemetry {
                soc: Some(55.0),
                ..Default::default()
            },
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"time":"2024-01-03T14:05:00","soc":55.0}"#);

        let parsed: TimedRecord<Telemetry> =
            serde_json::from_str(r#"{"time":"Wed Jan 03 14:05:00 2024","soh":97.1}"#).unwrap();
        assert_eq!(parsed.time, "Wed Jan 03 14:05:00 2024");
        assert_eq!(parsed.payload.soh, Some(97.1));
        assert_eq!(parsed.payload.soc, None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_metric_serialization() {
        assert_eq!(
            serde_json::to_string(&Metric::StateOfCharge).unwrap(),
            "\"state_of_charge\""
        );
    }
}
