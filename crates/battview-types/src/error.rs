//! Error types for battview-types.

use thiserror::Error;

/// Errors that can occur when parsing timestamps and user-supplied bounds.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// (for example when a new timestamp format is supported) without breaking
/// downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The timestamp matched none of the supported formats.
    #[error("Unrecognized timestamp: '{0}'")]
    UnrecognizedTimestamp(String),

    /// A time-of-day bound could not be parsed.
    #[error("Invalid time-of-day bound '{input}': {reason}")]
    InvalidTimeOfDay {
        /// The text that was supplied.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A calendar date could not be parsed.
    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

impl ParseError {
    /// Create a time-of-day error.
    pub fn time_of_day(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTimeOfDay {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias using battview-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Out-of-bounds window requests.
///
/// These are recovered by clamping inside the window controller and are
/// only ever logged and counted. They never reach the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RangeError {
    /// A scroll offset below zero was requested.
    #[error("Negative offset {0}")]
    NegativeOffset(i64),

    /// A window size below the configured floor was requested.
    #[error("Window size {requested} below minimum {min}")]
    SizeBelowMinimum {
        /// The requested size.
        requested: i64,
        /// The configured floor.
        min: usize,
    },

    /// A window size larger than the filtered sequence was requested.
    #[error("Window size {requested} exceeds sequence length {len}")]
    SizeAboveLength {
        /// The requested size.
        requested: usize,
        /// The filtered sequence length.
        len: usize,
    },

    /// An offset past the last valid window start was requested.
    #[error("Offset {offset} beyond maximum {max}")]
    OffsetBeyondMax {
        /// The requested offset.
        offset: usize,
        /// The maximum valid offset.
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::UnrecognizedTimestamp("not-a-date".to_string());
        assert_eq!(err.to_string(), "Unrecognized timestamp: 'not-a-date'");

        let err = ParseError::time_of_day("25:00-26:00", "hour out of range");
        assert!(err.to_string().contains("25:00-26:00"));
        assert!(err.to_string().contains("hour out of range"));

        let err = ParseError::InvalidDate("2024/01/01".to_string());
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_range_error_display() {
        let err = RangeError::NegativeOffset(-5);
        assert_eq!(err.to_string(), "Negative offset -5");

        let err = RangeError::OffsetBeyondMax { offset: 90, max: 70 };
        assert!(err.to_string().contains("90"));
        assert!(err.to_string().contains("70"));
    }
}
