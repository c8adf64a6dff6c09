//! Error types for battview-core.
//!
//! The view pipeline itself never fails: unparseable timestamps degrade to
//! dropped records or raw labels, and out-of-range window requests are
//! clamped. The errors here surface only from explicit, caller-facing
//! operations such as parsing a single timestamp or validating a
//! [`WindowPolicy`](crate::WindowPolicy).
//!
//! | Error | Where it comes from | Pipeline behavior |
//! |-------|---------------------|-------------------|
//! | [`Error::Parse`] | [`TimestampParser::parse`](crate::TimestampParser::parse) | Record dropped from filtered views, raw label otherwise |
//! | [`RangeError`](battview_types::RangeError) | Window controller | Clamped, logged, counted; never returned |
//! | [`Error::InvalidConfig`] | [`WindowPolicy::new`](crate::WindowPolicy::new) | Not reachable from the pipeline |

use thiserror::Error;

/// Errors that can occur in battview-core.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A timestamp or bound could not be parsed.
    #[error(transparent)]
    Parse(#[from] battview_types::ParseError),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Result type alias using battview-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
