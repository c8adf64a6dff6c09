//! Scroll and zoom over a filtered sequence.
//!
//! The controller turns a requested offset and size into a valid window for
//! a sequence of a given length. Out-of-range requests are never errors:
//! each one is clamped, logged at `debug` and counted.

use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use battview_types::{RangeError, Window};

use crate::error::{Error, Result};
use crate::metrics::PipelineMetrics;

/// Default smallest window size.
pub const DEFAULT_MIN_SIZE: usize = 10;
/// Default zoom increment.
pub const DEFAULT_ZOOM_STEP: usize = 10;

/// Limits applied by a [`WindowController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPolicy {
    /// Smallest window size. Sequences shorter than this still get a window
    /// of this size; the visible range is then truncated at the end.
    pub min_size: usize,
    /// Size change applied by one zoom step.
    pub zoom_step: usize,
}

impl WindowPolicy {
    /// Create a validated policy.
    pub fn new(min_size: usize, zoom_step: usize) -> Result<Self> {
        if min_size == 0 {
            return Err(Error::invalid_config("min_size must be at least 1"));
        }
        if zoom_step == 0 {
            return Err(Error::invalid_config("zoom_step must be at least 1"));
        }
        Ok(Self {
            min_size,
            zoom_step,
        })
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            zoom_step: DEFAULT_ZOOM_STEP,
        }
    }
}

/// A window resolved against a sequence length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowView {
    /// Offset after clamping; always `<= max_offset`.
    pub clamped_offset: usize,
    /// Largest valid offset for this size and length.
    pub max_offset: usize,
    /// Window size after clamping.
    pub size: usize,
    /// First visible index.
    pub start: usize,
    /// One past the last visible index.
    pub end: usize,
}

impl WindowView {
    /// Visible index range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The normalized window to store back into the view state.
    pub fn window(&self) -> Window {
        Window::new(self.clamped_offset, self.size)
    }

    /// Number of visible records.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Clamps scroll and zoom requests.
#[derive(Debug, Clone)]
pub struct WindowController {
    policy: WindowPolicy,
    metrics: Arc<PipelineMetrics>,
}

impl Default for WindowController {
    fn default() -> Self {
        Self::new(WindowPolicy::default())
    }
}

impl WindowController {
    /// Create a controller with its own metrics.
    pub fn new(policy: WindowPolicy) -> Self {
        Self::with_metrics(policy, PipelineMetrics::shared())
    }

    /// Create a controller reporting into shared metrics.
    pub fn with_metrics(policy: WindowPolicy, metrics: Arc<PipelineMetrics>) -> Self {
        Self { policy, metrics }
    }

    /// The policy in use.
    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    fn recovered(&self, err: RangeError) {
        debug!("Clamping window request: {}", err);
        self.metrics.record_clamp();
    }

    /// Resolve a signed offset and size against `len`.
    pub fn view(&self, len: usize, offset: i64, size: i64) -> WindowView {
        let min = self.policy.min_size;
        let upper = len.max(min);

        let offset = if offset < 0 {
            self.recovered(RangeError::NegativeOffset(offset));
            0
        } else {
            usize::try_from(offset).unwrap_or(usize::MAX)
        };

        let size = if size < min as i64 {
            self.recovered(RangeError::SizeBelowMinimum {
                requested: size,
                min,
            });
            min
        } else {
            let size = usize::try_from(size).unwrap_or(usize::MAX);
            if size > upper {
                self.recovered(RangeError::SizeAboveLength {
                    requested: size,
                    len,
                });
                upper
            } else {
                size
            }
        };

        let max_offset = len.saturating_sub(size);
        let clamped_offset = if offset > max_offset {
            self.recovered(RangeError::OffsetBeyondMax {
                offset,
                max: max_offset,
            });
            max_offset
        } else {
            offset
        };

        let start = clamped_offset.min(len);
        WindowView {
            clamped_offset,
            max_offset,
            size,
            start,
            end: clamped_offset.saturating_add(size).min(len),
        }
    }

    /// Resolve an unsigned window against `len`.
    pub fn clamp(&self, len: usize, window: Window) -> WindowView {
        self.view(len, to_signed(window.offset), to_signed(window.size))
    }

    /// Change the size by `delta` (negative zooms in) and re-clamp.
    pub fn zoom(&self, window: Window, delta: i64, len: usize) -> WindowView {
        let size = to_signed(window.size).saturating_add(delta);
        self.view(len, to_signed(window.offset), size)
    }

    /// Show `zoom_step` fewer records.
    pub fn zoom_in(&self, window: Window, len: usize) -> WindowView {
        self.zoom(window, -to_signed(self.policy.zoom_step), len)
    }

    /// Show `zoom_step` more records.
    pub fn zoom_out(&self, window: Window, len: usize) -> WindowView {
        self.zoom(window, to_signed(self.policy.zoom_step), len)
    }

    /// Move the offset by `delta` records.
    pub fn scroll_by(&self, window: Window, delta: i64, len: usize) -> WindowView {
        let offset = to_signed(window.offset).saturating_add(delta);
        self.view(len, offset, to_signed(window.size))
    }

    /// Move to an absolute offset.
    pub fn scroll_to(&self, window: Window, offset: usize, len: usize) -> WindowView {
        self.clamp(len, Window { offset, ..window })
    }

    /// Jump to the first record.
    pub fn scroll_to_start(&self, window: Window, len: usize) -> WindowView {
        self.scroll_to(window, 0, len)
    }

    /// Jump so the last record is visible.
    pub fn scroll_to_end(&self, window: Window, len: usize) -> WindowView {
        let view = self.clamp(len, window);
        self.scroll_to(view.window(), view.max_offset, len)
    }
}

fn to_signed(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn view_invariants_hold(
            len in 0usize..500,
            offset in -1000i64..1000,
            size in -50i64..1000,
            min_size in 1usize..40,
        ) {
            let policy = WindowPolicy::new(min_size, 10).unwrap();
            let view = WindowController::new(policy).view(len, offset, size);

            prop_assert!(view.clamped_offset <= view.max_offset);
            prop_assert_eq!(view.max_offset, len.saturating_sub(view.size));
            prop_assert!(view.size >= min_size);
            prop_assert!(view.size <= len.max(min_size));
            prop_assert!(view.end <= len);
            prop_assert!(view.start <= view.end);
            prop_assert!(view.len() <= view.size);
        }

        #[test]
        fn view_is_stable_once_clamped(
            len in 0usize..500,
            offset in -1000i64..1000,
            size in -50i64..1000,
        ) {
            let c = WindowController::default();
            let first = c.view(len, offset, size);
            let second = c.clamp(len, first.window());
            prop_assert_eq!(first, second);
        }
    }
}
