//! Layout projection: absolute instants onto a `[0, 100]` axis.
//!
//! Output is unitless. Whatever draws the bars decides what 100 means.

use jiff::Timestamp;
use serde::Serialize;

use crate::model::TimelineItem;

/// The span of a timeline, from the earliest start to the latest end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub min: Timestamp,
    pub max: Timestamp,
}

/// A bar's horizontal placement, both in percent of the full span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Span {
    pub left: f64,
    pub width: f64,
}

impl Projection {
    /// `None` when there are no items to span.
    pub fn from_items(items: &[TimelineItem]) -> Option<Self> {
        let min = items.iter().map(|i| i.start).min()?;
        let max = items.iter().map(|i| i.end).max()?;
        Some(Self { min, max })
    }

    /// Position of `at` in percent, clamped to `[0, 100]`.
    ///
    /// A zero-length span maps everything to 0.
    pub fn percent(&self, at: Timestamp) -> f64 {
        let total = self.max.as_millisecond() - self.min.as_millisecond();
        if total <= 0 {
            return 0.0;
        }
        let offset = at.as_millisecond() - self.min.as_millisecond();
        (offset as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn span(&self, item: &TimelineItem) -> Span {
        let left = self.percent(item.start);
        let right = self.percent(item.end);
        Span {
            left,
            width: (right - left).max(0.0),
        }
    }
}
