//! Derived timeline items. Never persisted.

use jiff::Timestamp;
use serde::Serialize;

use super::{GoalId, GoalStatus};

/// A renderable interval for one goal.
///
/// Always satisfies `end >= start`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    pub id: GoalId,
    pub title: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub duration_days: i64,
    pub status: GoalStatus,

    /// At least one dependency is incomplete.
    pub blocked: bool,

    pub progress: u8,
}

impl TimelineItem {
    /// Blocked either by the user's explicit status or by an incomplete dependency.
    pub fn effectively_blocked(&self) -> bool {
        self.status == GoalStatus::Blocked || self.blocked
    }
}
