//! Timeline construction: goals in, renderable intervals out.

use std::collections::HashMap;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::model::{Goal, GoalId, TimelineItem};

use super::graph::DependencyGraph;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Where a goal without a deadline ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultHorizon {
    /// `start + time_estimate` days, or now when there is no estimate.
    #[default]
    Estimate,
    /// Always now.
    Now,
}

/// How callers want items ordered for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelineOrder {
    /// The order goals came out of the store.
    #[default]
    Insertion,
    /// Earliest start first.
    Start,
}

#[derive(Debug, Clone, Copy)]
pub struct TimelineOptions {
    pub horizon: DefaultHorizon,

    /// The instant treated as "now". Injected so builds are reproducible.
    pub now: Timestamp,
}

impl TimelineOptions {
    pub fn new(horizon: DefaultHorizon) -> Self {
        Self {
            horizon,
            now: Timestamp::now(),
        }
    }
}

/// A goal left off the timeline, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityWarning {
    pub goal_id: GoalId,
    pub title: String,
    pub reason: String,
}

/// The items that could be placed, plus warnings for the ones that could not.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    pub items: Vec<TimelineItem>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Builds one timeline item per goal with a resolvable interval.
///
/// Pure: the same goals, graph, and options always give the same timeline.
/// Items keep the order of `goals`.
pub fn build_timeline(goals: &[Goal], graph: &DependencyGraph, options: &TimelineOptions) -> Timeline {
    let completion: HashMap<GoalId, bool> = goals.iter().map(|g| (g.id, g.completed)).collect();
    let mut timeline = Timeline::default();

    for goal in goals {
        let Some((start, end)) = resolve_interval(goal, options) else {
            tracing::warn!(goal = %goal.id, title = %goal.title, "goal has no usable dates; left off the timeline");
            timeline.warnings.push(DataQualityWarning {
                goal_id: goal.id,
                title: goal.title.clone(),
                reason: "no creation date or deadline".to_string(),
            });
            continue;
        };

        timeline.items.push(TimelineItem {
            id: goal.id,
            title: goal.title.clone(),
            start,
            end,
            duration_days: duration_days(start, end),
            status: goal.effective_status(),
            blocked: graph.is_blocked(goal.id, |id| completion.get(&id).copied()),
            progress: goal.progress.min(100),
        });
    }

    timeline
}

/// Sorts items in place. Start-order ties fall back to the goal id.
pub fn sort_items(items: &mut [TimelineItem], order: TimelineOrder) {
    match order {
        TimelineOrder::Insertion => {}
        TimelineOrder::Start => items.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id))),
    }
}

/// Resolves `(start, end)` for a goal, clamped so `end >= start`.
fn resolve_interval(goal: &Goal, options: &TimelineOptions) -> Option<(Timestamp, Timestamp)> {
    let start = goal.created_at.or(goal.deadline)?;
    let end = match goal.deadline {
        Some(deadline) => deadline,
        None => default_end(start, goal.time_estimate, options),
    };

    if end < start {
        tracing::debug!(goal = %goal.id, %start, %end, "end precedes start; clamping");
        return Some((start, start));
    }
    Some((start, end))
}

fn default_end(start: Timestamp, estimate_days: Option<u32>, options: &TimelineOptions) -> Timestamp {
    match (options.horizon, estimate_days) {
        (DefaultHorizon::Estimate, Some(days)) => start
            .checked_add(SignedDuration::from_hours(i64::from(days) * 24))
            .unwrap_or(Timestamp::MAX),
        _ => options.now,
    }
}

/// Whole days covered by the interval, rounded up.
fn duration_days(start: Timestamp, end: Timestamp) -> i64 {
    let ms = end.as_millisecond() - start.as_millisecond();
    (ms + MS_PER_DAY - 1).div_euclid(MS_PER_DAY)
}
