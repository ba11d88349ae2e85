//! Snapshot format: every goal and edge, as exchanged with other tools.
//!
//! Export writes canonical [`Goal`]s. Import is deliberately forgiving:
//! ids may be arbitrary strings (mapped to name-based UUIDs, so the same
//! document always lands on the same goals), dates may take any shape
//! [`instant`](super::instant) understands, and `createdAt` falls back to
//! `timestamp`.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DependencyEdge, Goal, GoalId, GoalStatus, Priority, instant};

/// A full export of the store.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub goals: Vec<Goal>,
    pub edges: Vec<DependencyEdge>,
}

/// A snapshot as read from disk, before normalization.
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotRecord {
    #[serde(default)]
    pub goals: Vec<GoalRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "instant::lenient")]
    pub created_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "instant::lenient")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, deserialize_with = "instant::lenient")]
    pub deadline: Option<Timestamp>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub status: Option<GoalStatus>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub time_estimate: Option<u32>,
    #[serde(default)]
    pub sub_goals: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
}

/// Namespace for UUIDs derived from foreign (non-UUID) goal ids.
const FOREIGN_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2b7e_93d4_4a5f_8e21_c0d7_5b3a_9e46);

/// The normalized result of reading a [`SnapshotRecord`].
///
/// Edge endpoints are resolved but not checked: an edge may name a goal that
/// only the store holds, or one that exists nowhere.
#[derive(Debug)]
pub struct NormalizedSnapshot {
    pub goals: Vec<Goal>,
    pub edges: Vec<DependencyEdge>,
}

impl SnapshotRecord {
    /// Resolve ids, dates, and defaults into canonical goals and edges.
    pub fn normalize(self) -> NormalizedSnapshot {
        let goals = self
            .goals
            .into_iter()
            .map(|record| {
                let id = record.id.as_deref().map_or_else(Uuid::new_v4, resolve_id);
                record.into_goal(id)
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .map(|edge| DependencyEdge::new(resolve_id(&edge.from), resolve_id(&edge.to)))
            .collect();

        NormalizedSnapshot { goals, edges }
    }
}

/// A UUID is taken as is; anything else maps to a stable name-based UUID.
fn resolve_id(original: &str) -> GoalId {
    original
        .parse::<Uuid>()
        .unwrap_or_else(|_| Uuid::new_v5(&FOREIGN_ID_NAMESPACE, original.as_bytes()))
}

impl GoalRecord {
    fn into_goal(self, id: GoalId) -> Goal {
        Goal {
            id,
            title: self.title,
            created_at: self.created_at.or(self.timestamp),
            deadline: self.deadline,
            progress: clamp_progress(self.progress),
            completed: self.completed,
            status: self.status,
            category: self.category.filter(|c| !c.is_empty()),
            priority: self.priority.unwrap_or_default(),
            time_estimate: self.time_estimate,
            sub_goals: self.sub_goals,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_progress(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
