//! Dependency edges between goals.

use serde::{Deserialize, Serialize};

use super::GoalId;

/// `to` depends on `from`: `from` must complete before `to` is unblocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: GoalId,
    pub to: GoalId,
}

impl DependencyEdge {
    pub fn new(from: GoalId, to: GoalId) -> Self {
        Self { from, to }
    }
}
