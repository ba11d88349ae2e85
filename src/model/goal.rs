//! Goal types: the unit of work on a roadmap.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned by the goal store when a goal is created.
pub type GoalId = Uuid;

/// A user-defined objective with progress, an optional deadline, and completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,

    /// When the goal was created. `None` when the source record carried no
    /// usable creation instant.
    pub created_at: Option<Timestamp>,

    /// `None` means "no deadline", which is not the same as a deadline in the past.
    pub deadline: Option<Timestamp>,

    /// Percentage in `0..=100`. Edited directly, so not monotonic.
    pub progress: u8,

    /// Independent of `progress`: a goal can be complete at 40%.
    pub completed: bool,

    /// Explicit status set by the user. See [`Goal::effective_status`].
    pub status: Option<GoalStatus>,

    pub category: Option<String>,
    pub priority: Priority,

    /// Estimated effort in days.
    pub time_estimate: Option<u32>,

    pub sub_goals: Vec<String>,
}

impl Goal {
    /// A fresh, not-started goal created now.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: Some(Timestamp::now()),
            deadline: None,
            progress: 0,
            completed: false,
            status: None,
            category: None,
            priority: Priority::default(),
            time_estimate: None,
            sub_goals: Vec::new(),
        }
    }

    /// The explicit status, or one derived from the completion flag.
    pub fn effective_status(&self) -> GoalStatus {
        self.status.unwrap_or(if self.completed {
            GoalStatus::Completed
        } else {
            GoalStatus::NotStarted
        })
    }
}

/// Where a goal stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    NotStarted,
    InProgress,
    /// Set by the user. Dependency blocking is computed separately.
    Blocked,
    Completed,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "blocked" => Ok(Self::Blocked),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown goal status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}
