//! Goal storage: create, load, update, delete, and list goals.

use jiff::Timestamp;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::model::{Goal, GoalId, GoalStatus, Priority};

use super::{Result, Storage, StorageError, parse_id};

const GOAL_COLUMNS: &str = "id, title, created_at, deadline, progress, completed, status, \
                            category, priority, time_estimate, sub_goals";

impl Storage {
    /// Inserts a new goal.
    pub fn create_goal(&self, goal: &Goal) -> Result<()> {
        let conn = self.open_db()?;
        if goal_exists(&conn, goal.id)? {
            return Err(StorageError::GoalAlreadyExists(goal.id));
        }
        insert_goal(&conn, goal)
    }

    /// Overwrites an existing goal's fields.
    pub fn update_goal(&self, goal: &Goal) -> Result<()> {
        let conn = self.open_db()?;
        if update_goal_row(&conn, goal)? == 0 {
            return Err(StorageError::GoalNotFound(goal.id));
        }
        tracing::debug!(goal = %goal.id, "updated goal");
        Ok(())
    }

    pub fn load_goal(&self, id: GoalId) -> Result<Goal> {
        let conn = self.open_db()?;
        let sql = format!("SELECT {GOAL_COLUMNS} FROM goal WHERE id = ?1");
        let raw = conn
            .query_row(&sql, [id.to_string()], RawGoal::from_row)
            .optional()?
            .ok_or(StorageError::GoalNotFound(id))?;
        raw.into_goal()
    }

    /// Lists all goals in the order they were created.
    pub fn list_goals(&self) -> Result<Vec<Goal>> {
        let conn = self.open_db()?;
        let sql = format!("SELECT {GOAL_COLUMNS} FROM goal ORDER BY seq");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], RawGoal::from_row)?;

        let mut goals = Vec::new();
        for row in rows {
            goals.push(row?.into_goal()?);
        }
        Ok(goals)
    }

    /// Deletes a goal and every edge that references it.
    ///
    /// Returns how many edges went with it.
    pub fn delete_goal(&self, id: GoalId) -> Result<usize> {
        let mut conn = self.open_db()?;
        let tx = conn.transaction()?;
        let key = id.to_string();

        let edges = tx.execute(
            "DELETE FROM edge WHERE from_id = ?1 OR to_id = ?1",
            [&key],
        )?;
        if tx.execute("DELETE FROM goal WHERE id = ?1", [&key])? == 0 {
            return Err(StorageError::GoalNotFound(id));
        }
        tx.commit()?;

        tracing::debug!(goal = %id, edges, "deleted goal");
        Ok(edges)
    }
}

pub(super) fn goal_exists(conn: &Connection, id: GoalId) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM goal WHERE id = ?1",
            [id.to_string()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub(super) fn insert_goal(conn: &Connection, goal: &Goal) -> Result<()> {
    conn.execute(
        "INSERT INTO goal (id, title, created_at, deadline, progress, completed, status,
                           category, priority, time_estimate, sub_goals)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
            goal.id.to_string(),
            &goal.title,
            goal.created_at.map(|t| t.to_string()),
            goal.deadline.map(|t| t.to_string()),
            goal.progress,
            goal.completed,
            goal.status.map(GoalStatus::as_str),
            &goal.category,
            goal.priority.as_str(),
            goal.time_estimate,
            serde_json::to_string(&goal.sub_goals)?,
        ],
    )?;
    Ok(())
}

/// Returns the number of rows touched: 0 when the goal doesn't exist.
pub(super) fn update_goal_row(conn: &Connection, goal: &Goal) -> Result<usize> {
    let rows = conn.execute(
        "UPDATE goal
         SET title = ?1, created_at = ?2, deadline = ?3, progress = ?4, completed = ?5,
             status = ?6, category = ?7, priority = ?8, time_estimate = ?9, sub_goals = ?10
         WHERE id = ?11",
        rusqlite::params![
            &goal.title,
            goal.created_at.map(|t| t.to_string()),
            goal.deadline.map(|t| t.to_string()),
            goal.progress,
            goal.completed,
            goal.status.map(GoalStatus::as_str),
            &goal.category,
            goal.priority.as_str(),
            goal.time_estimate,
            serde_json::to_string(&goal.sub_goals)?,
            goal.id.to_string(),
        ],
    )?;
    Ok(rows)
}

/// Column values as stored, before validation.
struct RawGoal {
    id: String,
    title: String,
    created_at: Option<String>,
    deadline: Option<String>,
    progress: u8,
    completed: bool,
    status: Option<String>,
    category: Option<String>,
    priority: String,
    time_estimate: Option<u32>,
    sub_goals: String,
}

impl RawGoal {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            created_at: row.get(2)?,
            deadline: row.get(3)?,
            progress: row.get(4)?,
            completed: row.get(5)?,
            status: row.get(6)?,
            category: row.get(7)?,
            priority: row.get(8)?,
            time_estimate: row.get(9)?,
            sub_goals: row.get(10)?,
        })
    }

    fn into_goal(self) -> Result<Goal> {
        let id = parse_id(&self.id)?;
        let status = self
            .status
            .map(|s| s.parse::<GoalStatus>())
            .transpose()
            .map_err(StorageError::Corrupt)?;
        let priority = self
            .priority
            .parse::<Priority>()
            .map_err(StorageError::Corrupt)?;
        let sub_goals = serde_json::from_str(&self.sub_goals)?;

        Ok(Goal {
            id,
            created_at: parse_instant(id, "created_at", self.created_at.as_deref()),
            deadline: parse_instant(id, "deadline", self.deadline.as_deref()),
            title: self.title,
            progress: self.progress.min(100),
            completed: self.completed,
            status,
            category: self.category,
            priority,
            time_estimate: self.time_estimate,
            sub_goals,
        })
    }
}

/// An unreadable date degrades to "missing" so the goal still loads.
fn parse_instant(id: GoalId, column: &str, value: Option<&str>) -> Option<Timestamp> {
    let value = value?;
    match value.parse::<Timestamp>() {
        Ok(ts) => Some(ts),
        Err(e) => {
            tracing::warn!(goal = %id, column, value, error = %e, "ignoring unreadable date");
            None
        }
    }
}
