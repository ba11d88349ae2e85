//! Edge storage: link and unlink dependencies between goals.

use rusqlite::Connection;

use crate::model::{DependencyEdge, GoalId};
use crate::roadmap::{DependencyGraph, LinkOutcome};

use super::goal::goal_exists;
use super::{Result, Storage, StorageError, parse_id};

impl Storage {
    /// Lists all edges, ordered by endpoint ids.
    pub fn list_edges(&self) -> Result<Vec<DependencyEdge>> {
        let conn = self.open_db()?;
        load_edges(&conn)
    }

    /// Makes `dependent` depend on `depends_on`.
    ///
    /// Linking an existing pair is a no-op. Self-dependencies and links that
    /// would close a cycle are refused. Both goals must exist.
    pub fn link_goals(&self, depends_on: GoalId, dependent: GoalId) -> Result<LinkOutcome> {
        let mut conn = self.open_db()?;
        let tx = conn.transaction()?;

        for id in [depends_on, dependent] {
            if !goal_exists(&tx, id)? {
                return Err(StorageError::GoalNotFound(id));
            }
        }

        let graph = DependencyGraph::from_edges(load_edges(&tx)?);
        let outcome = graph.check_link(depends_on, dependent)?;
        if outcome == LinkOutcome::Added {
            insert_edge(&tx, DependencyEdge::new(depends_on, dependent))?;
        }
        tx.commit()?;

        tracing::debug!(from = %depends_on, to = %dependent, ?outcome, "linked goals");
        Ok(outcome)
    }

    /// Removes the dependency if present. Returns whether an edge was removed.
    ///
    /// Unlinking a pair that was never linked, or goals that don't exist, is a no-op.
    pub fn unlink_goals(&self, depends_on: GoalId, dependent: GoalId) -> Result<bool> {
        let conn = self.open_db()?;
        let rows = conn.execute(
            "DELETE FROM edge WHERE from_id = ?1 AND to_id = ?2",
            [depends_on.to_string(), dependent.to_string()],
        )?;
        tracing::debug!(from = %depends_on, to = %dependent, removed = rows > 0, "unlinked goals");
        Ok(rows > 0)
    }
}

pub(super) fn load_edges(conn: &Connection) -> Result<Vec<DependencyEdge>> {
    let mut stmt = conn.prepare("SELECT from_id, to_id FROM edge ORDER BY from_id, to_id")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut edges = Vec::new();
    for row in rows {
        let (from, to) = row?;
        edges.push(DependencyEdge::new(parse_id(&from)?, parse_id(&to)?));
    }
    Ok(edges)
}

pub(super) fn insert_edge(conn: &Connection, edge: DependencyEdge) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO edge (from_id, to_id) VALUES (?1, ?2)",
        [edge.from.to_string(), edge.to.to_string()],
    )?;
    Ok(())
}
