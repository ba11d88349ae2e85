//! Whole-store export and import.

use serde::Serialize;

use crate::model::{Snapshot, SnapshotRecord};
use crate::roadmap::{DependencyGraph, LinkOutcome};

use super::edge::{insert_edge, load_edges};
use super::goal::{goal_exists, insert_goal, update_goal_row};
use super::{Result, Storage};

/// What an import did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub goals_created: usize,
    pub goals_updated: usize,
    pub edges_added: usize,

    /// Self-dependencies and cycle-forming edges, skipped.
    pub edges_rejected: usize,

    /// Edges naming a goal neither the snapshot nor the store holds, skipped.
    pub edges_dangling: usize,
}

impl Storage {
    pub fn export_snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            goals: self.list_goals()?,
            edges: self.list_edges()?,
        })
    }

    /// Merges a snapshot into the store in one transaction.
    ///
    /// Goals whose id already exists are overwritten. Edges may name goals
    /// from the snapshot or goals already in the store, and go through the
    /// same checks as [`Storage::link_goals`]; refused ones are counted and skipped.
    pub fn import_snapshot(&self, record: SnapshotRecord) -> Result<ImportReport> {
        let snapshot = record.normalize();
        let mut report = ImportReport::default();

        let mut conn = self.open_db()?;
        let tx = conn.transaction()?;

        for goal in &snapshot.goals {
            if update_goal_row(&tx, goal)? == 0 {
                insert_goal(&tx, goal)?;
                report.goals_created += 1;
            } else {
                report.goals_updated += 1;
            }
        }

        let mut graph = DependencyGraph::from_edges(load_edges(&tx)?);
        for edge in snapshot.edges {
            if !goal_exists(&tx, edge.from)? || !goal_exists(&tx, edge.to)? {
                report.edges_dangling += 1;
                continue;
            }
            match graph.link(edge.from, edge.to) {
                Ok(LinkOutcome::Added) => {
                    insert_edge(&tx, edge)?;
                    report.edges_added += 1;
                }
                Ok(LinkOutcome::AlreadyLinked) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "skipping imported edge");
                    report.edges_rejected += 1;
                }
            }
        }
        tx.commit()?;

        if report.edges_dangling > 0 {
            tracing::warn!(count = report.edges_dangling, "skipped edges naming unknown goals");
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::model::{DependencyEdge, Goal};

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("roadmap")).unwrap();
        (dir, storage)
    }

    fn record(json: &str) -> SnapshotRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn import_remaps_ids_and_rejects_cycles() {
        let (_dir, storage) = test_storage();
        let report = storage
            .import_snapshot(record(
                r#"{
                    "goals": [
                        {"id": "a", "title": "A", "createdAt": {"seconds": 1704067200, "nanoseconds": 0}},
                        {"id": "b", "title": "B", "timestamp": "2024-01-05"},
                        {"id": "c", "title": "C"}
                    ],
                    "edges": [
                        {"from": "a", "to": "b"},
                        {"from": "b", "to": "a"},
                        {"from": "c", "to": "c"},
                        {"from": "a", "to": "missing"}
                    ]
                }"#,
            ))
            .unwrap();

        assert_eq!(
            report,
            ImportReport {
                goals_created: 3,
                goals_updated: 0,
                edges_added: 1,
                edges_rejected: 2,
                edges_dangling: 1,
            }
        );

        let goals = storage.list_goals().unwrap();
        assert_eq!(goals.len(), 3);
        assert!(goals[0].created_at.is_some());
        assert!(goals[1].created_at.is_some());
        assert_eq!(goals[2].created_at, None);
        assert_eq!(
            storage.list_edges().unwrap(),
            vec![DependencyEdge::new(goals[0].id, goals[1].id)]
        );
    }

    #[test]
    fn reimporting_foreign_ids_updates_instead_of_duplicating() {
        let (_dir, storage) = test_storage();
        let json = r#"{
            "goals": [{"id": "doc1", "title": "A"}, {"id": "doc2", "title": "B"}],
            "edges": [{"from": "doc1", "to": "doc2"}]
        }"#;

        let first = storage.import_snapshot(record(json)).unwrap();
        assert_eq!((first.goals_created, first.edges_added), (2, 1));

        let second = storage.import_snapshot(record(json)).unwrap();
        assert_eq!(second.goals_created, 0);
        assert_eq!(second.goals_updated, 2);
        assert_eq!(second.edges_added, 0);

        assert_eq!(storage.list_goals().unwrap().len(), 2);
        assert_eq!(storage.list_edges().unwrap().len(), 1);
    }

    #[test]
    fn imported_edges_may_name_goals_already_stored() {
        let (_dir, storage) = test_storage();
        let existing = Goal::new("Already here");
        storage.create_goal(&existing).unwrap();

        let report = storage
            .import_snapshot(record(&format!(
                r#"{{
                    "goals": [{{"id": "n1", "title": "New"}}],
                    "edges": [{{"from": "{}", "to": "n1"}}]
                }}"#,
                existing.id
            )))
            .unwrap();

        assert_eq!(report.edges_added, 1);
        assert_eq!(report.edges_dangling, 0);

        let goals = storage.list_goals().unwrap();
        assert_eq!(
            storage.list_edges().unwrap(),
            vec![DependencyEdge::new(existing.id, goals[1].id)]
        );
    }

    #[test]
    fn export_then_import_updates_in_place() {
        let (_dir, storage) = test_storage();
        storage
            .import_snapshot(record(r#"{"goals": [{"title": "Only"}]}"#))
            .unwrap();

        let exported = serde_json::to_string(&storage.export_snapshot().unwrap()).unwrap();
        let report = storage.import_snapshot(record(&exported)).unwrap();

        assert_eq!(report.goals_created, 0);
        assert_eq!(report.goals_updated, 1);
        assert_eq!(storage.list_goals().unwrap().len(), 1);
    }
}
