//! Local persistence for goals and their dependency edges.
//!
//! Everything lives in one `SQLite` database under the storage root:
//!
//! ```text
//! <root>/
//!   roadmap.sqlite   # goal + edge tables
//! ```
//!
//! Each call opens its own connection and commits before returning, so a
//! read that follows a mutation always sees it.

mod edge;
mod goal;
mod snapshot;

use std::{fs, io, path::PathBuf};

use rusqlite::Connection;
use uuid::Uuid;

use crate::model::{DependencyEdge, Goal, GoalId};
use crate::roadmap::{GoalStore, GraphError, LinkOutcome};

pub use snapshot::ImportReport;

const DB_FILE: &str = "roadmap.sqlite";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS goal (
    seq           INTEGER PRIMARY KEY AUTOINCREMENT,
    id            TEXT NOT NULL UNIQUE,
    title         TEXT NOT NULL,
    created_at    TEXT,
    deadline      TEXT,
    progress      INTEGER NOT NULL,
    completed     INTEGER NOT NULL,
    status        TEXT,
    category      TEXT,
    priority      TEXT NOT NULL,
    time_estimate INTEGER,
    sub_goals     TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS edge (
    from_id TEXT NOT NULL,
    to_id   TEXT NOT NULL,
    PRIMARY KEY (from_id, to_id)
);
";

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("goal not found: {0}")]
    GoalNotFound(Uuid),

    #[error("goal already exists: {0}")]
    GoalAlreadyExists(Uuid),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Local `SQLite` storage for goals and edges.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory and database are created if they don't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let storage = Self { root };
        storage.open_db()?;
        Ok(storage)
    }

    /// Returns the default storage root: `~/.roadmap/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".roadmap"))
    }

    /// Opens a connection, creating the schema on first use.
    fn open_db(&self) -> Result<Connection> {
        let conn = Connection::open(self.root.join(DB_FILE))?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }
}

impl GoalStore for Storage {
    type Error = StorageError;

    fn list_goals(&self) -> Result<Vec<Goal>> {
        Storage::list_goals(self)
    }

    fn list_edges(&self) -> Result<Vec<DependencyEdge>> {
        Storage::list_edges(self)
    }

    fn link_goals(&self, depends_on: GoalId, dependent: GoalId) -> Result<LinkOutcome> {
        Storage::link_goals(self, depends_on, dependent)
    }

    fn unlink_goals(&self, depends_on: GoalId, dependent: GoalId) -> Result<bool> {
        Storage::unlink_goals(self, depends_on, dependent)
    }
}

/// Parses a stored UUID column.
fn parse_id(s: &str) -> Result<Uuid> {
    s.parse::<Uuid>()
        .map_err(|e| StorageError::Corrupt(format!("invalid goal id {s:?}: {e}")))
}
