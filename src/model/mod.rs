//! Core data model for the roadmap.
//!
//! Goals and the dependency edges between them are stored; timeline items
//! are derived from them on every read.

mod edge;
mod goal;
pub mod instant;
mod snapshot;
mod timeline;

pub use edge::DependencyEdge;
pub use goal::{Goal, GoalId, GoalStatus, Priority};
pub use snapshot::{Snapshot, SnapshotRecord};
pub use timeline::TimelineItem;
