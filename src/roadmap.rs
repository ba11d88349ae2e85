//! The roadmap engine: timeline, dependency graph, and layout.
//!
//! Everything here is pure computation over a snapshot read from a
//! [`GoalStore`]. The store owns goals and edges; this module never holds
//! state between calls.

mod graph;
mod layout;
mod timeline;

use std::collections::HashSet;

use crate::model::{DependencyEdge, Goal, GoalId};

pub use graph::{DependencyGraph, GraphError, LinkOutcome};
pub use layout::{Projection, Span};
pub use timeline::{
    DataQualityWarning, DefaultHorizon, Timeline, TimelineOptions, TimelineOrder, build_timeline,
    sort_items,
};

/// Where goals and their dependency edges live.
///
/// Mutations complete before returning, so the next `list_*` call sees them.
pub trait GoalStore {
    type Error;

    fn list_goals(&self) -> Result<Vec<Goal>, Self::Error>;

    fn list_edges(&self) -> Result<Vec<DependencyEdge>, Self::Error>;

    /// Makes `dependent` depend on `depends_on`. Idempotent.
    fn link_goals(&self, depends_on: GoalId, dependent: GoalId) -> Result<LinkOutcome, Self::Error>;

    /// Removes the dependency if present. Returns whether an edge was removed.
    fn unlink_goals(&self, depends_on: GoalId, dependent: GoalId) -> Result<bool, Self::Error>;
}

/// A computed roadmap for one snapshot.
#[derive(Debug, Clone)]
pub struct Roadmap {
    pub graph: DependencyGraph,
    pub timeline: Timeline,

    /// `None` when nothing could be placed on the timeline.
    pub projection: Option<Projection>,
}

/// Reads a snapshot from the store and computes its roadmap.
pub fn load_roadmap<S: GoalStore>(store: &S, options: &TimelineOptions) -> Result<Roadmap, S::Error> {
    let goals = store.list_goals()?;
    let mut graph = DependencyGraph::from_edges(store.list_edges()?);

    let known: HashSet<GoalId> = goals.iter().map(|g| g.id).collect();
    let dangling = graph.retain_goals(&known);
    if dangling > 0 {
        tracing::warn!(count = dangling, "ignoring edges that reference missing goals");
    }

    let timeline = build_timeline(&goals, &graph, options);
    let projection = Projection::from_items(&timeline.items);

    Ok(Roadmap {
        graph,
        timeline,
        projection,
    })
}
