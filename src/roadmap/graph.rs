//! Dependency graph: which goals wait on which.
//!
//! Edges point from the dependency to the dependent. A goal is blocked when
//! any goal it depends on is incomplete. Only direct dependencies count;
//! blocking does not propagate through chains.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::model::{DependencyEdge, GoalId};

/// Reasons a link is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("a goal cannot depend on itself: {0}")]
    SelfDependency(GoalId),

    #[error("linking {from} -> {to} would create a dependency cycle")]
    Cycle { from: GoalId, to: GoalId },
}

/// What a successful link did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Added,
    AlreadyLinked,
}

/// A set of dependency edges. Iteration order is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeSet<DependencyEdge>,
}

impl DependencyGraph {
    /// Builds a graph from stored edges as-is.
    ///
    /// No validation: a snapshot may legitimately hold edges that `link`
    /// would refuse today.
    pub fn from_edges(edges: impl IntoIterator<Item = DependencyEdge>) -> Self {
        Self {
            edges: edges.into_iter().collect(),
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter()
    }

    pub fn contains(&self, from: GoalId, to: GoalId) -> bool {
        self.edges.contains(&DependencyEdge::new(from, to))
    }

    /// Checks whether `to` may start depending on `from`, without mutating.
    pub fn check_link(&self, from: GoalId, to: GoalId) -> Result<LinkOutcome, GraphError> {
        if from == to {
            return Err(GraphError::SelfDependency(from));
        }
        if self.contains(from, to) {
            return Ok(LinkOutcome::AlreadyLinked);
        }
        // The new edge closes a cycle if `from` already (transitively) depends on `to`.
        if self.reaches(to, from) {
            return Err(GraphError::Cycle { from, to });
        }
        Ok(LinkOutcome::Added)
    }

    /// Makes `to` depend on `from`. Linking an existing pair is a no-op.
    pub fn link(&mut self, from: GoalId, to: GoalId) -> Result<LinkOutcome, GraphError> {
        let outcome = self.check_link(from, to)?;
        if outcome == LinkOutcome::Added {
            self.edges.insert(DependencyEdge::new(from, to));
        }
        Ok(outcome)
    }

    /// Removes the edge if present. Returns whether anything was removed.
    pub fn unlink(&mut self, from: GoalId, to: GoalId) -> bool {
        self.edges.remove(&DependencyEdge::new(from, to))
    }

    /// Goals that `id` depends on.
    pub fn dependencies_of(&self, id: GoalId) -> impl Iterator<Item = GoalId> + '_ {
        self.edges.iter().filter(move |e| e.to == id).map(|e| e.from)
    }

    /// Goals that depend on `id`.
    pub fn dependents_of(&self, id: GoalId) -> impl Iterator<Item = GoalId> + '_ {
        self.edges.iter().filter(move |e| e.from == id).map(|e| e.to)
    }

    /// Dependencies of `id` known to be incomplete.
    ///
    /// `completed` returns `None` for goals outside the current snapshot.
    /// Those are treated as unknown and never block.
    pub fn blockers_of<F>(&self, id: GoalId, completed: F) -> Vec<GoalId>
    where
        F: Fn(GoalId) -> Option<bool>,
    {
        self.dependencies_of(id)
            .filter(|&dep| completed(dep) == Some(false))
            .collect()
    }

    /// Whether any dependency of `id` is incomplete.
    pub fn is_blocked<F>(&self, id: GoalId, completed: F) -> bool
    where
        F: Fn(GoalId) -> Option<bool>,
    {
        self.dependencies_of(id)
            .any(|dep| completed(dep) == Some(false))
    }

    /// Drops every edge with an endpoint outside `known`. Returns how many were dropped.
    pub fn retain_goals(&mut self, known: &HashSet<GoalId>) -> usize {
        let before = self.edges.len();
        self.edges
            .retain(|e| known.contains(&e.from) && known.contains(&e.to));
        before - self.edges.len()
    }

    /// Whether `target` can be reached from `start` by following edges forward.
    fn reaches(&self, start: GoalId, target: GoalId) -> bool {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }
            for next in self.dependents_of(current) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use uuid::Uuid;

    use super::*;

    fn ids<const N: usize>() -> [GoalId; N] {
        std::array::from_fn(|_| Uuid::new_v4())
    }

    #[test]
    fn link_twice_keeps_one_edge() {
        let [a, b] = ids::<2>();
        let mut graph = DependencyGraph::default();

        assert_eq!(graph.link(a, b).unwrap(), LinkOutcome::Added);
        assert_eq!(graph.link(a, b).unwrap(), LinkOutcome::AlreadyLinked);
        assert_eq!(graph.edges().count(), 1);
        assert!(graph.contains(a, b));
    }

    #[test]
    fn unlink_without_link_changes_nothing() {
        let [a, b, c] = ids::<3>();
        let mut graph = DependencyGraph::from_edges([DependencyEdge::new(a, c)]);
        let before = graph.clone();

        assert!(!graph.unlink(a, b));
        assert_eq!(graph, before);
    }

    #[test]
    fn unlink_removes_existing_edge() {
        let [a, b] = ids::<2>();
        let mut graph = DependencyGraph::default();
        graph.link(a, b).unwrap();

        assert!(graph.unlink(a, b));
        assert_eq!(graph.edges().count(), 0);
    }

    #[test]
    fn self_edge_is_refused() {
        let [a] = ids::<1>();
        let mut graph = DependencyGraph::default();

        assert_eq!(graph.link(a, a), Err(GraphError::SelfDependency(a)));
        assert_eq!(graph.edges().count(), 0);
    }

    #[test]
    fn cycle_forming_link_is_refused() {
        let [a, b, c] = ids::<3>();
        let mut graph = DependencyGraph::default();
        graph.link(a, b).unwrap();
        graph.link(b, c).unwrap();

        assert_eq!(graph.link(c, a), Err(GraphError::Cycle { from: c, to: a }));
        assert_eq!(graph.link(b, a), Err(GraphError::Cycle { from: b, to: a }));
        // A parallel path is not a cycle.
        assert_eq!(graph.link(a, c).unwrap(), LinkOutcome::Added);
    }

    #[test]
    fn blocked_iff_some_dependency_incomplete() {
        let [a, b, g] = ids::<3>();
        let graph = DependencyGraph::from_edges([DependencyEdge::new(a, g), DependencyEdge::new(b, g)]);
        let mut completed = HashMap::from([(a, false), (b, true), (g, false)]);

        assert!(graph.is_blocked(g, |id| completed.get(&id).copied()));
        assert_eq!(graph.blockers_of(g, |id| completed.get(&id).copied()), vec![a]);

        completed.insert(a, true);
        assert!(!graph.is_blocked(g, |id| completed.get(&id).copied()));
    }

    #[test]
    fn goal_without_dependencies_is_never_blocked() {
        let [a, b] = ids::<2>();
        let graph = DependencyGraph::from_edges([DependencyEdge::new(a, b)]);
        assert!(!graph.is_blocked(a, |_| Some(false)));
    }

    #[test]
    fn unknown_dependency_does_not_block() {
        let [ghost, g] = ids::<2>();
        let graph = DependencyGraph::from_edges([DependencyEdge::new(ghost, g)]);
        assert!(!graph.is_blocked(g, |id| (id == g).then_some(false)));
    }

    #[test]
    fn retain_goals_drops_dangling_edges() {
        let [a, b, ghost] = ids::<3>();
        let mut graph = DependencyGraph::from_edges([
            DependencyEdge::new(a, b),
            DependencyEdge::new(ghost, b),
            DependencyEdge::new(a, ghost),
        ]);

        let dropped = graph.retain_goals(&HashSet::from([a, b]));
        assert_eq!(dropped, 2);
        assert_eq!(graph.edges().copied().collect::<Vec<_>>(), vec![DependencyEdge::new(a, b)]);
    }

    #[test]
    fn dependents_and_dependencies() {
        let [a, b, c] = ids::<3>();
        let graph = DependencyGraph::from_edges([DependencyEdge::new(a, b), DependencyEdge::new(a, c)]);

        let mut dependents: Vec<_> = graph.dependents_of(a).collect();
        dependents.sort();
        let mut expected = vec![b, c];
        expected.sort();
        assert_eq!(dependents, expected);
        assert_eq!(graph.dependencies_of(b).collect::<Vec<_>>(), vec![a]);
    }
}
