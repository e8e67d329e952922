//! Cycle detection over the parent chain and the prerequisite graph.
//!
//! Both walks start from a single mutated node and only touch what is
//! reachable from it. They terminate on any input, including a stored graph
//! that is already cyclic: the parent walk stops at the first revisit and the
//! prerequisite walk never re-enters a node on the current path or one it has
//! already cleared.

use super::CycleError;
use crate::task::domain::{Task, TaskId};
use crate::task::ports::TaskGraph;
use std::collections::HashSet;

/// Walks task relations looking for cycles.
///
/// # Examples
///
/// ```
/// use taskweave::task::integrity::CycleDetector;
///
/// let unbounded = CycleDetector::new();
/// let bounded = CycleDetector::with_limit(10_000);
/// assert_ne!(unbounded, bounded);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleDetector {
    limit: Option<usize>,
}

/// Pending prerequisites of a node on the current path.
struct Frame {
    task: TaskId,
    pending: Vec<TaskId>,
}

impl CycleDetector {
    /// Creates a detector bounded only by the size of the graph.
    #[must_use]
    pub const fn new() -> Self {
        Self { limit: None }
    }

    /// Creates a detector that gives up after visiting `limit` nodes.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    /// Creates a detector from an optional node limit.
    #[must_use]
    pub const fn bounded_by(limit: Option<usize>) -> Self {
        Self { limit }
    }

    /// Returns the configured node limit.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Follows parent links upward from `task`.
    ///
    /// The first step uses `task.parent()` as held in memory, so an
    /// uncommitted reparent is checked against the stored ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::Parent`] naming the task whose parent is already
    /// on the path (a self-parent names the task itself), or
    /// [`CycleError::TraversalLimitExceeded`].
    pub fn parent_cycle<G>(&self, graph: &G, task: &Task) -> Result<(), CycleError>
    where
        G: TaskGraph + ?Sized,
    {
        let origin = task.id();
        let mut path = HashSet::from([origin]);
        let mut current = origin;
        let mut next = task.parent();

        while let Some(parent) = next {
            if path.contains(&parent) {
                return Err(CycleError::Parent { task_id: current });
            }
            self.ensure_within_limit(origin, path.len())?;
            path.insert(parent);
            current = parent;
            next = graph.parent_of(parent);
        }
        Ok(())
    }

    /// Depth-first walk over prerequisite edges starting at `origin`.
    ///
    /// Every branch is explored. A task that is not stored yet has no edges
    /// and passes.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::Prerequisite`] naming the task whose
    /// prerequisite is already on the path, or
    /// [`CycleError::TraversalLimitExceeded`].
    pub fn prerequisite_cycle<G>(&self, graph: &G, origin: TaskId) -> Result<(), CycleError>
    where
        G: TaskGraph + ?Sized,
    {
        if !graph.contains_task(origin) {
            return Ok(());
        }

        let mut on_path = HashSet::from([origin]);
        let mut cleared = HashSet::new();
        let mut stack = vec![Frame::enter(graph, origin)];

        while let Some(frame) = stack.last_mut() {
            let task = frame.task;
            let Some(prerequisite) = frame.pending.pop() else {
                on_path.remove(&task);
                cleared.insert(task);
                stack.pop();
                continue;
            };

            if on_path.contains(&prerequisite) {
                return Err(CycleError::Prerequisite { task_id: task });
            }
            if cleared.contains(&prerequisite) {
                continue;
            }
            self.ensure_within_limit(origin, on_path.len() + cleared.len())?;
            on_path.insert(prerequisite);
            stack.push(Frame::enter(graph, prerequisite));
        }
        Ok(())
    }

    const fn ensure_within_limit(&self, origin: TaskId, visited: usize) -> Result<(), CycleError> {
        match self.limit {
            Some(limit) if visited >= limit => {
                Err(CycleError::TraversalLimitExceeded { origin, limit })
            }
            _ => Ok(()),
        }
    }
}

impl Frame {
    fn enter<G>(graph: &G, task: TaskId) -> Self
    where
        G: TaskGraph + ?Sized,
    {
        let mut pending = graph.prerequisites_of(task);
        pending.reverse();
        Self { task, pending }
    }
}

/// Checks the parent chain of `task` with an unbounded detector.
///
/// # Errors
///
/// Returns [`CycleError::Parent`] when the chain revisits a task.
pub fn detect_parent_cycle<G>(graph: &G, task: &Task) -> Result<(), CycleError>
where
    G: TaskGraph + ?Sized,
{
    CycleDetector::new().parent_cycle(graph, task)
}

/// Checks the prerequisite graph reachable from `origin` with an unbounded
/// detector.
///
/// # Errors
///
/// Returns [`CycleError::Prerequisite`] when a path returns to a task already
/// on it.
pub fn detect_prerequisite_cycle<G>(graph: &G, origin: TaskId) -> Result<(), CycleError>
where
    G: TaskGraph + ?Sized,
{
    CycleDetector::new().prerequisite_cycle(graph, origin)
}
