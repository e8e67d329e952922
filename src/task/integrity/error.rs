//! Error types raised by graph integrity checks.

use crate::task::domain::{TaskId, TimeEntryId};
use thiserror::Error;

/// Cycle found by the [`CycleDetector`](super::CycleDetector).
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CycleError {
    /// The parent chain returns to a task already on the path.
    #[error("parent/child cycle found at task node {task_id}")]
    Parent {
        /// Task whose parent closes the cycle.
        task_id: TaskId,
    },

    /// The prerequisite graph returns to a task already on the path.
    #[error("circular dependency found at task node {task_id}")]
    Prerequisite {
        /// Task whose prerequisite closes the cycle.
        task_id: TaskId,
    },

    /// The walk visited more nodes than the configured limit allows.
    #[error("traversal from task {origin} exceeded the limit of {limit} nodes")]
    TraversalLimitExceeded {
        /// Task the walk started from.
        origin: TaskId,
        /// Configured node limit.
        limit: usize,
    },
}

/// Invariant violation that rejects a graph write.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum IntegrityError {
    /// The write would make a task its own ancestor.
    #[error("parent/child cycle found at task node {task_id}")]
    ParentCycle {
        /// Task whose parent closes the cycle.
        task_id: TaskId,
    },

    /// The write would make a task depend on itself.
    #[error("circular dependency found at task node {task_id}")]
    PrerequisiteCycle {
        /// Task whose prerequisite closes the cycle.
        task_id: TaskId,
    },

    /// A task with children carries an hours estimate.
    #[error("task {task_id} has child tasks and cannot carry an hours estimate; estimate leaf tasks only")]
    LeafOnlyEstimate {
        /// Offending parent task.
        task_id: TaskId,
    },

    /// A time entry references a task with children.
    #[error("time entry {entry_id} must be logged against a leaf task, but task {task_id} has children")]
    LeafOnlyTimeEntry {
        /// Offending entry.
        entry_id: TimeEntryId,
        /// Referenced parent task.
        task_id: TaskId,
    },

    /// A traversal gave up before reaching a verdict.
    #[error("traversal from task {origin} exceeded the limit of {limit} nodes")]
    TraversalLimitExceeded {
        /// Task the walk started from.
        origin: TaskId,
        /// Configured node limit.
        limit: usize,
    },
}

impl From<CycleError> for IntegrityError {
    fn from(err: CycleError) -> Self {
        match err {
            CycleError::Parent { task_id } => Self::ParentCycle { task_id },
            CycleError::Prerequisite { task_id } => Self::PrerequisiteCycle { task_id },
            CycleError::TraversalLimitExceeded { origin, limit } => {
                Self::TraversalLimitExceeded { origin, limit }
            }
        }
    }
}
