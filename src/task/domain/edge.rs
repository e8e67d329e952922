//! Prerequisite edge between two tasks.

use super::TaskId;
use serde::{Deserialize, Serialize};

/// States that `task` cannot start before `prerequisite` is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
    /// Dependent task.
    pub task: TaskId,
    /// Task that must come first.
    pub prerequisite: TaskId,
}

impl PrerequisiteEdge {
    /// Creates an edge from `task` to the task it depends on.
    #[must_use]
    pub const fn new(task: TaskId, prerequisite: TaskId) -> Self {
        Self { task, prerequisite }
    }
}
