//! Trusted batches of graph records.

use crate::task::domain::{PrerequisiteEdge, Task, TaskId, TimeEntry};
use serde::{Deserialize, Serialize};

/// Tasks, prerequisite edges and time entries loaded in one go.
///
/// Batches come from trusted sources such as fixtures or migrations and are
/// written without invariant checks. Records may appear in any order.
///
/// # Examples
///
/// ```
/// use taskweave::task::services::GraphBatch;
///
/// let batch = GraphBatch::from_json(r#"{ "tasks": [] }"#).expect("valid document");
/// assert!(batch.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphBatch {
    /// Task records.
    pub tasks: Vec<Task>,
    /// Prerequisite edges between tasks in the batch or already stored.
    pub prerequisites: Vec<PrerequisiteEdge>,
    /// Time entries against tasks in the batch or already stored.
    pub time_entries: Vec<TimeEntry>,
}

impl GraphBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a batch from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the document is malformed or a
    /// record is missing a required field.
    pub fn from_json(document: &str) -> serde_json::Result<Self> {
        serde_json::from_str(document)
    }

    /// Adds a task.
    #[must_use]
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Adds a prerequisite edge.
    #[must_use]
    pub fn with_prerequisite(mut self, task: TaskId, prerequisite: TaskId) -> Self {
        self.prerequisites
            .push(PrerequisiteEdge::new(task, prerequisite));
        self
    }

    /// Adds a time entry.
    #[must_use]
    pub fn with_time_entry(mut self, entry: TimeEntry) -> Self {
        self.time_entries.push(entry);
        self
    }

    /// Returns `true` when the batch holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.prerequisites.is_empty() && self.time_entries.is_empty()
    }
}

/// Record counts written by a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkLoadSummary {
    /// Tasks inserted.
    pub tasks: usize,
    /// Prerequisite edges that were not already stored.
    pub prerequisites: usize,
    /// Time entries inserted.
    pub time_entries: usize,
}
