//! Store port for task graph persistence.

use super::TaskGraph;
use crate::task::domain::{Task, TaskId, TimeEntry, TimeEntryId};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task graph store operations.
pub type TaskGraphStoreResult<T> = Result<T, TaskGraphStoreError>;

/// Writable view of the graph inside a store transaction.
///
/// Reads observe earlier writes made in the same transaction. Writes enforce
/// referential integrity only; graph invariants are the caller's concern.
pub trait GraphTransaction: TaskGraph {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphStoreError::DuplicateTask`] when the id exists, or
    /// [`TaskGraphStoreError::TaskNotFound`] when the parent is unknown.
    fn insert_task(&mut self, task: &Task) -> TaskGraphStoreResult<()>;

    /// Replaces an existing task record, re-indexing its parent link.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphStoreError::TaskNotFound`] when the task or its
    /// parent is unknown.
    fn update_task(&mut self, task: &Task) -> TaskGraphStoreResult<()>;

    /// Removes a task together with its subtree, the prerequisite edges
    /// touching any removed task, and their time entries.
    ///
    /// Returns the removed task ids, root first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphStoreError::TaskNotFound`] when the task is unknown.
    fn delete_task(&mut self, id: TaskId) -> TaskGraphStoreResult<Vec<TaskId>>;

    /// Records that `task` depends on `prerequisite`.
    ///
    /// Returns `false` when the edge already existed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphStoreError::TaskNotFound`] when either end is
    /// unknown.
    fn insert_prerequisite(
        &mut self,
        task: TaskId,
        prerequisite: TaskId,
    ) -> TaskGraphStoreResult<bool>;

    /// Removes a prerequisite edge.
    ///
    /// Returns `false` when the edge did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphStoreError::TaskNotFound`] when `task` is unknown.
    fn remove_prerequisite(
        &mut self,
        task: TaskId,
        prerequisite: TaskId,
    ) -> TaskGraphStoreResult<bool>;

    /// Stores a new time entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphStoreError::DuplicateTimeEntry`] when the id exists,
    /// or [`TaskGraphStoreError::TaskNotFound`] when the task is unknown.
    fn insert_time_entry(&mut self, entry: &TimeEntry) -> TaskGraphStoreResult<()>;

    /// Replaces an existing time entry, re-indexing its task link.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphStoreError::TimeEntryNotFound`] or
    /// [`TaskGraphStoreError::TaskNotFound`].
    fn update_time_entry(&mut self, entry: &TimeEntry) -> TaskGraphStoreResult<()>;
}

/// Task graph persistence contract.
///
/// Every validated write runs inside [`TaskGraphStore::transaction`], which
/// must be all-or-nothing and serialised against other writers.
pub trait TaskGraphStore: Send + Sync {
    /// Runs `work` against a writable view and commits its writes only when
    /// it returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a converted
    /// [`TaskGraphStoreError`] when the transaction cannot be opened.
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn GraphTransaction) -> Result<T, E>,
        E: From<TaskGraphStoreError>;

    /// Runs a read-only query against a consistent view.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphStoreError::Persistence`] when the view cannot be
    /// opened.
    fn read<T, F>(&self, query: F) -> TaskGraphStoreResult<T>
    where
        F: FnOnce(&dyn GraphTransaction) -> T;
}

/// Errors returned by task graph store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskGraphStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A time entry with the same identifier already exists.
    #[error("duplicate time entry identifier: {0}")]
    DuplicateTimeEntry(TimeEntryId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The time entry was not found.
    #[error("time entry not found: {0}")]
    TimeEntryNotFound(TimeEntryId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskGraphStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
