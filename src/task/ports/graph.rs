//! Read-only view of the task graph used by traversals.

use crate::task::domain::{Task, TaskId, TimeEntry, TimeEntryId};

/// Query surface over a consistent view of the task graph.
///
/// Implementations answer from a single snapshot (for example a store
/// transaction), so lookups are infallible. Unknown ids yield empty results.
#[cfg_attr(test, mockall::automock)]
pub trait TaskGraph {
    /// Returns `true` when the task has been stored.
    fn contains_task(&self, id: TaskId) -> bool;

    /// Returns a copy of the stored task.
    fn find_task(&self, id: TaskId) -> Option<Task>;

    /// Returns the stored parent of a task.
    fn parent_of(&self, id: TaskId) -> Option<TaskId>;

    /// Returns the direct children of a task.
    fn children_of(&self, id: TaskId) -> Vec<TaskId>;

    /// Returns `true` when the task has at least one child.
    fn has_children(&self, id: TaskId) -> bool;

    /// Returns the tasks `id` depends on.
    fn prerequisites_of(&self, id: TaskId) -> Vec<TaskId>;

    /// Returns the tasks that depend on `id`.
    fn dependents_of(&self, id: TaskId) -> Vec<TaskId>;

    /// Returns a copy of a stored time entry.
    fn find_time_entry(&self, id: TimeEntryId) -> Option<TimeEntry>;

    /// Returns the time entries logged against a task.
    fn time_entries_for(&self, id: TaskId) -> Vec<TimeEntry>;

    /// Returns every stored task id in ascending order.
    fn task_ids(&self) -> Vec<TaskId>;

    /// Returns the number of stored tasks.
    fn task_count(&self) -> usize;
}
