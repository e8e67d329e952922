//! Node-level structural rules.
//!
//! Estimates and logged time belong on leaf tasks only. Parent tasks derive
//! their effort from their children.

use super::IntegrityError;
use crate::task::domain::{Task, TimeEntry};
use crate::task::ports::TaskGraph;

/// Rejects a positive hours estimate on a task that has children.
///
/// A zero estimate always passes, whatever the child count.
///
/// # Errors
///
/// Returns [`IntegrityError::LeafOnlyEstimate`].
pub fn validate_leaf_only_estimate<G>(graph: &G, task: &Task) -> Result<(), IntegrityError>
where
    G: TaskGraph + ?Sized,
{
    if task.hours_estimate() > 0.0 && graph.has_children(task.id()) {
        return Err(IntegrityError::LeafOnlyEstimate { task_id: task.id() });
    }
    Ok(())
}

/// Rejects a time entry whose task currently has children.
///
/// # Errors
///
/// Returns [`IntegrityError::LeafOnlyTimeEntry`].
pub fn validate_time_entry_on_leaf<G>(graph: &G, entry: &TimeEntry) -> Result<(), IntegrityError>
where
    G: TaskGraph + ?Sized,
{
    if graph.has_children(entry.task()) {
        return Err(IntegrityError::LeafOnlyTimeEntry {
            entry_id: entry.id(),
            task_id: entry.task(),
        });
    }
    Ok(())
}
