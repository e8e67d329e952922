//! Decides which integrity checks a write needs.
//!
//! Graph walks are only worth running when the relation they protect has
//! changed. The guard compares each record with the stored copy in the same
//! transaction and skips the walk otherwise. Cheap node-level checks always
//! run.

use super::{CycleDetector, IntegrityError, structure};
use crate::config::IntegrityConfig;
use crate::task::domain::{Task, TaskId, TimeEntry};
use crate::task::ports::TaskGraph;

/// Runs the checks required by each kind of graph write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationGuard {
    detector: CycleDetector,
}

impl MutationGuard {
    /// Creates a guard around the given detector.
    #[must_use]
    pub const fn new(detector: CycleDetector) -> Self {
        Self { detector }
    }

    /// Creates a guard using the traversal limit from `config`.
    #[must_use]
    pub const fn from_config(config: &IntegrityConfig) -> Self {
        Self::new(CycleDetector::bounded_by(config.traversal_limit))
    }

    /// Returns the detector used for graph walks.
    #[must_use]
    pub const fn detector(&self) -> CycleDetector {
        self.detector
    }

    /// Checks a task before it is inserted or updated.
    ///
    /// The estimate rule always runs. The parent walk runs only when the task
    /// is not stored yet or its parent differs from the stored parent.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError::LeafOnlyEstimate`] or
    /// [`IntegrityError::ParentCycle`].
    pub fn check_task_write<G>(&self, graph: &G, task: &Task) -> Result<(), IntegrityError>
    where
        G: TaskGraph + ?Sized,
    {
        structure::validate_leaf_only_estimate(graph, task)?;
        if parent_differs_from_store(graph, task) {
            self.detector.parent_cycle(graph, task)?;
        }
        Ok(())
    }

    /// Checks the prerequisite graph after edges were staged for `task`.
    ///
    /// Removing edges cannot introduce a cycle, so callers only invoke this
    /// after an addition.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError::PrerequisiteCycle`].
    pub fn check_prerequisites_added<G>(
        &self,
        graph: &G,
        task: TaskId,
    ) -> Result<(), IntegrityError>
    where
        G: TaskGraph + ?Sized,
    {
        self.detector.prerequisite_cycle(graph, task)?;
        Ok(())
    }

    /// Checks a time entry before it is inserted or updated.
    ///
    /// Runs only when the entry is not stored yet or points at a different
    /// task than the stored entry.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError::LeafOnlyTimeEntry`].
    pub fn check_time_entry_write<G>(
        &self,
        graph: &G,
        entry: &TimeEntry,
    ) -> Result<(), IntegrityError>
    where
        G: TaskGraph + ?Sized,
    {
        if task_differs_from_store(graph, entry) {
            structure::validate_time_entry_on_leaf(graph, entry)?;
        }
        Ok(())
    }

    /// Checks every stored task and time entry, ignoring change detection.
    ///
    /// Returns all violations found, in task id order. An empty result means
    /// the graph satisfies every invariant.
    #[must_use]
    pub fn audit<G>(&self, graph: &G) -> Vec<IntegrityError>
    where
        G: TaskGraph + ?Sized,
    {
        let mut violations = Vec::new();
        for id in graph.task_ids() {
            let Some(task) = graph.find_task(id) else {
                continue;
            };
            if let Err(err) = structure::validate_leaf_only_estimate(graph, &task) {
                violations.push(err);
            }
            if let Err(err) = self.detector.parent_cycle(graph, &task) {
                violations.push(err.into());
            }
            if let Err(err) = self.detector.prerequisite_cycle(graph, id) {
                violations.push(err.into());
            }
            for entry in graph.time_entries_for(id) {
                if let Err(err) = structure::validate_time_entry_on_leaf(graph, &entry) {
                    violations.push(err);
                }
            }
        }
        violations
    }
}

/// Returns `true` unless the stored copy of `task` has the same parent.
fn parent_differs_from_store<G>(graph: &G, task: &Task) -> bool
where
    G: TaskGraph + ?Sized,
{
    graph
        .find_task(task.id())
        .is_none_or(|stored| stored.parent() != task.parent())
}

/// Returns `true` unless the stored copy of `entry` is on the same task.
fn task_differs_from_store<G>(graph: &G, entry: &TimeEntry) -> bool
where
    G: TaskGraph + ?Sized,
{
    graph
        .find_time_entry(entry.id())
        .is_none_or(|stored| stored.task() != entry.task())
}
