//! Service layer for validated task graph writes.

use super::{BulkLoadSummary, GraphBatch, ScheduleInputs, ScheduleUpdate};
use crate::config::IntegrityConfig;
use crate::task::{
    domain::{Task, TaskDomainError, TaskId, TaskStatus, TimeEntry, TimeEntryId, UserId},
    integrity::{CycleDetector, IntegrityError, MutationGuard, scheduling_order},
    ports::{GraphTransaction, TaskGraphStore, TaskGraphStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Service-level errors for task graph operations.
#[derive(Debug, Clone, Error)]
pub enum TaskGraphServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// A graph invariant would be broken.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskGraphStoreError),
    /// The scheduler tried to move a task pinned by the user.
    #[error("task {0} does not allow automatic scheduling")]
    AutoScheduleDisabled(TaskId),
}

/// Result type for task graph service operations.
pub type TaskGraphServiceResult<T> = Result<T, TaskGraphServiceError>;

/// Task graph orchestration service.
///
/// Every structural change runs in one store transaction: the guard checks
/// the staged write against the transaction's view and any error discards it.
#[derive(Clone)]
pub struct TaskGraphService<S, C>
where
    S: TaskGraphStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    guard: MutationGuard,
}

fn load_task(graph: &dyn GraphTransaction, id: TaskId) -> Result<Task, TaskGraphStoreError> {
    graph
        .find_task(id)
        .ok_or(TaskGraphStoreError::TaskNotFound(id))
}

fn load_time_entry(
    graph: &dyn GraphTransaction,
    id: TimeEntryId,
) -> Result<TimeEntry, TaskGraphStoreError> {
    graph
        .find_time_entry(id)
        .ok_or(TaskGraphStoreError::TimeEntryNotFound(id))
}

impl<S, C> TaskGraphService<S, C>
where
    S: TaskGraphStore,
    C: Clock + Send + Sync,
{
    /// Creates a service whose graph walks are bounded only by graph size.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            guard: MutationGuard::new(CycleDetector::new()),
        }
    }

    /// Creates a service using the traversal limit from `config`.
    #[must_use]
    pub const fn with_config(store: Arc<S>, clock: Arc<C>, config: &IntegrityConfig) -> Self {
        Self {
            store,
            clock,
            guard: MutationGuard::from_config(config),
        }
    }

    /// Returns the guard applied to writes.
    #[must_use]
    pub const fn guard(&self) -> MutationGuard {
        self.guard
    }

    fn commit<T, F>(&self, operation: &'static str, work: F) -> TaskGraphServiceResult<T>
    where
        F: FnOnce(&mut dyn GraphTransaction) -> TaskGraphServiceResult<T>,
    {
        let result = self.store.transaction(work);
        match &result {
            Ok(_) => info!(operation, "graph write committed"),
            Err(err) => warn!(operation, error = %err, "graph write rejected"),
        }
        result
    }

    fn checked_task_write(
        &self,
        graph: &dyn GraphTransaction,
        task: &Task,
    ) -> Result<(), IntegrityError> {
        debug!(task_id = %task.id(), parent = ?task.parent(), "checking task write");
        self.guard.check_task_write(graph, task)
    }

    // Tasks

    /// Stores a new task after checking its estimate and parent chain.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Integrity`] when the task would close
    /// a parent cycle, or [`TaskGraphServiceError::Store`] when the id is
    /// taken or the parent is unknown.
    pub fn create_task(&self, mut task: Task) -> TaskGraphServiceResult<Task> {
        self.commit("create_task", |tx| {
            self.checked_task_write(tx, &task)?;
            tx.insert_task(&task)?;
            Ok(())
        })?;
        task.mark_committed();
        Ok(task)
    }

    /// Replaces a stored task.
    ///
    /// The parent walk runs only when the parent differs from the stored
    /// record, so a stale copy cannot write an old parent back unchecked.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Integrity`] when the write breaks an
    /// invariant, or [`TaskGraphServiceError::Store`] when the task or its
    /// parent is unknown.
    pub fn update_task(&self, mut task: Task) -> TaskGraphServiceResult<Task> {
        self.commit("update_task", |tx| {
            self.checked_task_write(tx, &task)?;
            tx.update_task(&task)?;
            Ok(())
        })?;
        task.mark_committed();
        Ok(task)
    }

    /// Inserts or updates `task` in place, depending on whether it has been
    /// committed before.
    ///
    /// # Errors
    ///
    /// See [`Self::create_task`] and [`Self::update_task`].
    pub fn save_task(&self, task: &mut Task) -> TaskGraphServiceResult<()> {
        let saved = if task.is_new() {
            self.create_task(task.clone())?
        } else {
            self.update_task(task.clone())?
        };
        *task = saved;
        Ok(())
    }

    /// Moves a stored task under `parent`, or detaches it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Integrity`] when the move would close
    /// a parent cycle, or [`TaskGraphServiceError::Store`] when either task
    /// is unknown.
    pub fn set_parent(
        &self,
        task_id: TaskId,
        parent: Option<TaskId>,
    ) -> TaskGraphServiceResult<Task> {
        self.modify_task("set_parent", task_id, |task| {
            task.set_parent(parent);
            Ok(())
        })
    }

    /// Sets the hours estimate of a stored task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Domain`] for a negative or non-finite
    /// value, or [`TaskGraphServiceError::Integrity`] when the task has
    /// children and the value is positive.
    pub fn set_hours_estimate(
        &self,
        task_id: TaskId,
        estimate: f64,
    ) -> TaskGraphServiceResult<Task> {
        self.modify_task("set_hours_estimate", task_id, |task| {
            task.set_hours_estimate(estimate)
        })
    }

    /// Sets the status of a stored task. Any transition is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Store`] when the task is unknown.
    pub fn set_status(&self, task_id: TaskId, status: TaskStatus) -> TaskGraphServiceResult<Task> {
        self.modify_task("set_status", task_id, |task| {
            task.set_status(status);
            Ok(())
        })
    }

    fn modify_task<F>(
        &self,
        operation: &'static str,
        task_id: TaskId,
        change: F,
    ) -> TaskGraphServiceResult<Task>
    where
        F: FnOnce(&mut Task) -> Result<(), TaskDomainError>,
    {
        self.commit(operation, |tx| {
            let mut task = load_task(tx, task_id)?;
            change(&mut task)?;
            self.checked_task_write(tx, &task)?;
            tx.update_task(&task)?;
            task.mark_committed();
            Ok(task)
        })
    }

    /// Deletes a task, its subtree, their prerequisite edges and time
    /// entries.
    ///
    /// Returns the removed task ids, root first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Store`] when the task is unknown.
    pub fn delete_task(&self, task_id: TaskId) -> TaskGraphServiceResult<Vec<TaskId>> {
        self.commit("delete_task", |tx| Ok(tx.delete_task(task_id)?))
    }

    /// Retrieves a stored task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Store`] when the store cannot be read.
    pub fn find_task(&self, task_id: TaskId) -> TaskGraphServiceResult<Option<Task>> {
        Ok(self.store.read(|graph| graph.find_task(task_id))?)
    }

    /// Returns the direct children of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Store`] when the store cannot be read.
    pub fn children_of(&self, task_id: TaskId) -> TaskGraphServiceResult<Vec<TaskId>> {
        Ok(self.store.read(|graph| graph.children_of(task_id))?)
    }

    // Prerequisites

    /// Records that `task_id` depends on `prerequisite`.
    ///
    /// The edge is staged and the prerequisite walk runs before commit, so a
    /// cyclic edge is never stored. Returns `false` when the edge already
    /// existed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Integrity`] when the edge closes a
    /// cycle, or [`TaskGraphServiceError::Store`] when either task is
    /// unknown.
    pub fn add_prerequisite(
        &self,
        task_id: TaskId,
        prerequisite: TaskId,
    ) -> TaskGraphServiceResult<bool> {
        self.add_prerequisites(task_id, [prerequisite])
            .map(|added| added > 0)
    }

    /// Records several prerequisites of `task_id` as one change.
    ///
    /// Returns how many edges were new. The whole set is rolled back when
    /// any edge closes a cycle.
    ///
    /// # Errors
    ///
    /// See [`Self::add_prerequisite`].
    pub fn add_prerequisites<I>(
        &self,
        task_id: TaskId,
        prerequisites: I,
    ) -> TaskGraphServiceResult<usize>
    where
        I: IntoIterator<Item = TaskId>,
    {
        self.commit("add_prerequisites", |tx| {
            let mut added = 0;
            for prerequisite in prerequisites {
                if tx.insert_prerequisite(task_id, prerequisite)? {
                    added += 1;
                }
            }
            if added > 0 {
                debug!(%task_id, added, "checking prerequisite graph");
                self.guard.check_prerequisites_added(&*tx, task_id)?;
            }
            Ok(added)
        })
    }

    /// Removes a prerequisite edge. Removal never needs validation.
    ///
    /// Returns `false` when the edge did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Store`] when the task is unknown.
    pub fn remove_prerequisite(
        &self,
        task_id: TaskId,
        prerequisite: TaskId,
    ) -> TaskGraphServiceResult<bool> {
        self.commit("remove_prerequisite", |tx| {
            Ok(tx.remove_prerequisite(task_id, prerequisite)?)
        })
    }

    /// Returns the tasks `task_id` depends on.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Store`] when the store cannot be read.
    pub fn prerequisites_of(&self, task_id: TaskId) -> TaskGraphServiceResult<Vec<TaskId>> {
        Ok(self.store.read(|graph| graph.prerequisites_of(task_id))?)
    }

    /// Returns the tasks that depend on `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Store`] when the store cannot be read.
    pub fn dependents_of(&self, task_id: TaskId) -> TaskGraphServiceResult<Vec<TaskId>> {
        Ok(self.store.read(|graph| graph.dependents_of(task_id))?)
    }

    // Time entries

    /// Stores a new time entry against a leaf task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Integrity`] when the task has
    /// children, or [`TaskGraphServiceError::Store`] when the id is taken or
    /// the task is unknown.
    pub fn log_time(&self, mut entry: TimeEntry) -> TaskGraphServiceResult<TimeEntry> {
        self.commit("log_time", |tx| {
            self.checked_time_entry_write(tx, &entry)?;
            tx.insert_time_entry(&entry)?;
            Ok(())
        })?;
        entry.mark_committed();
        Ok(entry)
    }

    /// Replaces a stored time entry.
    ///
    /// The leaf check runs only when the entry points at a different task
    /// than the stored record.
    ///
    /// # Errors
    ///
    /// See [`Self::log_time`].
    pub fn update_time_entry(&self, mut entry: TimeEntry) -> TaskGraphServiceResult<TimeEntry> {
        self.commit("update_time_entry", |tx| {
            self.checked_time_entry_write(tx, &entry)?;
            tx.update_time_entry(&entry)?;
            Ok(())
        })?;
        entry.mark_committed();
        Ok(entry)
    }

    /// Starts a timer on `task_id`, stamped from the service clock.
    ///
    /// # Errors
    ///
    /// See [`Self::log_time`].
    pub fn start_timer(
        &self,
        task_id: TaskId,
        user: Option<UserId>,
    ) -> TaskGraphServiceResult<TimeEntry> {
        let mut entry = TimeEntry::new(task_id);
        if let Some(worker) = user {
            entry = entry.with_user(worker);
        }
        entry.start(&*self.clock);
        self.log_time(entry)
    }

    /// Stops a running timer, stamping the end from the service clock.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Domain`] when the clock reads before
    /// the start, or [`TaskGraphServiceError::Store`] when the entry is
    /// unknown.
    pub fn stop_timer(&self, entry_id: TimeEntryId) -> TaskGraphServiceResult<TimeEntry> {
        self.commit("stop_timer", |tx| {
            let mut entry = load_time_entry(tx, entry_id)?;
            entry.stop(&*self.clock)?;
            self.checked_time_entry_write(tx, &entry)?;
            tx.update_time_entry(&entry)?;
            entry.mark_committed();
            Ok(entry)
        })
    }

    /// Retrieves a stored time entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Store`] when the store cannot be read.
    pub fn find_time_entry(
        &self,
        entry_id: TimeEntryId,
    ) -> TaskGraphServiceResult<Option<TimeEntry>> {
        Ok(self.store.read(|graph| graph.find_time_entry(entry_id))?)
    }

    /// Returns the time entries logged against a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Store`] when the store cannot be read.
    pub fn time_entries_for(&self, task_id: TaskId) -> TaskGraphServiceResult<Vec<TimeEntry>> {
        Ok(self.store.read(|graph| graph.time_entries_for(task_id))?)
    }

    fn checked_time_entry_write(
        &self,
        graph: &dyn GraphTransaction,
        entry: &TimeEntry,
    ) -> Result<(), IntegrityError> {
        debug!(
            entry_id = %entry.id(),
            task_id = %entry.task(),
            "checking time entry write"
        );
        self.guard.check_time_entry_write(graph, entry)
    }

    // Trusted loads and audits

    /// Writes a trusted batch without running any invariant check.
    ///
    /// Referential integrity is still enforced, so the batch is rejected as a
    /// whole when it names an unknown task. Tasks may reference parents later
    /// in the batch. Run [`Self::audit`] afterwards when the source is not
    /// fully trusted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Store`] on duplicate ids or dangling
    /// references.
    pub fn bulk_load_unvalidated(
        &self,
        batch: GraphBatch,
    ) -> TaskGraphServiceResult<BulkLoadSummary> {
        let GraphBatch {
            tasks,
            prerequisites,
            time_entries,
        } = batch;
        warn!(
            tasks = tasks.len(),
            prerequisites = prerequisites.len(),
            time_entries = time_entries.len(),
            "loading task graph batch without invariant checks"
        );
        self.commit("bulk_load_unvalidated", move |tx| {
            let mut summary = BulkLoadSummary::default();
            for task in &tasks {
                let mut detached = task.clone();
                detached.set_parent(None);
                tx.insert_task(&detached)?;
                summary.tasks += 1;
            }
            for task in tasks.iter().filter(|task| task.parent().is_some()) {
                tx.update_task(task)?;
            }
            for edge in prerequisites {
                if tx.insert_prerequisite(edge.task, edge.prerequisite)? {
                    summary.prerequisites += 1;
                }
            }
            for entry in &time_entries {
                tx.insert_time_entry(entry)?;
                summary.time_entries += 1;
            }
            Ok(summary)
        })
    }

    /// Checks every stored task and time entry against all invariants.
    ///
    /// Returns the violations found; an empty list means the graph is sound.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Store`] when the store cannot be read.
    pub fn audit(&self) -> TaskGraphServiceResult<Vec<IntegrityError>> {
        let violations = self.store.read(|graph| self.guard.audit(graph))?;
        if violations.is_empty() {
            debug!("task graph audit found no violations");
        } else {
            warn!(count = violations.len(), "task graph audit found violations");
        }
        Ok(violations)
    }

    // Scheduling

    /// Returns the scheduling inputs of one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Store`] when the task is unknown.
    pub fn schedule_inputs(&self, task_id: TaskId) -> TaskGraphServiceResult<ScheduleInputs> {
        let inputs = self.store.read(|graph| {
            let task = load_task(graph, task_id)?;
            Ok::<_, TaskGraphStoreError>(ScheduleInputs::from_task(
                &task,
                graph.prerequisites_of(task_id),
            ))
        })??;
        Ok(inputs)
    }

    /// Returns every stored task with prerequisites before dependents.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Integrity`] when the stored
    /// prerequisite graph is cyclic.
    pub fn scheduling_order(&self) -> TaskGraphServiceResult<Vec<TaskId>> {
        Ok(self.store.read(|graph| scheduling_order(graph))??)
    }

    /// Writes a scheduler decision back to a task.
    ///
    /// A proposed assignee is dropped when the task disallows automatic
    /// assignment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::AutoScheduleDisabled`] when the task
    /// is pinned, [`TaskGraphServiceError::Domain`] for non-finite hours, or
    /// [`TaskGraphServiceError::Store`] when the task is unknown.
    pub fn record_schedule(
        &self,
        task_id: TaskId,
        update: &ScheduleUpdate,
    ) -> TaskGraphServiceResult<Task> {
        self.commit("record_schedule", |tx| {
            let mut task = load_task(tx, task_id)?;
            if !task.schedule().auto_schedule() {
                return Err(TaskGraphServiceError::AutoScheduleDisabled(task_id));
            }
            update.apply(task.schedule_mut())?;
            self.checked_task_write(tx, &task)?;
            tx.update_task(&task)?;
            task.mark_committed();
            Ok(task)
        })
    }
}
