//! Time logged against a leaf task.

use super::{TaskDomainError, TaskId, TimeEntryId, UserId};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A span of work performed on a task.
///
/// Entries may only reference leaf tasks. That rule is checked by the graph
/// service when the entry is written, not on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    id: TimeEntryId,
    task: TaskId,
    #[serde(default)]
    user: Option<UserId>,
    #[serde(default)]
    start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    end_time: Option<DateTime<Utc>>,
    #[serde(skip)]
    committed_task: Option<TaskId>,
}

impl TimeEntry {
    /// Creates a new, uncommitted entry against `task`.
    #[must_use]
    pub fn new(task: TaskId) -> Self {
        Self {
            id: TimeEntryId::new(),
            task,
            user: None,
            start_time: None,
            end_time: None,
            committed_task: None,
        }
    }

    /// Sets the user who performed the work.
    #[must_use]
    pub const fn with_user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    /// Sets both ends of the span.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EndBeforeStart`] when `end` precedes
    /// `start`.
    pub fn with_span(
        mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, TaskDomainError> {
        if end < start {
            return Err(TaskDomainError::EndBeforeStart);
        }
        self.start_time = Some(start);
        self.end_time = Some(end);
        Ok(self)
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> TimeEntryId {
        self.id
    }

    /// Returns the task the time was logged against.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        self.task
    }

    /// Returns the user who performed the work.
    #[must_use]
    pub const fn user(&self) -> Option<UserId> {
        self.user
    }

    /// Returns the start of the span.
    #[must_use]
    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Returns the end of the span.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Returns the elapsed time when both ends are recorded.
    #[must_use]
    pub fn duration(&self) -> Option<TimeDelta> {
        Some(self.end_time? - self.start_time?)
    }

    /// Stamps the start time from the clock and clears any end time.
    pub fn start(&mut self, clock: &impl Clock) {
        self.start_time = Some(clock.utc());
        self.end_time = None;
    }

    /// Stamps the end time from the clock.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EndBeforeStart`] if the clock reads earlier
    /// than the recorded start.
    pub fn stop(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let now = clock.utc();
        if self.start_time.is_some_and(|start| now < start) {
            return Err(TaskDomainError::EndBeforeStart);
        }
        self.end_time = Some(now);
        Ok(())
    }

    /// Moves the entry to another task.
    ///
    /// The leaf check runs again when the entry is written.
    pub const fn reassign(&mut self, task: TaskId) {
        self.task = task;
    }

    /// Returns `true` when the entry has never been committed to a store.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.committed_task.is_none()
    }

    /// Returns `true` when the task differs from the value this copy was last
    /// committed with, or when the entry has never been committed.
    #[must_use]
    pub fn task_changed(&self) -> bool {
        self.committed_task != Some(self.task)
    }

    /// Records the current task as the committed value.
    pub const fn mark_committed(&mut self) {
        self.committed_task = Some(self.task);
    }
}
