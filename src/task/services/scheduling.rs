//! Data exchanged with an external scheduler.

use crate::task::domain::{Schedule, Task, TaskDomainError, TaskId, TaskStatus, UserId};
use chrono::{DateTime, NaiveDate, Utc};

/// Everything a scheduler reads about one task.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleInputs {
    /// Task the inputs describe.
    pub task_id: TaskId,
    /// Current work status.
    pub status: TaskStatus,
    /// Tasks that must be scheduled first.
    pub prerequisites: Vec<TaskId>,
    /// Estimated hours of work. Zero for non-leaf tasks.
    pub hours_estimate: f64,
    /// Hours of work depending on this task.
    pub dependent_hours: f64,
    /// Hours expected past the due date.
    pub risk_hours: f64,
    /// Buffer days before the task starts.
    pub buffer_before: u16,
    /// Buffer days after the task ends.
    pub buffer_after: u16,
    /// Date the task must be finished by.
    pub due_date: Option<NaiveDate>,
    /// Current scheduled start.
    pub schedule_datetime: Option<DateTime<Utc>>,
    /// Whether the scheduler may move the task.
    pub auto_schedule: bool,
    /// Whether the scheduler may choose the assignee.
    pub auto_assign: bool,
    /// Current assignee.
    pub assigned_to: Option<UserId>,
}

impl ScheduleInputs {
    pub(super) const fn from_task(task: &Task, prerequisites: Vec<TaskId>) -> Self {
        let schedule = task.schedule();
        Self {
            task_id: task.id(),
            status: task.status(),
            prerequisites,
            hours_estimate: task.hours_estimate(),
            dependent_hours: schedule.dependent_hours(),
            risk_hours: schedule.risk_hours(),
            buffer_before: schedule.buffer_before(),
            buffer_after: schedule.buffer_after(),
            due_date: schedule.due_date(),
            schedule_datetime: schedule.schedule_datetime(),
            auto_schedule: schedule.auto_schedule(),
            auto_assign: schedule.auto_assign(),
            assigned_to: schedule.assigned_to(),
        }
    }
}

/// Scheduler output written back to one task.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleUpdate {
    schedule_datetime: DateTime<Utc>,
    assigned_to: Option<UserId>,
    dependent_hours: Option<f64>,
    risk_hours: Option<f64>,
}

impl ScheduleUpdate {
    /// Creates an update placing the task at `schedule_datetime`.
    #[must_use]
    pub const fn new(schedule_datetime: DateTime<Utc>) -> Self {
        Self {
            schedule_datetime,
            assigned_to: None,
            dependent_hours: None,
            risk_hours: None,
        }
    }

    /// Proposes an assignee. Ignored for tasks that disallow auto-assignment.
    #[must_use]
    pub const fn with_assignee(mut self, user: UserId) -> Self {
        self.assigned_to = Some(user);
        self
    }

    /// Records the computed dependent hours.
    #[must_use]
    pub const fn with_dependent_hours(mut self, hours: f64) -> Self {
        self.dependent_hours = Some(hours);
        self
    }

    /// Records the computed risk hours.
    #[must_use]
    pub const fn with_risk_hours(mut self, hours: f64) -> Self {
        self.risk_hours = Some(hours);
        self
    }

    /// Returns the scheduled start.
    #[must_use]
    pub const fn schedule_datetime(&self) -> DateTime<Utc> {
        self.schedule_datetime
    }

    /// Returns the proposed assignee.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    pub(super) fn apply(&self, schedule: &mut Schedule) -> Result<(), TaskDomainError> {
        if let Some(hours) = self.dependent_hours {
            schedule.set_dependent_hours(hours)?;
        }
        if let Some(hours) = self.risk_hours {
            schedule.set_risk_hours(hours)?;
        }
        schedule.set_schedule_datetime(Some(self.schedule_datetime));
        if schedule.auto_assign() && self.assigned_to.is_some() {
            schedule.set_assigned_to(self.assigned_to);
        }
        Ok(())
    }
}
