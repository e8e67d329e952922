//! Scheduling inputs carried on each task.
//!
//! These fields are read and written by an external scheduler. The graph
//! only keeps them well-formed; it never computes dates or assignments.

use super::{TaskDomainError, UserId, hours};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Scheduling fields of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    dependent_hours: f64,
    risk_hours: f64,
    buffer_before: u16,
    buffer_after: u16,
    schedule_datetime: Option<DateTime<Utc>>,
    due_date: Option<NaiveDate>,
    auto_schedule: bool,
    auto_assign: bool,
    assigned_to: Option<UserId>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            dependent_hours: 0.0,
            risk_hours: 0.0,
            buffer_before: 0,
            buffer_after: 0,
            schedule_datetime: None,
            due_date: None,
            auto_schedule: true,
            auto_assign: true,
            assigned_to: None,
        }
    }
}

impl Schedule {
    /// Hours of work that depend on this task, as computed by the scheduler.
    #[must_use]
    pub const fn dependent_hours(&self) -> f64 {
        self.dependent_hours
    }

    /// Hours the task is expected to run past its due date.
    #[must_use]
    pub const fn risk_hours(&self) -> f64 {
        self.risk_hours
    }

    /// Buffer days between scheduled prerequisites and the start of the task.
    #[must_use]
    pub const fn buffer_before(&self) -> u16 {
        self.buffer_before
    }

    /// Buffer days between completion of the task and its dependents.
    #[must_use]
    pub const fn buffer_after(&self) -> u16 {
        self.buffer_after
    }

    /// Scheduled start, if one has been assigned.
    #[must_use]
    pub const fn schedule_datetime(&self) -> Option<DateTime<Utc>> {
        self.schedule_datetime
    }

    /// Date the task must be finished by.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Whether the scheduler may move this task.
    #[must_use]
    pub const fn auto_schedule(&self) -> bool {
        self.auto_schedule
    }

    /// Whether the scheduler may choose the assignee.
    #[must_use]
    pub const fn auto_assign(&self) -> bool {
        self.auto_assign
    }

    /// User the task is assigned to.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Sets the dependent hours.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NonFiniteHours`] for NaN or infinity.
    pub fn set_dependent_hours(&mut self, value: f64) -> Result<(), TaskDomainError> {
        self.dependent_hours = hours::finite("dependent_hours", value)?;
        Ok(())
    }

    /// Sets the risk hours.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NonFiniteHours`] for NaN or infinity.
    pub fn set_risk_hours(&mut self, value: f64) -> Result<(), TaskDomainError> {
        self.risk_hours = hours::finite("risk_hours", value)?;
        Ok(())
    }

    /// Sets both buffers, in days.
    pub const fn set_buffers(&mut self, before: u16, after: u16) {
        self.buffer_before = before;
        self.buffer_after = after;
    }

    /// Sets or clears the scheduled start.
    pub const fn set_schedule_datetime(&mut self, value: Option<DateTime<Utc>>) {
        self.schedule_datetime = value;
    }

    /// Sets or clears the due date.
    pub const fn set_due_date(&mut self, value: Option<NaiveDate>) {
        self.due_date = value;
    }

    /// Allows or forbids automatic scheduling.
    pub const fn set_auto_schedule(&mut self, enabled: bool) {
        self.auto_schedule = enabled;
    }

    /// Allows or forbids automatic assignment.
    pub const fn set_auto_assign(&mut self, enabled: bool) {
        self.auto_assign = enabled;
    }

    /// Sets or clears the assignee.
    pub const fn set_assigned_to(&mut self, user: Option<UserId>) {
        self.assigned_to = user;
    }
}
