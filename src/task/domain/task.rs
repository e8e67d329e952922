//! Task node of the project graph and its status.

use super::{ParseTaskStatusError, ProjectId, Schedule, TaskDomainError, TaskId, hours};
use serde::{Deserialize, Serialize};

/// Work status of a task.
///
/// Transitions are unrestricted at this layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Work has not begun.
    #[default]
    NotStarted,
    /// Work is under way.
    InProcess,
    /// Work is finished.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProcess => "IN_PROCESS",
            Self::Completed => "COMPLETED",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "NOT_STARTED" => Ok(Self::NotStarted),
            "IN_PROCESS" => Ok(Self::InProcess),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Last committed state of a task, used for change detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Committed {
    #[default]
    Never,
    Parent(Option<TaskId>),
}

/// A node in the project task graph.
///
/// Parent links live on the node. Prerequisite edges are kept by the graph
/// store, separately from node records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project: ProjectId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    instructions: String,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default)]
    parent: Option<TaskId>,
    #[serde(default, deserialize_with = "hours::deserialize_estimate")]
    hours_estimate: f64,
    #[serde(default)]
    schedule: Schedule,
    #[serde(skip)]
    committed: Committed,
}

impl Task {
    /// Creates a new, uncommitted root task in the given project.
    #[must_use]
    pub fn new(project: ProjectId) -> Self {
        Self {
            id: TaskId::new(),
            project,
            name: String::new(),
            description: String::new(),
            instructions: String::new(),
            status: TaskStatus::NotStarted,
            parent: None,
            hours_estimate: 0.0,
            schedule: Schedule::default(),
            committed: Committed::Never,
        }
    }

    /// Sets the task name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the parent task.
    #[must_use]
    pub const fn with_parent(mut self, parent: TaskId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the hours estimate.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the estimate is negative or not
    /// finite.
    pub fn with_hours_estimate(mut self, estimate: f64) -> Result<Self, TaskDomainError> {
        self.set_hours_estimate(estimate)?;
        Ok(self)
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the completion instructions.
    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Returns the work status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the parent task, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<TaskId> {
        self.parent
    }

    /// Returns the estimated hours of work.
    #[must_use]
    pub const fn hours_estimate(&self) -> f64 {
        self.hours_estimate
    }

    /// Returns the scheduling inputs.
    #[must_use]
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Returns mutable access to the scheduling inputs.
    pub const fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    /// Replaces the task name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replaces the task description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replaces the completion instructions.
    ///
    /// Long instructions usually mean the task should be split into child
    /// tasks instead.
    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.instructions = instructions.into();
    }

    /// Sets the work status.
    pub const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Points the task at a new parent, or detaches it.
    ///
    /// Cycle checks run when the task is written, not here.
    pub const fn set_parent(&mut self, parent: Option<TaskId>) {
        self.parent = parent;
    }

    /// Sets the hours estimate.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the estimate is negative or not
    /// finite.
    pub fn set_hours_estimate(&mut self, estimate: f64) -> Result<(), TaskDomainError> {
        self.hours_estimate = hours::non_negative("hours_estimate", estimate)?;
        Ok(())
    }

    /// Returns `true` when the task has never been committed to a store.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self.committed, Committed::Never)
    }

    /// Returns `true` when the parent differs from the value this copy was
    /// last committed with, or when the task has never been committed.
    ///
    /// Another writer may have moved the stored task since, so writes are
    /// checked against the stored record instead.
    #[must_use]
    pub fn parent_changed(&self) -> bool {
        match self.committed {
            Committed::Never => true,
            Committed::Parent(parent) => parent != self.parent,
        }
    }

    /// Records the current parent as the committed value.
    ///
    /// Stores call this on the copies they keep; services call it on the
    /// caller's copy after a successful commit.
    pub const fn mark_committed(&mut self) {
        self.committed = Committed::Parent(self.parent);
    }
}
