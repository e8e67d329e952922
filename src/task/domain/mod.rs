//! Domain model for the project task graph.
//!
//! Tasks form a parent/child forest and a prerequisite DAG. The domain types
//! hold node data and change-detection state; graph-wide rules live in
//! [`crate::task::integrity`] and persistence behind [`crate::task::ports`].

mod edge;
mod error;
mod hours;
mod ids;
mod schedule;
mod task;
mod time_entry;

pub use edge::PrerequisiteEdge;
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{ProjectId, TaskId, TimeEntryId, UserId};
pub use schedule::Schedule;
pub use task::{Task, TaskStatus};
pub use time_entry::TimeEntry;
