//! Application services for task graph orchestration.

mod bulk;
mod graph;
mod scheduling;

pub use bulk::{BulkLoadSummary, GraphBatch};
pub use graph::{TaskGraphService, TaskGraphServiceError, TaskGraphServiceResult};
pub use scheduling::{ScheduleInputs, ScheduleUpdate};
