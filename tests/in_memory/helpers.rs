//! Shared test helpers for in-memory task graph integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskweave::task::{
    adapters::memory::InMemoryTaskGraphStore,
    domain::{ProjectId, Task, TaskId},
    services::TaskGraphService,
};

/// Service type used across integration tests.
pub type TestService = TaskGraphService<InMemoryTaskGraphStore, DefaultClock>;

/// Provides a service over a fresh in-memory store.
#[fixture]
pub fn service() -> TestService {
    TaskGraphService::new(
        Arc::new(InMemoryTaskGraphStore::new()),
        Arc::new(DefaultClock),
    )
}

/// Provides the project every test task belongs to.
#[fixture]
pub fn project() -> ProjectId {
    ProjectId::new()
}

/// Creates a root task.
///
/// # Errors
///
/// Returns an error if the service rejects the task.
pub fn create_root(service: &TestService, project: ProjectId) -> eyre::Result<TaskId> {
    Ok(service.create_task(Task::new(project))?.id())
}

/// Creates a task under `parent`.
///
/// # Errors
///
/// Returns an error if the service rejects the task.
pub fn create_child(
    service: &TestService,
    project: ProjectId,
    parent: TaskId,
) -> eyre::Result<TaskId> {
    Ok(service
        .create_task(Task::new(project).with_parent(parent))?
        .id())
}

/// Creates `count` independent root tasks.
///
/// # Errors
///
/// Returns an error if the service rejects a task.
pub fn create_roots(
    service: &TestService,
    project: ProjectId,
    count: usize,
) -> eyre::Result<Vec<TaskId>> {
    (0..count).map(|_| create_root(service, project)).collect()
}

/// Loads a stored task.
///
/// # Errors
///
/// Returns an error if the task is missing or the store cannot be read.
pub fn stored(service: &TestService, id: TaskId) -> eyre::Result<Task> {
    service
        .find_task(id)?
        .ok_or_else(|| eyre::eyre!("task {id} should be stored"))
}
