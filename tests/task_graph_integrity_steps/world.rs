//! Shared world state for task graph integrity BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskweave::task::{
    adapters::memory::InMemoryTaskGraphStore,
    domain::{ProjectId, TaskId},
    integrity::IntegrityError,
    services::{TaskGraphService, TaskGraphServiceError},
};

/// Service type used by the BDD world.
pub type TestGraphService = TaskGraphService<InMemoryTaskGraphStore, DefaultClock>;

/// Scenario world for task graph behaviour tests.
pub struct TaskGraphWorld {
    pub service: TestGraphService,
    pub project: ProjectId,
    pub tasks: HashMap<String, TaskId>,
    pub last_result: Option<Result<(), TaskGraphServiceError>>,
    pub violations: Vec<IntegrityError>,
}

impl TaskGraphWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: TaskGraphService::new(
                Arc::new(InMemoryTaskGraphStore::new()),
                Arc::new(DefaultClock),
            ),
            project: ProjectId::new(),
            tasks: HashMap::new(),
            last_result: None,
            violations: Vec::new(),
        }
    }

    /// Looks up a task created earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if no task was given that name.
    pub fn task(&self, name: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task named {name} in scenario world"))
    }

    /// Records the outcome of the latest write.
    pub fn record<T>(&mut self, result: Result<T, TaskGraphServiceError>) {
        self.last_result = Some(result.map(|_| ()));
    }
}

impl Default for TaskGraphWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskGraphWorld {
    TaskGraphWorld::default()
}
