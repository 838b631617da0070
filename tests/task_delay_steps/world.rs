//! Shared world state for task delay BDD scenarios.

use std::sync::Arc;

use crate::test_helpers::ManualClock;
use followup::task::{
    adapters::memory::{InMemoryTaskRepository, StaticIdentityProvider},
    api::{ApiError, TaskApi, TaskResponse},
    domain::{OwnerId, TaskId},
    ports::BearerCredential,
};
use rstest::fixture;

/// Boundary type used by the BDD world.
pub type TestTaskApi = TaskApi<InMemoryTaskRepository, StaticIdentityProvider, ManualClock>;

/// Scenario world for task delay behaviour tests.
pub struct TaskDelayWorld {
    pub api: TestTaskApi,
    pub clock: Arc<ManualClock>,
    pub caller: BearerCredential,
    pub stranger: BearerCredential,
    pub task_id: Option<TaskId>,
    pub last_error: Option<ApiError>,
}

impl TaskDelayWorld {
    /// Creates a world with two registered callers and an empty store.
    ///
    /// # Panics
    ///
    /// Panics if the fixed start day or owners are rejected.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::on(2025, 7, 1));
        let identity = StaticIdentityProvider::new()
            .with_token("owner-token", OwnerId::new("scenario-owner").expect("valid owner"))
            .with_token("stranger-token", OwnerId::new("stranger").expect("valid owner"));
        let api = TaskApi::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(identity),
            Arc::clone(&clock),
        );

        Self {
            api,
            clock,
            caller: BearerCredential::new("owner-token"),
            stranger: BearerCredential::new("stranger-token"),
            task_id: None,
            last_error: None,
        }
    }

    /// Returns the identifier of the scenario's task.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has been created yet.
    pub fn task_id(&self) -> Result<TaskId, eyre::Report> {
        self.task_id
            .ok_or_else(|| eyre::eyre!("missing created task in scenario world"))
    }

    /// Records the outcome of a boundary call.
    pub fn record(&mut self, result: Result<TaskResponse, ApiError>) {
        self.last_error = result.err();
    }
}

impl Default for TaskDelayWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskDelayWorld {
    TaskDelayWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
