//! Repository port for task persistence, lookup, and listing.

use crate::task::domain::{DelayEntry, DelayId, OwnerId, Revision, Task, TaskId, TaskQuery};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// One page of matching tasks plus the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskSlice {
    /// Tasks on the requested page, in listing order.
    pub items: Vec<Task>,
    /// Number of tasks matching the query across all pages.
    pub total: u64,
}

/// Task persistence contract.
///
/// Implementations apply each write atomically: a reader never observes a
/// task with some fields of a mutation applied and others not, and the
/// delay history always matches the task row it belongs to. Writes to the
/// same task are serialised through [`Revision`] checks; writes to
/// different tasks never contend.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier, scoped to its owner.
    ///
    /// Returns `None` when the task does not exist or belongs to another
    /// owner; the two cases are indistinguishable.
    async fn find_by_id(&self, id: TaskId, owner: &OwnerId) -> TaskRepositoryResult<Option<Task>>;

    /// Persists title, description, status, feedback date and timestamps of
    /// an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task no longer
    /// exists, or [`TaskRepositoryError::Conflict`] when the stored revision
    /// differs from `expected`.
    async fn update(&self, task: &Task, expected: Revision) -> TaskRepositoryResult<()>;

    /// Persists a delayed task together with its newly appended history
    /// entry as one atomic write.
    ///
    /// # Errors
    ///
    /// Same as [`TaskRepository::update`], plus
    /// [`TaskRepositoryError::DetachedDelay`] when `entry` is not the last
    /// entry of the task's history. On error neither the task row nor the
    /// history changes.
    async fn append_delay(
        &self,
        task: &Task,
        entry: &DelayEntry,
        expected: Revision,
    ) -> TaskRepositoryResult<()>;

    /// Deletes a task and its delay history.
    ///
    /// Returns `false` when no task with this identifier belongs to `owner`.
    async fn delete(&self, id: TaskId, owner: &OwnerId) -> TaskRepositoryResult<bool>;

    /// Lists the owner's tasks matching `query`.
    ///
    /// Items are ordered by creation time, newest first, with ties broken by
    /// descending task identifier so that pages stay stable.
    async fn query(&self, owner: &OwnerId, query: &TaskQuery) -> TaskRepositoryResult<TaskSlice>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The task was modified concurrently since it was loaded.
    #[error("task {task_id} was modified concurrently (expected revision {expected})")]
    Conflict {
        /// Task whose write was rejected.
        task_id: TaskId,
        /// Revision the writer loaded.
        expected: Revision,
    },

    /// A delay entry was written without being the task's latest delay.
    #[error("delay {delay_id} is not the latest history entry of task {task_id}")]
    DetachedDelay {
        /// Task the entry was written for.
        task_id: TaskId,
        /// Rejected entry.
        delay_id: DelayId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Checks that `entry` closes the task's delay history.
///
/// # Errors
///
/// Returns [`TaskRepositoryError::DetachedDelay`] otherwise.
pub fn ensure_latest_delay(task: &Task, entry: &DelayEntry) -> TaskRepositoryResult<()> {
    if task.delays().last() == Some(entry) {
        return Ok(());
    }
    Err(TaskRepositoryError::DetachedDelay {
        task_id: task.id(),
        delay_id: entry.id(),
    })
}
