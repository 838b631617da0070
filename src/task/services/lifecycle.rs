//! Service layer for task creation, mutation and retrieval.

use super::{TaskServiceError, TaskServiceResult};
use crate::task::{
    domain::{
        Completion, DelayReason, FeedbackDate, OwnerId, Task, TaskDescription, TaskDraft, TaskId,
        TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    feedback_date: String,
}

impl CreateTaskRequest {
    /// Creates a request; `feedback_date` is `YYYY-MM-DD` or RFC 3339.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        feedback_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            feedback_date: feedback_date.into(),
        }
    }
}

/// Request payload for editing a task's title and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTaskRequest {
    task_id: TaskId,
    title: String,
    description: String,
}

impl EditTaskRequest {
    /// Creates an edit request.
    #[must_use]
    pub fn new(task_id: TaskId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            task_id,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Request payload for postponing a task's feedback date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayTaskRequest {
    task_id: TaskId,
    reason: String,
    new_date: String,
}

impl DelayTaskRequest {
    /// Creates a delay request; `new_date` is `YYYY-MM-DD` or RFC 3339.
    #[must_use]
    pub fn new(task_id: TaskId, reason: impl Into<String>, new_date: impl Into<String>) -> Self {
        Self {
            task_id,
            reason: reason.into(),
            new_date: new_date.into(),
        }
    }
}

/// Task lifecycle orchestration service.
///
/// Every operation is scoped to the calling owner. A task that exists but
/// belongs to someone else is reported exactly like a missing task.
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.repository), Arc::clone(&self.clock))
    }
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a new `ONGOING` task owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when a field is empty, the date
    /// is unparseable or in the past; nothing is stored in that case.
    /// Returns [`TaskServiceError::Repository`] when persistence fails.
    pub async fn create(
        &self,
        owner: &OwnerId,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let draft = TaskDraft {
            owner: owner.clone(),
            title: TaskTitle::new(request.title)?,
            description: TaskDescription::new(request.description)?,
            feedback_date: FeedbackDate::parse(&request.feedback_date)?,
        };
        let task = Task::new(draft, &*self.clock)?;
        self.repository
            .store(&task)
            .await
            .inspect_err(|err| log_store_failure(task.id(), err))?;

        info!(
            task_id = %task.id(),
            owner = %owner,
            feedback_date = %task.feedback_date(),
            "task created"
        );
        Ok(task)
    }

    /// Retrieves one of the owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is missing or
    /// owned by someone else.
    pub async fn get(&self, owner: &OwnerId, task_id: TaskId) -> TaskServiceResult<Task> {
        self.load(owner, task_id).await
    }

    /// Replaces the title and description of a task in any status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when either field is empty,
    /// [`TaskServiceError::NotFound`] when the task is not the caller's, or
    /// [`TaskServiceError::Repository`] when persistence fails or the task
    /// changed concurrently.
    pub async fn edit(&self, owner: &OwnerId, request: EditTaskRequest) -> TaskServiceResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let description = TaskDescription::new(request.description)?;

        let mut task = self.load(owner, request.task_id).await?;
        let expected = task.revision();
        task.edit(title, description, &*self.clock);
        self.repository
            .update(&task, expected)
            .await
            .inspect_err(|err| log_store_failure(task.id(), err))?;

        info!(task_id = %task.id(), owner = %owner, "task edited");
        Ok(task)
    }

    /// Postpones a task's feedback date and records the delay.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] carrying
    /// [`InvalidTransition`](crate::task::domain::TaskDomainError::InvalidTransition)
    /// when the task is completed, or a validation error when the reason is
    /// empty or the new date is not after the current feedback date. The
    /// stored task and its history are unchanged on any error.
    pub async fn delay(
        &self,
        owner: &OwnerId,
        request: DelayTaskRequest,
    ) -> TaskServiceResult<Task> {
        let reason = DelayReason::new(request.reason)?;
        let new_date = FeedbackDate::parse(&request.new_date)?;

        let mut task = self.load(owner, request.task_id).await?;
        let expected = task.revision();
        let entry = task.delay(reason, new_date, &*self.clock)?;
        self.repository
            .append_delay(&task, &entry, expected)
            .await
            .inspect_err(|err| log_store_failure(task.id(), err))?;

        info!(
            task_id = %task.id(),
            owner = %owner,
            old_date = %entry.old_date(),
            new_date = %entry.new_date(),
            delay_count = task.delay_count(),
            "task delayed"
        );
        Ok(task)
    }

    /// Marks a task as completed.
    ///
    /// Completing an already completed task succeeds without writing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is not the
    /// caller's, or [`TaskServiceError::Repository`] when persistence fails.
    pub async fn complete(&self, owner: &OwnerId, task_id: TaskId) -> TaskServiceResult<Task> {
        let mut task = self.load(owner, task_id).await?;
        let expected = task.revision();
        if task.complete(&*self.clock) == Completion::AlreadyCompleted {
            return Ok(task);
        }
        self.repository
            .update(&task, expected)
            .await
            .inspect_err(|err| log_store_failure(task.id(), err))?;

        info!(task_id = %task.id(), owner = %owner, "task completed");
        Ok(task)
    }

    /// Deletes a task and its delay history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is not the
    /// caller's, or [`TaskServiceError::Repository`] when persistence fails.
    pub async fn delete(&self, owner: &OwnerId, task_id: TaskId) -> TaskServiceResult<()> {
        let deleted = self
            .repository
            .delete(task_id, owner)
            .await
            .inspect_err(|err| log_store_failure(task_id, err))?;
        if !deleted {
            return Err(TaskServiceError::NotFound(task_id));
        }

        info!(task_id = %task_id, owner = %owner, "task deleted");
        Ok(())
    }

    async fn load(&self, owner: &OwnerId, task_id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(task_id, owner)
            .await
            .inspect_err(|err| log_store_failure(task_id, err))?
            .ok_or(TaskServiceError::NotFound(task_id))
    }
}

fn log_store_failure(task_id: TaskId, err: &TaskRepositoryError) {
    warn!(task_id = %task_id, error = %err, "task store operation failed");
}
