//! Caller-facing task operations.

use super::{
    ApiError, CreateTaskBody, DelayTaskBody, DeleteTaskResponse, ListTasksParams,
    TaskListResponse, TaskResponse, UpdateTaskBody,
};
use crate::task::{
    domain::{OverdueCutoff, OwnerId, Task, TaskId},
    ports::{BearerCredential, IdentityError, IdentityProvider, TaskRepository},
    services::{
        CreateTaskRequest, DelayTaskRequest, EditTaskRequest, TaskLifecycleService,
        TaskQueryConfig, TaskQueryService, TaskServiceError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use tracing::warn;

/// Result type for boundary operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Service boundary over the lifecycle and query engines.
///
/// Every call resolves the caller's credential first; a missing or rejected
/// credential fails with
/// [`TaskErrorKind::Forbidden`](crate::task::services::TaskErrorKind::Forbidden)
/// before any task is touched.
pub struct TaskApi<R, I, C>
where
    R: TaskRepository,
    I: IdentityProvider,
    C: Clock + Send + Sync,
{
    lifecycle: TaskLifecycleService<R, C>,
    queries: TaskQueryService<R, C>,
    identity: Arc<I>,
    clock: Arc<C>,
}

impl<R, I, C> Clone for TaskApi<R, I, C>
where
    R: TaskRepository,
    I: IdentityProvider,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            lifecycle: self.lifecycle.clone(),
            queries: self.queries.clone(),
            identity: Arc::clone(&self.identity),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, I, C> TaskApi<R, I, C>
where
    R: TaskRepository,
    I: IdentityProvider,
    C: Clock + Send + Sync,
{
    /// Creates the boundary with default paging limits.
    #[must_use]
    pub fn new(repository: Arc<R>, identity: Arc<I>, clock: Arc<C>) -> Self {
        Self::with_query_config(repository, identity, clock, TaskQueryConfig::default())
    }

    /// Creates the boundary with explicit paging limits.
    #[must_use]
    pub fn with_query_config(
        repository: Arc<R>,
        identity: Arc<I>,
        clock: Arc<C>,
        config: TaskQueryConfig,
    ) -> Self {
        Self {
            lifecycle: TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock)),
            queries: TaskQueryService::with_config(repository, Arc::clone(&clock), config),
            identity,
            clock,
        }
    }

    /// Creates a task for the caller.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified per
    /// [`TaskErrorKind`](crate::task::services::TaskErrorKind).
    pub async fn create_task(
        &self,
        credential: Option<&BearerCredential>,
        body: CreateTaskBody,
    ) -> ApiResult<TaskResponse> {
        let owner = self.authenticate(credential).await?;
        let request = CreateTaskRequest::new(body.title, body.description, body.feedback_date);
        let task = self.lifecycle.create(&owner, request).await?;
        Ok(self.respond(task))
    }

    /// Lists the caller's tasks.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified per
    /// [`TaskErrorKind`](crate::task::services::TaskErrorKind).
    pub async fn list_tasks(
        &self,
        credential: Option<&BearerCredential>,
        params: ListTasksParams,
    ) -> ApiResult<TaskListResponse> {
        let owner = self.authenticate(credential).await?;
        let request = params.into_request().map_err(TaskServiceError::from)?;
        let page = self.queries.list(&owner, request).await?;
        Ok(TaskListResponse::from(page))
    }

    /// Fetches one of the caller's tasks.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified per
    /// [`TaskErrorKind`](crate::task::services::TaskErrorKind).
    pub async fn get_task(
        &self,
        credential: Option<&BearerCredential>,
        task_id: TaskId,
    ) -> ApiResult<TaskResponse> {
        let owner = self.authenticate(credential).await?;
        let task = self.lifecycle.get(&owner, task_id).await?;
        Ok(self.respond(task))
    }

    /// Replaces the title and description of one of the caller's tasks.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified per
    /// [`TaskErrorKind`](crate::task::services::TaskErrorKind).
    pub async fn update_task(
        &self,
        credential: Option<&BearerCredential>,
        task_id: TaskId,
        body: UpdateTaskBody,
    ) -> ApiResult<TaskResponse> {
        let owner = self.authenticate(credential).await?;
        let request = EditTaskRequest::new(task_id, body.title, body.description);
        let task = self.lifecycle.edit(&owner, request).await?;
        Ok(self.respond(task))
    }

    /// Postpones one of the caller's tasks.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified per
    /// [`TaskErrorKind`](crate::task::services::TaskErrorKind).
    pub async fn delay_task(
        &self,
        credential: Option<&BearerCredential>,
        task_id: TaskId,
        body: DelayTaskBody,
    ) -> ApiResult<TaskResponse> {
        let owner = self.authenticate(credential).await?;
        let request = DelayTaskRequest::new(task_id, body.reason, body.new_date);
        let task = self.lifecycle.delay(&owner, request).await?;
        Ok(self.respond(task))
    }

    /// Completes one of the caller's tasks.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified per
    /// [`TaskErrorKind`](crate::task::services::TaskErrorKind).
    pub async fn complete_task(
        &self,
        credential: Option<&BearerCredential>,
        task_id: TaskId,
    ) -> ApiResult<TaskResponse> {
        let owner = self.authenticate(credential).await?;
        let task = self.lifecycle.complete(&owner, task_id).await?;
        Ok(self.respond(task))
    }

    /// Deletes one of the caller's tasks with its delay history.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified per
    /// [`TaskErrorKind`](crate::task::services::TaskErrorKind).
    pub async fn delete_task(
        &self,
        credential: Option<&BearerCredential>,
        task_id: TaskId,
    ) -> ApiResult<DeleteTaskResponse> {
        let owner = self.authenticate(credential).await?;
        self.lifecycle.delete(&owner, task_id).await?;
        Ok(DeleteTaskResponse {
            id: task_id,
            deleted: true,
        })
    }

    async fn authenticate(&self, credential: Option<&BearerCredential>) -> ApiResult<OwnerId> {
        let resolved = match credential {
            Some(presented) => self.identity.resolve(presented).await,
            None => Err(IdentityError::MissingCredential),
        };
        resolved.map_err(|err| {
            warn!(error = %err, "caller credential rejected");
            ApiError::from(TaskServiceError::from(err))
        })
    }

    fn respond(&self, task: Task) -> TaskResponse {
        TaskResponse::from(OverdueCutoff::at(self.clock.utc()).evaluate(task))
    }
}
