//! Serialisable response payloads produced at the service boundary.

use crate::task::{
    domain::{DelayEntry, DelayId, EvaluatedTask, FeedbackDate, PageMeta, TaskId, TaskStatus},
    services::{TaskErrorKind, TaskPage, TaskServiceError},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// One delay history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelayResponse {
    /// Ordinal within the task.
    pub id: DelayId,
    /// Recorded reason.
    pub reason: String,
    /// Feedback date before the delay.
    pub old_date: FeedbackDate,
    /// Feedback date after the delay.
    pub new_date: FeedbackDate,
    /// Time the delay was recorded.
    pub created_at: DateTime<Utc>,
}

impl From<&DelayEntry> for DelayResponse {
    fn from(entry: &DelayEntry) -> Self {
        Self {
            id: entry.id(),
            reason: entry.reason().as_str().to_owned(),
            old_date: entry.old_date(),
            new_date: entry.new_date(),
            created_at: entry.created_at(),
        }
    }
}

/// Full task representation including the derived overdue indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskResponse {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Current feedback date.
    pub feedback_date: FeedbackDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Number of recorded delays.
    pub delay_count: usize,
    /// Delay history in creation order.
    pub delays: Vec<DelayResponse>,
    /// Whether the task was overdue when the response was built.
    pub is_overdue: bool,
}

impl From<EvaluatedTask> for TaskResponse {
    fn from(evaluated: EvaluatedTask) -> Self {
        let EvaluatedTask { task, is_overdue } = evaluated;
        Self {
            id: task.id(),
            title: task.title().as_str().to_owned(),
            description: task.description().as_str().to_owned(),
            status: task.status(),
            feedback_date: task.feedback_date(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
            delay_count: task.delay_count(),
            delays: task.delays().iter().map(DelayResponse::from).collect(),
            is_overdue,
        }
    }
}

/// A page of tasks with pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskListResponse {
    /// Tasks on the page.
    pub items: Vec<TaskResponse>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

impl From<TaskPage> for TaskListResponse {
    fn from(page: TaskPage) -> Self {
        Self {
            items: page.items.into_iter().map(TaskResponse::from).collect(),
            meta: page.meta,
        }
    }
}

/// Confirmation of a deleted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteTaskResponse {
    /// Identifier of the removed task.
    pub id: TaskId,
    /// Always `true`; failures are reported as [`ApiError`].
    pub deleted: bool,
}

/// Caller-facing error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    /// Error classification.
    pub kind: TaskErrorKind,
    /// Human-readable explanation.
    pub message: String,
    /// Whether the same call may succeed if retried.
    pub retryable: bool,
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        let kind = err.kind();
        let message = match kind {
            TaskErrorKind::StoreFailure => "task store unavailable, retry the request".to_owned(),
            TaskErrorKind::Forbidden => "caller is not authenticated".to_owned(),
            TaskErrorKind::ValidationError
            | TaskErrorKind::NotFound
            | TaskErrorKind::InvalidTransition => err.to_string(),
        };
        Self {
            kind,
            message,
            retryable: kind.is_retryable(),
        }
    }
}
