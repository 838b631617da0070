//! Service-level error taxonomy for task operations.

use crate::task::{
    domain::{TaskDomainError, TaskId},
    ports::{IdentityError, TaskRepositoryError},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Caller-visible classification of a failed task operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskErrorKind {
    /// Malformed or missing input.
    ValidationError,
    /// The task does not exist or belongs to another owner.
    NotFound,
    /// The caller identity is missing or invalid.
    Forbidden,
    /// The operation is not permitted in the task's status.
    InvalidTransition,
    /// Persistence failed; nothing was applied and the call may be retried.
    StoreFailure,
}

impl TaskErrorKind {
    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::InvalidTransition => "invalid_transition",
            Self::StoreFailure => "store_failure",
        }
    }

    /// Returns `true` when retrying the same call may succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::StoreFailure)
    }
}

impl fmt::Display for TaskErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation or transition check failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Caller identity could not be established.
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// No task with the identifier belongs to the caller.
    #[error("task {0} not found")]
    NotFound(TaskId),
}

impl TaskServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::Domain(TaskDomainError::InvalidTransition { .. }) => {
                TaskErrorKind::InvalidTransition
            }
            Self::Domain(_) => TaskErrorKind::ValidationError,
            Self::Repository(TaskRepositoryError::NotFound(_)) | Self::NotFound(_) => {
                TaskErrorKind::NotFound
            }
            Self::Repository(_) => TaskErrorKind::StoreFailure,
            Self::Identity(
                IdentityError::MissingCredential | IdentityError::InvalidCredential,
            ) => TaskErrorKind::Forbidden,
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;
