//! Error types for task domain validation, parsing, and transitions.

use super::{TaskId, TaskStatus};
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Lifecycle operation named in transition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskOperation {
    /// Postponing the feedback date.
    Delay,
}

impl TaskOperation {
    /// Returns the operation name used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delay => "delay",
        }
    }
}

impl fmt::Display for TaskOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The owner identifier is empty after trimming.
    #[error("owner identifier must not be empty")]
    EmptyOwner,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The delay reason is empty after trimming.
    #[error("delay reason must not be empty")]
    EmptyDelayReason,

    /// The feedback date could not be parsed.
    #[error("invalid feedback date '{0}', expected YYYY-MM-DD")]
    InvalidFeedbackDate(String),

    /// A new task was given a feedback date before today.
    #[error("feedback date {date} is in the past (today is {today})")]
    FeedbackDateInPast {
        /// Requested feedback date.
        date: NaiveDate,
        /// Calendar date the request was evaluated against.
        today: NaiveDate,
    },

    /// A delay did not push the feedback date forward.
    #[error("task {task_id}: new feedback date {requested} must be after {current}")]
    DelayDateNotLater {
        /// Task being delayed.
        task_id: TaskId,
        /// Feedback date before the delay.
        current: NaiveDate,
        /// Rejected replacement date.
        requested: NaiveDate,
    },

    /// The operation is not permitted in the task's current status.
    #[error("cannot {operation} task {task_id} while it is {status}")]
    InvalidTransition {
        /// Task the operation targeted.
        task_id: TaskId,
        /// Status the task was in.
        status: TaskStatus,
        /// Rejected operation.
        operation: TaskOperation,
    },

    /// The requested page number is not 1 or greater.
    #[error("invalid page {0}, pages are numbered from 1")]
    InvalidPage(u32),

    /// The requested page size is zero or above the configured maximum.
    #[error("invalid page size {limit}, expected 1..={max}")]
    InvalidLimit {
        /// Requested page size.
        limit: u32,
        /// Largest permitted page size.
        max: u32,
    },

    /// The list filter keyword is not recognised.
    #[error("unknown list filter '{0}'")]
    UnknownListFilter(String),

    /// A status value supplied by the caller is not recognised.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
}

/// Error returned while parsing task statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
