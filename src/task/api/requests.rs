//! Typed request bodies accepted at the service boundary.
//!
//! Missing fields deserialise as empty so that they surface as validation
//! errors from the engine rather than as decoding failures.

use crate::task::{
    domain::{TaskDomainError, TaskStatus},
    services::ListTasksRequest,
};
use serde::Deserialize;

/// Body of a create-task call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateTaskBody {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Feedback date, `YYYY-MM-DD` or RFC 3339.
    pub feedback_date: String,
}

/// Body of an update-task call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpdateTaskBody {
    /// Replacement title.
    pub title: String,
    /// Replacement description.
    pub description: String,
}

/// Body of a delay-task call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DelayTaskBody {
    /// Why the task is being postponed.
    pub reason: String,
    /// Replacement feedback date.
    #[serde(rename = "newDate", alias = "new_date")]
    pub new_date: String,
}

/// Query parameters of a list-tasks call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListTasksParams {
    /// 1-indexed page; defaults to 1.
    pub page: Option<u32>,
    /// Page size; defaults to the configured page size.
    pub limit: Option<u32>,
    /// Case-insensitive text matched against title and description.
    pub search: String,
    /// Status name, or empty for every status.
    pub status: String,
    /// `overdue` to list only overdue tasks, or empty.
    pub filter: String,
}

const OVERDUE_FILTER: &str = "overdue";

impl ListTasksParams {
    /// Converts the raw parameters into a listing request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatus`] for an unknown status
    /// name, or [`TaskDomainError::UnknownListFilter`] for a filter other
    /// than `overdue`.
    pub fn into_request(self) -> Result<ListTasksRequest, TaskDomainError> {
        let mut request = ListTasksRequest::new().with_search(self.search);

        let status = self.status.trim();
        if !status.is_empty() {
            request = request.with_status(TaskStatus::try_from(status)?);
        }

        let filter = self.filter.trim();
        if filter.eq_ignore_ascii_case(OVERDUE_FILTER) {
            request = request.overdue_only();
        } else if !filter.is_empty() {
            return Err(TaskDomainError::UnknownListFilter(self.filter));
        }

        if let Some(page) = self.page {
            request = request.with_page(page);
        }
        if let Some(limit) = self.limit {
            request = request.with_limit(limit);
        }
        Ok(request)
    }
}
