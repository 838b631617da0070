//! Service layer for filtered, paginated task listings.

use super::TaskServiceResult;
use crate::task::{
    domain::{
        EvaluatedTask, OverdueCutoff, OwnerId, PageMeta, Pagination, SearchTerm, TaskQuery,
        TaskStatus,
    },
    ports::TaskRepository,
};
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Paging limits applied to task listings.
///
/// # Examples
///
/// ```
/// use followup::task::services::TaskQueryConfig;
///
/// let config = TaskQueryConfig::default();
/// assert_eq!(config.default_limit, 10);
/// assert_eq!(config.max_limit, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskQueryConfig {
    /// Page size used when the caller does not supply one.
    pub default_limit: u32,
    /// Largest page size a caller may request.
    pub max_limit: u32,
}

impl Default for TaskQueryConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl TaskQueryConfig {
    /// Creates a configuration with small pages for constrained clients.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            default_limit: 10,
            max_limit: 25,
        }
    }
}

/// Request payload for listing tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTasksRequest {
    search: Option<String>,
    status: Option<TaskStatus>,
    overdue_only: bool,
    page: Option<u32>,
    limit: Option<u32>,
}

impl ListTasksRequest {
    /// Creates a request for the first page with no filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to tasks whose title or description contains
    /// `search`, ignoring case. Blank text matches everything.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Restricts results to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts results to tasks that are overdue now.
    #[must_use]
    pub const fn overdue_only(mut self) -> Self {
        self.overdue_only = true;
        self
    }

    /// Selects the 1-indexed page.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One page of tasks with overdue indicators and pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    /// Tasks on the page, newest first.
    pub items: Vec<EvaluatedTask>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Task listing service.
pub struct TaskQueryService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: TaskQueryConfig,
}

impl<R, C> Clone for TaskQueryService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self::with_config(
            Arc::clone(&self.repository),
            Arc::clone(&self.clock),
            self.config,
        )
    }
}

impl<R, C> TaskQueryService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a listing service with default paging limits.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self::with_config(repository, clock, TaskQueryConfig::default())
    }

    /// Creates a listing service with explicit paging limits.
    #[must_use]
    pub const fn with_config(repository: Arc<R>, clock: Arc<C>, config: TaskQueryConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Returns the paging limits in force.
    #[must_use]
    pub const fn config(&self) -> TaskQueryConfig {
        self.config
    }

    /// Lists the owner's tasks matching every supplied filter.
    ///
    /// Overdue status is evaluated once per call against the current
    /// calendar day and used both for the filter and for each item's
    /// indicator. A page past the last one yields no items but accurate
    /// metadata.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Domain`] when the page or limit is
    /// out of range, or [`super::TaskServiceError::Repository`] when the
    /// store query fails.
    pub async fn list(
        &self,
        owner: &OwnerId,
        request: ListTasksRequest,
    ) -> TaskServiceResult<TaskPage> {
        let pagination = Pagination::new(
            request.page.unwrap_or(1),
            request.limit.unwrap_or(self.config.default_limit),
            self.config.max_limit,
        )?;
        let cutoff = OverdueCutoff::at(self.clock.utc());
        let query = TaskQuery {
            search: request.search.as_deref().and_then(SearchTerm::new),
            status: request.status,
            overdue: request.overdue_only.then_some(cutoff),
            pagination,
        };

        let slice = self
            .repository
            .query(owner, &query)
            .await
            .inspect_err(|err| warn!(owner = %owner, error = %err, "task query failed"))?;
        let meta = PageMeta::new(slice.total, pagination);

        debug!(
            owner = %owner,
            total = meta.total,
            page = meta.page,
            returned = slice.items.len(),
            "tasks listed"
        );
        Ok(TaskPage {
            items: slice
                .items
                .into_iter()
                .map(|task| cutoff.evaluate(task))
                .collect(),
            meta,
        })
    }
}
