//! Query criteria and pagination values for task listings.

use super::{OverdueCutoff, Task, TaskDomainError, TaskStatus};
use serde::{Deserialize, Serialize};

/// Case-insensitive substring matched against title and description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Creates a search term, or `None` when the input is blank and should
    /// match everything.
    #[must_use]
    pub fn new(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            raw: trimmed.to_owned(),
            folded: trimmed.to_lowercase(),
        })
    }

    /// Returns the trimmed search text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` when the title or description contains the term,
    /// ignoring case.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        task.title().as_str().to_lowercase().contains(&self.folded)
            || task
                .description()
                .as_str()
                .to_lowercase()
                .contains(&self.folded)
    }

    /// Returns an SQL `LIKE` pattern matching the term anywhere, with
    /// wildcard characters in the term escaped.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.raw.len() + 2);
        pattern.push('%');
        for ch in self.raw.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

/// Validated 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Creates a page request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPage`] when `page` is zero, or
    /// [`TaskDomainError::InvalidLimit`] when `limit` is zero or exceeds
    /// `max_limit`.
    pub const fn new(page: u32, limit: u32, max_limit: u32) -> Result<Self, TaskDomainError> {
        if page == 0 {
            return Err(TaskDomainError::InvalidPage(page));
        }
        if limit == 0 || limit > max_limit {
            return Err(TaskDomainError::InvalidLimit {
                limit,
                max: max_limit,
            });
        }
        Ok(Self { page, limit })
    }

    /// Returns the 1-indexed page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Returns the number of matching records preceding this page.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// Conjunctive filter over one owner's tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    /// Text search; `None` matches every task.
    pub search: Option<SearchTerm>,
    /// Exact status match; `None` matches every status.
    pub status: Option<TaskStatus>,
    /// Restrict to tasks overdue at this cutoff; `None` disables the filter.
    pub overdue: Option<OverdueCutoff>,
    /// Page to return.
    pub pagination: Pagination,
}

impl TaskQuery {
    /// Creates an unfiltered query for the given page.
    #[must_use]
    pub const fn new(pagination: Pagination) -> Self {
        Self {
            search: None,
            status: None,
            overdue: None,
            pagination,
        }
    }

    /// Returns `true` when the task satisfies every active filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let search_ok = self.search.as_ref().is_none_or(|term| term.matches(task));
        let status_ok = self.status.is_none_or(|status| task.status() == status);
        let overdue_ok = self
            .overdue
            .is_none_or(|cutoff| cutoff.applies_to(task.status(), task.feedback_date()));
        search_ok && status_ok && overdue_ok
    }
}

/// Pagination metadata returned alongside a page of tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Number of tasks matching the filters across all pages.
    pub total: u64,
    /// Requested page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Number of pages; at least 1 even when nothing matches.
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl PageMeta {
    /// Derives page metadata from a match count and the page request.
    #[must_use]
    pub const fn new(total: u64, pagination: Pagination) -> Self {
        let pages = total.div_ceil(pagination.limit as u64);
        Self {
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: if pages == 0 { 1 } else { pages },
        }
    }
}
