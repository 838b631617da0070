//! Overdue evaluation.
//!
//! Overdue is derived, never stored: it is recomputed from the task's
//! status and feedback date against the current calendar day every time it
//! is needed. [`OverdueCutoff`] is the only place that rule lives; list
//! filters and per-task indicators both go through it.

use super::{FeedbackDate, Task, TaskStatus};
use chrono::{DateTime, NaiveDate, Utc};

/// Calendar day against which overdue status is judged.
///
/// Comparison happens at day granularity so that a task does not flip
/// between overdue and not overdue within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverdueCutoff {
    today: NaiveDate,
}

impl OverdueCutoff {
    /// Builds the cutoff for the UTC calendar day containing `now`.
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            today: now.date_naive(),
        }
    }

    /// Builds the cutoff for an explicit calendar day.
    #[must_use]
    pub const fn on(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Returns the calendar day of the cutoff.
    #[must_use]
    pub const fn today(self) -> NaiveDate {
        self.today
    }

    /// Returns `true` when a task with this status and feedback date is
    /// overdue: it is not completed and today is strictly after the
    /// feedback date.
    #[must_use]
    pub fn applies_to(self, status: TaskStatus, feedback_date: FeedbackDate) -> bool {
        status != TaskStatus::Completed && self.today > feedback_date.date()
    }

    /// Evaluates a task, pairing it with its overdue indicator.
    #[must_use]
    pub fn evaluate(self, task: Task) -> EvaluatedTask {
        let is_overdue = self.applies_to(task.status(), task.feedback_date());
        EvaluatedTask { task, is_overdue }
    }
}

/// Returns `true` when `task` is overdue at `now`.
#[must_use]
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    OverdueCutoff::at(now).applies_to(task.status(), task.feedback_date())
}

/// Task paired with the overdue indicator computed at response time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedTask {
    /// The task as loaded from the store.
    pub task: Task,
    /// Whether the task was overdue when evaluated.
    pub is_overdue: bool,
}
