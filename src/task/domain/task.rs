//! Task aggregate root.

use super::{
    DelayEntry, DelayId, DelayReason, FeedbackDate, OverdueCutoff, OwnerId, Revision,
    TaskDescription, TaskDomainError, TaskId, TaskOperation, TaskStatus, TaskTitle,
};
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Reads the clock at the microsecond precision timestamps are stored with.
fn stamp(clock: &impl Clock) -> DateTime<Utc> {
    clock.utc().trunc_subsecs(6)
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Caller that will own the task.
    pub owner: OwnerId,
    /// Task title.
    pub title: TaskTitle,
    /// Task description.
    pub description: TaskDescription,
    /// Initial feedback date.
    pub feedback_date: FeedbackDate,
}

/// Result of asking a task to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The task moved to [`TaskStatus::Completed`].
    Completed,
    /// The task was already completed; nothing changed.
    AlreadyCompleted,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: OwnerId,
    title: TaskTitle,
    description: TaskDescription,
    status: TaskStatus,
    feedback_date: FeedbackDate,
    delays: Vec<DelayEntry>,
    revision: Revision,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner.
    pub owner: OwnerId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: TaskDescription,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted current feedback date.
    pub feedback_date: FeedbackDate,
    /// Persisted delay history in creation order.
    pub delays: Vec<DelayEntry>,
    /// Persisted write revision.
    pub revision: Revision,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `ONGOING` task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::FeedbackDateInPast`] when the feedback
    /// date precedes the clock's current UTC calendar date.
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let timestamp = stamp(clock);
        let today = timestamp.date_naive();
        if draft.feedback_date.date() < today {
            return Err(TaskDomainError::FeedbackDateInPast {
                date: draft.feedback_date.date(),
                today,
            });
        }

        Ok(Self {
            id: TaskId::new(),
            owner: draft.owner,
            title: draft.title,
            description: draft.description,
            status: TaskStatus::Ongoing,
            feedback_date: draft.feedback_date,
            delays: Vec::new(),
            revision: Revision::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            status: data.status,
            feedback_date: data.feedback_date,
            delays: data.delays,
            revision: data.revision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning caller.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the current feedback date.
    #[must_use]
    pub const fn feedback_date(&self) -> FeedbackDate {
        self.feedback_date
    }

    /// Returns the delay history in creation order.
    #[must_use]
    pub fn delays(&self) -> &[DelayEntry] {
        &self.delays
    }

    /// Returns the number of recorded delays.
    #[must_use]
    pub fn delay_count(&self) -> usize {
        self.delays.len()
    }

    /// Returns the write revision.
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the task is overdue at `now`.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        OverdueCutoff::at(now).applies_to(self.status, self.feedback_date)
    }

    /// Replaces the title and description.
    ///
    /// Permitted in every status; status, feedback date and delay history
    /// are left untouched.
    pub fn edit(&mut self, title: TaskTitle, description: TaskDescription, clock: &impl Clock) {
        self.title = title;
        self.description = description;
        self.touch(clock);
    }

    /// Postpones the feedback date and records the delay.
    ///
    /// Returns the appended history entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when the task is
    /// completed, or [`TaskDomainError::DelayDateNotLater`] when `new_date`
    /// does not fall strictly after the current feedback date. The task is
    /// unchanged on error.
    pub fn delay(
        &mut self,
        reason: DelayReason,
        new_date: FeedbackDate,
        clock: &impl Clock,
    ) -> Result<DelayEntry, TaskDomainError> {
        self.ensure_transition(TaskStatus::Delayed, TaskOperation::Delay)?;
        if new_date <= self.feedback_date {
            return Err(TaskDomainError::DelayDateNotLater {
                task_id: self.id,
                current: self.feedback_date.date(),
                requested: new_date.date(),
            });
        }

        let entry = DelayEntry::record(
            DelayId::following(self.delays.len()),
            reason,
            self.feedback_date,
            new_date,
            stamp(clock),
        );
        self.delays.push(entry.clone());
        self.feedback_date = new_date;
        self.status = TaskStatus::Delayed;
        self.touch(clock);
        Ok(entry)
    }

    /// Marks the task as completed.
    ///
    /// Completing an already completed task is a no-op that leaves
    /// `updated_at` and the revision untouched.
    pub fn complete(&mut self, clock: &impl Clock) -> Completion {
        if self.status == TaskStatus::Completed {
            return Completion::AlreadyCompleted;
        }
        self.status = TaskStatus::Completed;
        self.touch(clock);
        Completion::Completed
    }

    fn ensure_transition(
        &self,
        target: TaskStatus,
        operation: TaskOperation,
    ) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        Err(TaskDomainError::InvalidTransition {
            task_id: self.id,
            status: self.status,
            operation,
        })
    }

    /// Updates the `updated_at` timestamp and advances the revision.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = stamp(clock);
        self.revision = self.revision.next();
    }
}
