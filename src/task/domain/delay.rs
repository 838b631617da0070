//! Delay history entries.

use super::{DelayId, DelayReason, FeedbackDate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One postponement of a task's feedback date.
///
/// Entries are append-only; `new_date` is always strictly later than
/// `old_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayEntry {
    id: DelayId,
    reason: DelayReason,
    old_date: FeedbackDate,
    new_date: FeedbackDate,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted delay entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDelayData {
    /// Ordinal within the owning task.
    pub id: DelayId,
    /// Recorded reason.
    pub reason: DelayReason,
    /// Feedback date before the delay.
    pub old_date: FeedbackDate,
    /// Feedback date after the delay.
    pub new_date: FeedbackDate,
    /// Time the delay was recorded.
    pub created_at: DateTime<Utc>,
}

impl DelayEntry {
    pub(super) const fn record(
        id: DelayId,
        reason: DelayReason,
        old_date: FeedbackDate,
        new_date: FeedbackDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            reason,
            old_date,
            new_date,
            created_at,
        }
    }

    /// Reconstructs a delay entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDelayData) -> Self {
        Self {
            id: data.id,
            reason: data.reason,
            old_date: data.old_date,
            new_date: data.new_date,
            created_at: data.created_at,
        }
    }

    /// Returns the ordinal within the owning task.
    #[must_use]
    pub const fn id(&self) -> DelayId {
        self.id
    }

    /// Returns the recorded reason.
    #[must_use]
    pub const fn reason(&self) -> &DelayReason {
        &self.reason
    }

    /// Returns the feedback date before the delay.
    #[must_use]
    pub const fn old_date(&self) -> FeedbackDate {
        self.old_date
    }

    /// Returns the feedback date after the delay.
    #[must_use]
    pub const fn new_date(&self) -> FeedbackDate {
        self.new_date
    }

    /// Returns the time the delay was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
