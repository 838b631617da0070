//! Diesel row models for task persistence.

use super::schema::{task_delays, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result and insert row for task records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning caller identity.
    pub owner_id: String,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Current feedback date.
    pub feedback_date: NaiveDate,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Mutable columns written by task updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Current feedback date.
    pub feedback_date: NaiveDate,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result and insert row for delay history entries.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_delays)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DelayRow {
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Ordinal within the task.
    pub id: i32,
    /// Recorded reason.
    pub reason: String,
    /// Feedback date before the delay.
    pub old_date: NaiveDate,
    /// Feedback date after the delay.
    pub new_date: NaiveDate,
    /// Time the delay was recorded.
    pub created_at: DateTime<Utc>,
}
