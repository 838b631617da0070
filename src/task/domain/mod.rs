//! Domain model for task lifecycle management.
//!
//! The task domain models creation, editing, postponement and completion of
//! tasks, the overdue rule and the query criteria for listings, while
//! keeping all infrastructure concerns outside of the domain boundary.

mod delay;
mod error;
mod feedback_date;
mod ids;
mod overdue;
mod query;
mod status;
mod task;
mod text;

pub use delay::{DelayEntry, PersistedDelayData};
pub use error::{ParseTaskStatusError, TaskDomainError, TaskOperation};
pub use feedback_date::FeedbackDate;
pub use ids::{DelayId, OwnerId, Revision, TaskId};
pub use overdue::{EvaluatedTask, OverdueCutoff, is_overdue};
pub use query::{PageMeta, Pagination, SearchTerm, TaskQuery};
pub use status::TaskStatus;
pub use task::{Completion, PersistedTaskData, Task, TaskDraft};
pub use text::{DelayReason, TaskDescription, TaskTitle};
