//! Application services for task lifecycle orchestration and listing.

mod error;
mod lifecycle;
mod query;

pub use error::{TaskErrorKind, TaskServiceError, TaskServiceResult};
pub use lifecycle::{CreateTaskRequest, DelayTaskRequest, EditTaskRequest, TaskLifecycleService};
pub use query::{ListTasksRequest, TaskPage, TaskQueryConfig, TaskQueryService};
