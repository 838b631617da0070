//! Service boundary for task operations.
//!
//! Translates typed request bodies into engine calls and engine results into
//! serialisable responses. Transport concerns such as routing or HTTP status
//! mapping belong to the embedding application.

mod requests;
mod responses;
mod service;

pub use requests::{CreateTaskBody, DelayTaskBody, ListTasksParams, UpdateTaskBody};
pub use responses::{ApiError, DelayResponse, DeleteTaskResponse, TaskListResponse, TaskResponse};
pub use service::{ApiResult, TaskApi};
