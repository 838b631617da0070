//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod identity;
pub mod repository;

pub use identity::{BearerCredential, IdentityError, IdentityProvider, IdentityResult};
pub use repository::{
    TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskSlice, ensure_latest_delay,
};
