//! `PostgreSQL` adapters for task lifecycle persistence.
//!
//! The schema is created by the SQL files under `migrations/`.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTaskRepository, TaskPgPool};
