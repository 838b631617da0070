//! Shared test helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use followup::task::{
    adapters::postgres::{PostgresTaskRepository, TaskPgPool},
    domain::OwnerId,
};
use rstest::fixture;
use std::env;
use std::sync::OnceLock;
use uuid::Uuid;

/// Environment variable naming the test database.
pub const DATABASE_URL_VAR: &str = "FOLLOWUP_TEST_DATABASE_URL";

/// SQL that drops the task schema.
pub const DROP_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-01-05-000000_create_tasks/down.sql");

/// SQL that creates the task schema.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-01-05-000000_create_tasks/up.sql");

static POOL: OnceLock<Result<TaskPgPool, String>> = OnceLock::new();

fn build_pool(url: &str) -> eyre::Result<TaskPgPool> {
    let mut conn = PgConnection::establish(url)?;
    conn.batch_execute(DROP_SCHEMA_SQL)?;
    conn.batch_execute(CREATE_SCHEMA_SQL)?;
    let pool = Pool::builder()
        .max_size(8)
        .build(ConnectionManager::<PgConnection>::new(url))?;
    Ok(pool)
}

/// Provides a repository over a freshly migrated schema.
///
/// The schema is recreated once per test binary; tests isolate themselves
/// through distinct owners.
///
/// # Errors
///
/// Returns an error if [`DATABASE_URL_VAR`] is unset or the database cannot
/// be reached or migrated.
#[fixture]
pub fn repository() -> eyre::Result<PostgresTaskRepository> {
    let url = env::var(DATABASE_URL_VAR)
        .map_err(|_| eyre::eyre!("{DATABASE_URL_VAR} must name a PostgreSQL database"))?;
    let pool = POOL
        .get_or_init(|| build_pool(&url).map_err(|err| format!("{err:#}")))
        .clone()
        .map_err(|err| eyre::eyre!(err))?;
    Ok(PostgresTaskRepository::new(pool))
}

/// Returns an owner unique to the calling test.
///
/// # Errors
///
/// Returns an error if the generated owner is rejected.
pub fn unique_owner() -> eyre::Result<OwnerId> {
    Ok(OwnerId::new(format!("pg-owner-{}", Uuid::new_v4()))?)
}
