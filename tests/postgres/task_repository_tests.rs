//! `PostgreSQL` repository tests for task persistence and listings.

use super::helpers::{repository, unique_owner};
use chrono::{Duration, Utc};
use eyre::ensure;
use followup::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{OwnerId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
    services::{
        CreateTaskRequest, DelayTaskRequest, EditTaskRequest, ListTasksRequest,
        TaskLifecycleService, TaskQueryService,
    },
};
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;

type Lifecycle = TaskLifecycleService<PostgresTaskRepository, DefaultClock>;
type Queries = TaskQueryService<PostgresTaskRepository, DefaultClock>;

fn in_days(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn services(
    repository: PostgresTaskRepository,
) -> (Lifecycle, Queries, Arc<PostgresTaskRepository>) {
    let repo = Arc::new(repository);
    let clock = Arc::new(DefaultClock);
    (
        TaskLifecycleService::new(Arc::clone(&repo), Arc::clone(&clock)),
        TaskQueryService::new(Arc::clone(&repo), clock),
        repo,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires PostgreSQL at FOLLOWUP_TEST_DATABASE_URL"]
async fn task_and_delays_round_trip_through_postgres(
    repository: eyre::Result<PostgresTaskRepository>,
) -> eyre::Result<()> {
    let (lifecycle, _, _) = services(repository?);
    let owner = unique_owner()?;

    let created = lifecycle
        .create(
            &owner,
            CreateTaskRequest::new("Persisted", "in postgres", in_days(1)),
        )
        .await?;
    lifecycle
        .edit(
            &owner,
            EditTaskRequest::new(created.id(), "Persisted task", "still in postgres"),
        )
        .await?;
    lifecycle
        .delay(
            &owner,
            DelayTaskRequest::new(created.id(), "First slip", in_days(3)),
        )
        .await?;
    let delayed = lifecycle
        .delay(
            &owner,
            DelayTaskRequest::new(created.id(), "Second slip", in_days(5)),
        )
        .await?;

    let loaded = lifecycle.get(&owner, created.id()).await?;
    ensure!(loaded.title().as_str() == "Persisted task");
    ensure!(loaded.status() == TaskStatus::Delayed);
    let summary = |task: &followup::task::domain::Task| {
        task.delays()
            .iter()
            .map(|entry| {
                (
                    entry.id(),
                    entry.reason().as_str().to_owned(),
                    entry.old_date(),
                    entry.new_date(),
                )
            })
            .collect::<Vec<_>>()
    };
    ensure!(summary(&loaded) == summary(&delayed));
    ensure!(loaded.revision() == delayed.revision());
    ensure!(loaded.updated_at() == delayed.updated_at());
    ensure!(loaded.created_at() == created.created_at());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires PostgreSQL at FOLLOWUP_TEST_DATABASE_URL"]
async fn other_owner_cannot_load_or_delete(
    repository: eyre::Result<PostgresTaskRepository>,
) -> eyre::Result<()> {
    let owner = unique_owner()?;
    let stranger = OwnerId::new("pg-stranger")?;
    let (lifecycle, _, repo) = services(repository?);
    let created = lifecycle
        .create(&owner, CreateTaskRequest::new("Mine", "only", in_days(2)))
        .await?;

    ensure!(repo.find_by_id(created.id(), &stranger).await?.is_none());
    ensure!(!repo.delete(created.id(), &stranger).await?);
    ensure!(repo.find_by_id(created.id(), &owner).await?.is_some());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires PostgreSQL at FOLLOWUP_TEST_DATABASE_URL"]
async fn stale_revision_is_a_conflict(
    repository: eyre::Result<PostgresTaskRepository>,
) -> eyre::Result<()> {
    let owner = unique_owner()?;
    let (lifecycle, _, repo) = services(repository?);
    let created = lifecycle
        .create(&owner, CreateTaskRequest::new("Raced", "twice", in_days(2)))
        .await?;
    lifecycle.complete(&owner, created.id()).await?;

    let result = repo.update(&created, created.revision()).await;

    ensure!(
        matches!(
            result,
            Err(TaskRepositoryError::Conflict { task_id, .. }) if task_id == created.id()
        ),
        "expected conflict, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires PostgreSQL at FOLLOWUP_TEST_DATABASE_URL"]
async fn delete_cascades_delay_history(
    repository: eyre::Result<PostgresTaskRepository>,
) -> eyre::Result<()> {
    let owner = unique_owner()?;
    let (lifecycle, _, repo) = services(repository?);
    let created = lifecycle
        .create(&owner, CreateTaskRequest::new("Gone", "soon", in_days(1)))
        .await?;
    lifecycle
        .delay(
            &owner,
            DelayTaskRequest::new(created.id(), "Hold", in_days(4)),
        )
        .await?;

    ensure!(repo.delete(created.id(), &owner).await?);
    ensure!(repo.find_by_id(created.id(), &owner).await?.is_none());
    ensure!(!repo.delete(created.id(), &owner).await?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires PostgreSQL at FOLLOWUP_TEST_DATABASE_URL"]
async fn listing_filters_and_paginates_in_sql(
    repository: eyre::Result<PostgresTaskRepository>,
) -> eyre::Result<()> {
    let owner = unique_owner()?;
    let (lifecycle, queries, _) = services(repository?);
    for n in 0..12 {
        lifecycle
            .create(
                &owner,
                CreateTaskRequest::new(format!("Report 100% #{n}"), "sql", in_days(1)),
            )
            .await?;
    }
    let other = lifecycle
        .create(&owner, CreateTaskRequest::new("Unrelated", "x_y", in_days(1)))
        .await?;
    lifecycle
        .delay(
            &owner,
            DelayTaskRequest::new(other.id(), "Later", in_days(2)),
        )
        .await?;

    let page = queries
        .list(
            &owner,
            ListTasksRequest::new()
                .with_search("100%")
                .with_limit(5)
                .with_page(3),
        )
        .await?;
    ensure!(page.meta.total == 12);
    ensure!(page.meta.total_pages == 3);
    ensure!(page.items.len() == 2);

    let first_page = queries
        .list(&owner, ListTasksRequest::new().with_limit(100))
        .await?;
    let created_order: Vec<_> = first_page
        .items
        .iter()
        .map(|item| (item.task.created_at(), item.task.id()))
        .collect();
    let mut sorted = created_order.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    ensure!(created_order == sorted, "newest first, ties by id");

    let delayed = queries
        .list(
            &owner,
            ListTasksRequest::new().with_status(TaskStatus::Delayed),
        )
        .await?;
    ensure!(delayed.meta.total == 1);

    let underscores = queries
        .list(&owner, ListTasksRequest::new().with_search("x_y"))
        .await?;
    ensure!(underscores.meta.total == 1);

    let overdue = queries
        .list(&owner, ListTasksRequest::new().overdue_only())
        .await?;
    ensure!(overdue.meta.total == 0);
    Ok(())
}
