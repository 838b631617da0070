//! Overdue filtering in SQL, checked against the in-memory repository.

use super::helpers::{repository, unique_owner};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use eyre::{OptionExt, ensure};
use followup::task::{
    adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
    domain::{
        FeedbackDate, OverdueCutoff, OwnerId, Pagination, PersistedTaskData, Revision, Task,
        TaskDescription, TaskId, TaskQuery, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskSlice},
};
use rstest::rstest;

fn today() -> eyre::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 5, 12).ok_or_eyre("valid calendar date")
}

fn seeded(owner: &OwnerId, title: &str, status: TaskStatus, days: i64) -> eyre::Result<Task> {
    let created_at = Utc
        .with_ymd_and_hms(2025, 5, 1, 9, 0, 0)
        .single()
        .ok_or_eyre("valid timestamp")?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        owner: owner.clone(),
        title: TaskTitle::new(title)?,
        description: TaskDescription::new("seeded directly")?,
        status,
        feedback_date: FeedbackDate::from_date(today()? + Duration::days(days)),
        delays: Vec::new(),
        revision: Revision::INITIAL,
        created_at,
        updated_at: created_at,
    }))
}

fn overdue_query() -> eyre::Result<TaskQuery> {
    let mut query = TaskQuery::new(Pagination::new(1, 100, 100)?);
    query.overdue = Some(OverdueCutoff::on(today()?));
    Ok(query)
}

fn ids(slice: &TaskSlice) -> Vec<TaskId> {
    slice.items.iter().map(Task::id).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires PostgreSQL at FOLLOWUP_TEST_DATABASE_URL"]
async fn sql_overdue_filter_matches_in_memory(
    repository: eyre::Result<PostgresTaskRepository>,
) -> eyre::Result<()> {
    let postgres = repository?;
    let memory = InMemoryTaskRepository::new();
    let owner = unique_owner()?;
    let late = seeded(&owner, "Ongoing, three days late", TaskStatus::Ongoing, -3)?;
    let delayed = seeded(&owner, "Delayed, one day late", TaskStatus::Delayed, -1)?;
    let tasks = [
        late.clone(),
        seeded(&owner, "Completed, three days late", TaskStatus::Completed, -3)?,
        delayed.clone(),
        seeded(&owner, "Ongoing, due today", TaskStatus::Ongoing, 0)?,
        seeded(&owner, "Ongoing, due later", TaskStatus::Ongoing, 2)?,
    ];
    for task in &tasks {
        postgres.store(task).await?;
        memory.store(task).await?;
    }

    let query = overdue_query()?;
    let from_sql = postgres.query(&owner, &query).await?;
    let from_memory = memory.query(&owner, &query).await?;

    ensure!(
        from_sql.total == 2,
        "expected two overdue tasks, got {}",
        from_sql.total
    );
    ensure!(from_memory.total == from_sql.total);
    let mut expected = vec![late.id(), delayed.id()];
    expected.sort_by(|a, b| b.cmp(a));
    ensure!(ids(&from_sql) == expected, "equal created_at falls back to id desc");
    ensure!(ids(&from_memory) == ids(&from_sql));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires PostgreSQL at FOLLOWUP_TEST_DATABASE_URL"]
async fn sql_overdue_filter_combines_with_status(
    repository: eyre::Result<PostgresTaskRepository>,
) -> eyre::Result<()> {
    let postgres = repository?;
    let owner = unique_owner()?;
    let late = seeded(&owner, "Late and delayed", TaskStatus::Delayed, -5)?;
    postgres.store(&late).await?;
    postgres
        .store(&seeded(&owner, "Late and ongoing", TaskStatus::Ongoing, -5)?)
        .await?;

    let mut query = overdue_query()?;
    query.status = Some(TaskStatus::Delayed);
    let slice = postgres.query(&owner, &query).await?;

    ensure!(slice.total == 1);
    ensure!(ids(&slice) == vec![late.id()]);
    Ok(())
}
