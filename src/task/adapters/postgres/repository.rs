//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{DelayRow, TaskChangeset, TaskRow},
    schema::{task_delays, tasks},
};
use crate::task::{
    domain::{
        DelayEntry, DelayId, DelayReason, FeedbackDate, OwnerId, PersistedDelayData,
        PersistedTaskData, Revision, Task, TaskDescription, TaskId, TaskQuery, TaskStatus,
        TaskTitle,
    },
    ports::{
        TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskSlice, ensure_latest_delay,
    },
};
use async_trait::async_trait;
use diesel::PgTextExpressionMethods;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Delay history lives in `task_delays`, keyed by `(task_id, id)` and
/// removed by `ON DELETE CASCADE` when its task is deleted.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_task_row(task)?;
        let delay_rows = task
            .delays()
            .iter()
            .map(|entry| to_delay_row(task_id, entry))
            .collect::<TaskRepositoryResult<Vec<_>>>()?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|conn| {
                diesel::insert_into(tasks::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskRepositoryError::DuplicateTask(task_id)
                        }
                        _ => TaskRepositoryError::persistence(err),
                    })?;
                if !delay_rows.is_empty() {
                    diesel::insert_into(task_delays::table)
                        .values(&delay_rows)
                        .execute(conn)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId, owner: &OwnerId) -> TaskRepositoryResult<Option<Task>> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .read_only()
                .repeatable_read()
                .run::<_, TaskRepositoryError, _>(|conn| {
                    let row = tasks::table
                        .filter(tasks::id.eq(id.into_inner()))
                        .filter(tasks::owner_id.eq(owner_key.as_str()))
                        .select(TaskRow::as_select())
                        .first::<TaskRow>(conn)
                        .optional()?;
                    let Some(task_row) = row else {
                        return Ok(None);
                    };
                    let delays = task_delays::table
                        .filter(task_delays::task_id.eq(task_row.id))
                        .order(task_delays::id.asc())
                        .select(DelayRow::as_select())
                        .load::<DelayRow>(conn)?;
                    row_to_task(task_row, delays).map(Some)
                })
        })
        .await
    }

    async fn update(&self, task: &Task, expected: Revision) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task)?;
        self.run_blocking(move |connection| {
            apply_changeset(connection, task_id, expected, &changeset)
        })
        .await
    }

    async fn append_delay(
        &self,
        task: &Task,
        entry: &DelayEntry,
        expected: Revision,
    ) -> TaskRepositoryResult<()> {
        ensure_latest_delay(task, entry)?;
        let task_id = task.id();
        let changeset = to_changeset(task)?;
        let delay_row = to_delay_row(task_id, entry)?;
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|conn| {
                apply_changeset(conn, task_id, expected, &changeset)?;
                diesel::insert_into(task_delays::table)
                    .values(&delay_row)
                    .execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    async fn delete(&self, id: TaskId, owner: &OwnerId) -> TaskRepositoryResult<bool> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::owner_id.eq(owner_key.as_str())),
            )
            .execute(connection)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn query(&self, owner: &OwnerId, query: &TaskQuery) -> TaskRepositoryResult<TaskSlice> {
        let owner_key = owner.as_str().to_owned();
        let criteria = query.clone();
        let limit = i64::from(criteria.pagination.limit());
        let offset =
            i64::try_from(criteria.pagination.offset()).map_err(TaskRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .read_only()
                .repeatable_read()
                .run::<_, TaskRepositoryError, _>(|conn| {
                    let total = filtered_tasks(&owner_key, &criteria)
                        .count()
                        .get_result::<i64>(conn)?;
                    let rows = filtered_tasks(&owner_key, &criteria)
                        .order((tasks::created_at.desc(), tasks::id.desc()))
                        .limit(limit)
                        .offset(offset)
                        .select(TaskRow::as_select())
                        .load::<TaskRow>(conn)?;
                    let items = attach_delays(conn, rows)?;
                    let total = u64::try_from(total).map_err(TaskRepositoryError::persistence)?;
                    Ok(TaskSlice { items, total })
                })
        })
        .await
    }
}

/// Builds the owner-scoped, filtered task selection shared by the count and
/// page queries.
///
/// The overdue clause mirrors [`crate::task::domain::OverdueCutoff::applies_to`]:
/// not completed, and the feedback date strictly before the cutoff day.
fn filtered_tasks(owner: &str, query: &TaskQuery) -> tasks::BoxedQuery<'static, Pg> {
    let mut statement = tasks::table
        .filter(tasks::owner_id.eq(owner.to_owned()))
        .into_boxed();
    if let Some(search) = &query.search {
        let pattern = search.like_pattern();
        statement = statement.filter(
            tasks::title
                .ilike(pattern.clone())
                .or(tasks::description.ilike(pattern)),
        );
    }
    if let Some(status) = query.status {
        statement = statement.filter(tasks::status.eq(status.as_str()));
    }
    if let Some(cutoff) = query.overdue {
        statement = statement
            .filter(tasks::status.ne(TaskStatus::Completed.as_str()))
            .filter(tasks::feedback_date.lt(cutoff.today()));
    }
    statement
}

fn attach_delays(conn: &mut PgConnection, rows: Vec<TaskRow>) -> TaskRepositoryResult<Vec<Task>> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let delay_rows = task_delays::table
        .filter(task_delays::task_id.eq_any(ids))
        .order((task_delays::task_id.asc(), task_delays::id.asc()))
        .select(DelayRow::as_select())
        .load::<DelayRow>(conn)?;

    let mut by_task: HashMap<Uuid, Vec<DelayRow>> = HashMap::new();
    for delay in delay_rows {
        by_task.entry(delay.task_id).or_default().push(delay);
    }

    rows.into_iter()
        .map(|row| {
            let delays = by_task.remove(&row.id).unwrap_or_default();
            row_to_task(row, delays)
        })
        .collect()
}

/// Writes the changeset if the stored revision still equals `expected`.
fn apply_changeset(
    conn: &mut PgConnection,
    task_id: TaskId,
    expected: Revision,
    changeset: &TaskChangeset,
) -> TaskRepositoryResult<()> {
    let expected_value = revision_to_column(expected)?;
    let updated = diesel::update(
        tasks::table
            .filter(tasks::id.eq(task_id.into_inner()))
            .filter(tasks::revision.eq(expected_value)),
    )
    .set(changeset)
    .execute(conn)?;
    if updated > 0 {
        return Ok(());
    }

    let exists = diesel::select(diesel::dsl::exists(
        tasks::table.filter(tasks::id.eq(task_id.into_inner())),
    ))
    .get_result::<bool>(conn)?;
    if exists {
        Err(TaskRepositoryError::Conflict { task_id, expected })
    } else {
        Err(TaskRepositoryError::NotFound(task_id))
    }
}

fn revision_to_column(revision: Revision) -> TaskRepositoryResult<i64> {
    i64::try_from(revision.value()).map_err(TaskRepositoryError::persistence)
}

fn to_task_row(task: &Task) -> TaskRepositoryResult<TaskRow> {
    Ok(TaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner().as_str().to_owned(),
        title: task.title().as_str().to_owned(),
        description: task.description().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        feedback_date: task.feedback_date().date(),
        revision: revision_to_column(task.revision())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangeset> {
    Ok(TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        feedback_date: task.feedback_date().date(),
        revision: revision_to_column(task.revision())?,
        updated_at: task.updated_at(),
    })
}

fn to_delay_row(task_id: TaskId, entry: &DelayEntry) -> TaskRepositoryResult<DelayRow> {
    Ok(DelayRow {
        task_id: task_id.into_inner(),
        id: i32::try_from(entry.id().value()).map_err(TaskRepositoryError::persistence)?,
        reason: entry.reason().as_str().to_owned(),
        old_date: entry.old_date().date(),
        new_date: entry.new_date().date(),
        created_at: entry.created_at(),
    })
}

fn row_to_delay(row: DelayRow) -> TaskRepositoryResult<DelayEntry> {
    let DelayRow {
        task_id: _,
        id,
        reason,
        old_date,
        new_date,
        created_at,
    } = row;

    let ordinal = u32::try_from(id).map_err(TaskRepositoryError::persistence)?;
    Ok(DelayEntry::from_persisted(PersistedDelayData {
        id: DelayId::from_ordinal(ordinal),
        reason: DelayReason::new(reason).map_err(TaskRepositoryError::persistence)?,
        old_date: FeedbackDate::from_date(old_date),
        new_date: FeedbackDate::from_date(new_date),
        created_at,
    }))
}

fn row_to_task(row: TaskRow, delay_rows: Vec<DelayRow>) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_id,
        title,
        description,
        status,
        feedback_date,
        revision,
        created_at,
        updated_at,
    } = row;

    let delays = delay_rows
        .into_iter()
        .map(row_to_delay)
        .collect::<TaskRepositoryResult<Vec<_>>>()?;
    let revision = u64::try_from(revision).map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner: OwnerId::new(owner_id).map_err(TaskRepositoryError::persistence)?,
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description: TaskDescription::new(description).map_err(TaskRepositoryError::persistence)?,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
        feedback_date: FeedbackDate::from_date(feedback_date),
        delays,
        revision: Revision::new(revision),
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
