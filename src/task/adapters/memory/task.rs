//! In-memory repository for task lifecycle tests and embedding.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{DelayEntry, OwnerId, Revision, Task, TaskId, TaskQuery},
    ports::{
        TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskSlice, ensure_latest_delay,
    },
};

/// Thread-safe in-memory task repository.
///
/// A single lock guards the whole map, so every write is atomic with
/// respect to readers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored tasks across all owners.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn len(&self) -> TaskRepositoryResult<usize> {
        Ok(self.read()?.tasks.len())
    }

    /// Returns `true` when no tasks are stored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn is_empty(&self) -> TaskRepositoryResult<bool> {
        Ok(self.read()?.tasks.is_empty())
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Replaces a stored task if its revision still matches `expected`.
fn replace_if_current(
    state: &mut InMemoryTaskState,
    task: &Task,
    expected: Revision,
) -> TaskRepositoryResult<()> {
    let stored = state
        .tasks
        .get_mut(&task.id())
        .ok_or(TaskRepositoryError::NotFound(task.id()))?;
    if stored.revision() != expected {
        return Err(TaskRepositoryError::Conflict {
            task_id: task.id(),
            expected,
        });
    }
    *stored = task.clone();
    Ok(())
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId, owner: &OwnerId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .get(&id)
            .filter(|task| task.owner() == owner)
            .cloned())
    }

    async fn update(&self, task: &Task, expected: Revision) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        replace_if_current(&mut state, task, expected)
    }

    async fn append_delay(
        &self,
        task: &Task,
        entry: &DelayEntry,
        expected: Revision,
    ) -> TaskRepositoryResult<()> {
        // The history travels with the task under the same lock.
        ensure_latest_delay(task, entry)?;
        let mut state = self.write()?;
        replace_if_current(&mut state, task, expected)
    }

    async fn delete(&self, id: TaskId, owner: &OwnerId) -> TaskRepositoryResult<bool> {
        let mut state = self.write()?;
        let owned = state
            .tasks
            .get(&id)
            .is_some_and(|task| task.owner() == owner);
        if owned {
            state.tasks.remove(&id);
        }
        Ok(owned)
    }

    async fn query(&self, owner: &OwnerId, query: &TaskQuery) -> TaskRepositoryResult<TaskSlice> {
        let state = self.read()?;
        let mut matching: Vec<&Task> = state
            .tasks
            .values()
            .filter(|task| task.owner() == owner && query.matches(task))
            .collect();
        matching.sort_by_key(|task| Reverse((task.created_at(), task.id())));

        let total = u64::try_from(matching.len()).map_err(TaskRepositoryError::persistence)?;
        let offset =
            usize::try_from(query.pagination.offset()).map_err(TaskRepositoryError::persistence)?;
        let limit = usize::try_from(query.pagination.limit())
            .map_err(TaskRepositoryError::persistence)?;
        let items = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(TaskSlice { items, total })
    }
}
