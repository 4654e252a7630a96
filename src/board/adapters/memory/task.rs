//! In-memory task repository.
//!
//! A single `RwLock` makes each commit atomic: version checks, the column
//! uniqueness check and the writes all happen under one write guard.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use crate::board::{
    domain::{ProjectId, Task, TaskId, TaskStatus, TaskWrite},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    project_index: HashMap<ProjectId, Vec<TaskId>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(err: PoisonError<T>) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Returns the first column among `columns` where two tasks share a position,
/// reading `staged` in place of stored records.
fn find_collision(
    state: &InMemoryTaskState,
    staged: &HashMap<TaskId, Task>,
    columns: &HashSet<(ProjectId, TaskStatus)>,
) -> Option<ProjectId> {
    columns.iter().find_map(|(project_id, status)| {
        let mut positions = HashSet::new();
        let ids = state.project_index.get(project_id)?;
        let collides = ids
            .iter()
            .filter_map(|id| staged.get(id).or_else(|| state.tasks.get(id)))
            .filter(|task| task.status() == *status)
            .any(|task| !positions.insert(task.order()));
        collides.then_some(*project_id)
    })
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        let position_taken = state
            .project_index
            .get(&task.project_id())
            .into_iter()
            .flatten()
            .filter_map(|id| state.tasks.get(id))
            .any(|other| other.status() == task.status() && other.order() == task.order());
        if position_taken {
            return Err(TaskRepositoryError::OrderCollision(task.project_id()));
        }

        state
            .project_index
            .entry(task.project_id())
            .or_default()
            .push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn commit(&self, writes: &[TaskWrite]) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;

        let mut staged: HashMap<TaskId, Task> = HashMap::with_capacity(writes.len());
        let mut columns = HashSet::new();
        for write in writes {
            let task = write.task();
            let stored = state
                .tasks
                .get(&task.id())
                .ok_or(TaskRepositoryError::NotFound(task.id()))?;
            if stored.version() != write.expected_version() {
                return Err(TaskRepositoryError::VersionConflict {
                    task_id: task.id(),
                    expected: write.expected_version(),
                });
            }
            columns.insert((task.project_id(), task.status()));
            if staged.insert(task.id(), task.clone()).is_some() {
                return Err(TaskRepositoryError::DuplicateTask(task.id()));
            }
        }

        if let Some(project_id) = find_collision(&state, &staged, &columns) {
            return Err(TaskRepositoryError::OrderCollision(project_id));
        }

        state.tasks.extend(staged);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        let tasks = state
            .project_index
            .get(&project_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.tasks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(tasks)
    }

    async fn delete_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<usize> {
        let mut state = self.state.write().map_err(poisoned)?;
        let ids = state.project_index.remove(&project_id).unwrap_or_default();
        for id in &ids {
            state.tasks.remove(id);
        }
        Ok(ids.len())
    }
}
