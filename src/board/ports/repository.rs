//! Repository port for task persistence with version-guarded writes.

use crate::board::domain::{ProjectId, Task, TaskId, TaskVersion, TaskWrite};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Every mutation of an existing task goes through [`TaskRepository::commit`],
/// which applies a batch of [`TaskWrite`]s all-or-nothing. Implementations
/// must also keep positions unique within each `(project, status)` column.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists or [`TaskRepositoryError::OrderCollision`] when another task
    /// already holds its column position.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Applies a batch of writes as one atomic unit.
    ///
    /// Each write succeeds only if the stored record still carries the write's
    /// expected version. If any write fails, none is applied.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when a task does not exist,
    /// [`TaskRepositoryError::VersionConflict`] when a record changed since it
    /// was read, or [`TaskRepositoryError::OrderCollision`] when the batch
    /// would leave two tasks at the same column position.
    async fn commit(&self, writes: &[TaskWrite]) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task of a project, in no particular order.
    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes every task of a project and returns how many were removed.
    async fn delete_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<usize>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored record no longer has the revision the write was based on.
    #[error("task {task_id} was modified concurrently, expected {expected}")]
    VersionConflict {
        /// Task whose guard failed.
        task_id: TaskId,
        /// Revision the writer read.
        expected: TaskVersion,
    },

    /// Two tasks would share a column position.
    #[error("column position collision in project {0}")]
    OrderCollision(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` for failures caused by a concurrent writer, which a
    /// caller may retry against freshly read state.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. } | Self::OrderCollision(_))
    }
}
