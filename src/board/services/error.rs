//! Service-level errors for timer and board operations.

use crate::board::{
    domain::{BoardDomainError, ParseTaskStatusError, ProjectId, TaskId, TaskStatus},
    ports::{ProjectRepositoryError, TaskRepositoryError},
};
use thiserror::Error;

/// Errors returned by [`super::TimerService`] and [`super::BoardService`].
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// Domain validation or column planning failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// A status string was not recognised.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// Task repository operation failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),

    /// Project repository operation failed.
    #[error(transparent)]
    ProjectRepository(#[from] ProjectRepositoryError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Caller-facing classification of a [`BoardServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardErrorKind {
    /// Task or project missing.
    NotFound,
    /// Malformed request.
    InvalidInput,
    /// Concurrent writers won, or the caller's column view is stale.
    ConflictOnWrite,
    /// Store failure.
    Persistence,
}

impl BoardServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> BoardErrorKind {
        match self {
            Self::Domain(err) if err.is_stale_column() => BoardErrorKind::ConflictOnWrite,
            Self::Domain(BoardDomainError::ColumnFull { .. })
            | Self::TaskRepository(
                TaskRepositoryError::VersionConflict { .. }
                | TaskRepositoryError::OrderCollision(_)
                | TaskRepositoryError::DuplicateTask(_),
            )
            | Self::ProjectRepository(ProjectRepositoryError::DuplicateProject(_)) => {
                BoardErrorKind::ConflictOnWrite
            }
            Self::Domain(_) | Self::InvalidStatus(_) => BoardErrorKind::InvalidInput,
            Self::TaskNotFound(_)
            | Self::ProjectNotFound(_)
            | Self::TaskRepository(TaskRepositoryError::NotFound(_))
            | Self::ProjectRepository(ProjectRepositoryError::NotFound(_)) => {
                BoardErrorKind::NotFound
            }
            Self::TaskRepository(_) | Self::ProjectRepository(_) => BoardErrorKind::Persistence,
        }
    }

    /// Returns the column the failure refers to, if any.
    #[must_use]
    pub const fn column(&self) -> Option<TaskStatus> {
        match self {
            Self::Domain(err) => err.column(),
            _ => None,
        }
    }

    /// Returns `true` when re-running the operation against fresh state may
    /// succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TaskRepository(err) if err.is_conflict())
    }
}
