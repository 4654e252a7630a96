//! Error types for board domain validation and column planning.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing board values or planning column writes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task identifier is not a valid UUID.
    #[error("invalid task identifier '{0}'")]
    InvalidTaskId(String),

    /// The project identifier is not a valid UUID.
    #[error("invalid project identifier '{0}'")]
    InvalidProjectId(String),

    /// The user identifier is empty, too long, or contains whitespace.
    #[error("invalid user identifier '{0}'")]
    InvalidUserId(String),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the configured maximum.
    #[error("task title has {length} characters, maximum is {max}")]
    TitleTooLong {
        /// Length of the rejected title in characters.
        length: usize,
        /// Configured maximum length.
        max: usize,
    },

    /// The project name is outside the configured length bounds.
    #[error("project name must have {min} to {max} characters, got {length}")]
    InvalidProjectName {
        /// Length of the rejected name in characters.
        length: usize,
        /// Configured minimum length.
        min: usize,
        /// Configured maximum length.
        max: usize,
    },

    /// Persisted timer fields disagree about whether an interval is open.
    #[error(
        "inconsistent timer: {active_users} active users but open interval is {has_open_interval}"
    )]
    InconsistentTimer {
        /// Number of active users found.
        active_users: usize,
        /// Whether a start timestamp was present.
        has_open_interval: bool,
    },

    /// A column order list names the same task twice.
    #[error("task {0} appears more than once in a column order")]
    DuplicateTaskInOrder(TaskId),

    /// A column order list names a task outside the project.
    #[error("task {0} does not belong to the project")]
    UnknownTask(TaskId),

    /// The moving task is missing from the destination order or present in
    /// the source order.
    #[error("task {task_id} must appear exactly once, in the {status} column order")]
    MovingTaskMisplaced {
        /// Task being moved.
        task_id: TaskId,
        /// Destination column.
        status: TaskStatus,
    },

    /// A column order list names a task that currently sits in another
    /// column.
    #[error("task {task_id} is not in the {status} column")]
    TaskNotInColumn {
        /// Offending task.
        task_id: TaskId,
        /// Column the caller addressed.
        status: TaskStatus,
    },

    /// A column order list does not cover every current member.
    #[error("{status} column order lists {actual} tasks but the column holds {expected}")]
    IncompleteColumnOrder {
        /// Column the caller addressed.
        status: TaskStatus,
        /// Current member count.
        expected: usize,
        /// Number of ids the caller sent.
        actual: usize,
    },

    /// The caller's view of the task status is out of date.
    #[error("task {task_id} is {actual}, not {expected}")]
    StatusMismatch {
        /// Task being moved.
        task_id: TaskId,
        /// Status the caller believed the task had.
        expected: TaskStatus,
        /// Status the task actually has.
        actual: TaskStatus,
    },

    /// A column position cannot be represented.
    #[error("{status} column cannot hold more than {max} tasks")]
    ColumnFull {
        /// Column being extended.
        status: TaskStatus,
        /// Largest representable position.
        max: u32,
    },
}

impl BoardDomainError {
    /// Returns `true` when the error stems from the caller holding an outdated
    /// view of a column rather than from malformed input.
    #[must_use]
    pub const fn is_stale_column(&self) -> bool {
        matches!(
            self,
            Self::TaskNotInColumn { .. }
                | Self::IncompleteColumnOrder { .. }
                | Self::StatusMismatch { .. }
        )
    }

    /// Returns the column a planning error refers to, if any.
    #[must_use]
    pub const fn column(&self) -> Option<TaskStatus> {
        match self {
            Self::MovingTaskMisplaced { status, .. }
            | Self::TaskNotInColumn { status, .. }
            | Self::IncompleteColumnOrder { status, .. }
            | Self::ColumnFull { status, .. } => Some(*status),
            Self::StatusMismatch { expected, .. } => Some(*expected),
            _ => None,
        }
    }
}

/// Error returned while parsing task statuses from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
