//! Task aggregate root, creation drafts, and version-guarded writes.

use super::{
    BoardDomainError, ProjectId, TaskId, TaskStatus, TaskTimer, TaskVersion, TimerStart,
    TimerStop, UserId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    project_id: ProjectId,
    title: String,
    description: String,
    assignee_user_ids: Vec<UserId>,
}

impl TaskDraft {
    /// Creates a draft with a trimmed, length-checked title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the trimmed title is
    /// empty or [`BoardDomainError::TitleTooLong`] when it exceeds
    /// `max_title_length` characters.
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        max_title_length: usize,
    ) -> Result<Self, BoardDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyTitle);
        }
        let length = trimmed.chars().count();
        if length > max_title_length {
            return Err(BoardDomainError::TitleTooLong {
                length,
                max: max_title_length,
            });
        }

        Ok(Self {
            project_id,
            title: trimmed.to_owned(),
            description: String::new(),
            assignee_user_ids: Vec::new(),
        })
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into().trim().to_owned();
        self
    }

    /// Sets the assigned users, dropping duplicates.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = UserId>) -> Self {
        self.assignee_user_ids.clear();
        for assignee in assignees {
            if !self.assignee_user_ids.contains(&assignee) {
                self.assignee_user_ids.push(assignee);
            }
        }
        self
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

/// Result of a user starting work on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartOutcome {
    /// What happened to the shared interval.
    pub timer: TimerStart,
    /// Whether the task was in `todo` and must be promoted to `in_progress`.
    pub promotes: bool,
}

impl StartOutcome {
    /// Returns `true` when the start requires a write.
    #[must_use]
    pub const fn changed(self) -> bool {
        self.promotes || !matches!(self.timer, TimerStart::AlreadyActive)
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: String,
    description: String,
    assignee_user_ids: Vec<UserId>,
    status: TaskStatus,
    order: u32,
    timer: TaskTimer,
    version: TaskVersion,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted assignees.
    pub assignee_user_ids: Vec<UserId>,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Persisted position within the status column.
    pub order: u32,
    /// Persisted shared timer.
    pub timer: TaskTimer,
    /// Persisted revision.
    pub version: TaskVersion,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a `todo` task at the given position of the `todo` column.
    #[must_use]
    pub fn create(draft: TaskDraft, order: u32, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            project_id: draft.project_id,
            title: draft.title,
            description: draft.description,
            assignee_user_ids: draft.assignee_user_ids,
            status: TaskStatus::Todo,
            order,
            timer: TaskTimer::new(),
            version: TaskVersion::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            assignee_user_ids: data.assignee_user_ids,
            status: data.status,
            order: data.order,
            timer: data.timer,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the assigned users.
    #[must_use]
    pub fn assignee_user_ids(&self) -> &[UserId] {
        &self.assignee_user_ids
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the position within the status column.
    #[must_use]
    pub const fn order(&self) -> u32 {
        self.order
    }

    /// Returns the shared timer.
    #[must_use]
    pub const fn timer(&self) -> &TaskTimer {
        &self.timer
    }

    /// Returns the stored revision.
    #[must_use]
    pub const fn version(&self) -> TaskVersion {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks `user_id` as working the task.
    ///
    /// Opens the shared interval when the user is the first participant.
    /// Starting work on a `todo` task requires promotion to `in_progress`;
    /// the caller places the task into that column.
    pub fn start_timer(&mut self, user_id: UserId, clock: &impl Clock) -> StartOutcome {
        let now = clock.utc();
        let timer = self.timer.start(user_id, now);
        let outcome = StartOutcome {
            timer,
            promotes: self.status == TaskStatus::Todo,
        };
        if outcome.changed() {
            self.updated_at = now;
        }
        outcome
    }

    /// Removes `user_id` from the active participants.
    ///
    /// Banks the interval when the last participant leaves. Never changes the
    /// status.
    pub fn stop_timer(&mut self, user_id: &UserId, clock: &impl Clock) -> TimerStop {
        let now = clock.utc();
        let outcome = self.timer.stop(user_id, now);
        if outcome != TimerStop::NotActive {
            self.updated_at = now;
        }
        outcome
    }

    /// Assigns the task to a column position.
    pub(crate) fn place(&mut self, status: TaskStatus, order: u32, clock: &impl Clock) {
        if self.status == status && self.order == order {
            return;
        }
        self.status = status;
        self.order = order;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// A task write guarded by the revision it was derived from.
///
/// The carried task already holds the next revision; stores apply it only
/// while the record still has [`TaskWrite::expected_version`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskWrite {
    expected_version: TaskVersion,
    task: Task,
}

impl TaskWrite {
    /// Prepares a write of a task modified from its loaded revision.
    #[must_use]
    pub fn new(mut task: Task) -> Self {
        let expected_version = task.version;
        task.version = expected_version.next();
        Self {
            expected_version,
            task,
        }
    }

    /// Returns the revision the stored record must still have.
    #[must_use]
    pub const fn expected_version(&self) -> TaskVersion {
        self.expected_version
    }

    /// Returns the task state to store.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Consumes the write and returns the task state to store.
    #[must_use]
    pub fn into_task(self) -> Task {
        self.task
    }
}
