//! Start/stop orchestration for shared task timers.

use super::{BoardConfig, BoardServiceError, BoardServiceResult, retry::with_write_retry};
use crate::board::{
    domain::{Board, Task, TaskId, TaskStatus, TaskView, TaskWrite, TimerStart, TimerStop, UserId},
    ports::TaskRepository,
};
use mockable::Clock;
use std::sync::Arc;

/// Shared-timer orchestration service.
///
/// Each operation loads fresh state, applies the first-in/last-out rule and
/// commits one version-guarded write. Conflicts are retried with newly loaded
/// state, so the first/last-participant decision is always made against the
/// record that is actually written.
#[derive(Clone)]
pub struct TimerService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: BoardConfig,
}

impl<R, C> TimerService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a timer service with the default configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            config: BoardConfig::default(),
        }
    }

    /// Replaces the service configuration.
    #[must_use]
    pub const fn with_config(mut self, config: BoardConfig) -> Self {
        self.config = config;
        self
    }

    /// Marks `user_id` as working on the task.
    ///
    /// The first participant opens the shared interval. Starting a `todo`
    /// task promotes it to the end of the `in_progress` column in the same
    /// write. Starting twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::TaskNotFound`] when the task does not
    /// exist, or a conflict once the write attempt budget is spent.
    pub async fn start(&self, task_id: TaskId, user_id: &UserId) -> BoardServiceResult<TaskView> {
        with_write_retry("timer.start", self.config.attempts(), || {
            self.try_start(task_id, user_id)
        })
        .await
    }

    /// Removes `user_id` from the task's active participants.
    ///
    /// The last participant to leave closes the interval and banks its
    /// duration. Stopping a user who is not active is a no-op. The status is
    /// never changed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::TaskNotFound`] when the task does not
    /// exist, or a conflict once the write attempt budget is spent.
    pub async fn stop(&self, task_id: TaskId, user_id: &UserId) -> BoardServiceResult<TaskView> {
        with_write_retry("timer.stop", self.config.attempts(), || {
            self.try_stop(task_id, user_id)
        })
        .await
    }

    /// Returns the task's displayed elapsed time at the service clock's now.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn elapsed(&self, task_id: TaskId) -> BoardServiceResult<u64> {
        let task = self.load(task_id).await?;
        Ok(task.timer().displayed_ms(self.clock.utc()))
    }

    async fn try_start(&self, task_id: TaskId, user_id: &UserId) -> BoardServiceResult<TaskView> {
        let mut task = self.load(task_id).await?;
        let outcome = task.start_timer(user_id.clone(), &*self.clock);
        if !outcome.changed() {
            return Ok(TaskView::from(&task));
        }

        let committed = if outcome.promotes {
            self.commit_promotion(task).await?
        } else {
            self.commit_single(task).await?
        };

        match outcome.timer {
            TimerStart::Opened => {
                tracing::info!(task_id = %task_id, user_id = %user_id, "shared interval opened");
            }
            TimerStart::Joined => {
                tracing::debug!(task_id = %task_id, user_id = %user_id, "user joined running timer");
            }
            TimerStart::AlreadyActive => {}
        }
        if outcome.promotes {
            tracing::info!(
                task_id = %task_id,
                order = committed.order(),
                "task promoted to in_progress"
            );
        }
        Ok(TaskView::from(&committed))
    }

    async fn try_stop(&self, task_id: TaskId, user_id: &UserId) -> BoardServiceResult<TaskView> {
        let mut task = self.load(task_id).await?;
        let outcome = task.stop_timer(user_id, &*self.clock);
        match outcome {
            TimerStop::NotActive => Ok(TaskView::from(&task)),
            TimerStop::Left => {
                let committed = self.commit_single(task).await?;
                tracing::debug!(task_id = %task_id, user_id = %user_id, "user left running timer");
                Ok(TaskView::from(&committed))
            }
            TimerStop::Closed { elapsed_ms } => {
                let committed = self.commit_single(task).await?;
                tracing::info!(
                    task_id = %task_id,
                    user_id = %user_id,
                    elapsed_ms,
                    accumulated_ms = committed.timer().accumulated_ms(),
                    "shared interval closed"
                );
                Ok(TaskView::from(&committed))
            }
        }
    }

    async fn load(&self, task_id: TaskId) -> BoardServiceResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(BoardServiceError::TaskNotFound(task_id))
    }

    async fn commit_single(&self, task: Task) -> BoardServiceResult<Task> {
        let write = TaskWrite::new(task);
        self.repository.commit(std::slice::from_ref(&write)).await?;
        Ok(write.into_task())
    }

    /// Moves a started `todo` task to the end of `in_progress` and closes
    /// the gap it leaves, in one commit.
    async fn commit_promotion(&self, task: Task) -> BoardServiceResult<Task> {
        let task_id = task.id();
        let board = Board::new(self.repository.find_by_project(task.project_id()).await?);
        let plan = board.plan_move_to_end(task, TaskStatus::InProgress, &*self.clock)?;
        self.repository.commit(plan.writes()).await?;
        plan.task(task_id)
            .cloned()
            .ok_or(BoardServiceError::TaskNotFound(task_id))
    }
}
