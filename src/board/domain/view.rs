//! Caller-facing projections of tasks and boards.

use super::{ProjectId, Task, TaskId, TaskStatus, UserId, timer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Materialized task returned across the caller boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Title.
    pub title: String,
    /// Description, empty when unset.
    pub description: String,
    /// Workflow status.
    pub status: TaskStatus,
    /// Position within the status column.
    pub order: u32,
    /// Assigned users.
    pub assignee_user_ids: Vec<UserId>,
    /// Total of all closed intervals in milliseconds.
    pub accumulated_ms: u64,
    /// Users currently working the task.
    pub active_user_ids: Vec<UserId>,
    /// Start of the open interval, if any.
    pub last_start_at: Option<DateTime<Utc>>,
}

impl TaskView {
    /// Returns the elapsed time to display at the reader's `now`.
    ///
    /// Stale views are compensated for: the running part of the interval is
    /// always measured against the reader's clock.
    #[must_use]
    pub fn displayed_ms(&self, now: DateTime<Utc>) -> u64 {
        timer::displayed_ms(self.accumulated_ms, self.last_start_at, now)
    }
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        let timer = task.timer();
        Self {
            id: task.id(),
            title: task.title().to_owned(),
            description: task.description().to_owned(),
            status: task.status(),
            order: task.order(),
            assignee_user_ids: task.assignee_user_ids().to_vec(),
            accumulated_ms: timer.accumulated_ms(),
            active_user_ids: timer.active_user_ids().to_vec(),
            last_start_at: timer.last_start_at(),
        }
    }
}

/// One status column of a board snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    /// Column status.
    pub status: TaskStatus,
    /// Tasks in position order.
    pub tasks: Vec<TaskView>,
}

/// Server-authoritative board state for polling clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    /// Project the board belongs to.
    pub project_id: ProjectId,
    /// Every column in workflow order, including empty ones.
    pub columns: Vec<ColumnView>,
    /// Server clock reading when the snapshot was taken.
    pub observed_at: DateTime<Utc>,
    /// Suggested delay before the next poll, in milliseconds.
    pub poll_interval_ms: u64,
}

impl BoardSnapshot {
    /// Returns the column for a status.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> Option<&ColumnView> {
        self.columns.iter().find(|column| column.status == status)
    }
}

/// Renders a duration for the board: `"1h 5m"`, `"4m 20s"`, or `"9s"`.
///
/// Sub-second remainders are truncated.
#[must_use]
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let total_seconds = elapsed_ms.div_euclid(1000);
    let hours = total_seconds.div_euclid(3600);
    let minutes = total_seconds.rem_euclid(3600).div_euclid(60);
    let seconds = total_seconds.rem_euclid(60);

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
