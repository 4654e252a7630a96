//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use crate::test_helpers::{ManualClock, user};
use rstest::fixture;
use taskboard::board::{
    adapters::memory::{InMemoryProjectRepository, InMemoryTaskRepository},
    domain::{ProjectId, TaskId, TaskStatus},
    services::{BoardService, CreateProjectRequest, CreateTaskRequest, TimerService},
};

/// Board service wired to in-memory stores.
pub type TestBoardService =
    BoardService<InMemoryTaskRepository, InMemoryProjectRepository, ManualClock>;

/// Timer service wired to in-memory stores.
pub type TestTimerService = TimerService<InMemoryTaskRepository, ManualClock>;

/// Services sharing one store and one manual clock.
pub struct Workspace {
    pub clock: Arc<ManualClock>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub board: TestBoardService,
    pub timer: TestTimerService,
}

impl Workspace {
    /// Creates a project owned by `owner`.
    pub async fn project(&self) -> eyre::Result<ProjectId> {
        let project = self
            .board
            .create_project(CreateProjectRequest::new("Integration board", user("owner")))
            .await?;
        Ok(project.id())
    }

    /// Creates one `todo` task per title, in order.
    pub async fn tasks(&self, project_id: ProjectId, titles: &[&str]) -> eyre::Result<Vec<TaskId>> {
        let mut ids = Vec::with_capacity(titles.len());
        for title in titles {
            let view = self
                .board
                .create_task(CreateTaskRequest::new(project_id, *title))
                .await?;
            ids.push(view.id);
        }
        Ok(ids)
    }

    /// Returns one column as `(id, order)` pairs in position order.
    pub async fn column(
        &self,
        project_id: ProjectId,
        status: TaskStatus,
    ) -> eyre::Result<Vec<(TaskId, u32)>> {
        let snapshot = self.board.snapshot(project_id).await?;
        let column = snapshot
            .column(status)
            .ok_or_else(|| eyre::eyre!("snapshot is missing the {status} column"))?;
        Ok(column.tasks.iter().map(|task| (task.id, task.order)).collect())
    }
}

/// Provides services over fresh in-memory stores.
#[fixture]
pub fn workspace() -> Workspace {
    let clock = Arc::new(ManualClock::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let projects = Arc::new(InMemoryProjectRepository::new());
    Workspace {
        board: BoardService::new(Arc::clone(&tasks), projects, Arc::clone(&clock)),
        timer: TimerService::new(Arc::clone(&tasks), Arc::clone(&clock)),
        clock,
        tasks,
    }
}

/// Asserts that a column holds exactly positions `0..N-1`.
pub fn assert_gap_free(column: &[(TaskId, u32)]) -> eyre::Result<()> {
    let mut orders: Vec<u32> = column.iter().map(|(_, order)| *order).collect();
    orders.sort_unstable();
    let expected: Vec<u32> = (0..).take(orders.len()).collect();
    eyre::ensure!(orders == expected, "column orders {orders:?} are not gap-free");
    Ok(())
}
