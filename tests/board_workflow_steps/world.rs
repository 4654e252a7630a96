//! Shared world state for board workflow BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use crate::test_helpers::ManualClock;
use rstest::fixture;
use taskboard::board::{
    adapters::memory::{InMemoryProjectRepository, InMemoryTaskRepository},
    domain::{ProjectId, TaskId, TaskStatus, TaskView},
    services::{BoardService, BoardServiceError, TimerService},
};

/// Board service used by the BDD world.
pub type TestBoardService =
    BoardService<InMemoryTaskRepository, InMemoryProjectRepository, ManualClock>;

/// Timer service used by the BDD world.
pub type TestTimerService = TimerService<InMemoryTaskRepository, ManualClock>;

/// Scenario world for board workflow behaviour tests.
pub struct BoardWorld {
    pub clock: Arc<ManualClock>,
    pub board: TestBoardService,
    pub timer: TestTimerService,
    pub project_id: Option<ProjectId>,
    pub task_ids: HashMap<String, TaskId>,
    pub last_error: Option<BoardServiceError>,
}

impl BoardWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let projects = Arc::new(InMemoryProjectRepository::new());
        Self {
            board: BoardService::new(Arc::clone(&tasks), projects, Arc::clone(&clock)),
            timer: TimerService::new(tasks, Arc::clone(&clock)),
            clock,
            project_id: None,
            task_ids: HashMap::new(),
            last_error: None,
        }
    }

    /// Returns the scenario project.
    pub fn project_id(&self) -> Result<ProjectId, eyre::Report> {
        self.project_id
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Resolves a task title to its id.
    pub fn task_id(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.task_ids
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task titled {title:?} in scenario world"))
    }

    /// Resolves a comma-separated title list to ids.
    pub fn task_ids(&self, titles: &str) -> Result<Vec<TaskId>, eyre::Report> {
        split_titles(titles)
            .into_iter()
            .map(|title| self.task_id(&title))
            .collect()
    }

    /// Returns the tasks of one column in position order.
    pub fn column(&self, status: TaskStatus) -> Result<Vec<TaskView>, eyre::Report> {
        let snapshot = run_async(self.board.snapshot(self.project_id()?))?;
        let column = snapshot
            .column(status)
            .ok_or_else(|| eyre::eyre!("snapshot is missing the {status} column"))?;
        Ok(column.tasks.clone())
    }

    /// Looks up the current view of a task by title.
    pub fn view(&self, title: &str) -> Result<TaskView, eyre::Report> {
        let task_id = self.task_id(title)?;
        run_async(self.board.list_tasks(self.project_id()?))?
            .into_iter()
            .find(|task| task.id == task_id)
            .ok_or_else(|| eyre::eyre!("task {title:?} is not on the board"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Splits `"A, B, C"` into trimmed titles.
pub fn split_titles(titles: &str) -> Vec<String> {
    titles
        .split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
