//! Project, task, and column orchestration.

use super::{BoardConfig, BoardServiceError, BoardServiceResult, retry::with_write_retry};
use crate::board::{
    domain::{
        Board, BoardSnapshot, ColumnPlan, ColumnView, Project, ProjectId, Task, TaskDraft, TaskId,
        TaskStatus, TaskView, UserId,
    },
    ports::{ProjectRepository, ProjectRepositoryError, TaskRepository},
};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for creating a project board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    created_by: UserId,
}

impl CreateProjectRequest {
    /// Creates a request with the project name and its creator.
    #[must_use]
    pub fn new(name: impl Into<String>, created_by: UserId) -> Self {
        Self {
            name: name.into(),
            created_by,
        }
    }
}

/// Request payload for creating a task at the end of the `todo` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    assignees: Vec<UserId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
            assignees: Vec::new(),
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the assigned users.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = UserId>) -> Self {
        self.assignees = assignees.into_iter().collect();
        self
    }
}

/// Request payload for dragging a task between (or within) columns.
///
/// `from_ids` is the complete source column without the task and `to_ids`
/// the complete destination column with the task at its new index. For a
/// move within one column only `to_ids` is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTaskRequest {
    task_id: TaskId,
    from: TaskStatus,
    to: TaskStatus,
    from_ids: Vec<TaskId>,
    to_ids: Vec<TaskId>,
}

impl MoveTaskRequest {
    /// Creates a move request.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
        from_ids: impl IntoIterator<Item = TaskId>,
        to_ids: impl IntoIterator<Item = TaskId>,
    ) -> Self {
        Self {
            task_id,
            from,
            to,
            from_ids: from_ids.into_iter().collect(),
            to_ids: to_ids.into_iter().collect(),
        }
    }
}

/// Board orchestration service.
#[derive(Clone)]
pub struct BoardService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    clock: Arc<C>,
    config: BoardConfig,
}

impl<T, P, C> BoardService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a board service with the default configuration.
    #[must_use]
    pub fn new(tasks: Arc<T>, projects: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            projects,
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

    /// Creates a project board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the name is out of bounds
    /// or a repository error when persistence fails.
    pub async fn create_project(&self, request: CreateProjectRequest) -> BoardServiceResult<Project> {
        let project = Project::new(
            request.name,
            request.created_by,
            self.config.project_name_bounds(),
            &*self.clock,
        )?;
        self.projects.store(&project).await?;
        tracing::info!(project_id = %project.id(), name = project.name(), "project created");
        Ok(project)
    }

    /// Deletes a project and all of its tasks. Returns the number of tasks
    /// removed.
    ///
    /// The project goes first so that creates racing the delete fail their
    /// project check or are swept up with the tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::ProjectNotFound`] when the project does
    /// not exist.
    pub async fn delete_project(&self, project_id: ProjectId) -> BoardServiceResult<usize> {
        self.projects.delete(project_id).await.map_err(|err| match err {
            ProjectRepositoryError::NotFound(id) => BoardServiceError::ProjectNotFound(id),
            other => other.into(),
        })?;
        let removed = self.tasks.delete_by_project(project_id).await?;
        tracing::info!(project_id = %project_id, removed, "project deleted");
        Ok(removed)
    }

    /// Creates a `todo` task at the end of the `todo` column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::ProjectNotFound`] for an unknown project,
    /// [`BoardServiceError::Domain`] for an invalid title, or a conflict once
    /// concurrent creates have used up the attempt budget.
    pub async fn create_task(&self, request: CreateTaskRequest) -> BoardServiceResult<TaskView> {
        let mut draft =
            TaskDraft::new(request.project_id, request.title, self.config.max_title_length)?
                .with_assignees(request.assignees);
        if let Some(description) = request.description {
            draft = draft.with_description(description);
        }
        self.ensure_project(draft.project_id()).await?;

        let task = with_write_retry("board.create_task", self.config.attempts(), || {
            self.try_create(&draft)
        })
        .await?;
        if self.projects.find_by_id(task.project_id()).await?.is_none() {
            let swept = self.tasks.delete_by_project(task.project_id()).await?;
            tracing::warn!(
                task_id = %task.id(),
                project_id = %task.project_id(),
                swept,
                "project deleted during task creation"
            );
            return Err(BoardServiceError::ProjectNotFound(task.project_id()));
        }
        tracing::info!(
            task_id = %task.id(),
            project_id = %task.project_id(),
            order = task.order(),
            "task created"
        );
        Ok(TaskView::from(&task))
    }

    /// Lists a project's tasks sorted by status, then position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::ProjectNotFound`] for an unknown project.
    pub async fn list_tasks(&self, project_id: ProjectId) -> BoardServiceResult<Vec<TaskView>> {
        let board = self.load_board(project_id).await?;
        Ok(board.tasks().iter().map(TaskView::from).collect())
    }

    /// Returns every column of the board together with the server clock
    /// reading and the suggested polling cadence.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::ProjectNotFound`] for an unknown project.
    pub async fn snapshot(&self, project_id: ProjectId) -> BoardServiceResult<BoardSnapshot> {
        let board = self.load_board(project_id).await?;
        let columns = TaskStatus::ALL
            .iter()
            .map(|status| ColumnView {
                status: *status,
                tasks: board.column(*status).map(TaskView::from).collect(),
            })
            .collect();
        Ok(BoardSnapshot {
            project_id,
            columns,
            observed_at: self.clock.utc(),
            poll_interval_ms: self.config.poll_interval_ms,
        })
    }

    /// Replaces the order of one column.
    ///
    /// `ordered_ids` must list every current member of the column once.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the list is malformed or
    /// stale (see [`BoardServiceError::kind`]), or a conflict once the
    /// attempt budget is spent.
    pub async fn reorder_column(
        &self,
        project_id: ProjectId,
        status: TaskStatus,
        ordered_ids: &[TaskId],
    ) -> BoardServiceResult<()> {
        with_write_retry("board.reorder_column", self.config.attempts(), || {
            self.try_reorder(project_id, status, ordered_ids)
        })
        .await
    }

    /// Moves a task to a position in another column (or within its own),
    /// renumbering both columns in one commit.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::TaskNotFound`] for an unknown task,
    /// [`BoardServiceError::Domain`] when either list is malformed or the
    /// caller's view is stale, or a conflict once the attempt budget is
    /// spent.
    pub async fn move_task(&self, request: MoveTaskRequest) -> BoardServiceResult<TaskView> {
        with_write_retry("board.move_task", self.config.attempts(), || {
            self.try_move(&request)
        })
        .await
    }

    /// Moves a task to the end of `to`, closing the gap in its old column.
    /// Moving a task to its current status changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::TaskNotFound`] for an unknown task, or a
    /// conflict once the attempt budget is spent.
    pub async fn set_status(&self, task_id: TaskId, to: TaskStatus) -> BoardServiceResult<TaskView> {
        with_write_retry("board.set_status", self.config.attempts(), || {
            self.try_set_status(task_id, to)
        })
        .await
    }

    async fn try_create(&self, draft: &TaskDraft) -> BoardServiceResult<Task> {
        let board = Board::new(self.tasks.find_by_project(draft.project_id()).await?);
        let order = board.next_order(TaskStatus::Todo)?;
        let task = Task::create(draft.clone(), order, &*self.clock);
        self.tasks.store(&task).await?;
        Ok(task)
    }

    async fn try_reorder(
        &self,
        project_id: ProjectId,
        status: TaskStatus,
        ordered_ids: &[TaskId],
    ) -> BoardServiceResult<()> {
        let board = self.load_board(project_id).await?;
        let plan = board.plan_reorder(status, ordered_ids, &*self.clock)?;
        self.commit_plan(&plan).await?;
        tracing::info!(
            project_id = %project_id,
            status = %status,
            writes = plan.writes().len(),
            "column reordered"
        );
        Ok(())
    }

    async fn try_move(&self, request: &MoveTaskRequest) -> BoardServiceResult<TaskView> {
        let (board, current) = self.load_board_for(request.task_id).await?;
        let plan = board.plan_move(
            request.task_id,
            request.from,
            &request.from_ids,
            request.to,
            &request.to_ids,
            &*self.clock,
        )?;
        self.commit_plan(&plan).await?;
        let moved = plan.task(request.task_id).unwrap_or(&current);
        tracing::info!(
            task_id = %request.task_id,
            from = %request.from,
            to = %request.to,
            order = moved.order(),
            "task moved"
        );
        Ok(TaskView::from(moved))
    }

    async fn try_set_status(&self, task_id: TaskId, to: TaskStatus) -> BoardServiceResult<TaskView> {
        let (board, current) = self.load_board_for(task_id).await?;
        if current.status() == to {
            return Ok(TaskView::from(&current));
        }
        let from = current.status();
        let plan = board.plan_move_to_end(current.clone(), to, &*self.clock)?;
        self.commit_plan(&plan).await?;
        let moved = plan.task(task_id).unwrap_or(&current);
        tracing::info!(
            task_id = %task_id,
            from = %from,
            to = %to,
            order = moved.order(),
            "task status changed"
        );
        Ok(TaskView::from(moved))
    }

    async fn commit_plan(&self, plan: &ColumnPlan) -> BoardServiceResult<()> {
        if plan.is_empty() {
            return Ok(());
        }
        self.tasks.commit(plan.writes()).await?;
        Ok(())
    }

    async fn ensure_project(&self, project_id: ProjectId) -> BoardServiceResult<()> {
        self.projects
            .find_by_id(project_id)
            .await?
            .map(|_| ())
            .ok_or(BoardServiceError::ProjectNotFound(project_id))
    }

    async fn load_board(&self, project_id: ProjectId) -> BoardServiceResult<Board> {
        self.ensure_project(project_id).await?;
        Ok(Board::new(self.tasks.find_by_project(project_id).await?))
    }

    /// Loads the board a task belongs to, together with the task as the
    /// board sees it.
    async fn load_board_for(&self, task_id: TaskId) -> BoardServiceResult<(Board, Task)> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(BoardServiceError::TaskNotFound(task_id))?;
        let board = Board::new(self.tasks.find_by_project(task.project_id()).await?);
        let current = board.get(task_id).cloned().unwrap_or(task);
        Ok((board, current))
    }
}
