//! `PostgreSQL` repository implementation for task storage.
//!
//! Updates are compare-and-set on the `version` column. A commit runs all of
//! its guarded updates in one transaction; column position uniqueness is a
//! deferred constraint, so transient duplicates inside a reorder are fine and
//! a real collision surfaces when the transaction commits.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::board::{
    domain::{
        PersistedTaskData, ProjectId, Task, TaskId, TaskStatus, TaskTimer, TaskVersion, TaskWrite,
        UserId,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use serde_json::Value;

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

const POSITION_UNIQUE_CONSTRAINT: &str = "tasks_column_position_unique";

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: BoardPgPool,
}

/// One compare-and-set update inside a commit.
struct GuardedUpdate {
    id: uuid::Uuid,
    expected_version: TaskVersion,
    expected_version_value: i64,
    changeset: TaskChangeset,
}

/// Failure inside a commit transaction.
enum CommitFailure {
    Guard(TaskRepositoryError),
    Database(DieselError),
}

impl From<DieselError> for CommitFailure {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let project_id = task.project_id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_position_unique_violation(info.as_ref()) =>
                    {
                        TaskRepositoryError::OrderCollision(project_id)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn commit(&self, writes: &[TaskWrite]) -> TaskRepositoryResult<()> {
        let Some(project_id) = writes.first().map(|write| write.task().project_id()) else {
            return Ok(());
        };
        let updates = writes
            .iter()
            .map(to_guarded_update)
            .collect::<TaskRepositoryResult<Vec<_>>>()?;

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, CommitFailure, _>(|tx| {
                    for update in &updates {
                        apply_guarded_update(tx, update)?;
                    }
                    Ok(())
                })
                .map_err(|failure| match failure {
                    CommitFailure::Guard(err) => err,
                    CommitFailure::Database(DieselError::DatabaseError(
                        DatabaseErrorKind::UniqueViolation,
                        ref info,
                    )) if is_position_unique_violation(info.as_ref()) => {
                        TaskRepositoryError::OrderCollision(project_id)
                    }
                    CommitFailure::Database(err) => TaskRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .order((tasks::status.asc(), tasks::position.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            diesel::delete(tasks::table.filter(tasks::project_id.eq(project_id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn apply_guarded_update(
    connection: &mut PgConnection,
    update: &GuardedUpdate,
) -> Result<(), CommitFailure> {
    let updated = diesel::update(
        tasks::table
            .filter(tasks::id.eq(update.id))
            .filter(tasks::version.eq(update.expected_version_value)),
    )
    .set(&update.changeset)
    .execute(connection)?;
    if updated == 1 {
        return Ok(());
    }

    let exists =
        diesel::select(diesel::dsl::exists(tasks::table.filter(tasks::id.eq(update.id))))
            .get_result::<bool>(connection)?;
    let task_id = TaskId::from_uuid(update.id);
    let err = if exists {
        TaskRepositoryError::VersionConflict {
            task_id,
            expected: update.expected_version,
        }
    } else {
        TaskRepositoryError::NotFound(task_id)
    };
    Err(CommitFailure::Guard(err))
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let timer = task.timer();
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        project_id: task.project_id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        assignee_user_ids: user_ids_to_json(task.assignee_user_ids())?,
        status: task.status().as_str().to_owned(),
        position: i64::from(task.order()),
        active_user_ids: user_ids_to_json(timer.active_user_ids())?,
        last_start_at: timer.last_start_at(),
        accumulated_ms: to_bigint(timer.accumulated_ms())?,
        version: to_bigint(task.version().value())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_guarded_update(write: &TaskWrite) -> TaskRepositoryResult<GuardedUpdate> {
    let task = write.task();
    let timer = task.timer();
    let changeset = TaskChangeset {
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        assignee_user_ids: user_ids_to_json(task.assignee_user_ids())?,
        status: task.status().as_str().to_owned(),
        position: i64::from(task.order()),
        active_user_ids: user_ids_to_json(timer.active_user_ids())?,
        last_start_at: timer.last_start_at(),
        accumulated_ms: to_bigint(timer.accumulated_ms())?,
        version: to_bigint(task.version().value())?,
        updated_at: task.updated_at(),
    };

    Ok(GuardedUpdate {
        id: task.id().into_inner(),
        expected_version: write.expected_version(),
        expected_version_value: to_bigint(write.expected_version().value())?,
        changeset,
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        title,
        description,
        assignee_user_ids,
        status,
        position,
        active_user_ids,
        last_start_at,
        accumulated_ms,
        version,
        created_at,
        updated_at,
    } = row;

    let timer = TaskTimer::from_persisted(
        json_to_user_ids(active_user_ids)?,
        last_start_at,
        u64::try_from(accumulated_ms).map_err(TaskRepositoryError::persistence)?,
    )
    .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        project_id: ProjectId::from_uuid(project_id),
        title,
        description,
        assignee_user_ids: json_to_user_ids(assignee_user_ids)?,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
        order: u32::try_from(position).map_err(TaskRepositoryError::persistence)?,
        timer,
        version: TaskVersion::new(
            u64::try_from(version).map_err(TaskRepositoryError::persistence)?,
        ),
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn user_ids_to_json(user_ids: &[UserId]) -> TaskRepositoryResult<Value> {
    serde_json::to_value(user_ids).map_err(TaskRepositoryError::persistence)
}

fn json_to_user_ids(value: Value) -> TaskRepositoryResult<Vec<UserId>> {
    let raw: Vec<String> =
        serde_json::from_value(value).map_err(TaskRepositoryError::persistence)?;
    raw.into_iter()
        .map(|id| UserId::new(id).map_err(TaskRepositoryError::persistence))
        .collect()
}

fn to_bigint(value: u64) -> TaskRepositoryResult<i64> {
    i64::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn is_position_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == POSITION_UNIQUE_CONSTRAINT)
}
