//! Column ordering and cross-column moves.
//!
//! A [`Board`] is a snapshot of one project's tasks. Its planning methods
//! check caller-supplied column orders against the snapshot and produce a
//! [`ColumnPlan`]: the version-guarded writes that leave every affected
//! column at positions `0..N-1`. Plans are committed as one unit, so a reader
//! never sees a moved task in both columns or in neither.

use super::{BoardDomainError, Task, TaskId, TaskStatus, TaskWrite};
use mockable::Clock;
use std::collections::HashSet;

/// Snapshot of a project's tasks, sorted by status and position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    tasks: Vec<Task>,
}

/// Writes needed to apply a reorder or move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPlan {
    columns: Vec<TaskStatus>,
    writes: Vec<TaskWrite>,
    untouched: Vec<Task>,
}

impl ColumnPlan {
    fn for_columns(columns: Vec<TaskStatus>) -> Self {
        Self {
            columns,
            writes: Vec::new(),
            untouched: Vec::new(),
        }
    }

    /// Guards the unchanged members of caller-listed columns once anything
    /// moves. Their version is bumped without other changes, so a concurrent
    /// write anywhere in those columns conflicts with this plan.
    fn seal(mut self) -> Self {
        let untouched = std::mem::take(&mut self.untouched);
        if !self.writes.is_empty() {
            self.writes.extend(untouched.into_iter().map(TaskWrite::new));
        }
        self
    }

    /// Returns the columns the plan rewrites.
    #[must_use]
    pub fn columns(&self) -> &[TaskStatus] {
        &self.columns
    }

    /// Returns the version-guarded writes. Empty when nothing moves; otherwise
    /// one per member of the planned columns.
    #[must_use]
    pub fn writes(&self) -> &[TaskWrite] {
        &self.writes
    }

    /// Returns `true` when the columns are already in the requested order.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Returns the planned state of a task, if the plan writes it.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.writes
            .iter()
            .map(TaskWrite::task)
            .find(|task| task.id() == id)
    }
}

impl Board {
    /// Builds a snapshot from a project's tasks.
    ///
    /// Tasks sharing a position (legacy data) are ordered by creation time,
    /// then id, so the column order is always deterministic.
    #[must_use]
    pub fn new(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut collected: Vec<Task> = tasks.into_iter().collect();
        collected.sort_by_key(|task| (task.status(), task.order(), task.created_at(), task.id()));
        Self { tasks: collected }
    }

    /// Returns every task, sorted by status and position.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Consumes the snapshot and returns its sorted tasks.
    #[must_use]
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Looks up a task by identifier.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Iterates over one column in position order.
    pub fn column(&self, status: TaskStatus) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |task| task.status() == status)
    }

    /// Returns the ids of one column in position order.
    #[must_use]
    pub fn column_ids(&self, status: TaskStatus) -> Vec<TaskId> {
        self.column(status).map(Task::id).collect()
    }

    /// Returns the position one past the largest in the column, or 0 when
    /// the column is empty.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnFull`] when the next position would
    /// overflow.
    pub fn next_order(&self, status: TaskStatus) -> Result<u32, BoardDomainError> {
        self.column(status)
            .map(Task::order)
            .max()
            .map_or(Ok(0), |max| {
                max.checked_add(1).ok_or(BoardDomainError::ColumnFull {
                    status,
                    max: u32::MAX,
                })
            })
    }

    /// Plans a full replace of one column's order.
    ///
    /// `ordered_ids` must list every current member of the column exactly
    /// once; each task then takes its list index as its position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateTaskInOrder`] or
    /// [`BoardDomainError::UnknownTask`] for malformed lists, and
    /// [`BoardDomainError::TaskNotInColumn`] or
    /// [`BoardDomainError::IncompleteColumnOrder`] when the list does not
    /// match the column's current membership.
    pub fn plan_reorder(
        &self,
        status: TaskStatus,
        ordered_ids: &[TaskId],
        clock: &impl Clock,
    ) -> Result<ColumnPlan, BoardDomainError> {
        let expected = self.column_ids(status);
        self.check_column_order(status, ordered_ids, expected.len(), None)?;

        let mut plan = ColumnPlan::for_columns(vec![status]);
        self.assign(&mut plan, status, ordered_ids, None, clock)?;
        Ok(plan.seal())
    }

    /// Plans a drag of one task from `from` into `to`.
    ///
    /// `from_ids` is the complete source column without the task and
    /// `to_ids` the complete destination column with the task at its new
    /// index. When both statuses are equal this is a reorder of `to_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownTask`] when the task is not on the
    /// board, [`BoardDomainError::StatusMismatch`] when it is no longer in
    /// `from`, and the [`Board::plan_reorder`] errors for either list.
    pub fn plan_move(
        &self,
        task_id: TaskId,
        from: TaskStatus,
        from_ids: &[TaskId],
        to: TaskStatus,
        to_ids: &[TaskId],
        clock: &impl Clock,
    ) -> Result<ColumnPlan, BoardDomainError> {
        let current = self
            .get(task_id)
            .ok_or(BoardDomainError::UnknownTask(task_id))?;
        if current.status() != from {
            return Err(BoardDomainError::StatusMismatch {
                task_id,
                expected: from,
                actual: current.status(),
            });
        }
        if from == to {
            return self.plan_reorder(to, to_ids, clock);
        }
        Ok(self
            .relocate(current.clone(), from_ids, to, to_ids, clock)?
            .seal())
    }

    /// Plans moving `moving` to the end of column `to`, closing the gap it
    /// leaves behind.
    ///
    /// `moving` may carry unrelated changes (such as a started timer); they
    /// are written together with the new position. Only the moving task and
    /// the tasks it renumbers are written: tasks keeping their position stay
    /// free for concurrent timer writes, and the append itself is protected
    /// by the store's position uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownTask`] when the task is not on the
    /// board or [`BoardDomainError::ColumnFull`] when a position overflows.
    pub fn plan_move_to_end(
        &self,
        moving: Task,
        to: TaskStatus,
        clock: &impl Clock,
    ) -> Result<ColumnPlan, BoardDomainError> {
        let moving_id = moving.id();
        let current = self
            .get(moving_id)
            .ok_or(BoardDomainError::UnknownTask(moving_id))?;
        let from = current.status();
        if from == to {
            let mut plan = ColumnPlan::for_columns(vec![to]);
            if &moving != current {
                plan.writes.push(TaskWrite::new(moving));
            }
            return Ok(plan);
        }

        let from_ids: Vec<TaskId> = self
            .column(from)
            .map(Task::id)
            .filter(|id| *id != moving_id)
            .collect();
        let mut to_ids = self.column_ids(to);
        to_ids.push(moving_id);
        self.relocate(moving, &from_ids, to, &to_ids, clock)
    }

    fn relocate(
        &self,
        moving: Task,
        from_ids: &[TaskId],
        to: TaskStatus,
        to_ids: &[TaskId],
        clock: &impl Clock,
    ) -> Result<ColumnPlan, BoardDomainError> {
        let moving_id = moving.id();
        let from = self
            .get(moving_id)
            .map(Task::status)
            .ok_or(BoardDomainError::UnknownTask(moving_id))?;

        let in_destination = to_ids.iter().filter(|id| **id == moving_id).count();
        if from_ids.contains(&moving_id) || in_destination != 1 {
            return Err(BoardDomainError::MovingTaskMisplaced {
                task_id: moving_id,
                status: to,
            });
        }

        let remaining_in_source = self.column(from).count().saturating_sub(1);
        let grown_destination = self.column(to).count().saturating_add(1);
        self.check_column_order(from, from_ids, remaining_in_source, None)?;
        self.check_column_order(to, to_ids, grown_destination, Some(moving_id))?;

        let mut plan = ColumnPlan::for_columns(vec![from, to]);
        self.assign(&mut plan, from, from_ids, None, clock)?;
        self.assign(&mut plan, to, to_ids, Some(moving), clock)?;
        Ok(plan)
    }

    /// Checks that `ordered_ids` lists exactly the current members of a
    /// column (plus the moving task, if any).
    fn check_column_order(
        &self,
        status: TaskStatus,
        ordered_ids: &[TaskId],
        expected_len: usize,
        moving: Option<TaskId>,
    ) -> Result<(), BoardDomainError> {
        let mut seen = HashSet::with_capacity(ordered_ids.len());
        for id in ordered_ids {
            if !seen.insert(*id) {
                return Err(BoardDomainError::DuplicateTaskInOrder(*id));
            }
            if moving == Some(*id) {
                continue;
            }
            let task = self.get(*id).ok_or(BoardDomainError::UnknownTask(*id))?;
            if task.status() != status {
                return Err(BoardDomainError::TaskNotInColumn {
                    task_id: *id,
                    status,
                });
            }
        }

        if ordered_ids.len() != expected_len {
            return Err(BoardDomainError::IncompleteColumnOrder {
                status,
                expected: expected_len,
                actual: ordered_ids.len(),
            });
        }
        Ok(())
    }

    /// Adds a write for every task whose position changes and records the
    /// rest as untouched. The moving task is always written.
    fn assign(
        &self,
        plan: &mut ColumnPlan,
        status: TaskStatus,
        ordered_ids: &[TaskId],
        mut moving: Option<Task>,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        for (index, id) in ordered_ids.iter().enumerate() {
            let order = u32::try_from(index).map_err(|_| BoardDomainError::ColumnFull {
                status,
                max: u32::MAX,
            })?;

            if let Some(mut task) = moving.take_if(|task| task.id() == *id) {
                task.place(status, order, clock);
                plan.writes.push(TaskWrite::new(task));
                continue;
            }

            let current = self.get(*id).ok_or(BoardDomainError::UnknownTask(*id))?;
            if current.status() == status && current.order() == order {
                plan.untouched.push(current.clone());
                continue;
            }
            let mut task = current.clone();
            task.place(status, order, clock);
            plan.writes.push(TaskWrite::new(task));
        }
        Ok(())
    }
}
