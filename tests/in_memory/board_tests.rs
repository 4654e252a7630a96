//! Column reorders, moves, and project lifecycle through the board service.

use super::helpers::{Workspace, assert_gap_free, workspace};
use rstest::rstest;
use taskboard::board::{
    domain::TaskStatus,
    services::{BoardErrorKind, MoveTaskRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn todo_column_is_reordered(workspace: Workspace) -> eyre::Result<()> {
    let project_id = workspace.project().await?;
    let ids = workspace.tasks(project_id, &["A", "B", "C"]).await?;
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    workspace
        .board
        .reorder_column(project_id, TaskStatus::Todo, &[c, a, b])
        .await?;

    assert_eq!(
        workspace.column(project_id, TaskStatus::Todo).await?,
        vec![(c, 0), (a, 1), (b, 2)]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dragged_task_lands_at_its_index(workspace: Workspace) -> eyre::Result<()> {
    let project_id = workspace.project().await?;
    let ids = workspace
        .tasks(project_id, &["A", "D", "E", "X", "Y"])
        .await?;
    let (a, d, e, x, y) = (ids[0], ids[1], ids[2], ids[3], ids[4]);
    workspace.board.set_status(x, TaskStatus::InProgress).await?;
    workspace.board.set_status(y, TaskStatus::InProgress).await?;

    workspace
        .board
        .move_task(MoveTaskRequest::new(
            d,
            TaskStatus::Todo,
            TaskStatus::InProgress,
            [a, e],
            [d, x, y],
        ))
        .await?;

    let todo = workspace.column(project_id, TaskStatus::Todo).await?;
    let in_progress = workspace.column(project_id, TaskStatus::InProgress).await?;
    assert_eq!(todo, vec![(a, 0), (e, 1)]);
    assert_eq!(in_progress, vec![(d, 0), (x, 1), (y, 2)]);
    assert_gap_free(&todo)?;
    assert_gap_free(&in_progress)?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn done_tasks_can_be_moved_back(workspace: Workspace) -> eyre::Result<()> {
    let project_id = workspace.project().await?;
    let ids = workspace.tasks(project_id, &["Revisit", "Other"]).await?;
    let task_id = ids[0];
    workspace.board.set_status(task_id, TaskStatus::Done).await?;

    let view = workspace.board.set_status(task_id, TaskStatus::Todo).await?;

    assert_eq!((view.status, view.order), (TaskStatus::Todo, 1));
    assert_gap_free(&workspace.column(project_id, TaskStatus::Todo).await?)?;
    assert!(workspace.column(project_id, TaskStatus::Done).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_strings_are_parsed_at_the_boundary(workspace: Workspace) -> eyre::Result<()> {
    let project_id = workspace.project().await?;
    let ids = workspace.tasks(project_id, &["Parse me"]).await?;
    let status: TaskStatus = "in_progress".parse()?;

    let view = workspace.board.set_status(ids[0], status).await?;

    assert_eq!(view.status, TaskStatus::InProgress);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_project_takes_its_tasks(workspace: Workspace) -> eyre::Result<()> {
    let project_id = workspace.project().await?;
    let ids = workspace.tasks(project_id, &["A", "B", "C"]).await?;

    let removed = workspace.board.delete_project(project_id).await?;
    let missing = workspace
        .board
        .set_status(ids[0], TaskStatus::Done)
        .await
        .err()
        .map(|err| err.kind());

    assert_eq!(removed, 3);
    assert_eq!(missing, Some(BoardErrorKind::NotFound));
    Ok(())
}
