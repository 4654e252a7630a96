//! Shared intervals across users, driven through the services.

use super::helpers::{Workspace, workspace};
use crate::test_helpers::user;
use mockable::Clock;
use rstest::rstest;
use taskboard::board::{
    domain::{TaskStatus, TaskWrite, format_elapsed},
    ports::TaskRepository,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_in_last_out_banks_one_interval(workspace: Workspace) -> eyre::Result<()> {
    let project_id = workspace.project().await?;
    let task_id = *workspace
        .tasks(project_id, &["Pairing session"])
        .await?
        .first()
        .ok_or_else(|| eyre::eyre!("task was not created"))?;

    workspace.timer.start(task_id, &user("u1")).await?;
    workspace.clock.advance_ms(5_000);
    workspace.timer.start(task_id, &user("u2")).await?;
    workspace.clock.advance_ms(3_000);
    workspace.timer.stop(task_id, &user("u1")).await?;
    workspace.clock.advance_ms(2_000);
    let view = workspace.timer.stop(task_id, &user("u2")).await?;

    assert_eq!(view.accumulated_ms, 10_000);
    assert_eq!(view.last_start_at, None);
    assert_eq!(view.status, TaskStatus::InProgress);
    assert_eq!(format_elapsed(view.displayed_ms(workspace.clock.utc())), "10s");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_view_is_compensated_by_the_reader_clock(workspace: Workspace) -> eyre::Result<()> {
    let project_id = workspace.project().await?;
    let task_id = *workspace
        .tasks(project_id, &["Long run"])
        .await?
        .first()
        .ok_or_else(|| eyre::eyre!("task was not created"))?;

    let view = workspace.timer.start(task_id, &user("ana")).await?;
    workspace.clock.advance_ms(65_000);

    assert_eq!(view.accumulated_ms, 0);
    assert_eq!(view.displayed_ms(workspace.clock.utc()), 65_000);
    assert_eq!(format_elapsed(view.displayed_ms(workspace.clock.utc())), "1m 5s");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_interval_matches_active_users_at_every_step(
    workspace: Workspace,
) -> eyre::Result<()> {
    let project_id = workspace.project().await?;
    let task_id = *workspace
        .tasks(project_id, &["Invariant"])
        .await?
        .first()
        .ok_or_else(|| eyre::eyre!("task was not created"))?;
    let steps = [
        ("ana", true),
        ("bo", true),
        ("ana", false),
        ("ana", false),
        ("bo", false),
        ("bo", true),
    ];

    for (name, starting) in steps {
        workspace.clock.advance_ms(250);
        let view = if starting {
            workspace.timer.start(task_id, &user(name)).await?
        } else {
            workspace.timer.stop(task_id, &user(name)).await?
        };
        eyre::ensure!(
            view.last_start_at.is_some() == !view.active_user_ids.is_empty(),
            "interval and participants disagree after {name} (start: {starting})"
        );
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn promoting_one_task_leaves_other_timer_writes_valid(
    workspace: Workspace,
) -> eyre::Result<()> {
    let project_id = workspace.project().await?;
    let ids = workspace.tasks(project_id, &["Running", "Waiting"]).await?;
    let (running, waiting) = match ids.as_slice() {
        [running, waiting] => (*running, *waiting),
        _ => eyre::bail!("expected two tasks, got {ids:?}"),
    };
    workspace.timer.start(running, &user("ana")).await?;
    workspace.clock.advance_ms(1_500);

    let mut stopping = workspace
        .tasks
        .find_by_id(running)
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    stopping.stop_timer(&user("ana"), &*workspace.clock);
    let pending_stop = TaskWrite::new(stopping);

    let promoted = workspace.timer.start(waiting, &user("bo")).await?;
    workspace.tasks.commit(&[pending_stop]).await?;

    let stored = workspace
        .tasks
        .find_by_id(running)
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    assert_eq!(promoted.status, TaskStatus::InProgress);
    assert_eq!(promoted.order, 1);
    assert_eq!(stored.timer().accumulated_ms(), 1_500);
    assert!(stored.timer().active_user_ids().is_empty());
    Ok(())
}
