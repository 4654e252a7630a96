//! Given steps for board workflow BDD scenarios.

use super::world::{BoardWorld, run_async, split_titles};
use crate::test_helpers::user;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::board::{
    domain::TaskStatus,
    services::{CreateProjectRequest, CreateTaskRequest},
};

#[given(r#"a project board with todo tasks "{titles}""#)]
fn board_with_todo_tasks(world: &mut BoardWorld, titles: String) -> Result<(), eyre::Report> {
    let project = run_async(
        world
            .board
            .create_project(CreateProjectRequest::new("Scenario board", user("owner"))),
    )
    .wrap_err("create scenario project")?;
    world.project_id = Some(project.id());

    for title in split_titles(&titles) {
        let view = run_async(
            world
                .board
                .create_task(CreateTaskRequest::new(project.id(), title.clone())),
        )
        .wrap_err_with(|| format!("create task {title:?}"))?;
        world.task_ids.insert(title, view.id);
    }
    Ok(())
}

#[given(r#""{titles}" have been moved to "{status}""#)]
fn tasks_moved_to(world: &mut BoardWorld, titles: String, status: String) -> Result<(), eyre::Report> {
    let target: TaskStatus = status.parse()?;
    for task_id in world.task_ids(&titles)? {
        run_async(world.board.set_status(task_id, target)).wrap_err("move task in setup")?;
    }
    Ok(())
}
