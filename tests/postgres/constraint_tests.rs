//! Position collisions and timer row checks enforced by the schema.

use super::helpers::BoardDb;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use taskboard::board::{
    domain::{Board, TaskStatus},
    ports::{ProjectRepository, TaskRepository, TaskRepositoryError},
};

#[rstest]
fn racing_creates_at_one_position_collide(shared_test_cluster: &'static TestCluster) {
    let db = BoardDb::create(shared_test_cluster, "racing_create");
    let project_id = db.project();
    let first = db.new_task(project_id, "First", 0);
    let second = db.new_task(project_id, "Second", 0);

    let (left, right) = db.rt.block_on(async {
        tokio::join!(db.tasks.store(&first), db.tasks.store(&second))
    });

    let collisions = [&left, &right]
        .into_iter()
        .filter(|result| {
            matches!(result, Err(TaskRepositoryError::OrderCollision(id)) if *id == project_id)
        })
        .count();
    assert!(
        left.is_ok() != right.is_ok() && collisions == 1,
        "Expected one store and one OrderCollision, got: {left:?} / {right:?}"
    );
    assert_eq!(db.column(project_id, TaskStatus::Todo).len(), 1);
}

#[rstest]
fn commit_into_taken_position_collides(shared_test_cluster: &'static TestCluster) {
    let db = BoardDb::create(shared_test_cluster, "commit_collision");
    let project_id = db.project();
    let seeded = db.seed(project_id, &["A", "B"]);

    let moved = db
        .board(project_id)
        .plan_move_to_end(seeded[1].clone(), TaskStatus::Done, &*db.clock)
        .expect("move plan");
    db.rt
        .block_on(db.tasks.commit(moved.writes()))
        .expect("first move");

    let fresh_a = db
        .rt
        .block_on(db.tasks.find_by_id(seeded[0].id()))
        .expect("find_by_id")
        .expect("task should exist");
    let unaware_of_b = Board::new(vec![fresh_a.clone()]);
    let clash = unaware_of_b
        .plan_move_to_end(fresh_a, TaskStatus::Done, &*db.clock)
        .expect("clashing plan");
    let result = db.rt.block_on(db.tasks.commit(clash.writes()));

    assert!(
        matches!(result, Err(TaskRepositoryError::OrderCollision(id)) if id == project_id),
        "Expected OrderCollision, got: {result:?}"
    );
    assert_eq!(db.column(project_id, TaskStatus::Todo).len(), 1);
}

#[rstest]
#[case::start_without_users("'[]'::jsonb", "now()")]
#[case::users_without_start("'[\"ana\"]'::jsonb", "NULL")]
fn inconsistent_timer_row_is_rejected(
    shared_test_cluster: &'static TestCluster,
    #[case] active_user_ids: &str,
    #[case] last_start_at: &str,
) {
    let db = BoardDb::create(shared_test_cluster, "timer_check");
    let project_id = db.project();
    let mut conn = db.raw_connection();

    let result = diesel::sql_query(format!(
        "INSERT INTO tasks (id, project_id, title, status, position, active_user_ids, \
         last_start_at, version, created_at, updated_at) \
         VALUES ('{}', '{}', 'Broken timer', 'todo', 0, {active_user_ids}, \
         {last_start_at}, 0, now(), now())",
        uuid::Uuid::new_v4(),
        project_id.into_inner(),
    ))
    .execute(&mut conn);

    assert!(
        matches!(
            &result,
            Err(DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info))
                if info.constraint_name() == Some("tasks_open_interval_matches_active_users")
        ),
        "Expected CheckViolation, got: {result:?}"
    );
    assert!(db.column(project_id, TaskStatus::Todo).is_empty());
}

#[rstest]
fn deleting_a_project_cascades_to_its_tasks(shared_test_cluster: &'static TestCluster) {
    let db = BoardDb::create(shared_test_cluster, "cascade");
    let project_id = db.project();
    db.seed(project_id, &["A", "B"]);

    db.rt
        .block_on(db.projects.delete(project_id))
        .expect("project delete");

    assert!(db.board(project_id).tasks().is_empty());
}
