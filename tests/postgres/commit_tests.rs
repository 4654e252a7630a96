//! Version-guarded batches and deferred position checks in `PostgreSQL`.

use super::helpers::BoardDb;
use crate::test_helpers::user;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use taskboard::board::{
    domain::{Task, TaskStatus, TaskWrite},
    ports::{TaskRepository, TaskRepositoryError},
};

fn titles(names: &[&str]) -> Vec<(String, u32)> {
    names.iter().map(|name| (*name).to_owned()).zip(0..).collect()
}

#[rstest]
fn stale_batch_applies_nothing(shared_test_cluster: &'static TestCluster) {
    let db = BoardDb::create(shared_test_cluster, "stale_batch");
    let project_id = db.project();
    let seeded = db.seed(project_id, &["A", "B", "C"]);
    let snapshot = db.board(project_id);

    let mut bumped = seeded.get(2).expect("seeded C").clone();
    bumped.start_timer(user("ana"), &*db.clock);
    db.rt
        .block_on(db.tasks.commit(&[TaskWrite::new(bumped)]))
        .expect("timer commit");

    let reversed: Vec<_> = seeded.iter().rev().map(Task::id).collect();
    let plan = snapshot
        .plan_reorder(TaskStatus::Todo, &reversed, &*db.clock)
        .expect("reorder plan");
    let result = db.rt.block_on(db.tasks.commit(plan.writes()));

    assert!(
        matches!(result, Err(TaskRepositoryError::VersionConflict { .. })),
        "Expected VersionConflict, got: {result:?}"
    );
    assert_eq!(
        db.column(project_id, TaskStatus::Todo),
        titles(&["A", "B", "C"])
    );
    let c = db
        .rt
        .block_on(db.tasks.find_by_id(seeded.get(2).expect("seeded C").id()))
        .expect("find_by_id")
        .expect("task should exist");
    assert_eq!(c.timer().active_user_ids(), &[user("ana")]);
}

#[rstest]
fn reorder_passes_through_transient_duplicates(shared_test_cluster: &'static TestCluster) {
    let db = BoardDb::create(shared_test_cluster, "rotate");
    let project_id = db.project();
    let seeded = db.seed(project_id, &["A", "B", "C"]);
    let ids: Vec<_> = seeded.iter().map(Task::id).collect();

    // C takes position 0 while A still holds it until A's own update runs.
    let rotated = [ids[2], ids[0], ids[1]];
    let plan = db
        .board(project_id)
        .plan_reorder(TaskStatus::Todo, &rotated, &*db.clock)
        .expect("reorder plan");
    db.rt
        .block_on(db.tasks.commit(plan.writes()))
        .expect("reorder commit");

    assert_eq!(
        db.column(project_id, TaskStatus::Todo),
        titles(&["C", "A", "B"])
    );
}

#[rstest]
fn move_to_end_renumbers_source_column(shared_test_cluster: &'static TestCluster) {
    let db = BoardDb::create(shared_test_cluster, "move_to_end");
    let project_id = db.project();
    let seeded = db.seed(project_id, &["A", "B", "C"]);

    let plan = db
        .board(project_id)
        .plan_move_to_end(
            seeded.first().expect("seeded A").clone(),
            TaskStatus::InProgress,
            &*db.clock,
        )
        .expect("move plan");
    db.rt
        .block_on(db.tasks.commit(plan.writes()))
        .expect("move commit");

    assert_eq!(
        db.column(project_id, TaskStatus::Todo),
        titles(&["B", "C"])
    );
    assert_eq!(
        db.column(project_id, TaskStatus::InProgress),
        titles(&["A"])
    );
}

#[rstest]
fn commit_of_unknown_task_reports_not_found(shared_test_cluster: &'static TestCluster) {
    let db = BoardDb::create(shared_test_cluster, "unknown_commit");
    let project_id = db.project();
    let ghost = db.new_task(project_id, "Never stored", 0);

    let result = db
        .rt
        .block_on(db.tasks.commit(&[TaskWrite::new(ghost.clone())]));

    assert!(
        matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == ghost.id()),
        "Expected NotFound, got: {result:?}"
    );
}
