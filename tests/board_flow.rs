//! End-to-end board behavior over the in-memory store: the same command
//! stream a rendering surface would produce, checked against the expected
//! lane projections.

use lanes::contact::{Contact, ContactDirectory};
use lanes::controller::{BoardController, Command};
use lanes::store::MemoryStore;
use lanes::task::{Status, Subtask, Task, TaskPatch};

fn contacts() -> ContactDirectory {
    ContactDirectory::new(vec![Contact {
        name: "Ada Lovelace".to_string(),
        color: "#FF7A00".to_string(),
    }])
}

async fn controller_with(tasks: Vec<Task>) -> BoardController {
    let store = MemoryStore::with_tasks(tasks);
    let mut controller = BoardController::new(Box::new(store), contacts(), 3);
    controller.refresh().await.expect("initial refresh");
    controller
}

fn key_of(controller: &BoardController, title: &str) -> String {
    controller
        .cache()
        .iter()
        .find(|task| task.title == title)
        .and_then(|task| task.key.clone())
        .expect("task by title")
}

#[tokio::test]
async fn drag_to_lane_tail_then_refresh_confirms() {
    let mut tail_task = Task::new("already here");
    tail_task.status = Status::Done;
    let mut controller = controller_with(vec![Task::new("mover"), tail_task]).await;
    let key = key_of(&controller, "mover");

    controller
        .dispatch(Command::DragDropped {
            key: key.clone(),
            lane: Status::Done,
        })
        .await
        .expect("drag");

    let view = controller.board("");
    let done_keys: Vec<_> = view
        .lane(Status::Done)
        .cards
        .iter()
        .map(|card| card.key.clone())
        .collect();
    assert_eq!(done_keys.last(), Some(&key));
    assert!(view.lane(Status::Todo).cards.is_empty());

    // The confirmation refresh is idempotent: the task stays in done.
    controller
        .dispatch(Command::Refreshed)
        .await
        .expect("refresh");
    let view = controller.board("");
    assert!(view
        .lane(Status::Done)
        .cards
        .iter()
        .any(|card| card.key == key));
}

#[tokio::test]
async fn search_hits_one_lane_and_flags_the_rest() {
    let mut todo = Task::new("polish login page");
    todo.status = Status::Todo;
    let mut done = Task::new("cleanup");
    done.description = "removed the flaky retry wrapper".to_string();
    done.status = Status::Done;
    let controller = controller_with(vec![todo, done]).await;

    let view = controller.board("flaky retry");
    assert_eq!(view.lane(Status::Done).cards.len(), 1);
    assert!(view.lane(Status::Done).cards[0]
        .description
        .contains("flaky retry"));
    assert!(view.lane(Status::Todo).no_results);
    assert!(view.lane(Status::InProgress).no_results);
    assert!(!view.lane(Status::Done).no_results);
}

#[tokio::test]
async fn checklist_lifecycle_through_commands() {
    let mut task = Task::new("with checklist");
    task.subtasks = vec![Subtask::new("Write tests")];
    let mut controller = controller_with(vec![task]).await;
    let key = key_of(&controller, "with checklist");

    controller
        .dispatch(Command::SubtaskToggled {
            key: key.clone(),
            index: 0,
        })
        .await
        .expect("toggle");

    let view = controller.board("");
    let card = &view.lane(Status::Todo).cards[0];
    let progress = card.progress.expect("progress");
    assert_eq!((progress.done, progress.total), (1, 1));

    // Eager persistence: a fresh refresh still shows the tick.
    controller
        .dispatch(Command::Refreshed)
        .await
        .expect("refresh");
    let task = controller.cache().find_by_key(&key).expect("task");
    assert!(task.subtasks[0].done);
}

#[tokio::test]
async fn failed_edit_never_leaks_into_the_cache() {
    let store = MemoryStore::with_tasks(vec![Task::new("stable")]);
    store.fail_in(2, "store down");

    let mut controller = BoardController::new(Box::new(store), contacts(), 3);
    controller.refresh().await.expect("refresh");
    let key = key_of(&controller, "stable");
    let before = controller.cache().find_by_key(&key).cloned().expect("entry");

    let err = controller
        .dispatch(Command::EditCommitted {
            key: key.clone(),
            patch: TaskPatch {
                title: Some("lost update".to_string()),
                ..TaskPatch::default()
            },
            subtasks: None,
        })
        .await
        .expect_err("store failure");
    assert_eq!(err.exit_code(), 4);
    assert_eq!(controller.cache().find_by_key(&key), Some(&before));
}

#[tokio::test]
async fn assignee_chips_resolve_against_snapshot() {
    let mut task = Task::new("assigned");
    task.assign("Ada Lovelace");
    task.assign("Unknown Person");
    let controller = controller_with(vec![task]).await;

    let view = controller.board("");
    let card = &view.lane(Status::Todo).cards[0];
    assert_eq!(card.assignees.len(), 1);
    assert_eq!(card.assignees[0].name, "Ada Lovelace");
    assert_eq!(card.assignees[0].color, "#FF7A00");
    assert_eq!(card.assignee_overflow, 0);
}
