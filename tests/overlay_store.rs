//! Overlay session driven against the JSON-file store, covering the
//! view/edit/commit cycle the way the CLI-facing stack composes it.

use lanes::cache::TaskCache;
use lanes::checklist;
use lanes::jsonstore::JsonFileStore;
use lanes::overlay::OverlaySession;
use lanes::store::RecordStore;
use lanes::task::{Status, Subtask, Task};

async fn seeded_store(dir: &tempfile::TempDir) -> (JsonFileStore, String) {
    let store = JsonFileStore::new(dir.path().join("board.json"));
    let mut task = Task::new("persisted task");
    task.description = "first description".to_string();
    task.subtasks = vec![Subtask::new("step")];
    let key = store.create(&task).await.expect("seed create");
    (store, key)
}

#[tokio::test]
async fn edit_commit_survives_a_cold_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (store, key) = seeded_store(&dir).await;

    let mut cache = TaskCache::new();
    cache.load_all(&store).await.expect("load");

    let mut overlay = OverlaySession::new();
    overlay.open(&cache, &key).expect("open");
    let buffer = overlay.begin_edit(&cache).expect("edit");
    buffer.title = "renamed on disk".to_string();
    checklist::add(&mut buffer.subtasks, "second step").expect("add row");
    overlay.commit(&mut cache, &store).await.expect("commit");

    // A brand-new cache over the same file sees the committed state.
    let mut fresh = TaskCache::new();
    fresh.load_all(&store).await.expect("reload");
    let task = fresh.find_by_key(&key).expect("reloaded task");
    assert_eq!(task.title, "renamed on disk");
    assert_eq!(task.subtasks.len(), 2);
    assert_eq!(task.description, "first description");
}

#[tokio::test]
async fn creation_commit_lands_in_store_and_cache() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("board.json"));
    let mut cache = TaskCache::new();

    let mut overlay = OverlaySession::new();
    let buffer = overlay.open_new(Status::AwaitingFeedback);
    buffer.title = "fresh task".to_string();
    overlay.commit(&mut cache, &store).await.expect("create");

    let key = cache
        .iter()
        .next()
        .and_then(|task| task.key.clone())
        .expect("assigned key");
    let remote = store.fetch_all().await.expect("fetch");
    assert_eq!(remote[&key].title, "fresh task");
    assert_eq!(remote[&key].status, Status::AwaitingFeedback);
}

#[tokio::test]
async fn delete_clears_store_cache_and_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (store, key) = seeded_store(&dir).await;

    let mut cache = TaskCache::new();
    cache.load_all(&store).await.expect("load");

    let mut overlay = OverlaySession::new();
    overlay.open(&cache, &key).expect("open");
    overlay.delete(&mut cache, &store).await.expect("delete");

    assert!(!overlay.is_open());
    assert!(cache.find_by_key(&key).is_none());
    assert!(store.fetch_all().await.expect("fetch").is_empty());
}
