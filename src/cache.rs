//! In-session task cache.
//!
//! The cache is the sole source of truth for rendering: the projector and
//! every read path consume it, and only `upsert`/`remove`/`move_to_end`
//! (plus a full `load_all` refresh) may write it. It is an owned value with
//! no ambient globals, so tests get isolated instances.

use tracing::debug;

use crate::error::Result;
use crate::store::RecordStore;
use crate::task::Task;

/// Canonical ordered collection of tasks for the active session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskCache {
    tasks: Vec<Task>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire cache from the store. Full refresh, no diffing;
    /// two loads with no intervening remote mutation yield equal caches.
    pub async fn load_all(&mut self, store: &dyn RecordStore) -> Result<()> {
        let records = store.fetch_all().await?;
        debug!(count = records.len(), "cache refreshed from store");
        self.tasks = records
            .into_iter()
            .map(|(key, mut task)| {
                task.key = Some(key);
                task
            })
            .collect();
        Ok(())
    }

    pub fn find_by_key(&self, key: &str) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|task| task.key.as_deref() == Some(key))
    }

    pub fn find_by_key_mut(&mut self, key: &str) -> Option<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.key.as_deref() == Some(key))
    }

    /// Replace the cached task with the same key, or append when new.
    /// A keyless task is ignored; only persisted tasks enter the cache.
    pub fn upsert(&mut self, task: Task) {
        let Some(key) = task.key.clone() else {
            debug!("ignored upsert of keyless task");
            return;
        };
        match self.position(&key) {
            Some(index) => self.tasks[index] = task,
            None => self.tasks.push(task),
        }
    }

    /// Remove by key. Absent keys are a no-op, never an error.
    pub fn remove(&mut self, key: &str) {
        self.tasks.retain(|task| task.key.as_deref() != Some(key));
    }

    /// Splice the task out and append it, so it reappears at the tail of
    /// whatever lane it now projects into. No-op on an absent key.
    pub fn move_to_end(&mut self, key: &str) {
        if let Some(index) = self.position(key) {
            let task = self.tasks.remove(index);
            self.tasks.push(task);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.tasks
            .iter()
            .position(|task| task.key.as_deref() == Some(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn keyed(key: &str, title: &str) -> Task {
        let mut task = Task::new(title);
        task.key = Some(key.to_string());
        task
    }

    #[test]
    fn find_after_upsert_returns_the_task() {
        let mut cache = TaskCache::new();
        let task = keyed("k1", "first");
        cache.upsert(task.clone());
        assert_eq!(cache.find_by_key("k1"), Some(&task));
    }

    #[test]
    fn upsert_replaces_by_key() {
        let mut cache = TaskCache::new();
        cache.upsert(keyed("k1", "before"));
        cache.upsert(keyed("k1", "after"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.find_by_key("k1").map(|t| t.title.as_str()), Some("after"));
    }

    #[test]
    fn keyless_upsert_is_ignored() {
        let mut cache = TaskCache::new();
        cache.upsert(Task::new("no key yet"));
        assert!(cache.is_empty());
    }

    #[test]
    fn remove_absent_key_is_noop() {
        let mut cache = TaskCache::new();
        cache.upsert(keyed("k1", "t"));
        cache.remove("other");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn move_to_end_reorders() {
        let mut cache = TaskCache::new();
        cache.upsert(keyed("k1", "a"));
        cache.upsert(keyed("k2", "b"));
        cache.upsert(keyed("k3", "c"));
        cache.move_to_end("k1");
        let keys: Vec<_> = cache.iter().filter_map(|t| t.key.as_deref()).collect();
        assert_eq!(keys, vec!["k2", "k3", "k1"]);
    }

    #[test]
    fn move_to_end_absent_key_is_noop() {
        let mut cache = TaskCache::new();
        cache.upsert(keyed("k1", "a"));
        cache.move_to_end("missing");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn load_all_is_idempotent() {
        let store = MemoryStore::with_tasks(vec![Task::new("a"), Task::new("b")]);
        let mut first = TaskCache::new();
        first.load_all(&store).await.expect("first load");
        let mut second = TaskCache::new();
        second.load_all(&store).await.expect("second load");
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn load_all_replaces_previous_content() {
        let store = MemoryStore::with_tasks(vec![Task::new("remote")]);
        let mut cache = TaskCache::new();
        cache.upsert(keyed("stale", "local leftover"));
        cache.load_all(&store).await.expect("load");
        assert!(cache.find_by_key("stale").is_none());
        assert_eq!(cache.len(), 1);
    }
}
