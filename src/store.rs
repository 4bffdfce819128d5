//! Record store adapter.
//!
//! The board talks to a remote keyed document store through the
//! [`RecordStore`] trait: fetch-all, create, shallow patch, whole-field
//! subtask replacement, delete. Calls are asynchronous and may fail; the
//! adapter never retries, a failure is surfaced to the invoking action.
//!
//! [`MemoryStore`] is the in-process implementation used by tests and by
//! anything that wants a board without a backing file. It supports one-shot
//! failure injection so commit/drag failure paths can be exercised.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::task::{Subtask, Task, TaskPatch};

/// Remote keyed record store surface.
///
/// A multi-field [`patch`](RecordStore::patch) is atomic as a unit; two
/// sequential calls from different actions are not protected against
/// interleaving with a concurrent writer. Accepted for single-user accounts.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every task keyed by its store key. Empty map when the account
    /// has no tasks yet.
    async fn fetch_all(&self) -> Result<BTreeMap<String, Task>>;

    /// Persist a new task. The store assigns and returns the key.
    async fn create(&self, task: &Task) -> Result<String>;

    /// Server-side shallow merge of the given fields onto the record.
    ///
    /// Patching an absent key is a hard [`Error::NotFound`].
    async fn patch(&self, key: &str, patch: &TaskPatch) -> Result<()>;

    /// Wholesale overwrite of the subtasks array. The store cannot patch
    /// individual list elements, so the checklist always travels whole.
    ///
    /// Replacing on an absent key is a hard [`Error::NotFound`].
    async fn replace_subtasks(&self, key: &str, subtasks: &[Subtask]) -> Result<()>;

    /// Remove the record. Deleting an absent key succeeds: the outcome the
    /// caller asked for already holds.
    async fn delete(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    records: BTreeMap<String, Task>,
    fail_in: Option<(u32, String)>,
}

/// In-process record store with store-assigned ULID keys.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-seeded with tasks. Keyless tasks get a key.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock().expect("memory store lock");
            for mut task in tasks {
                let key = task
                    .key
                    .clone()
                    .unwrap_or_else(|| Ulid::new().to_string().to_ascii_lowercase());
                task.key = Some(key.clone());
                inner.records.insert(key, task);
            }
        }
        store
    }

    /// Make the next store call fail with a transport error.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.fail_in(1, message);
    }

    /// Make the `nth` upcoming store call (1-based) fail; calls before it
    /// succeed. Lets tests break the second leg of a two-call commit.
    pub fn fail_in(&self, nth: u32, message: impl Into<String>) {
        let mut inner = self.inner.lock().expect("memory store lock");
        inner.fail_in = Some((nth, message.into()));
    }

    fn take_failure(inner: &mut MemoryInner) -> Result<()> {
        match inner.fail_in.take() {
            Some((1, message)) => Err(Error::Transport(message)),
            Some((nth, message)) => {
                inner.fail_in = Some((nth - 1, message));
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_all(&self) -> Result<BTreeMap<String, Task>> {
        let mut inner = self.inner.lock().expect("memory store lock");
        Self::take_failure(&mut inner)?;
        Ok(inner.records.clone())
    }

    async fn create(&self, task: &Task) -> Result<String> {
        let mut inner = self.inner.lock().expect("memory store lock");
        Self::take_failure(&mut inner)?;
        let key = Ulid::new().to_string().to_ascii_lowercase();
        let mut stored = task.clone();
        stored.key = Some(key.clone());
        inner.records.insert(key.clone(), stored);
        Ok(key)
    }

    async fn patch(&self, key: &str, patch: &TaskPatch) -> Result<()> {
        let mut inner = self.inner.lock().expect("memory store lock");
        Self::take_failure(&mut inner)?;
        match inner.records.get_mut(key) {
            Some(task) => {
                patch.apply_to(task);
                Ok(())
            }
            None => Err(Error::NotFound(key.to_string())),
        }
    }

    async fn replace_subtasks(&self, key: &str, subtasks: &[Subtask]) -> Result<()> {
        let mut inner = self.inner.lock().expect("memory store lock");
        Self::take_failure(&mut inner)?;
        match inner.records.get_mut(key) {
            Some(task) => {
                task.subtasks = subtasks.to_vec();
                Ok(())
            }
            None => Err(Error::NotFound(key.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("memory store lock");
        Self::take_failure(&mut inner)?;
        inner.records.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Status;

    #[tokio::test]
    async fn create_assigns_a_key() {
        let store = MemoryStore::new();
        let key = store.create(&Task::new("first")).await.expect("create");
        assert!(!key.is_empty());

        let all = store.fetch_all().await.expect("fetch");
        assert_eq!(all.len(), 1);
        assert_eq!(all[&key].title, "first");
        assert_eq!(all[&key].key.as_deref(), Some(key.as_str()));
    }

    #[tokio::test]
    async fn patch_merges_shallowly() {
        let store = MemoryStore::new();
        let key = store.create(&Task::new("t")).await.expect("create");
        store
            .patch(&key, &TaskPatch::status_only(Status::Done))
            .await
            .expect("patch");

        let all = store.fetch_all().await.expect("fetch");
        assert_eq!(all[&key].status, Status::Done);
        assert_eq!(all[&key].title, "t");
    }

    #[tokio::test]
    async fn patch_missing_key_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .patch("nope", &TaskPatch::status_only(Status::Done))
            .await
            .expect_err("missing key");
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let key = store.create(&Task::new("t")).await.expect("create");
        store.delete(&key).await.expect("first delete");
        store.delete(&key).await.expect("second delete");
        assert!(store.fetch_all().await.expect("fetch").is_empty());
    }

    #[tokio::test]
    async fn injected_failure_hits_exactly_one_call() {
        let store = MemoryStore::new();
        store.fail_next("store down");
        let err = store.fetch_all().await.expect_err("injected failure");
        assert!(matches!(err, Error::Transport(_)));
        store.fetch_all().await.expect("next call succeeds");
    }
}
