//! JSON-file record store.
//!
//! Backs the CLI with the same `key -> task` document shape the remote
//! store serves, held in a single JSON file. Writes go through the
//! write-temp-then-rename pattern so the document is either fully written
//! or untouched. Failures to reach the file surface as
//! [`Error::Transport`], matching what the remote adapter would report.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::store::RecordStore;
use crate::task::{Subtask, Task, TaskPatch};

/// Record store backed by one JSON document file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, Task>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|err| Error::Transport(format!("read {}: {err}", self.path.display())))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let records: BTreeMap<String, Task> = serde_json::from_str(&content)?;
        Ok(records)
    }

    fn write_document(&self, records: &BTreeMap<String, Task>) -> Result<()> {
        let data = serde_json::to_string_pretty(records)?;
        write_atomic(&self.path, data.as_bytes())
            .map_err(|err| Error::Transport(format!("write {}: {err}", self.path.display())))
    }
}

/// Write to a temp file in the same directory, then rename over the target.
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // Temp file in the same directory so the rename stays on one filesystem.
    let temp_path = path.with_extension(format!("tmp.{}", std::process::id()));

    let mut temp_file = File::create(&temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()?;
    drop(temp_file);

    fs::rename(&temp_path, path)
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn fetch_all(&self) -> Result<BTreeMap<String, Task>> {
        self.read_document()
    }

    async fn create(&self, task: &Task) -> Result<String> {
        let mut records = self.read_document()?;
        let key = Ulid::new().to_string().to_ascii_lowercase();
        let mut stored = task.clone();
        stored.key = Some(key.clone());
        records.insert(key.clone(), stored);
        self.write_document(&records)?;
        Ok(key)
    }

    async fn patch(&self, key: &str, patch: &TaskPatch) -> Result<()> {
        let mut records = self.read_document()?;
        let task = records
            .get_mut(key)
            .ok_or_else(|| Error::NotFound(key.to_string()))?;
        patch.apply_to(task);
        self.write_document(&records)
    }

    async fn replace_subtasks(&self, key: &str, subtasks: &[Subtask]) -> Result<()> {
        let mut records = self.read_document()?;
        let task = records
            .get_mut(key)
            .ok_or_else(|| Error::NotFound(key.to_string()))?;
        task.subtasks = subtasks.to_vec();
        self.write_document(&records)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut records = self.read_document()?;
        if records.remove(key).is_none() {
            // Already gone; the caller asked for an absent record.
            return Ok(());
        }
        self.write_document(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Status;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("board.json"))
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        assert!(store.fetch_all().await.expect("fetch").is_empty());
    }

    #[tokio::test]
    async fn create_then_fetch_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        let mut task = Task::new("ship it");
        task.status = Status::InProgress;
        let key = store.create(&task).await.expect("create");

        let all = store.fetch_all().await.expect("fetch");
        assert_eq!(all.len(), 1);
        assert_eq!(all[&key].title, "ship it");
        assert_eq!(all[&key].status, Status::InProgress);
    }

    #[tokio::test]
    async fn patch_missing_key_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let err = store
            .patch("absent", &TaskPatch::status_only(Status::Done))
            .await
            .expect_err("missing key");
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_missing_key_succeeds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.delete("absent").await.expect("idempotent delete");
    }

    #[tokio::test]
    async fn replace_subtasks_overwrites_whole_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let key = store.create(&Task::new("t")).await.expect("create");

        let subtasks = vec![Subtask::new("a"), Subtask::new("b")];
        store
            .replace_subtasks(&key, &subtasks)
            .await
            .expect("replace");

        let all = store.fetch_all().await.expect("fetch");
        assert_eq!(all[&key].subtasks.len(), 2);
        assert_eq!(all[&key].subtasks[1].title, "b");
    }
}
