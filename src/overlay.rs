//! Overlay edit session.
//!
//! The overlay is the detail view for one task: `Closed -> Viewing(key) ->
//! Editing(key)` and back. Entering edit snapshots the task's fields into
//! an [`EditBuffer`] disjoint from the cache entry, so closing without a
//! commit never mutates the board. The same session drives the creation
//! flow: a keyless buffer that only enters the cache once the store has
//! assigned a key.
//!
//! Commit order is store-first: one scalar patch plus one subtask
//! replacement, and the cache is updated only after both resolve. On
//! failure the prior cache entry stays authoritative and the session stays
//! in `Editing` with the buffer intact.

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use crate::cache::TaskCache;
use crate::error::{Error, Result};
use crate::store::RecordStore;
use crate::task::{Category, Priority, Status, Subtask, Task, TaskPatch};

/// Working copy of a task's editable fields, seeded when editing begins.
///
/// Every field holds a full value, so "unspecified" simply means the user
/// left the seeded value alone; commit never falls back to empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub category: Category,
    pub assigned_to: Vec<String>,
    pub subtasks: Vec<Subtask>,
    pub status: Status,
}

impl EditBuffer {
    fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            priority: task.priority,
            category: task.category,
            assigned_to: task.assigned_to.clone(),
            subtasks: task.subtasks.clone(),
            status: task.status,
        }
    }

    fn blank() -> Self {
        Self::from_task(&Task::new(""))
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("task title cannot be blank".to_string()));
        }
        Ok(())
    }

    /// Scalar fields as one atomic patch; subtasks travel separately.
    fn scalar_patch(&self) -> TaskPatch {
        TaskPatch {
            title: Some(self.title.trim().to_string()),
            description: Some(self.description.clone()),
            due_date: self.due_date,
            priority: Some(self.priority),
            category: Some(self.category),
            assigned_to: Some(self.assigned_to.clone()),
            status: Some(self.status),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum OverlayState {
    Closed,
    Viewing { key: String },
    Editing { key: String, buffer: EditBuffer },
    Creating { buffer: EditBuffer },
}

/// Session state for the task detail overlay.
#[derive(Debug, Clone)]
pub struct OverlaySession {
    state: OverlayState,
}

impl Default for OverlaySession {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlaySession {
    pub fn new() -> Self {
        Self {
            state: OverlayState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, OverlayState::Closed)
    }

    /// Key of the task the overlay is showing or editing.
    pub fn key(&self) -> Option<&str> {
        match &self.state {
            OverlayState::Viewing { key } | OverlayState::Editing { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Open the overlay in read-only view over one task.
    pub fn open(&mut self, cache: &TaskCache, key: &str) -> Result<()> {
        if cache.find_by_key(key).is_none() {
            return Err(Error::State(key.to_string()));
        }
        self.state = OverlayState::Viewing {
            key: key.to_string(),
        };
        Ok(())
    }

    /// Read-only projection of the task under view.
    pub fn view<'a>(&self, cache: &'a TaskCache) -> Option<&'a Task> {
        self.key().and_then(|key| cache.find_by_key(key))
    }

    /// Snapshot the viewed task into an edit buffer and switch to editing.
    pub fn begin_edit(&mut self, cache: &TaskCache) -> Result<&mut EditBuffer> {
        let OverlayState::Viewing { key } = &self.state else {
            return Err(Error::State("overlay is not viewing a task".to_string()));
        };
        let key = key.clone();
        let task = cache
            .find_by_key(&key)
            .ok_or_else(|| Error::State(key.clone()))?;
        self.state = OverlayState::Editing {
            key,
            buffer: EditBuffer::from_task(task),
        };
        match &mut self.state {
            OverlayState::Editing { buffer, .. } => Ok(buffer),
            _ => unreachable!(),
        }
    }

    /// Open the creation flow with an empty buffer. The task carries no key
    /// until commit returns one from the store.
    pub fn open_new(&mut self, status: Status) -> &mut EditBuffer {
        let mut buffer = EditBuffer::blank();
        buffer.status = status;
        self.state = OverlayState::Creating { buffer };
        match &mut self.state {
            OverlayState::Creating { buffer } => buffer,
            _ => unreachable!(),
        }
    }

    /// Buffer under edit, if the session is in an editing or creating state.
    pub fn buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        match &mut self.state {
            OverlayState::Editing { buffer, .. } | OverlayState::Creating { buffer } => {
                Some(buffer)
            }
            _ => None,
        }
    }

    /// Close the overlay. An unsaved buffer is discarded silently.
    pub fn close(&mut self) {
        if matches!(self.state, OverlayState::Editing { .. } | OverlayState::Creating { .. }) {
            debug!("overlay closed with unsaved buffer, discarding");
        }
        self.state = OverlayState::Closed;
    }

    /// Commit the buffer: store round-trip first, cache update after.
    ///
    /// Editing sends one scalar patch and one subtask replacement, then
    /// upserts the merged task so reopening reflects the save without a
    /// reload. Creating sends `create`, receives the key, and only then
    /// inserts into the cache. Either way a failure leaves the cache at
    /// its pre-edit value and the session still editing.
    pub async fn commit(
        &mut self,
        cache: &mut TaskCache,
        store: &dyn RecordStore,
    ) -> Result<()> {
        match &self.state {
            OverlayState::Editing { key, buffer } => {
                buffer.validate()?;
                let key = key.clone();
                let original = cache
                    .find_by_key(&key)
                    .cloned()
                    .ok_or_else(|| Error::State(key.clone()))?;

                let patch = buffer.scalar_patch();
                let subtasks = buffer.subtasks.clone();

                if let Err(err) = store.patch(&key, &patch).await {
                    warn!(key = %key, error = %err, "edit commit failed at patch");
                    return Err(err);
                }
                if let Err(err) = store.replace_subtasks(&key, &subtasks).await {
                    warn!(key = %key, error = %err, "edit commit failed at subtask replace");
                    return Err(err);
                }

                let mut merged = original;
                patch.apply_to(&mut merged);
                merged.subtasks = subtasks;
                cache.upsert(merged);
                self.state = OverlayState::Viewing { key };
                Ok(())
            }
            OverlayState::Creating { buffer } => {
                buffer.validate()?;
                let mut task = Task {
                    key: None,
                    title: buffer.title.trim().to_string(),
                    description: buffer.description.clone(),
                    due_date: buffer.due_date,
                    priority: buffer.priority,
                    category: buffer.category,
                    assigned_to: buffer.assigned_to.clone(),
                    subtasks: buffer.subtasks.clone(),
                    status: buffer.status,
                    created_at: Utc::now(),
                };
                let key = store.create(&task).await?;
                task.key = Some(key.clone());
                cache.upsert(task);
                self.state = OverlayState::Viewing { key };
                Ok(())
            }
            _ => Err(Error::State("overlay has nothing to commit".to_string())),
        }
    }

    /// Delete the task under the overlay. A record already gone from the
    /// store counts as success; the cache entry is removed either way.
    pub async fn delete(
        &mut self,
        cache: &mut TaskCache,
        store: &dyn RecordStore,
    ) -> Result<()> {
        let key = self
            .key()
            .map(str::to_string)
            .ok_or_else(|| Error::State("overlay has no task to delete".to_string()))?;
        store.delete(&key).await?;
        cache.remove(&key);
        self.state = OverlayState::Closed;
        Ok(())
    }
}
