//! Command dispatch for the board.
//!
//! UI gestures arrive as [`Command`] values and flow through one
//! dispatcher that owns the cache, the drag slot, and the store. That
//! keeps the core fully exercisable without any rendering surface: a test
//! builds a controller over a [`crate::store::MemoryStore`] and feeds it
//! the same commands a UI would.

use tracing::debug;

use crate::board::{self, BoardView};
use crate::cache::TaskCache;
use crate::checklist;
use crate::contact::ContactDirectory;
use crate::dragdrop::DragMachine;
use crate::error::{Error, Result};
use crate::store::RecordStore;
use crate::task::{Status, Subtask, Task, TaskPatch};

/// One user action against the board.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Full refresh of the cache from the store.
    Refreshed,
    /// A drag gesture completed over a lane.
    DragDropped { key: String, lane: Status },
    /// A checklist box was ticked on a card or in the overlay.
    SubtaskToggled { key: String, index: usize },
    /// An overlay edit was saved. `subtasks` is the whole replacement list,
    /// `None` when the checklist was not touched.
    EditCommitted {
        key: String,
        patch: TaskPatch,
        subtasks: Option<Vec<Subtask>>,
    },
    /// The creation flow submitted a new, still keyless task.
    TaskCreated { task: Task },
    /// A delete was confirmed.
    TaskDeleted { key: String },
}

/// Owns the board state and applies commands to cache and store.
pub struct BoardController {
    store: Box<dyn RecordStore>,
    cache: TaskCache,
    drag: DragMachine,
    contacts: ContactDirectory,
    assignee_limit: usize,
}

impl BoardController {
    pub fn new(store: Box<dyn RecordStore>, contacts: ContactDirectory, assignee_limit: usize) -> Self {
        Self {
            store,
            cache: TaskCache::new(),
            drag: DragMachine::new(),
            contacts,
            assignee_limit,
        }
    }

    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    /// Project the current cache into the four-lane view.
    pub fn board(&self, search: &str) -> BoardView {
        board::project(&self.cache, &self.contacts, search, self.assignee_limit)
    }

    /// Replace the contact snapshot, e.g. alongside a full board load.
    pub fn set_contacts(&mut self, contacts: ContactDirectory) {
        self.contacts = contacts;
    }

    pub async fn refresh(&mut self) -> Result<()> {
        self.cache.load_all(self.store.as_ref()).await
    }

    /// Apply one command: cache mutation plus whatever store calls the
    /// command implies. Each failure is scoped to this one command; the
    /// board stays interactive.
    pub async fn dispatch(&mut self, command: Command) -> Result<()> {
        debug!(?command, "dispatch");
        match command {
            Command::Refreshed => self.refresh().await,

            Command::DragDropped { key, lane } => {
                self.drag.begin(&self.cache, &key)?;
                self.drag
                    .drop_on(&mut self.cache, self.store.as_ref(), lane)
                    .await
            }

            Command::SubtaskToggled { key, index } => {
                let task = self
                    .cache
                    .find_by_key_mut(&key)
                    .ok_or_else(|| Error::State(key.clone()))?;
                checklist::toggle_and_persist(self.store.as_ref(), task, index).await
            }

            Command::EditCommitted {
                key,
                patch,
                subtasks,
            } => {
                let original = self
                    .cache
                    .find_by_key(&key)
                    .cloned()
                    .ok_or_else(|| Error::State(key.clone()))?;

                if !patch.is_empty() {
                    self.store.patch(&key, &patch).await?;
                }
                if let Some(subtasks) = &subtasks {
                    self.store.replace_subtasks(&key, subtasks).await?;
                }

                let mut merged = original;
                patch.apply_to(&mut merged);
                if let Some(subtasks) = subtasks {
                    merged.subtasks = subtasks;
                }
                self.cache.upsert(merged);
                Ok(())
            }

            Command::TaskCreated { mut task } => {
                let key = self.store.create(&task).await?;
                task.key = Some(key);
                self.cache.upsert(task);
                Ok(())
            }

            Command::TaskDeleted { key } => {
                self.store.delete(&key).await?;
                self.cache.remove(&key);
                Ok(())
            }
        }
    }
}
