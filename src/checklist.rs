//! Subtask checklist engine.
//!
//! Operates on one task's ordered subtask list: add, toggle, rename,
//! remove, progress derivation. Rows are matched by their stable id when
//! the caller has one, falling back to exact title text for callers that
//! only kept the title string across a UI rebuild.
//!
//! Toggling persists eagerly: the whole subtasks array goes to the store
//! immediately, outside any open edit buffer. Ticking a box is frequent
//! and low-risk, so it bypasses the explicit-save gate other field edits
//! go through.

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::RecordStore;
use crate::task::{Subtask, Task};

/// Completed/total counts for a checklist.
///
/// Only derived when the list is non-empty; a task without subtasks shows
/// no indicator rather than a 0/0 or NaN fraction.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub done: usize,
    pub total: usize,
}

impl ChecklistProgress {
    pub fn label(&self) -> String {
        format!("{}/{}", self.done, self.total)
    }
}

/// Derive progress, or `None` for an empty checklist.
pub fn progress(subtasks: &[Subtask]) -> Option<ChecklistProgress> {
    if subtasks.is_empty() {
        return None;
    }
    Some(ChecklistProgress {
        done: subtasks.iter().filter(|subtask| subtask.done).count(),
        total: subtasks.len(),
    })
}

/// Append a new unchecked row. Blank titles are rejected before any
/// network call happens.
pub fn add(subtasks: &mut Vec<Subtask>, title: &str) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::Validation("subtask title cannot be blank".to_string()));
    }
    subtasks.push(Subtask::new(title));
    Ok(())
}

/// Flip the completed flag at `index`.
pub fn toggle(subtasks: &mut [Subtask], index: usize) -> Result<()> {
    match subtasks.get_mut(index) {
        Some(subtask) => {
            subtask.done = !subtask.done;
            Ok(())
        }
        None => Err(Error::State(format!("no subtask at index {index}"))),
    }
}

/// Rename the row identified by `ident` (stable id, or title fallback).
pub fn rename(subtasks: &mut [Subtask], ident: &str, new_title: &str) -> Result<()> {
    let new_title = new_title.trim();
    if new_title.is_empty() {
        return Err(Error::Validation("subtask title cannot be blank".to_string()));
    }
    let index = resolve(subtasks, ident)?;
    subtasks[index].title = new_title.to_string();
    Ok(())
}

/// Remove the row identified by `ident` (stable id, or title fallback).
pub fn remove(subtasks: &mut Vec<Subtask>, ident: &str) -> Result<()> {
    let index = resolve(subtasks, ident)?;
    subtasks.remove(index);
    Ok(())
}

/// Flip a row and write the whole array to the store right away.
///
/// The local flip stays applied even when the write fails; the caller gets
/// the error and the board keeps showing the user's click.
pub async fn toggle_and_persist(
    store: &dyn RecordStore,
    task: &mut Task,
    index: usize,
) -> Result<()> {
    toggle(&mut task.subtasks, index)?;
    let key = task
        .key
        .clone()
        .ok_or_else(|| Error::State("task has never been persisted".to_string()))?;
    if let Err(err) = store.replace_subtasks(&key, &task.subtasks).await {
        warn!(key = %key, error = %err, "subtask toggle did not persist");
        return Err(err);
    }
    Ok(())
}

/// Resolve an identifier to a row index: stable id first, then the first
/// row with an exactly matching title.
fn resolve(subtasks: &[Subtask], ident: &str) -> Result<usize> {
    if let Ok(id) = ident.parse::<Uuid>() {
        if let Some(index) = subtasks.iter().position(|subtask| subtask.id == id) {
            return Ok(index);
        }
    }
    subtasks
        .iter()
        .position(|subtask| subtask.title == ident)
        .ok_or_else(|| Error::State(format!("no subtask matching '{ident}'")))
}
