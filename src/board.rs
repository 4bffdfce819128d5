//! Board projection.
//!
//! Pure derivation of the four status lanes from the task cache plus an
//! optional search string. Nothing in here mutates state; rendering
//! consumes the returned view-models and decides layout on its own.

use serde::Serialize;

use crate::cache::TaskCache;
use crate::checklist::{self, ChecklistProgress};
use crate::contact::ContactDirectory;
use crate::task::{Category, Priority, Status, Task};

/// Assignee avatar chip, resolved against the contact snapshot.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AssigneeChip {
    pub name: String,
    pub color: String,
}

/// View-model for one card on the board.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskCard {
    pub key: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ChecklistProgress>,
    /// Resolved chips, truncated to the display limit.
    pub assignees: Vec<AssigneeChip>,
    /// How many resolved assignees did not fit the display limit.
    pub assignee_overflow: usize,
}

/// One of the four board columns.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Lane {
    pub status: Status,
    pub cards: Vec<TaskCard>,
    /// Set while a search is active and this lane matched nothing, so the
    /// lane renders an explicit indicator instead of appearing empty.
    pub no_results: bool,
}

/// Projection of the whole board.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoardView {
    pub lanes: Vec<Lane>,
}

impl BoardView {
    pub fn lane(&self, status: Status) -> &Lane {
        // Lanes are built from Status::ALL, one per status.
        self.lanes
            .iter()
            .find(|lane| lane.status == status)
            .unwrap_or_else(|| unreachable!("board view always carries four lanes"))
    }
}

/// Project the cache into four ordered lanes.
///
/// Search is a case-insensitive substring match over title OR description;
/// an empty string means unfiltered. `assignee_limit` is the number of
/// chips a card shows before collapsing the rest into an overflow count.
pub fn project(
    cache: &TaskCache,
    contacts: &ContactDirectory,
    search: &str,
    assignee_limit: usize,
) -> BoardView {
    let needle = search.trim().to_lowercase();
    let searching = !needle.is_empty();

    let mut lanes: Vec<Lane> = Status::ALL
        .iter()
        .map(|status| Lane {
            status: *status,
            cards: Vec::new(),
            no_results: false,
        })
        .collect();

    for task in cache.iter() {
        let Some(key) = task.key.as_deref() else {
            continue;
        };
        if searching && !matches_search(task, &needle) {
            continue;
        }
        let card = card_for(key, task, contacts, assignee_limit);
        if let Some(lane) = lanes.iter_mut().find(|lane| lane.status == task.status) {
            lane.cards.push(card);
        }
    }

    if searching {
        for lane in &mut lanes {
            lane.no_results = lane.cards.is_empty();
        }
    }

    BoardView { lanes }
}

fn matches_search(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || task.description.to_lowercase().contains(needle)
}

fn card_for(
    key: &str,
    task: &Task,
    contacts: &ContactDirectory,
    assignee_limit: usize,
) -> TaskCard {
    let resolved = contacts.resolve_all(&task.assigned_to);
    let shown = resolved.len().min(assignee_limit);
    let assignees = resolved[..shown]
        .iter()
        .map(|contact| AssigneeChip {
            name: contact.name.clone(),
            color: contact.color.clone(),
        })
        .collect();

    TaskCard {
        key: key.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        priority: task.priority,
        category: task.category,
        status: task.status,
        progress: checklist::progress(&task.subtasks),
        assignees,
        assignee_overflow: resolved.len() - shown,
    }
}
