//! Task records for the board.
//!
//! Tasks live in a remote keyed record store and are mirrored into the
//! in-session [`crate::cache::TaskCache`]. Records written by older clients
//! may carry unknown status or priority strings; deserialization falls back
//! to the defensive defaults (`todo`, `medium`) instead of failing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workflow lane a task occupies. Exactly four, fixed order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Status {
    Todo,
    InProgress,
    AwaitingFeedback,
    Done,
}

impl Status {
    /// All lanes in board order.
    pub const ALL: [Status; 4] = [
        Status::Todo,
        Status::InProgress,
        Status::AwaitingFeedback,
        Status::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::AwaitingFeedback => "awaiting-feedback",
            Status::Done => "done",
        }
    }

    /// Parse a lane name. Returns `None` for anything outside the four lanes.
    pub fn parse(value: &str) -> Option<Status> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" | "to-do" => Some(Status::Todo),
            "in-progress" | "in_progress" => Some(Status::InProgress),
            "awaiting-feedback" | "awaiting_feedback" => Some(Status::AwaitingFeedback),
            "done" => Some(Status::Done),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Todo => "To do",
            Status::InProgress => "In progress",
            Status::AwaitingFeedback => "Awaiting feedback",
            Status::Done => "Done",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Todo
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        // Unrecognized statuses land in the first lane rather than erroring.
        Status::parse(&value).unwrap_or_default()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task urgency. Drives icon selection in the board projection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Priority {
    Low,
    Medium,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::Urgent => "urgent",
        }
    }

    pub fn parse(value: &str) -> Option<Priority> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::parse(&value).unwrap_or_default()
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task flavor shown as a colored badge on its card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Category {
    Technical,
    UserStory,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::UserStory => "user-story",
        }
    }

    pub fn parse(value: &str) -> Option<Category> {
        match value.trim().to_ascii_lowercase().as_str() {
            "technical" => Some(Category::Technical),
            "user-story" | "user_story" => Some(Category::UserStory),
            _ => None,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Technical
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::parse(&value).unwrap_or_default()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn new_subtask_id() -> Uuid {
    Uuid::new_v4()
}

/// One checklist line inside a task.
///
/// The `id` is assigned at creation and survives renames, so checklist rows
/// can be correlated across edits without leaning on mutable title text.
/// Records persisted before ids existed get a fresh one on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subtask {
    #[serde(default = "new_subtask_id")]
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_subtask_id(),
            title: title.into(),
            done: false,
        }
    }
}

/// A work item on the board.
///
/// `key` is assigned by the record store on first persist; a task built by
/// the creation flow holds `None` until the store round-trip returns one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_to: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            key: None,
            title: title.into(),
            description: String::new(),
            due_date: None,
            priority: Priority::default(),
            category: Category::default(),
            assigned_to: Vec::new(),
            subtasks: Vec::new(),
            status: Status::default(),
            created_at: Utc::now(),
        }
    }

    /// Add an assignee name, keeping set semantics over the stored list.
    pub fn assign(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.assigned_to.iter().any(|existing| *existing == name) {
            self.assigned_to.push(name);
        }
    }

    pub fn unassign(&mut self, name: &str) {
        self.assigned_to.retain(|existing| existing != name);
    }
}

/// Partial update for a task's scalar fields.
///
/// The store merges this shallowly onto the record; unset fields are left
/// untouched. Subtasks are deliberately absent: the store cannot patch list
/// elements, so the checklist travels through
/// [`crate::store::RecordStore::replace_subtasks`] instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl TaskPatch {
    /// Patch that only moves a task to another lane.
    pub fn status_only(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.assigned_to.is_none()
            && self.status.is_none()
    }

    /// Shallow merge onto a task, mirroring the store's server-side merge.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(assigned_to) = &self.assigned_to {
            task.assigned_to = assigned_to.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}
