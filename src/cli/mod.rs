//! Command-line interface for lanes
//!
//! This module defines the CLI structure using clap derive macros. Every
//! subcommand drives the same [`BoardController`] a rendering surface
//! would, against the JSON-file record store named in `.lanes.toml`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::board::BoardView;
use crate::checklist;
use crate::config::Config;
use crate::contact::ContactDirectory;
use crate::controller::{BoardController, Command};
use crate::error::{Error, Result};
use crate::jsonstore::JsonFileStore;
use crate::output::{emit_success, OutputOptions};
use crate::task::{Category, Priority, Status, Subtask, Task, TaskPatch};

/// lanes - task board controller
///
/// Keeps a four-lane task board synchronized with a keyed record store,
/// with optimistic local updates ahead of remote confirmation.
#[derive(Parser, Debug)]
#[command(name = "lanes")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to `.lanes.toml` (defaults to the current directory's)
    #[arg(long, global = true, env = "LANES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default `.lanes.toml` in the current directory
    Init,

    /// Show the board, optionally filtered
    Board {
        /// Case-insensitive substring over title or description
        #[arg(long)]
        search: Option<String>,
    },

    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Priority: low, medium, urgent
        #[arg(long)]
        priority: Option<String>,

        /// Category: technical, user-story
        #[arg(long)]
        category: Option<String>,

        /// Assignee names (repeatable)
        #[arg(long = "assignee")]
        assignees: Vec<String>,

        /// Lane: todo, in-progress, awaiting-feedback, done
        #[arg(long)]
        lane: Option<String>,
    },

    /// Move a task to another lane (drag and drop)
    Move {
        /// Task key
        key: String,

        /// Target lane
        lane: String,
    },

    /// Edit a task's fields
    Edit {
        /// Task key
        key: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Priority: low, medium, urgent
        #[arg(long)]
        priority: Option<String>,

        /// Category: technical, user-story
        #[arg(long)]
        category: Option<String>,

        /// Lane: todo, in-progress, awaiting-feedback, done
        #[arg(long)]
        lane: Option<String>,
    },

    /// Toggle a checklist row
    Check {
        /// Task key
        key: String,

        /// Row index, zero-based
        index: usize,
    },

    /// Checklist row management
    #[command(subcommand)]
    Subtask(SubtaskCommands),

    /// Delete a task
    Rm {
        /// Task key
        key: String,
    },
}

/// Subtask subcommands
#[derive(Subcommand, Debug)]
pub enum SubtaskCommands {
    /// Append a checklist row
    Add {
        /// Task key
        key: String,

        /// Row title
        title: String,
    },

    /// Rename a checklist row (by id or current title)
    Rename {
        /// Task key
        key: String,

        /// Row id or current title
        ident: String,

        /// New title
        title: String,
    },

    /// Remove a checklist row (by id or title)
    Rm {
        /// Task key
        key: String,

        /// Row id or title
        ident: String,
    },
}

impl Cli {
    /// Run the parsed command to completion
    pub fn run(self) -> Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.run_async())
    }

    async fn run_async(self) -> Result<()> {
        let options = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        if let Commands::Init = self.command {
            let path = PathBuf::from(crate::config::CONFIG_FILE);
            let config = Config::default();
            config.save(&path)?;
            return emit_success(
                options,
                "init",
                &serde_json::json!({ "config": path }),
                &[format!("Wrote {}", path.display())],
            );
        }

        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_from_dir(std::path::Path::new(".")),
        };
        let store = JsonFileStore::new(config.store.path.clone());
        let contacts = ContactDirectory::new(config.contacts.clone());
        let mut controller =
            BoardController::new(Box::new(store), contacts, config.board.assignee_limit);
        controller.refresh().await?;

        match self.command {
            Commands::Init => unreachable!("handled above"),

            Commands::Board { search } => {
                let search = search.unwrap_or_default();
                let view = controller.board(&search);
                emit_success(options, "board", &view, &board_lines(&view))
            }

            Commands::Add {
                title,
                description,
                due,
                priority,
                category,
                assignees,
                lane,
            } => {
                let mut task = Task::new(title);
                task.description = description;
                task.due_date = due.as_deref().map(parse_due).transpose()?;
                task.priority = match priority {
                    Some(value) => parse_priority(&value)?,
                    None => config.board.default_priority(),
                };
                if let Some(value) = category {
                    task.category = parse_category(&value)?;
                }
                task.status = match lane {
                    Some(value) => parse_lane(&value)?,
                    None => config.board.default_status(),
                };
                for name in assignees {
                    task.assign(name);
                }

                let title = task.title.clone();
                if title.trim().is_empty() {
                    return Err(Error::Validation("task title cannot be blank".to_string()));
                }
                controller.dispatch(Command::TaskCreated { task }).await?;
                let key = controller
                    .cache()
                    .iter()
                    .last()
                    .and_then(|task| task.key.clone())
                    .unwrap_or_default();
                emit_success(
                    options,
                    "add",
                    &serde_json::json!({ "key": key }),
                    &[format!("Created {key}: {title}")],
                )
            }

            Commands::Move { key, lane } => {
                let lane = parse_lane(&lane)?;
                controller
                    .dispatch(Command::DragDropped {
                        key: key.clone(),
                        lane,
                    })
                    .await?;
                emit_success(
                    options,
                    "move",
                    &serde_json::json!({ "key": key, "lane": lane }),
                    &[format!("Moved {key} to {lane}")],
                )
            }

            Commands::Edit {
                key,
                title,
                description,
                due,
                priority,
                category,
                lane,
            } => {
                let patch = TaskPatch {
                    title,
                    description,
                    due_date: due.as_deref().map(parse_due).transpose()?,
                    priority: priority.as_deref().map(parse_priority).transpose()?,
                    category: category.as_deref().map(parse_category).transpose()?,
                    assigned_to: None,
                    status: lane.as_deref().map(parse_lane).transpose()?,
                };
                if patch.is_empty() {
                    return Err(Error::InvalidArgument(
                        "nothing to edit: pass at least one field flag".to_string(),
                    ));
                }
                if let Some(title) = &patch.title {
                    if title.trim().is_empty() {
                        return Err(Error::Validation("task title cannot be blank".to_string()));
                    }
                }
                controller
                    .dispatch(Command::EditCommitted {
                        key: key.clone(),
                        patch,
                        subtasks: None,
                    })
                    .await?;
                emit_success(
                    options,
                    "edit",
                    &serde_json::json!({ "key": key }),
                    &[format!("Updated {key}")],
                )
            }

            Commands::Check { key, index } => {
                controller
                    .dispatch(Command::SubtaskToggled {
                        key: key.clone(),
                        index,
                    })
                    .await?;
                let label = controller
                    .cache()
                    .find_by_key(&key)
                    .and_then(|task| checklist::progress(&task.subtasks))
                    .map(|progress| progress.label())
                    .unwrap_or_default();
                emit_success(
                    options,
                    "check",
                    &serde_json::json!({ "key": key, "progress": label }),
                    &[format!("Checklist {label} on {key}")],
                )
            }

            Commands::Subtask(subcommand) => run_subtask(&mut controller, options, subcommand).await,

            Commands::Rm { key } => {
                controller
                    .dispatch(Command::TaskDeleted { key: key.clone() })
                    .await?;
                emit_success(
                    options,
                    "rm",
                    &serde_json::json!({ "key": key }),
                    &[format!("Deleted {key}")],
                )
            }
        }
    }
}

async fn run_subtask(
    controller: &mut BoardController,
    options: OutputOptions,
    subcommand: SubtaskCommands,
) -> Result<()> {
    let (key, mutate): (String, Box<dyn FnOnce(&mut Vec<Subtask>) -> Result<()>>) =
        match subcommand {
            SubtaskCommands::Add { key, title } => {
                (key, Box::new(move |rows| checklist::add(rows, &title)))
            }
            SubtaskCommands::Rename { key, ident, title } => (
                key,
                Box::new(move |rows| checklist::rename(rows, &ident, &title)),
            ),
            SubtaskCommands::Rm { key, ident } => {
                (key, Box::new(move |rows| checklist::remove(rows, &ident)))
            }
        };

    let mut rows = controller
        .cache()
        .find_by_key(&key)
        .ok_or_else(|| Error::State(key.clone()))?
        .subtasks
        .clone();
    mutate(&mut rows)?;

    controller
        .dispatch(Command::EditCommitted {
            key: key.clone(),
            patch: TaskPatch::default(),
            subtasks: Some(rows.clone()),
        })
        .await?;

    let label = checklist::progress(&rows)
        .map(|progress| progress.label())
        .unwrap_or_else(|| "empty".to_string());
    emit_success(
        options,
        "subtask",
        &serde_json::json!({ "key": key, "rows": rows.len(), "progress": label }),
        &[format!("Checklist now {} row(s) on {key}", rows.len())],
    )
}

fn board_lines(view: &BoardView) -> Vec<String> {
    let mut lines = Vec::new();
    for lane in &view.lanes {
        lines.push(format!("{} ({})", lane.status.label(), lane.cards.len()));
        if lane.no_results {
            lines.push("  (no matching tasks)".to_string());
        }
        for card in &lane.cards {
            let mut line = format!("  {}  {}", card.key, card.title);
            if let Some(progress) = card.progress {
                line.push_str(&format!("  [{}]", progress.label()));
            }
            line.push_str(&format!("  ({})", card.priority));
            if card.assignee_overflow > 0 {
                line.push_str(&format!("  +{}", card.assignee_overflow));
            }
            lines.push(line);
        }
        lines.push(String::new());
    }
    lines
}

fn parse_due(value: &str) -> Result<NaiveDate> {
    value
        .parse::<NaiveDate>()
        .map_err(|_| Error::InvalidArgument(format!("invalid date '{value}': expected YYYY-MM-DD")))
}

fn parse_priority(value: &str) -> Result<Priority> {
    Priority::parse(value).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "invalid priority '{value}': must be low, medium, or urgent"
        ))
    })
}

fn parse_category(value: &str) -> Result<Category> {
    Category::parse(value).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "invalid category '{value}': must be technical or user-story"
        ))
    })
}

fn parse_lane(value: &str) -> Result<Status> {
    Status::parse(value).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "invalid lane '{value}': must be todo, in-progress, awaiting-feedback, or done"
        ))
    })
}
