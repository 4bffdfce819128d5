//! Configuration loading and management
//!
//! Handles parsing of `.lanes.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::contact::Contact;
use crate::error::{Error, Result};
use crate::task::{Priority, Status};

/// Name of the configuration file looked up next to the board.
pub const CONFIG_FILE: &str = ".lanes.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Board presentation configuration
    #[serde(default)]
    pub board: BoardConfig,

    /// Contact snapshot available to the board
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            board: BoardConfig::default(),
            contacts: Vec::new(),
        }
    }
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON document backing the board
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("board.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Board presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Assignee chips shown on a card before collapsing into an overflow
    /// count. The board renders 3 or 4.
    #[serde(default = "default_assignee_limit")]
    pub assignee_limit: usize,

    /// Lane for tasks created without an explicit status
    #[serde(default = "default_status")]
    pub default_status: String,

    /// Priority for tasks created without an explicit priority
    #[serde(default = "default_priority")]
    pub default_priority: String,
}

fn default_assignee_limit() -> usize {
    3
}

fn default_status() -> String {
    "todo".to_string()
}

fn default_priority() -> String {
    "medium".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            assignee_limit: default_assignee_limit(),
            default_status: default_status(),
            default_priority: default_priority(),
        }
    }
}

impl BoardConfig {
    pub fn default_status(&self) -> Status {
        Status::parse(&self.default_status).unwrap_or_default()
    }

    pub fn default_priority(&self) -> Priority {
        Priority::parse(&self.default_priority).unwrap_or_default()
    }
}

impl Config {
    /// Load configuration from a `.lanes.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(3..=4).contains(&self.board.assignee_limit) {
            return Err(Error::InvalidConfig(format!(
                "board.assignee_limit must be 3 or 4, got {}",
                self.board.assignee_limit
            )));
        }
        if Status::parse(&self.board.default_status).is_none() {
            return Err(Error::InvalidConfig(format!(
                "board.default_status '{}' is not a lane (todo|in-progress|awaiting-feedback|done)",
                self.board.default_status
            )));
        }
        if Priority::parse(&self.board.default_priority).is_none() {
            return Err(Error::InvalidConfig(format!(
                "board.default_priority '{}' is not low|medium|urgent",
                self.board.default_priority
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for contact in &self.contacts {
            if contact.name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "contacts entries need a non-empty name".to_string(),
                ));
            }
            if !seen.insert(contact.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "contacts has duplicate entry '{}'",
                    contact.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.store.path, PathBuf::from("board.json"));
        assert_eq!(cfg.board.assignee_limit, 3);
        assert_eq!(cfg.board.default_status(), Status::Todo);
        assert_eq!(cfg.board.default_priority(), Priority::Medium);
        assert!(cfg.contacts.is_empty());
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r##"
[store]
path = "boards/team.json"

[board]
assignee_limit = 4
default_status = "in-progress"
default_priority = "urgent"

[[contacts]]
name = "Ada Lovelace"
color = "#FF7A00"

[[contacts]]
name = "Grace Hopper"
color = "#1FD7C1"
"##;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.store.path, PathBuf::from("boards/team.json"));
        assert_eq!(cfg.board.assignee_limit, 4);
        assert_eq!(cfg.board.default_status(), Status::InProgress);
        assert_eq!(cfg.board.default_priority(), Priority::Urgent);
        assert_eq!(cfg.contacts.len(), 2);
        assert_eq!(cfg.contacts[1].name, "Grace Hopper");
    }

    #[test]
    fn invalid_assignee_limit_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[board]\nassignee_limit = 9").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn invalid_default_status_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[board]\ndefault_status = \"archived\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn duplicate_contact_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r##"
[[contacts]]
name = "Ada"
color = "#111111"

[[contacts]]
name = "Ada"
color = "#222222"
"##;
        fs::write(&path, content.trim()).expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn load_from_dir_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.board.assignee_limit, 3);
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        let cfg = Config::default();
        cfg.save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("assignee_limit = 3"));
    }
}
