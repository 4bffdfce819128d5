//! Contact snapshot for assignee resolution.
//!
//! Contacts belong to a separate address-book feature; the board only sees a
//! read-only `{name, color}` snapshot taken per full load. Resolution is
//! exact name match with no referential integrity: an assignee name with no
//! matching contact is an "unknown assignee" and is skipped in rendering.

use serde::{Deserialize, Serialize};

/// One address-book entry, as snapshotted for the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    /// Avatar chip color, e.g. `"#FF7A00"`. Opaque to the core.
    pub color: String,
}

/// Read-only contact snapshot. Not kept live-synchronized.
#[derive(Debug, Clone, Default)]
pub struct ContactDirectory {
    contacts: Vec<Contact>,
}

impl ContactDirectory {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Exact-name lookup.
    pub fn resolve(&self, name: &str) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.name == name)
    }

    /// Resolve a list of assignee names, silently dropping unknown ones.
    pub fn resolve_all<'a>(&'a self, names: &'a [String]) -> Vec<&'a Contact> {
        names
            .iter()
            .filter_map(|name| self.resolve(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> ContactDirectory {
        ContactDirectory::new(vec![
            Contact {
                name: "Ada Lovelace".to_string(),
                color: "#FF7A00".to_string(),
            },
            Contact {
                name: "Grace Hopper".to_string(),
                color: "#1FD7C1".to_string(),
            },
        ])
    }

    #[test]
    fn resolve_is_exact_match() {
        let dir = directory();
        assert!(dir.resolve("Ada Lovelace").is_some());
        assert!(dir.resolve("ada lovelace").is_none());
    }

    #[test]
    fn unknown_assignees_are_skipped() {
        let dir = directory();
        let names = vec![
            "Grace Hopper".to_string(),
            "Nobody".to_string(),
            "Ada Lovelace".to_string(),
        ];
        let resolved = dir.resolve_all(&names);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].name, "Grace Hopper");
    }
}
