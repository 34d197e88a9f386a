//! Entry - one stored credential

use serde::{Deserialize, Serialize};

/// A stored credential in canonical shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique within a collection, assigned on creation
    pub id: i64,
    /// Display name, trimmed, never empty
    pub name: String,
    /// Secret value, stored verbatim
    pub secret: String,
    /// Trimmed description, empty when absent
    #[serde(default)]
    pub description: String,
}

impl Entry {
    pub fn new(id: i64, name: &str, secret: &str, description: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            secret: secret.to_string(),
            description: description.trim().to_string(),
        }
    }

    /// Case-insensitive name comparison, ignoring surrounding whitespace
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_name_and_description_only() {
        let entry = Entry::new(4, "  Prod DB ", " pass word ", "  main cluster ");
        assert_eq!(entry.name, "Prod DB");
        assert_eq!(entry.secret, " pass word ");
        assert_eq!(entry.description, "main cluster");
    }

    #[test]
    fn test_has_name_ignores_case() {
        let entry = Entry::new(1, "Staging", "x", "");
        assert!(entry.has_name("staging"));
        assert!(entry.has_name(" STAGING "));
        assert!(!entry.has_name("stage"));
    }

    #[test]
    fn test_serialized_field_order() {
        let entry = Entry::new(1, "a", "b", "");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"a","secret":"b","description":""}"#);
    }
}
