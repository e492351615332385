//! Identifiers for snapshot entries
//!
//! New entries get UUID v4 strings. Entries written by older versions carry
//! millisecond timestamps as integers, so both forms are accepted and kept
//! as they were.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a transaction or other list entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    /// Legacy numeric id (creation time in milliseconds)
    Number(i64),
    /// UUID or other textual id
    Text(String),
}

impl EntryId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self::Text(Uuid::new_v4().to_string())
    }

    /// Short form for tables
    pub fn short(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.chars().take(8).collect(),
        }
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for EntryId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique_uuids() {
        let a = EntryId::new();
        let b = EntryId::new();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a.to_string()).is_ok());
    }

    #[test]
    fn test_both_forms_round_trip() {
        let numeric: EntryId = serde_json::from_str("1700000000000").unwrap();
        assert_eq!(numeric, EntryId::Number(1_700_000_000_000));
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "1700000000000");

        let text: EntryId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(text, EntryId::from("abc-123"));
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"abc-123\"");
    }

    #[test]
    fn test_short() {
        assert_eq!(EntryId::from("0123456789abcdef").short(), "01234567");
        assert_eq!(EntryId::Number(42).short(), "42");
    }
}
