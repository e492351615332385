//! Audit entry data structures
//!
//! An entry names an operation, the user it ran for and the snapshot fields
//! it touched. Entries never carry passwords, keys or backup contents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SnapshotField;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// A backup file was written
    Export,
    /// A backup file was opened
    Import,
    /// A backup was applied to the stored budget
    Restore,
    /// The remote document was pulled or pushed
    Sync,
    /// Budget data was edited
    Update,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Export => write!(f, "EXPORT"),
            Operation::Import => write!(f, "IMPORT"),
            Operation::Restore => write!(f, "RESTORE"),
            Operation::Sync => write!(f, "SYNC"),
            Operation::Update => write!(f, "UPDATE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// User whose budget was affected
    pub username: String,

    /// Document keys of the affected snapshot fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// Free-form detail (file path, remote status, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry stamped with the current time
    pub fn new(operation: Operation, username: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            username: username.into(),
            fields: Vec::new(),
            detail: None,
        }
    }

    /// Record the affected fields
    pub fn with_fields(mut self, fields: &[SnapshotField]) -> Self {
        self.fields = fields.iter().map(|f| f.document_key().to_string()).collect();
        self
    }

    /// Attach a detail string
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.username
        );

        if !self.fields.is_empty() {
            output.push_str(&format!(" [{}]", self.fields.join(", ")));
        }

        if let Some(detail) = &self.detail {
            output.push_str(&format!("\n  {}", detail));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Export.to_string(), "EXPORT");
        assert_eq!(Operation::Restore.to_string(), "RESTORE");
        assert_eq!(Operation::Update.to_string(), "UPDATE");
    }

    #[test]
    fn test_builder() {
        let entry = AuditEntry::new(Operation::Restore, "ayse")
            .with_fields(&[SnapshotField::Transactions, SnapshotField::CategoryLimits])
            .with_detail("from budget.enc");

        assert_eq!(entry.operation, Operation::Restore);
        assert_eq!(entry.fields, vec!["transactions", "categoryLimits"]);
        assert_eq!(entry.detail.as_deref(), Some("from budget.enc"));
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::new(Operation::Sync, "ayse");

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""operation":"sync""#));
        assert!(!json.contains("fields"));

        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.operation, Operation::Sync);
        assert_eq!(deserialized.username, "ayse");
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::new(Operation::Export, "ayse")
            .with_fields(&[SnapshotField::Notes])
            .with_detail("backups/budget_backup_ayse.enc");

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("EXPORT"));
        assert!(formatted.contains("ayse"));
        assert!(formatted.contains("[notes]"));
        assert!(formatted.contains("budget_backup_ayse.enc"));
    }
}
