//! Custom error types for BudgetVault
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for BudgetVault operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input and data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Local storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Remote document store errors
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// A backup could not be produced
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// A backup could not be opened; a wrong password and a damaged file
    /// produce the same error
    #[error("Decryption failed: wrong password or corrupted data")]
    Decryption,
}

impl BudgetError {
    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a decryption failure
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption)
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for BudgetVault operations
pub type BudgetResult<T> = Result<T, BudgetError>;
