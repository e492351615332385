//! BudgetVault - encrypted backups and offline-first storage for budget data
//!
//! This library keeps a user's budget snapshot in a namespaced local cache,
//! mirrors it to a document store, and moves it between machines as
//! password-protected backup files.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: The budget snapshot and its parts
//! - `crypto`: The backup codec (PBKDF2 + AES-256-GCM)
//! - `storage`: Local cache, remote document store and the store combining them
//! - `backup`: Backup export, listing and restore
//! - `audit`: Audit logging system
//! - `export`: CSV reports
//! - `reports`: Monthly summary and budget alerts
//! - `display`: Table formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetvault::crypto::BackupCodec;
//! use budgetvault::models::Snapshot;
//!
//! let codec = BackupCodec::new();
//! let blob = codec.encrypt(&Snapshot::fresh(), "hunter2")?;
//! let restored = codec.decrypt(&blob, "hunter2")?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
