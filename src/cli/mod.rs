//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the storage and backup layers.

pub mod audit;
pub mod backup;
pub mod password;
pub mod snapshot;
pub mod sync;
pub mod transaction;

pub use audit::handle_audit_command;
pub use backup::{handle_backup_command, BackupCommands};
pub use snapshot::{handle_snapshot_command, SnapshotCommands};
pub use sync::{handle_sync_command, SyncCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};
