//! Remote sync CLI commands

use clap::Subcommand;

use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::config::paths::VaultPaths;
use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::models::SnapshotField;
use crate::storage::{BudgetStore, RemoteStatus};

/// Sync subcommands
#[derive(Subcommand)]
pub enum SyncCommands {
    /// Adopt non-empty fields from the remote store
    Pull,

    /// Write every local field to the remote store
    Push,
}

/// Handle a sync command
pub fn handle_sync_command(
    paths: &VaultPaths,
    settings: &Settings,
    cmd: SyncCommands,
) -> BudgetResult<()> {
    let store = BudgetStore::open(paths, settings)?;
    let audit = AuditLogger::new(paths.audit_log());

    let (status, fields) = match cmd {
        SyncCommands::Pull => {
            let (_, outcome) = store.load_and_refresh()?;
            (outcome.status, outcome.adopted)
        }
        SyncCommands::Push => {
            let snapshot = store.load()?;
            let outcome = store.save_all(&snapshot)?;
            (outcome.remote, outcome.fields)
        }
    };

    audit.log(
        &AuditEntry::new(Operation::Sync, store.username())
            .with_fields(&fields)
            .with_detail(status.to_string()),
    )?;

    match &status {
        RemoteStatus::Disabled => println!("Remote store is disabled in settings."),
        RemoteStatus::Offline(reason) => println!("Remote store unavailable: {}", reason),
        RemoteStatus::Synced if fields.is_empty() => println!("Already up to date."),
        RemoteStatus::Synced => {
            let labels: Vec<&str> = fields.iter().map(SnapshotField::label).collect();
            println!("Synced: {}", labels.join(", "));
        }
    }

    Ok(())
}
