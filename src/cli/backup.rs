//! Backup CLI commands
//!
//! Implements encrypted export, import/restore, inspection and listing.

use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::backup::{restore, BackupManager};
use crate::config::paths::VaultPaths;
use crate::config::settings::Settings;
use crate::display::{format_backup_list, format_snapshot_summary};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Snapshot, SnapshotField};
use crate::storage::{BudgetStore, RemoteStatus};

use super::password::{read_new_password, read_password};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Export the current budget as an encrypted backup
    Export {
        /// Write to this file instead of the backup directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Restore the budget from an encrypted backup
    Import {
        /// Backup filename or path (use 'latest' for most recent)
        file: String,

        /// Apply the backup without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Decrypt a backup and show what it contains
    Inspect {
        /// Backup filename or path (use 'latest' for most recent)
        file: String,
    },

    /// List backups in the backup directory
    List,
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &VaultPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> BudgetResult<()> {
    let username = settings.require_username()?;
    let manager = BackupManager::new(settings.backup_dir(paths), username);
    let audit = AuditLogger::new(paths.audit_log());

    match cmd {
        BackupCommands::Export { output } => {
            let store = BudgetStore::open(paths, settings)?;
            let (snapshot, refresh) = store.load_and_refresh()?;
            report_offline(&refresh.status);

            let password = read_new_password()?;
            let path = manager.export(&snapshot, password.as_str(), output.as_deref())?;

            audit.log(
                &AuditEntry::new(Operation::Export, username)
                    .with_fields(&SnapshotField::ALL)
                    .with_detail(path.display().to_string()),
            )?;

            println!("Backup exported: {}", path.display());
            println!(
                "{} transaction(s), {} goal(s)",
                snapshot.transactions.len(),
                snapshot.goals.len()
            );
        }

        BackupCommands::Import { file, force } => {
            let path = resolve_backup_path(&manager, &file)?;
            let password = read_password()?;
            let backup = manager.read_backup(&path, password.as_str())?;

            audit.log(
                &AuditEntry::new(Operation::Import, username)
                    .with_detail(path.display().to_string()),
            )?;

            print_backup_header(&path, &backup);
            print!("{}", format_snapshot_summary(&backup, &settings.currency_symbol));
            println!();

            if !force {
                println!("WARNING: This will replace your current budget data!");
                println!("To proceed, run again with --force flag:");
                println!("  budgetvault backup import {} --force", file);
                return Ok(());
            }

            let store = BudgetStore::open(paths, settings)?;
            let result = restore(&store, backup)?;

            audit.log(
                &AuditEntry::new(Operation::Restore, username)
                    .with_fields(&result.replaced)
                    .with_detail(path.display().to_string()),
            )?;

            println!("Restore complete!");
            println!("{}", result.summary());
            if !result.kept.is_empty() {
                let kept: Vec<&str> = result.kept.iter().map(|f| f.label()).collect();
                println!("Kept current: {}", kept.join(", "));
            }
            report_offline(&result.remote);
        }

        BackupCommands::Inspect { file } => {
            let path = resolve_backup_path(&manager, &file)?;
            let password = read_password()?;
            let backup = manager.read_backup(&path, password.as_str())?;

            print_backup_header(&path, &backup);
            print!("{}", format_snapshot_summary(&backup, &settings.currency_symbol));
        }

        BackupCommands::List => {
            let backups = manager.list_backups()?;
            print!("{}", format_backup_list(&backups));
            if backups.is_empty() {
                println!("Create one with: budgetvault backup export");
            }
        }
    }

    Ok(())
}

fn print_backup_header(path: &Path, backup: &Snapshot) {
    println!("Backup: {}", path.display());
    match backup.export_date {
        Some(date) => println!("Exported: {}", date.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Exported: unknown"),
    }
    println!("Format version: {}", backup.version);
    println!();
}

fn report_offline(status: &RemoteStatus) {
    if status.is_offline() {
        eprintln!("Note: remote store unavailable, using local data ({})", status);
    }
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> BudgetResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .get_latest_backup()?
            .map(|b| b.path)
            .ok_or_else(|| BudgetError::backup_not_found("latest"));
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    let in_dir = manager.backup_dir().join(backup);
    if in_dir.exists() {
        return Ok(in_dir);
    }

    let with_ext = manager.backup_dir().join(format!("{}.enc", backup));
    if with_ext.exists() {
        return Ok(with_ext);
    }

    Err(BudgetError::backup_not_found(backup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_backup_path() {
        let temp = TempDir::new().unwrap();
        let manager = BackupManager::new(temp.path(), "ayse");

        let name = "budget_backup_ayse_20250101-090000-000.enc";
        std::fs::write(temp.path().join(name), "x").unwrap();

        assert_eq!(
            resolve_backup_path(&manager, name).unwrap(),
            temp.path().join(name)
        );
        assert_eq!(
            resolve_backup_path(&manager, "budget_backup_ayse_20250101-090000-000").unwrap(),
            temp.path().join(name)
        );
        assert_eq!(
            resolve_backup_path(&manager, "LATEST").unwrap(),
            temp.path().join(name)
        );
        assert!(resolve_backup_path(&manager, "missing")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_latest_ignores_other_users() {
        let temp = TempDir::new().unwrap();
        let manager = BackupManager::new(temp.path(), "ayse");
        std::fs::write(
            temp.path().join("budget_backup_mehmet_20250101-090000-000.enc"),
            "x",
        )
        .unwrap();

        assert!(resolve_backup_path(&manager, "latest")
            .unwrap_err()
            .is_not_found());
    }
}
