use anyhow::Result;
use clap::{Parser, Subcommand};

use budgetvault::cli::{
    handle_audit_command, handle_backup_command, handle_snapshot_command, handle_sync_command,
    handle_transaction_command, BackupCommands, SnapshotCommands, SyncCommands,
    TransactionCommands,
};
use budgetvault::config::{paths::VaultPaths, settings::Settings};
use budgetvault::logging;
use budgetvault::models::{Snapshot, SnapshotField};
use budgetvault::storage::BudgetStore;

#[derive(Parser)]
#[command(
    name = "budgetvault",
    author = "Kaylee Beyene",
    version,
    about = "Encrypted backups and offline-first storage for personal budget data",
    long_about = "BudgetVault keeps a personal budget in a local cache, mirrors it to a \
                  document store when one is reachable, and exports it as password-protected \
                  backups that can be restored on any machine."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize storage for a user
    Init {
        /// User name the budget is stored under
        #[arg(short, long, env = "BUDGETVAULT_USER")]
        user: String,
    },

    /// Show current configuration and paths
    Config,

    /// Encrypted backup commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Inspect the stored budget
    #[command(subcommand)]
    Snapshot(SnapshotCommands),

    /// Transaction commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Synchronize with the remote store
    #[command(subcommand)]
    Sync(SyncCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = VaultPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    logging::init(&settings.log_level)?;

    match cli.command {
        Some(Commands::Init { user }) => {
            settings.set_username(&user)?;
            paths.ensure_directories()?;
            settings.save(&paths)?;

            let store = BudgetStore::open(&paths, &settings)?;
            let migrated = store.cache().migrate_legacy()?;
            if store.cache().load_field(SnapshotField::Categories)?.is_none() {
                store
                    .cache()
                    .store_field(&Snapshot::fresh(), SnapshotField::Categories)?;
            }

            println!("Initialized BudgetVault at: {}", paths.base_dir().display());
            println!("User: {}", user);
            if !migrated.is_empty() {
                let labels: Vec<&str> = migrated.iter().map(SnapshotField::label).collect();
                println!("Migrated legacy data: {}", labels.join(", "));
            }
            println!();
            println!("Run 'budgetvault transaction add <AMOUNT>' to record spending.");
        }
        Some(Commands::Config) => {
            println!("BudgetVault Configuration");
            println!("=========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Local cache:      {}", paths.local_cache_file().display());
            println!("Backup directory: {}", settings.backup_dir(&paths).display());
            println!("Remote directory: {}", settings.remote_dir(&paths).display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Initialized:      {}", if paths.is_initialized() { "yes" } else { "no" });
            println!();
            println!("Settings:");
            println!(
                "  User:           {}",
                settings.username.as_deref().unwrap_or("(not set)")
            );
            println!("  Remote enabled: {}", settings.remote.enabled);
            println!("  Log level:      {}", settings.log_level);
            println!("  Currency:       {}", settings.currency_symbol);
        }
        Some(Commands::Backup(cmd)) => handle_backup_command(&paths, &settings, cmd)?,
        Some(Commands::Snapshot(cmd)) => handle_snapshot_command(&paths, &settings, cmd)?,
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&paths, &settings, cmd)?,
        Some(Commands::Sync(cmd)) => handle_sync_command(&paths, &settings, cmd)?,
        Some(Commands::Audit { limit }) => handle_audit_command(&paths, limit)?,
        None => {
            println!("BudgetVault - encrypted budget backups");
            println!();
            println!("Run 'budgetvault --help' for usage information.");
        }
    }

    Ok(())
}
