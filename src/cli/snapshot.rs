//! Snapshot CLI commands

use chrono::Local;
use clap::Subcommand;

use crate::config::paths::VaultPaths;
use crate::config::settings::Settings;
use crate::display::{format_monthly_summary, format_snapshot_summary};
use crate::error::{BudgetError, BudgetResult};
use crate::reports::{parse_month, MonthlySummary};
use crate::storage::BudgetStore;

/// Snapshot subcommands
#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// Show a summary of the stored budget and one month's totals
    Show {
        /// Month to summarize (YYYY-MM), the current month if omitted
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Print the stored budget as JSON
    Dump,
}

/// Handle a snapshot command
pub fn handle_snapshot_command(
    paths: &VaultPaths,
    settings: &Settings,
    cmd: SnapshotCommands,
) -> BudgetResult<()> {
    let store = BudgetStore::open(paths, settings)?;
    let snapshot = store.load()?;

    match cmd {
        SnapshotCommands::Show { month } => {
            let month = match month {
                Some(m) => parse_month(&m)?,
                None => Local::now().format("%Y-%m").to_string(),
            };
            let summary = MonthlySummary::generate(&snapshot, Some(&month));

            println!("Budget of {}", store.username());
            print!(
                "{}",
                format_snapshot_summary(&snapshot, &settings.currency_symbol)
            );
            println!();
            print!(
                "{}",
                format_monthly_summary(&summary, &settings.currency_symbol)
            );
        }
        SnapshotCommands::Dump => {
            let json = serde_json::to_string_pretty(&snapshot)
                .map_err(|e| BudgetError::Json(e.to_string()))?;
            println!("{}", json);
        }
    }

    Ok(())
}
