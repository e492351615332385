//! Transaction CLI commands

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use std::fs::File;
use std::path::PathBuf;

use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::config::paths::VaultPaths;
use crate::config::settings::Settings;
use crate::display::format_transaction_list;
use crate::error::{BudgetError, BudgetResult};
use crate::export::{default_file_name, export_transactions_csv, select_transactions};
use crate::models::{find_category, SnapshotField, Transaction, TransactionKind};
use crate::reports::parse_month;
use crate::storage::BudgetStore;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Amount (always positive; use --income for money coming in)
        amount: f64,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Category id
        #[arg(short, long, default_value = "diger")]
        category: String,
        /// Record as income instead of expense
        #[arg(long)]
        income: bool,
        /// Transaction date (YYYY-MM-DD), today if omitted
        #[arg(long)]
        date: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Export transactions to a CSV file
    ExportCsv {
        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Output file (defaults to budget_report_<month|all>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    paths: &VaultPaths,
    settings: &Settings,
    cmd: TransactionCommands,
) -> BudgetResult<()> {
    let store = BudgetStore::open(paths, settings)?;

    match cmd {
        TransactionCommands::Add {
            amount,
            description,
            category,
            income,
            date,
        } => {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(BudgetError::Validation(
                    "Amount must be a positive number".into(),
                ));
            }
            let date = match date {
                Some(text) => parse_date(&text)?,
                None => Local::now().date_naive(),
            };

            let (mut snapshot, _) = store.load_and_refresh()?;
            let categories = snapshot.categories_or_default();
            let Some(found) = find_category(&categories, &category) else {
                return Err(BudgetError::NotFound {
                    entity_type: "Category",
                    identifier: category,
                });
            };

            let kind = if income {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let txn = Transaction::new(amount, description, found.id.clone(), kind, date);
            let summary = format!("{} {} {} ({})", txn.date, kind, amount, found.name);
            snapshot.transactions.push(txn);

            let saved = store.save_field(&snapshot, SnapshotField::Transactions)?;
            AuditLogger::new(paths.audit_log()).log(
                &AuditEntry::new(Operation::Update, store.username())
                    .with_fields(&saved.fields)
                    .with_detail(summary.clone()),
            )?;

            println!("Added transaction: {}", summary);
            if saved.remote.is_offline() {
                eprintln!("Note: saved locally only ({})", saved.remote);
            }
        }

        TransactionCommands::List { limit } => {
            let snapshot = store.load()?;
            print!(
                "{}",
                format_transaction_list(
                    &snapshot.transactions,
                    &snapshot.categories_or_default(),
                    &settings.currency_symbol,
                    limit,
                )
            );
        }

        TransactionCommands::ExportCsv { month, output } => {
            let month = month.as_deref().map(parse_month).transpose()?;

            let snapshot = store.load()?;
            let selected = select_transactions(&snapshot.transactions, month.as_deref());
            if selected.is_empty() {
                return Err(BudgetError::Export("no transactions to export".into()));
            }

            let path = output.unwrap_or_else(|| PathBuf::from(default_file_name(month.as_deref())));
            let file = File::create(&path)
                .map_err(|e| BudgetError::Io(format!("Failed to create {}: {}", path.display(), e)))?;
            let count = export_transactions_csv(&selected, file)?;

            println!("Exported {} transaction(s) to {}", count, path.display());
        }
    }

    Ok(())
}

fn parse_date(text: &str) -> BudgetResult<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| BudgetError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", text)))
}
