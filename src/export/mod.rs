//! Export module for BudgetVault
//!
//! Plain (unencrypted) CSV reports of transactions for spreadsheets.
//! Encrypted exports live in [`crate::backup`].

pub mod csv;

pub use self::csv::{default_file_name, export_transactions_csv, select_transactions};
