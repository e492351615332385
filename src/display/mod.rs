//! Display formatting for terminal output
//!
//! Renders snapshots, transactions, monthly summaries and backup listings.

pub mod backup;
pub mod report;
pub mod snapshot;

pub use backup::{format_backup_list, format_size};
pub use report::format_monthly_summary;
pub use snapshot::{format_money, format_snapshot_summary, format_transaction_list};
