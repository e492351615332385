//! Core data models for BudgetVault
//!
//! This module contains the data structures that make up a budget snapshot:
//! transactions, categories, portfolio history and the snapshot aggregate
//! itself.

pub mod category;
pub mod ids;
pub mod number;
pub mod portfolio;
pub mod snapshot;
pub mod transaction;

pub use category::{default_categories, find_category, Category};
pub use ids::EntryId;
pub use portfolio::PortfolioPoint;
pub use snapshot::{BudgetLimit, Snapshot, SnapshotField, FORMAT_VERSION};
pub use transaction::{Transaction, TransactionKind};
