//! Reports computed from a budget snapshot

pub mod monthly;

pub use monthly::{
    budget_alert, parse_month, AlertLevel, BudgetAlert, CategoryOverrun, MonthlySummary,
};
