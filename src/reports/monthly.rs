//! Monthly summary report
//!
//! Income, expense and balance for one month, the budget alert against the
//! monthly budget limit, and the categories whose net spending passed their
//! category limit.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetLimit, Snapshot, Transaction, TransactionKind};

/// Share of the budget limit at which a warning is raised
pub const WARNING_PERCENT: f64 = 80.0;

/// Share of the budget limit at which the budget counts as exceeded
pub const DANGER_PERCENT: f64 = 100.0;

/// Validate a `YYYY-MM` month
pub fn parse_month(month: &str) -> BudgetResult<String> {
    let valid = month.len() == 7
        && NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").is_ok();
    if valid {
        Ok(month.to_string())
    } else {
        Err(BudgetError::Validation(format!(
            "Invalid month '{}', expected YYYY-MM",
            month
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    /// Spending reached the warning share of the limit
    Warning,
    /// Spending reached or passed the limit
    Danger,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAlert {
    pub level: AlertLevel,
    /// Expense as a percentage of the limit
    pub percentage: f64,
}

impl BudgetAlert {
    pub fn message(&self) -> String {
        match self.level {
            AlertLevel::Danger => format!(
                "Monthly budget limit exceeded ({:.0}%)",
                self.percentage
            ),
            AlertLevel::Warning => format!(
                "Reached {:.0}% of the monthly budget limit",
                self.percentage
            ),
        }
    }
}

/// Alert for `expense` against `limit`, if any
///
/// An unset or non-positive limit never alerts.
pub fn budget_alert(expense: f64, limit: &BudgetLimit) -> Option<BudgetAlert> {
    let limit = limit.value().filter(|l| *l > 0.0)?;
    let percentage = expense * 100.0 / limit;

    let level = if percentage >= DANGER_PERCENT {
        AlertLevel::Danger
    } else if percentage >= WARNING_PERCENT {
        AlertLevel::Warning
    } else {
        return None;
    };

    Some(BudgetAlert { level, percentage })
}

/// A category whose net spending is above its limit
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOverrun {
    pub category_id: String,
    pub category_name: String,
    /// Expenses minus income booked to the category
    pub spent: f64,
    pub limit: f64,
}

impl CategoryOverrun {
    pub fn excess(&self) -> f64 {
        self.spent - self.limit
    }
}

/// Summary of one month, or of every transaction when no month is given
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub month: Option<String>,
    pub transaction_count: usize,
    pub income: f64,
    pub expense: f64,
    pub alert: Option<BudgetAlert>,
    pub overruns: Vec<CategoryOverrun>,
}

impl MonthlySummary {
    /// Build the summary from the snapshot's transactions
    pub fn generate(snapshot: &Snapshot, month: Option<&str>) -> Self {
        let selected: Vec<&Transaction> = snapshot
            .transactions
            .iter()
            .filter(|t| month.map_or(true, |m| t.in_month(m)))
            .collect();

        let (income, expense) = selected
            .iter()
            .fold((0.0, 0.0), |(income, expense), txn| match txn.kind {
                TransactionKind::Income => (income + txn.amount, expense),
                TransactionKind::Expense => (income, expense + txn.amount),
            });

        let mut spent: BTreeMap<&str, f64> = BTreeMap::new();
        for txn in &selected {
            *spent.entry(txn.category.as_str()).or_default() -= txn.signed_amount();
        }

        // Limits may be keyed by category name or id
        let overruns = snapshot
            .categories_or_default()
            .into_iter()
            .filter_map(|category| {
                let limit = snapshot
                    .category_limits
                    .get(&category.name)
                    .or_else(|| snapshot.category_limits.get(&category.id))
                    .copied()
                    .filter(|l| *l > 0.0)?;
                let spent = spent.get(category.id.as_str()).copied().unwrap_or(0.0);
                (spent > limit).then(|| CategoryOverrun {
                    category_id: category.id,
                    category_name: category.name,
                    spent,
                    limit,
                })
            })
            .collect();

        Self {
            month: month.map(str::to_string),
            transaction_count: selected.len(),
            income,
            expense,
            alert: budget_alert(expense, &snapshot.budget_limit),
            overruns,
        }
    }

    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}
