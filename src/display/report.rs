//! Monthly summary display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::reports::{AlertLevel, MonthlySummary};

use super::snapshot::format_money;

#[derive(Tabled)]
struct OverrunRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Over by")]
    excess: String,
}

/// Totals, budget alert and category overruns for one month
pub fn format_monthly_summary(summary: &MonthlySummary, currency: &str) -> String {
    let mut output = match &summary.month {
        Some(month) => format!(
            "Month {} ({} transactions)\n",
            month, summary.transaction_count
        ),
        None => format!("All months ({} transactions)\n", summary.transaction_count),
    };
    output.push_str(&format!("Income:  {}\n", format_money(summary.income, currency)));
    output.push_str(&format!("Expense: {}\n", format_money(summary.expense, currency)));
    output.push_str(&format!(
        "Balance: {}\n",
        format_money(summary.balance(), currency)
    ));

    if let Some(alert) = &summary.alert {
        let tag = match alert.level {
            AlertLevel::Danger => "DANGER",
            AlertLevel::Warning => "WARNING",
        };
        output.push_str(&format!("{}: {}\n", tag, alert.message()));
    }

    if !summary.overruns.is_empty() {
        let rows: Vec<OverrunRow> = summary
            .overruns
            .iter()
            .map(|o| OverrunRow {
                category: o.category_name.clone(),
                spent: format_money(o.spent, currency),
                limit: format_money(o.limit, currency),
                excess: format_money(o.excess(), currency),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        output.push_str("Over category limit:\n");
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output
}
