//! Snapshot and transaction display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{find_category, Category, Snapshot, SnapshotField, Transaction, TransactionKind};

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    label: &'static str,
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Entries")]
    entries: String,
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format an amount with the currency symbol and two decimals
pub fn format_money(amount: f64, currency: &str) -> String {
    if amount < 0.0 {
        format!("-{}{:.2}", currency, amount.abs())
    } else {
        format!("{}{:.2}", currency, amount)
    }
}

/// Overview of every snapshot field plus income/expense totals
pub fn format_snapshot_summary(snapshot: &Snapshot, currency: &str) -> String {
    let rows: Vec<FieldRow> = SnapshotField::ALL
        .into_iter()
        .map(|field| FieldRow {
            label: field.label(),
            key: field.document_key(),
            entries: match field {
                SnapshotField::BudgetLimit => match snapshot.budget_limit.value() {
                    Some(limit) => format_money(limit, currency),
                    None => "-".to_string(),
                },
                _ => snapshot.entry_count(field).to_string(),
            },
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());

    let (income, expense) = snapshot.totals();
    let mut output = table.to_string();
    output.push('\n');
    output.push_str(&format!("Income:  {}\n", format_money(income, currency)));
    output.push_str(&format!("Expense: {}\n", format_money(expense, currency)));
    output.push_str(&format!(
        "Balance: {}\n",
        format_money(income - expense, currency)
    ));

    if let Some(exported) = snapshot.export_date {
        output.push_str(&format!(
            "Exported: {} (format {})\n",
            exported.format("%Y-%m-%d %H:%M:%S UTC"),
            snapshot.version
        ));
    }

    output
}

/// Newest-first table of transactions
pub fn format_transaction_list(
    transactions: &[Transaction],
    categories: &[Category],
    currency: &str,
    limit: usize,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let rows: Vec<TransactionRow> = sorted
        .into_iter()
        .take(limit)
        .map(|txn| {
            let category = match find_category(categories, &txn.category) {
                Some(c) if !c.icon.is_empty() => format!("{} {}", c.icon, c.name),
                Some(c) => c.name.clone(),
                None => txn.category.clone(),
            };
            let amount = match txn.kind {
                TransactionKind::Income => format!("+{}", format_money(txn.amount, currency)),
                TransactionKind::Expense => format_money(-txn.amount, currency),
            };
            TransactionRow {
                date: txn.date.clone(),
                description: txn.description.clone(),
                category,
                amount,
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());

    let mut output = table.to_string();
    output.push('\n');
    if transactions.len() > limit {
        output.push_str(&format!(
            "Showing {} of {} transactions\n",
            limit,
            transactions.len()
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_categories, BudgetLimit};
    use chrono::NaiveDate;

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot::fresh();
        snapshot.transactions.push(Transaction::new(
            1000.0,
            "Salary",
            "maas",
            TransactionKind::Income,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        ));
        snapshot.transactions.push(Transaction::new(
            250.0,
            "Groceries",
            "market",
            TransactionKind::Expense,
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
        ));
        snapshot.budget_limit = BudgetLimit::new(2500.0);
        snapshot
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(12.5, "₺"), "₺12.50");
        assert_eq!(format_money(-3.0, "$"), "-$3.00");
    }

    #[test]
    fn test_snapshot_summary() {
        let output = format_snapshot_summary(&snapshot(), "₺");
        assert!(output.contains("Transactions"));
        assert!(output.contains("categoryLimits"));
        assert!(output.contains("₺2500.00"));
        assert!(output.contains("Income:  ₺1000.00"));
        assert!(output.contains("Balance: ₺750.00"));
        assert!(!output.contains("Exported"));
    }

    #[test]
    fn test_transaction_list_newest_first() {
        let snapshot = snapshot();
        let output = format_transaction_list(&snapshot.transactions, &default_categories(), "₺", 10);

        let groceries = output.find("Groceries").unwrap();
        let salary = output.find("Salary").unwrap();
        assert!(groceries < salary);
        assert!(output.contains("+₺1000.00"));
        assert!(output.contains("-₺250.00"));
    }

    #[test]
    fn test_transaction_list_limit() {
        let snapshot = snapshot();
        let output = format_transaction_list(&snapshot.transactions, &[], "₺", 1);
        assert!(output.contains("Showing 1 of 2 transactions"));
        assert!(!output.contains("Salary"));
    }

    #[test]
    fn test_empty_transaction_list() {
        assert_eq!(
            format_transaction_list(&[], &[], "₺", 5),
            "No transactions found.\n"
        );
    }
}
