//! CSV export of transactions
//!
//! One row per transaction with the columns
//! `Date,Description,Amount,Type,Category`. Amounts are unsigned; the type
//! column says which way the money went.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::number::format_number;
use crate::models::Transaction;

const HEADER: [&str; 5] = ["Date", "Description", "Amount", "Type", "Category"];

/// Transactions in `month` (`YYYY-MM`), or all of them when `None`
pub fn select_transactions<'a>(
    transactions: &'a [Transaction],
    month: Option<&str>,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| month.map_or(true, |m| t.in_month(m)))
        .collect()
}

/// Default file name for a CSV report
pub fn default_file_name(month: Option<&str>) -> String {
    format!("budget_report_{}.csv", month.unwrap_or("all"))
}

/// Write the selected transactions as CSV
///
/// Returns the number of rows written. An empty selection is an error so
/// that no header-only files are produced.
pub fn export_transactions_csv<W: Write>(
    transactions: &[&Transaction],
    writer: W,
) -> BudgetResult<usize> {
    if transactions.is_empty() {
        return Err(BudgetError::Export("no transactions to export".into()));
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(HEADER)
        .map_err(|e| BudgetError::Export(e.to_string()))?;

    for txn in transactions {
        let amount = format_number(txn.amount);
        let kind = txn.kind.to_string();
        csv_writer
            .write_record([
                txn.date.as_str(),
                txn.description.as_str(),
                amount.as_str(),
                kind.as_str(),
                txn.category.as_str(),
            ])
            .map_err(|e| BudgetError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(transactions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use chrono::NaiveDate;

    fn transactions() -> Vec<Transaction> {
        vec![
            Transaction::new(
                15000.0,
                "Maaş",
                "maas",
                TransactionKind::Income,
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            ),
            Transaction::new(
                320.5,
                "Market, \"big\" shop",
                "market",
                TransactionKind::Expense,
                NaiveDate::from_ymd_opt(2025, 1, 14).unwrap(),
            ),
            Transaction::new(
                75.0,
                "Cinema",
                "eglence",
                TransactionKind::Expense,
                NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            ),
        ]
    }

    #[test]
    fn test_select_by_month() {
        let all = transactions();
        assert_eq!(select_transactions(&all, None).len(), 3);
        assert_eq!(select_transactions(&all, Some("2025-01")).len(), 2);
        assert!(select_transactions(&all, Some("2024-12")).is_empty());
    }

    #[test]
    fn test_export_rows_and_quoting() {
        let all = transactions();
        let selected = select_transactions(&all, Some("2025-01"));

        let mut output = Vec::new();
        let rows = export_transactions_csv(&selected, &mut output).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date,Description,Amount,Type,Category");
        assert_eq!(lines[1], "2025-01-01,Maaş,15000,income,maas");
        assert_eq!(
            lines[2],
            r#"2025-01-14,"Market, ""big"" shop",320.5,expense,market"#
        );
    }

    #[test]
    fn test_empty_selection_is_error() {
        let mut output = Vec::new();
        let err = export_transactions_csv(&[], &mut output).unwrap_err();
        assert!(err.to_string().contains("no transactions to export"));
        assert!(output.is_empty());
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(default_file_name(Some("2025-01")), "budget_report_2025-01.csv");
        assert_eq!(default_file_name(None), "budget_report_all.csv");
    }
}
