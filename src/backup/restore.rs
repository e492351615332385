//! Backup restoration for BudgetVault
//!
//! Applies a decrypted snapshot on top of the current one:
//!
//! - transactions, goals, category limits and recurring payments are always
//!   replaced (with empty values when the backup lacks them)
//! - the budget limit is replaced only when the backup carries a non-zero one
//! - assets, credit card debts, bills, notes, portfolio history and
//!   categories are replaced only when the backup contains them

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::BudgetResult;
use crate::models::{Snapshot, SnapshotField};
use crate::storage::{BudgetStore, RemoteStatus};

/// Result of a restore operation
#[derive(Debug, Clone)]
pub struct RestoreResult {
    /// When the backup was exported
    pub backup_date: Option<DateTime<Utc>>,
    /// Format version recorded in the backup
    pub version: String,
    /// Fields overwritten from the backup
    pub replaced: Vec<SnapshotField>,
    /// Fields that kept their current value
    pub kept: Vec<SnapshotField>,
    /// Outcome of mirroring the result to the remote
    pub remote: RemoteStatus,
}

impl RestoreResult {
    pub fn was_replaced(&self, field: SnapshotField) -> bool {
        self.replaced.contains(&field)
    }

    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        let names: Vec<&str> = self.replaced.iter().map(|f| f.label()).collect();
        format!("Restored: {}", names.join(", "))
    }
}

/// Merge `backup` into `current` and return the fields that changed source
pub fn apply_backup(current: &mut Snapshot, backup: Snapshot) -> (Vec<SnapshotField>, Vec<SnapshotField>) {
    let mut replaced = vec![
        SnapshotField::Transactions,
        SnapshotField::Goals,
        SnapshotField::CategoryLimits,
        SnapshotField::RecurringPayments,
    ];
    let mut kept = Vec::new();

    current.transactions = backup.transactions;
    current.goals = backup.goals;
    current.category_limits = backup.category_limits;
    current.recurring_payments = backup.recurring_payments;

    if backup.budget_limit.is_active() {
        current.budget_limit = backup.budget_limit;
        replaced.push(SnapshotField::BudgetLimit);
    } else {
        kept.push(SnapshotField::BudgetLimit);
    }

    let optional = [
        (SnapshotField::Assets, backup.assets, &mut current.assets),
        (
            SnapshotField::CreditCardDebts,
            backup.credit_card_debts,
            &mut current.credit_card_debts,
        ),
        (SnapshotField::Bills, backup.bills, &mut current.bills),
        (SnapshotField::Notes, backup.notes, &mut current.notes),
    ];
    for (field, incoming, slot) in optional {
        match incoming {
            Some(values) => {
                *slot = Some(values);
                replaced.push(field);
            }
            None => kept.push(field),
        }
    }

    match backup.portfolio_history {
        Some(history) => {
            current.portfolio_history = Some(history);
            replaced.push(SnapshotField::PortfolioHistory);
        }
        None => kept.push(SnapshotField::PortfolioHistory),
    }

    match backup.categories {
        Some(categories) => {
            current.categories = Some(categories);
            replaced.push(SnapshotField::Categories);
        }
        None => kept.push(SnapshotField::Categories),
    }

    (replaced, kept)
}

/// Apply `backup` to the user's stored budget and persist every field
pub fn restore(store: &BudgetStore, backup: Snapshot) -> BudgetResult<RestoreResult> {
    let backup_date = backup.export_date;
    let version = backup.version.clone();

    let mut current = store.load()?;
    let (replaced, kept) = apply_backup(&mut current, backup);
    let saved = store.save_all(&current)?;

    info!(
        user = store.username(),
        replaced = replaced.len(),
        kept = kept.len(),
        "restored backup"
    );

    Ok(RestoreResult {
        backup_date,
        version,
        replaced,
        kept,
        remote: saved.remote,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetLimit, Category, PortfolioPoint};
    use crate::storage::{DocumentStore, LocalCache, MemoryDocumentStore, MemoryKeyValueStore};
    use serde_json::json;
    use std::sync::Arc;

    fn current_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::fresh();
        snapshot.goals.push(json!({"id": "old-goal"}));
        snapshot.category_limits.insert("market".into(), 500.0);
        snapshot.budget_limit = BudgetLimit::new(3000.0);
        snapshot.assets = Some(vec![json!({"type": "gold", "amount": 10})]);
        snapshot.notes = Some(vec![json!({"text": "keep me"})]);
        snapshot
    }

    #[test]
    fn test_always_replaced_fields_cleared_when_absent() {
        let mut current = current_snapshot();
        let backup: Snapshot = serde_json::from_value(json!({"version": "1.0"})).unwrap();

        let (replaced, _) = apply_backup(&mut current, backup);

        assert!(current.goals.is_empty());
        assert!(current.category_limits.is_empty());
        assert!(replaced.contains(&SnapshotField::Goals));
        assert!(replaced.contains(&SnapshotField::CategoryLimits));
    }

    #[test]
    fn test_optional_fields_kept_when_absent() {
        let mut current = current_snapshot();
        let backup: Snapshot = serde_json::from_value(json!({
            "transactions": [],
            "bills": [{"name": "Internet"}]
        }))
        .unwrap();

        let (replaced, kept) = apply_backup(&mut current, backup);

        assert_eq!(current.assets.as_ref().unwrap().len(), 1);
        assert_eq!(current.notes.as_ref().unwrap()[0]["text"], "keep me");
        assert_eq!(current.bills.as_ref().unwrap().len(), 1);
        assert!(replaced.contains(&SnapshotField::Bills));
        assert!(kept.contains(&SnapshotField::Assets));
        assert!(kept.contains(&SnapshotField::Categories));
        assert_eq!(current.categories.as_ref().unwrap().len(), 9);
    }

    #[test]
    fn test_present_empty_optional_field_replaces() {
        let mut current = current_snapshot();
        let backup: Snapshot = serde_json::from_value(json!({"assets": []})).unwrap();

        apply_backup(&mut current, backup);
        assert_eq!(current.assets, Some(Vec::new()));
    }

    #[test]
    fn test_budget_limit_only_when_active() {
        for raw in [json!(0), json!(""), json!(null)] {
            let mut current = current_snapshot();
            let backup: Snapshot = serde_json::from_value(json!({"budgetLimit": raw})).unwrap();
            let (_, kept) = apply_backup(&mut current, backup);
            assert_eq!(current.budget_limit.value(), Some(3000.0));
            assert!(kept.contains(&SnapshotField::BudgetLimit));
        }

        let mut current = current_snapshot();
        let backup: Snapshot = serde_json::from_value(json!({"budgetLimit": "4200"})).unwrap();
        let (replaced, _) = apply_backup(&mut current, backup);
        assert_eq!(current.budget_limit.value(), Some(4200.0));
        assert!(replaced.contains(&SnapshotField::BudgetLimit));
    }

    #[test]
    fn test_every_field_accounted_for() {
        let mut current = current_snapshot();
        let (replaced, kept) = apply_backup(&mut current, Snapshot::default());
        assert_eq!(replaced.len() + kept.len(), SnapshotField::ALL.len());
    }

    #[test]
    fn test_restore_persists_to_store() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let remote = Arc::new(MemoryDocumentStore::new());
        let shared: Arc<dyn DocumentStore> = remote.clone();
        let store = BudgetStore::new(LocalCache::new(kv, "ayse"), Some(shared));
        store.save_all(&current_snapshot()).unwrap();

        let mut backup = Snapshot::fresh();
        backup.categories = Some(vec![Category::new("pets", "Pets", "🐶")]);
        backup.portfolio_history = Some(vec![PortfolioPoint::new("2025-01-31", 1000.0)]);
        backup.goals.push(json!({"id": "new-goal"}));

        let result = restore(&store, backup).unwrap();
        assert_eq!(result.remote, RemoteStatus::Synced);
        assert!(result.was_replaced(SnapshotField::Categories));
        assert!(result.summary().starts_with("Restored: Transactions"));

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.goals, vec![json!({"id": "new-goal"})]);
        assert_eq!(reloaded.categories.as_ref().unwrap()[0].id, "pets");
        assert_eq!(reloaded.budget_limit.value(), Some(3000.0));
        assert_eq!(reloaded.portfolio_history.as_ref().unwrap().len(), 1);

        let document = remote.get("ayse").unwrap().unwrap();
        assert_eq!(document["goals"], json!([{"id": "new-goal"}]));
    }
}
