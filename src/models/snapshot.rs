//! The exportable budget snapshot
//!
//! A `Snapshot` is everything a user's budget consists of at one point in
//! time. It is what gets written to the local cache and the remote document
//! field by field, and what gets encrypted whole into a backup file.
//!
//! The JSON shape uses camelCase keys (`categoryLimits`, `exportDate`, ...)
//! and keeps unknown top-level keys in `extra`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::category::{default_categories, Category};
use super::number::{format_number, lenient_map, lenient_option_f64, parse_number};
use super::portfolio::PortfolioPoint;
use super::transaction::Transaction;

/// Format version written into every export
pub const FORMAT_VERSION: &str = "1.0";

/// The monthly budget limit, normalized to a single optional number
///
/// Accepts a JSON number, a numeric string, an empty string or null.
/// Always serializes as a number (or null when unset).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BudgetLimit(Option<f64>);

impl BudgetLimit {
    pub fn new(value: f64) -> Self {
        Self(Some(value).filter(|v| v.is_finite()))
    }

    pub fn unset() -> Self {
        Self(None)
    }

    /// Parse the textual form kept in the local cache
    pub fn parse(text: &str) -> Self {
        Self(parse_number(text))
    }

    pub fn value(&self) -> Option<f64> {
        self.0
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }

    /// Set to a non-zero amount. Zero counts as "no limit".
    pub fn is_active(&self) -> bool {
        matches!(self.0, Some(v) if v != 0.0)
    }

    /// Textual form for the local cache (empty when unset)
    pub fn to_text(&self) -> String {
        self.0.map(format_number).unwrap_or_default()
    }
}

impl fmt::Display for BudgetLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", format_number(v)),
            None => write!(f, "-"),
        }
    }
}

impl Serialize for BudgetLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for BudgetLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient_option_f64(deserializer).map(Self)
    }
}

/// One named member of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SnapshotField {
    Transactions,
    Categories,
    Goals,
    CategoryLimits,
    RecurringPayments,
    Assets,
    CreditCardDebts,
    Bills,
    Notes,
    PortfolioHistory,
    BudgetLimit,
}

impl SnapshotField {
    pub const ALL: [SnapshotField; 11] = [
        Self::Transactions,
        Self::Categories,
        Self::Goals,
        Self::CategoryLimits,
        Self::RecurringPayments,
        Self::Assets,
        Self::CreditCardDebts,
        Self::Bills,
        Self::Notes,
        Self::PortfolioHistory,
        Self::BudgetLimit,
    ];

    /// Key in the remote document and in backups
    pub fn document_key(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Categories => "categories",
            Self::Goals => "goals",
            Self::CategoryLimits => "categoryLimits",
            Self::RecurringPayments => "recurringPayments",
            Self::Assets => "assets",
            Self::CreditCardDebts => "creditCardDebts",
            Self::Bills => "bills",
            Self::Notes => "notes",
            Self::PortfolioHistory => "portfolioHistory",
            Self::BudgetLimit => "budgetLimit",
        }
    }

    /// Suffix of the local cache key (`{user}_budget_{slot}`)
    pub fn slot(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Categories => "categories",
            Self::Goals => "goals",
            Self::CategoryLimits => "category_limits",
            Self::RecurringPayments => "recurring_payments",
            Self::Assets => "assets",
            Self::CreditCardDebts => "credit_card_debts",
            Self::Bills => "bills",
            Self::Notes => "notes",
            Self::PortfolioHistory => "portfolio_history",
            Self::BudgetLimit => "limit",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transactions => "Transactions",
            Self::Categories => "Categories",
            Self::Goals => "Savings goals",
            Self::CategoryLimits => "Category limits",
            Self::RecurringPayments => "Recurring payments",
            Self::Assets => "Assets",
            Self::CreditCardDebts => "Credit card debts",
            Self::Bills => "Bills",
            Self::Notes => "Notes",
            Self::PortfolioHistory => "Portfolio history",
            Self::BudgetLimit => "Budget limit",
        }
    }

    /// Look a field up by its document key or cache slot
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.document_key() == key || f.slot() == key)
    }

    /// Whether a stored value carries data worth adopting
    ///
    /// Empty sequences and mappings, null, and a zero or blank budget limit
    /// count as "nothing here".
    pub fn has_content(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::BudgetLimit, Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            (Self::BudgetLimit, Value::String(s)) => parse_number(s).is_some_and(|v| v != 0.0),
            (_, Value::Array(items)) => !items.is_empty(),
            (_, Value::Object(map)) => !map.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for SnapshotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.document_key())
    }
}

/// Full state of a user's budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub goals: Vec<Value>,

    /// Category id to monthly spending limit
    #[serde(default, deserialize_with = "lenient_map")]
    pub category_limits: BTreeMap<String, f64>,

    #[serde(default)]
    pub recurring_payments: Vec<Value>,

    #[serde(default, skip_serializing_if = "BudgetLimit::is_unset")]
    pub budget_limit: BudgetLimit,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_debts: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bills: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_history: Option<Vec<PortfolioPoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,

    /// When the snapshot was exported
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis")]
    pub export_date: Option<DateTime<Utc>>,

    #[serde(default = "default_version")]
    pub version: String,

    /// Unrecognized top-level fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            transactions: Vec::new(),
            goals: Vec::new(),
            category_limits: BTreeMap::new(),
            recurring_payments: Vec::new(),
            budget_limit: BudgetLimit::unset(),
            assets: None,
            credit_card_debts: None,
            bills: None,
            notes: None,
            portfolio_history: None,
            categories: None,
            export_date: None,
            version: default_version(),
            extra: Map::new(),
        }
    }
}

impl Snapshot {
    /// An empty snapshot with every optional collection present and the
    /// default categories, as a brand-new user sees it
    pub fn fresh() -> Self {
        Self {
            assets: Some(Vec::new()),
            credit_card_debts: Some(Vec::new()),
            bills: Some(Vec::new()),
            notes: Some(Vec::new()),
            portfolio_history: Some(Vec::new()),
            categories: Some(default_categories()),
            ..Self::default()
        }
    }

    /// Copy stamped with the export time and current format version
    pub fn for_export(&self, now: DateTime<Utc>) -> Self {
        let mut snapshot = self.clone();
        snapshot.export_date = Some(now);
        snapshot.version = FORMAT_VERSION.to_string();
        snapshot
    }

    /// Categories, falling back to the defaults when none are stored
    pub fn categories_or_default(&self) -> Vec<Category> {
        self.categories.clone().unwrap_or_else(default_categories)
    }

    /// JSON value of one field (null for an absent optional field)
    pub fn field_value(&self, field: SnapshotField) -> serde_json::Result<Value> {
        match field {
            SnapshotField::Transactions => serde_json::to_value(&self.transactions),
            SnapshotField::Categories => serde_json::to_value(&self.categories),
            SnapshotField::Goals => serde_json::to_value(&self.goals),
            SnapshotField::CategoryLimits => serde_json::to_value(&self.category_limits),
            SnapshotField::RecurringPayments => serde_json::to_value(&self.recurring_payments),
            SnapshotField::Assets => serde_json::to_value(&self.assets),
            SnapshotField::CreditCardDebts => serde_json::to_value(&self.credit_card_debts),
            SnapshotField::Bills => serde_json::to_value(&self.bills),
            SnapshotField::Notes => serde_json::to_value(&self.notes),
            SnapshotField::PortfolioHistory => serde_json::to_value(&self.portfolio_history),
            SnapshotField::BudgetLimit => serde_json::to_value(self.budget_limit),
        }
    }

    /// Replace one field from its JSON value
    ///
    /// Leaves the snapshot untouched if the value has the wrong shape.
    pub fn set_field(&mut self, field: SnapshotField, value: Value) -> serde_json::Result<()> {
        match field {
            SnapshotField::Transactions => self.transactions = serde_json::from_value(value)?,
            SnapshotField::Categories => self.categories = serde_json::from_value(value)?,
            SnapshotField::Goals => self.goals = serde_json::from_value(value)?,
            SnapshotField::CategoryLimits => {
                #[derive(Deserialize)]
                struct Limits(#[serde(deserialize_with = "lenient_map")] BTreeMap<String, f64>);
                self.category_limits = serde_json::from_value::<Limits>(value)?.0;
            }
            SnapshotField::RecurringPayments => {
                self.recurring_payments = serde_json::from_value(value)?
            }
            SnapshotField::Assets => self.assets = serde_json::from_value(value)?,
            SnapshotField::CreditCardDebts => {
                self.credit_card_debts = serde_json::from_value(value)?
            }
            SnapshotField::Bills => self.bills = serde_json::from_value(value)?,
            SnapshotField::Notes => self.notes = serde_json::from_value(value)?,
            SnapshotField::PortfolioHistory => {
                self.portfolio_history = serde_json::from_value(value)?
            }
            SnapshotField::BudgetLimit => self.budget_limit = serde_json::from_value(value)?,
        }
        Ok(())
    }

    /// Number of entries held in a field (0 or 1 for the budget limit)
    pub fn entry_count(&self, field: SnapshotField) -> usize {
        fn len<T>(items: &Option<Vec<T>>) -> usize {
            items.as_ref().map_or(0, Vec::len)
        }

        match field {
            SnapshotField::Transactions => self.transactions.len(),
            SnapshotField::Categories => len(&self.categories),
            SnapshotField::Goals => self.goals.len(),
            SnapshotField::CategoryLimits => self.category_limits.len(),
            SnapshotField::RecurringPayments => self.recurring_payments.len(),
            SnapshotField::Assets => len(&self.assets),
            SnapshotField::CreditCardDebts => len(&self.credit_card_debts),
            SnapshotField::Bills => len(&self.bills),
            SnapshotField::Notes => len(&self.notes),
            SnapshotField::PortfolioHistory => len(&self.portfolio_history),
            SnapshotField::BudgetLimit => usize::from(!self.budget_limit.is_unset()),
        }
    }

    /// Total income and total expense across all transactions
    pub fn totals(&self) -> (f64, f64) {
        self.transactions
            .iter()
            .fold((0.0, 0.0), |(income, expense), txn| match txn.kind {
                super::TransactionKind::Income => (income + txn.amount, expense),
                super::TransactionKind::Expense => (income, expense + txn.amount),
            })
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}
