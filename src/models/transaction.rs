//! Transaction model
//!
//! An income or expense entry. Fields this version does not know about are
//! kept in `extra` so they survive a load/save or backup round trip.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::ids::EntryId;
use super::number::lenient_f64;

/// Direction of money flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in
    Income,
    /// Money going out
    #[default]
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier; entries saved without one keep none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Unsigned amount; the sign comes from `kind`
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,

    /// Category id
    #[serde(default)]
    pub category: String,

    /// Income or expense
    #[serde(rename = "type", default)]
    pub kind: TransactionKind,

    /// Date as `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,

    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transaction {
    /// Create a new transaction with a fresh id
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        kind: TransactionKind,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Some(EntryId::new()),
            description: description.into(),
            amount: amount.abs(),
            category: category.into(),
            kind,
            date: date.format("%Y-%m-%d").to_string(),
            extra: Map::new(),
        }
    }

    /// Amount with sign: positive for income, negative for expense
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// The date, if it parses
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// `YYYY-MM` prefix of the date
    pub fn month(&self) -> Option<&str> {
        self.date.get(..7)
    }

    /// Check whether the transaction falls in the given `YYYY-MM` month
    pub fn in_month(&self, month: &str) -> bool {
        self.month() == Some(month)
    }
}
