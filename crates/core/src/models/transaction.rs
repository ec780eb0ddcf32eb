use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Kind of ledger transaction.
///
/// Determines the sign of the display amount and how (and whether) the
/// transaction reconciles into the financial snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (salary, freelance, ...)
    Income,
    /// Money going out (groceries, rent, ...)
    Expense,
    /// Movement between own accounts — never affects the balance
    Transfer,
    /// Asset purchase (stocks, crypto, ...) — balance effect is a policy choice
    Investment,
}

impl TransactionKind {
    /// Suggested categories per kind, as offered by the add-transaction form.
    /// Purely advisory — validation only requires a non-empty category.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            TransactionKind::Income => &["Salary", "Freelance", "Investments", "Other"],
            TransactionKind::Expense => &[
                "Food",
                "Transport",
                "Housing",
                "Entertainment",
                "Utilities",
                "Other",
            ],
            TransactionKind::Transfer => {
                &["Bank Transfer", "Credit Card", "Savings", "Investment"]
            }
            TransactionKind::Investment => &["Stocks", "Crypto", "Real Estate", "Other"],
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
            TransactionKind::Transfer => write!(f, "transfer"),
            TransactionKind::Investment => write!(f, "investment"),
        }
    }
}

/// A single ledger transaction.
///
/// **Immutable once created**: the ledger only ever prepends new records.
/// There is no update or delete path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, generated client-side at creation
    pub id: Uuid,

    /// Full timestamp (minute granularity); the date portion drives
    /// day-grouping, the time portion is display-only
    pub timestamp: NaiveDateTime,

    /// What the money moved for (e.g., "Grocery Shopping")
    pub description: String,

    /// Amount of the transaction (always positive; sign comes from `kind`)
    pub amount: f64,

    /// Income / Expense / Transfer / Investment
    pub kind: TransactionKind,

    /// User-chosen category (e.g., "Groceries", "Housing")
    pub category: String,

    /// Optional free-text notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            description: description.into(),
            amount,
            kind,
            category: category.into(),
            notes: None,
        }
    }

    /// Create a transaction with notes attached.
    pub fn with_notes(
        kind: TransactionKind,
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        timestamp: NaiveDateTime,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Self::new(kind, amount, description, category, timestamp)
        }
    }

    /// The date portion of the timestamp — the day-grouping key.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Unvalidated add-transaction payload, as submitted by the form.
///
/// The date is day-granular (a date-field value); enrichment stamps the
/// current time-of-day onto it when the draft is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Field-keyed validation errors for a rejected [`TransactionDraft`].
///
/// Keys are the offending field names (`"amount"`, `"description"`,
/// `"category"`, `"date"`); values are messages suitable for inline
/// display next to the field. Never converted into a `CoreError` —
/// validation failures are recoverable form state, not library errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The message for a specific field, if that field failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}
