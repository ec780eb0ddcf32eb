use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionKind};

/// The transaction ledger: an ordered list of immutable records,
/// newest first (insertion order = recency order).
///
/// The ledger itself is a plain data container; validation and grouping
/// live in `TransactionService`. Mutation is prepend-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionLedger {
    /// All transactions, newest first
    pub transactions: Vec<Transaction>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed demo dataset shown before any user data exists, and the
    /// fallback when persisted data is absent or unreadable.
    pub fn seeded() -> Self {
        fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::NaiveDateTime {
            NaiveDate::from_ymd_opt(y, m, d)
                .and_then(|date| date.and_hms_opt(h, min, 0))
                .unwrap_or_default()
        }

        Self {
            transactions: vec![
                Transaction::new(
                    TransactionKind::Income,
                    6000.0,
                    "Salary Deposit",
                    "Salary",
                    ts(2025, 1, 31, 14, 30),
                ),
                Transaction::new(
                    TransactionKind::Expense,
                    150.75,
                    "Grocery Shopping",
                    "Groceries",
                    ts(2025, 1, 31, 12, 15),
                ),
                Transaction::new(
                    TransactionKind::Investment,
                    500.0,
                    "Bitcoin Purchase",
                    "Crypto",
                    ts(2025, 1, 31, 10, 0),
                ),
                Transaction::new(
                    TransactionKind::Expense,
                    2000.0,
                    "Rent Payment",
                    "Housing",
                    ts(2025, 1, 30, 15, 45),
                ),
                Transaction::new(
                    TransactionKind::Income,
                    800.0,
                    "Freelance Payment",
                    "Freelance",
                    ts(2025, 1, 30, 9, 30),
                ),
            ],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
