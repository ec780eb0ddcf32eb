use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::ledger::TransactionLedger;
use crate::models::transaction::Transaction;

use super::kv::KeyValueStore;

/// Fixed key under which the transaction list is persisted.
pub const TRANSACTIONS_KEY: &str = "finpanel.transactions";

/// High-level persistence operations: load/save the transaction ledger
/// through a key-value collaborator.
pub struct StorageManager;

impl StorageManager {
    /// Load the ledger from the collaborator.
    ///
    /// Absence or corruption is not an error — both fall back to the
    /// fixed seed dataset, logged only. Worst case the user sees demo
    /// data, never a failure screen.
    pub fn load_ledger(store: &dyn KeyValueStore) -> TransactionLedger {
        match store.get(TRANSACTIONS_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<Transaction>>(&raw) {
                Ok(transactions) => {
                    debug!(count = transactions.len(), "loaded persisted transactions");
                    TransactionLedger { transactions }
                }
                Err(e) => {
                    warn!(error = %e, "persisted transactions unreadable; falling back to seed data");
                    TransactionLedger::seeded()
                }
            },
            None => {
                debug!("no persisted transactions; using seed data");
                TransactionLedger::seeded()
            }
        }
    }

    /// Serialize the full transaction list to the collaborator.
    /// Called after every successful add.
    pub fn save_ledger(
        store: &dyn KeyValueStore,
        ledger: &TransactionLedger,
    ) -> Result<(), CoreError> {
        let raw = serde_json::to_string(&ledger.transactions)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        store.set(TRANSACTIONS_KEY, &raw)
    }
}
