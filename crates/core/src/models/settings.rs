use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User-configurable behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether investment transactions move the account balance.
    /// The observed product behavior is inconsistent here, so it is a
    /// policy switch rather than a fixed rule. Off by default: only
    /// income and expense affect the balance.
    pub investment_affects_balance: bool,

    /// Oldest accepted transaction date, in days before today.
    pub max_transaction_age_days: i64,

    /// Interval for the all-groups auto refresh.
    pub refresh_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            investment_affects_balance: false,
            // roughly six months
            max_transaction_age_days: 183,
            refresh_interval: Duration::from_secs(30),
        }
    }
}
