use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::errors::CoreError;
use crate::models::snapshot::{FinancialSnapshot, MetricDelta, MetricGroup};

use super::traits::SnapshotFeed;

/// Simulated data source: no network, just bounded random drift on the
/// current snapshot values, after a short artificial latency.
///
/// Drift magnitudes per group:
/// - balance: ±1 %, rounded to a whole value
/// - income / expenses / savings: ±2 %
/// - crypto: each holding ±5 %, 24h change drifts by ±1 point
pub struct SimulatedFeed {
    min_latency: Duration,
    max_latency: Duration,
}

impl SimulatedFeed {
    /// Default latency window: 800–1200 ms, like a slow-ish API.
    pub fn new() -> Self {
        Self {
            min_latency: Duration::from_millis(800),
            max_latency: Duration::from_millis(1200),
        }
    }

    /// No artificial latency. Intended for tests.
    pub fn instant() -> Self {
        Self {
            min_latency: Duration::ZERO,
            max_latency: Duration::ZERO,
        }
    }

    fn pick_latency(&self) -> Duration {
        if self.max_latency.is_zero() {
            return Duration::ZERO;
        }
        // rng is scoped: ThreadRng must not be held across an await.
        let mut rng = rand::thread_rng();
        rng.gen_range(self.min_latency..=self.max_latency)
    }

    fn drift(&self, group: MetricGroup, snapshot: &FinancialSnapshot) -> MetricDelta {
        let mut rng = rand::thread_rng();

        match group {
            MetricGroup::AccountBalance => MetricDelta::with_current(
                (snapshot.account_balance.current * (1.0 + rng.gen_range(-0.01..0.01)))
                    .round(),
            ),
            MetricGroup::MonthlyIncome => MetricDelta::with_current(
                snapshot.monthly_income.current * (1.0 + rng.gen_range(-0.02..0.02)),
            ),
            MetricGroup::MonthlyExpenses => MetricDelta::with_current(
                snapshot.monthly_expenses.current * (1.0 + rng.gen_range(-0.02..0.02)),
            ),
            MetricGroup::Crypto => {
                let holdings = snapshot
                    .crypto
                    .holdings
                    .iter()
                    .map(|h| {
                        let mut drifted = h.clone();
                        drifted.value *= 1.0 + rng.gen_range(-0.05..0.05);
                        drifted.price *= 1.0 + rng.gen_range(-0.05..0.05);
                        drifted
                    })
                    .collect();
                let change_24h = ((snapshot.crypto.change_24h + rng.gen_range(-1.0..1.0))
                    * 100.0)
                    .round()
                    / 100.0;
                MetricDelta {
                    holdings: Some(holdings),
                    change_24h: Some(change_24h),
                    ..MetricDelta::default()
                }
            }
            MetricGroup::Savings => MetricDelta::with_current(
                snapshot.savings.current * (1.0 + rng.gen_range(-0.02..0.02)),
            ),
        }
    }
}

impl Default for SimulatedFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotFeed for SimulatedFeed {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn fetch(
        &self,
        group: MetricGroup,
        snapshot: &FinancialSnapshot,
    ) -> Result<MetricDelta, CoreError> {
        let latency = self.pick_latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        Ok(self.drift(group, snapshot))
    }
}
