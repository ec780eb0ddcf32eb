use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::snapshot::{FinancialSnapshot, MetricDelta, MetricGroup};

/// Trait abstraction for snapshot data sources.
///
/// The scheduler is written against this seam, so the simulated feed can
/// be swapped for a real price/balance feed without touching the refresh
/// machinery. A fetch receives the current snapshot read-only (drift-style
/// feeds derive the next value from it) and returns a partial update for
/// one metric group.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SnapshotFeed: Send + Sync {
    /// Human-readable name of this feed (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch a partial update for one metric group.
    async fn fetch(
        &self,
        group: MetricGroup,
        snapshot: &FinancialSnapshot,
    ) -> Result<MetricDelta, CoreError>;
}
