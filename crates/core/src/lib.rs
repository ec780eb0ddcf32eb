pub mod errors;
pub mod feed;
pub mod format;
pub mod models;
#[cfg(not(target_arch = "wasm32"))]
pub mod scheduler;
pub mod services;
pub mod storage;

use std::sync::{Arc, RwLock};

use tracing::warn;

use models::{
    ledger::TransactionLedger,
    loading::LoadingState,
    settings::Settings,
    snapshot::{FinancialSnapshot, MetricDelta, MetricGroup},
    transaction::{Transaction, TransactionDraft, ValidationErrors},
};
use services::{
    snapshot_service::SnapshotService,
    transaction_service::{DayGroups, TransactionService},
};
use storage::kv::KeyValueStore;
use storage::manager::StorageManager;

#[cfg(not(target_arch = "wasm32"))]
use feed::simulated::SimulatedFeed;
#[cfg(not(target_arch = "wasm32"))]
use feed::traits::SnapshotFeed;
#[cfg(not(target_arch = "wasm32"))]
use scheduler::{RefreshHandle, RefreshScheduler};

/// Main entry point for the FinPanel core library.
///
/// The explicit owner of all dashboard state (transaction ledger,
/// financial snapshot, loading flags) and of the services and refresh
/// scheduler that operate on it. There is no ambient singleton: hosts
/// construct a `FinPanel` and pass it (by reference) to whatever renders
/// it.
///
/// Views only ever read cloned state ([`snapshot`](Self::snapshot),
/// [`loading`](Self::loading)); every mutation goes through a facade
/// operation.
#[must_use]
pub struct FinPanel {
    snapshot: Arc<RwLock<FinancialSnapshot>>,
    loading: Arc<RwLock<LoadingState>>,
    ledger: TransactionLedger,
    settings: Settings,
    transaction_service: TransactionService,
    snapshot_service: SnapshotService,
    /// Optional local key-value collaborator for transaction persistence.
    storage: Option<Arc<dyn KeyValueStore>>,
    #[cfg(not(target_arch = "wasm32"))]
    scheduler: RefreshScheduler,
}

impl std::fmt::Debug for FinPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinPanel")
            .field("transactions", &self.ledger.len())
            .field("settings", &self.settings)
            .field("persistent", &self.storage.is_some())
            .finish()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for FinPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl FinPanel {
    /// Create a dashboard over the seed dataset, with the simulated feed
    /// and no persistence.
    pub fn new() -> Self {
        Self::with_feed(Arc::new(SimulatedFeed::new()))
    }

    /// Create a dashboard persisted through a key-value collaborator.
    /// The ledger is loaded from the collaborator on init; absent or
    /// corrupt data falls back to the seed dataset.
    pub fn with_storage(store: Arc<dyn KeyValueStore>) -> Self {
        let ledger = StorageManager::load_ledger(store.as_ref());
        Self::build(ledger, Some(store), Arc::new(SimulatedFeed::new()))
    }

    /// Create a dashboard over the seed dataset with a custom feed.
    pub fn with_feed(feed: Arc<dyn SnapshotFeed>) -> Self {
        Self::build(TransactionLedger::seeded(), None, feed)
    }

    /// Create a persisted dashboard with a custom feed.
    pub fn with_storage_and_feed(
        store: Arc<dyn KeyValueStore>,
        feed: Arc<dyn SnapshotFeed>,
    ) -> Self {
        let ledger = StorageManager::load_ledger(store.as_ref());
        Self::build(ledger, Some(store), feed)
    }

    fn build(
        ledger: TransactionLedger,
        storage: Option<Arc<dyn KeyValueStore>>,
        feed: Arc<dyn SnapshotFeed>,
    ) -> Self {
        let snapshot = Arc::new(RwLock::new(FinancialSnapshot::seeded()));
        let loading = Arc::new(RwLock::new(LoadingState::new()));
        let scheduler =
            RefreshScheduler::new(Arc::clone(&snapshot), Arc::clone(&loading), feed);

        Self {
            snapshot,
            loading,
            ledger,
            settings: Settings::default(),
            transaction_service: TransactionService::new(),
            snapshot_service: SnapshotService::new(),
            storage,
            scheduler,
        }
    }

    // ── Refresh ─────────────────────────────────────────────────────

    /// Refresh every metric group now. A no-op returning `false` while a
    /// full refresh is already in flight.
    pub async fn refresh_all(&self) -> bool {
        self.scheduler.refresh_all().await
    }

    /// Refresh a single metric group now. A no-op returning `false`
    /// while that group is already refreshing.
    pub async fn refresh_group(&self, group: MetricGroup) -> bool {
        self.scheduler.refresh_group(group).await
    }

    /// Start the periodic all-groups refresh at the configured interval.
    /// The returned handle must be stopped (or dropped) when the owning
    /// view unmounts.
    pub fn start_auto_refresh(&self) -> RefreshHandle {
        self.scheduler.start_auto_refresh(self.settings.refresh_interval)
    }

    /// Start the periodic all-groups refresh at a custom interval.
    pub fn start_auto_refresh_every(&self, interval: std::time::Duration) -> RefreshHandle {
        self.scheduler.start_auto_refresh(interval)
    }

    /// Start a periodic refresh for one group at its own cadence.
    pub fn start_group_refresh(
        &self,
        group: MetricGroup,
        interval: std::time::Duration,
    ) -> RefreshHandle {
        self.scheduler.start_group_refresh(group, interval)
    }
}

impl FinPanel {
    // ── Transactions ────────────────────────────────────────────────

    /// Validate and add a transaction.
    ///
    /// On success the enriched record (generated id, normalized
    /// timestamp) is prepended to the ledger, the full list is persisted
    /// to the storage collaborator (when present), and the record is
    /// reconciled into the snapshot — exactly once, here and only here.
    /// On failure the field-keyed error map is returned and nothing
    /// changes.
    pub fn add_transaction(
        &mut self,
        draft: TransactionDraft,
    ) -> Result<Transaction, ValidationErrors> {
        let record =
            self.transaction_service
                .add_transaction(&mut self.ledger, draft, &self.settings)?;

        // Persistence is best-effort: a storage failure must not undo
        // the in-memory add or surface as a form error.
        if let Some(store) = &self.storage {
            if let Err(e) = StorageManager::save_ledger(store.as_ref(), &self.ledger) {
                warn!(error = %e, "failed to persist transactions");
            }
        }

        {
            let mut snapshot = self.snapshot.write().unwrap();
            self.snapshot_service
                .reconcile_transaction(&mut snapshot, &record, &self.settings);
        }

        Ok(record)
    }

    /// All transactions, newest first.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.ledger.transactions
    }

    /// Number of transactions in the ledger.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.ledger.len()
    }

    /// The grouped-by-day display view: `(day, transactions)` pairs,
    /// day descending. Restartable — call again for a fresh pass.
    pub fn grouped_by_day(&self) -> DayGroups<'_> {
        self.transaction_service.grouped_by_day(&self.ledger)
    }

    // ── Snapshot ────────────────────────────────────────────────────

    /// The current financial snapshot, cloned for rendering.
    #[must_use]
    pub fn snapshot(&self) -> FinancialSnapshot {
        self.snapshot.read().unwrap().clone()
    }

    /// Merge a partial update into the group named by its wire name.
    /// Unknown names are logged and ignored.
    pub fn apply_delta(&self, group_name: &str, delta: &MetricDelta) {
        let mut snapshot = self.snapshot.write().unwrap();
        self.snapshot_service
            .apply_delta(&mut snapshot, group_name, delta);
    }

    /// Current loading/error state, cloned for rendering.
    #[must_use]
    pub fn loading(&self) -> LoadingState {
        self.loading.read().unwrap().clone()
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether investment transactions move the account balance.
    pub fn set_investment_policy(&mut self, affects_balance: bool) {
        self.settings.investment_affects_balance = affects_balance;
    }

    /// Change the interval used by [`start_auto_refresh`](Self::start_auto_refresh).
    /// Loops already running keep their original cadence.
    pub fn set_refresh_interval(&mut self, interval: std::time::Duration) {
        self.settings.refresh_interval = interval;
    }
}

impl Drop for FinPanel {
    fn drop(&mut self) {
        // Results of fetches still in flight must be discarded, not
        // applied to a dashboard nobody owns anymore.
        #[cfg(not(target_arch = "wasm32"))]
        self.scheduler.shutdown();
    }
}
