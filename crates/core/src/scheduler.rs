use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::feed::traits::SnapshotFeed;
use crate::models::loading::LoadingState;
use crate::models::snapshot::{FinancialSnapshot, MetricGroup};
use crate::services::snapshot_service::SnapshotService;

/// Drives periodic and on-demand snapshot refreshes through an
/// injectable [`SnapshotFeed`].
///
/// State machine: one busy flag per metric group plus a global
/// `is_refreshing` flag for the all-groups refresh. At most one refresh
/// per group is ever in flight — a trigger that arrives while its scope
/// is busy is ignored, not queued. Busy flags are cleared on every exit
/// path via a drop guard, so a failing (or cancelled) fetch can never
/// leave a card stuck in its loading overlay.
///
/// Lock discipline: the snapshot and loading locks are never held across
/// an await; fetches run lock-free and results are applied in one short
/// write-lock scope at completion time.
pub struct RefreshScheduler {
    snapshot: Arc<RwLock<FinancialSnapshot>>,
    loading: Arc<RwLock<LoadingState>>,
    feed: Arc<dyn SnapshotFeed>,
    service: SnapshotService,
    closed: Arc<AtomicBool>,
}

impl Clone for RefreshScheduler {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            loading: Arc::clone(&self.loading),
            feed: Arc::clone(&self.feed),
            service: SnapshotService::new(),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl RefreshScheduler {
    pub fn new(
        snapshot: Arc<RwLock<FinancialSnapshot>>,
        loading: Arc<RwLock<LoadingState>>,
        feed: Arc<dyn SnapshotFeed>,
    ) -> Self {
        Self {
            snapshot,
            loading,
            feed,
            service: SnapshotService::new(),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    // ── Manual triggers ─────────────────────────────────────────────

    /// Refresh every metric group.
    ///
    /// Returns `false` without starting any fetch when a full refresh is
    /// already in flight (the trigger is ignored, not queued). Otherwise
    /// clears the error slot, marks everything busy, fetches and applies
    /// each group in turn, and records the first failure as the global
    /// error message. Individual group failures do not stop the
    /// remaining groups.
    pub async fn refresh_all(&self) -> bool {
        {
            let mut loading = self.loading.write().unwrap();
            if loading.is_refreshing {
                debug!("full refresh already in flight; ignoring trigger");
                return false;
            }
            loading.is_refreshing = true;
            loading.set_all_busy(true);
            loading.error = None;
        }
        let _guard = BusyGuard {
            loading: Arc::clone(&self.loading),
            scope: BusyScope::All,
        };

        let mut first_error: Option<CoreError> = None;
        for group in MetricGroup::ALL {
            if let Err(e) = self.fetch_and_apply(group).await {
                warn!(%group, error = %e, "group refresh failed");
                first_error.get_or_insert(e);
            }
        }

        if let Some(e) = first_error {
            self.loading.write().unwrap().error = Some(e.to_string());
        }
        true
    }

    /// Refresh a single metric group.
    ///
    /// Same contract as [`refresh_all`](Self::refresh_all), scoped to one
    /// group: a no-op while that group is busy, independent of any other
    /// group's in-flight state.
    pub async fn refresh_group(&self, group: MetricGroup) -> bool {
        {
            let mut loading = self.loading.write().unwrap();
            if loading.is_busy(group) {
                debug!(%group, "group refresh already in flight; ignoring trigger");
                return false;
            }
            loading.set_busy(group, true);
            loading.error = None;
        }
        let _guard = BusyGuard {
            loading: Arc::clone(&self.loading),
            scope: BusyScope::Group(group),
        };

        if let Err(e) = self.fetch_and_apply(group).await {
            warn!(%group, error = %e, "group refresh failed");
            self.loading.write().unwrap().error = Some(e.to_string());
        }
        true
    }

    // ── Periodic triggers ───────────────────────────────────────────

    /// Start the all-groups interval loop. The first refresh fires one
    /// full `interval` after the call, then repeats until the returned
    /// handle is stopped or dropped.
    pub fn start_auto_refresh(&self, interval: Duration) -> RefreshHandle {
        self.start_loop(interval, None)
    }

    /// Start an interval loop for a single group, so cards can refresh
    /// on their own cadence (e.g. balance every 60 s, income every 90 s).
    pub fn start_group_refresh(&self, group: MetricGroup, interval: Duration) -> RefreshHandle {
        self.start_loop(interval, Some(group))
    }

    fn start_loop(&self, interval: Duration, group: Option<MetricGroup>) -> RefreshHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let scheduler = self.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // An interval's first tick completes immediately; consume it
            // so the first refresh lands one full period after start.
            ticker.tick().await;

            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if scheduler.is_closed() {
                            break;
                        }
                        match group {
                            Some(g) => {
                                scheduler.refresh_group(g).await;
                            }
                            None => {
                                scheduler.refresh_all().await;
                            }
                        }
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        RefreshHandle {
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }

    // ── State access ────────────────────────────────────────────────

    /// Current loading/error state, cloned for the view layer.
    #[must_use]
    pub fn loading(&self) -> LoadingState {
        self.loading.read().unwrap().clone()
    }

    /// Mark the scheduler shut down: results of fetches still in flight
    /// are discarded instead of applied, and interval loops exit at
    /// their next tick.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    // ── Internal ────────────────────────────────────────────────────

    async fn fetch_and_apply(&self, group: MetricGroup) -> Result<(), CoreError> {
        // Fetch against a cloned snapshot; no lock spans the await.
        let current = self.snapshot.read().unwrap().clone();
        let delta = self.feed.fetch(group, &current).await?;

        if self.is_closed() {
            debug!(%group, "discarding refresh result after shutdown");
            return Ok(());
        }

        let mut snapshot = self.snapshot.write().unwrap();
        self.service.apply_group_delta(&mut snapshot, group, &delta);
        Ok(())
    }
}

/// Cancellation handle for an interval loop, tied to the view lifetime.
///
/// Stopping (or dropping) the handle signals the loop to exit; a cycle
/// already in flight finishes and clears its busy flags, but no new
/// cycle starts afterwards.
#[must_use = "dropping the handle stops the auto refresh"]
pub struct RefreshHandle {
    shutdown: watch::Sender<bool>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl RefreshHandle {
    /// Stop the periodic trigger.
    pub fn stop(self) {
        self.signal();
    }

    /// Stop the periodic trigger and wait for the loop task to exit.
    pub async fn stop_and_wait(mut self) {
        self.signal();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    fn signal(&self) {
        let _ = self.shutdown.send(true);
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.signal();
    }
}

enum BusyScope {
    All,
    Group(MetricGroup),
}

/// Clears busy flags when the refresh scope ends, including when the
/// refresh future is dropped mid-flight.
struct BusyGuard {
    loading: Arc<RwLock<LoadingState>>,
    scope: BusyScope,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if let Ok(mut loading) = self.loading.write() {
            match self.scope {
                BusyScope::All => {
                    loading.set_all_busy(false);
                    loading.is_refreshing = false;
                }
                BusyScope::Group(group) => loading.set_busy(group, false),
            }
        }
    }
}
