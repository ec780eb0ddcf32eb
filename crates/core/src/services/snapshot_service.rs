use chrono::{Datelike, NaiveDateTime, Utc};
use tracing::warn;

use crate::models::settings::Settings;
use crate::models::snapshot::{
    percentage_change, FinancialSnapshot, Metric, MetricDelta, MetricGroup,
};
use crate::models::transaction::{Transaction, TransactionKind};

/// Applies partial updates and transaction reconciliation to the
/// financial snapshot, keeping derived fields consistent.
///
/// Pure business logic over an owned snapshot — no I/O, no locking.
pub struct SnapshotService;

impl SnapshotService {
    pub fn new() -> Self {
        Self
    }

    /// Merge a delta into the group named by its wire name.
    ///
    /// Unknown names are logged and ignored, never an error — a feed
    /// sending a group this build doesn't know about must not take the
    /// dashboard down.
    pub fn apply_delta(&self, snapshot: &mut FinancialSnapshot, group_name: &str, delta: &MetricDelta) {
        match MetricGroup::from_name(group_name) {
            Some(group) => self.apply_group_delta(snapshot, group, delta),
            None => warn!(group = group_name, "ignoring delta for unknown metric group"),
        }
    }

    /// Merge a delta into a known group, recompute the group's derived
    /// fields, and stamp `last_updated`.
    pub fn apply_group_delta(
        &self,
        snapshot: &mut FinancialSnapshot,
        group: MetricGroup,
        delta: &MetricDelta,
    ) {
        self.apply_group_delta_at(snapshot, group, delta, Utc::now().naive_utc());
    }

    /// Same as [`apply_group_delta`](Self::apply_group_delta) with an
    /// explicit clock.
    pub fn apply_group_delta_at(
        &self,
        snapshot: &mut FinancialSnapshot,
        group: MetricGroup,
        delta: &MetricDelta,
        now: NaiveDateTime,
    ) {
        match group {
            MetricGroup::AccountBalance => {
                Self::merge_metric(&mut snapshot.account_balance, delta, now);
            }
            MetricGroup::MonthlyIncome => {
                Self::merge_metric(&mut snapshot.monthly_income, delta, now);
            }
            MetricGroup::MonthlyExpenses => {
                Self::merge_metric(&mut snapshot.monthly_expenses, delta, now);
            }
            MetricGroup::Crypto => {
                let crypto = &mut snapshot.crypto;
                if let Some(current) = delta.current {
                    crypto.current = current;
                }
                if let Some(previous) = delta.previous {
                    crypto.previous = previous;
                }
                if let Some(change) = delta.change_24h {
                    crypto.change_24h = change;
                }
                if let Some(holdings) = &delta.holdings {
                    // A holdings replacement also re-totals `current`,
                    // winning over a bare `current` in the same delta.
                    crypto.replace_holdings(holdings.clone());
                }
                crypto.recompute_derived();
                // Trend follows the 24h change unless the delta pinned it.
                if let Some(trend) = delta.market_trend {
                    crypto.market_trend = trend;
                }
                crypto.last_updated = now;
            }
            MetricGroup::Savings => {
                let savings = &mut snapshot.savings;
                if let Some(current) = delta.current {
                    savings.current = current;
                }
                if let Some(previous) = delta.previous {
                    savings.previous = previous;
                }
                if let Some(recent) = &delta.recent_savings {
                    savings.recent_savings = recent.clone();
                }
                savings.percentage_change =
                    percentage_change(savings.current, savings.previous);
                savings.projected_date = savings.project_completion(now.date());
                savings.last_updated = now;
            }
        }
    }

    /// Fold a newly added transaction into the snapshot.
    ///
    /// Must be called exactly once per record, at the moment of a
    /// successful add — never on reload or re-render. A second call for
    /// the same record double-counts; the facade is the only caller and
    /// only calls from its successful-add path.
    pub fn reconcile_transaction(
        &self,
        snapshot: &mut FinancialSnapshot,
        record: &Transaction,
        settings: &Settings,
    ) {
        self.reconcile_transaction_at(snapshot, record, settings, Utc::now().naive_utc());
    }

    /// Same as [`reconcile_transaction`](Self::reconcile_transaction) with
    /// an explicit clock.
    pub fn reconcile_transaction_at(
        &self,
        snapshot: &mut FinancialSnapshot,
        record: &Transaction,
        settings: &Settings,
        now: NaiveDateTime,
    ) {
        let amount = record.amount;

        let balance_delta = match record.kind {
            TransactionKind::Income => Some(amount),
            TransactionKind::Expense => Some(-amount),
            // Transfers move money between own accounts; net zero.
            TransactionKind::Transfer => None,
            // Policy switch: buying an asset spends cash when enabled.
            TransactionKind::Investment => {
                settings.investment_affects_balance.then_some(-amount)
            }
        };

        if let Some(delta) = balance_delta {
            let balance = &mut snapshot.account_balance;
            balance.current += delta;
            balance.recompute_change();
            balance.last_updated = now;
        }

        // Monthly aggregates only move for transactions dated this
        // calendar month (year AND month — a January transaction added
        // the following January must not count).
        let today = now.date();
        let day = record.day();
        if day.year() == today.year() && day.month() == today.month() {
            match record.kind {
                TransactionKind::Income => {
                    let income = &mut snapshot.monthly_income;
                    income.current += amount;
                    income.recompute_change();
                    income.last_updated = now;
                }
                TransactionKind::Expense => {
                    let expenses = &mut snapshot.monthly_expenses;
                    expenses.current += amount;
                    expenses.recompute_change();
                    expenses.last_updated = now;
                }
                TransactionKind::Transfer | TransactionKind::Investment => {}
            }
        }
    }

    fn merge_metric(metric: &mut Metric, delta: &MetricDelta, now: NaiveDateTime) {
        if let Some(current) = delta.current {
            metric.current = current;
        }
        if let Some(previous) = delta.previous {
            metric.previous = previous;
        }
        metric.recompute_change();
        metric.last_updated = now;
    }
}

impl Default for SnapshotService {
    fn default() -> Self {
        Self::new()
    }
}
