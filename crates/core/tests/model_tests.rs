// ═══════════════════════════════════════════════════════════════════
// Model Tests — Transaction, TransactionLedger, FinancialSnapshot,
// MetricGroup, MetricDelta, LoadingState
// ═══════════════════════════════════════════════════════════════════

use chrono::{NaiveDate, NaiveDateTime};

use finpanel_core::models::ledger::TransactionLedger;
use finpanel_core::models::loading::LoadingState;
use finpanel_core::models::settings::Settings;
use finpanel_core::models::snapshot::{
    percentage_change, CryptoHolding, FinancialSnapshot, MarketTrend, Metric, MetricDelta,
    MetricGroup, SavingsEntry, SavingsMetric,
};
use finpanel_core::models::transaction::{
    Transaction, TransactionKind, ValidationErrors,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn ts(y: i32, m: u32, day: u32, h: u32, min: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(h, min, 0).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  TransactionKind
// ═══════════════════════════════════════════════════════════════════

mod transaction_kind {
    use super::*;

    #[test]
    fn display_wire_names() {
        assert_eq!(TransactionKind::Income.to_string(), "income");
        assert_eq!(TransactionKind::Expense.to_string(), "expense");
        assert_eq!(TransactionKind::Transfer.to_string(), "transfer");
        assert_eq!(TransactionKind::Investment.to_string(), "investment");
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&TransactionKind::Expense).unwrap();
        assert_eq!(json, "\"expense\"");
        let back: TransactionKind = serde_json::from_str("\"investment\"").unwrap();
        assert_eq!(back, TransactionKind::Investment);
    }

    #[test]
    fn category_catalogs_are_non_empty() {
        for kind in [
            TransactionKind::Income,
            TransactionKind::Expense,
            TransactionKind::Transfer,
            TransactionKind::Investment,
        ] {
            assert!(!kind.categories().is_empty());
        }
    }

    #[test]
    fn expense_catalog_matches_form() {
        assert_eq!(
            TransactionKind::Expense.categories(),
            &["Food", "Transport", "Housing", "Entertainment", "Utilities", "Other"]
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Transaction
// ═══════════════════════════════════════════════════════════════════

mod transaction {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        let a = Transaction::new(
            TransactionKind::Income,
            100.0,
            "Salary",
            "Salary",
            ts(2025, 1, 31, 14, 30),
        );
        let b = Transaction::new(
            TransactionKind::Income,
            100.0,
            "Salary",
            "Salary",
            ts(2025, 1, 31, 14, 30),
        );
        assert_ne!(a.id, b.id);
        assert!(!a.id.to_string().is_empty());
    }

    #[test]
    fn day_is_date_portion_of_timestamp() {
        let tx = Transaction::new(
            TransactionKind::Expense,
            150.75,
            "Grocery Shopping",
            "Groceries",
            ts(2025, 1, 31, 12, 15),
        );
        assert_eq!(tx.day(), d(2025, 1, 31));
    }

    #[test]
    fn with_notes_attaches_notes() {
        let tx = Transaction::with_notes(
            TransactionKind::Expense,
            42.0,
            "Dinner",
            "Food",
            ts(2025, 1, 15, 19, 0),
            "birthday",
        );
        assert_eq!(tx.notes.as_deref(), Some("birthday"));
    }

    #[test]
    fn serde_roundtrip() {
        let tx = Transaction::with_notes(
            TransactionKind::Investment,
            500.0,
            "Bitcoin Purchase",
            "Crypto",
            ts(2025, 1, 31, 10, 0),
            "DCA",
        );
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, back);
    }

    #[test]
    fn serde_missing_notes_defaults_to_none() {
        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "timestamp": "2025-01-31T14:30:00",
            "description": "Salary Deposit",
            "amount": 6000.0,
            "kind": "income",
            "category": "Salary"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.notes, None);
        assert_eq!(tx.kind, TransactionKind::Income);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ValidationErrors
// ═══════════════════════════════════════════════════════════════════

mod validation_errors {
    use super::*;

    #[test]
    fn starts_empty() {
        let errors = ValidationErrors::new();
        assert!(errors.is_empty());
        assert_eq!(errors.len(), 0);
    }

    #[test]
    fn keyed_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("amount", "Please enter a valid amount");
        errors.add("category", "Please select a category");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("amount"), Some("Please enter a valid amount"));
        assert_eq!(errors.get("description"), None);
    }

    #[test]
    fn display_joins_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("amount", "Please enter a valid amount");
        errors.add("date", "Date cannot be in the future");
        let text = errors.to_string();
        assert!(text.contains("amount:"));
        assert!(text.contains("date:"));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  TransactionLedger
// ═══════════════════════════════════════════════════════════════════

mod ledger {
    use super::*;

    #[test]
    fn new_is_empty() {
        let ledger = TransactionLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
    }

    #[test]
    fn seeded_has_five_transactions_newest_first() {
        let ledger = TransactionLedger::seeded();
        assert_eq!(ledger.len(), 5);

        let first = &ledger.transactions[0];
        assert_eq!(first.description, "Salary Deposit");
        assert_eq!(first.timestamp, ts(2025, 1, 31, 14, 30));

        let last = &ledger.transactions[4];
        assert_eq!(last.description, "Freelance Payment");
        assert_eq!(last.timestamp, ts(2025, 1, 30, 9, 30));
    }

    #[test]
    fn seeded_amounts_are_positive() {
        for tx in &TransactionLedger::seeded().transactions {
            assert!(tx.amount > 0.0, "{} has non-positive amount", tx.description);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
//  MetricGroup
// ═══════════════════════════════════════════════════════════════════

mod metric_group {
    use super::*;

    #[test]
    fn wire_names_roundtrip() {
        for group in MetricGroup::ALL {
            assert_eq!(MetricGroup::from_name(group.name()), Some(group));
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(MetricGroup::from_name("stocks"), None);
        assert_eq!(MetricGroup::from_name(""), None);
        assert_eq!(MetricGroup::from_name("Balance"), None);
    }

    #[test]
    fn all_lists_five_groups_in_display_order() {
        assert_eq!(MetricGroup::ALL.len(), 5);
        assert_eq!(MetricGroup::ALL[0], MetricGroup::AccountBalance);
        assert_eq!(MetricGroup::ALL[4], MetricGroup::Savings);
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&MetricGroup::AccountBalance).unwrap();
        assert_eq!(json, "\"balance\"");
        let back: MetricGroup = serde_json::from_str("\"expenses\"").unwrap();
        assert_eq!(back, MetricGroup::MonthlyExpenses);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Metric & percentage_change
// ═══════════════════════════════════════════════════════════════════

mod metric {
    use super::*;

    #[test]
    fn percentage_change_formula() {
        assert!((percentage_change(10_000.0, 8_800.0) - 13.636363636).abs() < 1e-6);
        assert!((percentage_change(4_000.0, 3_100.0) - 29.032258064).abs() < 1e-6);
    }

    #[test]
    fn percentage_change_guards_zero_previous() {
        assert_eq!(percentage_change(100.0, 0.0), 0.0);
    }

    #[test]
    fn new_derives_change() {
        let m = Metric::new(6_000.0, 4_900.0, ts(2025, 1, 31, 0, 0));
        assert!((m.percentage_change - 22.448979591).abs() < 1e-6);
    }

    #[test]
    fn recompute_change_refreshes_stale_value() {
        let mut m = Metric::new(100.0, 50.0, ts(2025, 1, 31, 0, 0));
        m.current = 75.0;
        m.recompute_change();
        assert!((m.percentage_change - 50.0).abs() < 1e-9);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  MarketTrend & CryptoMetric
// ═══════════════════════════════════════════════════════════════════

mod crypto {
    use super::*;

    #[test]
    fn trend_follows_change_sign() {
        assert_eq!(MarketTrend::from_change(5.2), MarketTrend::Bull);
        assert_eq!(MarketTrend::from_change(-0.1), MarketTrend::Bear);
        assert_eq!(MarketTrend::from_change(0.0), MarketTrend::Bear);
    }

    #[test]
    fn replace_holdings_re_totals_current() {
        let mut crypto = FinancialSnapshot::seeded().crypto;
        crypto.replace_holdings(vec![
            CryptoHolding::new("ETH", 900.0, 2_800.0),
            CryptoHolding::new("BTC", 1_500.0, 45_000.0),
        ]);
        crypto.change_24h = -2.0;
        crypto.recompute_derived();

        assert!((crypto.current - 2_400.0).abs() < 1e-9);
        assert_eq!(crypto.dominant_holding.as_ref().unwrap().symbol, "BTC");
        assert_eq!(crypto.market_trend, MarketTrend::Bear);
    }

    #[test]
    fn recompute_derived_keeps_current() {
        let mut crypto = FinancialSnapshot::seeded().crypto;
        crypto.holdings.clear();
        crypto.current = 777.0;
        crypto.recompute_derived();

        assert!((crypto.current - 777.0).abs() < 1e-9);
        assert_eq!(crypto.dominant_holding, None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  SavingsMetric
// ═══════════════════════════════════════════════════════════════════

mod savings {
    use super::*;

    fn sample() -> SavingsMetric {
        FinancialSnapshot::seeded().savings
    }

    #[test]
    fn progress_percent() {
        let savings = sample();
        assert!((savings.progress_percent() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn progress_percent_guards_zero_goal() {
        let mut savings = sample();
        savings.goal = 0.0;
        assert_eq!(savings.progress_percent(), 0.0);
    }

    #[test]
    fn projection_from_average_recent_rate() {
        // 5000 remaining at (300 + 400 + 500) / 3 = 400 per month
        // → ceil(12.5) = 13 months out.
        let savings = sample();
        let projected = savings.project_completion(d(2025, 2, 1)).unwrap();
        assert_eq!(projected, d(2026, 3, 1));
    }

    #[test]
    fn projection_none_without_recent_savings() {
        let mut savings = sample();
        savings.recent_savings.clear();
        assert_eq!(savings.project_completion(d(2025, 2, 1)), None);
    }

    #[test]
    fn projection_none_when_goal_met() {
        let mut savings = sample();
        savings.current = savings.goal;
        assert_eq!(savings.project_completion(d(2025, 2, 1)), None);
    }

    #[test]
    fn projection_none_for_non_positive_rate() {
        let mut savings = sample();
        savings.recent_savings = vec![SavingsEntry {
            date: d(2025, 1, 30),
            amount: 0.0,
        }];
        assert_eq!(savings.project_completion(d(2025, 2, 1)), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  FinancialSnapshot seed
// ═══════════════════════════════════════════════════════════════════

mod snapshot_seed {
    use super::*;

    #[test]
    fn seed_values_match_dashboard() {
        let snapshot = FinancialSnapshot::seeded();
        assert!((snapshot.account_balance.current - 10_000.0).abs() < 1e-9);
        assert!((snapshot.account_balance.previous - 8_800.0).abs() < 1e-9);
        assert!((snapshot.monthly_income.current - 6_000.0).abs() < 1e-9);
        assert!((snapshot.monthly_expenses.current - 4_000.0).abs() < 1e-9);
        assert!((snapshot.crypto.current - 2_500.0).abs() < 1e-9);
        assert!((snapshot.savings.goal - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn seed_percentage_changes_are_derived() {
        let snapshot = FinancialSnapshot::seeded();
        for (current, previous, change) in [
            (
                snapshot.account_balance.current,
                snapshot.account_balance.previous,
                snapshot.account_balance.percentage_change,
            ),
            (
                snapshot.monthly_income.current,
                snapshot.monthly_income.previous,
                snapshot.monthly_income.percentage_change,
            ),
            (
                snapshot.monthly_expenses.current,
                snapshot.monthly_expenses.previous,
                snapshot.monthly_expenses.percentage_change,
            ),
            (
                snapshot.crypto.current,
                snapshot.crypto.previous,
                snapshot.crypto.percentage_change,
            ),
            (
                snapshot.savings.current,
                snapshot.savings.previous,
                snapshot.savings.percentage_change,
            ),
        ] {
            assert!((change - percentage_change(current, previous)).abs() < 1e-9);
        }
    }

    #[test]
    fn seed_crypto_holdings_total_matches_current() {
        let crypto = FinancialSnapshot::seeded().crypto;
        assert_eq!(crypto.holdings.len(), 4);
        let total: f64 = crypto.holdings.iter().map(|h| h.value).sum();
        assert!((crypto.current - total).abs() < 1e-9);
        assert_eq!(crypto.dominant_holding.unwrap().symbol, "BTC");
        assert_eq!(crypto.market_trend, MarketTrend::Bull);
    }

    #[test]
    fn serde_roundtrip() {
        let snapshot = FinancialSnapshot::seeded();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: FinancialSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  MetricDelta
// ═══════════════════════════════════════════════════════════════════

mod metric_delta {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(MetricDelta::default().is_empty());
    }

    #[test]
    fn with_current_only_sets_current() {
        let delta = MetricDelta::with_current(9_849.25);
        assert_eq!(delta.current, Some(9_849.25));
        assert_eq!(delta.previous, None);
        assert!(!delta.is_empty());
    }

    #[test]
    fn serde_skips_absent_fields() {
        let json = serde_json::to_string(&MetricDelta::with_current(1.0)).unwrap();
        assert_eq!(json, r#"{"current":1.0}"#);
    }

    #[test]
    fn serde_parses_partial_payload() {
        let delta: MetricDelta =
            serde_json::from_str(r#"{"change_24h":5.2,"market_trend":"bull"}"#).unwrap();
        assert_eq!(delta.change_24h, Some(5.2));
        assert_eq!(delta.market_trend, Some(MarketTrend::Bull));
        assert_eq!(delta.current, None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  LoadingState
// ═══════════════════════════════════════════════════════════════════

mod loading_state {
    use super::*;

    #[test]
    fn starts_idle() {
        let state = LoadingState::new();
        assert!(!state.is_refreshing);
        assert_eq!(state.error, None);
        for group in MetricGroup::ALL {
            assert!(!state.is_busy(group));
        }
        assert!(!state.any_busy());
    }

    #[test]
    fn group_flags_are_independent() {
        let mut state = LoadingState::new();
        state.set_busy(MetricGroup::Crypto, true);

        assert!(state.is_busy(MetricGroup::Crypto));
        assert!(!state.is_busy(MetricGroup::Savings));
        assert!(state.any_busy());
    }

    #[test]
    fn set_all_busy_flips_every_group() {
        let mut state = LoadingState::new();
        state.set_all_busy(true);
        for group in MetricGroup::ALL {
            assert!(state.is_busy(group));
        }
        state.set_all_busy(false);
        assert!(!state.any_busy());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(!settings.investment_affects_balance);
        assert_eq!(settings.max_transaction_age_days, 183);
        assert_eq!(settings.refresh_interval, Duration::from_secs(30));
    }
}
