use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The five metric groups of the dashboard.
///
/// The string names are the wire/display names used by feeds and the
/// loading-state map (`"balance"`, `"income"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricGroup {
    #[serde(rename = "balance")]
    AccountBalance,
    #[serde(rename = "income")]
    MonthlyIncome,
    #[serde(rename = "expenses")]
    MonthlyExpenses,
    #[serde(rename = "crypto")]
    Crypto,
    #[serde(rename = "savings")]
    Savings,
}

impl MetricGroup {
    /// All groups, in dashboard display order.
    pub const ALL: [MetricGroup; 5] = [
        MetricGroup::AccountBalance,
        MetricGroup::MonthlyIncome,
        MetricGroup::MonthlyExpenses,
        MetricGroup::Crypto,
        MetricGroup::Savings,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MetricGroup::AccountBalance => "balance",
            MetricGroup::MonthlyIncome => "income",
            MetricGroup::MonthlyExpenses => "expenses",
            MetricGroup::Crypto => "crypto",
            MetricGroup::Savings => "savings",
        }
    }

    /// Parse a wire name. Unrecognized names yield `None`; callers log
    /// and ignore rather than error (display-only system).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "balance" => Some(MetricGroup::AccountBalance),
            "income" => Some(MetricGroup::MonthlyIncome),
            "expenses" => Some(MetricGroup::MonthlyExpenses),
            "crypto" => Some(MetricGroup::Crypto),
            "savings" => Some(MetricGroup::Savings),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Overall 24h market direction for the crypto group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketTrend {
    Bull,
    Bear,
}

impl MarketTrend {
    /// Trend implied by a 24h change figure.
    #[must_use]
    pub fn from_change(change_24h: f64) -> Self {
        if change_24h > 0.0 {
            MarketTrend::Bull
        } else {
            MarketTrend::Bear
        }
    }
}

/// One crypto position in the portfolio summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoHolding {
    /// Ticker symbol (e.g., "BTC")
    pub symbol: String,
    /// Position value in the display currency
    pub value: f64,
    /// Unit price in the display currency
    pub price: f64,
}

impl CryptoHolding {
    pub fn new(symbol: impl Into<String>, value: f64, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            value,
            price,
        }
    }
}

/// One recent contribution toward the savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsEntry {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Compute a percentage change, guarding the zero denominator.
#[must_use]
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Common fields of every metric group: the current and previous values,
/// the derived percentage change, and the last refresh stamp.
///
/// `percentage_change` is always recomputed from `current`/`previous`
/// after a merge — a stale stored value is never trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub current: f64,
    pub previous: f64,
    pub percentage_change: f64,
    pub last_updated: NaiveDateTime,
}

impl Metric {
    pub fn new(current: f64, previous: f64, last_updated: NaiveDateTime) -> Self {
        Self {
            current,
            previous,
            percentage_change: percentage_change(current, previous),
            last_updated,
        }
    }

    /// Re-derive `percentage_change` from the stored values.
    pub fn recompute_change(&mut self) {
        self.percentage_change = percentage_change(self.current, self.previous);
    }
}

/// The crypto metric group: a [`Metric`] plus market-summary extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoMetric {
    /// Total portfolio value (sum of holding values)
    pub current: f64,
    pub previous: f64,
    pub percentage_change: f64,
    pub last_updated: NaiveDateTime,

    /// 24h market change, in percent
    pub change_24h: f64,
    /// Bull when `change_24h` is positive
    pub market_trend: MarketTrend,
    pub holdings: Vec<CryptoHolding>,
    /// Largest holding by value
    pub dominant_holding: Option<CryptoHolding>,
}

impl CryptoMetric {
    /// Re-derive the fields that follow from the holdings and the 24h
    /// change: dominant holding, trend, percentage change. The total
    /// (`current`) is only recomputed when the holdings themselves are
    /// replaced — see [`replace_holdings`](Self::replace_holdings).
    pub fn recompute_derived(&mut self) {
        self.dominant_holding = self
            .holdings
            .iter()
            .max_by(|a, b| {
                a.value
                    .partial_cmp(&b.value)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned();
        self.market_trend = MarketTrend::from_change(self.change_24h);
        self.percentage_change = percentage_change(self.current, self.previous);
    }

    /// Replace the holdings list and recompute the total from it.
    pub fn replace_holdings(&mut self, holdings: Vec<CryptoHolding>) {
        self.current = holdings.iter().map(|h| h.value).sum();
        self.holdings = holdings;
    }
}

/// The savings metric group: a [`Metric`] plus goal-tracking extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsMetric {
    /// Amount saved so far
    pub current: f64,
    pub previous: f64,
    pub percentage_change: f64,
    pub last_updated: NaiveDateTime,

    /// The savings goal
    pub goal: f64,
    /// Planned monthly contribution
    pub monthly_target: f64,
    /// User-chosen deadline
    pub target_date: NaiveDate,
    /// When the goal is reached at the current rate, if it ever is
    pub projected_date: Option<NaiveDate>,
    /// Recent contributions, newest first
    pub recent_savings: Vec<SavingsEntry>,
}

impl SavingsMetric {
    /// Progress toward the goal, in percent (0 when the goal is 0).
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.goal == 0.0 {
            0.0
        } else {
            self.current / self.goal * 100.0
        }
    }

    /// Project the completion date from the average recent contribution,
    /// treated as a monthly rate. `None` when there is no positive rate
    /// to extrapolate from, or the goal is already met.
    #[must_use]
    pub fn project_completion(&self, today: NaiveDate) -> Option<NaiveDate> {
        if self.current >= self.goal || self.recent_savings.is_empty() {
            return None;
        }
        let rate = self.recent_savings.iter().map(|e| e.amount).sum::<f64>()
            / self.recent_savings.len() as f64;
        if rate <= 0.0 {
            return None;
        }
        let months = ((self.goal - self.current) / rate).ceil() as u32;
        today.checked_add_months(chrono::Months::new(months))
    }
}

/// The aggregate dashboard snapshot: one record per metric group.
///
/// Cheap to clone; readers always receive a clone, never a live
/// reference into the owning store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub account_balance: Metric,
    pub monthly_income: Metric,
    pub monthly_expenses: Metric,
    pub crypto: CryptoMetric,
    pub savings: SavingsMetric,
}

impl FinancialSnapshot {
    /// The fixed demo snapshot shown at process start.
    pub fn seeded() -> Self {
        fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
            NaiveDate::from_ymd_opt(y, m, d)
                .and_then(|date| date.and_hms_opt(h, min, 0))
                .unwrap_or_default()
        }
        fn day(y: i32, m: u32, d: u32) -> NaiveDate {
            NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
        }

        let holdings = vec![
            CryptoHolding::new("BTC", 1500.0, 45_000.0),
            CryptoHolding::new("ETH", 600.0, 2_800.0),
            CryptoHolding::new("SOL", 250.0, 98.0),
            CryptoHolding::new("DOT", 150.0, 15.0),
        ];

        let mut crypto = CryptoMetric {
            current: 2500.0,
            previous: 2400.0,
            percentage_change: 0.0,
            last_updated: ts(2025, 1, 31, 14, 30),
            change_24h: 5.2,
            market_trend: MarketTrend::Bull,
            holdings,
            dominant_holding: None,
        };
        crypto.recompute_derived();

        Self {
            account_balance: Metric::new(10_000.0, 8_800.0, ts(2025, 1, 31, 14, 30)),
            monthly_income: Metric::new(6_000.0, 4_900.0, ts(2025, 1, 31, 0, 0)),
            monthly_expenses: Metric::new(4_000.0, 3_100.0, ts(2025, 1, 31, 0, 0)),
            crypto,
            savings: SavingsMetric {
                current: 5_000.0,
                previous: 4_700.0,
                percentage_change: percentage_change(5_000.0, 4_700.0),
                last_updated: ts(2025, 1, 31, 0, 0),
                goal: 10_000.0,
                monthly_target: 500.0,
                target_date: day(2025, 12, 31),
                projected_date: Some(day(2025, 10, 15)),
                recent_savings: vec![
                    SavingsEntry {
                        date: day(2025, 1, 30),
                        amount: 300.0,
                    },
                    SavingsEntry {
                        date: day(2025, 1, 15),
                        amount: 400.0,
                    },
                    SavingsEntry {
                        date: day(2025, 1, 1),
                        amount: 500.0,
                    },
                ],
            },
        }
    }
}

impl Default for FinancialSnapshot {
    fn default() -> Self {
        Self::seeded()
    }
}

/// A partial update to one metric group, as produced by a feed.
///
/// Every field is optional; merging ignores fields that do not apply to
/// the target group (e.g. `holdings` against `balance`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_trend: Option<MarketTrend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holdings: Option<Vec<CryptoHolding>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_savings: Option<Vec<SavingsEntry>>,
}

impl MetricDelta {
    /// A delta that only replaces the current value — the common case.
    #[must_use]
    pub fn with_current(current: f64) -> Self {
        Self {
            current: Some(current),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
