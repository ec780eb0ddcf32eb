//! Display formatting for dashboard values.
//!
//! Pure functions, no locale machinery: the dashboard renders en-US
//! style dollars (`+$6,000.00`) and long day headings
//! (`Friday, January 31, 2025`).

use chrono::NaiveDate;

use crate::models::transaction::TransactionKind;

/// Signed transaction amount: expenses render with a leading minus,
/// every other kind with a leading plus.
///
/// `amount(150.75, Expense)` → `"-$150.75"`,
/// `amount(6000.0, Income)` → `"+$6,000.00"`.
#[must_use]
pub fn amount(value: f64, kind: TransactionKind) -> String {
    let prefix = if kind == TransactionKind::Expense {
        "-"
    } else {
        "+"
    };
    format!("{prefix}${}", unsigned(value.abs()))
}

/// Unsigned currency value with separators: `currency(10000.0)` →
/// `"$10,000.00"`. Negative inputs keep their minus sign.
#[must_use]
pub fn currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}", unsigned(value.abs()))
}

/// Percentage with one decimal, as used for savings progress:
/// `percentage(50.0)` → `"50.0%"`.
#[must_use]
pub fn percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Explicitly signed percentage with two decimals, as used for the 24h
/// change: `signed_percentage(5.2)` → `"+5.20%"`.
#[must_use]
pub fn signed_percentage(value: f64) -> String {
    format!("{value:+.2}%")
}

/// Long-form day heading for transaction groups:
/// `day_heading(2025-01-31)` → `"Friday, January 31, 2025"`.
#[must_use]
pub fn day_heading(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Two decimals plus thousands separators, no sign handling.
fn unsigned(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{grouped}.{frac_part}")
}
