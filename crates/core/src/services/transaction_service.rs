use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::models::ledger::TransactionLedger;
use crate::models::settings::Settings;
use crate::models::transaction::{Transaction, TransactionDraft, ValidationErrors};

/// Validates, enriches, and prepends transactions; derives the
/// grouped-by-day display view.
///
/// Pure business logic — no I/O. Persistence is the facade's concern.
pub struct TransactionService;

impl TransactionService {
    pub fn new() -> Self {
        Self
    }

    /// Validate a draft and, on success, prepend the enriched record to
    /// the ledger and return it. On failure the ledger is untouched and
    /// every offending field is reported at once.
    pub fn add_transaction(
        &self,
        ledger: &mut TransactionLedger,
        draft: TransactionDraft,
        settings: &Settings,
    ) -> Result<Transaction, ValidationErrors> {
        self.add_transaction_at(ledger, draft, settings, Utc::now().naive_utc())
    }

    /// Same as [`add_transaction`](Self::add_transaction) with an explicit
    /// clock, so validation windows and enrichment are testable.
    pub fn add_transaction_at(
        &self,
        ledger: &mut TransactionLedger,
        draft: TransactionDraft,
        settings: &Settings,
        now: NaiveDateTime,
    ) -> Result<Transaction, ValidationErrors> {
        self.validate(&draft, settings, now.date())?;

        let record = Self::enrich(draft, now);
        // Prepend: insertion order is recency order, newest first.
        ledger.transactions.insert(0, record.clone());
        Ok(record)
    }

    /// Validate a draft without touching the ledger.
    ///
    /// Rules:
    /// - amount must be positive and finite
    /// - description and category must be non-empty after trimming
    /// - date must not be in the future, and not older than the
    ///   configured window
    pub fn validate(
        &self,
        draft: &TransactionDraft,
        settings: &Settings,
        today: NaiveDate,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            errors.add("amount", "Please enter a valid amount");
        }
        if draft.description.trim().is_empty() {
            errors.add("description", "Description is required");
        }
        if draft.category.trim().is_empty() {
            errors.add("category", "Please select a category");
        }
        if draft.date > today {
            errors.add("date", "Date cannot be in the future");
        } else if (today - draft.date).num_days() > settings.max_transaction_age_days {
            errors.add(
                "date",
                format!(
                    "Date is more than {} days in the past",
                    settings.max_transaction_age_days
                ),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Produce the grouped-by-day view: `(day, transactions)` pairs ordered
    /// by day descending, transactions within a day in insertion order
    /// (most recent first). Restartable — call again for a fresh pass.
    pub fn grouped_by_day<'a>(&self, ledger: &'a TransactionLedger) -> DayGroups<'a> {
        DayGroups::new(&ledger.transactions)
    }

    /// Turn an accepted draft into a ledger record: generate the id and
    /// stamp the submitted day with the current time-of-day, as the form
    /// did. Seconds are dropped — display granularity is minutes.
    fn enrich(draft: TransactionDraft, now: NaiveDateTime) -> Transaction {
        let time = NaiveTime::from_hms_opt(now.time().hour(), now.time().minute(), 0)
            .unwrap_or_else(|| now.time());
        let timestamp = draft.date.and_time(time);

        match draft.notes {
            Some(notes) if !notes.trim().is_empty() => Transaction::with_notes(
                draft.kind,
                draft.amount,
                draft.description,
                draft.category,
                timestamp,
                notes,
            ),
            _ => Transaction::new(
                draft.kind,
                draft.amount,
                draft.description,
                draft.category,
                timestamp,
            ),
        }
    }
}

impl Default for TransactionService {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(day, transactions)` pairs, day descending.
///
/// Grouping key is the date portion of each transaction's timestamp.
/// Within a day, records keep ledger order (newest first); across days
/// the groups are sorted descending even when a backdated record was
/// inserted out of date order.
pub struct DayGroups<'a> {
    groups: std::vec::IntoIter<(NaiveDate, Vec<&'a Transaction>)>,
}

impl<'a> DayGroups<'a> {
    fn new(transactions: &'a [Transaction]) -> Self {
        let mut groups: Vec<(NaiveDate, Vec<&'a Transaction>)> = Vec::new();

        for tx in transactions {
            let day = tx.day();
            match groups.iter_mut().find(|(d, _)| *d == day) {
                Some((_, members)) => members.push(tx),
                None => groups.push((day, vec![tx])),
            }
        }

        groups.sort_by(|a, b| b.0.cmp(&a.0));

        Self {
            groups: groups.into_iter(),
        }
    }
}

impl<'a> Iterator for DayGroups<'a> {
    type Item = (NaiveDate, Vec<&'a Transaction>);

    fn next(&mut self) -> Option<Self::Item> {
        self.groups.next()
    }
}
