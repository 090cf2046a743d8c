//! The module contains `CashBook`, the ledger of one calendar day.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Activity, ActivityLog, Entry};

/// One calendar day's ledger of debit/credit entries.
///
/// `entries` keeps insertion order (oldest first); `activity_log` only grows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashBook {
    /// Same value as `date`, kept as a separate field of the document.
    pub id: String,
    pub date: NaiveDate,
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub activity_log: Vec<ActivityLog>,
}

impl CashBook {
    /// An empty cash-book for `date`, without any log record.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: date.to_string(),
            date,
            entries: Vec::new(),
            activity_log: Vec::new(),
        }
    }

    /// An empty cash-book that records its own creation.
    pub fn initialized(date: NaiveDate, now: DateTime<Utc>) -> Self {
        let mut book = Self::new(date);
        book.record(Activity::Init { date }, now);
        book
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Date this book was seeded from, if it was carried forward.
    pub fn carried_from(&self) -> Option<NaiveDate> {
        self.activity_log
            .iter()
            .find_map(|log| match log.activity {
                Activity::Init { date } if date != self.date => Some(date),
                _ => None,
            })
    }

    pub(crate) fn record(&mut self, activity: Activity, now: DateTime<Utc>) {
        self.activity_log.push(ActivityLog::new(activity, now));
    }

    /// Append `entry` and an `add` record.
    pub(crate) fn add_entry(&mut self, entry: Entry, now: DateTime<Utc>) {
        self.record(
            Activity::Add {
                account: entry.account.clone(),
                amount: entry.amount,
            },
            now,
        );
        self.entries.push(entry);
    }

    /// Overwrite the editable fields of the entry with the same id.
    ///
    /// Returns `false` when the id is unknown. An `update` record is appended
    /// only when the amount changed.
    pub(crate) fn update_entry(&mut self, update: &Entry, now: DateTime<Utc>) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == update.id) else {
            return false;
        };

        let old_amount = entry.amount;
        entry.amount = update.amount;
        entry.account = update.account.clone();
        entry.checked = update.checked;
        entry.updated_at = Some(now);

        if old_amount != update.amount {
            let account = update.account.clone();
            self.record(
                Activity::Update {
                    account,
                    old_amount,
                    new_amount: update.amount,
                },
                now,
            );
        }
        true
    }

    /// Remove the entry with `id`, logging its last known account/amount.
    pub(crate) fn delete_entry(&mut self, id: &str, now: DateTime<Utc>) -> Option<Entry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        let entry = self.entries.remove(index);
        self.record(
            Activity::Delete {
                account: entry.account.clone(),
                amount: entry.amount,
            },
            now,
        );
        Some(entry)
    }
}
