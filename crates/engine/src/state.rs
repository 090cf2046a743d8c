//! The persisted ledger slice and its actions.
//!
//! Every action returns whether persisted data changed, so the store knows
//! when to snapshot and notify. Actions never fail: unknown ids are ignored.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{ActivityLog, CashBook, Entry, Money, carry_forward};

/// `{activeDate, cashBookByDate}`, the whole durable state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    pub active_date: NaiveDate,
    pub cash_book_by_date: BTreeMap<NaiveDate, CashBook>,
}

impl LedgerState {
    pub fn new(active_date: NaiveDate) -> Self {
        Self {
            active_date,
            cash_book_by_date: BTreeMap::new(),
        }
    }

    /// The stored cash-book of the active date.
    pub fn active_book(&self) -> Option<&CashBook> {
        self.cash_book_by_date.get(&self.active_date)
    }

    /// What a read-only view shows for the active date: its own cash-book,
    /// else the nearest earlier one. Nothing is materialized.
    pub fn visible_book(&self) -> Option<&CashBook> {
        self.active_book()
            .or_else(|| carry_forward::most_recent_before(&self.cash_book_by_date, self.active_date))
    }

    /// Activity of the active date, most recent first.
    pub fn activity_log_for_active_date(&self) -> Vec<&ActivityLog> {
        self.active_book()
            .map(|book| book.activity_log.iter().rev().collect())
            .unwrap_or_default()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.cash_book_by_date.keys().copied()
    }

    pub(crate) fn set_active_date(&mut self, date: NaiveDate) -> bool {
        if self.active_date == date {
            return false;
        }
        self.active_date = date;
        true
    }

    /// Make sure the active date has a cash-book, returning `true` when one
    /// had to be created.
    fn materialize(&mut self, now: DateTime<Utc>) -> bool {
        let date = self.active_date;
        if self.cash_book_by_date.contains_key(&date) {
            return false;
        }

        let book = match carry_forward::resolve(&self.cash_book_by_date, date, now) {
            Some(seeded) => {
                tracing::info!(
                    "carrying forward {} entries into {date} from {}",
                    seeded.entries.len(),
                    seeded.carried_from().map(|d| d.to_string()).unwrap_or_default()
                );
                seeded
            }
            None => {
                tracing::info!("starting empty cash-book for {date}");
                CashBook::initialized(date, now)
            }
        };
        self.cash_book_by_date.insert(date, book);
        true
    }

    fn active_book_mut(&mut self, now: DateTime<Utc>) -> (bool, &mut CashBook) {
        let created = self.materialize(now);
        let date = self.active_date;
        let book = self
            .cash_book_by_date
            .entry(date)
            .or_insert_with(|| CashBook::initialized(date, now));
        (created, book)
    }

    pub(crate) fn add_entry(&mut self, entry: Entry, now: DateTime<Utc>) -> bool {
        let (_, book) = self.active_book_mut(now);
        book.add_entry(entry, now);
        true
    }

    pub(crate) fn update_entry(&mut self, entry: &Entry, now: DateTime<Utc>) -> bool {
        let (created, book) = self.active_book_mut(now);
        let updated = book.update_entry(entry, now);
        if !updated {
            tracing::debug!("update of unknown entry {} ignored", entry.id);
        }
        created || updated
    }

    pub(crate) fn delete_entry(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        let (created, book) = self.active_book_mut(now);
        let deleted = book.delete_entry(id, now).is_some();
        if !deleted {
            tracing::debug!("delete of unknown entry {id} ignored");
        }
        created || deleted
    }

    /// Move `amount` from one entry to another as two updates.
    pub(crate) fn transfer(
        &mut self,
        from_id: &str,
        to_id: &str,
        amount: Money,
        now: DateTime<Utc>,
    ) -> bool {
        if from_id == to_id || amount.is_zero() {
            return false;
        }
        let Some((debited, credited)) = self.visible_book().and_then(|book| {
            let from = book.entry(from_id)?.amount.checked_sub(amount)?;
            let to = book.entry(to_id)?.amount.checked_add(amount)?;
            Some((from, to))
        }) else {
            return false;
        };

        let (_, book) = self.active_book_mut(now);
        let (Some(from), Some(to)) = (book.entry(from_id).cloned(), book.entry(to_id).cloned())
        else {
            return false;
        };
        book.update_entry(
            &Entry {
                amount: debited,
                ..from
            },
            now,
        );
        book.update_entry(
            &Entry {
                amount: credited,
                ..to
            },
            now,
        );
        true
    }

    /// Replace everything with a single cash-book and make its date active.
    pub(crate) fn load_from_snapshot(&mut self, book: CashBook) -> bool {
        let date = book.date;
        *self = Self {
            active_date: date,
            cash_book_by_date: BTreeMap::from([(date, book)]),
        };
        true
    }

    pub(crate) fn delete_cash_book(&mut self, date: NaiveDate) -> bool {
        self.cash_book_by_date.remove(&date).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Activity;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_735_689_600, 0).unwrap()
    }

    #[test]
    fn first_add_on_empty_store_logs_init_then_add() {
        let mut state = LedgerState::new(d(1));
        assert!(state.add_entry(Entry::with_id("a", "CASH", Money::from_major(-100)), now()));

        let book = state.active_book().unwrap();
        assert_eq!(book.entries.len(), 1);
        let kinds: Vec<_> = book.activity_log.iter().map(|l| l.activity.as_str()).collect();
        assert_eq!(kinds, ["init", "add"]);
        assert_eq!(book.activity_log[0].activity, Activity::Init { date: d(1) });
    }

    #[test]
    fn visible_book_falls_back_without_materializing() {
        let mut state = LedgerState::new(d(1));
        state.add_entry(Entry::with_id("a", "CASH", Money::from_major(5)), now());
        state.set_active_date(d(3));

        assert!(state.active_book().is_none());
        assert_eq!(state.visible_book().map(|b| b.date), Some(d(1)));
        assert_eq!(state.cash_book_by_date.len(), 1);
    }

    #[test]
    fn update_of_missing_id_on_existing_book_reports_no_change() {
        let mut state = LedgerState::new(d(1));
        state.add_entry(Entry::with_id("a", "CASH", Money::from_major(5)), now());
        let before = state.clone();

        let ghost = Entry::with_id("missing", "X", Money::from_major(1));
        assert!(!state.update_entry(&ghost, now()));
        assert!(!state.delete_entry("missing", now()));
        assert_eq!(state, before);
    }

    #[test]
    fn transfer_moves_amount_between_entries() {
        let mut state = LedgerState::new(d(1));
        state.add_entry(Entry::with_id("a", "CASH", Money::from_major(500)), now());
        state.add_entry(Entry::with_id("b", "BANK", Money::from_major(-200)), now());

        assert!(state.transfer("a", "b", Money::from_major(150), now()));
        let book = state.active_book().unwrap();
        assert_eq!(book.entry("a").unwrap().amount, Money::from_major(350));
        assert_eq!(book.entry("b").unwrap().amount, Money::from_major(-50));
        assert_eq!(book.activity_log.len(), 5);

        assert!(!state.transfer("a", "a", Money::from_major(1), now()));
        assert!(!state.transfer("a", "zzz", Money::from_major(1), now()));
    }

    #[test]
    fn transfer_past_max_amount_is_a_no_op() {
        let mut state = LedgerState::new(d(1));
        state.add_entry(Entry::with_id("a", "CASH", Money::MAX), now());
        state.add_entry(Entry::with_id("b", "BANK", -Money::MAX), now());
        let before = state.clone();

        assert!(!state.transfer("b", "a", Money::from_major(10), now()));
        assert_eq!(state, before);

        assert!(state.transfer("a", "b", Money::MAX, now()));
        assert_eq!(state.active_book().unwrap().entry("b").unwrap().amount, Money::ZERO);
    }

    #[test]
    fn delete_cash_book_leaves_other_days() {
        let mut state = LedgerState::new(d(1));
        state.add_entry(Entry::with_id("a", "CASH", Money::from_major(1)), now());
        state.set_active_date(d(2));
        state.add_entry(Entry::with_id("b", "CASH", Money::from_major(2)), now());

        assert!(state.delete_cash_book(d(1)));
        assert!(!state.delete_cash_book(d(1)));
        assert_eq!(state.dates().collect::<Vec<_>>(), vec![d(2)]);
    }
}
