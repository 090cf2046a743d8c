//! The ledger store: action API, undo/redo and change notification.
//!
//! Every action works copy-on-write: the current snapshot is cloned, the
//! action runs on the clone, and only a real change is recorded in the
//! history, saved and broadcast to subscribers.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    CashBook, Entry, LedgerState, Money, ResultEngine,
    history::{DEFAULT_LIMIT, History},
    storage::StateStorage,
};

type Listener = Box<dyn FnMut(&LedgerState)>;
type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Handle returned by [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct Store {
    history: History<LedgerState>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    storage: Option<Box<dyn StateStorage>>,
    clock: Clock,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", self.state())
            .field("past", &self.history.past_len())
            .field("future", &self.history.future_len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Store {
    /// Return a builder for `Store`. Help to build the struct.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// Current persisted state.
    pub fn state(&self) -> &LedgerState {
        self.history.current()
    }

    pub fn active_date(&self) -> NaiveDate {
        self.state().active_date
    }

    pub fn set_active_date(&mut self, date: NaiveDate) -> bool {
        self.dispatch("set_active_date", |state, _| state.set_active_date(date))
    }

    /// Append `entry` to the active date, creating its cash-book first when
    /// needed.
    pub fn add_entry(&mut self, entry: Entry) -> bool {
        self.dispatch("add_entry", move |state, now| state.add_entry(entry, now))
    }

    /// Overwrite account, amount and checked flag of the entry with the same
    /// id. Unknown ids are ignored.
    pub fn update_entry(&mut self, entry: &Entry) -> bool {
        self.dispatch("update_entry", |state, now| state.update_entry(entry, now))
    }

    pub fn delete_entry(&mut self, id: &str) -> bool {
        self.dispatch("delete_entry", |state, now| state.delete_entry(id, now))
    }

    /// Move `amount` from one entry of the active date to another.
    pub fn transfer(&mut self, from_id: &str, to_id: &str, amount: Money) -> bool {
        self.dispatch("transfer", |state, now| {
            state.transfer(from_id, to_id, amount, now)
        })
    }

    /// Replace the whole state with `book`, making its date active.
    pub fn load_from_snapshot(&mut self, book: CashBook) -> bool {
        tracing::info!("restoring cash-book for {}", book.date);
        self.dispatch("load_from_snapshot", move |state, _| {
            state.load_from_snapshot(book)
        })
    }

    pub fn delete_cash_book_by_date(&mut self, date: NaiveDate) -> bool {
        self.dispatch("delete_cash_book_by_date", |state, _| {
            state.delete_cash_book(date)
        })
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        if self.history.undo().is_none() {
            return false;
        }
        tracing::debug!("undo");
        self.publish();
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.history.redo().is_none() {
            return false;
        }
        tracing::debug!("redo");
        self.publish();
        true
    }

    /// Drop undo/redo history; the current state becomes the baseline.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Call `listener` after every change of the persisted state.
    pub fn subscribe(&mut self, listener: impl FnMut(&LedgerState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn dispatch(
        &mut self,
        action: &str,
        apply: impl FnOnce(&mut LedgerState, DateTime<Utc>) -> bool,
    ) -> bool {
        let now = (self.clock)();
        let mut next = self.state().clone();
        if !apply(&mut next, now) {
            tracing::debug!("{action}: no change");
            return false;
        }
        tracing::debug!("{action} on {}", next.active_date);
        self.history.record(next);
        self.publish();
        true
    }

    /// Save the current state and notify subscribers.
    fn publish(&mut self) {
        let state = self.history.current();
        if let Some(storage) = self.storage.as_mut()
            && let Err(err) = storage.save(state)
        {
            tracing::error!("failed to persist ledger state: {err}");
        }
        for (_, listener) in self.listeners.iter_mut() {
            listener(state);
        }
    }
}

/// Builder for [`Store`].
#[derive(Default)]
pub struct StoreBuilder {
    active_date: Option<NaiveDate>,
    storage: Option<Box<dyn StateStorage>>,
    history_limit: Option<usize>,
    clock: Option<Clock>,
}

impl StoreBuilder {
    /// Active date used when the storage holds no saved state.
    pub fn active_date(mut self, date: NaiveDate) -> Self {
        self.active_date = Some(date);
        self
    }

    pub fn storage(mut self, storage: impl StateStorage + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Source of timestamps for entries and log records.
    pub fn clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Build the store, hydrating it from the storage when it holds a saved
    /// state.
    pub fn build(self) -> ResultEngine<Store> {
        let saved = match &self.storage {
            Some(storage) => storage.load()?,
            None => None,
        };
        let state = match saved {
            Some(state) => {
                tracing::info!(
                    "loaded {} cash-books, active date {}",
                    state.cash_book_by_date.len(),
                    state.active_date
                );
                state
            }
            None => LedgerState::new(
                self.active_date
                    .unwrap_or_else(|| Utc::now().date_naive()),
            ),
        };

        Ok(Store {
            history: History::new(state, self.history_limit.unwrap_or(DEFAULT_LIMIT)),
            listeners: Vec::new(),
            next_subscription: 0,
            storage: self.storage,
            clock: self.clock.unwrap_or_else(|| Box::new(Utc::now) as Clock),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::storage::MemoryStorage;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn store() -> Store {
        Store::builder()
            .active_date(d(1))
            .clock(|| DateTime::from_timestamp(1_735_689_600, 0).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn subscribers_see_changes_only() {
        let mut store = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |state| sink.borrow_mut().push(state.active_date));

        assert!(store.set_active_date(d(2)));
        assert!(!store.set_active_date(d(2)));
        assert!(store.undo());
        assert_eq!(*seen.borrow(), vec![d(2), d(1)]);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_active_date(d(5));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn no_op_actions_record_no_history() {
        let mut store = store();
        store.add_entry(Entry::with_id("a", "CASH", Money::from_major(1)));
        assert!(store.can_undo());

        assert!(!store.delete_entry("missing"));
        assert!(!store.delete_cash_book_by_date(d(9)));
        store.undo();
        assert!(!store.can_undo());
        assert!(store.state().cash_book_by_date.is_empty());
    }

    #[test]
    fn build_hydrates_from_storage() {
        let mut storage = MemoryStorage::new();
        let mut saved = LedgerState::new(d(7));
        saved.cash_book_by_date.insert(d(7), CashBook::new(d(7)));
        storage.save(&saved).unwrap();

        let store = Store::builder()
            .active_date(d(1))
            .storage(storage)
            .build()
            .unwrap();
        assert_eq!(store.state(), &saved);
        assert!(!store.can_undo());
    }
}
