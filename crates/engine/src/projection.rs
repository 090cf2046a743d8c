//! Read-only view of a cash-book: debit and credit columns with totals.

use chrono::NaiveDate;

use crate::{CashBook, Column, Entry, LedgerState, Money};

/// Account name fragments (case-insensitive) that always sink to the bottom
/// of a column. `commission` goes below all of them.
const TRAILING_ACCOUNTS: [&str; 4] = ["sp ang", "hm ang", "rok", "commission"];
const LAST_ACCOUNT: &str = "commission";

/// Debit/credit columns as displayed: newest first, zero rows hidden.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Projection {
    pub debit: Vec<Entry>,
    pub credit: Vec<Entry>,
    /// Date of the cash-book the columns come from. Differs from the active
    /// date when an earlier day is shown in its place.
    pub date: Option<NaiveDate>,
}

impl Projection {
    /// Project `book`. The entry with id `focused` stays visible even at
    /// zero so an open edit box does not vanish while typing.
    pub fn of(book: Option<&CashBook>, focused: Option<&str>) -> Self {
        let Some(book) = book else {
            return Self::default();
        };

        let mut debit = Vec::new();
        let mut credit = Vec::new();
        for entry in book.entries.iter().rev() {
            if entry.amount.is_zero() && focused != Some(entry.id.as_str()) {
                continue;
            }
            match entry.column() {
                Column::Debit => debit.push(entry.clone()),
                Column::Credit => credit.push(entry.clone()),
            }
        }
        debit.sort_by_key(|entry| trailing_rank(&entry.account));
        credit.sort_by_key(|entry| trailing_rank(&entry.account));

        Self {
            debit,
            credit,
            date: Some(book.date),
        }
    }

    /// Project the active date of `state`, falling back to the nearest
    /// earlier day without creating anything.
    pub fn for_active_date(state: &LedgerState, focused: Option<&str>) -> Self {
        Self::of(state.visible_book(), focused)
    }

    /// `true` when the columns come from another day than `active_date`.
    pub fn is_carried_view(&self, active_date: NaiveDate) -> bool {
        self.date.is_some_and(|date| date != active_date)
    }

    pub fn column(&self, column: Column) -> &[Entry] {
        match column {
            Column::Debit => &self.debit,
            Column::Credit => &self.credit,
        }
    }

    /// Sum of the debit column (negative or zero).
    pub fn debit_total(&self) -> Money {
        self.debit.iter().map(|entry| entry.amount).sum()
    }

    pub fn credit_total(&self) -> Money {
        self.credit.iter().map(|entry| entry.amount).sum()
    }

    /// Debits are stored negative, so the balance is the plain sum.
    pub fn balance(&self) -> Money {
        self.debit_total().saturating_add(self.credit_total())
    }

    /// The day closes at zero with something on the credit side.
    pub fn is_balanced(&self) -> bool {
        self.balance().is_zero() && self.credit_total().is_positive()
    }

    /// Every visible entry, debit column first.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.debit.iter().chain(self.credit.iter())
    }
}

fn trailing_rank(account: &str) -> u8 {
    let account = account.to_lowercase();
    if account.contains(LAST_ACCOUNT) {
        2
    } else if TRAILING_ACCOUNTS.iter().any(|pattern| account.contains(pattern)) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(entries: &[(&str, &str, i64)]) -> CashBook {
        let mut book = CashBook::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        book.entries = entries
            .iter()
            .map(|(id, account, amount)| Entry::with_id(*id, *account, Money::from_major(*amount)))
            .collect();
        book
    }

    fn ids(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[test]
    fn splits_by_sign_newest_first() {
        let view = Projection::of(
            Some(&book(&[("a", "CASH", -100), ("b", "SALES", 200), ("c", "RENT", -50)])),
            None,
        );
        assert_eq!(ids(&view.debit), ["c", "a"]);
        assert_eq!(ids(&view.credit), ["b"]);
        assert_eq!(view.debit_total(), Money::from_major(-150));
        assert_eq!(view.credit_total(), Money::from_major(200));
        assert_eq!(view.balance(), Money::from_major(50));
        assert!(!view.is_balanced());
    }

    #[test]
    fn trailing_accounts_sink_with_commission_last() {
        let view = Projection::of(
            Some(&book(&[
                ("c1", "Commission", 5),
                ("r", "ROKDA", 10),
                ("x", "CASH", 20),
                ("s", "SP ANG 1", 30),
                ("y", "BANK", 40),
            ])),
            None,
        );
        assert_eq!(ids(&view.credit), ["y", "x", "s", "r", "c1"]);
    }

    #[test]
    fn zero_rows_hidden_unless_focused() {
        let book = book(&[("a", "CASH", 0), ("b", "BANK", 10)]);
        assert_eq!(ids(&Projection::of(Some(&book), None).credit), ["b"]);
        assert_eq!(ids(&Projection::of(Some(&book), Some("a")).credit), ["b", "a"]);
    }

    #[test]
    fn balanced_day() {
        let view = Projection::of(Some(&book(&[("a", "CASH", -70), ("b", "BANK", 70)])), None);
        assert!(view.is_balanced());
        assert!(!Projection::of(None, None).is_balanced());
        assert_eq!(Projection::of(None, None).date, None);
    }
}
