//! Seeding a new day from the nearest earlier day.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{Activity, CashBook};

/// The stored cash-book with the nearest date strictly before `date`.
///
/// Dates after `date` never count, so a day before every stored day has no
/// source.
pub fn most_recent_before(
    books: &BTreeMap<NaiveDate, CashBook>,
    date: NaiveDate,
) -> Option<&CashBook> {
    books.range(..date).next_back().map(|(_, book)| book)
}

/// Copy `source` onto `date`: every entry keeps its amount, remembers it as
/// the previous amount and is unchecked. The log restarts with a single
/// `init` record naming the source date.
pub fn seed(source: &CashBook, date: NaiveDate, now: DateTime<Utc>) -> CashBook {
    let mut book = CashBook::new(date);
    book.entries = source.entries.iter().map(|entry| entry.carried_forward()).collect();
    book.record(Activity::Init { date: source.date }, now);
    book
}

/// Seeded cash-book for `date`, or `None` when no earlier day exists.
pub fn resolve(
    books: &BTreeMap<NaiveDate, CashBook>,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Option<CashBook> {
    most_recent_before(books, date).map(|source| seed(source, date, now))
}
