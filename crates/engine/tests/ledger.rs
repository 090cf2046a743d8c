use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use engine::{
    Activity, CashBook, Column, EngineError, Entry, JsonFileStorage, LedgerState, Money,
    Projection, StateStorage, Store,
    commands::{AddEntryCmd, EditEntryCmd, SetAmountCmd, TransferCmd},
    export_file_name, read_snapshot, to_metadata,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_735_689_600, 0).unwrap()
}

fn store_on(date: NaiveDate) -> Store {
    Store::builder().active_date(date).clock(now).build().unwrap()
}

fn state_file() -> PathBuf {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_states");
    std::fs::create_dir_all(&root).unwrap();
    root.join(format!("hisab_{}.json", Uuid::new_v4()))
}

fn add(store: &mut Store, id: &str, account: &str, rupees: i64) {
    store.add_entry(Entry::with_id(id, account, Money::from_major(rupees)));
}

fn kinds(book: &CashBook) -> Vec<&'static str> {
    book.activity_log.iter().map(|log| log.activity.as_str()).collect()
}

#[test]
fn first_mutation_on_later_day_carries_forward() {
    let d1 = d(2025, 1, 1);
    let d2 = d(2025, 1, 4);
    let mut store = store_on(d1);
    add(&mut store, "a", "CASH", -100);
    add(&mut store, "b", "SALES", 200);
    let mut checked = store.state().active_book().unwrap().entry("b").unwrap().clone();
    checked.checked = true;
    store.update_entry(&checked);

    store.set_active_date(d2);
    assert!(store.state().active_book().is_none());
    add(&mut store, "c", "RENT", -50);

    let book = store.state().active_book().unwrap();
    assert_eq!(book.id, "2025-01-04");
    assert_eq!(book.entries.len(), 3);
    for entry in &book.entries[..2] {
        assert_eq!(entry.previous_amount, entry.amount);
        assert!(!entry.checked);
    }
    assert_eq!(kinds(book), ["init", "add"]);
    assert_eq!(book.activity_log[0].activity, Activity::Init { date: d1 });
    assert_eq!(book.carried_from(), Some(d1));

    // The source day is untouched.
    let source = &store.state().cash_book_by_date[&d1];
    assert!(source.entry("b").unwrap().checked);
}

#[test]
fn no_carry_forward_into_the_past() {
    let mut store = store_on(d(2025, 1, 10));
    add(&mut store, "a", "CASH", 10);

    store.set_active_date(d(2025, 1, 5));
    assert!(store.state().visible_book().is_none());
    add(&mut store, "b", "BANK", 20);

    let book = store.state().active_book().unwrap();
    assert_eq!(book.entries.len(), 1);
    assert_eq!(book.activity_log[0].activity, Activity::Init { date: d(2025, 1, 5) });
}

#[test]
fn activity_log_is_append_only_and_ordered() {
    let mut store = store_on(d(2025, 2, 1));
    add(&mut store, "a", "CASH", 100);
    let mut snapshots = vec![store.state().active_book().unwrap().activity_log.clone()];

    let edited = EditEntryCmd::new()
        .amount("250")
        .apply(store.state().active_book().unwrap().entry("a").unwrap())
        .unwrap();
    store.update_entry(&edited);
    snapshots.push(store.state().active_book().unwrap().activity_log.clone());

    // Renaming alone changes no amount and logs nothing.
    let renamed = EditEntryCmd::new().account("petty cash").apply(&edited).unwrap();
    store.update_entry(&renamed);
    snapshots.push(store.state().active_book().unwrap().activity_log.clone());

    store.delete_entry("a");
    snapshots.push(store.state().active_book().unwrap().activity_log.clone());

    for pair in snapshots.windows(2) {
        assert!(pair[1].starts_with(&pair[0]));
    }
    let book = store.state().active_book().unwrap();
    assert_eq!(kinds(book), ["init", "add", "update", "delete"]);
    assert_eq!(
        book.activity_log[2].activity,
        Activity::Update {
            account: "CASH".to_string(),
            old_amount: Money::from_major(100),
            new_amount: Money::from_major(250),
        }
    );
    assert_eq!(
        book.activity_log[3].activity,
        Activity::Delete {
            account: "PETTY CASH".to_string(),
            amount: Money::from_major(250),
        }
    );

    let newest_first: Vec<_> = store
        .state()
        .activity_log_for_active_date()
        .iter()
        .map(|log| log.activity.as_str())
        .collect();
    assert_eq!(newest_first, ["delete", "update", "add", "init"]);
}

#[test]
fn update_of_missing_id_is_a_no_op() {
    let mut store = store_on(d(2025, 2, 1));
    add(&mut store, "a", "CASH", 100);
    let before = store.state().clone();

    assert!(!store.update_entry(&Entry::with_id("ghost", "X", Money::from_major(5))));
    assert_eq!(store.state(), &before);
}

#[test]
fn undo_redo_round_trip() {
    let mut store = store_on(d(2025, 1, 1));
    assert!(!store.can_undo());
    assert!(!store.can_redo());

    add(&mut store, "a", "CASH", -100);
    let after_first = store.state().clone();
    assert!(store.can_undo());
    assert!(!store.can_redo());

    add(&mut store, "b", "SALES", 200);
    let after_second = store.state().clone();

    assert!(store.undo());
    assert_eq!(store.state(), &after_first);
    assert!(store.can_undo());
    assert!(store.can_redo());

    assert!(store.undo());
    assert!(store.state().cash_book_by_date.is_empty());
    assert!(!store.can_undo());
    assert!(store.can_redo());
    assert!(!store.undo());

    assert!(store.redo());
    assert!(store.redo());
    assert_eq!(store.state(), &after_second);
    assert!(!store.can_redo());
    assert!(!store.redo());

    // A new action after an undo drops the redo stack.
    store.undo();
    add(&mut store, "c", "RENT", -1);
    assert!(!store.can_redo());

    store.clear_history();
    assert!(!store.can_undo());
    assert!(!store.can_redo());
}

#[test]
fn history_limit_drops_oldest() {
    let mut store = Store::builder()
        .active_date(d(2025, 1, 1))
        .history_limit(3)
        .clock(now)
        .build()
        .unwrap();
    for idx in 0..5 {
        add(&mut store, &format!("e{idx}"), "CASH", idx + 1);
    }
    assert!(store.undo());
    assert!(store.undo());
    assert!(!store.undo());
    assert_eq!(store.state().active_book().unwrap().entries.len(), 3);
}

#[test]
fn zero_amounts_hidden_in_view_not_in_data() {
    let mut store = store_on(d(2025, 1, 1));
    add(&mut store, "a", "CASH", 40);
    let zeroed = SetAmountCmd::new("a", "40-40")
        .apply(store.state().active_book().unwrap().entry("a").unwrap())
        .unwrap();
    store.update_entry(&zeroed);

    assert_eq!(store.state().active_book().unwrap().entries.len(), 1);
    assert!(Projection::for_active_date(store.state(), None).credit.is_empty());
    assert_eq!(Projection::for_active_date(store.state(), Some("a")).credit.len(), 1);
}

#[test]
fn projection_scenario() {
    let mut store = store_on(d(2025, 1, 1));
    add(&mut store, "a", "A", -100);
    add(&mut store, "b", "B", 200);
    add(&mut store, "c", "C", -50);

    let view = Projection::for_active_date(store.state(), None);
    let ids = |column: Column| -> Vec<String> {
        view.column(column).iter().map(|e| e.id.clone()).collect()
    };
    assert_eq!(ids(Column::Debit), ["c", "a"]);
    assert_eq!(ids(Column::Credit), ["b"]);
    assert_eq!(view.debit_total(), Money::from_major(-150));
    assert_eq!(view.credit_total(), Money::from_major(200));
    assert_eq!(view.balance(), Money::from_major(50));
}

#[test]
fn carried_view_reports_source_date() {
    let mut store = store_on(d(2025, 1, 1));
    add(&mut store, "a", "CASH", 10);
    store.set_active_date(d(2025, 1, 2));

    let view = Projection::for_active_date(store.state(), None);
    assert_eq!(view.date, Some(d(2025, 1, 1)));
    assert!(view.is_carried_view(store.active_date()));
    assert_eq!(store.state().cash_book_by_date.len(), 1);
}

#[test]
fn transfer_is_one_undo_step() {
    let mut store = store_on(d(2025, 1, 1));
    store.add_entry(AddEntryCmd::credit("cash", "500").into_entry().unwrap());
    store.add_entry(AddEntryCmd::credit("bank", "100").into_entry().unwrap());
    let book = store.state().active_book().unwrap();
    let (cash, bank) = (book.entries[0].id.clone(), book.entries[1].id.clone());

    let cmd = TransferCmd::new(cash.clone(), bank.clone(), "125");
    assert!(store.transfer(&cmd.from_id, &cmd.to_id, cmd.validate().unwrap()));

    let book = store.state().active_book().unwrap();
    assert_eq!(book.entry(&cash).unwrap().amount, Money::from_major(375));
    assert_eq!(book.entry(&bank).unwrap().amount, Money::from_major(225));
    assert_eq!(kinds(book), ["init", "add", "add", "update", "update"]);

    store.undo();
    let book = store.state().active_book().unwrap();
    assert_eq!(book.entry(&cash).unwrap().amount, Money::from_major(500));
    assert_eq!(book.activity_log.len(), 3);
}

#[test]
fn largest_amounts_total_and_refuse_overflowing_transfer() {
    let mut store = store_on(d(2025, 1, 1));
    for account in ["sales", "rent"] {
        store.add_entry(AddEntryCmd::credit(account, "10000000000000").into_entry().unwrap());
    }
    store.add_entry(AddEntryCmd::debit("loan", "10000000000000").into_entry().unwrap());

    let view = Projection::for_active_date(store.state(), None);
    assert_eq!(view.credit_total(), Money::new(2 * Money::MAX.minor()));
    assert_eq!(view.balance(), Money::MAX);

    let book = store.state().active_book().unwrap();
    let (sales, loan) = (book.entries[0].id.clone(), book.entries[2].id.clone());
    let before = store.state().clone();
    assert!(!store.transfer(&loan, &sales, Money::from_major(10)));
    assert_eq!(store.state(), &before);
    assert!(!store.can_redo());
}

#[test]
fn invalid_input_never_reaches_the_store() {
    assert_eq!(
        AddEntryCmd::debit("x", "10").into_entry().unwrap_err(),
        EngineError::InvalidAccount("account name must be at least 2 characters".to_string())
    );
    assert!(matches!(
        AddEntryCmd::debit("rent", "0").into_entry(),
        Err(EngineError::InvalidAmount(_))
    ));
}

#[test]
fn state_survives_restart_and_undo_is_saved() {
    let path = state_file();
    let date = d(2025, 6, 1);

    let mut store = Store::builder()
        .active_date(date)
        .storage(JsonFileStorage::new(&path))
        .clock(now)
        .build()
        .unwrap();
    add(&mut store, "a", "CASH", 70);
    add(&mut store, "b", "BANK", -70);
    store.undo();
    drop(store);

    let saved = JsonFileStorage::new(&path).load().unwrap().unwrap();
    assert_eq!(saved.active_book().unwrap().entries.len(), 1);

    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(document["activeDate"], "2025-06-01");
    assert_eq!(document["cashBookByDate"]["2025-06-01"]["entries"][0]["amount"], 70);
    assert_eq!(
        document["cashBookByDate"]["2025-06-01"]["activityLog"][0]["kind"],
        "init"
    );

    let reopened = Store::builder()
        .active_date(d(2030, 1, 1))
        .storage(JsonFileStorage::new(&path))
        .build()
        .unwrap();
    assert_eq!(reopened.state(), &saved);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn restore_replaces_everything() {
    let mut source = store_on(d(2025, 3, 9));
    add(&mut source, "a", "CASH", -120);
    let book = source.state().active_book().unwrap().clone();
    let payload = to_metadata(&book).unwrap();
    assert_eq!(export_file_name(book.date), "CashBook-09-03-2025.pdf");

    let mut store = store_on(d(2025, 1, 1));
    add(&mut store, "x", "OTHER", 1);
    store.set_active_date(d(2025, 1, 2));
    add(&mut store, "y", "OTHER", 2);

    let restored = read_snapshot(payload.as_bytes()).unwrap();
    assert!(store.load_from_snapshot(restored));
    let expected = LedgerState {
        active_date: d(2025, 3, 9),
        cash_book_by_date: [(d(2025, 3, 9), book)].into_iter().collect(),
    };
    assert_eq!(store.state(), &expected);

    // A failed restore leaves the state alone.
    assert!(matches!(
        read_snapshot(b"%PDF-1.7\n<< /Producer (x) >>"),
        Err(EngineError::MissingMetadata(_))
    ));
    assert_eq!(store.state(), &expected);

    store.undo();
    assert_eq!(store.active_date(), d(2025, 1, 2));
}
