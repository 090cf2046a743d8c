//! Day-indexed cash-book ledger.
//!
//! A [`Store`] keeps one [`CashBook`] per calendar day. The first change on a
//! day without a book seeds it from the nearest earlier day, every change is
//! written to that day's activity log, and whole-state snapshots give
//! undo/redo. [`Projection`] turns a book into the debit/credit columns shown
//! to the user.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use engine::{Projection, Store, commands::AddEntryCmd};
//!
//! let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let mut store = Store::builder().active_date(day).build().unwrap();
//! store.add_entry(AddEntryCmd::credit("sales", "1200 - 200").into_entry().unwrap());
//!
//! let view = Projection::for_active_date(store.state(), None);
//! assert_eq!(view.credit_total().to_string(), "₹1,000");
//! assert!(store.can_undo());
//! ```

pub use activity::{Activity, ActivityLog};
pub use cash_book::CashBook;
pub use entry::{Column, Entry};
pub use error::EngineError;
pub use money::Money;
pub use palette::{DELETE_CONFIRMATION, PaletteCommand, PaletteGroup, confirm_delete_book, filtered_commands};
pub use pdf::pdf_title;
pub use projection::Projection;
pub use sheet::{LedgerSheet, SheetRow};
pub use snapshot::{export_file_name, from_metadata, metadata_file_name, read_snapshot, to_metadata};
pub use state::LedgerState;
pub use storage::{JsonFileStorage, MemoryStorage, StateStorage};
pub use store::{Store, StoreBuilder, SubscriptionId};
pub use ui_state::{EditBox, UiState};

mod activity;
pub mod carry_forward;
mod cash_book;
pub mod commands;
mod entry;
mod error;
pub mod expr;
pub mod history;
mod money;
mod palette;
mod pdf;
mod projection;
mod sheet;
mod snapshot;
mod state;
mod storage;
mod store;
mod timestamp;
mod ui_state;

type ResultEngine<T> = Result<T, EngineError>;
