//! Session-only presentation state. Nothing here is ever persisted or
//! recorded in the undo history.

use chrono::NaiveDate;

use crate::Column;

/// The inline amount box currently open, scoped to the day it was opened on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditBox {
    pub date: NaiveDate,
    pub entry_id: String,
}

impl EditBox {
    /// `{date}-{entry_id}`
    pub fn key(&self) -> String {
        format!("{}-{}", self.date, self.entry_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiState {
    pub edit_box: Option<EditBox>,
    /// Entry whose transfer dialog is open.
    pub transfer_from: Option<String>,
    /// Account prefilled in the add-debit form.
    pub debit_add_account: Option<String>,
    pub credit_add_account: Option<String>,
    pub print_requested: bool,
    /// A restore file should be asked for.
    pub restore_requested: bool,
    /// Day awaiting the typed `DELETE` confirmation.
    pub delete_book_pending: Option<NaiveDate>,
    pub celebration_enabled: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            edit_box: None,
            transfer_from: None,
            debit_add_account: None,
            credit_add_account: None,
            print_requested: false,
            restore_requested: false,
            delete_book_pending: None,
            celebration_enabled: true,
        }
    }
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_edit_box(&mut self, date: NaiveDate, entry_id: impl Into<String>) {
        self.edit_box = Some(EditBox {
            date,
            entry_id: entry_id.into(),
        });
    }

    pub fn close_edit_box(&mut self) {
        self.edit_box = None;
    }

    /// Id of the entry being edited on `active_date`. A box opened on another
    /// day is not focused here.
    pub fn focused_entry(&self, active_date: NaiveDate) -> Option<&str> {
        self.edit_box
            .as_ref()
            .filter(|edit_box| edit_box.date == active_date)
            .map(|edit_box| edit_box.entry_id.as_str())
    }

    pub fn prefill_add(&mut self, column: Column, account: impl Into<String>) {
        let account = Some(account.into());
        match column {
            Column::Debit => self.debit_add_account = account,
            Column::Credit => self.credit_add_account = account,
        }
    }

    /// Take the prefilled account of `column`, clearing it.
    pub fn take_add_account(&mut self, column: Column) -> Option<String> {
        match column {
            Column::Debit => self.debit_add_account.take(),
            Column::Credit => self.credit_add_account.take(),
        }
    }

    pub fn toggle_celebration(&mut self) -> bool {
        self.celebration_enabled = !self.celebration_enabled;
        self.celebration_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn edit_box_is_scoped_to_its_day() {
        let mut ui = UiState::new();
        ui.open_edit_box(d(3), "abc");
        assert_eq!(ui.focused_entry(d(3)), Some("abc"));
        assert_eq!(ui.focused_entry(d(4)), None);
        assert_eq!(ui.edit_box.as_ref().unwrap().key(), "2025-01-03-abc");

        ui.close_edit_box();
        assert_eq!(ui.focused_entry(d(3)), None);
    }

    #[test]
    fn add_prefill_is_taken_once() {
        let mut ui = UiState::new();
        ui.prefill_add(Column::Credit, "SALES");
        assert_eq!(ui.take_add_account(Column::Debit), None);
        assert_eq!(ui.take_add_account(Column::Credit).as_deref(), Some("SALES"));
        assert_eq!(ui.take_add_account(Column::Credit), None);
    }

    #[test]
    fn celebration_toggles() {
        let mut ui = UiState::new();
        assert!(ui.celebration_enabled);
        assert!(!ui.toggle_celebration());
        assert!(ui.toggle_celebration());
    }
}
