//! Named commands offered by the command palette.
//!
//! Running a command only touches [`UiState`]; anything that changes the
//! ledger goes through the matching `Store` action afterwards.

use chrono::NaiveDate;

use crate::{Column, Projection, UiState};

/// Text the user must type to delete a whole day.
pub const DELETE_CONFIRMATION: &str = "DELETE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteGroup {
    Home,
    Debit,
    Credit,
    Add,
    Danger,
}

impl PaletteGroup {
    pub fn heading(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Debit => Column::Debit.label(),
            Self::Credit => Column::Credit.label(),
            Self::Add => "Add",
            Self::Danger => "Danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteCommand {
    Print,
    Restore,
    /// Open the amount box of one visible entry.
    EditEntry {
        date: NaiveDate,
        id: String,
        column: Column,
        label: String,
    },
    /// Prefill the add-debit form with the (uppercased) search text.
    AddDebit(String),
    AddCredit(String),
    DeleteActiveBook(NaiveDate),
}

impl PaletteCommand {
    /// Every command for the day in `projection`, grouped in display order.
    pub fn all(projection: &Projection, active_date: NaiveDate, search: &str) -> Vec<Self> {
        let account = search.trim().to_uppercase();
        let mut commands = vec![Self::Print, Self::Restore];
        for column in [Column::Debit, Column::Credit] {
            commands.extend(projection.column(column).iter().map(|entry| Self::EditEntry {
                date: active_date,
                id: entry.id.clone(),
                column,
                label: format!("{} - {}", entry.account, entry.amount),
            }));
        }
        commands.push(Self::AddDebit(account.clone()));
        commands.push(Self::AddCredit(account));
        commands.push(Self::DeleteActiveBook(active_date));
        commands
    }

    /// Stable identifier, e.g. `credit-<entry id>-edit`.
    pub fn id(&self) -> String {
        match self {
            Self::Print => "print".to_string(),
            Self::Restore => "restore".to_string(),
            Self::EditEntry { id, column, .. } => match column {
                Column::Debit => format!("debit-{id}-edit"),
                Column::Credit => format!("credit-{id}-edit"),
            },
            Self::AddDebit(_) => "add-debit".to_string(),
            Self::AddCredit(_) => "add-credit".to_string(),
            Self::DeleteActiveBook(_) => "delete-book".to_string(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Print => "Print".to_string(),
            Self::Restore => "Restore from PDF".to_string(),
            Self::EditEntry { label, .. } => label.clone(),
            Self::AddDebit(account) => format!("{}: {account}", Column::Debit.label()),
            Self::AddCredit(account) => format!("{}: {account}", Column::Credit.label()),
            Self::DeleteActiveBook(date) => format!("Delete Active Cash Book ({date})"),
        }
    }

    pub fn group(&self) -> PaletteGroup {
        match self {
            Self::Print | Self::Restore => PaletteGroup::Home,
            Self::EditEntry {
                column: Column::Debit,
                ..
            } => PaletteGroup::Debit,
            Self::EditEntry {
                column: Column::Credit,
                ..
            } => PaletteGroup::Credit,
            Self::AddDebit(_) | Self::AddCredit(_) => PaletteGroup::Add,
            Self::DeleteActiveBook(_) => PaletteGroup::Danger,
        }
    }

    /// Case-insensitive substring match on the label. Add commands carry the
    /// search text itself and always match.
    pub fn matches(&self, search: &str) -> bool {
        let query = search.trim().to_lowercase();
        if query.is_empty() || matches!(self, Self::AddDebit(_) | Self::AddCredit(_)) {
            return true;
        }
        self.label().to_lowercase().contains(&query)
    }

    pub fn execute(&self, ui: &mut UiState) {
        match self {
            Self::Print => ui.print_requested = true,
            Self::Restore => ui.restore_requested = true,
            Self::EditEntry { date, id, .. } => ui.open_edit_box(*date, id.clone()),
            Self::AddDebit(account) => ui.prefill_add(Column::Debit, account.clone()),
            Self::AddCredit(account) => ui.prefill_add(Column::Credit, account.clone()),
            Self::DeleteActiveBook(date) => ui.delete_book_pending = Some(*date),
        }
    }
}

/// Commands whose label matches `search`.
pub fn filtered_commands(
    projection: &Projection,
    active_date: NaiveDate,
    search: &str,
) -> Vec<PaletteCommand> {
    PaletteCommand::all(projection, active_date, search)
        .into_iter()
        .filter(|cmd| cmd.matches(search))
        .collect()
}

/// Settle the pending day deletion. Returns the day to delete only when
/// `typed` is exactly [`DELETE_CONFIRMATION`]; otherwise the request stays
/// pending.
pub fn confirm_delete_book(ui: &mut UiState, typed: &str) -> Option<NaiveDate> {
    if typed != DELETE_CONFIRMATION {
        return None;
    }
    ui.delete_book_pending.take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CashBook, Entry, Money};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn projection() -> Projection {
        let mut book = CashBook::new(date());
        book.entries = vec![
            Entry::with_id("a", "CASH", Money::from_major(-100)),
            Entry::with_id("b", "SALES", Money::new(123_456_50)),
        ];
        Projection::of(Some(&book), None)
    }

    fn ids(commands: &[PaletteCommand]) -> Vec<String> {
        commands.iter().map(PaletteCommand::id).collect()
    }

    #[test]
    fn lists_every_group_in_order() {
        let commands = PaletteCommand::all(&projection(), date(), "");
        assert_eq!(
            ids(&commands),
            [
                "print",
                "restore",
                "debit-a-edit",
                "credit-b-edit",
                "add-debit",
                "add-credit",
                "delete-book"
            ]
        );
        assert_eq!(commands[2].label(), "CASH - -₹100");
        assert_eq!(commands[3].label(), "SALES - ₹1,23,456.5");
        assert_eq!(commands[3].group().heading(), "Credit (જમા)");
        assert_eq!(commands[6].label(), "Delete Active Cash Book (2025-01-01)");
    }

    #[test]
    fn filters_case_insensitively_keeping_add_commands() {
        let found = filtered_commands(&projection(), date(), "sal");
        assert_eq!(ids(&found), ["credit-b-edit", "add-debit", "add-credit"]);
        assert_eq!(found[2].label(), "Credit (જમા): SAL");

        let found = filtered_commands(&projection(), date(), "zzz");
        assert_eq!(ids(&found), ["add-debit", "add-credit"]);

        let found = filtered_commands(&projection(), date(), "PRINT");
        assert_eq!(ids(&found)[0], "print");
    }

    #[test]
    fn execute_only_touches_ui_state() {
        let mut ui = UiState::new();
        let commands = PaletteCommand::all(&projection(), date(), "rent");

        commands[0].execute(&mut ui);
        assert!(ui.print_requested);
        commands[1].execute(&mut ui);
        assert!(ui.restore_requested);
        commands[2].execute(&mut ui);
        assert_eq!(ui.focused_entry(date()), Some("a"));
        commands[4].execute(&mut ui);
        assert_eq!(ui.debit_add_account.as_deref(), Some("RENT"));
        commands[6].execute(&mut ui);
        assert_eq!(ui.delete_book_pending, Some(date()));
    }

    #[test]
    fn delete_needs_exact_confirmation() {
        let mut ui = UiState::new();
        PaletteCommand::DeleteActiveBook(date()).execute(&mut ui);

        assert_eq!(confirm_delete_book(&mut ui, "delete"), None);
        assert_eq!(ui.delete_book_pending, Some(date()));
        assert_eq!(confirm_delete_book(&mut ui, "DELETE"), Some(date()));
        assert_eq!(ui.delete_book_pending, None);
        assert_eq!(confirm_delete_book(&mut ui, "DELETE"), None);
    }
}
