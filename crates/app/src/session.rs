use std::{
    io::Write,
    path::{Path, PathBuf},
};

use clap::Parser;
use chrono::Utc;
use chrono_tz::Tz;
use engine::{
    Column, EngineError, Entry, JsonFileStorage, LedgerSheet, PaletteCommand, Projection, Store,
    UiState, carry_forward,
    commands::{AddEntryCmd, EditEntryCmd, SetAmountCmd, TransferCmd, parse_date},
    confirm_delete_book, export_file_name, filtered_commands, metadata_file_name, read_snapshot,
    to_metadata,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    cli::{LedgerCommand, ShellCommand, ShellLine, amount_text, split_words},
    config::AppConfig,
    error::{AppError, Result},
};

const SHORT_ID_LEN: usize = 8;

/// A store opened on the state file plus the presentation state of one run.
pub struct Session {
    store: Store,
    ui: UiState,
    tz: Tz,
    /// Last palette listing, for `run <n>`.
    palette: Vec<PaletteCommand>,
}

impl Session {
    pub fn open(config: &AppConfig) -> Result<Self> {
        let tz = config.tz()?;
        let today = Utc::now().with_timezone(&tz).date_naive();
        let store = Store::builder()
            .active_date(today)
            .history_limit(config.history_limit)
            .storage(JsonFileStorage::new(&config.state_path))
            .build()?;
        tracing::debug!("opened {}", config.state_path.display());
        Ok(Self::with_store(store, tz))
    }

    pub fn with_store(mut store: Store, tz: Tz) -> Self {
        store.subscribe(|state| {
            tracing::debug!(
                "state changed: {} cash-books, active {}",
                state.cash_book_by_date.len(),
                state.active_date
            );
        });
        Self {
            store,
            ui: UiState::new(),
            tz,
            palette: Vec::new(),
        }
    }

    pub async fn run(&mut self, command: LedgerCommand) -> Result<()> {
        match command {
            LedgerCommand::Show => self.show(),
            LedgerCommand::Date { date } => {
                let date = parse_date(&date)?;
                self.change(|store| store.set_active_date(date));
            }
            LedgerCommand::Add {
                side,
                account,
                amount,
            } => {
                let entry = AddEntryCmd::new(side.into(), account, amount_text(amount)).into_entry()?;
                self.change(move |store| store.add_entry(entry));
            }
            LedgerCommand::SetAmount { id, amount } => {
                let entry = self.entry(&id)?;
                let edited =
                    SetAmountCmd::new(entry.id.clone(), amount_text(amount)).apply(&entry)?;
                self.change(|store| store.update_entry(&edited));
            }
            LedgerCommand::Edit {
                id,
                account,
                amount,
            } => {
                let entry = self.entry(&id)?;
                let mut cmd = EditEntryCmd::new();
                if let Some(account) = account {
                    cmd = cmd.account(account);
                }
                if let Some(amount) = amount {
                    cmd = cmd.amount(amount);
                }
                let edited = cmd.apply(&entry)?;
                self.change(|store| store.update_entry(&edited));
            }
            LedgerCommand::Check { id, off } => {
                let entry = self.entry(&id)?;
                let edited = EditEntryCmd::new().checked(!off).apply(&entry)?;
                self.change(|store| store.update_entry(&edited));
            }
            LedgerCommand::Delete { id } => {
                let id = self.resolve_id(&id)?;
                self.change(|store| store.delete_entry(&id));
            }
            LedgerCommand::Transfer { from, to, amount } => {
                let cmd = TransferCmd::new(
                    self.resolve_id(&from)?,
                    self.resolve_id(&to)?,
                    amount_text(amount),
                );
                let amount = cmd.validate()?;
                self.change(|store| store.transfer(&cmd.from_id, &cmd.to_id, amount));
            }
            LedgerCommand::Log => self.log(),
            LedgerCommand::Print { out_dir } => self.print(&out_dir).await?,
            LedgerCommand::Restore { file } => self.restore(&file).await?,
            LedgerCommand::DeleteBook { confirm } => {
                PaletteCommand::DeleteActiveBook(self.store.active_date()).execute(&mut self.ui);
                self.confirm(&confirm);
            }
            LedgerCommand::Palette { query } => self.palette(&query.join(" ")),
        }
        Ok(())
    }

    /// Read commands from stdin until `quit` or end of input.
    pub async fn shell(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        self.show();
        loop {
            print!("hisab {}> ", self.store.active_date());
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let words = split_words(&line);
            match words.first().map(String::as_str) {
                None => continue,
                Some("exit") => break,
                Some(_) => {}
            }
            let command = match ShellLine::try_parse_from(&words) {
                Ok(line) => line.command,
                Err(err) => {
                    eprintln!("{err}");
                    continue;
                }
            };
            match self.run_shell(command).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    tracing::warn!("{err}");
                    eprintln!("{err}");
                }
            }
        }
        Ok(())
    }

    /// Returns `false` when the session should end.
    async fn run_shell(&mut self, command: ShellCommand) -> Result<bool> {
        match command {
            ShellCommand::Ledger(command) => self.run(command).await?,
            ShellCommand::Undo => self.change(Store::undo),
            ShellCommand::Redo => self.change(Store::redo),
            ShellCommand::Run { index } => self.run_palette(index).await?,
            ShellCommand::Set { amount } => {
                let active_date = self.store.active_date();
                let Some(id) = self.ui.focused_entry(active_date).map(str::to_string) else {
                    println!("No amount box is open.");
                    return Ok(true);
                };
                let entry = self.entry(&id)?;
                let edited = SetAmountCmd::new(id, amount_text(amount)).apply(&entry)?;
                self.ui.close_edit_box();
                self.change(|store| store.update_entry(&edited));
            }
            ShellCommand::Amount { amount } => {
                let prefilled = [Column::Debit, Column::Credit]
                    .into_iter()
                    .find_map(|column| self.ui.take_add_account(column).map(|acc| (column, acc)));
                let Some((column, account)) = prefilled else {
                    println!("No account prefilled; use `add`.");
                    return Ok(true);
                };
                match AddEntryCmd::new(column, account.clone(), amount_text(amount)).into_entry() {
                    Ok(entry) => self.change(move |store| store.add_entry(entry)),
                    Err(err) => {
                        self.ui.prefill_add(column, account);
                        return Err(err.into());
                    }
                }
            }
            ShellCommand::Confirm { text } => self.confirm(&text),
            ShellCommand::Celebrate => {
                let enabled = self.ui.toggle_celebration();
                println!("Celebration {}", if enabled { "enabled" } else { "disabled" });
            }
            ShellCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Run `action`, reporting no-ops and a day that just balanced.
    fn change(&mut self, action: impl FnOnce(&mut Store) -> bool) {
        let was_balanced = self.is_balanced();
        if !action(&mut self.store) {
            println!("Nothing changed.");
            return;
        }
        if self.ui.celebration_enabled && !was_balanced && self.is_balanced() {
            println!("Hisab balanced!");
        }
    }

    fn is_balanced(&self) -> bool {
        Projection::for_active_date(self.store.state(), None).is_balanced()
    }

    fn projection(&self) -> Projection {
        let state = self.store.state();
        Projection::for_active_date(state, self.ui.focused_entry(state.active_date))
    }

    /// Full id of the visible entry named by `input` (id or unique prefix).
    fn resolve_id(&self, input: &str) -> Result<String> {
        let Some(book) = self.store.state().visible_book() else {
            return Err(AppError::UnknownEntry(input.to_string()));
        };
        if book.entry(input).is_some() {
            return Ok(input.to_string());
        }
        let mut matches = book.entries.iter().filter(|entry| entry.id.starts_with(input));
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry.id.clone()),
            (Some(_), Some(_)) => Err(AppError::AmbiguousEntry(input.to_string())),
            (None, _) => Err(AppError::UnknownEntry(input.to_string())),
        }
    }

    fn entry(&self, input: &str) -> Result<Entry> {
        let id = self.resolve_id(input)?;
        self.store
            .state()
            .visible_book()
            .and_then(|book| book.entry(&id))
            .cloned()
            .ok_or(AppError::UnknownEntry(id))
    }

    fn show(&self) {
        let active_date = self.store.active_date();
        let view = self.projection();
        println!("Hisab {active_date}");
        if view.is_carried_view(active_date)
            && let Some(date) = view.date
        {
            println!("Showing entries from {}", date.format("%d %b %Y"));
        }
        for column in [Column::Credit, Column::Debit] {
            println!("{}", column.label());
            let entries = view.column(column);
            if entries.is_empty() {
                println!("  -");
            }
            for entry in entries {
                println!("  {}", entry_line(entry));
            }
        }
        println!(
            "Credit {} | Debit {} | Balance {}",
            view.credit_total(),
            view.debit_total(),
            view.balance()
        );
        if view.is_balanced() {
            println!("Balanced");
        }
    }

    fn log(&self) {
        let state = self.store.state();
        let logs = state.activity_log_for_active_date();
        if logs.is_empty() {
            println!("No activity on {}", state.active_date);
        }
        for log in logs {
            let at = log.timestamp.with_timezone(&self.tz);
            println!("{}  {log}", at.format("%d %b %Y %H:%M"));
        }
    }

    async fn print(&mut self, out_dir: &Path) -> Result<()> {
        self.ui.print_requested = false;
        let state = self.store.state();
        let date = state.active_date;
        let sheet = LedgerSheet::new(&Projection::for_active_date(state, None), date);
        println!("{}", export_file_name(date));
        print!("{sheet}");

        let book = state
            .active_book()
            .cloned()
            .or_else(|| carry_forward::resolve(&state.cash_book_by_date, date, Utc::now()));
        let Some(book) = book else {
            println!("Nothing recorded for {date}.");
            return Ok(());
        };
        let metadata = to_metadata(&book)?;
        let path: PathBuf = out_dir.join(metadata_file_name(date));
        tokio::fs::create_dir_all(out_dir).await?;
        tokio::fs::write(&path, metadata).await?;
        tracing::info!("wrote snapshot of {date} to {}", path.display());
        println!("Snapshot written to {}", path.display());
        Ok(())
    }

    /// Replace the state with the day stored in `file`. A file without
    /// usable data is reported and leaves the state as it was.
    async fn restore(&mut self, file: &Path) -> Result<()> {
        self.ui.restore_requested = false;
        let bytes = tokio::fs::read(file).await?;
        match read_snapshot(&bytes) {
            Ok(book) => {
                let date = book.date;
                self.store.load_from_snapshot(book);
                self.ui = UiState {
                    celebration_enabled: self.ui.celebration_enabled,
                    ..UiState::new()
                };
                println!("Restored hisab of {date}");
            }
            Err(err) => {
                tracing::warn!("restore from {} failed: {err}", file.display());
                eprintln!("{}", restore_alert(&err));
            }
        }
        Ok(())
    }

    fn palette(&mut self, search: &str) {
        let view = self.projection();
        self.palette = filtered_commands(&view, self.store.active_date(), search);
        let mut heading = None;
        for (idx, cmd) in self.palette.iter().enumerate() {
            let group = cmd.group();
            if heading != Some(group) {
                println!("{}", group.heading());
                heading = Some(group);
            }
            println!("  {:>2}. {}", idx + 1, cmd.label());
        }
    }

    async fn run_palette(&mut self, index: usize) -> Result<()> {
        let Some(cmd) = index
            .checked_sub(1)
            .and_then(|idx| self.palette.get(idx))
            .cloned()
        else {
            println!("No palette entry {index}; search with `palette <text>` first.");
            return Ok(());
        };
        cmd.execute(&mut self.ui);
        match cmd {
            PaletteCommand::Print => self.print(Path::new(".")).await?,
            PaletteCommand::Restore => println!("Type: restore <file>"),
            PaletteCommand::EditEntry { label, .. } => {
                println!("Editing {label}; type: set <amount>");
            }
            PaletteCommand::AddDebit(account) | PaletteCommand::AddCredit(account) => {
                println!("Adding {account}; type: amount <amount>");
            }
            PaletteCommand::DeleteActiveBook(date) => println!(
                "Delete the hisab for {date}? This cannot be undone. Type: confirm DELETE"
            ),
        }
        Ok(())
    }

    fn confirm(&mut self, typed: &str) {
        match confirm_delete_book(&mut self.ui, typed) {
            Some(date) => self.change(|store| store.delete_cash_book_by_date(date)),
            None if self.ui.delete_book_pending.is_some() => {
                println!("Type {} to confirm.", engine::DELETE_CONFIRMATION);
            }
            None => println!("Nothing to confirm."),
        }
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

fn entry_line(entry: &Entry) -> String {
    let mark = if entry.checked { "[x]" } else { "[ ]" };
    let hint = entry
        .previous_balance()
        .map(|previous| format!(" (was {previous})"))
        .unwrap_or_default();
    format!(
        "{mark} {:<width$} {} {}{hint}",
        short_id(&entry.id),
        entry.account,
        entry.amount,
        width = SHORT_ID_LEN
    )
}

fn restore_alert(err: &EngineError) -> &'static str {
    match err {
        EngineError::MissingMetadata(_) => "No accounting data found in PDF metadata.",
        _ => "Failed to parse accounting data from PDF metadata.",
    }
}
