//! Command structs for the input boundary.
//!
//! These types carry raw user input (account names, amount expressions) and
//! validate it before any store action runs. A command that fails validation
//! never reaches the store.

use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;

use crate::{Column, EngineError, Entry, Money, ResultEngine, expr};

/// Shortest accepted account name, in characters.
pub const MIN_ACCOUNT_LEN: usize = 2;

/// Canonical account name: NFKC-normalised, single-spaced, uppercased.
pub fn normalize_account(input: &str) -> ResultEngine<String> {
    let normalized: String = input.nfkc().collect();
    let account = normalized
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    if account.chars().count() < MIN_ACCOUNT_LEN {
        return Err(EngineError::InvalidAccount(format!(
            "account name must be at least {MIN_ACCOUNT_LEN} characters"
        )));
    }
    Ok(account)
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(input.trim().to_string()))
}

/// Add a new entry to one column of the active day.
#[derive(Clone, Debug)]
pub struct AddEntryCmd {
    pub column: Column,
    pub account: String,
    pub amount: String,
}

impl AddEntryCmd {
    #[must_use]
    pub fn new(column: Column, account: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            column,
            account: account.into(),
            amount: amount.into(),
        }
    }

    #[must_use]
    pub fn debit(account: impl Into<String>, amount: impl Into<String>) -> Self {
        Self::new(Column::Debit, account, amount)
    }

    #[must_use]
    pub fn credit(account: impl Into<String>, amount: impl Into<String>) -> Self {
        Self::new(Column::Credit, account, amount)
    }

    /// Validate into a fresh entry. The column decides the sign: debits are
    /// stored negative whatever sign was typed.
    pub fn into_entry(self) -> ResultEngine<Entry> {
        let account = normalize_account(&self.account)?;
        let amount = expr::evaluate(&self.amount)?;
        if amount.is_zero() {
            return Err(EngineError::InvalidAmount("amount must not be zero".to_string()));
        }
        let amount = match self.column {
            Column::Debit => -amount.abs(),
            Column::Credit => amount.abs(),
        };
        Ok(Entry::new(account, amount))
    }
}

/// Edit an existing entry; unset fields keep their value.
#[derive(Clone, Debug, Default)]
pub struct EditEntryCmd {
    pub account: Option<String>,
    pub amount: Option<String>,
    pub checked: Option<bool>,
}

impl EditEntryCmd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Amount expression; zero is allowed and hides the row.
    #[must_use]
    pub fn amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    #[must_use]
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    /// The edited copy of `entry`, ready for `Store::update_entry`.
    pub fn apply(&self, entry: &Entry) -> ResultEngine<Entry> {
        let mut edited = entry.clone();
        if let Some(account) = &self.account {
            edited.account = normalize_account(account)?;
        }
        if let Some(amount) = &self.amount {
            edited.amount = expr::evaluate(amount)?;
        }
        if let Some(checked) = self.checked {
            edited.checked = checked;
        }
        Ok(edited)
    }
}

/// Raw text of an entry's inline amount box.
#[derive(Clone, Debug)]
pub struct SetAmountCmd {
    pub entry_id: String,
    pub amount: String,
}

impl SetAmountCmd {
    #[must_use]
    pub fn new(entry_id: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.into(),
            amount: amount.into(),
        }
    }

    /// The entry with the typed amount. The box starts out holding the signed
    /// amount, so the sign is taken as typed and may move the row to the
    /// other column.
    pub fn apply(&self, entry: &Entry) -> ResultEngine<Entry> {
        let mut edited = entry.clone();
        edited.amount = expr::evaluate(&self.amount)?;
        Ok(edited)
    }
}

/// Move money between two entries of the active day.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub from_id: String,
    pub to_id: String,
    pub amount: String,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            amount: amount.into(),
        }
    }

    /// Validated amount to move.
    pub fn validate(&self) -> ResultEngine<Money> {
        if self.from_id == self.to_id {
            return Err(EngineError::InvalidTransfer(
                "source and target must differ".to_string(),
            ));
        }
        let amount = expr::evaluate(&self.amount)?;
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "transfer amount must be > 0".to_string(),
            ));
        }
        Ok(amount)
    }
}
