//! The module contains the `Entry` type, one posting in a cash-book.
//!
//! Debits and credits are both `Entry` values: the sign of the amount decides
//! the column (see [`Column`]).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Money;

/// Ledger column an entry is shown in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Debit,
    Credit,
}

impl Column {
    /// Column for an amount: negative amounts are debits, everything else is
    /// a credit.
    #[must_use]
    pub fn of(amount: Money) -> Self {
        if amount.is_negative() {
            Self::Debit
        } else {
            Self::Credit
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Debit => "Debit (ઉધાર)",
            Self::Credit => "Credit (જમા)",
        }
    }
}

/// A named amount posted to an account on a given day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique within its cash-book.
    pub id: String,
    pub account: String,
    pub amount: Money,
    /// Amount this entry had on the day it was carried forward from.
    #[serde(default, alias = "previousAmmount")]
    pub previous_amount: Money,
    #[serde(default)]
    pub checked: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::timestamp::option"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entry {
    /// Create a fresh entry with a random id.
    pub fn new(account: impl Into<String>, amount: Money) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), account, amount)
    }

    pub fn with_id(id: impl Into<String>, account: impl Into<String>, amount: Money) -> Self {
        Self {
            id: id.into(),
            account: account.into(),
            amount,
            previous_amount: Money::ZERO,
            checked: false,
            updated_at: None,
        }
    }

    #[must_use]
    pub fn column(&self) -> Column {
        Column::of(self.amount)
    }

    /// The carried balance worth showing next to the entry: only when it is
    /// non-zero and differs from the current amount.
    #[must_use]
    pub fn previous_balance(&self) -> Option<Money> {
        (!self.previous_amount.is_zero() && self.previous_amount != self.amount)
            .then_some(self.previous_amount)
    }

    /// Copy of this entry as it starts a new day.
    pub(crate) fn carried_forward(&self) -> Self {
        Self {
            previous_amount: self.amount,
            checked: false,
            ..self.clone()
        }
    }
}
