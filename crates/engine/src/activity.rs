//! Audit trail of a cash-book.
//!
//! Records are only ever appended; nothing edits or removes them.

use core::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Money;

/// What happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Activity {
    Add {
        account: String,
        amount: Money,
    },
    Delete {
        account: String,
        amount: Money,
    },
    Update {
        account: String,
        old_amount: Money,
        new_amount: Money,
    },
    /// The cash-book was created; `date` is the day it was seeded from, or
    /// its own date when it started empty.
    Init {
        date: NaiveDate,
    },
}

impl Activity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Delete { .. } => "delete",
            Self::Update { .. } => "update",
            Self::Init { .. } => "init",
        }
    }
}

/// One record of the activity log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: String,
    #[serde(with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub activity: Activity,
}

impl ActivityLog {
    pub fn new(activity: Activity, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: format!("{}-{}", activity.as_str(), Uuid::new_v4()),
            timestamp,
            activity,
        }
    }
}

impl fmt::Display for ActivityLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.activity {
            Activity::Add { account, amount } => {
                write!(f, "Added entry {account}, amount: {amount}")
            }
            Activity::Delete { account, amount } => {
                write!(f, "Deleted entry {account}, amount: {amount}")
            }
            Activity::Update {
                account,
                old_amount,
                new_amount,
            } => write!(
                f,
                "Updated entry {account}, amount: {old_amount} to {new_amount}"
            ),
            Activity::Init { date } => write!(f, "Initialized new hisab from {date}"),
        }
    }
}
