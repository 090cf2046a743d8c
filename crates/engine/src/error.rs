//! The module contains the errors the engine can return.
//!
//! Store actions never fail: a missing entry id is a silent no-op. Errors only
//! come from the input boundary and from the snapshot codec:
//!
//! - [`InvalidAmount`] / [`InvalidExpression`] when an amount input is rejected.
//! - [`InvalidAccount`] when an account name is too short.
//! - [`MissingMetadata`] / [`Snapshot`] when a restore file carries no usable
//!   ledger data.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidExpression`]: EngineError::InvalidExpression
//!  [`InvalidAccount`]: EngineError::InvalidAccount
//!  [`MissingMetadata`]: EngineError::MissingMetadata
//!  [`Snapshot`]: EngineError::Snapshot
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),
    #[error("Invalid account: {0}")]
    InvalidAccount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),
    #[error("No accounting data found: {0}")]
    MissingMetadata(String),
    #[error("Failed to parse accounting data: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidExpression(a), Self::InvalidExpression(b)) => a == b,
            (Self::InvalidAccount(a), Self::InvalidAccount(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidTransfer(a), Self::InvalidTransfer(b)) => a == b,
            (Self::MissingMetadata(a), Self::MissingMetadata(b)) => a == b,
            (Self::Snapshot(a), Self::Snapshot(b)) => a.to_string() == b.to_string(),
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
