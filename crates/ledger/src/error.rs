//! The module contains the errors the ledger can return.
//!
//! - [`InputError`] is returned by the mutating operations when user input is
//!   rejected. It never leaves the state half-updated.
//! - [`CredentialError`] is returned when the hashing primitive fails.
//! - [`LedgerError`] is the union the application layer deals with.
use thiserror::Error;

/// Why a raw string could not be read as an amount.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount")]
    Invalid,
    #[error("amount too large")]
    TooLarge,
}

/// Rejected user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("not a number: {0}")]
    NotANumber(#[from] ParseAmountError),
    #[error("income must be a non-negative number")]
    Negative,
    #[error("amount must be a positive number")]
    NonPositiveAmount,
    #[error("invalid category name")]
    InvalidCategory,
    #[error("amount exceeds the representable range")]
    Overflow,
}

/// Failure of the password hashing primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("invalid hashing parameters: {0}")]
    Params(String),
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
