//! Error types for the Account actor.

use thiserror::Error;

/// Reasons the store rejects an account mutation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    /// The payload was built for another object type.
    #[error("Unsupported object type: {0}")]
    WrongObjectType(String),

    /// Accounts must have a non-blank name.
    #[error("Account name is required")]
    MissingName,

    /// The payload names a field accounts do not have.
    #[error("Unknown account field: {0}")]
    UnknownField(String),

    /// An update was submitted without the record id.
    #[error("Account id is required")]
    MissingId,
}
