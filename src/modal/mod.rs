//! Modal create/update/delete workflows.
//!
//! A modal is a short-lived actor: [`ModalWorkflow`] runs in its own task, takes user input
//! from a [`ModalController`], performs at most one mutation and resolves its
//! [`ModalHandle`] exactly once.

pub mod workflow;

pub use workflow::*;

use crate::clients::ServiceError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModalError {
    /// The modal has already resolved (or its task is gone).
    #[error("Modal is closed")]
    Closed,

    /// The mutation call itself could not complete.
    #[error(transparent)]
    Transport(#[from] ServiceError),
}
