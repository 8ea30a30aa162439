use crate::clients::ServiceError;
use crate::modal::ModalError;
use thiserror::Error;

/// Failures surfaced by [`AccountOrchestrator`](super::AccountOrchestrator) to its caller.
///
/// Business failures are not errors here; they come back as
/// [`ModalOutcome::Failure`](crate::model::ModalOutcome::Failure).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("A modal is already open")]
    ModalBusy,

    #[error("Mutation failed in transport: {0}")]
    Transport(ServiceError),

    #[error("Modal closed without resolving")]
    Closed,
}

impl From<ModalError> for OrchestratorError {
    fn from(error: ModalError) -> Self {
        match error {
            ModalError::Transport(e) => OrchestratorError::Transport(e),
            ModalError::Closed => OrchestratorError::Closed,
        }
    }
}
