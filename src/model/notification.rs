use crate::model::ModalOutcome;
use serde::{Deserialize, Serialize};

/// Visual weight of a user-facing [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Success,
}

impl From<ModalOutcome> for Severity {
    fn from(outcome: ModalOutcome) -> Self {
        match outcome {
            ModalOutcome::Success => Severity::Success,
            ModalOutcome::Failure => Severity::Error,
            ModalOutcome::Cancelled => Severity::Warning,
        }
    }
}

/// A toast shown to the user once a modal workflow has closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    /// The fixed title/message pair for each severity.
    pub fn for_severity(severity: Severity) -> Self {
        let (title, message) = match severity {
            Severity::Error => (
                "Operation cancelled",
                "An error occurred while processing the operation.",
            ),
            Severity::Warning => ("Operation cancelled", "The operation was cancelled."),
            Severity::Success => (
                "Operation successful",
                "The operation completed successfully.",
            ),
        };
        Self {
            title: title.to_string(),
            message: message.to_string(),
            severity,
        }
    }
}

impl From<ModalOutcome> for Notification {
    fn from(outcome: ModalOutcome) -> Self {
        Self::for_severity(outcome.into())
    }
}
