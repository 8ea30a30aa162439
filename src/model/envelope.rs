//! The uniform result shape returned by the record service and the three-valued outcome a
//! modal workflow resolves with.

use serde::{Deserialize, Serialize};

/// Status code reported by a successful service call.
pub const STATUS_OK: u16 = 200;

/// Status code reported by a failed service call.
pub const STATUS_ERROR: u16 = 500;

/// Status code a modal closes with when the user dismisses it without submitting.
pub const STATUS_CANCELLED: u16 = 501;

/// Envelope returned by every record service call.
///
/// `status == 200` iff the operation succeeded. `message` and `stacktrace` are diagnostics
/// for logs; nothing branches on their content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ResultEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: STATUS_OK,
            message: None,
            stacktrace: None,
            data: Some(data),
        }
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            stacktrace: None,
            data: None,
        }
    }

    pub fn with_stacktrace(mut self, stacktrace: impl Into<String>) -> Self {
        self.stacktrace = Some(stacktrace.into());
        self
    }

    /// Transforms the payload, keeping status and diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultEnvelope<U> {
        ResultEnvelope {
            status: self.status,
            message: self.message,
            stacktrace: self.stacktrace,
            data: self.data.map(f),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Human-readable diagnostic for a failed envelope.
    pub fn diagnostic(&self) -> String {
        match &self.message {
            Some(message) => format!("status {}: {}", self.status, message),
            None => format!("status {}", self.status),
        }
    }
}

/// How a modal workflow ended.
///
/// The integer protocol (`200`/`500`/`501`) is kept at the edges through [`ModalOutcome::code`]
/// and [`ModalOutcome::from_code`]; everything in between matches on the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModalOutcome {
    /// The mutation was sent and the backend reported `200`.
    Success,
    /// The mutation was sent and the backend reported anything else.
    Failure,
    /// The modal was dismissed before any mutation was attempted.
    Cancelled,
}

impl ModalOutcome {
    pub fn code(&self) -> u16 {
        match self {
            ModalOutcome::Success => STATUS_OK,
            ModalOutcome::Failure => STATUS_ERROR,
            ModalOutcome::Cancelled => STATUS_CANCELLED,
        }
    }

    /// Interprets a closing code: `200` and `500` are the mutation results, every other
    /// value counts as a cancellation.
    pub fn from_code(code: u16) -> Self {
        match code {
            STATUS_OK => ModalOutcome::Success,
            STATUS_ERROR => ModalOutcome::Failure,
            _ => ModalOutcome::Cancelled,
        }
    }

    /// Outcome of a completed mutation call.
    pub fn from_envelope<T>(envelope: &ResultEnvelope<T>) -> Self {
        if envelope.is_success() {
            ModalOutcome::Success
        } else {
            ModalOutcome::Failure
        }
    }
}

impl From<u16> for ModalOutcome {
    fn from(code: u16) -> Self {
        Self::from_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_codes() {
        assert_eq!(ModalOutcome::Success.code(), 200);
        assert_eq!(ModalOutcome::Failure.code(), 500);
        assert_eq!(ModalOutcome::Cancelled.code(), 501);

        assert_eq!(ModalOutcome::from(200), ModalOutcome::Success);
        assert_eq!(ModalOutcome::from(500), ModalOutcome::Failure);
        assert_eq!(ModalOutcome::from(501), ModalOutcome::Cancelled);
        assert_eq!(ModalOutcome::from(404), ModalOutcome::Cancelled);
    }

    #[test]
    fn test_envelope_maps_any_non_200_to_failure() {
        let ok = ResultEnvelope::ok(());
        let not_found: ResultEnvelope<()> = ResultEnvelope::failure(404, "missing");

        assert_eq!(ModalOutcome::from_envelope(&ok), ModalOutcome::Success);
        assert_eq!(ModalOutcome::from_envelope(&not_found), ModalOutcome::Failure);
    }

    #[test]
    fn test_diagnostic() {
        let envelope: ResultEnvelope<()> =
            ResultEnvelope::failure(500, "DUPLICATE").with_stacktrace("at line 1");
        assert_eq!(envelope.diagnostic(), "status 500: DUPLICATE");
        assert_eq!(envelope.stacktrace.as_deref(), Some("at line 1"));

        let bare: ResultEnvelope<()> = ResultEnvelope {
            status: 503,
            message: None,
            stacktrace: None,
            data: None,
        };
        assert_eq!(bare.diagnostic(), "status 503");
    }
}
