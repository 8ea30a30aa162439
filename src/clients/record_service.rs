//! # RecordService Trait
//!
//! The boundary between the orchestration layer and persistence. Every operation answers with
//! a [`ResultEnvelope`]; business failures travel inside it as `status != 200`. Only a
//! transport fault surfaces as `Err`.

use crate::model::{AccountId, MutationBuilder, RecordListView, ResultEnvelope};
use async_trait::async_trait;
use thiserror::Error;

/// A call that could not complete at all.
///
/// Distinct from a business failure: the backend never produced an envelope. Callers log it
/// and give up on that attempt; nothing retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The request could not be delivered.
    #[error("Record service unreachable: {0}")]
    Unreachable(String),

    /// The request was delivered but no response came back.
    #[error("Record service dropped the response: {0}")]
    NoResponse(String),
}

/// Result type for record service calls.
pub type ServiceResult<T> = Result<ResultEnvelope<T>, ServiceError>;

/// Remote operations on account records.
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Fetches the current account list shaped for the table.
    async fn list(&self) -> ServiceResult<RecordListView>;

    /// Creates a record from a full field snapshot.
    async fn create(&self, builder: MutationBuilder) -> ServiceResult<()>;

    /// Updates the record named by the builder's `id` field.
    async fn update(&self, builder: MutationBuilder) -> ServiceResult<()>;

    /// Deletes one record.
    async fn delete(&self, id: AccountId) -> ServiceResult<()>;
}
