//! # Account Client
//!
//! Wraps a `ResourceClient<Account>` and exposes it through the [`RecordService`] contract.

use crate::account_actor::AccountError;
use crate::clients::{RecordService, ServiceError, ServiceResult};
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{
    Account, AccountId, MutationBuilder, RecordListView, ResultEnvelope, STATUS_ERROR,
};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Client for interacting with the Account actor.
#[derive(Clone)]
pub struct AccountClient {
    inner: ResourceClient<Account>,
}

impl AccountClient {
    pub fn new(inner: ResourceClient<Account>) -> Self {
        Self { inner }
    }

    /// Looks up a single account.
    #[instrument(skip(self))]
    pub async fn get(&self, id: AccountId) -> ServiceResult<Account> {
        debug!("Sending request");
        let found = envelope(self.inner.get(id.clone()).await)?;
        if matches!(found.data, Some(None)) {
            let missing = FrameworkError::NotFound(id.to_string());
            return Ok(ResultEnvelope::failure(STATUS_ERROR, missing.to_string()));
        }
        Ok(ResultEnvelope {
            data: found.data.flatten(),
            status: found.status,
            message: found.message,
            stacktrace: found.stacktrace,
        })
    }
}

/// Folds an actor reply into the envelope protocol.
///
/// Channel failures become [`ServiceError`]; everything the store itself rejected becomes a
/// `500` envelope carrying the rejection as its message.
fn envelope<T>(result: Result<T, FrameworkError>) -> ServiceResult<T> {
    match result {
        Ok(value) => Ok(ResultEnvelope::ok(value)),
        Err(FrameworkError::ActorClosed) => {
            Err(ServiceError::Unreachable(FrameworkError::ActorClosed.to_string()))
        }
        Err(FrameworkError::ActorDropped) => {
            Err(ServiceError::NoResponse(FrameworkError::ActorDropped.to_string()))
        }
        Err(FrameworkError::EntityError(e)) => {
            warn!(error = %e, "Request rejected");
            Ok(ResultEnvelope::failure(STATUS_ERROR, e.to_string()).with_stacktrace(format!("{e:?}")))
        }
        Err(e @ FrameworkError::NotFound(_)) => {
            warn!(error = %e, "Request rejected");
            Ok(ResultEnvelope::failure(STATUS_ERROR, e.to_string()))
        }
    }
}

#[async_trait]
impl RecordService for AccountClient {
    #[instrument(skip(self))]
    async fn list(&self) -> ServiceResult<RecordListView> {
        debug!("Sending request");
        Ok(envelope(self.inner.list().await)?.map(RecordListView::accounts))
    }

    #[instrument(skip(self))]
    async fn create(&self, builder: MutationBuilder) -> ServiceResult<()> {
        debug!("Sending request");
        Ok(envelope(self.inner.create(builder).await)?.map(|_| ()))
    }

    #[instrument(skip(self))]
    async fn update(&self, builder: MutationBuilder) -> ServiceResult<()> {
        debug!("Sending request");
        let Some(id) = builder.record_id() else {
            warn!("Update without record id");
            return Ok(ResultEnvelope::failure(
                STATUS_ERROR,
                AccountError::MissingId.to_string(),
            ));
        };
        Ok(envelope(self.inner.update(id, builder).await)?.map(|_| ()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: AccountId) -> ServiceResult<()> {
        debug!("Sending request");
        envelope(self.inner.delete(id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{MockClient, RequestKind};

    #[derive(Debug, thiserror::Error)]
    #[error("DUPLICATE")]
    struct Duplicate;

    #[tokio::test]
    async fn test_list_shapes_rows_for_the_table() {
        let mut mock = MockClient::<Account>::new();
        mock.expect_list()
            .return_ok(vec![Account::with_id("001", "Acme", "Widgets")]);
        let client = AccountClient::new(mock.client());

        let envelope = client.list().await.unwrap();
        assert!(envelope.is_success());
        let view = envelope.data.unwrap();
        assert_eq!(view.rows, vec![Account::with_id("001", "Acme", "Widgets")]);
        assert_eq!(view.columns.len(), 3);
        mock.verify();
    }

    #[tokio::test]
    async fn test_entity_rejection_is_a_500_envelope() {
        let mut mock = MockClient::<Account>::new();
        mock.expect_create()
            .return_err(FrameworkError::EntityError(Box::new(Duplicate)));
        let client = AccountClient::new(mock.client());

        let builder = MutationBuilder::new(Account::OBJECT_TYPE).field("name", "Acme");
        let envelope = client.create(builder).await.unwrap();
        assert_eq!(envelope.status, 500);
        assert_eq!(envelope.message.as_deref(), Some("DUPLICATE"));
        assert!(envelope.stacktrace.is_some());
    }

    #[tokio::test]
    async fn test_update_without_id_never_reaches_the_store() {
        let mock = MockClient::<Account>::new();
        let client = AccountClient::new(mock.client());

        let builder = MutationBuilder::new(Account::OBJECT_TYPE).field("name", "Acme");
        let envelope = client.update(builder).await.unwrap();
        assert_eq!(envelope.status, 500);
        assert_eq!(mock.count(RequestKind::Update), 0);
    }

    #[tokio::test]
    async fn test_get_missing_account() {
        let mut mock = MockClient::<Account>::new();
        mock.expect_get(AccountId::from("404")).return_ok(None);
        let client = AccountClient::new(mock.client());

        let envelope = client.get(AccountId::from("404")).await.unwrap();
        assert_eq!(envelope.status, 500);
        assert!(envelope.data.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error() {
        let (actor, client) = crate::account_actor::new(4);
        drop(actor);

        let result = client.delete(AccountId::from("001")).await;
        assert!(matches!(result, Err(ServiceError::Unreachable(_))));
    }
}
