//! Cached, invalidatable view of the account list.

use crate::clients::RecordService;
use crate::model::{Account, RecordListView};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, instrument};

/// Snapshot published to subscribers.
///
/// `view` is the last list that loaded successfully; a failed refresh records `error` and
/// leaves `view` alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub view: Option<Arc<RecordListView>>,
    pub error: Option<String>,
    pub refreshes: u64,
}

impl ListState {
    /// Nothing loaded and nothing failed yet.
    pub fn is_loading(&self) -> bool {
        self.view.is_none() && self.error.is_none()
    }

    pub fn rows(&self) -> &[Account] {
        self.view.as_deref().map(|v| v.rows.as_slice()).unwrap_or(&[])
    }
}

/// Observable cache over [`RecordService::list`].
///
/// Reads never hit the service; only [`invalidate`](Self::invalidate) does, and refreshes are
/// serialized so the published state has a single writer.
pub struct RecordSubscription {
    service: Arc<dyn RecordService>,
    state: watch::Sender<ListState>,
    writer: Mutex<()>,
}

impl RecordSubscription {
    pub fn new(service: Arc<dyn RecordService>) -> Self {
        let (state, _) = watch::channel(ListState::default());
        debug!("Record list loading");
        Self {
            service,
            state,
            writer: Mutex::new(()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ListState {
        self.state.borrow().clone()
    }

    /// Drops the cached list and fetches it again.
    ///
    /// Never fails: a transport error or a non-200 envelope is recorded in
    /// [`ListState::error`] and the previous view stays published.
    #[instrument(skip(self))]
    pub async fn invalidate(&self) -> ListState {
        let _writer = self.writer.lock().await;
        debug!("Refreshing record list");
        let fetched = self.service.list().await;

        self.state.send_modify(|state| {
            state.refreshes += 1;
            match fetched {
                Ok(envelope) if envelope.is_success() => {
                    let view = envelope
                        .data
                        .unwrap_or_else(|| RecordListView::accounts(Vec::new()));
                    info!(rows = view.len(), "Record list loaded");
                    state.view = Some(Arc::new(view));
                    state.error = None;
                }
                Ok(envelope) => {
                    let diagnostic = envelope.diagnostic();
                    error!(%diagnostic, "Record list unavailable");
                    state.error = Some(diagnostic);
                }
                Err(e) => {
                    error!(error = %e, "Record list unavailable");
                    state.error = Some(e.to_string());
                }
            }
        });
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::AccountClient;
    use crate::framework::mock::{MockClient, RequestKind};
    use crate::framework::FrameworkError;

    fn subscription(mock: &MockClient<Account>) -> RecordSubscription {
        RecordSubscription::new(Arc::new(AccountClient::new(mock.client())))
    }

    #[tokio::test]
    async fn test_starts_loading_without_fetching() {
        let mock = MockClient::<Account>::new();
        let subscription = subscription(&mock);

        let state = subscription.current();
        assert!(state.is_loading());
        assert!(state.rows().is_empty());
        assert!(mock.received().is_empty());
    }

    #[tokio::test]
    async fn test_invalidations_without_mutation_agree() {
        let mut mock = MockClient::<Account>::new();
        let rows = vec![Account::with_id("001", "Acme", "Widgets")];
        mock.expect_list().return_ok(rows.clone());
        mock.expect_list().return_ok(rows);
        let subscription = subscription(&mock);

        let first = subscription.invalidate().await;
        let second = subscription.invalidate().await;

        assert_eq!(first.view.as_deref(), second.view.as_deref());
        assert!(!Arc::ptr_eq(
            first.view.as_ref().unwrap(),
            second.view.as_ref().unwrap()
        ));
        assert_eq!(second.refreshes, 2);
        assert_eq!(mock.count(RequestKind::List), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_rows() {
        let mut mock = MockClient::<Account>::new();
        mock.expect_list()
            .return_ok(vec![Account::with_id("001", "Acme", "Widgets")]);
        mock.expect_list().return_err(FrameworkError::ActorDropped);
        let subscription = subscription(&mock);

        subscription.invalidate().await;
        let state = subscription.invalidate().await;

        assert_eq!(state.rows().len(), 1);
        assert!(state.error.is_some());
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_subscribers_see_refreshes() {
        let mut mock = MockClient::<Account>::new();
        mock.expect_list().return_ok(Vec::new());
        let subscription = subscription(&mock);
        let mut receiver = subscription.subscribe();

        subscription.invalidate().await;

        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow_and_update().refreshes, 1);
    }
}
