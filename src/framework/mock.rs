//! # Mock Framework
//!
//! Utilities for testing code that talks to a [`ResourceClient`] without running the real
//! actor.
//!
//! - [`MockClient`] answers requests from a queue of expectations and counts every request it
//!   sees, so tests can assert "exactly one delete" or "no calls at all".
//! - [`create_mock_client`] hands back the raw receiver for tests that need to hold a request
//!   open (for example to observe a caller while its call is in flight).

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the reply to give it.
enum Expectation<T: ActorEntity> {
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), FrameworkError>,
    },
}

/// Kind of request received by a [`MockClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl<T: ActorEntity> From<&ResourceRequest<T>> for RequestKind {
    fn from(request: &ResourceRequest<T>) -> Self {
        match request {
            ResourceRequest::List { .. } => RequestKind::List,
            ResourceRequest::Get { .. } => RequestKind::Get,
            ResourceRequest::Create { .. } => RequestKind::Create,
            ResourceRequest::Update { .. } => RequestKind::Update,
            ResourceRequest::Delete { .. } => RequestKind::Delete,
        }
    }
}

#[derive(Default)]
struct MockLog {
    received: Vec<RequestKind>,
    mismatches: Vec<String>,
}

type Shared<V> = Arc<Mutex<V>>;

fn lock<V>(shared: &Shared<V>) -> std::sync::MutexGuard<'_, V> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock client with expectation tracking for fluent testing.
///
/// Requests are matched in order against the queued expectations. A request that does not
/// match is recorded as a mismatch and its reply channel is dropped, which the caller sees
/// as [`FrameworkError::ActorDropped`].
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<Account>::new();
/// mock.expect_delete(AccountId::from("001")).return_ok(());
///
/// let client = AccountClient::new(mock.client());
/// // Use client in tests...
/// mock.verify(); // Ensures all expectations were met
/// assert_eq!(mock.count(RequestKind::Delete), 1);
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Shared<VecDeque<Expectation<T>>>,
    log: Shared<MockLog>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Shared<VecDeque<Expectation<T>>> = Arc::default();
        let log: Shared<MockLog> = Arc::default();
        let task_expectations = expectations.clone();
        let task_log = log.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let kind = RequestKind::from(&request);
                lock(&task_log).received.push(kind);
                let expectation = lock(&task_expectations).pop_front();

                if let Err(reason) = Self::answer(request, expectation) {
                    lock(&task_log).mismatches.push(reason);
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            log,
            _handle: handle,
        }
    }

    fn answer(
        request: ResourceRequest<T>,
        expectation: Option<Expectation<T>>,
    ) -> Result<(), String> {
        match (request, expectation) {
            (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                let _ = respond_to.send(response);
            }
            (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response })) => {
                if id != want {
                    return Err(format!("get: expected id {want}, got {id}"));
                }
                let _ = respond_to.send(response);
            }
            (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                let _ = respond_to.send(response);
            }
            (
                ResourceRequest::Update { id, respond_to, .. },
                Some(Expectation::Update { id: want, response }),
            ) => {
                if id != want {
                    return Err(format!("update: expected id {want}, got {id}"));
                }
                let _ = respond_to.send(response);
            }
            (
                ResourceRequest::Delete { id, respond_to },
                Some(Expectation::Delete { id: want, response }),
            ) => {
                if id != want {
                    return Err(format!("delete: expected id {want}, got {id}"));
                }
                let _ = respond_to.send(response);
            }
            (request, None) => {
                return Err(format!("unexpected {:?} request", RequestKind::from(&request)));
            }
            (request, Some(_)) => {
                return Err(format!(
                    "{:?} request does not match the next expectation",
                    RequestKind::from(&request)
                ));
            }
        }
        Ok(())
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `list` operation.
    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::List {
            response,
        })
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Get { id, response }
        })
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Create {
            response,
        })
    }

    /// Expects an `update` operation.
    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Update { id, response }
        })
    }

    /// Expects a `delete` operation.
    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Delete { id, response }
        })
    }

    /// Every request received so far, in arrival order.
    pub fn received(&self) -> Vec<RequestKind> {
        lock(&self.log).received.clone()
    }

    /// Number of received requests of one kind.
    pub fn count(&self, kind: RequestKind) -> usize {
        lock(&self.log).received.iter().filter(|k| **k == kind).count()
    }

    /// Number of mutations (create, update, delete) received so far.
    pub fn mutation_count(&self) -> usize {
        lock(&self.log)
            .received
            .iter()
            .filter(|k| matches!(k, RequestKind::Create | RequestKind::Update | RequestKind::Delete))
            .count()
    }

    /// Verifies that all expectations were met and no request was unexpected.
    pub fn verify(&self) {
        let log = lock(&self.log);
        if !log.mismatches.is_empty() {
            panic!("Unexpected requests: {:?}", log.mismatches);
        }
        let remaining = lock(&self.expectations).len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder that queues the reply for one expected request.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Shared<VecDeque<Expectation<T>>>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn new(
        expectations: Shared<VecDeque<Expectation<T>>>,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            expectations,
            make: Box::new(make),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.make)(Ok(value));
        lock(&self.expectations).push_back(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.make)(Err(error));
        lock(&self.expectations).push_back(expectation);
    }
}

// =============================================================================
// RAW CHANNEL HELPERS
// =============================================================================

/// Creates a client wired to a receiver the test controls.
///
/// Use this when the test itself has to decide *when* a reply is sent.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<(), FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}
