//! # Account Orchestrator
//!
//! Root of the account page. It owns the live list subscription, opens one modal per user
//! intent, interprets the modal's [`ModalOutcome`] and decides whether the list needs a
//! refresh.
//!
//! ```text
//! table/new button ──Intent──▶ AccountOrchestrator ──spawn──▶ ModalWorkflow ──▶ RecordService
//!                                     ▲                              │
//!                                     └───────── ModalOutcome ───────┘
//! ```

pub mod error;
pub mod notifier;
pub mod subscription;

pub use error::OrchestratorError;
pub use notifier::{ChannelNotifier, Notifier, NotifyError};
pub use subscription::{ListState, RecordSubscription};

use crate::clients::RecordService;
use crate::modal::{ModalController, ModalKind, ModalWorkflow};
use crate::model::{Account, ModalOutcome, Notification, Severity};
use crate::table::{TableAction, TableEvent};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{error, info, instrument, warn};

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The page's "new" button.
    Save,
    Edit(Account),
    Delete(Account),
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Save => "save",
            Intent::Edit(_) => "edit",
            Intent::Delete(_) => "delete",
        }
    }
}

impl From<TableEvent> for Intent {
    fn from(event: TableEvent) -> Self {
        match event.action {
            TableAction::Edit => Intent::Edit(event.data),
            TableAction::Delete => Intent::Delete(event.data),
        }
    }
}

pub struct AccountOrchestrator {
    service: Arc<dyn RecordService>,
    subscription: RecordSubscription,
    notifier: Arc<dyn Notifier>,
    presenter: mpsc::Sender<ModalController>,
    modal_gate: Mutex<()>,
    last_error: StdMutex<Option<String>>,
    object_type: String,
    buffer_size: usize,
}

impl AccountOrchestrator {
    /// Creates the orchestrator with its subscription still loading.
    ///
    /// Every opened modal's controller is handed to `presenter`; whoever receives it plays
    /// the user's part. If nobody is listening the modal resolves as cancelled.
    pub fn new(
        service: Arc<dyn RecordService>,
        notifier: Arc<dyn Notifier>,
        presenter: mpsc::Sender<ModalController>,
    ) -> Self {
        Self {
            subscription: RecordSubscription::new(service.clone()),
            service,
            notifier,
            presenter,
            modal_gate: Mutex::new(()),
            last_error: StdMutex::new(None),
            object_type: Account::OBJECT_TYPE.to_string(),
            buffer_size: 8,
        }
    }

    pub fn with_object_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = object_type.into();
        self
    }

    /// Mailbox size of each modal's command channel.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Creates the orchestrator and performs the initial list load.
    pub async fn connect(
        service: Arc<dyn RecordService>,
        notifier: Arc<dyn Notifier>,
        presenter: mpsc::Sender<ModalController>,
    ) -> Self {
        let orchestrator = Self::new(service, notifier, presenter);
        orchestrator.load().await;
        orchestrator
    }

    /// Initial load; equivalent to an invalidation.
    pub async fn load(&self) -> ListState {
        self.subscription.invalidate().await
    }

    pub fn records(&self) -> ListState {
        self.subscription.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.subscription.subscribe()
    }

    /// Diagnostic of the last mutation that failed in transport.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn save(&self) -> Result<ModalOutcome, OrchestratorError> {
        self.handle(Intent::Save).await
    }

    pub async fn edit(&self, row: Account) -> Result<ModalOutcome, OrchestratorError> {
        self.handle(Intent::Edit(row)).await
    }

    pub async fn delete(&self, row: Account) -> Result<ModalOutcome, OrchestratorError> {
        self.handle(Intent::Delete(row)).await
    }

    /// Opens the modal for `intent`, waits for it to close and reacts to the outcome.
    ///
    /// Only one modal may be open at a time; a second intent arriving meanwhile is rejected
    /// with [`OrchestratorError::ModalBusy`]. The list is refreshed after a successful
    /// modal has fully closed.
    #[instrument(skip(self, intent), fields(intent = intent.name()))]
    pub async fn handle(&self, intent: Intent) -> Result<ModalOutcome, OrchestratorError> {
        let Ok(_open) = self.modal_gate.try_lock() else {
            warn!("Rejected; a modal is already open");
            return Err(OrchestratorError::ModalBusy);
        };

        let kind = match intent {
            Intent::Save => ModalKind::Create,
            Intent::Edit(row) => ModalKind::Update(Arc::new(row)),
            Intent::Delete(row) => ModalKind::Delete(Arc::new(row)),
        };
        let (workflow, controller) = ModalWorkflow::new(
            kind,
            self.service.clone(),
            self.object_type.clone(),
            self.buffer_size,
        );
        let handle = workflow.spawn();
        if self.presenter.send(controller).await.is_err() {
            warn!("No modal presenter; modal will close as cancelled");
        }

        match handle.outcome().await {
            Ok(outcome) => {
                info!(?outcome, "Modal resolved");
                self.notify(Notification::from(outcome));
                if outcome == ModalOutcome::Success {
                    self.subscription.invalidate().await;
                }
                Ok(outcome)
            }
            Err(e) => {
                let e = OrchestratorError::from(e);
                error!(error = %e, "Modal did not produce an outcome");
                *self
                    .last_error
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(e.to_string());
                self.notify(Notification::for_severity(Severity::Error));
                Err(e)
            }
        }
    }

    /// Handles intents one after another until every sender is gone.
    ///
    /// Failures are logged; the loop keeps going.
    pub async fn dispatch<I>(&self, mut intents: mpsc::UnboundedReceiver<I>)
    where
        I: Into<Intent>,
    {
        while let Some(intent) = intents.recv().await {
            if let Err(e) = self.handle(intent.into()).await {
                warn!(error = %e, "Intent failed");
            }
        }
        info!("Intent stream closed");
    }

    fn notify(&self, notification: Notification) {
        let severity = notification.severity;
        if let Err(e) = self.notifier.notify(notification) {
            warn!(?severity, error = %e, "Notification dropped");
        }
    }
}
