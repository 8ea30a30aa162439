use crate::clients::{RecordService, ServiceError};
use crate::editor::{AccountInfoEditor, DataUpdated};
use crate::modal::ModalError;
use crate::model::{Account, ModalOutcome, MutationBuilder};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

/// Which workflow to open, with the row it was opened for.
#[derive(Debug, Clone)]
pub enum ModalKind {
    Create,
    Update(Arc<Account>),
    Delete(Arc<Account>),
}

impl ModalKind {
    pub fn variant(&self) -> ModalVariant {
        match self {
            ModalKind::Create => ModalVariant::Create,
            ModalKind::Update(_) => ModalVariant::Update,
            ModalKind::Delete(_) => ModalVariant::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalVariant {
    Create,
    Update,
    Delete,
}

/// `Open` → `Submitting` → `Closed`. Published to every [`ModalController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Open,
    Submitting,
    Closed(ModalOutcome),
}

/// User input delivered to a running modal.
#[derive(Debug)]
pub enum ModalCommand {
    IsEdited { respond_to: oneshot::Sender<bool> },
    WorkingCopy { respond_to: oneshot::Sender<Arc<Account>> },
    Submit,
    Cancel,
}

/// What a modal resolves with: an outcome, or the transport fault that prevented one.
pub type Resolution = Result<ModalOutcome, ServiceError>;

/// One create, update or delete dialog.
///
/// Commands and editor events are handled one at a time. `Submit` awaits the service call
/// inline and ends the loop, so the modal cannot resolve while the call is in flight and
/// never issues a second mutation.
pub struct ModalWorkflow {
    kind: ModalKind,
    original: Arc<Account>,
    working: Arc<Account>,
    state: watch::Sender<ModalState>,
    object_type: String,
    service: Arc<dyn RecordService>,
    commands: mpsc::Receiver<ModalCommand>,
    edits: mpsc::UnboundedReceiver<DataUpdated>,
}

impl ModalWorkflow {
    /// Builds the workflow and the controller the UI drives it with.
    pub fn new(
        kind: ModalKind,
        service: Arc<dyn RecordService>,
        object_type: impl Into<String>,
        buffer_size: usize,
    ) -> (Self, ModalController) {
        let original = match &kind {
            ModalKind::Create => Arc::new(Account::default()),
            ModalKind::Update(record) | ModalKind::Delete(record) => record.clone(),
        };
        let (command_tx, commands) = mpsc::channel(buffer_size.max(1));
        let (edit_tx, edits) = mpsc::unbounded_channel();
        let (state, state_rx) = watch::channel(ModalState::Open);

        let controller = ModalController {
            variant: kind.variant(),
            record: original.clone(),
            commands: command_tx,
            edits: edit_tx,
            state: state_rx,
        };
        let workflow = Self {
            kind,
            working: original.clone(),
            original,
            state,
            object_type: object_type.into(),
            service,
            commands,
            edits,
        };
        (workflow, controller)
    }

    /// Reference-identity check: any accepted edit swaps in a new `Arc`, even one that
    /// writes a field's current value back.
    pub fn is_edited(&self) -> bool {
        !Arc::ptr_eq(&self.original, &self.working)
    }

    pub fn state(&self) -> ModalState {
        *self.state.borrow()
    }

    /// Runs the modal in its own task.
    pub fn spawn(self) -> ModalHandle {
        let (respond_to, response) = oneshot::channel();
        tokio::spawn(async move {
            let resolution = self.run().await;
            let _ = respond_to.send(resolution);
        });
        ModalHandle { response }
    }

    /// Processes input until the modal is submitted, cancelled or abandoned.
    pub async fn run(mut self) -> Resolution {
        let variant = self.kind.variant();
        info!(?variant, "Modal opened");

        let resolution = loop {
            tokio::select! {
                biased;
                // Pending edits are applied before any command queued after them.
                Some(DataUpdated { value }) = self.edits.recv() => self.apply(value),
                command = self.commands.recv() => match command {
                    Some(ModalCommand::IsEdited { respond_to }) => {
                        let _ = respond_to.send(self.is_edited());
                    }
                    Some(ModalCommand::WorkingCopy { respond_to }) => {
                        let _ = respond_to.send(self.working.clone());
                    }
                    Some(ModalCommand::Submit) => break self.submit().await,
                    Some(ModalCommand::Cancel) => {
                        info!(?variant, "Modal cancelled");
                        break Ok(ModalOutcome::Cancelled);
                    }
                    None => {
                        info!(?variant, "Modal abandoned");
                        break Ok(ModalOutcome::Cancelled);
                    }
                },
            }
        };

        if let Ok(outcome) = &resolution {
            self.state.send_replace(ModalState::Closed(*outcome));
        }
        debug!(?variant, state = ?self.state(), "Modal closed");
        resolution
    }

    fn apply(&mut self, value: Arc<Account>) {
        if let ModalKind::Delete(_) = self.kind {
            debug!("Edit ignored by delete modal");
            return;
        }
        self.working = value;
    }

    fn builder(&self) -> MutationBuilder {
        MutationBuilder::from_record(self.object_type.clone(), &self.working)
    }

    async fn submit(&mut self) -> Resolution {
        self.state.send_replace(ModalState::Submitting);
        let variant = self.kind.variant();
        info!(?variant, "Submitting");

        let result = match &self.kind {
            ModalKind::Create => self.service.create(self.builder()).await,
            ModalKind::Update(_) => self.service.update(self.builder()).await,
            ModalKind::Delete(record) => {
                let id = record.id.clone().unwrap_or_default();
                self.service.delete(id).await
            }
        };

        match result {
            Ok(envelope) => {
                let outcome = ModalOutcome::from_envelope(&envelope);
                if envelope.is_success() {
                    info!(?variant, "Mutation succeeded");
                } else {
                    warn!(
                        ?variant,
                        status = envelope.status,
                        message = ?envelope.message,
                        stacktrace = ?envelope.stacktrace,
                        "Mutation failed"
                    );
                }
                Ok(outcome)
            }
            Err(e) => {
                error!(?variant, error = %e, "Mutation could not complete");
                Err(e)
            }
        }
    }
}

/// The UI side of an open modal. Cheap to clone.
///
/// Once every controller is dropped the modal resolves as cancelled.
#[derive(Clone)]
pub struct ModalController {
    variant: ModalVariant,
    record: Arc<Account>,
    commands: mpsc::Sender<ModalCommand>,
    edits: mpsc::UnboundedSender<DataUpdated>,
    state: watch::Receiver<ModalState>,
}

impl ModalController {
    pub fn variant(&self) -> ModalVariant {
        self.variant
    }

    /// The record the modal was opened with (an empty record for create).
    pub fn record(&self) -> &Arc<Account> {
        &self.record
    }

    /// An editor seeded with the modal's current working copy and wired to this modal.
    ///
    /// Edits made through earlier editors are applied before the copy is taken. Delete
    /// modals only show the record, so they get a view-only editor.
    pub async fn editor(&self) -> Result<AccountInfoEditor, ModalError> {
        match self.variant {
            ModalVariant::Delete => Ok(AccountInfoEditor::view_only(self.record.clone())),
            ModalVariant::Create | ModalVariant::Update => {
                let working = self.working_copy().await?;
                Ok(AccountInfoEditor::new(working, self.edits.clone()))
            }
        }
    }

    /// Last state the modal published; stays readable after it closed.
    pub fn state(&self) -> ModalState {
        *self.state.borrow()
    }

    /// Forwards a full replacement working copy, as an embedded editor would.
    pub fn data_updated(&self, value: Arc<Account>) -> Result<(), ModalError> {
        self.edits
            .send(DataUpdated { value })
            .map_err(|_| ModalError::Closed)
    }

    pub async fn is_edited(&self) -> Result<bool, ModalError> {
        let (respond_to, response) = oneshot::channel();
        self.send(ModalCommand::IsEdited { respond_to }).await?;
        response.await.map_err(|_| ModalError::Closed)
    }

    pub async fn working_copy(&self) -> Result<Arc<Account>, ModalError> {
        let (respond_to, response) = oneshot::channel();
        self.send(ModalCommand::WorkingCopy { respond_to }).await?;
        response.await.map_err(|_| ModalError::Closed)
    }

    /// Save, update or confirm-delete, depending on the variant.
    pub async fn submit(&self) -> Result<(), ModalError> {
        self.send(ModalCommand::Submit).await
    }

    pub async fn cancel(&self) -> Result<(), ModalError> {
        self.send(ModalCommand::Cancel).await
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn send(&self, command: ModalCommand) -> Result<(), ModalError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ModalError::Closed)
    }
}

/// Resolves once with the modal's result.
pub struct ModalHandle {
    response: oneshot::Receiver<Resolution>,
}

impl ModalHandle {
    pub async fn outcome(self) -> Result<ModalOutcome, ModalError> {
        match self.response.await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(e)) => Err(ModalError::Transport(e)),
            Err(_) => Err(ModalError::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::AccountClient;
    use crate::framework::mock::{create_mock_client, expect_create, expect_delete, MockClient};
    use crate::framework::FrameworkError;
    use crate::model::{AccountField, AccountId};

    #[derive(Debug, thiserror::Error)]
    #[error("DUPLICATE")]
    struct Duplicate;

    fn service(mock: &MockClient<Account>) -> Arc<dyn RecordService> {
        Arc::new(AccountClient::new(mock.client()))
    }

    fn open(kind: ModalKind, service: Arc<dyn RecordService>) -> (ModalController, ModalHandle) {
        let (workflow, controller) = ModalWorkflow::new(kind, service, Account::OBJECT_TYPE, 8);
        (controller, workflow.spawn())
    }

    fn acme() -> Arc<Account> {
        Arc::new(Account::with_id("001", "Acme", "Widgets"))
    }

    #[tokio::test]
    async fn test_cancel_makes_no_calls() {
        for kind in [
            ModalKind::Create,
            ModalKind::Update(acme()),
            ModalKind::Delete(acme()),
        ] {
            let mock = MockClient::<Account>::new();
            let (modal, handle) = open(kind, service(&mock));

            modal.cancel().await.unwrap();

            assert_eq!(handle.outcome().await, Ok(ModalOutcome::Cancelled));
            assert!(mock.received().is_empty());
        }
    }

    #[tokio::test]
    async fn test_dropping_every_controller_cancels() {
        let mock = MockClient::<Account>::new();
        let (modal, handle) = open(ModalKind::Update(acme()), service(&mock));
        let editor = modal.editor().await.unwrap();

        drop(modal);

        assert_eq!(handle.outcome().await, Ok(ModalOutcome::Cancelled));
        assert!(mock.received().is_empty());
        drop(editor);
    }

    #[tokio::test]
    async fn test_create_submits_snapshot_of_edits() {
        let (client, mut receiver) = create_mock_client::<Account>(4);
        let (modal, handle) = open(ModalKind::Create, Arc::new(AccountClient::new(client)));

        let mut editor = modal.editor().await.unwrap();
        editor.handle_change("name", "Acme").unwrap();
        modal.submit().await.unwrap();

        let (params, responder) = expect_create(&mut receiver).await.unwrap();
        assert_eq!(params.object_type, "Account");
        assert_eq!(params.get("name"), Some("Acme"));
        assert_eq!(params.get("description"), Some(""));
        assert!(params.record_id().is_none());
        responder.send(Ok(AccountId::from("001"))).unwrap();

        assert_eq!(handle.outcome().await, Ok(ModalOutcome::Success));
    }

    #[tokio::test]
    async fn test_create_failure_resolves_500() {
        let mut mock = MockClient::<Account>::new();
        mock.expect_create()
            .return_err(FrameworkError::EntityError(Box::new(Duplicate)));
        let (modal, handle) = open(ModalKind::Create, service(&mock));

        modal
            .editor()
            .await
            .unwrap()
            .handle_change("name", "Acme")
            .unwrap();
        modal.submit().await.unwrap();

        let outcome = handle.outcome().await.unwrap();
        assert_eq!(outcome, ModalOutcome::Failure);
        assert_eq!(outcome.code(), 500);
        assert_eq!(mock.mutation_count(), 1);
    }

    #[tokio::test]
    async fn test_update_edit_tracking_is_by_reference() {
        let mock = MockClient::<Account>::new();
        let record = acme();
        let (modal, handle) = open(ModalKind::Update(record.clone()), service(&mock));

        assert!(!modal.is_edited().await.unwrap());
        assert!(Arc::ptr_eq(&modal.working_copy().await.unwrap(), &record));

        // Writing back the current value still counts as an edit.
        modal.editor().await.unwrap().edit(AccountField::Name, "Acme");
        assert!(modal.is_edited().await.unwrap());
        assert_eq!(*modal.working_copy().await.unwrap(), *record);

        modal.cancel().await.unwrap();
        assert_eq!(handle.outcome().await, Ok(ModalOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_update_sends_record_id() {
        let mut mock = MockClient::<Account>::new();
        mock.expect_update(AccountId::from("001"))
            .return_ok(Account::with_id("001", "Acme", "Gadgets"));
        let (modal, handle) = open(ModalKind::Update(acme()), service(&mock));

        modal
            .data_updated(Arc::new(Account::with_id("001", "Acme", "Gadgets")))
            .unwrap();
        modal.submit().await.unwrap();

        assert_eq!(handle.outcome().await, Ok(ModalOutcome::Success));
        assert_eq!(mock.mutation_count(), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_delete_waits_for_the_call_to_settle() {
        let (client, mut receiver) = create_mock_client::<Account>(4);
        let (modal, handle) = open(ModalKind::Delete(acme()), Arc::new(AccountClient::new(client)));
        let outcome = tokio::spawn(handle.outcome());

        modal.submit().await.unwrap();
        let (id, responder) = expect_delete(&mut receiver).await.unwrap();
        assert_eq!(id, AccountId::from("001"));
        assert_eq!(modal.state(), ModalState::Submitting);

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!outcome.is_finished());

        responder.send(Ok(())).unwrap();
        assert_eq!(outcome.await.unwrap(), Ok(ModalOutcome::Success));
        assert_eq!(modal.state(), ModalState::Closed(ModalOutcome::Success));
    }

    #[tokio::test]
    async fn test_each_editor_starts_from_latest_edits() {
        let (client, mut receiver) = create_mock_client::<Account>(4);
        let (modal, handle) = open(ModalKind::Create, Arc::new(AccountClient::new(client)));
        assert_eq!(modal.state(), ModalState::Open);

        modal.editor().await.unwrap().edit(AccountField::Name, "Acme");
        let mut second = modal.editor().await.unwrap();
        assert_eq!(second.name(), "Acme");
        second.edit(AccountField::Description, "Widgets");
        modal.submit().await.unwrap();

        let (params, responder) = expect_create(&mut receiver).await.unwrap();
        assert_eq!(params.get("name"), Some("Acme"));
        assert_eq!(params.get("description"), Some("Widgets"));
        responder.send(Ok(AccountId::from("001"))).unwrap();
        assert_eq!(handle.outcome().await, Ok(ModalOutcome::Success));
    }

    #[tokio::test]
    async fn test_zero_buffer_is_clamped() {
        let mock = MockClient::<Account>::new();
        let (workflow, modal) =
            ModalWorkflow::new(ModalKind::Create, service(&mock), Account::OBJECT_TYPE, 0);
        let handle = workflow.spawn();

        modal.cancel().await.unwrap();
        assert_eq!(handle.outcome().await, Ok(ModalOutcome::Cancelled));
        assert_eq!(modal.state(), ModalState::Closed(ModalOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_second_submit_is_not_sent() {
        let mut mock = MockClient::<Account>::new();
        mock.expect_delete(AccountId::from("001")).return_ok(());
        let (modal, handle) = open(ModalKind::Delete(acme()), service(&mock));

        modal.submit().await.unwrap();
        let _ = modal.submit().await;

        assert_eq!(handle.outcome().await, Ok(ModalOutcome::Success));
        assert_eq!(mock.mutation_count(), 1);
        assert!(modal.submit().await.is_err());
    }

    #[tokio::test]
    async fn test_delete_modal_ignores_edits() {
        let mut mock = MockClient::<Account>::new();
        mock.expect_delete(AccountId::from("001")).return_ok(());
        let (modal, handle) = open(ModalKind::Delete(acme()), service(&mock));

        assert!(modal.editor().await.unwrap().is_view());
        modal
            .data_updated(Arc::new(Account::with_id("002", "Other", "")))
            .unwrap();
        assert!(!modal.is_edited().await.unwrap());

        modal.submit().await.unwrap();
        assert_eq!(handle.outcome().await, Ok(ModalOutcome::Success));
        mock.verify();
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_an_outcome() {
        let (actor, client) = crate::account_actor::new(4);
        drop(actor);
        let (modal, handle) = open(ModalKind::Delete(acme()), Arc::new(client));

        modal.submit().await.unwrap();

        assert!(matches!(
            handle.outcome().await,
            Err(ModalError::Transport(ServiceError::Unreachable(_)))
        ));
    }

    #[test]
    fn test_fresh_workflow_state() {
        let mock_service: Arc<dyn RecordService> = {
            let (client, _receiver) = create_mock_client::<Account>(1);
            Arc::new(AccountClient::new(client))
        };
        let (workflow, controller) =
            ModalWorkflow::new(ModalKind::Create, mock_service, Account::OBJECT_TYPE, 1);
        assert_eq!(workflow.state(), ModalState::Open);
        assert!(!workflow.is_edited());
        assert_eq!(controller.variant(), ModalVariant::Create);
        assert_eq!(**controller.record(), Account::default());
    }
}
