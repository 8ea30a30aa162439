//! Wiring and shutdown of the running account page.

pub mod config;
pub mod tracing;

pub use config::{ConfigError, SeedAccount, Settings};

use crate::clients::{AccountClient, RecordService};
use crate::modal::ModalController;
use crate::model::{AccountField, MutationBuilder, Notification};
use crate::orchestrator::{AccountOrchestrator, ChannelNotifier};
use crate::table::{RecordTable, TableEvent};
use ::tracing::{error, info};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to seed account {name:?}: {reason}")]
    Seed { name: String, reason: String },

    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The receiving ends a front end listens on.
pub struct SystemOutlets {
    pub notifications: mpsc::UnboundedReceiver<Notification>,
    /// One controller per opened modal.
    pub modals: mpsc::Receiver<ModalController>,
}

/// The running system: the in-memory store actor, the orchestrator, and the task that feeds
/// table row actions into it.
///
/// # Example
///
/// ```ignore
/// let (system, mut outlets) = AccountSystem::start(&Settings::default()).await?;
///
/// system.table().handle_row_action("delete", &row)?;
/// let modal = outlets.modals.recv().await.unwrap();
/// modal.submit().await?;
///
/// system.shutdown().await?;
/// ```
pub struct AccountSystem {
    pub orchestrator: Arc<AccountOrchestrator>,
    pub accounts: AccountClient,
    table_events: mpsc::UnboundedSender<TableEvent>,
    dispatcher: JoinHandle<()>,
    actor: JoinHandle<()>,
}

impl AccountSystem {
    /// Validates `settings`, spawns the store, preloads `seed_accounts` and performs the initial list load.
    pub async fn start(settings: &Settings) -> Result<(Self, SystemOutlets), SystemError> {
        settings.validate()?;
        let (actor, accounts) = crate::account_actor::new(settings.channel_buffer);
        let actor = tokio::spawn(actor.run());

        for seed in &settings.seed_accounts {
            seed_account(&accounts, &settings.object_type, seed).await?;
        }

        let (notifier, notifications) = ChannelNotifier::new();
        let (presenter, modals) = mpsc::channel(settings.channel_buffer);
        let orchestrator = AccountOrchestrator::new(
            Arc::new(accounts.clone()),
            Arc::new(notifier),
            presenter,
        )
        .with_object_type(settings.object_type.clone())
        .with_buffer_size(settings.channel_buffer);
        let orchestrator = Arc::new(orchestrator);
        orchestrator.load().await;

        let (table_events, events) = mpsc::unbounded_channel::<TableEvent>();
        let dispatcher = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.dispatch(events).await }
        });

        info!(seeded = settings.seed_accounts.len(), "System started");
        let system = Self {
            orchestrator,
            accounts,
            table_events,
            dispatcher,
            actor,
        };
        Ok((system, SystemOutlets { notifications, modals }))
    }

    /// A table bound to the currently published list whose row actions reach the
    /// orchestrator.
    pub fn table(&self) -> RecordTable {
        let mut table = RecordTable::new(self.table_events.clone());
        table.bind(self.orchestrator.records().view);
        table
    }

    /// Stops the dispatcher, then the store actor.
    ///
    /// Every [`RecordTable`] and every clone of the orchestrator handed out must be dropped
    /// first, otherwise the channels stay open and this waits for them.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        drop(self.table_events);
        if let Err(e) = self.dispatcher.await {
            error!("Dispatcher task failed: {:?}", e);
            return Err(e.into());
        }

        drop(self.orchestrator);
        drop(self.accounts);
        if let Err(e) = self.actor.await {
            error!("Actor task failed: {:?}", e);
            return Err(e.into());
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

async fn seed_account(
    accounts: &AccountClient,
    object_type: &str,
    seed: &SeedAccount,
) -> Result<(), SystemError> {
    let builder = MutationBuilder::new(object_type)
        .field(AccountField::Name.as_str(), seed.name.clone())
        .field(AccountField::Description.as_str(), seed.description.clone());
    let failed = |reason: String| SystemError::Seed {
        name: seed.name.clone(),
        reason,
    };

    let envelope = accounts
        .create(builder)
        .await
        .map_err(|e| failed(e.to_string()))?;
    if !envelope.is_success() {
        return Err(failed(envelope.diagnostic()));
    }
    Ok(())
}
