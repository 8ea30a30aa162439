//! # Account Manager demo
//!
//! Runs a scripted session against the in-memory store: two saves (one valid, one without a
//! name), a cancelled save, an edit and a delete from the table. A background task plays the
//! user behind each modal.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use account_manager::lifecycle::tracing::setup_tracing;
use account_manager::lifecycle::{AccountSystem, Settings};
use account_manager::modal::{ModalController, ModalError, ModalVariant};
use account_manager::model::{AccountField, Notification, Severity};
use tokio::sync::mpsc;
use tracing::{error, info, Instrument};

async fn fill_and_submit(
    modal: &ModalController,
    fields: &[(AccountField, &str)],
) -> Result<(), ModalError> {
    let mut editor = modal.editor().await?;
    for (field, value) in fields {
        editor.edit(*field, *value);
    }
    modal.submit().await
}

/// Answers each modal the way a scripted user would.
async fn play_user(mut modals: mpsc::Receiver<ModalController>) {
    let mut saves = 0;
    while let Some(modal) = modals.recv().await {
        let result = match modal.variant() {
            ModalVariant::Create => {
                saves += 1;
                match saves {
                    1 => {
                        let fields = [
                            (AccountField::Name, "Acme"),
                            (AccountField::Description, "Widgets"),
                        ];
                        fill_and_submit(&modal, &fields).await
                    }
                    // Submitted blank; the store rejects it.
                    2 => modal.submit().await,
                    _ => modal.cancel().await,
                }
            }
            ModalVariant::Update => {
                fill_and_submit(&modal, &[(AccountField::Description, "Gadgets")]).await
            }
            ModalVariant::Delete => modal.submit().await,
        };
        if let Err(e) = result {
            error!(error = %e, "Modal input failed");
        }
    }
}

fn report(notification: Option<Notification>) -> Option<Severity> {
    match notification {
        Some(n) => {
            info!(severity = ?n.severity, title = %n.title, "{}", n.message);
            Some(n.severity)
        }
        None => {
            error!("Notification channel closed");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let settings = Settings::load().map_err(|e| e.to_string())?;
    info!(?settings, "Starting account manager");

    let (system, outlets) = AccountSystem::start(&settings)
        .await
        .map_err(|e| e.to_string())?;
    let mut notifications = outlets.notifications;
    let user = tokio::spawn(play_user(outlets.modals));
    let orchestrator = system.orchestrator.clone();

    for attempt in 1..=3 {
        let span = tracing::info_span!("save", attempt);
        let outcome = orchestrator.save().instrument(span).await;
        info!(attempt, ?outcome, "Save finished");
        report(notifications.recv().await);
    }

    let Some(row) = orchestrator.records().rows().first().cloned() else {
        drop(orchestrator);
        system.shutdown().await.map_err(|e| e.to_string())?;
        return Err("No account to edit".to_string());
    };

    let outcome = orchestrator
        .edit(row)
        .instrument(tracing::info_span!("edit"))
        .await;
    info!(?outcome, "Edit finished");
    report(notifications.recv().await);

    let records = orchestrator.records();
    for row in records.rows() {
        info!(id = ?row.id, name = %row.name, description = %row.description, "Row");
    }

    if let Some(row) = records.rows().first() {
        let mut changes = orchestrator.subscribe();
        let table = system.table();
        table
            .handle_row_action("delete", row)
            .map_err(|e| e.to_string())?;
        // The table dispatches in the background; a success is followed by a refresh.
        if report(notifications.recv().await) == Some(Severity::Success) {
            let _ = changes.changed().await;
        }
    }
    info!(rows = orchestrator.records().rows().len(), "Final table");

    drop(orchestrator);
    system.shutdown().await.map_err(|e| e.to_string())?;
    user.await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}
