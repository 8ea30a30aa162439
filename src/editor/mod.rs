//! # Account Info Editor
//!
//! Field-level change accumulator for one account. Every edit produces a brand new working
//! copy behind a fresh [`Arc`]; the previous copy is never touched, so anyone still holding it
//! keeps seeing the old values. No validation happens here.

use crate::model::{Account, AccountField};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Event emitted after every accepted edit, carrying the full replacement working copy.
#[derive(Debug, Clone)]
pub struct DataUpdated {
    pub value: Arc<Account>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Editor bound to a single account's working copy.
pub struct AccountInfoEditor {
    data: Arc<Account>,
    view: bool,
    events: Option<mpsc::UnboundedSender<DataUpdated>>,
}

impl AccountInfoEditor {
    /// An editable form that reports every change on `events`.
    pub fn new(data: Arc<Account>, events: mpsc::UnboundedSender<DataUpdated>) -> Self {
        Self {
            data,
            view: false,
            events: Some(events),
        }
    }

    /// A read-only form; edits are ignored and nothing is emitted.
    pub fn view_only(data: Arc<Account>) -> Self {
        Self {
            data,
            view: true,
            events: None,
        }
    }

    /// Replaces the working copy without emitting an event.
    pub fn set_data(&mut self, data: Arc<Account>) {
        self.data = data;
    }

    pub fn data(&self) -> &Arc<Account> {
        &self.data
    }

    pub fn is_view(&self) -> bool {
        self.view
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn description(&self) -> &str {
        &self.data.description
    }

    /// Applies one field change by name, as a form input reports it.
    ///
    /// Returns the working copy after the change (unchanged in view mode).
    pub fn handle_change(
        &mut self,
        field: &str,
        value: impl Into<String>,
    ) -> Result<Arc<Account>, EditorError> {
        let field = field
            .parse::<AccountField>()
            .map_err(EditorError::UnknownField)?;
        Ok(self.edit(field, value))
    }

    /// Applies one field change.
    pub fn edit(&mut self, field: AccountField, value: impl Into<String>) -> Arc<Account> {
        if self.view {
            debug!(field = field.as_str(), "Edit ignored in view mode");
            return self.data.clone();
        }

        let updated = Arc::new(self.data.with_field(field, value));
        self.data = updated.clone();
        debug!(field = field.as_str(), "Field updated");

        if let Some(events) = &self.events {
            let event = DataUpdated {
                value: updated.clone(),
            };
            if events.send(event).is_err() {
                warn!(field = field.as_str(), "No listener for data update");
            }
        }
        updated
    }
}
