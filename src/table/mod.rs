//! # Record Table
//!
//! Stateless adapter between the rendered table and the orchestrator: it exposes the columns
//! and rows of the current [`RecordListView`] and turns row-menu clicks into [`TableEvent`]s.

use crate::model::{Account, ColumnSpec, RecordListView};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Row-level actions offered by the table menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    Edit,
    Delete,
}

impl TableAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableAction::Edit => "edit",
            TableAction::Delete => "delete",
        }
    }
}

impl std::str::FromStr for TableAction {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edit" => Ok(TableAction::Edit),
            "delete" => Ok(TableAction::Delete),
            other => Err(TableError::UnknownAction(other.to_string())),
        }
    }
}

/// A row action together with the full record of the row it was fired on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEvent {
    pub action: TableAction,
    pub data: Account,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Unknown row action: {0}")]
    UnknownAction(String),
    #[error("Table event listener is gone")]
    ListenerClosed,
}

pub struct RecordTable {
    view: Option<Arc<RecordListView>>,
    events: mpsc::UnboundedSender<TableEvent>,
}

impl RecordTable {
    pub fn new(events: mpsc::UnboundedSender<TableEvent>) -> Self {
        Self { view: None, events }
    }

    /// Binds the table to a new list projection (or to nothing while loading).
    pub fn bind(&mut self, view: Option<Arc<RecordListView>>) {
        self.view = view;
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        self.view.as_deref().map(|v| v.columns.as_slice()).unwrap_or(&[])
    }

    pub fn rows(&self) -> &[Account] {
        self.view.as_deref().map(|v| v.rows.as_slice()).unwrap_or(&[])
    }

    /// Emits an event named after `action` with `row` as its payload.
    pub fn handle_row_action(&self, action: &str, row: &Account) -> Result<(), TableError> {
        let action = action.parse::<TableAction>()?;
        debug!(action = action.as_str(), id = ?row.id, "Row action");
        self.events
            .send(TableEvent {
                action,
                data: row.clone(),
            })
            .map_err(|_| TableError::ListenerClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_table_is_empty() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let table = RecordTable::new(tx);
        assert!(table.columns().is_empty());
        assert!(table.rows().is_empty());
    }

    #[test]
    fn test_row_action_carries_full_row() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut table = RecordTable::new(tx);
        let row = Account::with_id("001", "Acme", "Widgets");
        table.bind(Some(Arc::new(RecordListView::accounts(vec![row.clone()]))));

        assert_eq!(table.rows(), &[row.clone()]);
        assert_eq!(table.columns().len(), 3);

        table.handle_row_action("delete", &table.rows()[0]).unwrap();
        let event = rx.try_recv().unwrap();
        assert_eq!(event.action, TableAction::Delete);
        assert_eq!(event.data, row);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let table = RecordTable::new(tx);
        let result = table.handle_row_action("archive", &Account::default());
        assert_eq!(result, Err(TableError::UnknownAction("archive".into())));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_listener() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let table = RecordTable::new(tx);
        let result = table.handle_row_action("edit", &Account::default());
        assert_eq!(result, Err(TableError::ListenerClosed));
    }
}
