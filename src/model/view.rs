use crate::model::Account;
use serde::{Deserialize, Serialize};

/// What a table column renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    /// A per-row menu; each entry is the name of the action event it fires.
    Action { actions: Vec<String> },
}

/// One column of the record table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub label: String,
    pub field_name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn text(label: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field_name: field_name.into(),
            kind: ColumnKind::Text,
        }
    }

    pub fn actions(actions: &[&str]) -> Self {
        Self {
            label: String::new(),
            field_name: String::new(),
            kind: ColumnKind::Action {
                actions: actions.iter().map(|a| a.to_string()).collect(),
            },
        }
    }
}

/// Read projection of the live account list.
///
/// Every refresh produces a new value; nothing patches rows in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordListView {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Account>,
}

impl RecordListView {
    /// The standard account table: name, description and the edit/delete row menu.
    pub fn accounts(rows: Vec<Account>) -> Self {
        Self {
            columns: vec![
                ColumnSpec::text("Name", "name"),
                ColumnSpec::text("Description", "description"),
                ColumnSpec::actions(&["edit", "delete"]),
            ],
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
