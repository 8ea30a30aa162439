use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque identifier assigned to an [`Account`] by the backend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Editable fields of an [`Account`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Name,
    Description,
}

impl AccountField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountField::Name => "name",
            AccountField::Description => "description",
        }
    }
}

impl std::str::FromStr for AccountField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(AccountField::Name),
            "description" => Ok(AccountField::Description),
            other => Err(other.to_string()),
        }
    }
}

/// The single record kind managed by this crate.
///
/// `id` is `None` until the backend has created the record. The UI only ever holds
/// transient copies; the backend owns the canonical version.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AccountId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Account {
    /// Object type tag sent with every mutation.
    pub const OBJECT_TYPE: &'static str = "Account";

    /// Creates an account that has not been persisted yet.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Creates an account that already carries a backend identifier.
    pub fn with_id(
        id: impl Into<AccountId>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn field(&self, field: AccountField) -> &str {
        match field {
            AccountField::Name => &self.name,
            AccountField::Description => &self.description,
        }
    }

    /// Returns a copy of this account with exactly one field replaced.
    pub fn with_field(&self, field: AccountField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        match field {
            AccountField::Name => next.name = value.into(),
            AccountField::Description => next.description = value.into(),
        }
        next
    }
}

/// Payload submitted for a create or an update.
///
/// Built fresh from the editor's current working copy on every submission; it is a full
/// snapshot of the editable fields, never a diff. Updates carry the record id as the `id`
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationBuilder {
    pub object_type: String,
    pub object_fields: BTreeMap<String, String>,
}

impl MutationBuilder {
    pub const ID_FIELD: &'static str = "id";

    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_fields: BTreeMap::new(),
        }
    }

    /// Snapshots every field of `record`, including its id when it has one.
    pub fn from_record(object_type: impl Into<String>, record: &Account) -> Self {
        let mut builder = Self::new(object_type)
            .field(AccountField::Name.as_str(), record.name.clone())
            .field(AccountField::Description.as_str(), record.description.clone());
        if let Some(id) = &record.id {
            builder = builder.field(Self::ID_FIELD, id.to_string());
        }
        builder
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.object_fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.object_fields.get(name).map(String::as_str)
    }

    pub fn record_id(&self) -> Option<AccountId> {
        self.get(Self::ID_FIELD)
            .filter(|id| !id.is_empty())
            .map(AccountId::from)
    }
}
