//! [`ActorEntity`] implementation that lets the generic store manage [`Account`] records.
//!
//! Both create and update take a [`MutationBuilder`]; the store validates the object type and
//! the field names before anything is written.

use crate::account_actor::AccountError;
use crate::framework::ActorEntity;
use crate::model::{Account, AccountField, AccountId, MutationBuilder};
use async_trait::async_trait;

/// Yields the editable fields of a payload, rejecting foreign object types and unknown
/// field names. The `id` field is routing information and is skipped.
fn editable_fields(
    builder: &MutationBuilder,
) -> Result<Vec<(AccountField, &str)>, AccountError> {
    if builder.object_type != Account::OBJECT_TYPE {
        return Err(AccountError::WrongObjectType(builder.object_type.clone()));
    }
    builder
        .object_fields
        .iter()
        .filter(|(name, _)| name.as_str() != MutationBuilder::ID_FIELD)
        .map(|(name, value)| {
            name.parse::<AccountField>()
                .map(|field| (field, value.as_str()))
                .map_err(AccountError::UnknownField)
        })
        .collect()
}

#[async_trait]
impl ActorEntity for Account {
    type Id = AccountId;
    type Create = MutationBuilder;
    type Update = MutationBuilder;
    type Error = AccountError;

    fn from_create_params(id: AccountId, params: MutationBuilder) -> Result<Self, Self::Error> {
        let mut account = Account {
            id: Some(id),
            ..Account::default()
        };
        for (field, value) in editable_fields(&params)? {
            account = account.with_field(field, value);
        }
        if account.name.trim().is_empty() {
            return Err(AccountError::MissingName);
        }
        Ok(account)
    }

    /// Applies every field present in the payload; absent fields keep their value.
    async fn on_update(&mut self, update: MutationBuilder) -> Result<(), Self::Error> {
        let mut next = self.clone();
        for (field, value) in editable_fields(&update)? {
            next = next.with_field(field, value);
        }
        if next.name.trim().is_empty() {
            return Err(AccountError::MissingName);
        }
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> MutationBuilder {
        MutationBuilder::new(Account::OBJECT_TYPE)
    }

    #[test]
    fn test_create_from_builder() {
        let params = builder().field("name", "Acme").field("description", "");
        let account = Account::from_create_params(AccountId::from("001"), params).unwrap();
        assert_eq!(account, Account::with_id("001", "Acme", ""));
    }

    #[test]
    fn test_create_ignores_client_supplied_id() {
        let params = builder().field("name", "Acme").field("id", "999");
        let account = Account::from_create_params(AccountId::from("001"), params).unwrap();
        assert_eq!(account.id, Some(AccountId::from("001")));
    }

    #[test]
    fn test_create_rejections() {
        let id = AccountId::from("001");
        assert_eq!(
            Account::from_create_params(id.clone(), builder().field("description", "x")),
            Err(AccountError::MissingName)
        );
        assert_eq!(
            Account::from_create_params(id.clone(), MutationBuilder::new("Contact").field("name", "x")),
            Err(AccountError::WrongObjectType("Contact".into()))
        );
        assert_eq!(
            Account::from_create_params(id, builder().field("name", "x").field("industry", "y")),
            Err(AccountError::UnknownField("industry".into()))
        );
    }

    #[tokio::test]
    async fn test_update_applies_present_fields() {
        let mut account = Account::with_id("001", "Acme", "Widgets");
        account
            .on_update(builder().field("id", "001").field("description", "Gadgets"))
            .await
            .unwrap();
        assert_eq!(account, Account::with_id("001", "Acme", "Gadgets"));
    }

    #[tokio::test]
    async fn test_rejected_update_changes_nothing() {
        let mut account = Account::with_id("001", "Acme", "Widgets");
        let result = account
            .on_update(builder().field("description", "Gadgets").field("name", " "))
            .await;
        assert_eq!(result, Err(AccountError::MissingName));
        assert_eq!(account, Account::with_id("001", "Acme", "Widgets"));
    }
}
