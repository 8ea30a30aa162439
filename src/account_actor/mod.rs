//! Account-specific store logic: the entity implementation and its factory.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::AccountClient;
use crate::framework::ResourceActor;
use crate::model::{Account, AccountId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Creates a new Account actor and its client.
///
/// Ids are handed out as zero-padded counters (`"001"`, `"002"`, ...).
pub fn new(buffer_size: usize) -> (ResourceActor<Account>, AccountClient) {
    let account_id_counter = Arc::new(AtomicU64::new(1));
    let next_account_id = move || {
        let id = account_id_counter.fetch_add(1, Ordering::SeqCst);
        AccountId::new(format!("{:03}", id))
    };

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_account_id);
    let client = AccountClient::new(generic_client);

    (actor, client)
}
