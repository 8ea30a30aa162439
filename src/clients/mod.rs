//! The record service boundary and its actor-backed implementation.

pub mod account_client;
pub mod record_service;

pub use account_client::*;
pub use record_service::*;
