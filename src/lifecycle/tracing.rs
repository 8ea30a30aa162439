//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a `tracing-subscriber` formatter driven by `RUST_LOG`.
//!
//! The output is compact and target-less (`with_target(false)`); structured fields such as
//! `entity_type`, `id`, `variant` and `outcome` carry the context instead of module paths.
//!
//! ## What Gets Traced
//!
//! - **Store**: actor startup and shutdown, every create/update/delete with its id
//! - **Modals**: open, submit, cancel, and the status of the mutation they made
//! - **Orchestrator**: resolved outcomes, rejected intents, dropped notifications
//! - **Subscription**: loading at `debug`, refreshes at `info`, list failures at `error`
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run
//!
//! # Request payloads and modal state transitions
//! RUST_LOG=debug cargo run
//!
//! # Only the modal layer
//! RUST_LOG=account_manager::modal=debug cargo run
//! ```
//!
//! A successful delete at `info` looks like:
//!
//! ```text
//! INFO handle: Modal opened intent="delete" variant=Delete
//! INFO handle: Submitting intent="delete" variant=Delete
//! INFO Deleted entity_type="Account" id=001 size=0
//! INFO handle: Mutation succeeded intent="delete" variant=Delete
//! INFO handle: Modal resolved intent="delete" outcome=Success
//! INFO handle:invalidate: Record list loaded intent="delete" rows=0
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
