//! # Account Manager
//!
//! > **A record-management page for `Account` records, built from small actors.**
//!
//! The page lists accounts and lets the user create, update or delete one through a modal.
//! Every mutation goes through an opaque [`RecordService`](clients::RecordService) and reports
//! back with a numeric status; after a success the list is re-fetched.
//!
//! ## 🏗️ How the pieces talk
//!
//! ```text
//! RecordTable ──TableEvent──▶ AccountOrchestrator ──spawn──▶ ModalWorkflow
//!                                  │    ▲                       │   ▲
//!                      invalidate  │    └─── ModalOutcome ──────┘   │ DataUpdated
//!                                  ▼                                 │
//!                        RecordSubscription               AccountInfoEditor
//!                                  │
//!                                  ▼
//!                            RecordService (AccountClient ──▶ ResourceActor<Account>)
//! ```
//!
//! - Intent flows down: orchestrator → modal → service.
//! - Results flow up: service envelope → [`ModalOutcome`](model::ModalOutcome) → notification.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Status codes, not errors
//! A rejected mutation is a `500` [`ResultEnvelope`](model::ResultEnvelope), never an `Err`.
//! Only transport faults ([`ServiceError`](clients::ServiceError)) are errors, and they stay
//! distinct from business failures all the way up.
//!
//! ### 2. Modals are tasks
//! Each [`ModalWorkflow`](modal::ModalWorkflow) runs in its own Tokio task and resolves a
//! oneshot exactly once. The UI drives it through a cloneable
//! [`ModalController`](modal::ModalController); dropping every controller cancels it.
//!
//! ### 3. One writer, many readers
//! The list lives in a `tokio::sync::watch` channel. Only
//! [`invalidate`](orchestrator::RecordSubscription::invalidate) writes it.
//!
//! ### 4. Observability
//! `tracing` everywhere with structured fields. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! - [`framework`]: generic `ResourceActor<T>` store and its mock
//! - [`account_actor`]: the `Account` entity rules and id generation
//! - [`clients`]: the `RecordService` contract and the actor-backed client
//! - [`model`]: records, envelopes, outcomes, notifications, list views
//! - [`editor`], [`table`]: presentation glue
//! - [`modal`]: create/update/delete workflows
//! - [`orchestrator`]: the page root
//! - [`lifecycle`]: settings, tracing and [`AccountSystem`](lifecycle::AccountSystem)
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod account_actor;
pub mod clients;
pub mod editor;
pub mod framework;
pub mod lifecycle;
pub mod modal;
pub mod model;
pub mod orchestrator;
pub mod table;
