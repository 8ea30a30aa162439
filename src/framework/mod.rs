//! Generic actor framework backing the in-memory record store.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that stored record types implement
//! - [`ResourceActor`] - Actor that owns the store and serializes every request
//! - [`ResourceClient`] - Cloneable handle for sending requests
//! - [`FrameworkError`] - Channel failures and entity rejections
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning full actors.

pub mod core;
pub mod mock;

// Re-export core types for convenience
pub use core::*;
