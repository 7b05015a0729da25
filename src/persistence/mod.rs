//! Local persistence
//!
//! A tiny key-value layer for the best score and the last-used display name.
//! Failures are never fatal: reads fall back to defaults and writes are
//! logged and dropped.

pub mod profile;
pub mod store;

pub use profile::Profile;
pub use store::{KeyValueStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use store::LocalStore;
