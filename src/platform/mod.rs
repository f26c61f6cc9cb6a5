//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod storage;

pub use storage::{MemoryStorage, Storage, StorageError};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
