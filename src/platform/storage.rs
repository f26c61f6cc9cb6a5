//! Key-value storage backends

use std::collections::HashMap;

use thiserror::Error;

/// Storage failure. Callers log these and carry on in memory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Minimal string key-value store
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    /// Simulate a full or blocked backend
    pub fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a value (e.g. corrupt save data)
    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Write("quota exceeded".to_string()));
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable, progress will not persist");
        }
        Self { inner }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = self.inner.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|e| StorageError::Read(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.inner.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }
}
