//! Device persistence collaborator interface.
//!
//! The stores treat device storage as an async key-value service over UTF-8
//! text (JSON payloads). The mobile shells provide the real implementation;
//! this module defines the consumed trait, its error type, and an in-memory
//! implementation used by tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;

/// Storage key for the persisted cart snapshot (JSON array of line items).
pub const CART_ITEMS_KEY: &str = "cartItems";

/// Errors that can occur when talking to device storage.
///
/// All of these are non-fatal to the stores: the cart keeps operating on its
/// in-memory state and retries persistence on the next mutation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading a key failed.
    #[error("storage read failed: {0}")]
    Read(String),

    /// Writing a key failed.
    #[error("storage write failed: {0}")]
    Write(String),

    /// A stored payload exists but is not valid JSON for the expected shape.
    #[error("stored payload is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Async key-value storage consumed by the stores.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key` if present.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory [`KeyValueStorage`] backed by a `HashMap`.
///
/// Suitable as a test double and for sessions that do not need durable
/// storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("missing").await.unwrap(), None);

        storage.set("k", "v1").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v1"));

        storage.set("k", "v2").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v2"));

        storage.remove("k").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), None);
    }
}
