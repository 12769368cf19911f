//! Storage layer for charvault.
//!
//! A key-value abstraction over JSON values with two backends:
//! - JSON file storage, one file per key
//! - In-memory storage (for tests and throwaway sessions)

pub mod error;
pub mod json;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use json::JsonStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// A trait for key-value storage backends.
///
/// Keys are path segments, e.g. `["snapshot", "chr_01h...", "snp_01h..."]`.
/// Values are serialized as JSON. A single `write` either lands in full or
/// leaves the previous value in place.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read a value from storage.
    ///
    /// Returns `None` if the key doesn't exist.
    async fn read<T: DeserializeOwned + Send>(&self, key: &[&str]) -> StorageResult<Option<T>>;

    /// Write a value to storage, replacing any previous value.
    async fn write<T: Serialize + Send + Sync>(&self, key: &[&str], value: &T)
        -> StorageResult<()>;

    /// Remove a value from storage. Removing a missing key is not an error.
    async fn remove(&self, key: &[&str]) -> StorageResult<()>;

    /// List the direct children of a prefix as full key paths.
    async fn list(&self, prefix: &[&str]) -> StorageResult<Vec<Vec<String>>>;

    /// Check if a key exists.
    async fn exists(&self, key: &[&str]) -> StorageResult<bool>;
}

/// Reject key components that could escape the storage namespace.
pub(crate) fn validate_key(key: &[&str]) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::invalid_key("Key cannot be empty"));
    }

    for component in key {
        if component.is_empty()
            || component.contains('/')
            || component.contains('\\')
            || *component == "."
            || *component == ".."
        {
            return Err(StorageError::invalid_key(format!(
                "Invalid key component: {}",
                component
            )));
        }
    }

    Ok(())
}
