//! Command handlers for the charvault CLI.

pub mod character;
pub mod diff;
pub mod restore;
pub mod snapshot;

pub use character::*;
pub use diff::*;
pub use restore::*;
pub use snapshot::*;

use charvault_snapshot::StorageBackend;
use charvault_storage::JsonStorage;
use std::path::Path;

/// Store over the data directory. Read-only stores reject every write.
pub fn open_store(data_dir: &Path, read_only: bool) -> StorageBackend<JsonStorage> {
    let storage = if read_only {
        JsonStorage::read_only(data_dir)
    } else {
        JsonStorage::new(data_dir)
    };
    StorageBackend::new(storage)
}
