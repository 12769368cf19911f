//! Snapshot error types.

use crate::document::SectionId;
use charvault_storage::StorageError;
use thiserror::Error;

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors that can occur while reviewing or restoring snapshots.
///
/// None of these are fatal: the review session stays usable after any of
/// them.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot not found in the catalog or the store.
    #[error("Snapshot not found: {0}")]
    NotFound(String),

    /// A snapshot with this id is already stored.
    #[error("Snapshot already exists: {0}")]
    AlreadyExists(String),

    /// Character document not found.
    #[error("Character not found: {0}")]
    DocumentNotFound(String),

    /// The review session is not open (or still loading).
    #[error("Review session is not open")]
    SessionClosed,

    /// Scoped restore of a section other than the one open in the editor.
    #[error("Section {requested} is not the active section")]
    SectionNotActive { requested: SectionId },

    /// A restore is already in flight for this session.
    #[error("A restore is already in progress")]
    ConcurrentRestore,

    /// The reconstructed document failed validation.
    #[error("Restored document is invalid: {0}")]
    Validation(String),

    /// The persistence write during restore failed.
    #[error("Failed to write restored document: {0}")]
    RestoreWrite(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SnapshotError {
    /// Create a not found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error came out of the restore write path. The live
    /// document is unchanged whenever this returns true.
    pub fn is_restore_failure(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::RestoreWrite(_))
    }
}
