//! RAII-based timing for operations that may stall on storage.
//!
//! # Example
//!
//! ```rust,ignore
//! use charvault_util::timing::TimingGuard;
//!
//! async fn commit(doc: &CharacterDocument) {
//!     let _timing = TimingGuard::restore(&doc.id);
//!     // ... persistence write ...
//!     // Duration is logged when _timing is dropped
//! }
//! ```

use std::time::Instant;
use tracing::{debug, info, warn, Level};

/// RAII guard that measures and logs the duration of an operation.
pub struct TimingGuard {
    /// Type of operation (e.g., "restore", "capture")
    operation_type: &'static str,
    /// Subject of the operation, usually a document id
    operation_name: String,
    start: Instant,
    /// Minimum duration to log at info level (below this uses debug)
    info_threshold_ms: u64,
    /// Minimum duration to log at warn level
    warn_threshold_ms: u64,
}

impl TimingGuard {
    /// Create a new timing guard.
    pub fn new(operation_type: &'static str, operation_name: impl Into<String>) -> Self {
        let operation_name = operation_name.into();
        debug!(
            operation_type = operation_type,
            operation_name = %operation_name,
            "Starting operation"
        );
        Self {
            operation_type,
            operation_name,
            start: Instant::now(),
            info_threshold_ms: 100,
            warn_threshold_ms: 5000,
        }
    }

    /// Create a timing guard for a restore commit.
    pub fn restore(document_id: impl Into<String>) -> Self {
        Self::new("restore", document_id)
    }

    /// Create a timing guard for a snapshot capture.
    pub fn capture(document_id: impl Into<String>) -> Self {
        Self::new("capture", document_id)
    }

    /// Level a completed operation is logged at.
    fn level_for(&self, duration_ms: u64) -> Level {
        if duration_ms >= self.warn_threshold_ms {
            Level::WARN
        } else if duration_ms >= self.info_threshold_ms {
            Level::INFO
        } else {
            Level::DEBUG
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let duration_ms = self.start.elapsed().as_millis() as u64;

        let level = self.level_for(duration_ms);

        if level == Level::WARN {
            warn!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration_ms,
                "Slow operation completed"
            );
        } else if level == Level::INFO {
            info!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration_ms,
                "Operation completed"
            );
        } else {
            debug!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration_ms,
                "Operation completed"
            );
        }
    }
}
