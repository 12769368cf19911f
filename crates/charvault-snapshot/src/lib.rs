//! Character snapshots for charvault.
//!
//! This crate reviews earlier versions of a character against its live
//! state and restores them:
//! - Snapshot capture and a persistent snapshot store
//! - Per-section normalization and line/segment diffs
//! - Review sessions with selection and collapsed previews
//! - Confirmed whole-document or single-section restore, written atomically

pub mod catalog;
pub mod config;
pub mod diff;
pub mod document;
pub mod error;
pub mod normalize;
pub mod preview;
pub mod restore;
pub mod section;
pub mod session;
pub mod snapshot;
pub mod store;

pub use catalog::{CatalogState, SnapshotCatalog};
pub use config::ReviewConfig;
pub use diff::{diff_lines, diff_segments, join_segments, line_count, DiffSegment, LineDiff};
pub use document::{CharacterDocument, SectionId, SectionKind, SectionValue};
pub use error::{SnapshotError, SnapshotResult};
pub use normalize::normalize;
pub use preview::{PreviewLimits, SectionPreview};
pub use restore::{apply_restore, ConfirmedRestore, RestoreController, RestoreRequest, RestoreScope};
pub use section::{changed_entries, compute_diff, DiffEntry, LinePair};
pub use session::{RestoreStatus, ReviewSession};
pub use snapshot::{Snapshot, SnapshotId, SnapshotSource};
pub use store::{capture_snapshot, DocumentStore, SnapshotStore, StorageBackend};
