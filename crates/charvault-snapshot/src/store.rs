//! Persistence contracts for snapshots and live documents, plus a
//! storage-backed implementation of both.

use crate::document::CharacterDocument;
use crate::error::{SnapshotError, SnapshotResult};
use crate::snapshot::{Snapshot, SnapshotId, SnapshotSource};
use async_trait::async_trait;
use charvault_storage::Storage;
use charvault_util::TimingGuard;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Source of snapshots for a review session.
///
/// Retention (how many snapshots are kept, when old ones go) belongs to the
/// implementation; the review core never deletes snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// All snapshots of a document, newest first. Snapshots with equal
    /// timestamps are listed most recently appended first.
    async fn list_snapshots(&self, document_id: &str) -> SnapshotResult<Vec<Snapshot>>;

    /// A single snapshot by id.
    async fn get_snapshot(&self, id: &SnapshotId) -> SnapshotResult<Snapshot>;

    /// Record a new snapshot. Existing snapshots are never overwritten.
    async fn append(&self, snapshot: &Snapshot) -> SnapshotResult<()>;
}

/// Owner of the live documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the current state of a document.
    async fn load(&self, document_id: &str) -> SnapshotResult<CharacterDocument>;

    /// Replace a document in one write. On error the stored document is
    /// left as it was.
    async fn save(&self, document: &CharacterDocument) -> SnapshotResult<()>;
}

/// Snapshot and document store over a key-value [`Storage`].
///
/// Layout:
/// ```text
/// character/<document_id>               # live document
/// snapshot/<document_id>/<snapshot_id>  # one file per snapshot
/// snapshot_index/<document_id>          # snapshot ids in append order
/// snapshot_owner/<snapshot_id>          # document id, for lookup by id
/// ```
///
/// Appends to one document are serialized so the index read-modify-write
/// never drops a concurrent entry.
pub struct StorageBackend<S> {
    storage: S,
    append_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S: Storage> StorageBackend<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            append_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    async fn index(&self, document_id: &str) -> SnapshotResult<Vec<SnapshotId>> {
        Ok(self
            .storage
            .read(&["snapshot_index", document_id])
            .await?
            .unwrap_or_default())
    }

    fn append_lock(&self, document_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .append_locks
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        locks.entry(document_id.to_string()).or_default().clone()
    }
}

#[async_trait]
impl<S: Storage> SnapshotStore for StorageBackend<S> {
    async fn list_snapshots(&self, document_id: &str) -> SnapshotResult<Vec<Snapshot>> {
        let index = self.index(document_id).await?;
        let mut snapshots = Vec::with_capacity(index.len());

        // Newest appended first, so the stable sort below breaks timestamp
        // ties by insertion order.
        for id in index.iter().rev() {
            match self
                .storage
                .read::<Snapshot>(&["snapshot", document_id, id.as_str()])
                .await
            {
                Ok(Some(snapshot)) => snapshots.push(snapshot),
                Ok(None) => warn!(snapshot_id = %id, "Indexed snapshot is missing"),
                Err(e) => warn!(snapshot_id = %id, error = %e, "Failed to load snapshot"),
            }
        }

        snapshots.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        debug!(document_id, count = snapshots.len(), "Listed snapshots");
        Ok(snapshots)
    }

    async fn get_snapshot(&self, id: &SnapshotId) -> SnapshotResult<Snapshot> {
        let owner: Option<String> = self.storage.read(&["snapshot_owner", id.as_str()]).await?;
        let Some(document_id) = owner else {
            return Err(SnapshotError::not_found(id.as_str()));
        };

        self.storage
            .read(&["snapshot", document_id.as_str(), id.as_str()])
            .await?
            .ok_or_else(|| SnapshotError::not_found(id.as_str()))
    }

    async fn append(&self, snapshot: &Snapshot) -> SnapshotResult<()> {
        let document_id = snapshot.document_id();
        let id = snapshot.id();

        let lock = self.append_lock(document_id);
        let _guard = lock.lock().await;

        if self.storage.exists(&["snapshot_owner", id.as_str()]).await? {
            return Err(SnapshotError::AlreadyExists(id.to_string()));
        }

        self.storage
            .write(&["snapshot", document_id, id.as_str()], snapshot)
            .await?;
        self.storage
            .write(&["snapshot_owner", id.as_str()], &document_id)
            .await?;

        // Index last: a listed id always has its snapshot on disk.
        let mut index = self.index(document_id).await?;
        index.push(id.clone());
        self.storage
            .write(&["snapshot_index", document_id], &index)
            .await?;

        info!(
            snapshot_id = %id,
            document_id,
            source = snapshot.source().as_str(),
            "Stored snapshot"
        );
        Ok(())
    }
}

#[async_trait]
impl<S: Storage> DocumentStore for StorageBackend<S> {
    async fn load(&self, document_id: &str) -> SnapshotResult<CharacterDocument> {
        self.storage
            .read(&["character", document_id])
            .await?
            .ok_or_else(|| SnapshotError::DocumentNotFound(document_id.to_string()))
    }

    async fn save(&self, document: &CharacterDocument) -> SnapshotResult<()> {
        self.storage
            .write(&["character", document.id.as_str()], document)
            .await?;
        debug!(document_id = %document.id, "Saved character");
        Ok(())
    }
}

/// Capture the current state of a document into the snapshot store.
pub async fn capture_snapshot(
    documents: &dyn DocumentStore,
    snapshots: &dyn SnapshotStore,
    document_id: &str,
    source: SnapshotSource,
    label: Option<String>,
) -> SnapshotResult<Snapshot> {
    let _timing = TimingGuard::capture(document_id);

    let document = documents.load(document_id).await?;
    let mut snapshot = Snapshot::capture(&document, source);
    if let Some(label) = label {
        snapshot = snapshot.with_label(label);
    }

    snapshots.append(&snapshot).await?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{SectionId, SectionValue};
    use charvault_storage::{JsonStorage, MemoryStorage};
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    fn aldric() -> CharacterDocument {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        CharacterDocument::with_id("chr_aldric", created)
            .with_section(SectionId::Name, SectionValue::text("Aldric"))
    }

    #[tokio::test]
    async fn test_save_and_load_document() {
        let backend = StorageBackend::new(MemoryStorage::new());
        backend.save(&aldric()).await.unwrap();

        let loaded = backend.load("chr_aldric").await.unwrap();
        assert_eq!(loaded, aldric());

        let missing = backend.load("chr_nobody").await;
        assert!(matches!(missing, Err(SnapshotError::DocumentNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_newest_first_with_insertion_tiebreak() {
        let backend = StorageBackend::new(MemoryStorage::new());
        let doc = aldric();
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let oldest = Snapshot::capture_at(&doc, SnapshotSource::Manual, t0);
        let t1 = t0 + Duration::minutes(5);
        let tie_first = Snapshot::capture_at(&doc, SnapshotSource::Autosave, t1);
        let tie_second = Snapshot::capture_at(&doc, SnapshotSource::Autosave, t1);
        // Appended out of timestamp order on purpose.
        backend.append(&tie_first).await.unwrap();
        backend.append(&oldest).await.unwrap();
        backend.append(&tie_second).await.unwrap();

        let listed = backend.list_snapshots("chr_aldric").await.unwrap();
        let ids: Vec<&SnapshotId> = listed.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![tie_second.id(), tie_first.id(), oldest.id()]);
    }

    #[tokio::test]
    async fn test_get_snapshot_by_id() {
        let backend = StorageBackend::new(MemoryStorage::new());
        let snapshot = Snapshot::capture(&aldric(), SnapshotSource::Import);
        backend.append(&snapshot).await.unwrap();

        assert_eq!(backend.get_snapshot(snapshot.id()).await.unwrap(), snapshot);

        let missing = backend.get_snapshot(&SnapshotId::from_string("snp_missing")).await;
        assert!(matches!(missing, Err(SnapshotError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_append_never_overwrites() {
        let backend = StorageBackend::new(MemoryStorage::new());
        let snapshot = Snapshot::capture(&aldric(), SnapshotSource::Manual);
        backend.append(&snapshot).await.unwrap();

        let again = backend.append(&snapshot).await;
        assert!(matches!(again, Err(SnapshotError::AlreadyExists(_))));
        assert_eq!(backend.list_snapshots("chr_aldric").await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_are_all_listed() {
        let dir = tempdir().unwrap();
        let backend = StorageBackend::new(JsonStorage::new(dir.path()));
        let doc = aldric();

        let mut appended = Vec::new();
        for _ in 0..20 {
            let a = Snapshot::capture(&doc, SnapshotSource::Autosave);
            let b = Snapshot::capture(&doc, SnapshotSource::Manual);
            let (ra, rb) = tokio::join!(backend.append(&a), backend.append(&b));
            ra.unwrap();
            rb.unwrap();
            appended.push(a.id().clone());
            appended.push(b.id().clone());
        }

        let listed = backend.list_snapshots("chr_aldric").await.unwrap();
        assert_eq!(listed.len(), appended.len());
        for id in &appended {
            assert!(listed.iter().any(|s| s.id() == id), "{id} missing from list");
        }
    }

    #[tokio::test]
    async fn test_capture_copies_live_document() {
        let dir = tempdir().unwrap();
        let backend = StorageBackend::new(JsonStorage::new(dir.path()));
        backend.save(&aldric()).await.unwrap();

        let snapshot = capture_snapshot(
            &backend,
            &backend,
            "chr_aldric",
            SnapshotSource::PreAiEdit,
            Some("before rewrite".to_string()),
        )
        .await
        .unwrap();

        let mut live = backend.load("chr_aldric").await.unwrap();
        live.set_section(SectionId::Name, SectionValue::text("Ser Aldric"));
        backend.save(&live).await.unwrap();

        let stored = backend.get_snapshot(snapshot.id()).await.unwrap();
        assert_eq!(stored.document().name(), Some("Aldric"));
        assert_eq!(stored.label(), Some("before rewrite"));
        assert!(dir.path().join("snapshot_index/chr_aldric.json").exists());
    }

    #[tokio::test]
    async fn test_list_skips_missing_snapshot_files() {
        let backend = StorageBackend::new(MemoryStorage::new());
        let snapshot = Snapshot::capture(&aldric(), SnapshotSource::Manual);
        backend.append(&snapshot).await.unwrap();
        backend
            .storage()
            .remove(&["snapshot", "chr_aldric", snapshot.id().as_str()])
            .await
            .unwrap();

        assert!(backend.list_snapshots("chr_aldric").await.unwrap().is_empty());
    }
}
