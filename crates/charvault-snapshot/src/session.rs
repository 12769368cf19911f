//! Review sessions.
//!
//! A session is an explicit object, one per document under review. Several
//! sessions (e.g. for different characters) never share state.

use crate::catalog::{CatalogState, SnapshotCatalog};
use crate::document::{CharacterDocument, SectionId};
use crate::error::{SnapshotError, SnapshotResult};
use crate::restore::{RestoreRequest, RestoreScope};
use crate::section::{compute_diff, DiffEntry};
use crate::snapshot::{Snapshot, SnapshotId};
use crate::store::SnapshotStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Observable outcome of the most recent restore.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RestoreStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(String),
}

struct SessionInner {
    catalog: SnapshotCatalog,
    restore: RestoreStatus,
}

/// Transient state from "a snapshot is selected" until the restore
/// completes or the session is closed.
pub struct ReviewSession {
    document_id: String,
    /// Section open in the surrounding editor; gates scoped restore.
    active_section: Option<SectionId>,
    inner: Mutex<SessionInner>,
    restore_in_flight: AtomicBool,
}

impl ReviewSession {
    /// Create a closed session.
    pub fn new(document_id: impl Into<String>, active_section: Option<SectionId>) -> Self {
        Self {
            document_id: document_id.into(),
            active_section,
            inner: Mutex::new(SessionInner {
                catalog: SnapshotCatalog::new(),
                restore: RestoreStatus::Idle,
            }),
            restore_in_flight: AtomicBool::new(false),
        }
    }

    /// Create a session and load its snapshots.
    pub async fn open(
        store: &dyn SnapshotStore,
        document_id: impl Into<String>,
        active_section: Option<SectionId>,
    ) -> SnapshotResult<Arc<Self>> {
        let session = Self::new(document_id, active_section);
        session.load(store).await?;
        Ok(Arc::new(session))
    }

    /// Load (or reload) the snapshot list. The newest snapshot is selected.
    ///
    /// Fails with [`SnapshotError::ConcurrentRestore`] while a restore is in
    /// flight, so its outcome is not reset underneath it.
    pub async fn load(&self, store: &dyn SnapshotStore) -> SnapshotResult<()> {
        if self.is_restoring() {
            return Err(SnapshotError::ConcurrentRestore);
        }
        {
            let mut inner = self.lock();
            inner.catalog.begin_loading();
            inner.restore = RestoreStatus::Idle;
        }

        match store.list_snapshots(&self.document_id).await {
            Ok(snapshots) => {
                self.lock().catalog.finish_loading(snapshots);
                info!(document_id = %self.document_id, "Review session opened");
                Ok(())
            }
            Err(e) => {
                self.lock().catalog.close();
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn active_section(&self) -> Option<SectionId> {
        self.active_section
    }

    pub fn state(&self) -> CatalogState {
        self.lock().catalog.state()
    }

    pub fn is_open(&self) -> bool {
        self.state() == CatalogState::Ready
    }

    /// Snapshots, newest first.
    pub fn snapshots(&self) -> Vec<Arc<Snapshot>> {
        self.lock().catalog.snapshots().to_vec()
    }

    /// Change which snapshot is shown.
    pub fn select(&self, id: &SnapshotId) -> SnapshotResult<()> {
        self.lock().catalog.select(id)
    }

    pub fn selected(&self) -> Option<Arc<Snapshot>> {
        self.lock().catalog.selected()
    }

    /// A snapshot of this session by id.
    pub fn snapshot(&self, id: &SnapshotId) -> SnapshotResult<Arc<Snapshot>> {
        self.lock().catalog.get(id)
    }

    /// Diff the selected snapshot against the live document. Empty when
    /// there is nothing to select.
    pub fn diff(&self, live: &CharacterDocument) -> SnapshotResult<Vec<DiffEntry>> {
        let selected = {
            let inner = self.lock();
            if !inner.catalog.is_ready() {
                return Err(SnapshotError::SessionClosed);
            }
            inner.catalog.selected()
        };

        Ok(selected
            .map(|snapshot| compute_diff(&snapshot, live))
            .unwrap_or_default())
    }

    /// Diff a specific snapshot against the live document.
    pub fn diff_snapshot(
        &self,
        id: &SnapshotId,
        live: &CharacterDocument,
    ) -> SnapshotResult<Vec<DiffEntry>> {
        let snapshot = self.snapshot(id)?;
        Ok(compute_diff(&snapshot, live))
    }

    /// Prepare a restore for confirmation. Nothing is written until the
    /// returned request is confirmed and handed to the restore controller.
    pub fn request_restore(
        &self,
        snapshot_id: &SnapshotId,
        scope: RestoreScope,
    ) -> SnapshotResult<RestoreRequest> {
        let snapshot = self.snapshot(snapshot_id)?;
        self.check_scope(scope)?;
        Ok(RestoreRequest::new(&snapshot, scope))
    }

    /// Scoped restore is limited to the section open in the editor.
    pub(crate) fn check_scope(&self, scope: RestoreScope) -> SnapshotResult<()> {
        match scope {
            RestoreScope::Whole => Ok(()),
            RestoreScope::Section(id) if self.active_section == Some(id) => Ok(()),
            RestoreScope::Section(id) => Err(SnapshotError::SectionNotActive { requested: id }),
        }
    }

    /// End the session. Selection and snapshots are dropped.
    pub fn close(&self) {
        self.lock().catalog.close();
        debug!(document_id = %self.document_id, "Review session closed");
    }

    pub fn restore_status(&self) -> RestoreStatus {
        self.lock().restore.clone()
    }

    pub(crate) fn set_restore_status(&self, status: RestoreStatus) {
        self.lock().restore = status;
    }

    /// Claim the single restore slot of this session.
    pub(crate) fn claim_restore(&self) -> SnapshotResult<RestoreSlot<'_>> {
        self.restore_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SnapshotError::ConcurrentRestore)?;
        Ok(RestoreSlot { session: self })
    }

    pub fn is_restoring(&self) -> bool {
        self.restore_in_flight.load(Ordering::Acquire)
    }
}

/// Held for the duration of one restore; frees the slot on drop.
pub(crate) struct RestoreSlot<'a> {
    session: &'a ReviewSession,
}

impl Drop for RestoreSlot<'_> {
    fn drop(&mut self) {
        self.session.restore_in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SectionValue;
    use crate::snapshot::SnapshotSource;
    use crate::store::StorageBackend;
    use charvault_storage::MemoryStorage;

    async fn backend_with_snapshots(
        doc: &CharacterDocument,
        n: usize,
    ) -> StorageBackend<MemoryStorage> {
        let backend = StorageBackend::new(MemoryStorage::new());
        for _ in 0..n {
            backend
                .append(&Snapshot::capture(doc, SnapshotSource::Autosave))
                .await
                .unwrap();
        }
        backend
    }

    #[tokio::test]
    async fn test_open_selects_newest() {
        let doc = CharacterDocument::new("Aldric");
        let backend = backend_with_snapshots(&doc, 3).await;

        let session = ReviewSession::open(&backend, doc.id.clone(), None).await.unwrap();
        assert!(session.is_open());
        assert_eq!(session.snapshots().len(), 3);
        assert_eq!(
            session.selected().unwrap().id(),
            session.snapshots()[0].id()
        );
    }

    #[tokio::test]
    async fn test_open_without_snapshots() {
        let doc = CharacterDocument::new("Aldric");
        let backend = backend_with_snapshots(&doc, 0).await;

        let session = ReviewSession::open(&backend, doc.id.clone(), None).await.unwrap();
        assert!(session.is_open());
        assert!(session.selected().is_none());
        assert!(session.diff(&doc).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let aldric = CharacterDocument::new("Aldric");
        let mira = CharacterDocument::new("Mira");
        let backend = backend_with_snapshots(&aldric, 2).await;
        backend
            .append(&Snapshot::capture(&mira, SnapshotSource::Manual))
            .await
            .unwrap();

        let a = ReviewSession::open(&backend, aldric.id.clone(), None).await.unwrap();
        let b = ReviewSession::open(&backend, mira.id.clone(), None).await.unwrap();

        let older = a.snapshots()[1].id().clone();
        a.select(&older).unwrap();
        b.close();

        assert_eq!(a.selected().unwrap().id(), &older);
        assert!(a.is_open());
        assert!(!b.is_open());
        assert_eq!(a.snapshots().len(), 2);
    }

    #[tokio::test]
    async fn test_diff_requires_open_session() {
        let doc = CharacterDocument::new("Aldric");
        let session = ReviewSession::new(doc.id.clone(), None);
        assert!(matches!(session.diff(&doc), Err(SnapshotError::SessionClosed)));
    }

    #[tokio::test]
    async fn test_diff_uses_selection() {
        let mut doc = CharacterDocument::new("Aldric");
        let backend = backend_with_snapshots(&doc, 1).await;
        doc.set_section(SectionId::Scenario, SectionValue::text("A siege."));

        let session = ReviewSession::open(&backend, doc.id.clone(), None).await.unwrap();
        let entries = session.diff(&doc).unwrap();
        let changed: Vec<SectionId> = entries
            .iter()
            .filter(|e| e.changed)
            .map(|e| e.section)
            .collect();
        assert_eq!(changed, vec![SectionId::Scenario]);

        let missing = session.diff_snapshot(&SnapshotId::from_string("snp_gone"), &doc);
        assert!(matches!(missing, Err(SnapshotError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_request_restore_checks_scope() {
        let doc = CharacterDocument::new("Aldric");
        let backend = backend_with_snapshots(&doc, 1).await;
        let session = ReviewSession::open(&backend, doc.id.clone(), Some(SectionId::Description))
            .await
            .unwrap();
        let id = session.snapshots()[0].id().clone();

        assert!(session.request_restore(&id, RestoreScope::Whole).is_ok());
        assert!(session
            .request_restore(&id, RestoreScope::Section(SectionId::Description))
            .is_ok());
        let err = session
            .request_restore(&id, RestoreScope::Section(SectionId::Image))
            .unwrap_err();
        assert!(matches!(err, SnapshotError::SectionNotActive { requested: SectionId::Image }));
    }

    #[test]
    fn test_restore_slot_is_exclusive_and_released() {
        let session = ReviewSession::new("chr_1", None);
        let slot = session.claim_restore().unwrap();
        assert!(session.is_restoring());
        assert!(matches!(session.claim_restore(), Err(SnapshotError::ConcurrentRestore)));
        drop(slot);
        assert!(!session.is_restoring());
        assert!(session.claim_restore().is_ok());
    }

    #[tokio::test]
    async fn test_reload_rejected_during_restore() {
        let doc = CharacterDocument::new("Aldric");
        let backend = backend_with_snapshots(&doc, 2).await;
        let session = ReviewSession::open(&backend, doc.id.clone(), None).await.unwrap();
        session.set_restore_status(RestoreStatus::InFlight);

        let slot = session.claim_restore().unwrap();
        let err = session.load(&backend).await.unwrap_err();
        assert!(matches!(err, SnapshotError::ConcurrentRestore));
        assert_eq!(session.restore_status(), RestoreStatus::InFlight);
        assert!(session.is_open());

        drop(slot);
        session.load(&backend).await.unwrap();
        assert_eq!(session.restore_status(), RestoreStatus::Idle);
    }
}
