//! Ordered snapshots of one document and the current selection.

use crate::error::{SnapshotError, SnapshotResult};
use crate::snapshot::{Snapshot, SnapshotId};
use std::sync::Arc;
use tracing::debug;

/// Lifecycle of a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    Closed,
    Loading,
    Ready,
}

/// Snapshots available for review, newest first, plus which one is shown.
///
/// Selecting never touches a snapshot or the live document.
#[derive(Debug)]
pub struct SnapshotCatalog {
    state: CatalogState,
    snapshots: Vec<Arc<Snapshot>>,
    selected: Option<SnapshotId>,
}

impl Default for SnapshotCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotCatalog {
    /// A closed, empty catalog.
    pub fn new() -> Self {
        Self {
            state: CatalogState::Closed,
            snapshots: Vec::new(),
            selected: None,
        }
    }

    pub fn state(&self) -> CatalogState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == CatalogState::Ready
    }

    /// Enter `Loading`, dropping anything held from a previous session.
    pub fn begin_loading(&mut self) {
        self.snapshots.clear();
        self.selected = None;
        self.state = CatalogState::Loading;
    }

    /// Enter `Ready` with the given snapshots and select the newest.
    ///
    /// Snapshots are ordered by creation time, newest first; equal times keep
    /// the order they were given in.
    pub fn finish_loading(&mut self, snapshots: Vec<Snapshot>) {
        let mut snapshots: Vec<Arc<Snapshot>> = snapshots.into_iter().map(Arc::new).collect();
        snapshots.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        self.selected = snapshots.first().map(|s| s.id().clone());
        self.snapshots = snapshots;
        self.state = CatalogState::Ready;
        debug!(
            count = self.snapshots.len(),
            selected = ?self.selected,
            "Snapshot catalog ready"
        );
    }

    /// Return to `Closed`. The selection is not remembered.
    pub fn close(&mut self) {
        self.snapshots.clear();
        self.selected = None;
        self.state = CatalogState::Closed;
    }

    /// Snapshots, newest first.
    pub fn snapshots(&self) -> &[Arc<Snapshot>] {
        &self.snapshots
    }

    /// Look up a snapshot by id.
    pub fn get(&self, id: &SnapshotId) -> SnapshotResult<Arc<Snapshot>> {
        if !self.is_ready() {
            return Err(SnapshotError::SessionClosed);
        }
        self.snapshots
            .iter()
            .find(|s| s.id() == id)
            .cloned()
            .ok_or_else(|| SnapshotError::not_found(id.as_str()))
    }

    /// Change which snapshot is shown.
    pub fn select(&mut self, id: &SnapshotId) -> SnapshotResult<()> {
        let snapshot = self.get(id)?;
        debug!(snapshot_id = %snapshot.id(), "Selected snapshot");
        self.selected = Some(snapshot.id().clone());
        Ok(())
    }

    pub fn selected_id(&self) -> Option<&SnapshotId> {
        self.selected.as_ref()
    }

    /// The selected snapshot, if any.
    pub fn selected(&self) -> Option<Arc<Snapshot>> {
        let id = self.selected.as_ref()?;
        self.snapshots.iter().find(|s| s.id() == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::CharacterDocument;
    use crate::snapshot::SnapshotSource;
    use chrono::{Duration, TimeZone, Utc};

    fn snapshots() -> Vec<Snapshot> {
        let doc = CharacterDocument::new("Aldric");
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        vec![
            Snapshot::capture_at(&doc, SnapshotSource::Manual, t0),
            Snapshot::capture_at(&doc, SnapshotSource::Autosave, t0 + Duration::hours(2)),
            Snapshot::capture_at(&doc, SnapshotSource::PreAiEdit, t0 + Duration::hours(1)),
        ]
    }

    #[test]
    fn test_starts_closed() {
        let catalog = SnapshotCatalog::new();
        assert_eq!(catalog.state(), CatalogState::Closed);
        assert!(catalog.selected().is_none());
    }

    #[test]
    fn test_ready_selects_newest() {
        let input = snapshots();
        let newest = input[1].id().clone();

        let mut catalog = SnapshotCatalog::new();
        catalog.begin_loading();
        assert_eq!(catalog.state(), CatalogState::Loading);
        catalog.finish_loading(input);

        assert!(catalog.is_ready());
        assert_eq!(catalog.selected_id(), Some(&newest));
        let sources: Vec<SnapshotSource> = catalog.snapshots().iter().map(|s| s.source()).collect();
        assert_eq!(
            sources,
            vec![SnapshotSource::Autosave, SnapshotSource::PreAiEdit, SnapshotSource::Manual]
        );
    }

    #[test]
    fn test_empty_catalog_has_no_selection() {
        let mut catalog = SnapshotCatalog::new();
        catalog.begin_loading();
        catalog.finish_loading(Vec::new());
        assert!(catalog.is_ready());
        assert!(catalog.selected().is_none());
    }

    #[test]
    fn test_select_and_unknown_id() {
        let input = snapshots();
        let oldest = input[0].id().clone();
        let mut catalog = SnapshotCatalog::new();
        catalog.begin_loading();
        catalog.finish_loading(input);

        catalog.select(&oldest).unwrap();
        assert_eq!(catalog.selected().unwrap().id(), &oldest);

        let err = catalog.select(&SnapshotId::from_string("snp_nope")).unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound(_)));
        // Failed selection keeps the previous one.
        assert_eq!(catalog.selected_id(), Some(&oldest));
    }

    #[test]
    fn test_close_forgets_selection() {
        let mut catalog = SnapshotCatalog::new();
        catalog.begin_loading();
        catalog.finish_loading(snapshots());
        catalog.close();

        assert_eq!(catalog.state(), CatalogState::Closed);
        assert!(catalog.snapshots().is_empty());
        assert!(catalog.selected_id().is_none());
        assert!(matches!(
            catalog.get(&SnapshotId::from_string("snp_x")),
            Err(SnapshotError::SessionClosed)
        ));
    }
}
