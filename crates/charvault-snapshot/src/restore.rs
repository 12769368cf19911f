//! Whole and section-scoped restore.
//!
//! A restore rebuilds the live document from a snapshot and persists it in a
//! single write. Nothing reaches the document store until the rebuilt
//! document has validated, so a failure at any step leaves the live document
//! exactly as it was.

use crate::document::{CharacterDocument, SectionId};
use crate::error::{SnapshotError, SnapshotResult};
use crate::session::{RestoreStatus, ReviewSession};
use crate::snapshot::{Snapshot, SnapshotId};
use crate::store::DocumentStore;
use charvault_util::TimingGuard;
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// What a restore overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreScope {
    /// Every section of the document.
    Whole,
    /// A single section; every other section keeps its live value.
    Section(SectionId),
}

impl fmt::Display for RestoreScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole => write!(f, "all sections"),
            Self::Section(id) => write!(f, "{}", id.label()),
        }
    }
}

/// A restore awaiting the user's confirmation.
#[derive(Debug, Clone)]
#[must_use = "a restore request does nothing until confirmed"]
pub struct RestoreRequest {
    snapshot_id: SnapshotId,
    scope: RestoreScope,
    summary: String,
}

impl RestoreRequest {
    pub(crate) fn new(snapshot: &Snapshot, scope: RestoreScope) -> Self {
        let mut summary = format!(
            "Replace {} with the {} snapshot from {}",
            scope,
            snapshot.source().label(),
            snapshot.created_at().format("%Y-%m-%d %H:%M"),
        );
        if let Some(label) = snapshot.label() {
            summary.push_str(&format!(" ({label})"));
        }

        Self {
            snapshot_id: snapshot.id().clone(),
            scope,
            summary,
        }
    }

    pub fn snapshot_id(&self) -> &SnapshotId {
        &self.snapshot_id
    }

    pub fn scope(&self) -> RestoreScope {
        self.scope
    }

    /// Text to show in the confirmation prompt.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// The user agreed. Only a confirmed restore can be executed.
    pub fn confirm(self) -> ConfirmedRestore {
        ConfirmedRestore {
            snapshot_id: self.snapshot_id,
            scope: self.scope,
        }
    }
}

/// A restore the user has confirmed.
#[derive(Debug, Clone)]
pub struct ConfirmedRestore {
    snapshot_id: SnapshotId,
    scope: RestoreScope,
}

impl ConfirmedRestore {
    pub fn snapshot_id(&self) -> &SnapshotId {
        &self.snapshot_id
    }

    pub fn scope(&self) -> RestoreScope {
        self.scope
    }
}

/// Build the document a restore would persist.
///
/// Identity fields (`id`, `created_at`) come from the live document;
/// `updated_at` is set to now.
pub fn apply_restore(
    live: &CharacterDocument,
    snapshot: &Snapshot,
    scope: RestoreScope,
) -> CharacterDocument {
    let source = snapshot.document();
    let mut restored = live.clone();

    match scope {
        RestoreScope::Whole => {
            for id in SectionId::ALL {
                restored.set_section(id, source.section(id).clone());
            }
        }
        RestoreScope::Section(id) => {
            restored.set_section(id, source.section(id).clone());
        }
    }

    restored.updated_at = Utc::now();
    restored
}

/// Executes confirmed restores against the document store.
pub struct RestoreController {
    documents: Arc<dyn DocumentStore>,
}

impl RestoreController {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Restore the session's document from a snapshot.
    ///
    /// On success the session is closed and the persisted document returned.
    /// On a validation or write failure the session stays open with its
    /// selection, and its status reports the failure.
    pub async fn restore(
        &self,
        session: &ReviewSession,
        confirmed: ConfirmedRestore,
    ) -> SnapshotResult<CharacterDocument> {
        let _slot = session.claim_restore()?;

        let snapshot = session.snapshot(&confirmed.snapshot_id)?;
        session.check_scope(confirmed.scope)?;

        session.set_restore_status(RestoreStatus::InFlight);
        match self.commit(session.document_id(), &snapshot, confirmed.scope).await {
            Ok(document) => {
                session.set_restore_status(RestoreStatus::Succeeded);
                session.close();
                info!(
                    document_id = %document.id,
                    snapshot_id = %snapshot.id(),
                    scope = %confirmed.scope,
                    "Restored character from snapshot"
                );
                Ok(document)
            }
            Err(e) => {
                warn!(
                    document_id = %session.document_id(),
                    snapshot_id = %snapshot.id(),
                    error = %e,
                    "Restore failed; live document unchanged"
                );
                session.set_restore_status(RestoreStatus::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn commit(
        &self,
        document_id: &str,
        snapshot: &Snapshot,
        scope: RestoreScope,
    ) -> SnapshotResult<CharacterDocument> {
        let _timing = TimingGuard::restore(document_id);

        if snapshot.document_id() != document_id {
            return Err(SnapshotError::validation(format!(
                "snapshot {} belongs to character {}",
                snapshot.id(),
                snapshot.document_id()
            )));
        }

        let live = self
            .documents
            .load(document_id)
            .await
            .map_err(into_write_failure)?;

        let restored = apply_restore(&live, snapshot, scope);
        restored.validate()?;

        self.documents
            .save(&restored)
            .await
            .map_err(into_write_failure)?;
        Ok(restored)
    }
}

fn into_write_failure(error: SnapshotError) -> SnapshotError {
    match error {
        SnapshotError::RestoreWrite(_) | SnapshotError::DocumentNotFound(_) => error,
        other => SnapshotError::RestoreWrite(other.to_string()),
    }
}
