//! Test doubles for the document store.

use async_trait::async_trait;
use charvault_snapshot::{CharacterDocument, DocumentStore, SnapshotError, SnapshotResult};
use charvault_storage::StorageError;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Pauses `save` until the test releases it.
///
/// `entered` fires when a save reaches the gate; the save proceeds once
/// `release` is called.
#[derive(Clone, Default)]
pub struct SaveGate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl SaveGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until a save is parked at the gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one parked save through.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// In-memory document store that records every save.
///
/// # Example
///
/// ```rust
/// use charvault_test_utils::{fixtures, mocks::RecordingDocumentStore};
///
/// let store = RecordingDocumentStore::new().with_document(fixtures::knight());
/// store.fail_saves("disk full");
/// assert_eq!(store.saved().len(), 0);
/// ```
#[derive(Clone, Default)]
pub struct RecordingDocumentStore {
    documents: Arc<Mutex<HashMap<String, CharacterDocument>>>,
    /// Documents persisted successfully, in order.
    saved: Arc<Mutex<Vec<CharacterDocument>>>,
    save_attempts: Arc<AtomicUsize>,
    /// When set, every save fails with this message.
    failure: Arc<Mutex<Option<String>>>,
    gate: Arc<Mutex<Option<SaveGate>>>,
}

impl RecordingDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document.
    pub fn with_document(self, document: CharacterDocument) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(document.id.clone(), document);
        self
    }

    /// Make every following save fail.
    pub fn fail_saves(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Let saves succeed again.
    pub fn heal(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Park every following save at a gate.
    pub fn gate_saves(&self) -> SaveGate {
        let gate = SaveGate::new();
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Current stored state of a document.
    pub fn document(&self, id: &str) -> Option<CharacterDocument> {
        self.documents.lock().unwrap().get(id).cloned()
    }

    /// Documents saved successfully, oldest first.
    pub fn saved(&self) -> Vec<CharacterDocument> {
        self.saved.lock().unwrap().clone()
    }

    /// Calls to `save`, successful or not.
    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for RecordingDocumentStore {
    async fn load(&self, document_id: &str) -> SnapshotResult<CharacterDocument> {
        self.document(document_id)
            .ok_or_else(|| SnapshotError::DocumentNotFound(document_id.to_string()))
    }

    async fn save(&self, document: &CharacterDocument) -> SnapshotResult<()> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let failure = self.failure.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(SnapshotError::Storage(StorageError::Io(io::Error::other(
                message,
            ))));
        }

        self.documents
            .lock()
            .unwrap()
            .insert(document.id.clone(), document.clone());
        self.saved.lock().unwrap().push(document.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{knight, knight_revised, KNIGHT_ID};

    #[tokio::test]
    async fn test_records_saves() {
        let store = RecordingDocumentStore::new().with_document(knight());
        store.save(&knight_revised()).await.unwrap();

        assert_eq!(store.save_attempts(), 1);
        assert_eq!(store.saved(), vec![knight_revised()]);
        assert_eq!(store.load(KNIGHT_ID).await.unwrap(), knight_revised());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_document() {
        let store = RecordingDocumentStore::new().with_document(knight());
        store.fail_saves("disk full");

        let err = store.save(&knight_revised()).await.unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert_eq!(store.document(KNIGHT_ID), Some(knight()));
        assert!(store.saved().is_empty());

        store.heal();
        store.save(&knight_revised()).await.unwrap();
        assert_eq!(store.saved().len(), 1);
    }

    #[tokio::test]
    async fn test_gate_parks_save() {
        let store = RecordingDocumentStore::new().with_document(knight());
        let gate = store.gate_saves();

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.save(&knight_revised()).await })
        };

        gate.entered().await;
        assert!(store.saved().is_empty());
        gate.release();
        task.await.unwrap().unwrap();
        assert_eq!(store.saved().len(), 1);
    }
}
