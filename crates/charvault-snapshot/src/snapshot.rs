//! Snapshot data structures.

use crate::document::CharacterDocument;
use charvault_util::Identifier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    /// Create a new snapshot ID.
    pub fn new() -> Self {
        Self(Identifier::snapshot())
    }

    /// Create a snapshot ID from a string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a snapshot was taken. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    #[default]
    Manual,
    PreAiEdit,
    Autosave,
    Import,
}

impl SnapshotSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotSource::Manual => "manual",
            SnapshotSource::PreAiEdit => "pre_ai_edit",
            SnapshotSource::Autosave => "autosave",
            SnapshotSource::Import => "import",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SnapshotSource::Manual => "Manual checkpoint",
            SnapshotSource::PreAiEdit => "Before AI edit",
            SnapshotSource::Autosave => "Autosave",
            SnapshotSource::Import => "Import",
        }
    }
}

/// An immutable copy of a character at one point in time.
///
/// Fields are private: once captured, nothing can mutate the copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    id: SnapshotId,
    created_at: DateTime<Utc>,
    source: SnapshotSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    document: CharacterDocument,
}

impl Snapshot {
    /// Capture the current state of a document.
    pub fn capture(document: &CharacterDocument, source: SnapshotSource) -> Self {
        Self::capture_at(document, source, Utc::now())
    }

    /// Capture with an explicit timestamp.
    pub fn capture_at(
        document: &CharacterDocument,
        source: SnapshotSource,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SnapshotId::new(),
            created_at,
            source,
            label: None,
            document: document.clone(),
        }
    }

    /// Attach a human label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> &SnapshotId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn source(&self) -> SnapshotSource {
        self.source
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Id of the character this snapshot was taken from.
    pub fn document_id(&self) -> &str {
        &self.document.id
    }

    /// The captured document.
    pub fn document(&self) -> &CharacterDocument {
        &self.document
    }
}
