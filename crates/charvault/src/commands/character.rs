//! Bringing characters into the vault.

use super::open_store;
use anyhow::Context;
use charvault_snapshot::{
    CharacterDocument, DocumentStore, Snapshot, SnapshotSource, SnapshotStore,
};
use std::path::Path;

/// Handle `charvault import`.
///
/// Saves the character as the live document and records an import snapshot
/// of it.
pub async fn handle_import(data_dir: &Path, file: &Path) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let document: CharacterDocument = serde_json::from_str(&content)
        .with_context(|| format!("Invalid character file {}", file.display()))?;
    document.validate()?;

    let store = open_store(data_dir, false);
    store.save(&document).await?;
    let snapshot = Snapshot::capture(&document, SnapshotSource::Import);
    store.append(&snapshot).await?;

    println!(
        "Imported {} as {} (snapshot {})",
        document.name().unwrap_or("character"),
        document.id,
        snapshot.id()
    );
    Ok(())
}
