//! Snapshot capture and listing.

use super::open_store;
use crate::render;
use charvault_snapshot::{capture_snapshot, SnapshotSource, SnapshotStore};
use clap::ValueEnum;
use std::path::Path;

/// Why a snapshot was taken, as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Manual,
    PreAiEdit,
    Autosave,
    Import,
}

impl From<SourceArg> for SnapshotSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Manual => SnapshotSource::Manual,
            SourceArg::PreAiEdit => SnapshotSource::PreAiEdit,
            SourceArg::Autosave => SnapshotSource::Autosave,
            SourceArg::Import => SnapshotSource::Import,
        }
    }
}

/// Handle `charvault capture`.
pub async fn handle_capture(
    data_dir: &Path,
    document_id: &str,
    source: SourceArg,
    label: Option<String>,
) -> anyhow::Result<()> {
    let store = open_store(data_dir, false);
    let snapshot = capture_snapshot(&store, &store, document_id, source.into(), label).await?;
    println!("Captured snapshot {}", snapshot.id());
    Ok(())
}

/// Handle `charvault list`.
pub async fn handle_list(data_dir: &Path, document_id: &str) -> anyhow::Result<()> {
    let store = open_store(data_dir, true);
    let snapshots = store.list_snapshots(document_id).await?;

    if snapshots.is_empty() {
        println!("No snapshots found for {document_id}.");
        return Ok(());
    }

    println!("{:<30} {:<17} {:<12} LABEL", "ID", "CREATED", "SOURCE");
    println!("{}", "-".repeat(72));
    for snapshot in &snapshots {
        println!("{}", render::snapshot_row(snapshot));
    }
    Ok(())
}
