//! Diff a snapshot against the live character.

use super::open_store;
use crate::render;
use charvault_snapshot::{DocumentStore, ReviewConfig, ReviewSession, SnapshotId};
use std::path::Path;

/// Handle `charvault diff`.
///
/// Shows the newest snapshot unless `snapshot` names another one.
pub async fn handle_diff(
    data_dir: &Path,
    document_id: &str,
    snapshot: Option<String>,
    show_all: bool,
    expand: bool,
    review: &ReviewConfig,
) -> anyhow::Result<()> {
    let store = open_store(data_dir, true);
    let live = store.load(document_id).await?;
    let session = ReviewSession::open(&store, document_id, None).await?;

    if let Some(id) = snapshot {
        session.select(&SnapshotId::from_string(id))?;
    }

    let Some(selected) = session.selected() else {
        println!("No snapshots found for {document_id}.");
        return Ok(());
    };

    println!("{}", render::snapshot_row(&selected));
    println!();

    let entries = session.diff(&live)?;
    let show_unchanged = show_all || review.show_unchanged;
    let mut shown = 0;
    for entry in entries.iter().filter(|e| e.changed || show_unchanged) {
        print!("{}", render::entry(entry, review.preview_limits(), expand));
        shown += 1;
    }
    if shown == 0 {
        println!("No differences.");
    }

    session.close();
    Ok(())
}
