//! Restore a character from a snapshot.

use super::open_store;
use anyhow::Context;
use charvault_snapshot::{RestoreController, RestoreScope, ReviewSession, SectionId, SnapshotId};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

/// Handle `charvault restore`.
///
/// `section` stands in for the section open in an editor: it is both the
/// active section of the session and the restore scope.
pub async fn handle_restore(
    data_dir: &Path,
    document_id: &str,
    snapshot: &str,
    section: Option<String>,
    yes: bool,
) -> anyhow::Result<()> {
    let section = section
        .map(|s| SectionId::parse(&s).with_context(|| format!("Unknown section: {s}")))
        .transpose()?;
    let scope = section.map_or(RestoreScope::Whole, RestoreScope::Section);

    let store = open_store(data_dir, false);
    let session = ReviewSession::open(&store, document_id, section).await?;
    let request = session.request_restore(&SnapshotId::from_string(snapshot), scope)?;

    if !yes && !confirm(request.summary())? {
        println!("Restore cancelled.");
        session.close();
        return Ok(());
    }

    let controller = RestoreController::new(Arc::new(open_store(data_dir, false)));
    let restored = controller.restore(&session, request.confirm()).await?;
    println!(
        "Restored {} of {} from {}",
        scope,
        restored.name().unwrap_or(document_id),
        snapshot
    );
    Ok(())
}

fn confirm(summary: &str) -> anyhow::Result<bool> {
    print!("{summary}? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
