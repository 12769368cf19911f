//! Plain-text rendering of snapshot reviews.
//!
//! Changed runs are wrapped as `[-removed-]` on the snapshot side and
//! `{+added+}` on the live side.

use charvault_snapshot::{DiffEntry, DiffSegment, PreviewLimits, SectionPreview, Snapshot};
use std::fmt::Write;

/// Render one side of a row.
pub fn segments(segments: &[DiffSegment], open: &str, close: &str) -> String {
    let mut out = String::new();
    for segment in segments {
        if segment.changed {
            out.push_str(open);
            out.push_str(&segment.text);
            out.push_str(close);
        } else {
            out.push_str(&segment.text);
        }
    }
    out
}

/// One line of the snapshot list.
pub fn snapshot_row(snapshot: &Snapshot) -> String {
    let mut row = format!(
        "{:<30} {:<17} {:<12}",
        snapshot.id(),
        snapshot.created_at().format("%Y-%m-%d %H:%M"),
        snapshot.source().label(),
    );
    if let Some(label) = snapshot.label() {
        row.push_str(label);
    }
    row.trim_end().to_string()
}

/// Render one section of a diff.
pub fn entry(entry: &DiffEntry, limits: PreviewLimits, expanded: bool) -> String {
    let mut out = String::new();
    let status = if entry.changed { "changed" } else { "unchanged" };

    if entry.is_image {
        let _ = writeln!(out, "== {} ({}) ==", entry.label, status);
        let _ = writeln!(out, "  snapshot: {}", or_none(&entry.snapshot_text()));
        let _ = writeln!(out, "  current:  {}", or_none(&entry.current_text()));
        return out;
    }

    let _ = writeln!(
        out,
        "== {} ({}, {} line(s)) ==",
        entry.label,
        status,
        entry.changed_line_count()
    );

    if entry.lines().is_empty() {
        out.push_str("  (no content)\n");
        return out;
    }

    let preview = SectionPreview::build(entry, limits, expanded);
    for row in &preview.rows {
        let marker = if row.changed { '~' } else { ' ' };
        let _ = writeln!(out, "{} - {}", marker, segments(&row.left, "[-", "-]"));
        let _ = writeln!(out, "{} + {}", marker, segments(&row.right, "{+", "+}"));
    }
    if preview.is_truncated() {
        let _ = writeln!(
            out,
            "  ... {} more line(s), use --expand to show all",
            preview.hidden_rows
        );
    }
    out
}

fn or_none(text: &str) -> &str {
    if text.is_empty() {
        "(none)"
    } else {
        text
    }
}
