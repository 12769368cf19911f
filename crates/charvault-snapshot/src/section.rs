//! Per-section comparison of a snapshot against the live document.

use crate::diff::{diff_lines, diff_segments, DiffSegment, LineDiff};
use crate::document::{CharacterDocument, SectionId, SectionKind, SectionValue};
use crate::normalize::normalize;
use crate::snapshot::Snapshot;
use serde::Serialize;

/// Comparison result for one section.
///
/// Line and segment diffs are not computed here; call [`DiffEntry::lines`]
/// or [`DiffEntry::line_pairs`] for the entries that are actually shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    pub section: SectionId,
    pub label: &'static str,
    pub snapshot_value: SectionValue,
    pub current_value: SectionValue,
    pub changed: bool,
    /// Image sections are shown before/after, never text-diffed.
    pub is_image: bool,
}

/// One row of the side-by-side view: historical panel on the left, live
/// panel on the right. Each side's changed runs describe the same edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePair {
    pub changed: bool,
    pub left: Vec<DiffSegment>,
    pub right: Vec<DiffSegment>,
}

impl DiffEntry {
    fn new(section: SectionId, snapshot_value: &SectionValue, current_value: &SectionValue) -> Self {
        Self {
            section,
            label: section.label(),
            changed: normalize(snapshot_value) != normalize(current_value),
            is_image: section.kind() == SectionKind::Image,
            snapshot_value: snapshot_value.clone(),
            current_value: current_value.clone(),
        }
    }

    /// Normalized snapshot value.
    pub fn snapshot_text(&self) -> String {
        normalize(&self.snapshot_value)
    }

    /// Normalized live value.
    pub fn current_text(&self) -> String {
        normalize(&self.current_value)
    }

    /// Line diff from the snapshot's point of view.
    pub fn lines(&self) -> Vec<LineDiff> {
        if self.is_image {
            return Vec::new();
        }
        diff_lines(&self.snapshot_text(), &self.current_text())
    }

    /// Line diff from the live document's point of view.
    pub fn mirror_lines(&self) -> Vec<LineDiff> {
        if self.is_image {
            return Vec::new();
        }
        diff_lines(&self.current_text(), &self.snapshot_text())
    }

    /// Side-by-side rows with segment highlighting on both panels.
    pub fn line_pairs(&self) -> Vec<LinePair> {
        self.lines().into_iter().map(LinePair::from_line).collect()
    }

    /// Number of changed lines, for the summary badge.
    pub fn changed_line_count(&self) -> usize {
        self.lines().iter().filter(|l| l.changed).count()
    }
}

impl LinePair {
    /// Build both panels from a line pair taken from the snapshot's side.
    pub fn from_line(line: LineDiff) -> Self {
        Self {
            changed: line.changed,
            left: diff_segments(&line.value, &line.compare_value),
            right: diff_segments(&line.compare_value, &line.value),
        }
    }
}

/// Compare every section of a snapshot with the live document.
///
/// Returns one entry per section in [`SectionId::ALL`] order, unchanged
/// sections included.
pub fn compute_diff(snapshot: &Snapshot, live: &CharacterDocument) -> Vec<DiffEntry> {
    let historical = snapshot.document();
    SectionId::ALL
        .into_iter()
        .map(|id| DiffEntry::new(id, historical.section(id), live.section(id)))
        .collect()
}

/// Entries whose values differ.
pub fn changed_entries(entries: &[DiffEntry]) -> impl Iterator<Item = &DiffEntry> {
    entries.iter().filter(|e| e.changed)
}
