//! Collapsed previews of long sections.
//!
//! The diff always runs over the full normalized values; only the resulting
//! rows are elided. Expanding therefore never re-uses a truncated copy.

use crate::diff::DiffSegment;
use crate::section::{DiffEntry, LinePair};
use serde::{Deserialize, Serialize};

/// Thresholds past which a section starts collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewLimits {
    pub max_lines: usize,
    pub max_chars: usize,
}

impl Default for PreviewLimits {
    fn default() -> Self {
        Self {
            max_lines: 12,
            max_chars: 1200,
        }
    }
}

/// Rows of one section prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPreview {
    pub rows: Vec<LinePair>,
    /// Rows hidden behind the expand affordance.
    pub hidden_rows: usize,
}

impl SectionPreview {
    /// Build the rows for an entry. With `expanded` set every row is kept.
    pub fn build(entry: &DiffEntry, limits: PreviewLimits, expanded: bool) -> Self {
        let rows = entry.line_pairs();
        if expanded {
            return Self {
                rows,
                hidden_rows: 0,
            };
        }

        // Always show at least one row, whatever the configured limits.
        let max_lines = limits.max_lines.max(1);
        let total = rows.len();
        let mut chars = 0;
        let mut visible = 0;
        for row in &rows {
            if visible >= max_lines {
                break;
            }
            chars += row_chars(row);
            if visible > 0 && chars > limits.max_chars {
                break;
            }
            visible += 1;
        }

        let mut rows = rows;
        rows.truncate(visible);
        Self {
            rows,
            hidden_rows: total - visible,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.hidden_rows > 0
    }
}

fn row_chars(row: &LinePair) -> usize {
    let side = |segments: &[DiffSegment]| -> usize {
        segments.iter().map(|s| s.text.chars().count()).sum()
    };
    side(&row.left).max(side(&row.right))
}
