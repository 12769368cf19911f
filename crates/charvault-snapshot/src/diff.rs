//! Line and intra-line diffing of normalized section values.
//!
//! Both algorithms are intentionally approximate:
//!
//! - Lines are aligned by position, not by content. Inserting a line in the
//!   middle of a field marks every later line as changed. Section values are
//!   short prose, so this is adequate and needs no edit-distance search.
//! - Within a line, only the longest common prefix and suffix are trimmed.
//!   Two disjoint edits on one line show up as a single changed run spanning
//!   both.

use serde::Serialize;

/// One positionally aligned pair of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDiff {
    /// Line from the value being displayed.
    pub value: String,
    /// Line at the same index in the value it is compared against.
    pub compare_value: String,
    pub changed: bool,
}

/// A run of a line's text, either shared with the compared line or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    pub text: String,
    pub changed: bool,
}

impl DiffSegment {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            changed: false,
        }
    }

    fn changed(text: &str) -> Self {
        Self {
            text: text.to_string(),
            changed: true,
        }
    }
}

/// Number of lines in a normalized value. The empty string has none.
pub fn line_count(value: &str) -> usize {
    if value.is_empty() {
        0
    } else {
        value.split('\n').count()
    }
}

fn split_lines(value: &str) -> Vec<&str> {
    if value.is_empty() {
        Vec::new()
    } else {
        value.split('\n').collect()
    }
}

/// Align two values line by line.
///
/// The result has `max(line_count(value), line_count(compare_value))`
/// entries; a side that runs out of lines contributes empty strings.
pub fn diff_lines(value: &str, compare_value: &str) -> Vec<LineDiff> {
    let left = split_lines(value);
    let right = split_lines(compare_value);
    let n = left.len().max(right.len());

    (0..n)
        .map(|i| {
            let value = left.get(i).copied().unwrap_or("");
            let compare_value = right.get(i).copied().unwrap_or("");
            LineDiff {
                value: value.to_string(),
                compare_value: compare_value.to_string(),
                changed: value != compare_value,
            }
        })
        .collect()
}

/// Split `line` into unchanged and changed runs relative to `compare_line`.
///
/// Concatenating the returned texts always reproduces `line`. Boundaries
/// fall on character boundaries.
pub fn diff_segments(line: &str, compare_line: &str) -> Vec<DiffSegment> {
    if line == compare_line {
        if line.is_empty() {
            return Vec::new();
        }
        return vec![DiffSegment::unchanged(line)];
    }

    if line.is_empty() {
        return Vec::new();
    }

    if compare_line.is_empty() {
        return vec![DiffSegment::changed(line)];
    }

    let limit = line.len().min(compare_line.len());
    let prefix = common_prefix_len(line, compare_line);
    let suffix = common_suffix_len(line, compare_line, limit - prefix);

    let mut segments = Vec::with_capacity(3);
    if prefix > 0 {
        segments.push(DiffSegment::unchanged(&line[..prefix]));
    }
    let middle = &line[prefix..line.len() - suffix];
    if !middle.is_empty() {
        segments.push(DiffSegment::changed(middle));
    }
    if suffix > 0 {
        segments.push(DiffSegment::unchanged(&line[line.len() - suffix..]));
    }
    segments
}

/// Byte length of the longest common prefix, ending on a char boundary.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}

/// Byte length of the longest common suffix, capped at `max` bytes so it
/// never overlaps the prefix on either side.
fn common_suffix_len(a: &str, b: &str, max: usize) -> usize {
    let mut len = 0;
    for (x, y) in a.chars().rev().zip(b.chars().rev()) {
        if x != y || len + x.len_utf8() > max {
            break;
        }
        len += x.len_utf8();
    }
    len
}

/// Concatenate segment texts back into a line.
pub fn join_segments(segments: &[DiffSegment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}
