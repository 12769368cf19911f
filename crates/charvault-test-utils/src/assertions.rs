//! Assertion helpers with readable failure output.

use charvault_snapshot::{
    diff_segments, join_segments, line_count, CharacterDocument, DiffEntry, LineDiff, SectionId,
};

/// Assert that two strings are equal, with a line diff on failure.
pub fn assert_strings_equal(actual: &str, expected: &str) {
    if actual != expected {
        let diff = similar::TextDiff::from_lines(expected, actual);
        let mut output = String::new();

        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                similar::ChangeTag::Delete => "-",
                similar::ChangeTag::Insert => "+",
                similar::ChangeTag::Equal => " ",
            };
            output.push_str(&format!("{}{}", sign, change));
        }

        panic!("Strings are not equal.\nDiff:\n{}", output);
    }
}

/// Assert that every line of an entry can be rebuilt from its segments,
/// on both sides of the comparison. Padding rows past the end of a side
/// are skipped.
pub fn assert_segments_rebuild(entry: &DiffEntry) {
    let rebuild = |lines: Vec<LineDiff>, count: usize| -> String {
        lines
            .iter()
            .take(count)
            .map(|line| join_segments(&diff_segments(&line.value, &line.compare_value)))
            .collect::<Vec<_>>()
            .join("\n")
    };

    if entry.is_image {
        return;
    }

    let snapshot_text = entry.snapshot_text();
    let current_text = entry.current_text();
    assert_strings_equal(
        &rebuild(entry.lines(), line_count(&snapshot_text)),
        &snapshot_text,
    );
    assert_strings_equal(
        &rebuild(entry.mirror_lines(), line_count(&current_text)),
        &current_text,
    );
}

/// Assert that two documents hold equal values in every section except
/// the listed ones.
pub fn assert_sections_equal_except(
    actual: &CharacterDocument,
    expected: &CharacterDocument,
    except: &[SectionId],
) {
    for id in SectionId::ALL {
        if except.contains(&id) {
            continue;
        }
        assert_eq!(
            actual.section(id),
            expected.section(id),
            "Section {} differs",
            id
        );
    }
}

/// Assert that a result is Ok and extract the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err and extract the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
}
