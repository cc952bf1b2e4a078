//! Splicing edits back into the source text

use std::ops::Range;

/// Replace `range` of the source with `replacement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl Edit {
    pub fn delete(range: Range<usize>) -> Self {
        Edit {
            range,
            replacement: String::new(),
        }
    }

    pub fn replace(range: Range<usize>, replacement: String) -> Self {
        Edit { range, replacement }
    }
}

/// Apply `edits` to `text[region]` in one left-to-right pass
///
/// Edits must lie inside `region`, be sorted by start and never overlap.
/// Bytes outside every edit are copied through unchanged.
pub fn assemble(text: &str, region: Range<usize>, edits: &[Edit]) -> String {
    let mut output = String::with_capacity(region.len());
    let mut cursor = region.start;

    for edit in edits {
        debug_assert!(edit.range.start >= cursor, "edits overlap or are unsorted");
        debug_assert!(edit.range.end <= region.end, "edit escapes its region");

        output.push_str(&text[cursor..edit.range.start]);
        output.push_str(&edit.replacement);
        cursor = edit.range.end;
    }

    output.push_str(&text[cursor..region.end]);
    output
}

/// Apply `edits` to the whole text
pub fn apply(text: &str, edits: &[Edit]) -> String {
    assemble(text, 0..text.len(), edits)
}
