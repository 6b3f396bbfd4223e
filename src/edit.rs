//! Span edits: collect `(range, replacement)` pairs, apply them in one pass.

use crate::error::{Result, RewriteError};
use std::ops::Range;

/// Replace the bytes in `range` with `text`. An empty range inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub text: String,
}

impl TextEdit {
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at..at, text)
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self::replace(range, "")
    }
}

/// Apply `edits` to `source`.
///
/// Edits may arrive in any order. Insertions at the same offset keep their
/// relative order; any two edits sharing bytes are rejected.
pub fn apply(source: &str, mut edits: Vec<TextEdit>) -> Result<String> {
    edits.sort_by_key(|e| (e.range.start, e.range.end));

    for pair in edits.windows(2) {
        if pair[1].range.start < pair[0].range.end {
            return Err(RewriteError::OverlappingEdits {
                first: pair[0].range.clone(),
                second: pair[1].range.clone(),
            });
        }
    }

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in &edits {
        out.push_str(&source[cursor..edit.range.start]);
        out.push_str(&edit.text);
        cursor = edit.range.end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}
