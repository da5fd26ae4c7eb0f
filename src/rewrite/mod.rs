//! Batch text rewriting
//!
//! Edits are expressed against the original buffer and applied in a single
//! pass. A running offset tracks how much earlier replacements have grown or
//! shrunk the buffer, so later edits still land on their original text.

mod writer;

pub use writer::{read_script, write_script, ScriptWriter, WriteResult};

use crate::error::RewriteError;
use serde::Serialize;
use std::ops::Range;
use tracing::debug;

/// Replacement of a byte range of the original buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// Edit inserting text at `offset`
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset..offset, text)
    }

    /// Edit removing a range
    pub fn delete(range: Range<usize>) -> Self {
        Self::new(range, String::new())
    }

    /// Whether applying the edit to `buffer` leaves it unchanged
    pub fn is_noop(&self, buffer: &str) -> bool {
        buffer.get(self.range.clone()) == Some(self.replacement.as_str())
    }
}

/// Apply `edits` to `buffer` in one pass
///
/// Edits must be sorted by start offset and must not overlap in original
/// coordinates. Insertions (empty ranges) may share an offset with the end
/// of the previous edit.
pub fn apply_all(buffer: &str, edits: &[TextEdit]) -> Result<String, RewriteError> {
    validate(buffer, edits)?;

    let mut result = buffer.to_string();
    let mut offset: isize = 0;
    for edit in edits {
        let start = shift(edit.range.start, offset);
        let end = shift(edit.range.end, offset);
        result.replace_range(start..end, &edit.replacement);
        offset += edit.replacement.len() as isize - edit.range.len() as isize;
    }
    Ok(result)
}

/// Sort edits, drop the ones that change nothing and the ones overlapping
/// an earlier edit
pub fn normalize_edits(buffer: &str, mut edits: Vec<TextEdit>) -> Vec<TextEdit> {
    edits.sort_by_key(|e| (e.range.start, e.range.end));

    let mut kept: Vec<TextEdit> = Vec::with_capacity(edits.len());
    for edit in edits {
        if edit.is_noop(buffer) {
            continue;
        }
        if let Some(previous) = kept.last() {
            if edit.range.start < previous.range.end {
                debug!(
                    start = edit.range.start,
                    previous_end = previous.range.end,
                    "dropping overlapping edit"
                );
                continue;
            }
        }
        kept.push(edit);
    }
    kept
}

fn validate(buffer: &str, edits: &[TextEdit]) -> Result<(), RewriteError> {
    let mut previous: Option<&Range<usize>> = None;
    for (index, edit) in edits.iter().enumerate() {
        let range = &edit.range;
        if range.start > range.end || range.end > buffer.len() {
            return Err(RewriteError::OutOfBounds {
                start: range.start,
                end: range.end,
                len: buffer.len(),
            });
        }
        for offset in [range.start, range.end] {
            if !buffer.is_char_boundary(offset) {
                return Err(RewriteError::NotCharBoundary { offset });
            }
        }
        if let Some(previous) = previous {
            if range.start < previous.start {
                return Err(RewriteError::Unsorted {
                    index,
                    start: range.start,
                    previous: previous.start,
                });
            }
            if range.start < previous.end {
                return Err(RewriteError::Overlapping {
                    index,
                    start: range.start,
                    previous_end: previous.end,
                });
            }
        }
        previous = Some(range);
    }
    Ok(())
}

fn shift(position: usize, offset: isize) -> usize {
    (position as isize + offset) as usize
}
