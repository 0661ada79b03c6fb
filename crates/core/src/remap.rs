//! Selection remapping across the trailing-whitespace strip.
//!
//! [`remap`] strips `text` and moves every selection endpoint so it keeps pointing at the same
//! logical content:
//!
//! - An endpoint outside any deleted run moves back by the number of characters deleted
//!   strictly before it.
//! - An endpoint inside a deleted run, at its start, or right after it collapses to where the
//!   run's terminator (newline or end-of-text) lands after the strip.
//!
//! Both endpoints of every selection go through the same "removed before offset" function, so
//! results do not depend on whether an offset is a selection start or end, and a reversed
//! selection (`start > end`) is remapped endpoint by endpoint without being reordered.

use serde::{Deserialize, Serialize};

use crate::{
    TrimError,
    edit::DeletionMap,
    offset::OffsetIndex,
    strip::{StripConfig, rewrite},
};

/// A start/end offset pair. A cursor is a selection with `start == end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A bare cursor at `offset`.
    pub fn cursor(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_cursor(&self) -> bool {
        self.start == self.end
    }
}

impl From<(usize, usize)> for Selection {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

impl From<Selection> for (usize, usize) {
    fn from(sel: Selection) -> Self {
        (sel.start, sel.end)
    }
}

/// Stripped text and the selections remapped into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapResult {
    /// The text with trailing whitespace removed.
    pub text: String,
    /// One entry per input selection, in input order.
    pub selections: Vec<Selection>,
    /// Number of characters removed from the text.
    pub removed: usize,
}

impl RemapResult {
    /// Returns true if the strip changed the text.
    pub fn changed(&self) -> bool {
        self.removed > 0
    }
}

/// Strip trailing whitespace from `text` and remap `selections` into the result.
///
/// Offsets are counted in `config.offset_unit`. Offsets past the end of `text` are clamped to
/// its length (and logged); offsets inside a multi-unit character clamp to its start. This never
/// fails; use [`try_remap`] to reject out-of-bounds offsets instead.
pub fn remap(text: &str, selections: &[Selection], config: &StripConfig) -> RemapResult {
    let (new_text, map) = rewrite(text, config);
    let index = OffsetIndex::new(text, config.offset_unit);
    let mapper = EndpointMapper {
        index: &index,
        map: &map,
    };

    let selections = selections
        .iter()
        .enumerate()
        .map(|(i, sel)| Selection {
            start: mapper.map(i, sel.start),
            end: mapper.map(i, sel.end),
        })
        .collect();

    tracing::trace!(
        len = text.len(),
        runs = map.deletions().len(),
        removed = map.total_removed(),
        "remapped selections across trailing whitespace strip"
    );

    RemapResult {
        text: new_text,
        selections,
        removed: map.total_removed(),
    }
}

/// Like [`remap`], but rejects offsets past the end of `text`.
pub fn try_remap(
    text: &str,
    selections: &[Selection],
    config: &StripConfig,
) -> Result<RemapResult, TrimError> {
    validate_selections(text, selections, config)?;
    Ok(remap(text, selections, config))
}

/// Check that every offset in `selections` lies within `[0, len(text)]`.
pub fn validate_selections(
    text: &str,
    selections: &[Selection],
    config: &StripConfig,
) -> Result<(), TrimError> {
    let len = config.offset_unit.len_of_str(text);
    for (index, sel) in selections.iter().enumerate() {
        for offset in [sel.start, sel.end] {
            if offset > len {
                return Err(TrimError::OffsetOutOfBounds { index, offset, len });
            }
        }
    }
    Ok(())
}

/// Maps single endpoints from the input text into the stripped text.
struct EndpointMapper<'a, 'b> {
    index: &'b OffsetIndex<'a>,
    map: &'b DeletionMap,
}

impl EndpointMapper<'_, '_> {
    /// Map `offset` (in the index's unit) belonging to selection `sel_index`.
    fn map(&self, sel_index: usize, offset: usize) -> usize {
        if offset > self.index.len() {
            tracing::warn!(
                selection = sel_index,
                offset,
                len = self.index.len(),
                "selection offset past end of text; clamping"
            );
        }
        let byte = self.index.offset_to_byte(offset);
        // Deleted characters are ASCII, so removed bytes equal removed units.
        self.index.byte_to_offset(byte) - self.map.removed_before(byte)
    }
}
