//! Host-facing editable regions and documents.
//!
//! A document (a notebook, or a plain file) is an ordered list of editable regions. The save
//! cycle only needs four things from a region: read its text, read its selections, write text
//! back, and write selections back. [`EditableRegion`] is that contract, in offset space.
//! Hosts that track selections as line/column pairs implement [`PositionedRegion`] instead and
//! wrap it in [`LineColumnRegion`].
//!
//! [`Buffer`], [`Notebook`], and [`PlainFile`] are in-memory implementations.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{
    offset::{OffsetIndex, OffsetUnit, Position},
    remap::Selection,
    strip::StripConfig,
};

/// What kind of content a region holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionKind {
    /// Source code (e.g. a notebook code cell).
    #[default]
    Code,
    /// Rendered markup (e.g. a markdown cell).
    Markup,
    /// Raw, unrendered content passed through verbatim.
    Raw,
    /// The whole content of a plain text file.
    PlainText,
}

impl RegionKind {
    /// Returns true if regions of this kind are stripped on save.
    pub fn qualifies(self, config: &StripConfig) -> bool {
        match self {
            RegionKind::Code | RegionKind::PlainText => true,
            RegionKind::Raw => config.strip_raw_regions,
            RegionKind::Markup => false,
        }
    }
}

/// One editable region, with selections as offsets in the save cycle's [`OffsetUnit`].
pub trait EditableRegion {
    fn kind(&self) -> RegionKind;

    fn text(&self) -> Cow<'_, str>;

    /// Current selections, sorted by ascending offset.
    fn selections(&self) -> Vec<Selection>;

    fn set_text(&mut self, text: String);

    fn set_selections(&mut self, selections: Vec<Selection>);
}

/// A document: its editable regions in a stable traversal order.
pub trait Document {
    fn regions_mut(&mut self) -> Vec<&mut dyn EditableRegion>;
}

impl<R: EditableRegion> Document for [R] {
    fn regions_mut(&mut self) -> Vec<&mut dyn EditableRegion> {
        self.iter_mut()
            .map(|r| r as &mut dyn EditableRegion)
            .collect()
    }
}

impl<R: EditableRegion> Document for Vec<R> {
    fn regions_mut(&mut self) -> Vec<&mut dyn EditableRegion> {
        self.as_mut_slice().regions_mut()
    }
}

/// An in-memory region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    kind: RegionKind,
    text: String,
    selections: Vec<Selection>,
    dirty: bool,
}

impl Buffer {
    pub fn new(kind: RegionKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            selections: Vec::new(),
            dirty: false,
        }
    }

    pub fn with_selections(mut self, selections: impl IntoIterator<Item = Selection>) -> Self {
        self.selections = selections.into_iter().collect();
        self
    }

    /// Returns true if the text was replaced with different content since the last
    /// [`Buffer::mark_clean`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

impl EditableRegion for Buffer {
    fn kind(&self) -> RegionKind {
        self.kind
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn set_text(&mut self, text: String) {
        if text != self.text {
            self.text = text;
            self.dirty = true;
        }
    }

    fn set_selections(&mut self, selections: Vec<Selection>) {
        self.selections = selections;
    }
}

/// A multi-region document: an ordered list of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notebook {
    cells: Vec<Buffer>,
}

impl Notebook {
    pub fn new(cells: impl IntoIterator<Item = Buffer>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    pub fn cells(&self) -> &[Buffer] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut Vec<Buffer> {
        &mut self.cells
    }
}

impl Document for Notebook {
    fn regions_mut(&mut self) -> Vec<&mut dyn EditableRegion> {
        self.cells.regions_mut()
    }
}

/// A single-region document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainFile {
    buffer: Buffer,
}

impl PlainFile {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            buffer: Buffer::new(RegionKind::PlainText, text),
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }
}

impl Document for PlainFile {
    fn regions_mut(&mut self) -> Vec<&mut dyn EditableRegion> {
        vec![&mut self.buffer as &mut dyn EditableRegion]
    }
}

/// A region whose host reports selections as line/column pairs.
pub trait PositionedRegion {
    fn kind(&self) -> RegionKind;

    fn text(&self) -> Cow<'_, str>;

    /// Current selections as `(start, end)` positions.
    fn positions(&self) -> Vec<(Position, Position)>;

    fn set_text(&mut self, text: String);

    fn set_positions(&mut self, positions: Vec<(Position, Position)>);
}

/// Adapts a [`PositionedRegion`] to [`EditableRegion`] by converting positions to and from
/// offsets against the region's current text.
///
/// `unit` must match the [`StripConfig::offset_unit`] of the save cycle driving the region.
#[derive(Debug, Clone)]
pub struct LineColumnRegion<R> {
    inner: R,
    unit: OffsetUnit,
}

impl<R: PositionedRegion> LineColumnRegion<R> {
    pub fn new(inner: R, unit: OffsetUnit) -> Self {
        Self { inner, unit }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: PositionedRegion> EditableRegion for LineColumnRegion<R> {
    fn kind(&self) -> RegionKind {
        self.inner.kind()
    }

    fn text(&self) -> Cow<'_, str> {
        self.inner.text()
    }

    fn selections(&self) -> Vec<Selection> {
        let text = self.inner.text();
        let index = OffsetIndex::new(&text, self.unit);
        let to_offset = |p: Position| {
            index.position_to_offset(p).unwrap_or_else(|err| {
                tracing::warn!(%err, "selection position outside text; clamping to end");
                index.len()
            })
        };
        self.inner
            .positions()
            .into_iter()
            .map(|(start, end)| Selection::new(to_offset(start), to_offset(end)))
            .collect()
    }

    fn set_text(&mut self, text: String) {
        self.inner.set_text(text);
    }

    fn set_selections(&mut self, selections: Vec<Selection>) {
        let positions = {
            let text = self.inner.text();
            let index = OffsetIndex::new(&text, self.unit);
            selections
                .iter()
                .map(|sel| {
                    (
                        index.offset_to_position(sel.start),
                        index.offset_to_position(sel.end),
                    )
                })
                .collect()
        };
        self.inner.set_positions(positions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_code_and_plain_text_qualify_by_default() {
        let cfg = StripConfig::default();
        assert!(RegionKind::Code.qualifies(&cfg));
        assert!(RegionKind::PlainText.qualifies(&cfg));
        assert!(!RegionKind::Markup.qualifies(&cfg));
        assert!(!RegionKind::Raw.qualifies(&cfg));
    }

    #[test]
    fn raw_regions_qualify_when_configured() {
        let cfg = StripConfig {
            strip_raw_regions: true,
            ..StripConfig::default()
        };
        assert!(RegionKind::Raw.qualifies(&cfg));
        assert!(!RegionKind::Markup.qualifies(&cfg));
    }

    #[test]
    fn region_kind_serde_names() {
        let kinds: Vec<RegionKind> =
            serde_json::from_str(r#"["code", "markup", "raw", "plainText"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![
                RegionKind::Code,
                RegionKind::Markup,
                RegionKind::Raw,
                RegionKind::PlainText
            ]
        );
    }

    #[test]
    /// Writing identical text back does not mark a buffer dirty.
    fn buffer_dirty_only_on_change() {
        let mut buf = Buffer::new(RegionKind::Code, "a\n");
        buf.set_text("a\n".to_string());
        assert!(!buf.is_dirty());
        buf.set_text("b\n".to_string());
        assert!(buf.is_dirty());
        assert_eq!(buf.text(), "b\n");
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    #[test]
    fn notebook_yields_cells_in_order() {
        let mut nb = Notebook::new([
            Buffer::new(RegionKind::Code, "a"),
            Buffer::new(RegionKind::Markup, "b"),
        ]);
        let kinds: Vec<RegionKind> = nb.regions_mut().iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, vec![RegionKind::Code, RegionKind::Markup]);
    }

    #[test]
    fn plain_file_has_one_plain_text_region() {
        let mut file = PlainFile::new("x");
        let regions = file.regions_mut();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind(), RegionKind::PlainText);
    }

    /// A host region that speaks line/column.
    struct Cell {
        text: String,
        positions: Vec<(Position, Position)>,
    }

    impl PositionedRegion for Cell {
        fn kind(&self) -> RegionKind {
            RegionKind::Code
        }

        fn text(&self) -> Cow<'_, str> {
            Cow::Borrowed(&self.text)
        }

        fn positions(&self) -> Vec<(Position, Position)> {
            self.positions.clone()
        }

        fn set_text(&mut self, text: String) {
            self.text = text;
        }

        fn set_positions(&mut self, positions: Vec<(Position, Position)>) {
            self.positions = positions;
        }
    }

    #[test]
    fn line_column_region_converts_both_ways() {
        let cell = Cell {
            text: "ab  \ncd".to_string(),
            positions: vec![(Position::new(0, 4), Position::new(1, 1))],
        };
        let mut region = LineColumnRegion::new(cell, OffsetUnit::Char);
        assert_eq!(region.selections(), vec![Selection::new(4, 6)]);

        region.set_text("ab\ncd".to_string());
        region.set_selections(vec![Selection::new(2, 4)]);
        assert_eq!(
            region.inner().positions,
            vec![(Position::new(0, 2), Position::new(1, 1))]
        );
    }

    #[test]
    fn line_column_region_clamps_missing_lines_to_end() {
        let cell = Cell {
            text: "ab".to_string(),
            positions: vec![(Position::new(0, 1), Position::new(7, 0))],
        };
        let region = LineColumnRegion::new(cell, OffsetUnit::Char);
        assert_eq!(region.selections(), vec![Selection::new(1, 2)]);
    }
}
