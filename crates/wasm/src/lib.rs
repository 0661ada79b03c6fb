//! wasm-bindgen exports.
//!
//! This module exposes the remapper and the save cycle to JavaScript via `wasm-bindgen`.
//! The underlying logic lives in the `trim-on-save` crate.
//!
//! JavaScript strings are indexed in UTF-16 code units, so offsets default to
//! [`OffsetUnit::Utf16`] here.

use std::borrow::Cow;

use wasm_bindgen::prelude::*;

use trim_on_save::{
    EditableRegion, LineEndings as LineEndingsInner, OffsetUnit as OffsetUnitInner,
    RegionKind as RegionKindInner, SaveCycleCoordinator, Selection as SelectionInner,
    StripConfig as StripConfigInner,
};

/// Which characters end a line.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize, tsify::Tsify)]
#[serde(rename_all = "lowercase")]
pub enum LineEndings {
    /// "\n", "\r", U+2028, and U+2029, like a multi-line `$` in a JavaScript regex
    #[default]
    Any,
    /// Only "\n"
    Lf,
}

impl From<LineEndings> for LineEndingsInner {
    fn from(val: LineEndings) -> Self {
        match val {
            LineEndings::Any => LineEndingsInner::Any,
            LineEndings::Lf => LineEndingsInner::Lf,
        }
    }
}

/// The unit selection offsets are counted in.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize, tsify::Tsify)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    Byte,
    Char,
    #[default]
    Utf16,
}

impl From<OffsetUnit> for OffsetUnitInner {
    fn from(val: OffsetUnit) -> Self {
        match val {
            OffsetUnit::Byte => OffsetUnitInner::Byte,
            OffsetUnit::Char => OffsetUnitInner::Char,
            OffsetUnit::Utf16 => OffsetUnitInner::Utf16,
        }
    }
}

/// Configuration options for stripping and remapping.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize, tsify::Tsify)]
#[serde(default, rename_all = "camelCase")]
#[tsify(from_wasm_abi)]
pub struct StripConfig {
    /// Which characters end a line (defaults to "any")
    pub line_endings: LineEndings,
    /// Unit of every offset passed in and returned (defaults to "utf16")
    pub offset_unit: OffsetUnit,
    /// Strip raw cells along with code cells
    pub strip_raw_regions: bool,
}

impl From<StripConfig> for StripConfigInner {
    fn from(val: StripConfig) -> Self {
        StripConfigInner {
            line_endings: val.line_endings.into(),
            offset_unit: val.offset_unit.into(),
            strip_raw_regions: val.strip_raw_regions,
        }
    }
}

/// A start/end offset pair. A cursor has `start == end`.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, tsify::Tsify)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl From<Selection> for SelectionInner {
    fn from(val: Selection) -> Self {
        SelectionInner::new(val.start, val.end)
    }
}

impl From<SelectionInner> for Selection {
    fn from(val: SelectionInner) -> Self {
        Selection {
            start: val.start,
            end: val.end,
        }
    }
}

/// What kind of cell a region is.
#[derive(Debug, Clone, Copy, serde::Deserialize, tsify::Tsify)]
#[serde(rename_all = "camelCase")]
pub enum RegionKind {
    Code,
    Markup,
    Raw,
    PlainText,
}

impl From<RegionKind> for RegionKindInner {
    fn from(val: RegionKind) -> Self {
        match val {
            RegionKind::Code => RegionKindInner::Code,
            RegionKind::Markup => RegionKindInner::Markup,
            RegionKind::Raw => RegionKindInner::Raw,
            RegionKind::PlainText => RegionKindInner::PlainText,
        }
    }
}

/// One region as the host reports it right before a save.
#[derive(Debug, Clone, serde::Deserialize, tsify::Tsify)]
pub struct RegionInput {
    pub kind: RegionKind,
    pub text: String,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

/// Output of [`remap`].
#[derive(Debug, Clone, serde::Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
pub struct RemapOutput {
    /// The text with trailing whitespace removed.
    pub text: String,
    /// The selections, remapped into `text`.
    pub selections: Vec<Selection>,
    /// Number of characters removed.
    pub removed: usize,
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Strip trailing whitespace from `text` and remap `selections` (a `Selection[]`) into it.
///
/// Offsets past the end of `text` are clamped to its end, so a stale cursor never blocks a
/// save. Only a malformed `selections` value is an error.
#[wasm_bindgen]
pub fn remap(
    text: String,
    selections: JsValue,
    config: StripConfig,
) -> Result<RemapOutput, JsValue> {
    console_error_panic_hook::set_once();

    let selections: Vec<Selection> = from_js(selections)?;
    Ok(remap_selections(&text, &selections, config))
}

fn remap_selections(text: &str, selections: &[Selection], config: StripConfig) -> RemapOutput {
    let selections: Vec<SelectionInner> = selections.iter().copied().map(Into::into).collect();
    let res = trim_on_save::remap(text, &selections, &config.into());
    RemapOutput {
        text: res.text,
        selections: res.selections.into_iter().map(Into::into).collect(),
        removed: res.removed,
    }
}

/// A region handed across the boundary: collects what the coordinator writes back.
struct HostRegion {
    kind: RegionKindInner,
    text: String,
    selections: Vec<SelectionInner>,
    new_text: Option<String>,
    restored: Option<Vec<SelectionInner>>,
}

impl HostRegion {
    fn new(kind: RegionKind, text: String, selections: Vec<SelectionInner>) -> Self {
        Self {
            kind: kind.into(),
            text,
            selections,
            new_text: None,
            restored: None,
        }
    }
}

impl EditableRegion for HostRegion {
    fn kind(&self) -> RegionKindInner {
        self.kind
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.new_text.as_deref().unwrap_or(&self.text))
    }

    fn selections(&self) -> Vec<SelectionInner> {
        self.selections.clone()
    }

    fn set_text(&mut self, text: String) {
        self.new_text = Some(text);
    }

    fn set_selections(&mut self, selections: Vec<SelectionInner>) {
        self.restored = Some(selections);
    }
}

/// The save cycle of one open document.
///
/// Call `beforeSave` right before the host serializes the document and `afterSave` once the
/// save completes, passing the document's regions in the same order both times.
#[wasm_bindgen]
pub struct SaveCycle {
    coordinator: SaveCycleCoordinator,
}

#[wasm_bindgen]
impl SaveCycle {
    #[wasm_bindgen(constructor)]
    pub fn new(config: StripConfig) -> SaveCycle {
        console_error_panic_hook::set_once();

        SaveCycle {
            coordinator: SaveCycleCoordinator::new(config.into()),
        }
    }

    /// Strip the qualifying regions (a `RegionInput[]`).
    ///
    /// Returns one entry per region: the text to write back, or `undefined` if the region was
    /// skipped or already clean.
    #[wasm_bindgen(js_name = beforeSave)]
    pub fn before_save(&mut self, regions: JsValue) -> Result<JsValue, JsValue> {
        let regions: Vec<RegionInput> = from_js(regions)?;
        let mut doc: Vec<HostRegion> = regions
            .into_iter()
            .map(|r| {
                let selections = r.selections.into_iter().map(Into::into).collect();
                HostRegion::new(r.kind, r.text, selections)
            })
            .collect();

        self.coordinator.on_before_save(&mut doc);

        let texts: Vec<Option<String>> = doc.into_iter().map(|r| r.new_text).collect();
        to_js(&texts)
    }

    /// Hand back the selections captured by `beforeSave`, given the kinds of the document's
    /// regions after the save (a `RegionKind[]`).
    ///
    /// Returns one entry per region: its selections, or `undefined` if it has none to restore.
    #[wasm_bindgen(js_name = afterSave)]
    pub fn after_save(&mut self, kinds: JsValue) -> Result<JsValue, JsValue> {
        let kinds: Vec<RegionKind> = from_js(kinds)?;
        let mut doc: Vec<HostRegion> = kinds
            .into_iter()
            .map(|kind| HostRegion::new(kind, String::new(), Vec::new()))
            .collect();

        self.coordinator.on_after_save(&mut doc);

        let selections: Vec<Option<Vec<Selection>>> = doc
            .into_iter()
            .map(|r| r.restored.map(|s| s.into_iter().map(Into::into).collect()))
            .collect();
        to_js(&selections)
    }

    /// Returns true between `beforeSave` and `afterSave`.
    #[wasm_bindgen(getter, js_name = isCaptured)]
    pub fn is_captured(&self) -> bool {
        self.coordinator.is_captured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(start: usize, end: usize) -> Selection {
        Selection { start, end }
    }

    fn offsets(out: &RemapOutput) -> Vec<(usize, usize)> {
        out.selections.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    /// Offsets past the end clamp instead of failing the call.
    fn remap_clamps_out_of_bounds_offsets() {
        let out = remap_selections("ab  ", &[sel(2, 99), sel(50, 50)], StripConfig::default());
        assert_eq!(out.text, "ab");
        assert_eq!(offsets(&out), vec![(2, 2), (2, 2)]);
        assert_eq!(out.removed, 2);
    }

    #[test]
    /// Offsets are UTF-16 units and "\r\n" lines are stripped by default.
    fn remap_defaults_match_javascript_strings() {
        let out = remap_selections("🙂 \r\nx", &[sel(3, 3), sel(5, 6)], StripConfig::default());
        assert_eq!(out.text, "🙂\r\nx");
        assert_eq!(offsets(&out), vec![(2, 2), (4, 5)]);
    }

    #[test]
    fn save_cycle_regions_record_writes() {
        let mut doc = vec![
            HostRegion::new(RegionKind::Code, "a  \n".to_string(), vec![(3, 3).into()]),
            HostRegion::new(RegionKind::Markup, "b  \n".to_string(), Vec::new()),
        ];
        let mut coordinator = SaveCycleCoordinator::new(StripConfig::default().into());
        coordinator.on_before_save(&mut doc);
        assert_eq!(doc[0].new_text.as_deref(), Some("a\n"));
        assert_eq!(doc[1].new_text, None);

        let mut after = vec![
            HostRegion::new(RegionKind::Code, String::new(), Vec::new()),
            HostRegion::new(RegionKind::Markup, String::new(), Vec::new()),
        ];
        coordinator.on_after_save(&mut after);
        assert_eq!(after[0].restored, Some(vec![SelectionInner::cursor(1)]));
        assert_eq!(after[1].restored, None);
    }
}
