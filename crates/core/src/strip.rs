//! Trailing whitespace detection and removal.
//!
//! The transform removes every maximal run of spaces/tabs that is immediately followed by a line
//! terminator or by the end of the text. Terminators themselves are kept.
//!
//! Definitions:
//!
//! - A "run" is a maximal `[\t ]+` followed by a terminator or the end of the text.
//! - With [`LineEndings::Any`] (the default) the terminators are `\n`, `\r`, U+2028, and U+2029,
//!   the same set a JavaScript multi-line `$` stops at. So `"a \r\n"` becomes `"a\r\n"` and
//!   `"a \rb"` becomes `"a\rb"`.
//! - With [`LineEndings::Lf`] only `\n` terminates a line, and whitespace before a `\r` stays.
//!
//! Notes:
//!
//! - Other Unicode whitespace (NBSP, ideographic space, ...) is never touched.
//! - All offsets in this module are byte offsets.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    TrimError,
    edit::{Deletion, DeletionMap},
    offset::OffsetUnit,
};

/// Which characters end a line for the purpose of finding trailing whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEndings {
    /// `\n`, `\r`, U+2028, and U+2029 (and end-of-text) end a line.
    #[default]
    Any,
    /// Only `\n` (and end-of-text) end a line.
    Lf,
}

impl LineEndings {
    /// The compiled trailing-whitespace pattern for these line endings.
    ///
    /// Group 1 is the run; the terminator is matched but not deleted.
    fn pattern(self) -> &'static Regex {
        static ANY: OnceLock<Regex> = OnceLock::new();
        static LF: OnceLock<Regex> = OnceLock::new();
        match self {
            LineEndings::Any => ANY.get_or_init(|| {
                Regex::new(r"([\t ]+)(?:[\r\n\x{2028}\x{2029}]|\z)")
                    .expect("invalid trailing whitespace regex")
            }),
            LineEndings::Lf => LF.get_or_init(|| {
                Regex::new(r"([\t ]+)(?:\n|\z)").expect("invalid trailing whitespace regex")
            }),
        }
    }
}

/// Configuration options for stripping and remapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StripConfig {
    /// Which terminators end a line.
    pub line_endings: LineEndings,
    /// The unit selection offsets are counted in.
    pub offset_unit: OffsetUnit,
    /// If true, raw regions are stripped along with code regions.
    pub strip_raw_regions: bool,
}

impl StripConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TrimError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Find every trailing-whitespace run in `text`, in ascending order.
pub fn trailing_whitespace_runs(text: &str, config: &StripConfig) -> Vec<Deletion> {
    config
        .line_endings
        .pattern()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|run| Deletion {
            start: run.start(),
            end: run.end(),
        })
        .collect()
}

/// Strip trailing whitespace from every line of `text`.
pub fn strip_trailing_whitespace(text: &str, config: &StripConfig) -> String {
    let (out, _) = rewrite(text, config);
    out
}

/// Collect the deletions for `text`, apply them, and return `(output, deletions)`.
///
/// This is the shared core used by [`strip_trailing_whitespace`] and [`crate::remap`].
pub(crate) fn rewrite(text: &str, config: &StripConfig) -> (String, DeletionMap) {
    let map = DeletionMap::new(text.len(), trailing_whitespace_runs(text, config));
    if map.is_empty() {
        return (text.to_owned(), map);
    }
    (map.apply(text), map)
}
