//! Trailing whitespace stripping on save, with cursor and selection remapping.
//!
//! This crate removes runs of spaces/tabs that sit right before a line terminator (or the end of
//! the text) and moves every cursor and selection so it stays next to the same non-whitespace
//! content it was next to before the strip.
//!
//! Entry points:
//!
//! - [`remap`] contains the pure text + selection transform.
//! - [`coordinator`] drives the pre-save / post-save protocol for a document.
//!
//! Internals:
//!
//! - [`strip`] holds the trailing-whitespace pattern and the transform configuration.
//! - [`edit`] models the deletions the transform performs and maps offsets through them.
//! - [`offset`] converts between byte, char, and UTF-16 offsets and line/column positions.
//! - [`region`] defines the host-facing region/document traits and in-memory implementations.
//! - [`markup`] parses and renders the `‸`/`⟨⟩` selection notation used by fixtures.

pub mod coordinator;
pub mod edit;
pub mod markup;
pub mod offset;
pub mod region;
pub mod remap;
pub mod strip;

pub use coordinator::{AfterSaveReport, BeforeSaveReport, SaveCycleCoordinator, SaveSession};
pub use offset::{OffsetIndex, OffsetUnit, Position};
pub use region::{
    Buffer, Document, EditableRegion, LineColumnRegion, Notebook, PlainFile, RegionKind,
};
pub use remap::{RemapResult, Selection, remap, try_remap};
pub use strip::{LineEndings, StripConfig, strip_trailing_whitespace};

/// Errors that can occur while remapping or converting positions.
#[derive(thiserror::Error, Debug)]
pub enum TrimError {
    #[error("offset out of bounds at selection {index}: offset={offset} > len={len}")]
    OffsetOutOfBounds {
        index: usize,
        offset: usize,
        len: usize,
    },

    #[error("invalid position: line {line}, column {column}")]
    InvalidPosition { line: usize, column: usize },

    #[error("invalid selection markup: {0}")]
    InvalidMarkup(String),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}
