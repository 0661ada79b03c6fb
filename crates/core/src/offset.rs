//! Offset unit and line/column indexing utilities.
//!
//! Hosts count positions in different units: native Rust code uses UTF-8 bytes, most editors use
//! Unicode scalar values, and JavaScript hosts use UTF-16 code units. This module provides a fast
//! mapping between:
//!
//! - absolute **byte offsets** into a UTF-8 `&str` (the model the rest of the crate works in),
//! - absolute **unit offsets** in the host's [`OffsetUnit`], and
//! - [`Position`]s, where `column` is measured in the same unit.
//!
//! Per-line indexes store checkpoints (every N chars) so conversions avoid rescanning from the
//! line start. Offsets/columns that fall inside a multi-unit character are clamped to the start
//! of that character.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::TrimError;

/// The unit offsets and columns are counted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    /// UTF-8 bytes.
    Byte,
    /// Unicode scalar values.
    #[default]
    Char,
    /// UTF-16 code units.
    Utf16,
}

impl OffsetUnit {
    /// Returns how many units `ch` occupies.
    pub fn len_of(self, ch: char) -> usize {
        match self {
            OffsetUnit::Byte => ch.len_utf8(),
            OffsetUnit::Char => 1,
            OffsetUnit::Utf16 => ch.len_utf16(),
        }
    }

    /// Returns the length of `s` in this unit.
    pub fn len_of_str(self, s: &str) -> usize {
        match self {
            OffsetUnit::Byte => s.len(),
            OffsetUnit::Char => s.chars().count(),
            OffsetUnit::Utf16 => s.encode_utf16().count(),
        }
    }
}

/// A zero-based line/column position. `column` is counted in the index's [`OffsetUnit`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Compute the byte offsets where each line starts.
///
/// The returned vector always includes `0` (first line) and then `i+1` for every `\n` byte at
/// index `i`.
pub(crate) fn compute_line_starts(s: &str) -> Vec<usize> {
    let mut starts = vec![0usize];
    for (i, b) in s.as_bytes().iter().copied().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// A precomputed offset index for an entire string.
///
/// Notes:
///
/// - Lines are considered to end before the line terminator. If the source uses CRLF (`\r\n`),
///   the `\r` is also excluded from the line (but still counts toward absolute offsets).
/// - All byte offsets are absolute offsets into the original `&str`.
#[derive(Debug, Clone)]
pub struct OffsetIndex<'a> {
    s: &'a str,
    unit: OffsetUnit,
    line_starts: Vec<usize>,
    lines: Vec<LineIndex>,
    /// Total length of `s` in `unit`.
    len: usize,
}

impl<'a> OffsetIndex<'a> {
    /// Build an index for `s`, counting in `unit`.
    pub fn new(s: &'a str, unit: OffsetUnit) -> Self {
        let line_starts = compute_line_starts(s);
        let mut lines: Vec<LineIndex> = Vec::with_capacity(line_starts.len());
        let mut unit_start = 0usize;
        for (i, &start) in line_starts.iter().enumerate() {
            let next = line_starts.get(i + 1).copied().unwrap_or(s.len());
            let mut content_end = if next > start && s.as_bytes().get(next - 1) == Some(&b'\n') {
                next - 1
            } else {
                next
            };
            // If the input is CRLF, also exclude the '\r' so it doesn't count toward columns.
            if content_end > start && s.as_bytes().get(content_end - 1) == Some(&b'\r') {
                content_end -= 1;
            }
            let line = LineIndex::new(s, unit, start, content_end, next, unit_start);
            // Terminator bytes are ASCII, so they are one unit each.
            unit_start += line.content_len() + (next - content_end);
            lines.push(line);
        }
        Self {
            s,
            unit,
            line_starts,
            lines,
            len: unit_start,
        }
    }

    /// Total length of the indexed string in this index's unit.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the indexed string is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of lines (a trailing `\n` starts a final empty line).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Return the 0-based line index that contains `byte`.
    ///
    /// If `byte` is beyond the end of the string, this returns the final line.
    pub fn line_for_byte(&self, byte: usize) -> usize {
        // Find the last line start <= byte.
        match self.line_starts.binary_search_by(|&probe| {
            if probe <= byte {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        }
    }

    /// Convert an absolute byte offset into an absolute unit offset.
    ///
    /// Bytes past the end clamp to the end; bytes inside a multi-byte sequence clamp to the start
    /// of that character.
    pub fn byte_to_offset(&self, byte: usize) -> usize {
        let byte = byte.min(self.s.len());
        let li = &self.lines[self.line_for_byte(byte)];
        if byte >= li.content_end {
            return li.unit_start + li.content_len() + (byte - li.content_end);
        }
        li.unit_start + li.byte_to_col(self.s, self.unit, byte)
    }

    /// Convert an absolute unit offset into an absolute byte offset.
    ///
    /// Offsets past the end clamp to the end of the string.
    pub fn offset_to_byte(&self, offset: usize) -> usize {
        if offset >= self.len {
            return self.s.len();
        }
        // Find the last line whose unit start is <= offset.
        let line = match self.lines.binary_search_by(|l| {
            if l.unit_start <= offset {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        };
        let li = &self.lines[line];
        let rel = offset - li.unit_start;
        if rel <= li.content_len() {
            li.col_to_byte(self.s, self.unit, rel)
        } else {
            (li.content_end + (rel - li.content_len())).min(li.next)
        }
    }

    /// Snap `offset` to the nearest character boundary at or before it, clamped to the length.
    pub fn clamp_offset(&self, offset: usize) -> usize {
        self.byte_to_offset(self.offset_to_byte(offset))
    }

    /// Convert an absolute byte offset into a [`Position`].
    ///
    /// Bytes pointing at a line terminator map to the end of that line.
    pub fn byte_to_position(&self, byte: usize) -> Position {
        let line = self.line_for_byte(byte);
        let column = self.lines[line].byte_to_col(self.s, self.unit, byte);
        Position { line, column }
    }

    /// Convert an absolute unit offset into a [`Position`].
    pub fn offset_to_position(&self, offset: usize) -> Position {
        self.byte_to_position(self.offset_to_byte(offset))
    }

    /// Convert a [`Position`] into an absolute unit offset.
    ///
    /// - Out-of-range `line` returns [`TrimError::InvalidPosition`].
    /// - Columns beyond the line length clamp to the line end.
    /// - Columns inside a multi-unit character clamp to the start of that character.
    pub fn position_to_offset(&self, position: Position) -> Result<usize, TrimError> {
        let li = self.lines.get(position.line).ok_or(TrimError::InvalidPosition {
            line: position.line,
            column: position.column,
        })?;
        let byte = li.col_to_byte(self.s, self.unit, position.column);
        Ok(self.byte_to_offset(byte))
    }
}

/// Per-line column index.
///
/// This stores column checkpoints for a single line slice `s[start..content_end]`, which
/// excludes the line terminator (`\n`) and, for CRLF inputs, also the preceding `\r`.
#[derive(Debug, Clone)]
struct LineIndex {
    /// Absolute byte offset (inclusive) of the line start.
    start: usize,
    /// Absolute byte offset (exclusive) of the line content.
    content_end: usize,
    /// Absolute byte offset of the next line start (or the string length).
    next: usize,
    /// Absolute unit offset of `start`.
    unit_start: usize,
    /// Sparse checkpoints mapping byte offsets to columns.
    checkpoints: Vec<Checkpoint>,
}

impl LineIndex {
    /// Number of Unicode scalar values between checkpoints.
    ///
    /// Higher values reduce memory but increase worst-case scan length for a single conversion.
    const CHECKPOINT_STRIDE_CHARS: usize = 64;

    fn new(
        s: &str,
        unit: OffsetUnit,
        start: usize,
        content_end: usize,
        next: usize,
        unit_start: usize,
    ) -> Self {
        let mut checkpoints: Vec<Checkpoint> = vec![Checkpoint {
            byte: start,
            col: 0,
        }];

        let mut col: usize = 0;
        let mut char_count: usize = 0;

        for (rel, ch) in s[start..content_end].char_indices() {
            col += unit.len_of(ch);
            char_count += 1;

            if char_count.is_multiple_of(Self::CHECKPOINT_STRIDE_CHARS) {
                checkpoints.push(Checkpoint {
                    byte: start + rel + ch.len_utf8(),
                    col,
                });
            }
        }

        // Always include the line end boundary.
        if checkpoints.last().map(|c| c.byte).unwrap_or(start) != content_end {
            checkpoints.push(Checkpoint {
                byte: content_end,
                col,
            });
        }

        Self {
            start,
            content_end,
            next,
            unit_start,
            checkpoints,
        }
    }

    /// Length of the line content in units.
    fn content_len(&self) -> usize {
        self.checkpoints.last().map(|c| c.col).unwrap_or(0)
    }

    /// Convert an absolute byte offset into a column within this line.
    fn byte_to_col(&self, s: &str, unit: OffsetUnit, abs_byte: usize) -> usize {
        if abs_byte <= self.start {
            return 0;
        }
        let clamped = abs_byte.min(self.content_end);

        let cp_idx = match self.checkpoints.binary_search_by(|c| c.byte.cmp(&clamped)) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        };
        let cp = self.checkpoints[cp_idx];

        let mut cur_byte = cp.byte;
        let mut cur_col = cp.col;

        let line = &s[cp.byte..self.content_end];
        for ch in line.chars() {
            let next_byte = cur_byte + ch.len_utf8();
            if next_byte > clamped {
                // `clamped` is at or inside this character.
                break;
            }
            cur_col += unit.len_of(ch);
            cur_byte = next_byte;
        }

        cur_col
    }

    /// Convert a column within this line into an absolute byte offset.
    ///
    /// Columns beyond the line length clamp to the end of the line content.
    fn col_to_byte(&self, s: &str, unit: OffsetUnit, col: usize) -> usize {
        if col == 0 {
            return self.start;
        }
        if col >= self.content_len() {
            return self.content_end;
        }

        // Find the last checkpoint with col <= target.
        let cp_idx = match self.checkpoints.binary_search_by(|c| c.col.cmp(&col)) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        };
        let cp = self.checkpoints[cp_idx];

        let mut cur_byte = cp.byte;
        let mut cur_col = cp.col;

        for ch in s[cp.byte..self.content_end].chars() {
            let len = unit.len_of(ch);
            if cur_col + len > col {
                // Target falls inside this character. Clamp to its start.
                break;
            }
            cur_col += len;
            cur_byte += ch.len_utf8();
        }

        cur_byte
    }
}

/// A sparse checkpoint inside a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Checkpoint {
    /// Absolute byte offset into the original string.
    byte: usize,
    /// Column at `byte`.
    col: usize,
}
