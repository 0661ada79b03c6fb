//! Deletion model and offset mapping.
//!
//! This module defines [`Deletion`], a byte range of the input removed by the strip transform,
//! and [`DeletionMap`], which answers "how many bytes were removed before offset O" and rebuilds
//! the output text.
//!
//! Key ideas:
//!
//! - Internal offsets are byte-based. Every deleted byte is an ASCII space or tab, so a count of
//!   deleted bytes is also a count of deleted chars or UTF-16 units.
//! - An offset inside a deleted run (or at either edge of it) maps to the position where the
//!   run's terminator lands in the output.
//!
//! Invariants:
//!
//! - `deletions` must be sorted by ascending `start` and must not overlap. Regex matches from
//!   [`crate::strip`] satisfy both.

/// A byte range `[start, end)` of the input that is removed from the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deletion {
    /// Start byte offset (inclusive) in the input.
    pub start: usize,
    /// End byte offset (exclusive) in the input.
    pub end: usize,
}

impl Deletion {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Sorted deletions plus prefix sums for `O(log n)` offset mapping.
#[derive(Debug, Clone)]
pub struct DeletionMap {
    input_len: usize,
    deletions: Vec<Deletion>,
    /// `removed_prefix[i]` is the number of bytes removed by `deletions[..i]`.
    removed_prefix: Vec<usize>,
}

impl DeletionMap {
    /// Build a map over an input of `input_len` bytes.
    pub fn new(input_len: usize, deletions: Vec<Deletion>) -> Self {
        debug_assert!(
            deletions
                .windows(2)
                .all(|w| w[0].end <= w[1].start && w[0].start <= w[0].end),
            "deletions must be sorted and non-overlapping"
        );
        debug_assert!(deletions.last().is_none_or(|d| d.end <= input_len));

        let mut removed_prefix = Vec::with_capacity(deletions.len() + 1);
        let mut removed = 0usize;
        removed_prefix.push(0);
        for d in &deletions {
            removed += d.len();
            removed_prefix.push(removed);
        }

        Self {
            input_len,
            deletions,
            removed_prefix,
        }
    }

    pub fn deletions(&self) -> &[Deletion] {
        &self.deletions
    }

    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty()
    }

    /// Total number of bytes removed.
    pub fn total_removed(&self) -> usize {
        self.removed_prefix.last().copied().unwrap_or(0)
    }

    /// Length of the output in bytes.
    pub fn output_len(&self) -> usize {
        self.input_len - self.total_removed()
    }

    /// Number of bytes removed strictly before `offset`.
    ///
    /// A deletion straddling `offset` only contributes its part before `offset`, so the mapped
    /// position of anything inside a deleted run collapses to the run's start.
    pub fn removed_before(&self, offset: usize) -> usize {
        let offset = offset.min(self.input_len);
        // Deletions [..i] start before `offset`.
        let i = self.deletions.partition_point(|d| d.start < offset);
        if i == 0 {
            return 0;
        }
        let d = self.deletions[i - 1];
        self.removed_prefix[i - 1] + (offset.min(d.end) - d.start)
    }

    /// Map an input byte offset to the corresponding output byte offset.
    pub fn map_offset(&self, offset: usize) -> usize {
        let offset = offset.min(self.input_len);
        offset - self.removed_before(offset)
    }

    /// Rebuild the output by copying every byte outside the deletions.
    pub fn apply(&self, input: &str) -> String {
        debug_assert_eq!(input.len(), self.input_len);

        let mut out = String::with_capacity(self.output_len());
        let mut cursor = 0usize;
        for d in &self.deletions {
            // Copy unchanged bytes before the deletion.
            if cursor < d.start {
                out.push_str(&input[cursor..d.start]);
            }
            cursor = d.end;
        }

        // Copy any remaining unchanged bytes after the last deletion.
        if cursor < input.len() {
            out.push_str(&input[cursor..]);
        }
        out
    }
}
