//! Selection markup: text with cursors and selections drawn inline.
//!
//! - `‸` marks a bare cursor.
//! - `⟨` opens a selection and `⟩` closes it.
//!
//! Offsets produced by [`parse`] and consumed by [`render`] are char offsets
//! ([`crate::OffsetUnit::Char`]). Selections may not nest or overlap, and a cursor may not sit
//! inside a selection.

use crate::{TrimError, remap::Selection};

pub const CURSOR: char = '‸';
pub const OPEN: char = '⟨';
pub const CLOSE: char = '⟩';

/// Split marked-up text into plain text and selections (in order of their start).
pub fn parse(marked: &str) -> Result<(String, Vec<Selection>), TrimError> {
    let mut text = String::with_capacity(marked.len());
    let mut selections = Vec::new();
    let mut open: Option<usize> = None;
    let mut pos = 0usize;

    for ch in marked.chars() {
        match ch {
            CURSOR => {
                if let Some(start) = open {
                    return Err(TrimError::InvalidMarkup(format!(
                        "cursor at {pos} inside selection opened at {start}"
                    )));
                }
                selections.push(Selection::cursor(pos));
            }
            OPEN => {
                if let Some(start) = open {
                    return Err(TrimError::InvalidMarkup(format!(
                        "selection opened at {pos} inside selection opened at {start}"
                    )));
                }
                open = Some(pos);
            }
            CLOSE => {
                let start = open.take().ok_or_else(|| {
                    TrimError::InvalidMarkup(format!("unmatched {CLOSE} at {pos}"))
                })?;
                selections.push(Selection::new(start, pos));
            }
            _ => {
                text.push(ch);
                pos += 1;
            }
        }
    }

    if let Some(start) = open {
        return Err(TrimError::InvalidMarkup(format!(
            "selection opened at {start} is never closed"
        )));
    }
    Ok((text, selections))
}

/// Draw `selections` into `text`. Collapsed selections render as cursors.
pub fn render(text: &str, selections: &[Selection]) -> String {
    // (offset, rank, marker): closing markers sort before anything opening at the same offset.
    let mut markers: Vec<(usize, u8, char)> = Vec::with_capacity(selections.len() * 2);
    for sel in selections {
        if sel.is_cursor() {
            markers.push((sel.start, 1, CURSOR));
            continue;
        }
        let (lo, hi) = if sel.start < sel.end {
            (sel.start, sel.end)
        } else {
            (sel.end, sel.start)
        };
        markers.push((lo, 1, OPEN));
        markers.push((hi, 0, CLOSE));
    }
    // Stable, so markers of equal rank keep selection order.
    markers.sort_by_key(|&(offset, rank, _)| (offset, rank));

    let mut out = String::with_capacity(text.len() + markers.len() * CURSOR.len_utf8());
    let mut next = markers.iter().peekable();
    for (pos, ch) in text.chars().enumerate() {
        while let Some(&(_, _, marker)) = next.next_if(|m| m.0 <= pos) {
            out.push(marker);
        }
        out.push(ch);
    }
    for &(_, _, marker) in next {
        out.push(marker);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cursors_and_selections() {
        let (text, sels) = parse("a‸b⟨cd⟩e").unwrap();
        assert_eq!(text, "abcde");
        assert_eq!(sels, vec![Selection::cursor(1), Selection::new(2, 4)]);
    }

    #[test]
    fn parse_empty_selection_is_a_cursor() {
        let (_, sels) = parse("ab⟨⟩").unwrap();
        assert_eq!(sels, vec![Selection::cursor(2)]);
    }

    #[test]
    fn parse_rejects_malformed_markup() {
        for bad in ["⟨a⟨b⟩⟩", "a⟩", "⟨a", "⟨a‸⟩"] {
            assert!(
                matches!(parse(bad), Err(TrimError::InvalidMarkup(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn render_places_markers_by_char_offset() {
        let out = render("日本語\n", &[Selection::cursor(1), Selection::new(2, 4)]);
        assert_eq!(out, "日‸本⟨語\n⟩");
    }

    #[test]
    /// Adjacent selections close before the next one opens.
    fn render_adjacent_selections() {
        let out = render("abcd", &[Selection::new(0, 2), Selection::new(2, 4)]);
        assert_eq!(out, "⟨ab⟩⟨cd⟩");
    }

    #[test]
    fn render_reversed_selection_uses_min_and_max() {
        assert_eq!(render("abc", &[Selection::new(3, 1)]), "a⟨bc⟩");
    }

    #[test]
    fn parse_inverts_render() {
        let marked = "fn main() {⟨\n    x⟩\n}‸";
        let (text, sels) = parse(marked).unwrap();
        assert_eq!(render(&text, &sels), marked);
    }
}
