use proptest::prelude::*;
use trim_on_save::{Selection, StripConfig, remap, strip_trailing_whitespace};

/// Short texts dense in spaces, tabs, and line breaks, with some multi-byte chars.
fn text_with_trailing_whitespace() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!['a', 'b', ' ', ' ', '\t', '\n', '\n', '\r', 'é', '🙂']),
        0..64,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Sorted selections built from pairs of raw offsets, clamped to `len` chars.
fn selections_for(len: usize, raw: &[usize]) -> Vec<Selection> {
    let mut offsets: Vec<usize> = raw.iter().map(|o| o % (len + 1)).collect();
    offsets.sort_unstable();
    offsets
        .chunks(2)
        .map(|c| Selection::new(c[0], *c.last().unwrap()))
        .collect()
}

/// Count trailing whitespace without the regex.
fn trailing_whitespace_len(text: &str) -> usize {
    text.split(['\n', '\r'])
        .map(|line| line.len() - line.trim_end_matches([' ', '\t']).len())
        .sum()
}

fn endpoints(selections: &[Selection]) -> Vec<usize> {
    selections.iter().flat_map(|s| [s.start, s.end]).collect()
}

proptest! {
    #[test]
    fn prop_no_trailing_whitespace_is_noop(
        text in text_with_trailing_whitespace(),
        raw in prop::collection::vec(0usize..128, 0..8),
    ) {
        let cfg = StripConfig::default();
        let clean = strip_trailing_whitespace(&text, &cfg);
        let sels = selections_for(clean.chars().count(), &raw);

        let res = remap(&clean, &sels, &cfg);
        prop_assert_eq!(res.text, clean);
        prop_assert_eq!(res.selections, sels);
        prop_assert_eq!(res.removed, 0);
    }

    #[test]
    fn prop_remap_is_idempotent(
        text in text_with_trailing_whitespace(),
        raw in prop::collection::vec(0usize..128, 0..8),
    ) {
        let cfg = StripConfig::default();
        let sels = selections_for(text.chars().count(), &raw);

        let once = remap(&text, &sels, &cfg);
        let twice = remap(&once.text, &once.selections, &cfg);
        prop_assert_eq!(twice.text, once.text);
        prop_assert_eq!(twice.selections, once.selections);
    }

    #[test]
    fn prop_offsets_stay_in_bounds(
        text in text_with_trailing_whitespace(),
        raw in prop::collection::vec(0usize..128, 0..8),
    ) {
        let sels = selections_for(text.chars().count(), &raw);
        let res = remap(&text, &sels, &StripConfig::default());
        let len = res.text.chars().count();
        for offset in endpoints(&res.selections) {
            prop_assert!(offset <= len, "offset {} > len {}", offset, len);
        }
    }

    #[test]
    fn prop_length_accounting(text in text_with_trailing_whitespace()) {
        let res = remap(&text, &[], &StripConfig::default());
        let removed = trailing_whitespace_len(&text);
        prop_assert_eq!(text.chars().count() - res.text.chars().count(), removed);
        prop_assert_eq!(res.removed, removed);
    }

    #[test]
    fn prop_order_is_preserved(
        text in text_with_trailing_whitespace(),
        raw in prop::collection::vec(0usize..128, 0..8),
    ) {
        let sels = selections_for(text.chars().count(), &raw);
        let res = remap(&text, &sels, &StripConfig::default());
        let mapped = endpoints(&res.selections);
        prop_assert!(mapped.windows(2).all(|w| w[0] <= w[1]), "{:?}", mapped);
    }
}
