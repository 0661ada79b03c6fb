#![no_main]

use libfuzzer_sys::fuzz_target;
use trim_on_save::{
    Buffer, EditableRegion, Notebook, RegionKind, SaveCycleCoordinator, Selection, StripConfig,
    strip_trailing_whitespace,
};

/// Cells as `[kind, text, selections]` triples.
type Cells = Vec<(RegionKind, String, Vec<Selection>)>;

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 64 * 1024 {
        &data[..64 * 1024]
    } else {
        data
    };

    // Structured input when the data is JSON; otherwise split raw text into code cells.
    let cells: Cells = serde_json::from_slice(data).unwrap_or_else(|_| {
        String::from_utf8_lossy(data)
            .split('\u{1}')
            .map(|text| {
                let end = text.chars().count();
                (RegionKind::Code, text.to_owned(), vec![Selection::cursor(end)])
            })
            .collect()
    });

    for strip_raw_regions in [false, true] {
        let cfg = StripConfig {
            strip_raw_regions,
            ..StripConfig::default()
        };
        let mut nb = Notebook::new(cells.iter().map(|(kind, text, selections)| {
            Buffer::new(*kind, text.as_str()).with_selections(selections.iter().copied())
        }));
        let mut coordinator = SaveCycleCoordinator::new(cfg);

        let before = coordinator.on_before_save(&mut nb);
        let after = coordinator.on_after_save(&mut nb);
        assert_eq!(before.regions_captured, after.regions_restored);
        assert_eq!(after.regions_missing, 0);
        assert_eq!(after.sets_discarded, 0);
        assert!(coordinator.session().is_empty());

        for ((kind, text, _), cell) in cells.iter().zip(nb.cells()) {
            let expected = if kind.qualifies(&cfg) {
                strip_trailing_whitespace(text, &cfg)
            } else {
                text.clone()
            };
            assert_eq!(cell.text(), expected.as_str());
        }
    }
});
