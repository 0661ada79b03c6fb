#![no_main]

use libfuzzer_sys::fuzz_target;
use trim_on_save::{LineEndings, OffsetUnit, Selection, StripConfig, remap};

const UNITS: [OffsetUnit; 3] = [OffsetUnit::Byte, OffsetUnit::Char, OffsetUnit::Utf16];
const LINE_ENDINGS: [LineEndings; 2] = [LineEndings::Any, LineEndings::Lf];

fuzz_target!(|data: &[u8]| {
    // Limit input size to keep the fuzzer fast and avoid OOM in pathological cases.
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    // The first 16 bytes seed up to 8 offsets; the rest is the text.
    let (seed, rest) = data.split_at(data.len().min(16));
    let text = String::from_utf8_lossy(rest);

    for &line_endings in &LINE_ENDINGS {
        for &offset_unit in &UNITS {
            let cfg = StripConfig {
                line_endings,
                offset_unit,
                ..StripConfig::default()
            };
            let len = offset_unit.len_of_str(&text);

            let mut offsets: Vec<usize> = seed
                .chunks(2)
                .map(|c| c.iter().fold(0usize, |acc, &b| acc * 256 + b as usize) % (len + 1))
                .collect();
            offsets.sort_unstable();
            let selections: Vec<Selection> = offsets
                .chunks(2)
                .map(|c| Selection::new(c[0], c[c.len() - 1]))
                .collect();

            let once = remap(&text, &selections, &cfg);
            let new_len = offset_unit.len_of_str(&once.text);
            assert_eq!(len - new_len, once.removed, "removed count must match length change");

            let mut prev = 0;
            for sel in &once.selections {
                assert!(sel.start <= new_len && sel.end <= new_len, "offset out of bounds");
                assert!(prev <= sel.start && sel.start <= sel.end, "selection order changed");
                prev = sel.end;
            }

            let twice = remap(&once.text, &once.selections, &cfg);
            assert_eq!(twice.text, once.text, "strip must be idempotent");
            assert_eq!(twice.selections, once.selections, "remap must be idempotent");
        }
    }
});
