use std::path::PathBuf;

use trim_on_save::{StripConfig, markup, remap};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name)).expect("read fixture")
}

/// Strip marked-up text with the default config and render the result with markers.
fn strip_marked(marked: &str) -> String {
    let (text, selections) = markup::parse(marked).expect("fixture markup must parse");
    let res = remap(&text, &selections, &StripConfig::default());
    markup::render(&res.text, &res.selections)
}

const CASES: [&str; 13] = [
    "blank_lines",
    "crlf",
    "cursor_after_run",
    "empty",
    "end_of_text",
    "multi_cursor",
    "no_trailing",
    "python_cell",
    "selection_from_run",
    "selection_in_run",
    "selection_spanning",
    "tabs",
    "unicode",
];

#[test]
fn fixtures_match_expected_output() {
    for name in CASES {
        let input = read_fixture(&format!("{name}.txt"));
        let expected = read_fixture(&format!("{name}.out.txt"));

        let actual = strip_marked(&input);
        assert_eq!(actual, expected, "fixture mismatch: {name}");

        // Idempotence: once stripped, stripping again should not change.
        let actual2 = strip_marked(&actual);
        assert_eq!(actual2, actual, "not idempotent: {name}");
    }
}

#[test]
fn fixture_outputs_have_no_trailing_whitespace() {
    for name in CASES {
        let expected = read_fixture(&format!("{name}.out.txt"));
        let (text, _) = markup::parse(&expected).unwrap();
        for (i, line) in text.split(['\n', '\r']).enumerate() {
            assert_eq!(
                line,
                line.trim_end_matches([' ', '\t']),
                "{name}.out.txt line {i} has trailing whitespace"
            );
        }
    }
}
