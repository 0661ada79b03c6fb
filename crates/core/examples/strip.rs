use std::{fs, path::PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use trim_on_save::{
    LineEndings, OffsetUnit as OffsetUnitInner, Selection, StripConfig, markup, try_remap,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OffsetUnit {
    Byte,
    Char,
    Utf16,
}

impl From<OffsetUnit> for OffsetUnitInner {
    fn from(value: OffsetUnit) -> Self {
        match value {
            OffsetUnit::Byte => OffsetUnitInner::Byte,
            OffsetUnit::Char => OffsetUnitInner::Char,
            OffsetUnit::Utf16 => OffsetUnitInner::Utf16,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "strip")]
#[command(
    about = "Strip trailing whitespace and remap cursors and selections into the result",
    long_about = None
)]
struct Args {
    /// Path to the text file to transform
    input: PathBuf,

    /// Output path for the stripped text (defaults to stdout)
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Cursor offset to remap (repeatable)
    #[arg(long, short)]
    cursor: Vec<usize>,

    /// Selection to remap, as START:END (repeatable)
    #[arg(long, short, value_parser = parse_selection)]
    selection: Vec<Selection>,

    /// Read cursors and selections from markers in the input (‸ and ⟨...⟩)
    #[arg(long, short)]
    markup: bool,

    /// Only treat "\n" as a line terminator (keep whitespace before "\r")
    #[arg(long)]
    lf_only: bool,

    /// Unit that offsets are counted in
    #[arg(long, value_enum, default_value_t = OffsetUnit::Char)]
    unit: OffsetUnit,
}

fn parse_selection(s: &str) -> Result<Selection, String> {
    let (start, end) = s
        .split_once(':')
        .ok_or_else(|| format!("expected START:END, got {s:?}"))?;
    let start = start.parse().map_err(|e| format!("invalid start: {e}"))?;
    let end = end.parse().map_err(|e| format!("invalid end: {e}"))?;
    Ok(Selection::new(start, end))
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let source = fs::read_to_string(&args.input)?;

    let cfg = StripConfig {
        line_endings: if args.lf_only {
            LineEndings::Lf
        } else {
            LineEndings::Any
        },
        offset_unit: args.unit.into(),
        ..StripConfig::default()
    };
    if args.markup && cfg.offset_unit != OffsetUnitInner::Char {
        return Err("--markup only supports --unit char".into());
    }

    let (text, mut selections) = if args.markup {
        markup::parse(&source)?
    } else {
        (source, Vec::new())
    };
    selections.extend(args.cursor.iter().copied().map(Selection::cursor));
    selections.extend(args.selection.iter().copied());

    let res = try_remap(&text, &selections, &cfg)?;

    let out_text = if args.markup {
        markup::render(&res.text, &res.selections)
    } else {
        res.text
    };
    match &args.out {
        None => print!("{out_text}"),
        Some(out) => fs::write(out, out_text)?,
    }

    eprintln!("removed {} character(s)", res.removed);
    if !args.markup {
        for (before, after) in selections.iter().zip(&res.selections) {
            eprintln!(
                "  {}:{} -> {}:{}",
                before.start, before.end, after.start, after.end
            );
        }
    }

    Ok(())
}
