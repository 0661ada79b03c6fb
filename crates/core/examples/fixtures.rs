use std::{fs, path::PathBuf};

use clap::Parser;
use trim_on_save::{StripConfig, markup, remap};

#[derive(Parser, Debug)]
#[command(name = "fixtures")]
#[command(about = "Create or validate fixture files", long_about = None)]
struct Args {
    /// Write fixtures instead of validating them
    #[arg(long, short)]
    write: bool,

    /// Path to the fixtures directory (defaults to "./fixtures")
    #[arg(long, default_value = "fixtures")]
    dir: PathBuf,
}

/// Strip a marked-up fixture and render the expected output with markers.
fn strip_marked(source: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let (text, selections) = markup::parse(source)?;
    let res = remap(&text, &selections, &StripConfig::default());
    Ok(markup::render(&res.text, &res.selections))
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let mut input_files = Vec::new();
    for entry in fs::read_dir(&args.dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("invalid filename")?;

        // Skip .out. files and anything that is not a .txt input
        if filename.contains(".out.") || !filename.ends_with(".txt") {
            continue;
        }
        input_files.push(path);
    }

    input_files.sort();

    let out_path_for = |input: &PathBuf| input.with_extension("out.txt");

    if args.write {
        println!("Creating fixtures...");
        for input_path in &input_files {
            let out = strip_marked(&fs::read_to_string(input_path)?)?;
            let out_path = out_path_for(input_path);
            fs::write(&out_path, out)?;
            println!("  Created {}", out_path.display());
        }
        println!("Done creating {} fixtures.", input_files.len());
        return Ok(());
    }

    println!("Validating fixtures...");
    let mut mismatches = Vec::new();

    for input_path in &input_files {
        let filename = input_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("invalid filename")?;

        let out = strip_marked(&fs::read_to_string(input_path)?)?;
        let out_path = out_path_for(input_path);

        if !out_path.exists() {
            mismatches.push(format!(
                "{filename}: missing output file {}",
                out_path.display()
            ));
            continue;
        }
        if out != fs::read_to_string(&out_path)? {
            mismatches.push(format!("{filename}: output mismatch"));
            continue;
        }
        if strip_marked(&out)? != out {
            mismatches.push(format!("{filename}: not idempotent"));
            continue;
        }
        println!("  ✓ {filename}");
    }

    if !mismatches.is_empty() {
        eprintln!("\nValidation failed:");
        for mismatch in &mismatches {
            eprintln!("  ✗ {mismatch}");
        }
        return Err(format!("{} validation error(s)", mismatches.len()).into());
    }

    println!(
        "\nAll {} fixtures validated successfully!",
        input_files.len()
    );

    Ok(())
}
