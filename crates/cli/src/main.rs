//! CLI tool for extracting text from legacy Word and PowerPoint files.

use anyhow::{Context, Result};
use clap::Parser;
use oletext::{ExtractedDocument, TextExtractor, TextNormalizer};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default `--max-size`: 64 MiB.
const DEFAULT_MAX_SIZE: u64 = 64 * 1024 * 1024;

/// Extract plain text from .doc and .ppt files.
#[derive(Parser, Debug)]
#[command(name = "oletext")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file(s) (.doc or .ppt)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print output to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// Collapse whitespace and blank lines in the extracted text
    #[arg(short, long)]
    normalize: bool,

    /// Emit a JSON document (filename, format, text) instead of plain text
    #[arg(long)]
    json: bool,

    /// Refuse files larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    max_size: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let failures = run(&args);
    if failures > 0 {
        anyhow::bail!("{} of {} file(s) failed", failures, args.input.len());
    }

    Ok(())
}

/// Process every input in turn and return how many failed. A failure on
/// one file, whether extracting or writing, does not stop the rest.
fn run(args: &Args) -> usize {
    let normalizer = args.normalize.then(TextNormalizer::new);
    let mut failures = 0;

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        let result = process_file(input_path, args, normalizer.as_ref())
            .and_then(|doc| render(&doc, args.json))
            .and_then(|output| emit(input_path, &output, args));

        if let Err(e) = result {
            failures += 1;
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
        }
    }

    failures
}

/// Print rendered output or write it next to the input (or into `--output`).
fn emit(input_path: &Path, output: &str, args: &Args) -> Result<()> {
    if args.print {
        print!("{}", output);
        return Ok(());
    }

    let output_path = get_output_path(input_path, args.output.as_ref(), args.json)?;
    write_output(&output_path, output)?;
    if args.verbose {
        eprintln!("Written to: {}", output_path.display());
    }
    Ok(())
}

/// Extract the text of a single file.
fn process_file(
    input_path: &Path,
    args: &Args,
    normalizer: Option<&TextNormalizer>,
) -> Result<ExtractedDocument> {
    let size = std::fs::metadata(input_path)
        .with_context(|| format!("Failed to stat {}", input_path.display()))?
        .len();
    if size > args.max_size {
        anyhow::bail!(
            "File is {} bytes, larger than the {} byte limit",
            size,
            args.max_size
        );
    }

    let data = std::fs::read(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    let filename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    if args.verbose {
        if let Ok(streams) = TextExtractor::stream_names(&data) {
            eprintln!("  Streams: {}", streams.join(", "));
        }
    }

    let mut doc = TextExtractor::from_bytes(&data, filename)
        .with_context(|| format!("Failed to extract text from {}", filename))?;

    if args.verbose {
        eprintln!(
            "  Extracted {} characters as {}",
            doc.text.chars().count(),
            doc.format.extension()
        );
    }

    if let Some(normalizer) = normalizer {
        doc.text = normalizer.normalize(&doc.text);
    }

    if doc.is_blank() {
        log::warn!("No text recovered from '{}'", filename);
    }

    Ok(doc)
}

/// Format a document for output.
fn render(doc: &ExtractedDocument, json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(doc).context("Failed to serialize document")?;
        out.push('\n');
        Ok(out)
    } else if doc.text.ends_with('\n') {
        Ok(doc.text.clone())
    } else {
        Ok(format!("{}\n", doc.text))
    }
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: Option<&PathBuf>, json: bool) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.{}", stem, if json { "json" } else { "txt" });

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => {
            if let Some(parent) = input_path.parent() {
                parent.join(output_filename)
            } else {
                PathBuf::from(output_filename)
            }
        }
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
