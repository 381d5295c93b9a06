//! pdftoc CLI - PDF outline extraction and labeling tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use pdftoc::{DetectorConfig, LabeledOutline, Labeler, Outline, OutlineExtractor, RuleSet};

#[derive(Parser)]
#[command(name = "pdftoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract structured outlines from PDF documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract outlines from PDF files or directories of PDF files
    Extract {
        /// Input PDF files or directories
        #[arg(value_name = "PATH", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (next to each input if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Also run the labeling pass on each extracted outline
        #[arg(short, long)]
        label: bool,

        /// Fail a document on the first undecodable page instead of
        /// skipping it
        #[arg(long)]
        strict: bool,

        /// Minimum detector score for heading acceptance (0.0-1.0)
        #[arg(long, value_name = "SCORE")]
        threshold: Option<f32>,
    },

    /// Label previously extracted outline JSON files, rewriting them in
    /// place
    Label {
        /// Input outline JSON files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (rewrite each input in place if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let failures = match cli.command {
        Commands::Extract {
            inputs,
            output,
            label,
            strict,
            threshold,
        } => cmd_extract(&inputs, output.as_deref(), label, strict, threshold),
        Commands::Label { inputs, output } => cmd_label(&inputs, output.as_deref()),
    };

    if failures > 0 {
        eprintln!(
            "{}: {} document(s) failed",
            "Error".red().bold(),
            failures
        );
        std::process::exit(1);
    }
}

/// Extract every input in parallel; failures are reported per document and
/// never abort the rest of the batch. Returns the failure count.
fn cmd_extract(
    inputs: &[PathBuf],
    output: Option<&Path>,
    label: bool,
    strict: bool,
    threshold: Option<f32>,
) -> usize {
    if let Some(dir) = output {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("{}: {}: {}", "Error".red().bold(), dir.display(), e);
            return inputs.len();
        }
    }

    // The rule table is static configuration; a malformed pattern is fatal
    // before any document is touched.
    let labeler = match build_labeler(label) {
        Ok(labeler) => labeler,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            return inputs.len();
        }
    };

    let mut extractor = OutlineExtractor::new();
    if strict {
        extractor = extractor.strict();
    }
    if let Some(t) = threshold {
        extractor = extractor.with_detector_config(DetectorConfig::new().with_accept_threshold(t));
    }

    let files = match collect_pdfs(inputs) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            return inputs.len();
        }
    };

    let results: Vec<Result<(), String>> = files
        .par_iter()
        .map(|input| extract_one(input, output, &extractor, labeler.as_ref()))
        .collect();

    summarize(&files, &results)
}

fn extract_one(
    input: &Path,
    output: Option<&Path>,
    extractor: &OutlineExtractor,
    labeler: Option<&Labeler>,
) -> Result<(), String> {
    let outline = extractor
        .extract(input)
        .map_err(|e| format!("{}: {}", input.display(), e))?;

    let (json, suffix) = match labeler {
        Some(labeler) => {
            let labeled = labeler.label(&outline);
            (
                labeled
                    .to_json()
                    .map_err(|e| format!("{}: {}", input.display(), e))?,
                "labeled.json",
            )
        }
        None => (
            outline
                .to_json()
                .map_err(|e| format!("{}: {}", input.display(), e))?,
            "json",
        ),
    };

    let dest = output_path(input, output, suffix);
    fs::write(&dest, json).map_err(|e| format!("{}: {}", dest.display(), e))?;

    println!(
        "{} {} ({} headings) -> {}",
        "Extracted".green(),
        input.display(),
        outline.len(),
        dest.display()
    );
    Ok(())
}

/// Label previously persisted outline files in parallel. Returns the
/// failure count.
fn cmd_label(inputs: &[PathBuf], output: Option<&Path>) -> usize {
    if let Some(dir) = output {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("{}: {}: {}", "Error".red().bold(), dir.display(), e);
            return inputs.len();
        }
    }

    let labeler = match Labeler::with_builtin_rules() {
        Ok(labeler) => labeler,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            return inputs.len();
        }
    };

    let results: Vec<Result<(), String>> = inputs
        .par_iter()
        .map(|input| label_one(input, output, &labeler))
        .collect();

    summarize(inputs, &results)
}

fn label_one(input: &Path, output: Option<&Path>, labeler: &Labeler) -> Result<(), String> {
    let data = fs::read_to_string(input).map_err(|e| format!("{}: {}", input.display(), e))?;
    let outline = Outline::from_json(&data).map_err(|e| format!("{}: {}", input.display(), e))?;

    let labeled: LabeledOutline = labeler.label(&outline);
    let json = labeled
        .to_json()
        .map_err(|e| format!("{}: {}", input.display(), e))?;

    // Without an output directory the input is rewritten in place.
    let dest = match output {
        Some(dir) => dir.join(input.file_name().unwrap_or_default()),
        None => input.to_path_buf(),
    };
    fs::write(&dest, json).map_err(|e| format!("{}: {}", dest.display(), e))?;

    println!(
        "{} {} -> {}",
        "Labeled".green(),
        input.display(),
        dest.display()
    );
    Ok(())
}

/// Expand directory inputs into their PDF files; plain files pass through.
fn collect_pdfs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let entries =
                fs::read_dir(input).map_err(|e| format!("{}: {}", input.display(), e))?;
            let mut pdfs: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| {
                    p.extension()
                        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                        .unwrap_or(false)
                })
                .collect();
            pdfs.sort();
            files.extend(pdfs);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// `<stem>.<suffix>` in the output directory, or next to the input.
fn output_path(input: &Path, output: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let name = format!("{stem}.{suffix}");
    match output {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

fn summarize(inputs: &[PathBuf], results: &[Result<(), String>]) -> usize {
    let mut failures = 0;
    for result in results {
        if let Err(e) = result {
            eprintln!("{}: {}", "Failed".red(), e);
            failures += 1;
        }
    }

    let ok = inputs.len() - failures;
    println!(
        "\n{} {}/{} documents processed",
        "Done!".green().bold(),
        ok,
        inputs.len()
    );
    failures
}

/// Build a labeler only when labeling was requested.
fn build_labeler(enabled: bool) -> pdftoc::Result<Option<Labeler>> {
    if enabled {
        Ok(Some(Labeler::new(RuleSet::builtin()?)))
    } else {
        Ok(None)
    }
}
