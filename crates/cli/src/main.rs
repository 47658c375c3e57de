//! # sheetdelta-cli
//!
//! Command-line interface for comparing two XLSX documents.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use sheetdelta_diff::options::parse_index_list;
use sheetdelta_diff::{compare_books, warm_up, CompareOptions};
use sheetdelta_sheet::Book;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// sheetdelta - structural diff for spreadsheet documents
#[derive(Parser)]
#[command(name = "sheetdelta")]
#[command(author, version, about = "Structural diff for XLSX documents", long_about = None)]
struct Cli {
    /// Old document
    #[arg(value_name = "OLD", required_unless_present = "warm_up")]
    old: Option<PathBuf>,

    /// New document
    #[arg(value_name = "NEW", required_unless_present = "warm_up")]
    new: Option<PathBuf>,

    /// Where to write the annotated document
    #[arg(short = 'o', long = "output", value_name = "OUT")]
    output: PathBuf,

    /// 1-based columns forming the row key, e.g. "1,3"
    #[arg(short = 'u', long = "unique-columns")]
    unique_columns: Option<String>,

    /// 0-based sheet indices to copy without comparing
    #[arg(long = "ignore-sheets")]
    ignore_sheets: Option<String>,

    /// 1-based header row per sheet, e.g. "1,2"
    #[arg(long = "header-rows")]
    header_rows: Option<String>,

    /// Document type of the request
    #[arg(long = "document-type")]
    document_type: Option<String>,

    /// Process kind of the request
    #[arg(long = "process-kind")]
    process_kind: Option<String>,

    /// JSON file with comparison options; flags override its values
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only write the warm-up document
    #[arg(long = "warm-up")]
    warm_up: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    if cli.warm_up {
        let outcome = warm_up()?;
        std::fs::write(&cli.output, &outcome.result_excel)
            .with_context(|| format!("Failed to write {}", cli.output.display()))?;
        println!("{} {}", "warm-up:".cyan().bold(), cli.output.display());
        return Ok(());
    }

    let options = resolve_options(&cli)?;
    let old = read_book(cli.old.as_deref().context("Missing OLD document")?)?;
    let new = read_book(cli.new.as_deref().context("Missing NEW document")?)?;

    let diff = compare_books(&old, &new, &options)?;
    diff.book
        .save_as_xlsx(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    info!(
        output = %cli.output.display(),
        has_differences = diff.has_differences,
        "result written"
    );

    if diff.has_differences {
        println!("{}", "different".yellow().bold());
    } else {
        println!("{}", "identical".green().bold());
    }
    Ok(())
}

fn read_book(path: &Path) -> Result<Book> {
    Book::from_xlsx(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Options from the config file, if any, with command line flags on top.
fn resolve_options(cli: &Cli) -> Result<CompareOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            CompareOptions::from_json_str(&json)
                .with_context(|| format!("Invalid config: {}", path.display()))?
        }
        None => CompareOptions::default(),
    };

    if let Some(value) = &cli.unique_columns {
        options.unique_columns = parse_index_list("unique column", value)?;
    }
    if let Some(value) = &cli.ignore_sheets {
        options.ignored_sheets = parse_index_list("ignored sheet", value)?;
    }
    if let Some(value) = &cli.header_rows {
        options.header_rows = parse_index_list("header row", value)?;
    }
    if let Some(value) = &cli.document_type {
        options.document_type.clone_from(value);
    }
    if let Some(value) = &cli.process_kind {
        options.process_kind.clone_from(value);
    }

    Ok(options)
}
