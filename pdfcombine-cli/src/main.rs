//! pdfcombine - Combine several PDFs into a single PDF.
//!
//! Command-line front end: parses arguments, asks before overwriting, runs
//! the combine and reports the result.

mod cli;

use clap::Parser;
use std::io::{self, Write};
use std::process;

use crate::cli::Cli;
use pdfcombine::config::{Config, OverwriteMode};
use pdfcombine::error::PdfCombineError;
use pdfcombine::merge;
use pdfcombine::output::{OutputFormatter, display_layout_plan, display_summary, report_to_json};
use pdfcombine::validation::Validator;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfCombineError> {
    let config = cli.resolve_config().await?;

    let formatter = if cli.json {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::from_config(&config)
    };

    formatter.debug(&format!("{} v{}", pdfcombine::NAME, pdfcombine::VERSION));

    // Report missing inputs before asking about the output
    Validator::new().validate_config(&config).await?;

    if !config.dry_run {
        handle_output_overwrite(&config, !cli.json)?;
    }

    let report = merge::combine_with_formatter(&config, formatter).await?;

    if cli.json {
        println!("{}", report_to_json(&report)?);
    } else if report.dry_run {
        display_layout_plan(&formatter, &report);
        formatter.blank_line();
        formatter.success("Dry run completed, nothing was written");
    } else {
        display_summary(&formatter, &report);
    }

    Ok(())
}

/// What to do about an existing output file.
#[derive(Debug, PartialEq, Eq)]
enum OverwriteAction {
    Proceed,
    Ask,
}

/// Decide whether the output may be written.
///
/// `interactive` is false when stdout carries machine-readable output;
/// silent mode still asks.
fn check_overwrite(config: &Config, interactive: bool) -> Result<OverwriteAction, PdfCombineError> {
    if !config.output.exists() {
        return Ok(OverwriteAction::Proceed);
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(OverwriteAction::Proceed),
        OverwriteMode::NoClobber => Err(PdfCombineError::output_exists(config.output.clone())),
        OverwriteMode::Prompt if interactive => Ok(OverwriteAction::Ask),
        OverwriteMode::Prompt => Err(PdfCombineError::output_exists(config.output.clone())),
    }
}

/// Handle output file overwrite scenarios.
fn handle_output_overwrite(config: &Config, interactive: bool) -> Result<(), PdfCombineError> {
    if check_overwrite(config, interactive)? == OverwriteAction::Proceed {
        return Ok(());
    }

    print!("Overwrite existing \"{}\"? [y/N]: ", config.output.display());
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .map_err(|err| PdfCombineError::other(format!("Failed to read input: {err}")))?;

    if is_yes(&response) {
        Ok(())
    } else {
        Err(PdfCombineError::Cancelled)
    }
}

fn is_yes(response: &str) -> bool {
    matches!(response.trim().to_lowercase().as_str(), "y" | "yes")
}
