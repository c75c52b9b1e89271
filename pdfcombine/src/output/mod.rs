//! Output formatting and display for pdfcombine.
//!
//! This module handles all user-facing output:
//! - Status, warning and error messages with quiet and verbose modes
//! - The layout plan of a dry run
//! - The summary after a combine
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::output::OutputFormatter;
//! use pdfcombine::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Combining files");
//! formatter.success("Done");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::merge::{MergeReport, MergeStep};
use crate::utils::format_file_size;

/// Display what a combine will do (or did).
///
/// Lists every step with the page it starts on when the layout is known.
pub fn display_layout_plan(formatter: &OutputFormatter, report: &MergeReport) {
    formatter.section("layout plan");

    let starts = report.layout.as_ref().map(|layout| layout.start_pages());
    let mut document = 0;
    for (i, step) in report.plan.steps().iter().enumerate() {
        let line = match step {
            MergeStep::Blank => "(blank page)".to_string(),
            MergeStep::Document(path) => {
                let page = starts.and_then(|s| s.get(document)).copied();
                let count = report.documents.get(document).map(|d| d.page_count);
                document += 1;
                match (page, count) {
                    (Some(page), Some(count)) => {
                        format!("{} ({count} page(s), starts on page {page})", path.display())
                    }
                    _ => path.display().to_string(),
                }
            }
        };
        formatter.list_item(i + 1, &line);
    }

    if let Some(total) = report.total_pages() {
        formatter.info(&format!(
            "\n{total} page(s) in total, {} blank",
            report.plan.blank_count()
        ));
    }

    if !report.bookmarks.is_empty() {
        formatter.section("bookmarks");
        for bookmark in &report.bookmarks {
            formatter.info(&format!("  page {:>4}: {}", bookmark.page, bookmark.label));
        }
    }

    if !report.script.is_empty() {
        formatter.section("metadata script");
        formatter.block(report.script.as_str());
    }
}

/// Display the result of a completed combine.
pub fn display_summary(formatter: &OutputFormatter, report: &MergeReport) {
    let pages = report
        .total_pages()
        .map(|total| format!(", {total} page(s)"))
        .unwrap_or_default();

    formatter.success(&format!(
        "Combined {} file(s) into {}{pages}, {}",
        report.files(),
        report.output.display(),
        format_file_size(report.output_size)
    ));
    formatter.detail("Time", &format!("{:.2?}", report.elapsed));
}

/// Serialize a report for `--json`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn report_to_json(report: &MergeReport) -> crate::Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| crate::PdfCombineError::other(format!("Failed to serialize report: {e}")))
}
