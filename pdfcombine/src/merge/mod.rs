//! Combining PDF files.
//!
//! The pure core and the pipeline around it:
//! - [`layout`] computes where each document starts
//! - [`script`] writes the pdfmark program for title, author and outline
//! - [`plan`] turns a layout into engine steps
//! - [`merger`] runs the whole thing against a page counter and an engine
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::merge::combine;
//! use pdfcombine::config::{Config, LayoutPolicy};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::new(
//!     vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
//!     PathBuf::from("binder.pdf"),
//! );
//! config.policy = LayoutPolicy::OpenRight;
//!
//! let report = combine(&config).await?;
//! println!("Combined {} files", report.files());
//! # Ok(())
//! # }
//! ```

pub mod layout;
pub mod merger;
pub mod plan;
pub mod script;

pub use layout::{InputDocument, Layout, compute_layout};
pub use merger::{MergeReport, Merger};
pub use plan::{MergePlan, MergeStep};
pub use script::{Bookmark, MetadataScript, compose, encode_text, synthesize};

use crate::config::Config;
use crate::error::Result;
use crate::io::{Ghostscript, PageCounterBackend};
use crate::output::OutputFormatter;

/// Combine the inputs of `config` with Ghostscript.
///
/// Page counts come from the backend selected by `config.page_counter`.
/// Progress is reported according to the quiet/verbose settings.
///
/// # Errors
///
/// Returns an error if any step fails; the output is left untouched.
pub async fn combine(config: &Config) -> Result<MergeReport> {
    combine_with_formatter(config, OutputFormatter::from_config(config)).await
}

/// Like [`combine`], reporting through `formatter`.
pub async fn combine_with_formatter(config: &Config, formatter: OutputFormatter) -> Result<MergeReport> {
    let merger = Merger::new(
        PageCounterBackend::from_config(config),
        Ghostscript::from_options(&config.engine),
    )
    .with_formatter(formatter);

    merger.combine(config).await
}
