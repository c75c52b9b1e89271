//! pdfcombine - Combine several PDF files into one document.
//!
//! The library decides how the inputs are laid out and what metadata the
//! result carries; Ghostscript does the actual rendering. It supports:
//!
//! - Starting every document on a right (odd) or left (even) page by
//!   inserting blank pages
//! - Document title and author
//! - One bookmark per input, labelled with the file name or a custom label
//! - Custom or appended pdfmark scripts
//! - YAML configuration files
//!
//! # Examples
//!
//! ## Combine with Ghostscript
//!
//! ```no_run
//! use pdfcombine::config::{Config, LayoutPolicy, Metadata};
//! use pdfcombine::merge;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::new(
//!     vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
//!     PathBuf::from("binder.pdf"),
//! );
//! config.policy = LayoutPolicy::OpenRight;
//! config.metadata = Metadata::new(Some("Binder".into()), None);
//!
//! let report = merge::combine(&config).await?;
//! println!("Created {} page document", report.total_pages().unwrap_or(0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```
//! use pdfcombine::config::LayoutPolicy;
//! use pdfcombine::merge::{compute_layout, script};
//!
//! let layout = compute_layout(&[3, 4, 5], LayoutPolicy::OpenRight).unwrap();
//! assert_eq!(layout.start_pages(), &[1, 5, 9]);
//!
//! let labels = vec!["A".to_string(), "B".to_string(), "C".to_string()];
//! let bookmarks = script::pair_bookmarks(&labels, &layout).unwrap();
//! let script = script::synthesize(Some("Binder"), None, &bookmarks);
//! assert_eq!(script.as_str().lines().count(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{PdfCombineError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
