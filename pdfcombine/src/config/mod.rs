//! Configuration module for pdfcombine.
//!
//! This module holds the validated, strongly typed configuration that drives
//! a combination. Loosely typed inputs (command-line flags, YAML files where
//! `bookmarks` may be a boolean or a list) are resolved into these types once,
//! at the boundary; the layout and script code never see the raw forms.
//!
//! - [`LayoutPolicy`] replaces the pair of `openleft`/`openright` flags
//! - [`BookmarkSource`] replaces the "bool or list" bookmark option
//! - [`ScriptOptions`] groups the metadata-script switches

pub mod file;

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{PdfCombineError, Result};

/// Default Ghostscript executable.
pub const DEFAULT_ENGINE: &str = "gs";

/// Default paper size for blank pages.
pub const DEFAULT_PAPER_SIZE: &str = "a4";

/// Where each document of the combined PDF has to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutPolicy {
    /// Documents follow each other without padding.
    #[default]
    None,
    /// Every document starts on an even (left) page.
    OpenLeft,
    /// Every document starts on an odd (right) page.
    OpenRight,
}

impl LayoutPolicy {
    /// Resolve the policy from the two mutually exclusive flags.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::ConflictingLayout`] if both flags are set.
    pub fn from_flags(open_left: bool, open_right: bool) -> Result<Self> {
        match (open_left, open_right) {
            (true, true) => Err(PdfCombineError::ConflictingLayout),
            (true, false) => Ok(Self::OpenLeft),
            (false, true) => Ok(Self::OpenRight),
            (false, false) => Ok(Self::None),
        }
    }

    /// Whether documents are padded to an even number of pages.
    pub fn pads_documents(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Absolute page on which the first document starts.
    ///
    /// `OpenLeft` keeps page 1 as a blank lead-in.
    pub fn first_page(&self) -> u32 {
        match self {
            Self::OpenLeft => 2,
            Self::None | Self::OpenRight => 1,
        }
    }

    /// Whether the output starts with a blank page.
    pub fn has_leading_blank(&self) -> bool {
        matches!(self, Self::OpenLeft)
    }
}

impl FromStr for LayoutPolicy {
    type Err = PdfCombineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "none" => Ok(Self::None),
            "openleft" => Ok(Self::OpenLeft),
            "openright" => Ok(Self::OpenRight),
            _ => Err(PdfCombineError::invalid_config(format!(
                "Invalid layout policy: {s}. Must be one of: none, open-left, open-right"
            ))),
        }
    }
}

/// Document information to set on the output PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
}

impl Metadata {
    /// Create metadata from optional strings, trimming whitespace.
    ///
    /// Blank values become `None`.
    pub fn new(title: Option<String>, author: Option<String>) -> Self {
        Self {
            title: normalize(title),
            author: normalize(author),
        }
    }

    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
}

/// Where bookmark labels come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BookmarkSource {
    /// No bookmarks.
    Disabled,
    /// One bookmark per input, labelled with the input path as given.
    #[default]
    FileNames,
    /// One custom label per input, in input order.
    Labels(Vec<String>),
}

/// Switches for the generated metadata script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Attach a metadata script at all.
    pub enabled: bool,
    /// Script text replacing the generated script.
    pub override_script: Option<String>,
    /// Script text appended to the generated or overridden script.
    pub append: Option<String>,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            override_script: None,
            append: None,
        }
    }
}

/// Which page-count oracle to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageCounterKind {
    /// Ask Ghostscript.
    #[default]
    Ghostscript,
    /// Read the page tree with lopdf.
    Lopdf,
}

impl FromStr for PageCounterKind {
    type Err = PdfCombineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gs" | "ghostscript" => Ok(Self::Ghostscript),
            "lopdf" => Ok(Self::Lopdf),
            _ => Err(PdfCombineError::invalid_config(format!(
                "Invalid page counter: {s}. Must be one of: gs, lopdf"
            ))),
        }
    }
}

/// How to invoke the external merge engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Ghostscript executable name or path.
    pub program: PathBuf,
    /// Paper size passed as `-sPAPERSIZE`.
    pub paper_size: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_ENGINE),
            paper_size: DEFAULT_PAPER_SIZE.to_string(),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a combine operation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF file paths (in merge order).
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Page alignment of each document.
    pub policy: LayoutPolicy,

    /// Title and author of the output.
    pub metadata: Metadata,

    /// Bookmark labels.
    pub bookmarks: BookmarkSource,

    /// Metadata script switches.
    pub script: ScriptOptions,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compute and report the plan without running the merge.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Number of concurrent page-count lookups (None = auto-detect).
    pub jobs: Option<usize>,

    /// External engine settings.
    pub engine: EngineOptions,

    /// Page-count oracle.
    pub page_counter: PageCounterKind,
}

impl Config {
    /// Create a configuration with default settings for the given files.
    pub fn new(inputs: Vec<PathBuf>, output: PathBuf) -> Self {
        Self {
            inputs,
            output,
            policy: LayoutPolicy::None,
            metadata: Metadata::default(),
            bookmarks: BookmarkSource::FileNames,
            script: ScriptOptions::default(),
            overwrite_mode: OverwriteMode::Prompt,
            dry_run: false,
            verbose: false,
            quiet: false,
            jobs: None,
            engine: EngineOptions::default(),
            page_counter: PageCounterKind::Ghostscript,
        }
    }

    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// Only checks that need no file system access; existence of the inputs
    /// is checked by [`crate::validation::Validator`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The output is also an input
    /// - Custom bookmark labels don't match the inputs one-to-one
    /// - The paper size is empty
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(PdfCombineError::NoFilesToMerge);
        }

        if self.verbose && self.quiet {
            return Err(PdfCombineError::invalid_config(
                "Cannot use both --verbose and --silent",
            ));
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(PdfCombineError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        let output = absolute(&self.output);
        if self.inputs.iter().any(|input| absolute(input) == output) {
            return Err(PdfCombineError::OutputIsInput {
                path: self.output.clone(),
            });
        }

        if let BookmarkSource::Labels(labels) = &self.bookmarks
            && self.script.enabled
            && labels.len() != self.inputs.len()
        {
            return Err(PdfCombineError::BookmarkCountMismatch {
                labels: labels.len(),
                files: self.inputs.len(),
            });
        }

        if self.engine.paper_size.trim().is_empty() {
            return Err(PdfCombineError::invalid_config("Paper size cannot be empty"));
        }

        Ok(())
    }

    /// Bookmark labels, one per input, or none at all.
    ///
    /// Empty when bookmarks or the whole metadata script are disabled.
    pub fn bookmark_labels(&self) -> Vec<String> {
        if !self.script.enabled {
            return Vec::new();
        }

        match &self.bookmarks {
            BookmarkSource::Disabled => Vec::new(),
            BookmarkSource::FileNames => self
                .inputs
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
            BookmarkSource::Labels(labels) => labels.clone(),
        }
    }

    /// Whether the page counts of the inputs have to be looked up.
    ///
    /// Counting costs one engine invocation per file, so it is skipped when
    /// neither padding nor bookmarks depend on it.
    pub fn needs_page_counts(&self) -> bool {
        self.dry_run || self.policy.pads_documents() || !self.bookmark_labels().is_empty()
    }

    /// Get the effective number of parallel jobs.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
