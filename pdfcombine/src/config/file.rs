//! YAML configuration files.
//!
//! A configuration file lists the input files (optionally with a bookmark
//! title each) and may set any command-line option by its long name:
//!
//! ```yaml
//! files:
//!   - file: 1.pdf
//!     title: First file
//!   - file: 2.pdf
//!     title: Second file
//!
//! openleft: true
//! title: Binder
//! author: Jane Doe
//! output: binder.pdf
//! ```
//!
//! Values from the file take precedence over the command line.

use anyhow::{Context, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{BookmarkSource, Config, LayoutPolicy, Metadata};
use crate::error::{PdfCombineError, Result};

/// One entry of the `files` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FileEntry {
    /// A bare path.
    Path(PathBuf),
    /// A path with its bookmark title.
    Titled {
        /// Path of the input file.
        file: PathBuf,
        /// Bookmark title for this file.
        title: String,
    },
}

impl FileEntry {
    /// Path of the input file.
    pub fn path(&self) -> &Path {
        match self {
            Self::Path(path) => path,
            Self::Titled { file, .. } => file,
        }
    }

    /// Explicit bookmark title, if any.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Titled { title, .. } => Some(title),
        }
    }
}

/// The `bookmarks` option, which accepts a switch, one label or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BookmarksSetting {
    /// `true` for file-name bookmarks, `false` for none.
    Enabled(bool),
    /// A single label (only meaningful for a single input).
    Label(String),
    /// One label per input.
    Labels(Vec<String>),
}

impl From<BookmarksSetting> for BookmarkSource {
    fn from(setting: BookmarksSetting) -> Self {
        match setting {
            BookmarksSetting::Enabled(true) => Self::FileNames,
            BookmarksSetting::Enabled(false) => Self::Disabled,
            BookmarksSetting::Label(label) => Self::Labels(vec![label]),
            BookmarksSetting::Labels(labels) => Self::Labels(labels),
        }
    }
}

/// Contents of a YAML configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    /// Input files, in merge order.
    pub files: Option<Vec<FileEntry>>,
    /// Output file.
    pub output: Option<PathBuf>,
    /// Start every document on a left page.
    pub openleft: Option<bool>,
    /// Start every document on a right page.
    pub openright: Option<bool>,
    /// Title of the output.
    pub title: Option<String>,
    /// Author of the output.
    pub author: Option<String>,
    /// Bookmark switch or labels.
    pub bookmarks: Option<BookmarksSetting>,
    /// Script replacing the generated metadata script.
    pub ps: Option<String>,
    /// Script appended to the metadata script.
    pub add_ps: Option<String>,
    /// Disable the metadata script.
    pub no_ps: Option<bool>,
    /// Verbose output.
    pub verbose: Option<bool>,
    /// Suppress progress output.
    pub silent: Option<bool>,
}

impl ConfigFile {
    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::FailedToReadConfig`] if the file cannot be
    /// read and [`PdfCombineError::InvalidConfigFile`] if it is not a valid
    /// configuration.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|source| {
            PdfCombineError::FailedToReadConfig {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Self::parse(&text).map_err(|err| PdfCombineError::InvalidConfigFile {
            path: path.to_path_buf(),
            reason: format!("{err:#}"),
        })
    }

    /// Parse configuration text.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: Self = serde_yaml::from_str(text).context("Failed to parse YAML")?;

        if let Some(files) = &file.files
            && let Some(entry) = files.iter().find(|e| e.path().as_os_str().is_empty())
        {
            bail!("Empty path in 'files' (entry {entry:?})");
        }

        Ok(file)
    }

    /// Overlay the values of this file onto `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::ConflictingLayout`] if the resulting
    /// configuration asks for both open-left and open-right.
    pub fn apply_to(&self, config: &mut Config) -> Result<()> {
        if let Some(files) = &self.files {
            config.inputs = files.iter().map(|e| e.path().to_path_buf()).collect();

            if files.iter().any(|e| e.title().is_some()) {
                let labels = files
                    .iter()
                    .map(|e| match e.title() {
                        Some(title) => title.to_string(),
                        None => e.path().display().to_string(),
                    })
                    .collect();
                config.bookmarks = BookmarkSource::Labels(labels);
            }
        }

        if let Some(output) = &self.output {
            config.output = output.clone();
        }

        let open_left = self
            .openleft
            .unwrap_or(config.policy == LayoutPolicy::OpenLeft);
        let open_right = self
            .openright
            .unwrap_or(config.policy == LayoutPolicy::OpenRight);
        config.policy = LayoutPolicy::from_flags(open_left, open_right)?;

        if self.title.is_some() || self.author.is_some() {
            config.metadata = Metadata::new(
                self.title.clone().or_else(|| config.metadata.title.clone()),
                self.author
                    .clone()
                    .or_else(|| config.metadata.author.clone()),
            );
        }

        if let Some(bookmarks) = &self.bookmarks {
            config.bookmarks = bookmarks.clone().into();
        }

        if let Some(ps) = &self.ps {
            config.script.override_script = Some(ps.clone());
        }

        if let Some(add_ps) = &self.add_ps {
            config.script.append = Some(add_ps.clone());
        }

        if self.no_ps == Some(true) {
            config.script.enabled = false;
        }

        if let Some(verbose) = self.verbose {
            config.verbose = verbose;
        }

        if let Some(silent) = self.silent {
            config.quiet = silent;
        }

        Ok(())
    }
}
