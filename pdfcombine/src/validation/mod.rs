//! Input validation for pdfcombine.
//!
//! Checks that need the file system, run before any page is counted:
//! - Every input exists and is a regular file
//! - The output is not one of the inputs (after resolving symlinks)
//! - The output directory exists
//! - An existing output is not overwritten in no-clobber mode
//!
//! Pure configuration checks live in [`Config::validate`].
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::validation::Validator;
//! use pdfcombine::config::Config;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new(vec![PathBuf::from("a.pdf")], PathBuf::from("binder.pdf"));
//! Validator::new().validate_config(&config).await?;
//! # Ok(())
//! # }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::{Config, OverwriteMode};
use crate::error::{PdfCombineError, Result};

/// Validator for input files and the output location.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Check that `path` names an existing regular file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::FileNotFound`] or
    /// [`PdfCombineError::NotAFile`].
    pub async fn validate_file(&self, path: &Path) -> Result<()> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => PdfCombineError::file_not_found(path.to_path_buf()),
            _ => PdfCombineError::Io { source: e },
        })?;

        if !metadata.is_file() {
            return Err(PdfCombineError::not_a_file(path.to_path_buf()));
        }

        Ok(())
    }

    /// Validate every input, in order. The first failure wins.
    pub async fn validate_inputs(&self, paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Err(PdfCombineError::NoFilesToMerge);
        }

        for path in paths {
            self.validate_file(path).await?;
        }

        Ok(())
    }

    /// Validate the output path against the inputs and the overwrite mode.
    ///
    /// In [`OverwriteMode::Prompt`] an existing output passes; asking the
    /// user is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output resolves to the same file as an input
    /// - Output file exists and no-clobber is set
    /// - Output directory doesn't exist
    pub async fn validate_output(&self, config: &Config) -> Result<()> {
        let output = &config.output;

        if let Some(resolved) = resolve_output(output).await {
            for input in &config.inputs {
                if let Ok(input_resolved) = tokio::fs::canonicalize(input).await
                    && input_resolved == resolved
                {
                    return Err(PdfCombineError::OutputIsInput {
                        path: output.clone(),
                    });
                }
            }
        }

        if config.overwrite_mode == OverwriteMode::NoClobber
            && tokio::fs::try_exists(output).await.unwrap_or(false)
        {
            return Err(PdfCombineError::output_exists(output.clone()));
        }

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
            && !tokio::fs::metadata(parent)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false)
        {
            return Err(PdfCombineError::invalid_config(format!(
                "Output directory does not exist: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Validate the complete configuration.
    ///
    /// Runs [`Config::validate`], then the input and output checks. The
    /// output is not checked in dry-run mode since nothing is written.
    pub async fn validate_config(&self, config: &Config) -> Result<()> {
        config.validate()?;
        self.validate_inputs(&config.inputs).await?;

        if !config.dry_run {
            self.validate_output(config).await?;
        }

        Ok(())
    }
}

/// Canonical form of a path that may not exist yet.
async fn resolve_output(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = tokio::fs::canonicalize(path).await {
        return Some(resolved);
    }

    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = tokio::fs::canonicalize(parent).await.ok()?;
    Some(parent.join(name))
}
