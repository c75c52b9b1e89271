//! Files written during a merge.
//!
//! - [`ScriptFile`] holds the metadata script in a private temporary
//!   directory that disappears with the value
//! - [`AtomicOutput`] is a temporary file next to the final output; the
//!   engine writes into it and it only replaces the output on
//!   [`AtomicOutput::persist`], so a failed merge never leaves a partial
//!   file behind
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::io::writer::AtomicOutput;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let output = AtomicOutput::create(Path::new("binder.pdf"))?;
//! // ... let the engine write to output.path() ...
//! output.persist()?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

use crate::error::{PdfCombineError, Result};
use crate::merge::script::MetadataScript;

const SCRIPT_NAME: &str = "pdfcombine-meta.ps";

/// Metadata script on disk, removed on drop.
#[derive(Debug)]
pub struct ScriptFile {
    // Keeps the directory alive
    _dir: TempDir,
    path: PathBuf,
}

impl ScriptFile {
    /// Write `script` into a fresh temporary directory.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::FailedToWriteScript`] if the directory or
    /// the file cannot be created.
    pub async fn write(script: &MetadataScript) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("pdfcombine-")
            .tempdir()
            .map_err(|source| PdfCombineError::FailedToWriteScript {
                path: std::env::temp_dir(),
                source,
            })?;

        let path = dir.path().join(SCRIPT_NAME);
        tokio::fs::write(&path, script.as_str())
            .await
            .map_err(|source| PdfCombineError::FailedToWriteScript {
                path: path.clone(),
                source,
            })?;

        Ok(Self { _dir: dir, path })
    }

    /// Location of the script.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Temporary output in the target directory.
#[derive(Debug)]
pub struct AtomicOutput {
    temp: NamedTempFile,
    target: PathBuf,
}

impl AtomicOutput {
    /// Reserve a temporary file in the directory of `target`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::FailedToCreateOutput`] if the directory is
    /// missing or not writable.
    pub fn create(target: &Path) -> Result<Self> {
        let dir = output_dir(target);
        let mut builder = tempfile::Builder::new();
        builder.prefix(".pdfcombine-").suffix(".pdf");
        // Same mode as a freshly created file, subject to the umask
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let temp = builder
            .tempfile_in(dir)
            .map_err(|source| PdfCombineError::FailedToCreateOutput {
                path: target.to_path_buf(),
                source,
            })?;

        Ok(Self {
            temp,
            target: target.to_path_buf(),
        })
    }

    /// Where the engine has to write.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Final destination.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Move the finished file over the target, replacing it.
    ///
    /// Returns the size of the written file in bytes.
    pub fn persist(self) -> Result<u64> {
        let size = std::fs::metadata(self.temp.path())
            .map(|m| m.len())
            .unwrap_or(0);

        if size == 0 {
            return Err(PdfCombineError::FailedToCreateOutput {
                path: self.target,
                source: std::io::Error::other("merge produced an empty file"),
            });
        }

        let target = self.target;

        // Replacing a file keeps its mode
        if let Ok(existing) = std::fs::metadata(&target) {
            std::fs::set_permissions(self.temp.path(), existing.permissions()).map_err(|source| {
                PdfCombineError::FailedToCreateOutput {
                    path: target.clone(),
                    source,
                }
            })?;
        }

        self.temp
            .persist(&target)
            .map_err(|e| PdfCombineError::FailedToCreateOutput {
                path: target.clone(),
                source: e.error,
            })?;

        Ok(size)
    }
}

fn output_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
