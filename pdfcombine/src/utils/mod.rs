//! Utilities for path collection and display.

use std::path::{Path, PathBuf};

use crate::{Result, error::PdfCombineError};

/// Expand input arguments into file paths, keeping their order.
///
/// Arguments naming an existing file, and arguments without glob
/// metacharacters, are kept verbatim (validation reports a missing file
/// later with the name the user typed). Other glob patterns expand to
/// their matches in sorted order.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - A pattern matching nothing is reported as a missing file.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        if is_glob_pattern(pattern) && !Path::new(pattern).exists() {
            resolved_paths.extend(collect_paths_for_pattern(pattern)?);
        } else {
            resolved_paths.push(PathBuf::from(pattern));
        }
    }

    Ok(resolved_paths)
}

/// Whether `text` contains glob metacharacters.
pub fn is_glob_pattern(text: &str) -> bool {
    text.contains(['*', '?', '['])
}

fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = glob::glob(pattern)?.collect::<std::result::Result<Vec<_>, _>>()?;

    if paths.is_empty() {
        return Err(PdfCombineError::file_not_found(PathBuf::from(pattern)));
    }

    paths.sort();
    Ok(paths)
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
