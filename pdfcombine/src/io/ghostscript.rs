//! Ghostscript backend.
//!
//! Ghostscript is used both to count pages and to write the combined file.
//! It is always invoked directly with an argument vector, never through a
//! shell, so paths with spaces or quotes need no shell quoting. Paths that
//! end up inside PostScript source (the page-count program) are escaped as
//! PostScript strings instead.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;

use crate::config::{DEFAULT_ENGINE, DEFAULT_PAPER_SIZE, EngineOptions};
use crate::error::{PdfCombineError, Result};
use crate::io::{MergeEngine, PageCounter};
use crate::merge::plan::{MergePlan, MergeStep};

/// Handle on a Ghostscript executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ghostscript {
    program: PathBuf,
    paper_size: String,
}

impl Ghostscript {
    /// Use `program` and `paper_size` for blank pages.
    pub fn new(program: impl Into<PathBuf>, paper_size: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            paper_size: paper_size.into(),
        }
    }

    /// Build from the engine section of the configuration.
    pub fn from_options(options: &EngineOptions) -> Self {
        Self::new(options.program.clone(), options.paper_size.clone())
    }

    /// Executable invoked.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Check if the executable can be run at all.
    pub async fn is_available(&self) -> bool {
        let result = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        matches!(result, Ok(status) if status.success())
    }

    /// Version string reported by `gs --version`.
    pub async fn version(&self) -> Result<String> {
        let output = self.run(&[OsString::from("--version")], "reporting its version").await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Arguments of the page-count query for `path`.
    pub fn page_count_args(path: &Path) -> Vec<OsString> {
        let mut permit = OsString::from("--permit-file-read=");
        permit.push(path.as_os_str());

        let program = format!(
            "({}) (r) file runpdfbegin pdfpagecount = quit",
            escape_ps_string(&path.to_string_lossy())
        );

        vec![
            "-q".into(),
            "-dNODISPLAY".into(),
            permit,
            "-c".into(),
            program.into(),
        ]
    }

    /// Arguments that execute `plan` into `output`.
    pub fn merge_args(&self, plan: &MergePlan, output: &Path, script: Option<&Path>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-sDEVICE=pdfwrite".into(),
            "-dBATCH".into(),
            "-dNOPAUSE".into(),
            "-q".into(),
            format!("-sPAPERSIZE={}", self.paper_size).into(),
            "-o".into(),
            output.as_os_str().to_owned(),
        ];

        for step in plan.steps() {
            match step {
                MergeStep::Blank => {
                    args.push("-c".into());
                    args.push("showpage".into());
                }
                MergeStep::Document(path) => {
                    args.push("-f".into());
                    args.push(path.as_os_str().to_owned());
                }
            }
        }

        if let Some(script) = script {
            args.push(script.as_os_str().to_owned());
        }

        args
    }

    /// Render an invocation for display.
    pub fn command_line(&self, args: &[OsString]) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(args.iter().map(OsString::as_os_str))
            .map(quote_arg)
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn run(&self, args: &[OsString], operation: &str) -> Result<Output> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| PdfCombineError::EngineUnavailable {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(PdfCombineError::EngineFailed {
                program: self.program.display().to_string(),
                operation: operation.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

impl Default for Ghostscript {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE, DEFAULT_PAPER_SIZE)
    }
}

impl PageCounter for Ghostscript {
    async fn page_count(&self, path: &Path) -> Result<u32> {
        let output = self
            .run(&Self::page_count_args(path), "reading a page count")
            .await
            .map_err(|err| match err {
                PdfCombineError::EngineFailed { stderr, status, .. } => {
                    let reason = if stderr.is_empty() { status } else { stderr };
                    PdfCombineError::page_count_failed(path.to_path_buf(), reason)
                }
                other => other,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_page_count(&stdout).ok_or_else(|| {
            PdfCombineError::page_count_failed(
                path.to_path_buf(),
                format!("unexpected output: {:?}", stdout.trim()),
            )
        })
    }
}

impl MergeEngine for Ghostscript {
    async fn merge(&self, plan: &MergePlan, output: &Path, script: Option<&Path>) -> Result<()> {
        self.run(&self.merge_args(plan, output, script), "combining files")
            .await
            .map(|_| ())
    }

    fn describe(&self, plan: &MergePlan, output: &Path, script: Option<&Path>) -> Option<String> {
        Some(self.command_line(&self.merge_args(plan, output, script)))
    }
}

/// Parse the output of the page-count query.
///
/// Ghostscript may print warnings before the number; the count is the last
/// non-empty line. Negative or non-numeric values are rejected.
pub fn parse_page_count(stdout: &str) -> Option<u32> {
    stdout
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())?
        .parse()
        .ok()
}

/// Escape text for use inside a PostScript `( )` string.
pub fn escape_ps_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn quote_arg(arg: &OsStr) -> String {
    let arg = arg.to_string_lossy();
    if !arg.is_empty() && !arg.contains([' ', '"', '\'', '\t']) {
        arg.into_owned()
    } else {
        format!("\"{}\"", arg.replace('"', "\\\""))
    }
}
