//! Error types for pdfcombine.
//!
//! Every failure aborts the whole combination before the output file is
//! touched, so errors carry enough context (which file, which operation) to
//! be reported as-is to the user.
//!
//! # Error Categories
//!
//! - **Configuration errors**: conflicting layout policies, missing inputs,
//!   output named as an input, bad page counts, unreadable config files
//! - **Engine errors**: Ghostscript missing or failing
//! - **I/O errors**: script or output files that cannot be written

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfcombine operations.
pub type Result<T> = std::result::Result<T, PdfCombineError>;

/// Main error type for pdfcombine operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfCombineError {
    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// No files were provided for combining.
    #[error("No input files specified for combining")]
    NoFilesToMerge,

    /// Both open-left and open-right were requested.
    #[error("\"openleft\" and \"openright\" are exclusive options")]
    ConflictingLayout,

    /// The output path is also one of the inputs.
    #[error("\"{}\" is also an input-file, choose a different output", .path.display())]
    OutputIsInput {
        /// The offending output path.
        path: PathBuf,
    },

    /// A page count handed to the layout calculator is not positive.
    #[error("Invalid page count {count} for document #{}: page counts must be positive", .index + 1)]
    InvalidPageCount {
        /// Zero-based position of the document in the merge sequence.
        index: usize,
        /// The rejected page count.
        count: i64,
    },

    /// Custom bookmark labels do not match the input files one-to-one.
    #[error("Got {labels} bookmark label(s) for {files} input file(s)")]
    BookmarkCountMismatch {
        /// Number of labels supplied.
        labels: usize,
        /// Number of input files.
        files: usize,
    },

    /// The page-count oracle could not determine the page count of a file.
    #[error("Failed to read the number of pages of: {}\n  Reason: {reason}", .path.display())]
    PageCountFailed {
        /// File whose page count was requested.
        path: PathBuf,
        /// Why the lookup failed.
        reason: String,
    },

    /// The external engine could not be started.
    #[error("\"{program}\" not found or not executable\n  Reason: {source}")]
    EngineUnavailable {
        /// Program that was invoked.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// The external engine ran but reported a failure.
    #[error("\"{program}\" failed while {operation} ({status})\n  {stderr}")]
    EngineFailed {
        /// Program that was invoked.
        program: String,
        /// What the engine was asked to do.
        operation: String,
        /// Exit status description.
        status: String,
        /// Captured standard error output.
        stderr: String,
    },

    /// Output file already exists and overwriting is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// The output file could not be created or moved into place.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The metadata script could not be written to disk.
    #[error("Failed to write metadata script: {}\n  Reason: {source}", .path.display())]
    FailedToWriteScript {
        /// Path of the script file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A configuration file could not be read.
    #[error("Failed to read configuration file: {}\n  Reason: {source}", .path.display())]
    FailedToReadConfig {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A configuration file could be read but not understood.
    #[error("Invalid configuration file: {}\n  Details: {reason}", .path.display())]
    InvalidConfigFile {
        /// Path of the configuration file.
        path: PathBuf,
        /// Parser diagnostics.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User declined to overwrite the output.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for PdfCombineError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(format!("{err:#}"))
    }
}

impl From<glob::PatternError> for PdfCombineError {
    fn from(err: glob::PatternError) -> Self {
        Self::invalid_config(format!("Invalid glob pattern: {err}"))
    }
}

impl From<glob::GlobError> for PdfCombineError {
    fn from(err: glob::GlobError) -> Self {
        Self::other(format!("Failed to process glob entry: {err}"))
    }
}

impl PdfCombineError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a PageCountFailed error.
    pub fn page_count_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::PageCountFailed {
            path,
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether this error stems from the user's configuration or inputs
    /// rather than from the environment.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::NotAFile { .. }
                | Self::NoFilesToMerge
                | Self::ConflictingLayout
                | Self::OutputIsInput { .. }
                | Self::InvalidPageCount { .. }
                | Self::BookmarkCountMismatch { .. }
                | Self::InvalidConfigFile { .. }
                | Self::InvalidConfig { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToReadConfig { .. } => 2,
            Self::PageCountFailed { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWriteScript { .. } => 5,
            Self::Io { .. } => 5,
            Self::EngineUnavailable { .. } => 6,
            Self::EngineFailed { .. } => 6,
            Self::Cancelled => 130,
            Self::NoFilesToMerge
            | Self::ConflictingLayout
            | Self::OutputIsInput { .. }
            | Self::InvalidPageCount { .. }
            | Self::BookmarkCountMismatch { .. }
            | Self::InvalidConfigFile { .. }
            | Self::InvalidConfig { .. }
            | Self::Other { .. } => 1,
        }
    }
}
