//! Access to the outside world: page counts of the inputs and the physical
//! merge.
//!
//! Both are behind traits so the merge pipeline can be driven by
//! Ghostscript in production and by in-process fakes in tests.
//!
//! - [`PageCounter`] reports how many pages a PDF has
//! - [`MergeEngine`] renders a [`MergePlan`] into an output file

pub mod ghostscript;
pub mod reader;
pub mod writer;

pub use ghostscript::Ghostscript;
pub use reader::{LopdfPageCounter, PageCountReader};
pub use writer::{AtomicOutput, ScriptFile};

use std::future::Future;
use std::path::Path;

use crate::config::{Config, PageCounterKind};
use crate::error::Result;
use crate::merge::plan::MergePlan;

/// Oracle for the number of pages of a PDF file.
pub trait PageCounter: Send + Sync {
    /// Number of pages of the document at `path`.
    ///
    /// A document reporting zero pages is returned as-is; rejecting it is
    /// up to the layout.
    fn page_count(&self, path: &Path) -> impl Future<Output = Result<u32>> + Send;
}

/// Backend that writes the combined document.
pub trait MergeEngine: Send + Sync {
    /// Execute `plan`, writing the result to `output`.
    ///
    /// `script` is a PostScript program to run after all documents, if any.
    fn merge(
        &self,
        plan: &MergePlan,
        output: &Path,
        script: Option<&Path>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Human readable command line for `merge`, shown in verbose mode.
    fn describe(&self, _plan: &MergePlan, _output: &Path, _script: Option<&Path>) -> Option<String> {
        None
    }
}

/// Page counter selected at runtime.
#[derive(Debug, Clone)]
pub enum PageCounterBackend {
    /// Ask Ghostscript.
    Ghostscript(Ghostscript),
    /// Read the page tree in-process.
    Lopdf(LopdfPageCounter),
}

impl PageCounterBackend {
    /// Build the counter requested by the configuration.
    pub fn from_config(config: &Config) -> Self {
        match config.page_counter {
            PageCounterKind::Ghostscript => Self::Ghostscript(Ghostscript::from_options(&config.engine)),
            PageCounterKind::Lopdf => Self::Lopdf(LopdfPageCounter::new()),
        }
    }
}

impl PageCounter for PageCounterBackend {
    async fn page_count(&self, path: &Path) -> Result<u32> {
        match self {
            Self::Ghostscript(gs) => gs.page_count(path).await,
            Self::Lopdf(lopdf) => lopdf.page_count(path).await,
        }
    }
}
