//! Page count lookups.
//!
//! Counting is the only step that touches every input before the merge and
//! one lookup per file is independent of the others, so lookups run
//! concurrently. Results always come back in input order.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::io::{LopdfPageCounter, PageCountReader};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PageCountReader::new(4);
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let counts = reader.count_all(&LopdfPageCounter::new(), &paths).await?;
//! assert_eq!(counts.len(), 2);
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use lopdf::Document;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::{PdfCombineError, Result};
use crate::io::PageCounter;

/// Page counter that reads the page tree with lopdf.
///
/// Needs no external program, but only understands what lopdf can parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfPageCounter;

impl LopdfPageCounter {
    /// Create a new counter.
    pub fn new() -> Self {
        Self
    }
}

impl PageCounter for LopdfPageCounter {
    async fn page_count(&self, path: &Path) -> Result<u32> {
        let path_buf = path.to_path_buf();

        // Parsing is CPU bound; keep it off the async workers
        let pages = task::spawn_blocking(move || {
            Document::load(&path_buf).map(|doc| doc.get_pages().len())
        })
        .await
        .map_err(|e| PdfCombineError::other(format!("Page count task failed: {e}")))?
        .map_err(|e| {
            let reason = e.to_string();
            if reason.contains("encrypt") || reason.contains("password") {
                PdfCombineError::page_count_failed(path.to_path_buf(), "PDF is encrypted")
            } else {
                PdfCombineError::page_count_failed(path.to_path_buf(), reason)
            }
        })?;

        u32::try_from(pages).map_err(|_| {
            PdfCombineError::page_count_failed(path.to_path_buf(), "too many pages")
        })
    }
}

/// Runs page count lookups with bounded concurrency.
#[derive(Debug, Clone)]
pub struct PageCountReader {
    workers: usize,
}

impl PageCountReader {
    /// Create a reader running at most `workers` lookups at once.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Maximum number of concurrent lookups.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Count the pages of every file, in input order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing lookup and returns its error; lookups
    /// still in flight are dropped.
    pub async fn count_all<C: PageCounter>(&self, counter: &C, paths: &[PathBuf]) -> Result<Vec<u32>> {
        self.count_with_progress(counter, paths, |_, _, _| {}).await
    }

    /// Count pages, calling `on_count` for each file as its result arrives.
    ///
    /// Callbacks happen in input order even if later lookups finish first.
    pub async fn count_with_progress<C, F>(
        &self,
        counter: &C,
        paths: &[PathBuf],
        mut on_count: F,
    ) -> Result<Vec<u32>>
    where
        C: PageCounter,
        F: FnMut(usize, &Path, u32),
    {
        let tasks = paths.iter().map(|path| async move {
            counter
                .page_count(path)
                .await
                .map(|count| (path.as_path(), count))
        });

        // `buffered` (not `buffer_unordered`): position i must stay document i
        let mut results = stream::iter(tasks).buffered(self.workers);

        let mut counts = Vec::with_capacity(paths.len());
        while let Some(result) = results.next().await {
            let (path, count) = result?;
            on_count(counts.len(), path, count);
            counts.push(count);
        }

        Ok(counts)
    }
}

impl Default for PageCountReader {
    fn default() -> Self {
        Self::new(
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        )
    }
}
