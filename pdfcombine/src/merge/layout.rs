//! Start-page layout of the combined document.
//!
//! Given the page count of every input and a [`LayoutPolicy`], this module
//! computes on which absolute page (1-indexed) each document starts and
//! after which documents a blank page has to be inserted.
//!
//! For the padded policies every document is rounded up to an even number
//! of pages before advancing, so each boundary lands on the required parity
//! by looking only at the preceding document. One left-to-right pass, no
//! backtracking.

use serde::Serialize;
use std::path::PathBuf;

use crate::config::LayoutPolicy;
use crate::error::{PdfCombineError, Result};

/// Whether a page count is even.
pub fn is_even(page_count: u32) -> bool {
    page_count % 2 == 0
}

/// Round a page count up to the next even number.
pub fn round_up_to_even(page_count: u32) -> u32 {
    if is_even(page_count) {
        page_count
    } else {
        page_count.saturating_add(1)
    }
}

/// One input of the merge sequence with its page count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDocument {
    /// Path of the input file.
    pub path: PathBuf,
    /// Number of pages, as reported by the page-count oracle.
    pub page_count: u32,
    /// Bookmark label pointing at the first page of this document.
    pub bookmark: Option<String>,
}

impl InputDocument {
    /// Create a document entry.
    pub fn new(path: PathBuf, page_count: u32, bookmark: Option<String>) -> Self {
        Self {
            path,
            page_count,
            bookmark,
        }
    }

    /// Whether the document has an even number of pages.
    pub fn is_even_page_count(&self) -> bool {
        is_even(self.page_count)
    }
}

/// Computed placement of every document in the combined output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    policy: LayoutPolicy,
    start_pages: Vec<u32>,
    blank_insertions: Vec<bool>,
    total_pages: u32,
}

impl Layout {
    /// Policy the layout was computed for.
    pub fn policy(&self) -> LayoutPolicy {
        self.policy
    }

    /// First page of each document, strictly increasing.
    pub fn start_pages(&self) -> &[u32] {
        &self.start_pages
    }

    /// For each boundary `i`, whether a blank page follows document `i`.
    ///
    /// Has one entry less than there are documents.
    pub fn blank_insertions(&self) -> &[bool] {
        &self.blank_insertions
    }

    /// Whether a blank page precedes the first document.
    pub fn leading_blank(&self) -> bool {
        self.policy.has_leading_blank()
    }

    /// Whether a blank page has to be inserted before document `index`.
    pub fn blank_before(&self, index: usize) -> bool {
        match index {
            0 => self.leading_blank(),
            i => self.blank_insertions.get(i - 1).copied().unwrap_or(false),
        }
    }

    /// Number of documents laid out.
    pub fn len(&self) -> usize {
        self.start_pages.len()
    }

    /// Whether the layout holds no documents. Never true for a computed layout.
    pub fn is_empty(&self) -> bool {
        self.start_pages.is_empty()
    }

    /// Number of pages of the combined output, blank pages included.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Number of blank pages the policy adds.
    pub fn blank_pages(&self) -> usize {
        usize::from(self.leading_blank()) + self.blank_insertions.iter().filter(|b| **b).count()
    }
}

/// Compute the start page of each document.
///
/// # Errors
///
/// Returns [`PdfCombineError::NoFilesToMerge`] for an empty sequence,
/// [`PdfCombineError::InvalidPageCount`] if a count is zero and
/// [`PdfCombineError::InvalidConfig`] if page numbers overflow.
///
/// # Examples
///
/// ```
/// use pdfcombine::config::LayoutPolicy;
/// use pdfcombine::merge::layout::compute_layout;
///
/// let layout = compute_layout(&[3, 4, 5], LayoutPolicy::OpenLeft).unwrap();
/// assert_eq!(layout.start_pages(), &[2, 6, 10]);
/// assert_eq!(layout.blank_insertions(), &[true, false]);
/// ```
pub fn compute_layout(page_counts: &[u32], policy: LayoutPolicy) -> Result<Layout> {
    if page_counts.is_empty() {
        return Err(PdfCombineError::NoFilesToMerge);
    }

    if let Some(index) = page_counts.iter().position(|&count| count == 0) {
        return Err(PdfCombineError::InvalidPageCount { index, count: 0 });
    }

    let mut start_pages = Vec::with_capacity(page_counts.len());
    let mut blank_insertions = Vec::with_capacity(page_counts.len() - 1);
    let mut start = policy.first_page();
    start_pages.push(start);

    for &previous in &page_counts[..page_counts.len() - 1] {
        let increment = if policy.pads_documents() {
            round_up_to_even(previous)
        } else {
            previous
        };
        blank_insertions.push(increment != previous);
        start = advance(start, increment)?;
        start_pages.push(start);
    }

    let last_count = page_counts[page_counts.len() - 1];
    let total_pages = advance(start, last_count - 1)?;

    Ok(Layout {
        policy,
        start_pages,
        blank_insertions,
        total_pages,
    })
}

fn advance(page: u32, by: u32) -> Result<u32> {
    page.checked_add(by)
        .ok_or_else(|| PdfCombineError::invalid_config("Combined document has too many pages"))
}

/// Lay out a sequence of documents.
///
/// Convenience wrapper over [`compute_layout`] for documents whose page
/// counts are already known.
pub fn layout_documents(documents: &[InputDocument], policy: LayoutPolicy) -> Result<Layout> {
    let counts: Vec<u32> = documents.iter().map(|d| d.page_count).collect();
    compute_layout(&counts, policy)
}
