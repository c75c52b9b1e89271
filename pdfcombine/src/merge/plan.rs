//! Ordered instructions for the merge engine.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{PdfCombineError, Result};
use crate::merge::layout::Layout;

/// One step of the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "camelCase")]
pub enum MergeStep {
    /// Emit an empty page.
    Blank,
    /// Append every page of a document.
    Document(PathBuf),
}

/// Sequence of blanks and documents, in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergePlan {
    steps: Vec<MergeStep>,
}

impl MergePlan {
    /// Plan that concatenates the inputs without any padding.
    pub fn sequential(inputs: &[PathBuf]) -> Self {
        Self {
            steps: inputs.iter().cloned().map(MergeStep::Document).collect(),
        }
    }

    /// Plan that inserts the blank pages a layout calls for.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout was computed for a different number
    /// of documents.
    pub fn from_layout(inputs: &[PathBuf], layout: &Layout) -> Result<Self> {
        if inputs.len() != layout.len() {
            return Err(PdfCombineError::other(format!(
                "Layout covers {} document(s) but {} were given",
                layout.len(),
                inputs.len()
            )));
        }

        let mut steps = Vec::with_capacity(inputs.len() + layout.blank_pages());
        for (index, path) in inputs.iter().enumerate() {
            if layout.blank_before(index) {
                steps.push(MergeStep::Blank);
            }
            steps.push(MergeStep::Document(path.clone()));
        }

        Ok(Self { steps })
    }

    /// All steps in order.
    pub fn steps(&self) -> &[MergeStep] {
        &self.steps
    }

    /// Documents in the order they are appended.
    pub fn documents(&self) -> impl Iterator<Item = &Path> {
        self.steps.iter().filter_map(|step| match step {
            MergeStep::Document(path) => Some(path.as_path()),
            MergeStep::Blank => None,
        })
    }

    /// Number of blank pages emitted.
    pub fn blank_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, MergeStep::Blank))
            .count()
    }

    /// Whether there is nothing to merge.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
