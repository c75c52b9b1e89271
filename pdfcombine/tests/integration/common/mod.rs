//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use lopdf::{Document, Object, Stream, dictionary};
use pdfcombine::config::{Config, OverwriteMode, PageCounterKind};
use pdfcombine::error::{PdfCombineError, Result};
use pdfcombine::io::MergeEngine;
use pdfcombine::merge::{MergePlan, MergeStep};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Write a PDF with `pages` empty A4 pages to `dir/name`.
pub fn create_test_pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    write_pdf(&path, pages);
    path
}

fn write_pdf(path: &Path, pages: usize) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));

    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Resources" => dictionary! {},
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).unwrap();
}

/// Number of pages of the PDF at `path`.
pub fn pdf_page_count(path: &Path) -> usize {
    Document::load(path).unwrap().get_pages().len()
}

/// Quiet configuration that counts pages in-process and overwrites freely.
pub fn test_config(inputs: Vec<PathBuf>, output: PathBuf) -> Config {
    let mut config = Config::new(inputs, output);
    config.quiet = true;
    config.overwrite_mode = OverwriteMode::Force;
    config.page_counter = PageCounterKind::Lopdf;
    config
}

/// One call to [`PageTallyEngine::merge`].
#[derive(Debug, Clone)]
pub struct RecordedMerge {
    pub plan: MergePlan,
    pub script: Option<String>,
}

/// Engine that writes a blank PDF with as many pages as the real merge
/// would produce, and remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct PageTallyEngine {
    calls: Mutex<Vec<RecordedMerge>>,
    fail: bool,
}

impl PageTallyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<RecordedMerge> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_script(&self) -> Option<String> {
        self.calls().last().and_then(|call| call.script.clone())
    }
}

impl MergeEngine for PageTallyEngine {
    async fn merge(&self, plan: &MergePlan, output: &Path, script: Option<&Path>) -> Result<()> {
        let script = script.map(|path| std::fs::read_to_string(path).unwrap());
        self.calls.lock().unwrap().push(RecordedMerge {
            plan: plan.clone(),
            script,
        });

        if self.fail {
            return Err(PdfCombineError::EngineFailed {
                program: "tally".to_string(),
                operation: "merging".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "simulated failure".to_string(),
            });
        }

        let pages = plan
            .steps()
            .iter()
            .map(|step| match step {
                MergeStep::Blank => 1,
                MergeStep::Document(path) => pdf_page_count(path),
            })
            .sum();
        write_pdf(output, pages);
        Ok(())
    }
}

/// Target pages of the outline entries of a pdfmark script.
pub fn outline_pages(script: &str) -> Vec<u32> {
    script
        .lines()
        .filter(|line| line.ends_with("/OUT pdfmark"))
        .filter_map(|line| line.split_whitespace().nth(2))
        .filter_map(|page| page.parse().ok())
        .collect()
}
