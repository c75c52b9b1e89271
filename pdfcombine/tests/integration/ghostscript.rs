//! End-to-end tests against a real Ghostscript installation.
//!
//! Skipped when `gs` cannot be run.

use lopdf::{Dictionary, Document, Object, ObjectId};
use pdfcombine::config::{BookmarkSource, LayoutPolicy, Metadata, PageCounterKind};
use pdfcombine::error::PdfCombineError;
use pdfcombine::io::{Ghostscript, PageCounter};
use pdfcombine::merge;
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;

use crate::common::{create_test_pdf, pdf_page_count, test_config};

async fn ghostscript() -> Option<Ghostscript> {
    let gs = Ghostscript::default();
    if gs.is_available().await {
        Some(gs)
    } else {
        eprintln!("Skipping test: Ghostscript not found");
        None
    }
}

#[tokio::test]
async fn test_ghostscript_page_count() {
    let Some(gs) = ghostscript().await else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();
    let pdf = create_test_pdf(temp_dir.path(), "three.pdf", 3);

    assert_eq!(gs.page_count(&pdf).await.unwrap(), 3);
}

#[tokio::test]
async fn test_ghostscript_page_count_path_with_parentheses() {
    let Some(gs) = ghostscript().await else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();
    let pdf = create_test_pdf(temp_dir.path(), "odd (name).pdf", 2);

    assert_eq!(gs.page_count(&pdf).await.unwrap(), 2);
}

#[tokio::test]
async fn test_ghostscript_page_count_not_a_pdf() {
    let Some(gs) = ghostscript().await else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();
    let bad = temp_dir.path().join("bad.pdf");
    std::fs::write(&bad, b"not a pdf").unwrap();

    let err = gs.page_count(&bad).await.unwrap_err();

    assert!(matches!(err, PdfCombineError::PageCountFailed { .. }));
}

/// Decode a PDF text string: UTF-16BE with BOM, UTF-8 with BOM, or
/// PDFDocEncoding (treated as Latin-1).
fn decode_pdf_text(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).unwrap()
    } else if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8(rest.to_vec()).unwrap()
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap(),
        other => other,
    }
}

fn dictionary<'a>(doc: &'a Document, object: &'a Object) -> &'a Dictionary {
    resolve(doc, object).as_dict().unwrap()
}

fn text_entry(doc: &Document, dict: &Dictionary, key: &[u8]) -> String {
    decode_pdf_text(resolve(doc, dict.get(key).unwrap()).as_str().unwrap())
}

/// Document info `(title, author)`.
fn document_info(doc: &Document) -> (String, String) {
    let info = dictionary(doc, doc.trailer.get(b"Info").unwrap());
    (text_entry(doc, info, b"Title"), text_entry(doc, info, b"Author"))
}

/// Top-level outline entries as `(title, page number)`.
fn outline_entries(doc: &Document) -> Vec<(String, u32)> {
    let page_numbers: BTreeMap<ObjectId, u32> =
        doc.get_pages().into_iter().map(|(number, id)| (id, number)).collect();

    let catalog = dictionary(doc, doc.trailer.get(b"Root").unwrap());
    let outlines = dictionary(doc, catalog.get(b"Outlines").unwrap());

    let mut entries = Vec::new();
    let mut next = outlines.get(b"First").ok();
    while let Some(object) = next {
        let item = dictionary(doc, object);
        let destination = match item.get(b"Dest") {
            Ok(dest) => resolve(doc, dest),
            Err(_) => {
                let action = dictionary(doc, item.get(b"A").unwrap());
                resolve(doc, action.get(b"D").unwrap())
            }
        };
        let page_id = destination.as_array().unwrap()[0].as_reference().unwrap();

        entries.push((text_entry(doc, item, b"Title"), page_numbers[&page_id]));
        next = item.get(b"Next").ok();
    }
    entries
}

fn load(path: &Path) -> Document {
    Document::load(path).unwrap()
}

#[tokio::test]
async fn test_ghostscript_combine_open_right() {
    if ghostscript().await.is_none() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let inputs = vec![
        create_test_pdf(temp_dir.path(), "a.pdf", 3),
        create_test_pdf(temp_dir.path(), "b.pdf", 4),
        create_test_pdf(temp_dir.path(), "c.pdf", 5),
    ];
    let output = temp_dir.path().join("binder.pdf");

    let mut config = test_config(inputs, output.clone());
    config.page_counter = PageCounterKind::Ghostscript;
    config.policy = LayoutPolicy::OpenRight;
    config.metadata = Metadata::new(Some("Binder".into()), Some("Jane Doe".into()));
    config.bookmarks = BookmarkSource::Labels(vec![
        "Intro".into(),
        "Über".into(),
        "Appendix (A)".into(),
    ]);

    let report = merge::combine(&config).await.unwrap();

    assert_eq!(report.total_pages(), Some(13));
    assert_eq!(pdf_page_count(&output), 13);
    assert!(report.output_size > 0);

    let doc = load(&output);
    assert_eq!(
        document_info(&doc),
        ("Binder".to_string(), "Jane Doe".to_string())
    );
    assert_eq!(
        outline_entries(&doc),
        vec![
            ("Intro".to_string(), 1),
            ("Über".to_string(), 5),
            ("Appendix (A)".to_string(), 9),
        ]
    );
}

#[tokio::test]
async fn test_ghostscript_combine_open_left() {
    if ghostscript().await.is_none() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let inputs = vec![
        create_test_pdf(temp_dir.path(), "a.pdf", 1),
        create_test_pdf(temp_dir.path(), "b.pdf", 2),
    ];
    let output = temp_dir.path().join("binder.pdf");

    let mut config = test_config(inputs, output.clone());
    config.policy = LayoutPolicy::OpenLeft;

    merge::combine(&config).await.unwrap();

    // blank, a, blank, b b
    assert_eq!(pdf_page_count(&output), 5);
}
