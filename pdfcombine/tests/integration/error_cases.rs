//! Integration tests for error handling and edge cases.

use pdfcombine::config::{BookmarkSource, OverwriteMode};
use pdfcombine::error::PdfCombineError;
use pdfcombine::io::LopdfPageCounter;
use pdfcombine::merge::{self, Merger};
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::{PageTallyEngine, create_test_pdf, test_config};

#[tokio::test]
async fn test_error_nonexistent_input() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(
        vec![PathBuf::from("/nonexistent/file.pdf")],
        temp_dir.path().join("binder.pdf"),
    );

    let merger = Merger::new(LopdfPageCounter::new(), PageTallyEngine::new());
    let err = merger.combine(&config).await.unwrap_err();

    assert!(matches!(err, PdfCombineError::FileNotFound { .. }));
    assert!(merger.engine().calls().is_empty());
}

#[tokio::test]
async fn test_error_directory_input() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(
        vec![temp_dir.path().to_path_buf()],
        temp_dir.path().join("binder.pdf"),
    );

    let merger = Merger::new(LopdfPageCounter::new(), PageTallyEngine::new());
    let err = merger.combine(&config).await.unwrap_err();

    assert!(matches!(err, PdfCombineError::NotAFile { .. }));
}

#[tokio::test]
async fn test_error_empty_input_list() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(Vec::new(), temp_dir.path().join("binder.pdf"));

    let merger = Merger::new(LopdfPageCounter::new(), PageTallyEngine::new());
    let err = merger.combine(&config).await.unwrap_err();

    assert!(matches!(err, PdfCombineError::NoFilesToMerge));
}

#[tokio::test]
async fn test_error_unreadable_pdf() {
    let temp_dir = TempDir::new().unwrap();
    let good = create_test_pdf(temp_dir.path(), "good.pdf", 2);
    let bad = temp_dir.path().join("bad.pdf");
    std::fs::write(&bad, b"this is not a pdf").unwrap();
    let output = temp_dir.path().join("binder.pdf");

    let config = test_config(vec![good, bad.clone()], output.clone());

    let merger = Merger::new(LopdfPageCounter::new(), PageTallyEngine::new());
    let err = merger.combine(&config).await.unwrap_err();

    match &err {
        PdfCombineError::PageCountFailed { path, .. } => assert_eq!(path, &bad),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 3);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_error_empty_document() {
    let temp_dir = TempDir::new().unwrap();
    let empty = create_test_pdf(temp_dir.path(), "empty.pdf", 0);

    let config = test_config(vec![empty], temp_dir.path().join("binder.pdf"));

    let merger = Merger::new(LopdfPageCounter::new(), PageTallyEngine::new());
    let err = merger.combine(&config).await.unwrap_err();

    assert!(matches!(err, PdfCombineError::InvalidPageCount { .. }));
}

#[tokio::test]
async fn test_error_label_count_mismatch() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = vec![
        create_test_pdf(temp_dir.path(), "a.pdf", 1),
        create_test_pdf(temp_dir.path(), "b.pdf", 1),
    ];

    let mut config = test_config(inputs, temp_dir.path().join("binder.pdf"));
    config.bookmarks = BookmarkSource::Labels(vec!["Only one".into()]);

    let merger = Merger::new(LopdfPageCounter::new(), PageTallyEngine::new());
    let err = merger.combine(&config).await.unwrap_err();

    assert!(matches!(
        err,
        PdfCombineError::BookmarkCountMismatch { labels: 1, files: 2 }
    ));
}

#[tokio::test]
async fn test_error_output_is_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_pdf(temp_dir.path(), "a.pdf", 1);

    let config = test_config(vec![input.clone()], input.clone());

    let merger = Merger::new(LopdfPageCounter::new(), PageTallyEngine::new());
    let err = merger.combine(&config).await.unwrap_err();

    assert!(matches!(err, PdfCombineError::OutputIsInput { .. }));
    assert!(merger.engine().calls().is_empty());
}

#[tokio::test]
async fn test_error_no_clobber() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_pdf(temp_dir.path(), "a.pdf", 1);
    let output = temp_dir.path().join("binder.pdf");
    std::fs::write(&output, b"existing").unwrap();

    let mut config = test_config(vec![input], output.clone());
    config.overwrite_mode = OverwriteMode::NoClobber;

    let merger = Merger::new(LopdfPageCounter::new(), PageTallyEngine::new());
    let err = merger.combine(&config).await.unwrap_err();

    assert!(matches!(err, PdfCombineError::OutputExists { .. }));
    assert_eq!(std::fs::read(&output).unwrap(), b"existing");
}

#[tokio::test]
async fn test_error_engine_failure_keeps_previous_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_pdf(temp_dir.path(), "a.pdf", 1);
    let output = temp_dir.path().join("binder.pdf");
    std::fs::write(&output, b"previous").unwrap();

    let config = test_config(vec![input], output.clone());

    let merger = Merger::new(LopdfPageCounter::new(), PageTallyEngine::failing());
    let err = merger.combine(&config).await.unwrap_err();

    assert!(matches!(err, PdfCombineError::EngineFailed { .. }));
    assert_eq!(err.exit_code(), 6);
    assert_eq!(std::fs::read(&output).unwrap(), b"previous");

    // No partial output left behind
    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(".pdfcombine-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_error_engine_not_installed() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_pdf(temp_dir.path(), "a.pdf", 1);
    let output = temp_dir.path().join("binder.pdf");

    let mut config = test_config(vec![input], output.clone());
    config.engine.program = PathBuf::from("/nonexistent/bin/gs");

    let err = merge::combine(&config).await.unwrap_err();

    assert!(matches!(err, PdfCombineError::EngineUnavailable { .. }));
    assert_eq!(err.exit_code(), 6);
    assert!(!output.exists());
}
