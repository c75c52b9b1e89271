//! Integration tests for YAML configuration files.

use pdfcombine::config::file::ConfigFile;
use pdfcombine::config::{BookmarkSource, Config, LayoutPolicy, OverwriteMode, PageCounterKind};
use pdfcombine::error::PdfCombineError;
use pdfcombine::io::LopdfPageCounter;
use pdfcombine::merge::Merger;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::{PageTallyEngine, create_test_pdf, outline_pages, pdf_page_count};

async fn load_config(dir: &TempDir, yaml: &str) -> pdfcombine::Result<Config> {
    let path = dir.path().join("binder.yaml");
    tokio::fs::write(&path, yaml).await.unwrap();

    let file = ConfigFile::load(&path).await?;
    let mut config = Config::new(Vec::new(), dir.path().join("default.pdf"));
    config.quiet = true;
    config.overwrite_mode = OverwriteMode::Force;
    config.page_counter = PageCounterKind::Lopdf;
    file.apply_to(&mut config)?;
    Ok(config)
}

#[tokio::test]
async fn test_config_file_titled_entries() {
    let temp_dir = TempDir::new().unwrap();
    let first = create_test_pdf(temp_dir.path(), "1.pdf", 3);
    let second = create_test_pdf(temp_dir.path(), "2.pdf", 2);
    let output = temp_dir.path().join("binder.pdf");

    let yaml = format!(
        "files:\n  - file: '{}'\n    title: First file\n  - file: '{}'\n    title: Second file\n\nopenright: true\ntitle: Binder\nauthor: Jane Doe\noutput: '{}'\n",
        first.display(),
        second.display(),
        output.display(),
    );
    let config = load_config(&temp_dir, &yaml).await.unwrap();

    assert_eq!(config.inputs, vec![first, second]);
    assert_eq!(config.output, output);
    assert_eq!(config.policy, LayoutPolicy::OpenRight);
    assert_eq!(
        config.bookmarks,
        BookmarkSource::Labels(vec!["First file".into(), "Second file".into()])
    );

    let merger = Merger::new(LopdfPageCounter::new(), PageTallyEngine::new());
    let report = merger.combine(&config).await.unwrap();

    // 3 pages, one blank, 2 pages
    assert_eq!(pdf_page_count(&output), 6);
    assert_eq!(report.layout.unwrap().start_pages(), &[1, 5]);

    let script = merger.engine().last_script().unwrap();
    assert_eq!(outline_pages(&script), vec![1, 5]);
    assert!(script.starts_with("[ /Title (Binder) /DOCINFO pdfmark\n[ /Author (Jane Doe) /DOCINFO pdfmark"));
    assert!(script.contains("/Title (Second file) /OUT pdfmark"));
}

#[tokio::test]
async fn test_config_file_plain_entries_use_file_names() {
    let temp_dir = TempDir::new().unwrap();
    let first = create_test_pdf(temp_dir.path(), "1.pdf", 1);
    let second = create_test_pdf(temp_dir.path(), "2.pdf", 1);

    let yaml = format!(
        "files:\n  - '{}'\n  - '{}'\nopenleft: true\n",
        first.display(),
        second.display(),
    );
    let config = load_config(&temp_dir, &yaml).await.unwrap();

    assert_eq!(config.policy, LayoutPolicy::OpenLeft);
    assert_eq!(config.bookmarks, BookmarkSource::FileNames);
    assert_eq!(
        config.bookmark_labels(),
        vec![first.display().to_string(), second.display().to_string()]
    );
}

#[tokio::test]
async fn test_config_file_script_options() {
    let temp_dir = TempDir::new().unwrap();
    let first = create_test_pdf(temp_dir.path(), "1.pdf", 2);

    let yaml = format!(
        "files: ['{}']\nbookmarks: false\nadd-ps: '[ /Subject (Notes) /DOCINFO pdfmark'\n",
        first.display(),
    );
    let config = load_config(&temp_dir, &yaml).await.unwrap();

    assert_eq!(config.bookmarks, BookmarkSource::Disabled);
    assert!(config.bookmark_labels().is_empty());

    let merger = Merger::new(LopdfPageCounter::new(), PageTallyEngine::new());
    merger.combine(&config).await.unwrap();

    assert_eq!(
        merger.engine().last_script().as_deref(),
        Some("[ /Subject (Notes) /DOCINFO pdfmark")
    );
}

#[tokio::test]
async fn test_config_file_no_ps() {
    let temp_dir = TempDir::new().unwrap();
    let first = create_test_pdf(temp_dir.path(), "1.pdf", 2);

    let yaml = format!("files: ['{}']\ntitle: Dropped\nno-ps: true\n", first.display());
    let config = load_config(&temp_dir, &yaml).await.unwrap();

    let merger = Merger::new(LopdfPageCounter::new(), PageTallyEngine::new());
    merger.combine(&config).await.unwrap();

    assert_eq!(merger.engine().calls()[0].script, None);
}

#[tokio::test]
async fn test_config_file_conflicting_layout() {
    let temp_dir = TempDir::new().unwrap();

    let err = load_config(&temp_dir, "files: [a.pdf]\nopenleft: true\nopenright: true\n")
        .await
        .unwrap_err();

    assert!(matches!(err, PdfCombineError::ConflictingLayout));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_config_file_without_files() {
    let temp_dir = TempDir::new().unwrap();

    let config = load_config(&temp_dir, "title: Nothing to bind\n").await.unwrap();

    assert!(config.inputs.is_empty());
    assert!(matches!(config.validate(), Err(PdfCombineError::NoFilesToMerge)));
}

#[tokio::test]
async fn test_config_file_invalid_yaml() {
    let temp_dir = TempDir::new().unwrap();

    let err = load_config(&temp_dir, "files: [a.pdf\n").await.unwrap_err();

    assert!(matches!(err, PdfCombineError::InvalidConfigFile { .. }));
}

#[tokio::test]
async fn test_config_file_missing() {
    let err = ConfigFile::load(&PathBuf::from("/nonexistent/binder.yaml"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfCombineError::FailedToReadConfig { .. }));
    assert_eq!(err.exit_code(), 2);
}
