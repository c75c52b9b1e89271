//! The combine pipeline.
//!
//! validate → count pages → lay out → synthesize script → build plan →
//! run engine into a temporary file → move it over the output.
//!
//! Every step before the engine is side-effect free apart from reading
//! the inputs, and any error aborts before the output is touched.

use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::{Config, LayoutPolicy};
use crate::error::Result;
use crate::io::{AtomicOutput, MergeEngine, PageCountReader, PageCounter, ScriptFile};
use crate::merge::layout::{InputDocument, Layout, compute_layout};
use crate::merge::plan::MergePlan;
use crate::merge::script::{Bookmark, MetadataScript, compose, pair_bookmarks, synthesize};
use crate::output::OutputFormatter;
use crate::validation::Validator;

/// What a combine run decided and did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Output path.
    pub output: PathBuf,

    /// Layout policy used.
    pub policy: LayoutPolicy,

    /// Inputs with page counts and bookmark labels.
    ///
    /// Empty when counting was not needed.
    pub documents: Vec<InputDocument>,

    /// Placement of every document, when page counts were read.
    pub layout: Option<Layout>,

    /// Outline entries written.
    pub bookmarks: Vec<Bookmark>,

    /// Script handed to the engine (empty: none).
    pub script: MetadataScript,

    /// Instructions handed to the engine.
    pub plan: MergePlan,

    /// Whether the engine was skipped.
    pub dry_run: bool,

    /// Size of the written output in bytes (0 for a dry run).
    pub output_size: u64,

    /// Wall time of the whole run.
    pub elapsed: Duration,
}

impl MergeReport {
    /// Number of input files.
    pub fn files(&self) -> usize {
        self.plan.documents().count()
    }

    /// Pages of the output including blanks, when known.
    pub fn total_pages(&self) -> Option<u32> {
        self.layout.as_ref().map(Layout::total_pages)
    }
}

/// Combines PDF files with a page counter and a merge engine.
pub struct Merger<C, E> {
    counter: C,
    engine: E,
    formatter: OutputFormatter,
}

impl<C: PageCounter, E: MergeEngine> Merger<C, E> {
    /// Create a merger that reports nothing.
    pub fn new(counter: C, engine: E) -> Self {
        Self {
            counter,
            engine,
            formatter: OutputFormatter::quiet(),
        }
    }

    /// Report progress through `formatter`.
    pub fn with_formatter(mut self, formatter: OutputFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// The page counter in use.
    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// The merge engine in use.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Combine the inputs of `config` into its output.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration or the inputs are invalid
    /// - A page count cannot be read or is zero
    /// - The metadata script or the output cannot be written
    /// - The engine fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfcombine::merge::Merger;
    /// # use pdfcombine::io::Ghostscript;
    /// # use pdfcombine::config::Config;
    /// # async fn example(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    /// let merger = Merger::new(Ghostscript::default(), Ghostscript::default());
    /// let report = merger.combine(&config).await?;
    /// println!("Combined {} files", report.files());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn combine(&self, config: &Config) -> Result<MergeReport> {
        let start = Instant::now();

        Validator::new().validate_config(config).await?;

        let labels = config.bookmark_labels();
        let (documents, layout) = if config.needs_page_counts() {
            let (documents, layout) = self.lay_out(config, &labels).await?;
            (documents, Some(layout))
        } else {
            self.formatter
                .debug("Page counts not needed, skipping lookups");
            (Vec::new(), None)
        };

        let (plan, bookmarks) = match &layout {
            Some(layout) => (
                MergePlan::from_layout(&config.inputs, layout)?,
                pair_bookmarks(&labels, layout)?,
            ),
            None => (MergePlan::sequential(&config.inputs), Vec::new()),
        };

        let script = if config.script.enabled {
            compose(
                synthesize(
                    config.metadata.title.as_deref(),
                    config.metadata.author.as_deref(),
                    &bookmarks,
                ),
                config.script.override_script.as_deref(),
                config.script.append.as_deref(),
            )
        } else {
            MetadataScript::default()
        };

        let mut report = MergeReport {
            output: config.output.clone(),
            policy: config.policy,
            documents,
            layout,
            bookmarks,
            script,
            plan,
            dry_run: config.dry_run,
            output_size: 0,
            elapsed: Duration::ZERO,
        };

        if !config.dry_run {
            report.output_size = self.execute(config, &report).await?;
        }

        report.elapsed = start.elapsed();
        Ok(report)
    }

    async fn lay_out(&self, config: &Config, labels: &[String]) -> Result<(Vec<InputDocument>, Layout)> {
        self.formatter.section("reading number of pages per file");

        let reader = PageCountReader::new(config.effective_jobs());
        let counts = reader
            .count_with_progress(&self.counter, &config.inputs, |_, path, count| {
                self.formatter
                    .debug(&format!("{}: {count} page(s)", path.display()));
            })
            .await?;

        let layout = compute_layout(&counts, config.policy)?;

        let documents = config
            .inputs
            .iter()
            .zip(&counts)
            .enumerate()
            .map(|(i, (path, &count))| InputDocument::new(path.clone(), count, labels.get(i).cloned()))
            .collect();

        Ok((documents, layout))
    }

    async fn execute(&self, config: &Config, report: &MergeReport) -> Result<u64> {
        let script_file = if report.script.is_empty() {
            None
        } else {
            let file = ScriptFile::write(&report.script).await?;
            self.formatter
                .section(&format!("created \"{}\"", file.path().display()));
            self.formatter.block(report.script.as_str());
            Some(file)
        };
        let script_path = script_file.as_ref().map(ScriptFile::path);

        let output = AtomicOutput::create(&config.output)?;

        self.formatter.section("combining files");
        if let Some(command) = self.engine.describe(&report.plan, output.path(), script_path) {
            self.formatter.command(&command);
        }

        self.engine
            .merge(&report.plan, output.path(), script_path)
            .await?;

        output.persist()
    }
}
