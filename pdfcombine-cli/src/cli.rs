//! CLI argument parsing for pdfcombine.
//!
//! This module defines the command-line interface using `clap` and turns
//! it into a [`Config`], optionally overlaid with a YAML file.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pdfcombine::config::file::ConfigFile;
use pdfcombine::config::{
    BookmarkSource, Config, EngineOptions, LayoutPolicy, Metadata, OverwriteMode, PageCounterKind,
    ScriptOptions,
};
use pdfcombine::error::{PdfCombineError, Result};
use pdfcombine::utils::collect_paths_for_patterns;

/// Combine several PDFs into a single PDF.
///
/// By default a PostScript script sets the metadata of the output: it gets
/// an outline with a bookmark to the first page of each input, titled with
/// the input's file name. Titles and metadata can be customised on the
/// command line or with a YAML file:
///
///     files:
///       - file: 1.pdf
///         title: First file
///       - file: 2.pdf
///         title: Second file
///     openleft: true
///     title: Binder
///     output: binder.pdf
///
/// Any long option (without `--`) may be set in the YAML file and takes
/// precedence over the command line.
#[derive(Parser, Debug)]
#[command(name = "pdfcombine")]
#[command(version)]
#[command(about = "Combine several PDFs into a single PDF", long_about)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files, in order (or the YAML file with --yaml)
    ///
    /// Glob patterns are expanded.
    ///
    /// Examples:
    ///   pdfcombine intro.pdf chapter*.pdf -o book.pdf
    ///   pdfcombine -y binder.yaml
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<String>,

    /// Read input files (and settings) from a YAML file
    #[arg(short, long)]
    pub yaml: bool,

    /// Start every document on an even (left) page
    #[arg(long)]
    pub openleft: bool,

    /// Start every document on an odd (right) page
    #[arg(long)]
    pub openright: bool,

    /// Set the title of the output PDF
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set the author of the output PDF
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Do not add a bookmark to the first page of each document
    #[arg(long)]
    pub no_bookmarks: bool,

    /// Add PostScript code to the generated script
    #[arg(long, value_name = "CODE")]
    pub add_ps: Option<String>,

    /// Replace the generated PostScript script
    #[arg(long, value_name = "CODE")]
    pub ps: Option<String>,

    /// Do not run any PostScript script (no metadata, no bookmarks)
    #[arg(long)]
    pub no_ps: bool,

    /// Name of the output file
    #[arg(short, long, value_name = "FILE", default_value = "binder.pdf")]
    pub output: PathBuf,

    /// Overwrite an existing output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Do not print any progress
    #[arg(short, long, conflicts_with = "verbose")]
    pub silent: bool,

    /// Print every command and the generated script
    #[arg(long)]
    pub verbose: bool,

    /// Compute the layout and script without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the merge report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Number of concurrent page-count lookups
    ///
    /// Default is the number of CPU cores.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Ghostscript executable
    #[arg(long, value_name = "PATH", env = "PDFCOMBINE_GS", default_value = "gs")]
    pub gs: PathBuf,

    /// Paper size of inserted blank pages
    #[arg(long, value_name = "SIZE", default_value = "a4")]
    pub paper_size: String,

    /// How to read page counts
    #[arg(long, value_name = "BACKEND", default_value = "gs")]
    #[arg(value_parser = ["gs", "lopdf"])]
    pub page_counter: String,
}

impl Cli {
    /// Build the configuration from the command line alone.
    ///
    /// Glob patterns among the inputs are expanded here.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid or matches nothing, or if
    /// the options are inconsistent.
    pub fn to_config(&self) -> Result<Config> {
        let inputs = collect_paths_for_patterns(&self.files)?;
        let config = self.config_with_inputs(inputs)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the configuration, reading the YAML file if `--yaml` is given.
    ///
    /// Values from the file override the command line.
    pub async fn resolve_config(&self) -> Result<Config> {
        if !self.yaml {
            return self.to_config();
        }

        let [path] = self.files.as_slice() else {
            return Err(PdfCombineError::invalid_config(
                "With --yaml, pass exactly one YAML file and list all input PDFs in it",
            ));
        };

        let file = ConfigFile::load(Path::new(path)).await?;
        let mut config = self.config_with_inputs(Vec::new())?;
        file.apply_to(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn config_with_inputs(&self, inputs: Vec<PathBuf>) -> Result<Config> {
        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let bookmarks = if self.no_bookmarks {
            BookmarkSource::Disabled
        } else {
            BookmarkSource::FileNames
        };

        Ok(Config {
            inputs,
            output: self.output.clone(),
            policy: LayoutPolicy::from_flags(self.openleft, self.openright)?,
            metadata: Metadata::new(self.title.clone(), self.author.clone()),
            bookmarks,
            script: ScriptOptions {
                enabled: !self.no_ps,
                override_script: self.ps.clone(),
                append: self.add_ps.clone(),
            },
            overwrite_mode,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.silent,
            jobs: self.jobs,
            engine: EngineOptions {
                program: self.gs.clone(),
                paper_size: self.paper_size.clone(),
            },
            page_counter: PageCounterKind::from_str(&self.page_counter)?,
        })
    }
}
