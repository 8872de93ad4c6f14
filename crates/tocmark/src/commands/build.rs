//! `tocmark build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use rayon::prelude::*;
use tocmark_config::{BuildConfig, CliSettings, Config, normalize_path};
use tocmark_renderer::Markdown;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover tocmark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for rendered HTML (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose output (log every rendered document).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the source directory cannot be
    /// scanned, or any document fails to render.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let build = &config.build_resolved;

        output.build_started(&build.source_dir, &build.output_dir);

        let markdown = Markdown::new(config.render_options());
        let report = build_all(&markdown, build)?;

        for failure in &report.failures {
            output.document_failed(&failure.path, &failure.message);
        }

        if report.failures.is_empty() {
            output.build_finished(report.rendered, &build.output_dir);
            Ok(())
        } else {
            Err(CliError::Build {
                failed: report.failures.len(),
                total: report.rendered + report.failures.len(),
            })
        }
    }
}

/// A document that could not be rendered or written.
#[derive(Debug)]
pub(crate) struct BuildFailure {
    /// Path relative to the source directory.
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a build.
#[derive(Debug, Default)]
pub(crate) struct BuildReport {
    pub rendered: usize,
    pub failures: Vec<BuildFailure>,
}

/// Render every Markdown document under `config.source_dir` into
/// `config.output_dir`, mirroring the directory layout.
///
/// Documents render in parallel against the shared `markdown` renderer.
/// A failing document is recorded in the report and does not stop the others.
///
/// # Errors
///
/// Returns an error if the source directory is missing or cannot be scanned.
pub(crate) fn build_all(markdown: &Markdown, config: &BuildConfig) -> Result<BuildReport, CliError> {
    if !config.source_dir.is_dir() {
        return Err(CliError::Validation(format!(
            "Source directory not found: {}",
            config.source_dir.display()
        )));
    }

    let documents = discover_documents(config)?;
    tracing::info!(count = documents.len(), "Discovered markdown documents");

    let results: Vec<(PathBuf, Result<(), String>)> = documents
        .into_par_iter()
        .map(|relative| {
            let result = build_document(markdown, config, &relative);
            (relative, result)
        })
        .collect();

    let mut report = BuildReport::default();
    for (path, result) in results {
        match result {
            Ok(()) => report.rendered += 1,
            Err(message) => {
                tracing::warn!(path = %path.display(), error = %message, "Failed to render document");
                report.failures.push(BuildFailure { path, message });
            }
        }
    }
    Ok(report)
}

fn build_document(markdown: &Markdown, config: &BuildConfig, relative: &Path) -> Result<(), String> {
    let source = std::fs::read_to_string(config.source_dir.join(relative))
        .map_err(|e| format!("read failed: {e}"))?;
    let html = markdown.render(&source).map_err(|e| e.to_string())?;

    let target = config.output_dir.join(relative).with_extension("html");
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| format!("create directory failed: {e}"))?;
    }
    std::fs::write(&target, html).map_err(|e| format!("write failed: {e}"))?;

    tracing::info!(path = %relative.display(), "Rendered document");
    Ok(())
}

/// Find `.md` files under the source directory, as sorted relative paths.
///
/// Hidden entries, the output directory and excluded paths are skipped.
fn discover_documents(config: &BuildConfig) -> Result<Vec<PathBuf>, CliError> {
    let source_dir = normalize_path(&config.source_dir);
    let output_dir = normalize_path(&config.output_dir);
    let mut documents = Vec::new();
    scan_directory(config, &output_dir, &source_dir, Path::new(""), &mut documents)?;
    documents.sort();
    Ok(documents)
}

fn scan_directory(
    config: &BuildConfig,
    output_dir: &Path,
    dir: &Path,
    relative: &Path,
    documents: &mut Vec<PathBuf>,
) -> Result<(), CliError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let rel_path = relative.join(&name);
        if config.is_excluded(&rel_path) {
            continue;
        }

        if entry.file_type()?.is_dir() {
            if path == output_dir {
                continue;
            }
            scan_directory(config, output_dir, &path, &rel_path, documents)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            documents.push(rel_path);
        }
    }
    Ok(())
}
