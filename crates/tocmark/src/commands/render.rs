//! `tocmark render` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use tocmark_config::{CliSettings, Config};
use tocmark_renderer::Markdown;

use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin, also with `-`).
    file: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover tocmark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Leave bare URLs as plain text.
    #[arg(long)]
    no_linkify: bool,

    /// Class prefix for fenced code blocks (overrides config).
    #[arg(long)]
    lang_prefix: Option<String>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the input cannot be read,
    /// rendering fails, or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            linkify: self.no_linkify.then_some(false),
            lang_prefix: self.lang_prefix,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let markdown = Markdown::new(config.render_options());

        let source = read_input(self.file.as_deref())?;
        let html = markdown.render(&source)?;

        match self.output {
            Some(path) => std::fs::write(path, html)?,
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.write_all(b"\n")?;
            }
        }
        Ok(())
    }
}

fn read_input(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}
