//! Colored terminal status for build runs.

use std::path::Path;

use console::{Style, Term};

/// Status printer on stderr, so HTML written to stdout stays clean.
pub(crate) struct Output {
    term: Term,
    heading: Style,
    ok: Style,
    warn: Style,
    err: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            heading: Style::new().cyan().bold(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            err: Style::new().red(),
        }
    }

    fn line(&self, style: Option<&Style>, msg: &str) {
        let _ = match style {
            Some(style) => self.term.write_line(&style.apply_to(msg).to_string()),
            None => self.term.write_line(msg),
        };
    }

    /// Print the build banner with its source and output directories.
    pub(crate) fn build_started(&self, source_dir: &Path, output_dir: &Path) {
        self.line(Some(&self.heading), "Building documents");
        self.line(None, &format!("  source: {}", source_dir.display()));
        self.line(None, &format!("  output: {}", output_dir.display()));
    }

    /// Print one document that failed to build (yellow).
    pub(crate) fn document_failed(&self, path: &Path, message: &str) {
        self.line(
            Some(&self.warn),
            &format!("  failed {}: {message}", path.display()),
        );
    }

    /// Print the success summary (green).
    pub(crate) fn build_finished(&self, rendered: usize, output_dir: &Path) {
        let noun = if rendered == 1 { "document" } else { "documents" };
        self.line(
            Some(&self.ok),
            &format!("Rendered {rendered} {noun} to {}", output_dir.display()),
        );
    }

    /// Print a fatal error (red).
    pub(crate) fn error(&self, msg: &str) {
        self.line(Some(&self.err), msg);
    }
}
