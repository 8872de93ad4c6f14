//! The integration entry point: Markdown text in, HTML out.

use pulldown_cmark::{Options, Parser};

use crate::RenderError;
use crate::anchor::HeadingAnchors;
use crate::html::HtmlWriter;
use crate::linkify::Linkify;
use crate::options::RenderOptions;
use crate::pipeline::Pipeline;
use crate::toc::{TableOfContents, TocEntry, toc_entries};
use crate::util::{disable_raw_html, merge_text};

/// Result of rendering a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Headings at the configured table of contents levels, in source order.
    pub toc: Vec<TocEntry>,
}

/// Configured Markdown renderer.
///
/// Built once and shared; rendering takes `&self` and keeps all per-document
/// state on the stack, so one instance can serve many threads.
#[derive(Debug)]
pub struct Markdown {
    options: RenderOptions,
    pipeline: Pipeline,
}

impl Markdown {
    /// Create a renderer with the standard pipeline: linkify (when enabled),
    /// heading anchors, then table of contents.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        let pipeline = standard_pipeline(&options);
        Self { options, pipeline }
    }

    /// Create a renderer with a custom pipeline.
    ///
    /// `options.linkify`, `options.anchors` and `options.toc` only take effect
    /// through the transforms in `pipeline`.
    #[must_use]
    pub fn with_pipeline(options: RenderOptions, pipeline: Pipeline) -> Self {
        Self { options, pipeline }
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Render Markdown to an HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a pipeline transform.
    pub fn render(&self, markdown: &str) -> Result<String, RenderError> {
        self.render_document(markdown).map(|result| result.html)
    }

    /// Render Markdown and also return the table of contents entries.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a pipeline transform.
    pub fn render_document(&self, markdown: &str) -> Result<RenderResult, RenderError> {
        let parser = Parser::new_ext(markdown, parser_options());
        let events = if self.options.html {
            merge_text(parser)
        } else {
            merge_text(disable_raw_html(parser))
        };

        let events = self.pipeline.run(events)?;
        let toc = toc_entries(&events, &self.options.toc);
        let html = HtmlWriter::new(&self.options.lang_prefix).write(events);

        tracing::debug!(
            input_len = markdown.len(),
            output_len = html.len(),
            headings = toc.len(),
            "Rendered markdown"
        );

        Ok(RenderResult { html, toc })
    }
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Parser extensions matching the usual Markdown site defaults.
fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

fn standard_pipeline(options: &RenderOptions) -> Pipeline {
    let mut pipeline = Pipeline::new();
    if options.linkify {
        pipeline.push(Linkify);
    }
    pipeline
        .with(HeadingAnchors::new(options.anchors.clone()))
        .with(TableOfContents::new(options.toc.clone()))
}
