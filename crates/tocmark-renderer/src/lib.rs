//! Markdown to HTML rendering with heading anchors and a table of contents.
//!
//! This crate provides [`Markdown`], an immutable renderer configured once
//! with [`RenderOptions`] and shared across documents.
//!
//! # Architecture
//!
//! Rendering is a linear pipeline over `pulldown-cmark` events:
//! 1. Parse (tables and strikethrough enabled, raw HTML optional)
//! 2. [`Linkify`]: bare URLs and emails become links (when enabled)
//! 3. [`HeadingAnchors`]: every heading gets a unique slug id
//! 4. [`TableOfContents`]: the `[toc]` paragraph becomes a nested list of
//!    headings at levels 1-3, linking to the ids from step 3
//! 5. HTML output, with fenced code classes prefixed by `lang_prefix`
//!
//! Steps 2-4 are [`Transform`] values in a [`Pipeline`]; a custom pipeline
//! can be supplied with [`Markdown::with_pipeline`].
//!
//! # Example
//!
//! ```
//! use tocmark_renderer::{Markdown, RenderOptions};
//!
//! let markdown = Markdown::new(RenderOptions::default());
//! let html = markdown.render("# Title\n\n[toc]\n\n## Sub")?;
//!
//! assert!(html.contains(r#"<h2 id="sub">Sub</h2>"#));
//! assert!(html.contains(r##"<a href="#sub">Sub</a>"##));
//! # Ok::<(), tocmark_renderer::RenderError>(())
//! ```

mod anchor;
mod error;
mod html;
mod linkify;
mod markdown;
mod options;
mod pipeline;
mod state;
mod toc;
mod util;

pub use anchor::{HeadingAnchors, SlugRegistry, slugify};
pub use error::RenderError;
pub use linkify::Linkify;
pub use markdown::{Markdown, RenderResult};
pub use options::{AnchorOptions, ListType, RenderOptions, TocOptions};
pub use pipeline::{Pipeline, Transform};
pub use state::escape_html;
pub use toc::{TableOfContents, TocEntry};
