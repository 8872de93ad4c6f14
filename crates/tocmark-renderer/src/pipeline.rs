//! Ordered event transforms applied between parsing and HTML output.
//!
//! Each extension (linkify, heading anchors, table of contents) is a
//! [`Transform`] value. A [`Pipeline`] applies them in insertion order, so the
//! order is visible at the construction site instead of depending on plugin
//! registration side effects.
//!
//! # Example
//!
//! ```
//! use pulldown_cmark::{CowStr, Event};
//! use tocmark_renderer::{Markdown, Pipeline, RenderError, RenderOptions, Transform};
//!
//! struct Shout;
//!
//! impl Transform for Shout {
//!     fn name(&self) -> &'static str {
//!         "shout"
//!     }
//!
//!     fn apply<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>, RenderError> {
//!         Ok(events
//!             .into_iter()
//!             .map(|event| match event {
//!                 Event::Text(text) => Event::Text(CowStr::from(text.to_uppercase())),
//!                 other => other,
//!             })
//!             .collect())
//!     }
//! }
//!
//! let markdown = Markdown::with_pipeline(RenderOptions::default(), Pipeline::new().with(Shout));
//! assert_eq!(markdown.render("hello")?, "<p>HELLO</p>");
//! # Ok::<(), RenderError>(())
//! ```

use pulldown_cmark::Event;

use crate::RenderError;

/// A step of the rendering pipeline.
///
/// Transforms receive the complete event list of one document and return the
/// transformed list. They must not keep state between calls.
pub trait Transform: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Transform the events of one document.
    fn apply<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>, RenderError>;
}

/// Ordered list of transforms.
#[derive(Default)]
pub struct Pipeline {
    transforms: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform.
    #[must_use]
    pub fn with<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.push(transform);
        self
    }

    /// Append a transform.
    pub fn push<T: Transform + 'static>(&mut self, transform: T) {
        self.transforms.push(Box::new(transform));
    }

    /// Transform names in application order.
    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Apply all transforms in order, stopping at the first error.
    pub(crate) fn run<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>, RenderError> {
        self.transforms.iter().try_fold(events, |events, transform| {
            tracing::trace!(transform = transform.name(), events = events.len(), "Applying transform");
            transform.apply(events)
        })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
