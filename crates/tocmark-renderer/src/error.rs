//! Render error type.

/// Error returned when rendering a document fails.
///
/// Parsing itself never fails; errors come from pipeline transforms.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A heading listed in the table of contents has no anchor id.
    ///
    /// Happens when the table of contents runs before heading anchors.
    #[error("Heading \"{title}\" has no anchor id")]
    MissingHeadingId {
        /// Plain text of the heading.
        title: String,
    },
    /// A custom transform failed.
    #[error("Transform {name} failed: {message}")]
    Transform {
        /// Name of the failing transform.
        name: &'static str,
        /// Error message.
        message: String,
    },
}
