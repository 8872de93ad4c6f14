//! Render options, fixed when a [`Markdown`](crate::Markdown) is built.

/// Options for the whole rendering pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Convert bare URLs and email addresses in text to links.
    pub linkify: bool,
    /// Prefix for the class of fenced code blocks (`highlight-` → `highlight-js`).
    pub lang_prefix: String,
    /// Pass raw HTML from the source through unescaped.
    ///
    /// When disabled, raw HTML is rendered as escaped text.
    pub html: bool,
    /// Heading anchor options.
    pub anchors: AnchorOptions,
    /// Table of contents options.
    pub toc: TocOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            linkify: true,
            lang_prefix: "highlight-".to_owned(),
            html: false,
            anchors: AnchorOptions::default(),
            toc: TocOptions::default(),
        }
    }
}

/// Options for heading anchors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorOptions {
    /// Append a permalink to each heading.
    pub permalink: bool,
    /// Text of the permalink.
    pub permalink_symbol: String,
    /// Class of the permalink element.
    pub permalink_class: String,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self {
            permalink: false,
            permalink_symbol: "¶".to_owned(),
            permalink_class: "header-anchor".to_owned(),
        }
    }
}

/// Options for the table of contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocOptions {
    /// Heading levels listed in the table of contents.
    pub include_levels: Vec<u8>,
    /// Paragraph text replaced by the table of contents (case-insensitive).
    pub marker: String,
    /// Class of the container element.
    pub container_class: String,
    /// List element used for each nesting level.
    pub list_type: ListType,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            include_levels: vec![1, 2, 3],
            marker: "[toc]".to_owned(),
            container_class: "table-of-contents".to_owned(),
            list_type: ListType::default(),
        }
    }
}

impl TocOptions {
    /// Whether headings of `level` are listed.
    pub fn includes(&self, level: u8) -> bool {
        self.include_levels.contains(&level)
    }
}

/// List element of the table of contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListType {
    /// `<ul>`
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "ul"))]
    Unordered,
    /// `<ol>`
    #[cfg_attr(feature = "serde", serde(rename = "ol"))]
    Ordered,
}

impl ListType {
    /// HTML tag name.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}
