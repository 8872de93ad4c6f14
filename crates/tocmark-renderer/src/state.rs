//! State tracked by the HTML writer while walking events.

use pulldown_cmark::Alignment;

/// Buffers the content of a code block until its end tag.
#[derive(Default)]
pub(crate) struct CodeBuffer {
    open: bool,
    /// Full class attribute value, e.g. `highlight-rust`.
    class: Option<String>,
    content: String,
}

impl CodeBuffer {
    pub fn open(&mut self, class: Option<String>) {
        self.open = true;
        self.class = class;
        self.content.clear();
    }

    /// Close the block and return its `<pre><code>` markup.
    pub fn close(&mut self) -> String {
        self.open = false;
        let content = escape_html(&self.content);
        match self.class.take() {
            Some(class) => format!(
                r#"<pre><code class="{}">{content}</code></pre>"#,
                escape_html(&class)
            ),
            None => format!("<pre><code>{content}</code></pre>"),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn push_str(&mut self, text: &str) {
        self.content.push_str(text);
    }
}

/// Position inside a table: which section and which column.
#[derive(Default)]
pub(crate) struct TableCursor {
    alignments: Vec<Alignment>,
    in_head: bool,
    column: usize,
}

impl TableCursor {
    pub fn begin(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.column = 0;
    }

    pub fn begin_head(&mut self) {
        self.in_head = true;
        self.column = 0;
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    pub fn begin_row(&mut self) {
        self.column = 0;
    }

    /// Opening tag of the next cell, with its column alignment.
    pub fn open_cell(&mut self) -> String {
        let align = match self.alignments.get(self.column) {
            Some(Alignment::Left) => "left",
            Some(Alignment::Center) => "center",
            Some(Alignment::Right) => "right",
            Some(Alignment::None) | None => "",
        };
        self.column += 1;
        let tag = if self.in_head { "th" } else { "td" };
        if align.is_empty() {
            format!("<{tag}>")
        } else {
            format!(r#"<{tag} style="text-align:{align}">"#)
        }
    }

    pub fn close_cell(&self) -> &'static str {
        if self.in_head { "</th>" } else { "</td>" }
    }
}

/// Collects image alt text.
///
/// Images nest (`![![a](b)](c)`), so only the outermost one is rendered.
#[derive(Default)]
pub(crate) struct ImageState {
    depth: usize,
    alt_text: String,
    /// Source URL and title of the outermost image.
    pending: Option<(String, String)>,
}

impl ImageState {
    /// Start an image. Nested images only contribute alt text.
    pub fn start(&mut self, src: &str, title: &str) {
        if self.depth == 0 {
            self.alt_text.clear();
            self.pending = Some((src.to_owned(), title.to_owned()));
        }
        self.depth += 1;
    }

    /// End an image; returns (src, title, alt) once the outermost image closes.
    pub fn end(&mut self) -> Option<(String, String, String)> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth > 0 {
            return None;
        }
        let (src, title) = self.pending.take()?;
        Some((src, title, std::mem::take(&mut self.alt_text)))
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` for use in text and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for (i, c) in s.char_indices() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&#x27;",
            _ => continue,
        };
        out.push_str(&s[last..i]);
        out.push_str(entity);
        last = i + 1;
    }
    out.push_str(&s[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>"), "&lt;b&gt;");
        assert_eq!(escape_html("Tom & \"Jerry\""), "Tom &amp; &quot;Jerry&quot;");
        assert_eq!(escape_html("don't"), "don&#x27;t");
        assert_eq!(escape_html("größe"), "größe");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_code_buffer_with_class() {
        let mut code = CodeBuffer::default();
        assert!(!code.is_open());

        code.open(Some("highlight-html".to_owned()));
        assert!(code.is_open());
        code.push_str("<p>\n");

        assert_eq!(
            code.close(),
            r#"<pre><code class="highlight-html">&lt;p&gt;
</code></pre>"#
        );
        assert!(!code.is_open());
    }

    #[test]
    fn test_code_buffer_reused() {
        let mut code = CodeBuffer::default();
        code.open(Some("x".to_owned()));
        code.push_str("first");
        code.close();

        code.open(None);
        code.push_str("second");
        assert_eq!(code.close(), "<pre><code>second</code></pre>");
    }

    #[test]
    fn test_table_cursor() {
        let mut table = TableCursor::default();
        table.begin(vec![Alignment::Left, Alignment::None, Alignment::Right]);

        table.begin_head();
        assert_eq!(table.open_cell(), r#"<th style="text-align:left">"#);
        assert_eq!(table.close_cell(), "</th>");
        assert_eq!(table.open_cell(), "<th>");
        assert_eq!(table.open_cell(), r#"<th style="text-align:right">"#);
        table.end_head();

        table.begin_row();
        assert_eq!(table.open_cell(), r#"<td style="text-align:left">"#);
        assert_eq!(table.close_cell(), "</td>");
    }

    #[test]
    fn test_table_cursor_extra_cells_unaligned() {
        let mut table = TableCursor::default();
        table.begin(vec![Alignment::Center]);
        table.begin_row();
        assert_eq!(table.open_cell(), r#"<td style="text-align:center">"#);
        assert_eq!(table.open_cell(), "<td>");
    }

    #[test]
    fn test_image_state_nested() {
        let mut state = ImageState::default();
        state.start("outer.png", "");
        state.push_str("a ");
        state.start("inner.png", "");
        state.push_str("b");
        assert_eq!(state.end(), None);
        assert!(state.is_active());

        let (src, title, alt) = state.end().unwrap();
        assert_eq!(src, "outer.png");
        assert_eq!(title, "");
        assert_eq!(alt, "a b");
        assert!(!state.is_active());
    }
}
