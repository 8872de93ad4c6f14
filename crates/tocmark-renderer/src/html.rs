//! HTML writer for the final event stream.
//!
//! Produces semantic HTML5 with no whitespace between blocks. Headings use the
//! `id` already present on their start tag; fenced code blocks get the
//! configured language class prefix.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, Tag, TagEnd};

use crate::state::{CodeBuffer, ImageState, TableCursor, escape_html};
use crate::util::heading_level_to_num;

/// Writes events as HTML.
pub(crate) struct HtmlWriter<'o> {
    lang_prefix: &'o str,
    output: String,
    code: CodeBuffer,
    table: TableCursor,
    image: ImageState,
}

impl<'o> HtmlWriter<'o> {
    pub fn new(lang_prefix: &'o str) -> Self {
        Self {
            lang_prefix,
            output: String::with_capacity(4096),
            code: CodeBuffer::default(),
            table: TableCursor::default(),
            image: ImageState::default(),
        }
    }

    /// Write all events and return the HTML.
    pub fn write<'a, I>(mut self, events: I) -> String
    where
        I: IntoIterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }
        self.output
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.output.push_str(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.output.push_str("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {
                // Not enabled in the parser
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, id, .. } => {
                let level = heading_level_to_num(level);
                match id {
                    Some(id) => {
                        let _ = write!(self.output, r#"<h{level} id="{}">"#, escape_html(&id));
                    }
                    None => {
                        let _ = write!(self.output, "<h{level}>");
                    }
                }
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let class = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| format!("{}{lang}", self.lang_prefix)),
                    CodeBlockKind::Indented => None,
                };
                self.code.open(class);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => {
                    let _ = write!(self.output, r#"<ol start="{n}">"#);
                }
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::HtmlBlock => {}
            Tag::FootnoteDefinition(_)
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => {
                // Not enabled in the parser
            }
            Tag::Table(alignments) => {
                self.table.begin(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.begin_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.begin_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let open = self.table.open_cell();
                self.output.push_str(&open);
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                if self.image.is_active() {
                    return;
                }
                let _ = write!(self.output, r#"<a href="{}""#, escape_html(&dest_url));
                if !title.is_empty() {
                    let _ = write!(self.output, r#" title="{}""#, escape_html(&title));
                }
                self.output.push('>');
            }
            Tag::Image {
                dest_url, title, ..
            } => self.image.start(&dest_url, &title),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(level) => {
                let _ = write!(self.output, "</h{}>", heading_level_to_num(level));
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                let block = self.code.close();
                self.output.push_str(&block);
            }
            TagEnd::List(ordered) => {
                self.output.push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::HtmlBlock
            | TagEnd::FootnoteDefinition
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::Superscript
            | TagEnd::Subscript => {}
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => self.output.push_str(self.table.close_cell()),
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                if let Some((src, title, alt)) = self.image.end() {
                    self.image_tag(&src, &alt, &title);
                }
            }
        }
    }

    /// Push inline markup unless it belongs to image alt text.
    fn push_inline(&mut self, markup: &str) {
        if !self.image.is_active() {
            self.output.push_str(markup);
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_open() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
        } else {
            let _ = write!(self.output, "<code>{}</code>", escape_html(code));
        }
    }

    fn soft_break(&mut self) {
        if self.image.is_active() {
            self.image.push_str(" ");
        } else {
            self.output.push('\n');
        }
    }

    fn image_tag(&mut self, src: &str, alt: &str, title: &str) {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        let _ = write!(
            self.output,
            r#"<img src="{}"{title_attr} alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        );
    }
}
