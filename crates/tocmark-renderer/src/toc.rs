//! Table of contents.
//!
//! Replaces every paragraph consisting only of the marker text (`[toc]` by
//! default) with a nested list of links to the document's headings. Heading
//! ids are read from the events, never generated here.

use std::fmt::Write;

use pulldown_cmark::{CowStr, Event, Tag, TagEnd};

use crate::RenderError;
use crate::options::TocOptions;
use crate::pipeline::Transform;
use crate::state::escape_html;
use crate::util::heading_spans;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Expands the marker paragraph into a table of contents.
#[derive(Debug, Default, Clone)]
pub struct TableOfContents {
    options: TocOptions,
}

impl TableOfContents {
    pub fn new(options: TocOptions) -> Self {
        Self { options }
    }
}

impl Transform for TableOfContents {
    fn name(&self) -> &'static str {
        "table-of-contents"
    }

    fn apply<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>, RenderError> {
        let markers = marker_paragraphs(&events, &self.options.marker);
        if markers.is_empty() {
            return Ok(events);
        }

        let entries = collect_entries(&events, &self.options)?;
        let html = render_toc(&entries, &self.options);
        tracing::debug!(
            entries = entries.len(),
            markers = markers.len(),
            "Expanding table of contents"
        );

        let mut out = Vec::with_capacity(events.len());
        let mut markers = markers.into_iter().peekable();
        let mut skip_until = None;

        for (index, event) in events.into_iter().enumerate() {
            if let Some(end) = skip_until {
                if index == end {
                    skip_until = None;
                }
                continue;
            }
            if let Some(&(start, end)) = markers.peek()
                && index == start
            {
                markers.next();
                out.push(Event::Html(CowStr::from(html.clone())));
                skip_until = Some(end);
                continue;
            }
            out.push(event);
        }

        Ok(out)
    }
}

/// Collect entries for all listed headings, requiring each to have an id.
fn collect_entries(events: &[Event<'_>], options: &TocOptions) -> Result<Vec<TocEntry>, RenderError> {
    heading_spans(events)
        .into_iter()
        .filter(|span| options.includes(span.level))
        .map(|span| match &events[span.start] {
            Event::Start(Tag::Heading { id: Some(id), .. }) => Ok(TocEntry {
                level: span.level,
                title: span.text,
                id: id.to_string(),
            }),
            _ => Err(RenderError::MissingHeadingId { title: span.text }),
        })
        .collect()
}

/// Entries for listed headings that carry an id, skipping the rest.
pub(crate) fn toc_entries(events: &[Event<'_>], options: &TocOptions) -> Vec<TocEntry> {
    heading_spans(events)
        .into_iter()
        .filter(|span| options.includes(span.level))
        .filter_map(|span| match &events[span.start] {
            Event::Start(Tag::Heading { id: Some(id), .. }) => Some(TocEntry {
                level: span.level,
                title: span.text,
                id: id.to_string(),
            }),
            _ => None,
        })
        .collect()
}

/// Find `(start, end)` event indices of paragraphs whose text is the marker.
fn marker_paragraphs(events: &[Event<'_>], marker: &str) -> Vec<(usize, usize)> {
    let marker = marker.trim();
    let mut found = Vec::new();
    let mut open: Option<(usize, String, bool)> = None;

    for (index, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Paragraph) => open = Some((index, String::new(), true)),
            Event::End(TagEnd::Paragraph) => {
                if let Some((start, text, text_only)) = open.take()
                    && text_only
                    && text.trim().eq_ignore_ascii_case(marker)
                {
                    found.push((start, index));
                }
            }
            Event::Text(value) => {
                if let Some((_, text, _)) = &mut open {
                    text.push_str(value);
                }
            }
            _ => {
                if let Some((_, _, text_only)) = &mut open {
                    *text_only = false;
                }
            }
        }
    }

    found
}

/// Render entries as a nested list inside the container element.
///
/// Each entry nests under the nearest preceding entry of a lower level.
pub(crate) fn render_toc(entries: &[TocEntry], options: &TocOptions) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<div class="{}">"#,
        escape_html(&options.container_class)
    );
    if !entries.is_empty() {
        write_list(entries, options.list_type.tag(), &mut out);
    }
    out.push_str("</div>");
    out
}

fn write_list(entries: &[TocEntry], tag: &str, out: &mut String) {
    let _ = write!(out, "<{tag}>");
    let mut i = 0;
    while i < entries.len() {
        let entry = &entries[i];
        let end = entries[i + 1..]
            .iter()
            .position(|e| e.level <= entry.level)
            .map_or(entries.len(), |p| i + 1 + p);

        let _ = write!(
            out,
            r##"<li><a href="#{}">{}</a>"##,
            escape_html(&entry.id),
            escape_html(&entry.title)
        );
        if end > i + 1 {
            write_list(&entries[i + 1..end], tag, out);
        }
        out.push_str("</li>");
        i = end;
    }
    let _ = write!(out, "</{tag}>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::HeadingAnchors;
    use crate::options::ListType;
    use crate::util::merge_text;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::Parser;

    fn entry(level: u8, title: &str) -> TocEntry {
        TocEntry {
            level,
            title: title.to_owned(),
            id: crate::slugify(title),
        }
    }

    fn events(markdown: &str) -> Vec<Event<'_>> {
        let events = merge_text(Parser::new(markdown));
        HeadingAnchors::default().apply(events).unwrap()
    }

    #[test]
    fn test_render_flat() {
        let html = render_toc(&[entry(2, "A"), entry(2, "B")], &TocOptions::default());
        assert_eq!(
            html,
            r##"<div class="table-of-contents"><ul><li><a href="#a">A</a></li><li><a href="#b">B</a></li></ul></div>"##
        );
    }

    #[test]
    fn test_render_nested() {
        let html = render_toc(
            &[entry(1, "Title"), entry(2, "Sub"), entry(3, "Deep"), entry(2, "Next")],
            &TocOptions::default(),
        );
        assert_eq!(
            html,
            concat!(
                r#"<div class="table-of-contents"><ul>"#,
                r##"<li><a href="#title">Title</a><ul>"##,
                r##"<li><a href="#sub">Sub</a><ul><li><a href="#deep">Deep</a></li></ul></li>"##,
                r##"<li><a href="#next">Next</a></li>"##,
                "</ul></li></ul></div>"
            )
        );
    }

    #[test]
    fn test_render_level_jump_and_shallower_start() {
        // H3 followed by H1: both top-level. H1 then H3: H3 nests one level.
        let html = render_toc(
            &[entry(3, "C"), entry(1, "A"), entry(3, "D")],
            &TocOptions::default(),
        );
        assert_eq!(
            html,
            concat!(
                r#"<div class="table-of-contents"><ul>"#,
                r##"<li><a href="#c">C</a></li>"##,
                r##"<li><a href="#a">A</a><ul><li><a href="#d">D</a></li></ul></li>"##,
                "</ul></div>"
            )
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(
            render_toc(&[], &TocOptions::default()),
            r#"<div class="table-of-contents"></div>"#
        );
    }

    #[test]
    fn test_render_ordered_custom_class() {
        let options = TocOptions {
            list_type: ListType::Ordered,
            container_class: "toc".to_owned(),
            ..TocOptions::default()
        };
        assert_eq!(
            render_toc(&[entry(1, "A")], &options),
            r##"<div class="toc"><ol><li><a href="#a">A</a></li></ol></div>"##
        );
    }

    #[test]
    fn test_render_escapes_title() {
        let toc = render_toc(
            &[TocEntry {
                level: 1,
                title: "a < b".to_owned(),
                id: "a-b".to_owned(),
            }],
            &TocOptions::default(),
        );
        assert!(toc.contains("a &lt; b"));
    }

    #[test]
    fn test_marker_paragraphs() {
        let events = events("# A\n\n[toc]\n\ntext [toc]\n\n[TOC]");
        let markers = marker_paragraphs(&events, "[toc]");
        assert_eq!(markers.len(), 2);
    }

    #[test]
    fn test_marker_with_markup_is_not_replaced() {
        let events = events("*[toc]*");
        assert!(marker_paragraphs(&events, "[toc]").is_empty());
    }

    #[test]
    fn test_transform_replaces_marker() {
        let out = TableOfContents::default()
            .apply(events("# Title\n\n[toc]\n\n## Sub"))
            .unwrap();

        let html: Vec<_> = out
            .iter()
            .filter_map(|event| match event {
                Event::Html(html) => Some(html.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(html.len(), 1);
        assert!(html[0].contains(r##"<a href="#title">Title</a>"##));
        assert!(html[0].contains(r##"<a href="#sub">Sub</a>"##));
        assert!(!out.iter().any(|e| matches!(e, Event::Start(Tag::Paragraph))));
    }

    #[test]
    fn test_transform_excludes_deep_levels() {
        let out = TableOfContents::default()
            .apply(events("[toc]\n\n## Two\n\n#### Four"))
            .unwrap();
        let Event::Html(html) = &out[0] else {
            panic!("expected table of contents first, got {:?}", out[0]);
        };
        assert!(html.contains("Two"));
        assert!(!html.contains("Four"));
    }

    #[test]
    fn test_transform_requires_ids() {
        let events = merge_text(Parser::new("[toc]\n\n## Sub"));
        let err = TableOfContents::default().apply(events).unwrap_err();
        assert!(matches!(err, RenderError::MissingHeadingId { ref title } if title == "Sub"));
    }

    #[test]
    fn test_transform_without_marker_is_noop() {
        let input = merge_text(Parser::new("## Sub"));
        let out = TableOfContents::default().apply(input.clone()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_toc_entries_skips_missing_ids() {
        let events = merge_text(Parser::new("## Sub"));
        assert!(toc_entries(&events, &TocOptions::default()).is_empty());

        let events = events_with_ids();
        let entries = toc_entries(&events, &TocOptions::default());
        assert_eq!(entries, vec![entry(1, "One"), entry(2, "Two")]);
    }

    fn events_with_ids() -> Vec<Event<'static>> {
        events("# One\n\n## Two\n\n#### Four")
    }
}
