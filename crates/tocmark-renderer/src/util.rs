//! Shared helpers for working on the event stream.

use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag, TagEnd};

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Location and plain text of one heading in an event list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HeadingSpan {
    /// Index of the `Start(Heading)` event.
    pub start: usize,
    /// Index of the matching `End(Heading)` event.
    pub end: usize,
    pub level: u8,
    /// Trimmed plain text (inline code included, markup dropped).
    pub text: String,
}

/// Find all headings in source order.
pub(crate) fn heading_spans(events: &[Event<'_>]) -> Vec<HeadingSpan> {
    let mut spans = Vec::new();
    let mut current: Option<(usize, u8, String)> = None;

    for (index, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((index, heading_level_to_num(*level), String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, level, text)) = current.take() {
                    spans.push(HeadingSpan {
                        start,
                        end: index,
                        level,
                        text: text.trim().to_owned(),
                    });
                }
            }
            Event::Text(value) | Event::Code(value) => {
                if let Some((_, _, text)) = &mut current {
                    text.push_str(value);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, _, text)) = &mut current {
                    text.push(' ');
                }
            }
            _ => {}
        }
    }

    spans
}

/// Merge adjacent text events.
///
/// The parser splits text at characters that might start inline markup, so a
/// single URL or placeholder can arrive in several pieces.
pub(crate) fn merge_text<'a>(events: impl IntoIterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut merged: Vec<Event<'a>> = Vec::new();

    for event in events {
        if let Event::Text(text) = &event
            && let Some(Event::Text(prev)) = merged.last_mut()
        {
            let mut joined = String::with_capacity(prev.len() + text.len());
            joined.push_str(prev);
            joined.push_str(text);
            *prev = CowStr::from(joined);
            continue;
        }
        merged.push(event);
    }

    merged
}

/// Turn raw HTML from the source into plain text.
///
/// HTML blocks become paragraphs; the line break ending the block is dropped.
pub(crate) fn disable_raw_html<'a>(events: impl IntoIterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out: Vec<Event<'a>> = Vec::new();

    for event in events {
        match event {
            Event::Html(html) | Event::InlineHtml(html) => out.push(Event::Text(html)),
            Event::Start(Tag::HtmlBlock) => out.push(Event::Start(Tag::Paragraph)),
            Event::End(TagEnd::HtmlBlock) => {
                if let Some(Event::Text(text)) = out.last_mut() {
                    let keep = text.trim_end_matches(['\r', '\n']).len();
                    if keep == 0 {
                        out.pop();
                    } else if keep < text.len() {
                        *text = CowStr::from(text[..keep].to_owned());
                    }
                }
                out.push(Event::End(TagEnd::Paragraph));
            }
            other => out.push(other),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::Parser;

    #[test]
    fn test_heading_spans() {
        let events: Vec<_> = Parser::new("# One\n\ntext\n\n## Two `code`").collect();
        let spans = heading_spans(&events);

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].level, 1);
        assert_eq!(spans[0].text, "One");
        assert_eq!(spans[1].level, 2);
        assert_eq!(spans[1].text, "Two code");
        assert!(matches!(
            events[spans[1].start],
            Event::Start(Tag::Heading { .. })
        ));
        assert!(matches!(events[spans[1].end], Event::End(TagEnd::Heading(_))));
    }

    #[test]
    fn test_heading_spans_setext_multiline() {
        let events: Vec<_> = Parser::new("First\nSecond\n===").collect();
        let spans = heading_spans(&events);
        assert_eq!(spans[0].text, "First Second");
    }

    #[test]
    fn test_merge_text() {
        let events = vec![
            Event::Text("[".into()),
            Event::Text("toc".into()),
            Event::Text("]".into()),
            Event::SoftBreak,
            Event::Text("x".into()),
        ];
        let merged = merge_text(events);
        assert_eq!(
            merged,
            vec![
                Event::Text("[toc]".into()),
                Event::SoftBreak,
                Event::Text("x".into()),
            ]
        );
    }

    #[test]
    fn test_disable_raw_html_inline() {
        let events = disable_raw_html(Parser::new("a <b>x</b>"));
        assert_eq!(
            merge_text(events),
            vec![
                Event::Start(Tag::Paragraph),
                Event::Text("a <b>x</b>".into()),
                Event::End(TagEnd::Paragraph),
            ]
        );
    }

    #[test]
    fn test_disable_raw_html_block_drops_final_newline() {
        let events = disable_raw_html(Parser::new("<div>\nhi\n</div>\n\nafter"));
        assert_eq!(
            merge_text(events),
            vec![
                Event::Start(Tag::Paragraph),
                Event::Text("<div>\nhi\n</div>".into()),
                Event::End(TagEnd::Paragraph),
                Event::Start(Tag::Paragraph),
                Event::Text("after".into()),
                Event::End(TagEnd::Paragraph),
            ]
        );
    }

    #[test]
    fn test_disable_raw_html_keeps_other_events() {
        assert_eq!(
            disable_raw_html(vec![Event::Rule, Event::Text("x\n".into())]),
            vec![Event::Rule, Event::Text("x\n".into())]
        );
    }

    #[test]
    fn test_heading_level_to_num() {
        assert_eq!(heading_level_to_num(HeadingLevel::H1), 1);
        assert_eq!(heading_level_to_num(HeadingLevel::H6), 6);
    }
}
