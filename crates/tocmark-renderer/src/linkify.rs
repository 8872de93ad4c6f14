//! Bare URL and email detection.
//!
//! Text outside links, images, code and raw `<a>` elements is scanned for
//! `http://`, `https://`, `ftp://`, `mailto:` and `www.` URLs and for email
//! addresses. Matches are replaced by autolink events.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;

use crate::RenderError;
use crate::pipeline::Transform;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<url>\b(?:(?:https?|ftp)://|mailto:|www\.)[^\s<>]+)|(?P<email>\b[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}\b)",
    )
    .expect("valid linkify pattern")
});

/// Characters never kept at the end of a detected URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '\'', '"', '*', '_', '~'];

/// Converts bare URLs and email addresses into links.
#[derive(Debug, Default, Clone, Copy)]
pub struct Linkify;

impl Transform for Linkify {
    fn name(&self) -> &'static str {
        "linkify"
    }

    fn apply<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>, RenderError> {
        let mut out = Vec::with_capacity(events.len());
        let mut link_depth = 0usize;
        let mut html_link_depth = 0usize;
        let mut in_code_block = false;

        for event in events {
            match &event {
                Event::Start(Tag::Link { .. } | Tag::Image { .. }) => link_depth += 1,
                Event::End(TagEnd::Link | TagEnd::Image) => {
                    link_depth = link_depth.saturating_sub(1);
                }
                Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
                Event::End(TagEnd::CodeBlock) => in_code_block = false,
                Event::InlineHtml(html) => {
                    if is_anchor_open(html) {
                        html_link_depth += 1;
                    } else if is_anchor_close(html) {
                        html_link_depth = html_link_depth.saturating_sub(1);
                    }
                }
                Event::Text(text)
                    if link_depth == 0 && html_link_depth == 0 && !in_code_block =>
                {
                    if linkify_text(text, &mut out) {
                        continue;
                    }
                }
                _ => {}
            }
            out.push(event);
        }

        Ok(out)
    }
}

/// A link found in text.
#[derive(Debug, PartialEq)]
struct Found {
    start: usize,
    end: usize,
    href: String,
    link_type: LinkType,
}

/// Find all links in `text`, in order.
fn find_links(text: &str) -> Vec<Found> {
    let mut found = Vec::new();

    for caps in LINK_RE.captures_iter(text) {
        if let Some(m) = caps.name("url") {
            let url = trim_url(m.as_str());
            if !is_plausible_url(url) {
                continue;
            }
            let href = if url.len() >= 4 && url[..4].eq_ignore_ascii_case("www.") {
                format!("http://{url}")
            } else {
                url.to_owned()
            };
            found.push(Found {
                start: m.start(),
                end: m.start() + url.len(),
                href,
                link_type: LinkType::Autolink,
            });
        } else if let Some(m) = caps.name("email") {
            found.push(Found {
                start: m.start(),
                end: m.end(),
                href: format!("mailto:{}", m.as_str()),
                link_type: LinkType::Email,
            });
        }
    }

    found
}

/// Push `text` split into text and link events. Returns `false` when the
/// text contains no link and was left untouched.
fn linkify_text<'a>(text: &str, out: &mut Vec<Event<'a>>) -> bool {
    let found = find_links(text);
    if found.is_empty() {
        return false;
    }

    let mut pos = 0;
    for link in found {
        if link.start > pos {
            out.push(Event::Text(CowStr::from(text[pos..link.start].to_owned())));
        }
        out.push(Event::Start(Tag::Link {
            link_type: link.link_type,
            dest_url: CowStr::from(link.href),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(CowStr::from(text[link.start..link.end].to_owned())));
        out.push(Event::End(TagEnd::Link));
        pos = link.end;
    }
    if pos < text.len() {
        out.push(Event::Text(CowStr::from(text[pos..].to_owned())));
    }

    true
}

/// Strip trailing punctuation and unbalanced closing parentheses.
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        if let Some(stripped) = url.strip_suffix(TRAILING_PUNCTUATION) {
            url = stripped;
        } else if url.ends_with(')') && url.matches(')').count() > url.matches('(').count() {
            url = &url[..url.len() - 1];
        } else {
            return url;
        }
    }
}

/// Require a host after the scheme or `www.` prefix.
fn is_plausible_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("www.") {
        return rest.contains('.') && !rest.starts_with('.');
    }
    if let Some(rest) = lower.strip_prefix("mailto:") {
        return rest.contains('@');
    }
    lower
        .split_once("://")
        .is_some_and(|(_, rest)| rest.chars().next().is_some_and(char::is_alphanumeric))
}

fn is_anchor_open(html: &str) -> bool {
    let lower = html.trim_start().to_ascii_lowercase();
    lower.starts_with("<a ") || lower.starts_with("<a>")
}

fn is_anchor_close(html: &str) -> bool {
    html.trim().eq_ignore_ascii_case("</a>")
}
