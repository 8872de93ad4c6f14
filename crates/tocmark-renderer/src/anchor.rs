//! Heading anchors.
//!
//! Assigns every heading a unique, slugified `id` and optionally appends a
//! permalink. This is the only place heading ids are created; the table of
//! contents reads them back.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::{CowStr, Event, Tag};

use crate::RenderError;
use crate::options::AnchorOptions;
use crate::pipeline::Transform;
use crate::state::escape_html;
use crate::util::heading_spans;

/// Slug used when heading text has no alphanumeric characters.
const EMPTY_SLUG: &str = "section";

/// Assigns ids to headings of all levels.
#[derive(Debug, Default, Clone)]
pub struct HeadingAnchors {
    options: AnchorOptions,
}

impl HeadingAnchors {
    pub fn new(options: AnchorOptions) -> Self {
        Self { options }
    }

    fn permalink(&self, id: &str) -> String {
        format!(
            r##" <a class="{}" href="#{}" aria-hidden="true">{}</a>"##,
            escape_html(&self.options.permalink_class),
            escape_html(id),
            escape_html(&self.options.permalink_symbol)
        )
    }
}

impl Transform for HeadingAnchors {
    fn name(&self) -> &'static str {
        "heading-anchors"
    }

    fn apply<'a>(&self, mut events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>, RenderError> {
        let spans = heading_spans(&events);
        let mut slugs = SlugRegistry::default();
        let mut permalinks = Vec::new();

        for span in &spans {
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[span.start] {
                let base = id.as_deref().map_or_else(|| slugify(&span.text), str::to_owned);
                let unique = slugs.unique(&base);
                if self.options.permalink {
                    permalinks.push((span.end, self.permalink(&unique)));
                }
                *id = Some(CowStr::from(unique));
            }
        }

        // Insert back to front so earlier indices stay valid.
        for (index, html) in permalinks.into_iter().rev() {
            events.insert(index, Event::InlineHtml(CowStr::from(html)));
        }

        tracing::trace!(headings = spans.len(), "Assigned heading anchors");
        Ok(events)
    }
}

/// Hands out ids that are unique within one document.
///
/// Collisions get `-1`, `-2`, … appended, skipping any suffixed id that is
/// already taken.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    used: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl SlugRegistry {
    /// Reserve and return a unique id derived from `base`.
    pub fn unique(&mut self, base: &str) -> String {
        let next = self.next_suffix.entry(base.to_owned()).or_default();
        let mut id = if *next == 0 {
            base.to_owned()
        } else {
            format!("{base}-{next}")
        };
        while self.used.contains(&id) {
            *next += 1;
            id = format!("{base}-{next}");
        }
        *next += 1;
        self.used.insert(id.clone());
        id
    }
}

/// Convert text to a URL-safe slug.
///
/// Lowercases, keeps alphanumerics (Unicode included), collapses whitespace,
/// dashes and underscores into single dashes, and drops everything else.
/// Text without alphanumerics yields `section`.
///
/// # Examples
///
/// ```
/// use tocmark_renderer::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("What's New?"), "whats-new");
/// assert_eq!(slugify("???"), "section");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        EMPTY_SLUG.to_owned()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::Parser;

    fn heading_ids(markdown: &str) -> Vec<String> {
        let events: Vec<_> = Parser::new(markdown).collect();
        let events = HeadingAnchors::default().apply(events).unwrap();
        events
            .into_iter()
            .filter_map(|event| match event {
                Event::Start(Tag::Heading { id, .. }) => id.map(|id| id.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("kebab-case"), "kebab-case");
        assert_eq!(slugify("snake_case"), "snake-case");
        assert_eq!(slugify("a - b"), "a-b");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("Über Größe"), "über-größe");
        assert_eq!(slugify("日本語"), "日本語");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "section");
        assert_eq!(slugify("!!!"), "section");
    }

    #[test]
    fn test_registry_suffixes() {
        let mut slugs = SlugRegistry::default();
        assert_eq!(slugs.unique("faq"), "faq");
        assert_eq!(slugs.unique("faq"), "faq-1");
        assert_eq!(slugs.unique("faq"), "faq-2");
    }

    #[test]
    fn test_registry_skips_taken_suffix() {
        let mut slugs = SlugRegistry::default();
        assert_eq!(slugs.unique("faq-1"), "faq-1");
        assert_eq!(slugs.unique("faq"), "faq");
        assert_eq!(slugs.unique("faq"), "faq-2");
    }

    #[test]
    fn test_assigns_ids_to_all_levels() {
        assert_eq!(
            heading_ids("# One\n\n## Two\n\n###### Six"),
            vec!["one", "two", "six"]
        );
    }

    #[test]
    fn test_duplicate_headings() {
        assert_eq!(
            heading_ids("## FAQ\n\n## FAQ\n\n## FAQ 1\n\n## FAQ"),
            vec!["faq", "faq-1", "faq-1-1", "faq-2"]
        );
    }

    #[test]
    fn test_permalink_inserted_before_heading_end() {
        let options = AnchorOptions {
            permalink: true,
            ..AnchorOptions::default()
        };
        let events: Vec<_> = Parser::new("# A\n\n# B").collect();
        let events = HeadingAnchors::new(options).apply(events).unwrap();

        let links: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                Event::InlineHtml(html) => Some(html.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(
            links,
            vec![
                r##" <a class="header-anchor" href="#a" aria-hidden="true">¶</a>"##,
                r##" <a class="header-anchor" href="#b" aria-hidden="true">¶</a>"##,
            ]
        );
    }
}
