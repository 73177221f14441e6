//! Markdown outline extraction: headings, links and fenced code blocks.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser as MdParser, Tag, TagEnd};

use crate::frontmatter::Body;

static RE_URI_SCHEME: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("valid regex"));

/// A heading in a markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for `#`, 2 for `##`, and so on.
    pub level: u8,
    /// Plain text of the heading.
    pub title: String,
    /// 1-indexed line in the file.
    pub line: usize,
}

/// An inline or reference-style link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Destination as written.
    pub target: String,
    /// 1-indexed line in the file.
    pub line: usize,
    /// Index into [`Outline::headings`] of the heading the link sits under.
    pub section: Option<usize>,
}

/// The parts of a markdown body the rules care about.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    /// Headings in document order.
    pub headings: Vec<Heading>,
    /// Links in document order.
    pub links: Vec<Link>,
    /// Opening line of every fenced code block.
    pub fenced_blocks: Vec<usize>,
}

impl Outline {
    /// Parse a body, reporting lines relative to the whole file.
    #[must_use]
    pub fn parse(body: &Body) -> Self {
        let text = body.text.as_str();
        let line_starts: Vec<usize> = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        let line_at = |offset: usize| {
            body.first_line + line_starts.partition_point(|&start| start <= offset) - 1
        };

        let mut outline = Self::default();
        let mut open_heading: Option<Heading> = None;

        for (event, range) in MdParser::new(text).into_offset_iter() {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    open_heading = Some(Heading {
                        level: heading_depth(level),
                        title: String::new(),
                        line: line_at(range.start),
                    });
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(mut heading) = open_heading.take() {
                        heading.title = heading.title.trim().to_string();
                        outline.headings.push(heading);
                    }
                }
                Event::Text(fragment) | Event::Code(fragment) => {
                    if let Some(heading) = open_heading.as_mut() {
                        heading.title.push_str(&fragment);
                    }
                }
                Event::Start(Tag::Link { dest_url, .. }) => {
                    outline.links.push(Link {
                        target: dest_url.to_string(),
                        line: line_at(range.start),
                        section: outline.headings.len().checked_sub(1),
                    });
                }
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => {
                    outline.fenced_blocks.push(line_at(range.start));
                }
                _ => {}
            }
        }

        outline
    }

    /// Index of the first level-1 or level-2 heading matching `title`.
    #[must_use]
    pub fn find_section(&self, title: &str) -> Option<usize> {
        self.headings
            .iter()
            .position(|h| h.level <= 2 && heading_matches(&h.title, title))
    }

    /// Links under the section titled `title`, up to the next heading of the
    /// same or a higher level. Links under nested subheadings are included.
    pub fn section_links(&self, title: &str) -> impl Iterator<Item = &Link> {
        let span = self.find_section(title).map(|start| {
            let level = self.headings[start].level;
            let end = self.headings[start + 1..]
                .iter()
                .position(|h| h.level <= level)
                .map_or(self.headings.len(), |offset| start + 1 + offset);
            start..end
        });

        self.links.iter().filter(move |link| {
            matches!((&span, link.section), (Some(span), Some(section)) if span.contains(&section))
        })
    }
}

const fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Whether a heading names the required section.
///
/// Comparison ignores case, whitespace runs and surrounding punctuation. A
/// heading that begins with the required title at a word boundary matches too,
/// so "References (load on demand)" satisfies "References".
#[must_use]
pub fn heading_matches(heading: &str, required: &str) -> bool {
    let heading = normalize_title(heading);
    let required = normalize_title(required);
    if required.is_empty() {
        return false;
    }
    heading == required
        || heading
            .strip_prefix(&required)
            .is_some_and(|rest| rest.starts_with(|c: char| !c.is_alphanumeric()))
}

/// Whether a link target points outside the skill: a URI with a scheme, an
/// absolute path, or a same-page anchor.
#[must_use]
pub fn is_external(target: &str) -> bool {
    let target = target.trim();
    target.is_empty()
        || target.starts_with('#')
        || target.starts_with('/')
        || RE_URI_SCHEME.is_match(target)
}

/// Resolve `target` against the `/`-separated directory `base` (empty for the
/// skill root). Fragments and queries are dropped and `.`/`..` collapsed.
///
/// Returns `None` if the target is empty after stripping or climbs above the
/// skill root.
#[must_use]
pub fn resolve_link(base: &str, target: &str) -> Option<String> {
    let path = target
        .trim()
        .split(['#', '?'])
        .next()
        .unwrap_or_default();
    if path.is_empty() {
        return None;
    }

    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(text: &str, first_line: usize) -> Body {
        Body {
            text: text.to_string(),
            first_line,
        }
    }

    #[test]
    fn test_outline_lines_are_file_relative() {
        let outline = Outline::parse(&body(
            "\n# Overview\n\nText.\n\n## References\n\n- [Forms](references/forms.md)\n",
            6,
        ));
        assert_eq!(outline.headings.len(), 2);
        assert_eq!(outline.headings[0].title, "Overview");
        assert_eq!(outline.headings[0].line, 7);
        assert_eq!(outline.headings[1].line, 11);
        assert_eq!(outline.links[0].line, 13);
        assert_eq!(outline.links[0].section, Some(1));
    }

    #[test]
    fn test_heading_with_inline_code() {
        let outline = Outline::parse(&body("## Using `pdftk` safely\n", 1));
        assert_eq!(outline.headings[0].title, "Using pdftk safely");
    }

    #[test]
    fn test_fenced_blocks_detected() {
        let outline = Outline::parse(&body("text\n\n```rust\nfn main() {}\n```\n\n~~~\nx\n~~~\n", 1));
        assert_eq!(outline.fenced_blocks, vec![3, 7]);
    }

    #[test]
    fn test_section_links_stop_at_next_peer_heading() {
        let outline = Outline::parse(&body(
            "## Overview\n[a](references/a.md)\n\n## References\n[b](references/b.md)\n### Extra\n[c](references/c.md)\n## Delegation\n[d](references/d.md)\n",
            1,
        ));
        let targets: Vec<_> = outline
            .section_links("References")
            .map(|l| l.target.as_str())
            .collect();
        assert_eq!(targets, vec!["references/b.md", "references/c.md"]);
    }

    #[test]
    fn test_section_links_without_section() {
        let outline = Outline::parse(&body("[a](references/a.md)\n", 1));
        assert_eq!(outline.section_links("References").count(), 0);
    }

    #[test]
    fn test_heading_matches_in_substance() {
        assert!(heading_matches("Quick  reference", "Quick Reference"));
        assert!(heading_matches("References (load on demand)", "References"));
        assert!(heading_matches("Common Mistakes:", "Common Mistakes"));
        assert!(!heading_matches("Overviews", "Overview"));
        assert!(!heading_matches("Quick Reference", "References"));
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("https://example.com/a.md"));
        assert!(is_external("mailto:someone@example.com"));
        assert!(is_external("#overview"));
        assert!(is_external("/etc/passwd"));
        assert!(!is_external("references/forms.md"));
        assert!(!is_external("./forms.md"));
    }

    #[test]
    fn test_resolve_link() {
        assert_eq!(
            resolve_link("", "./references/forms.md#fields"),
            Some("references/forms.md".to_string())
        );
        assert_eq!(
            resolve_link("references", "../references/api.md"),
            Some("references/api.md".to_string())
        );
        assert_eq!(
            resolve_link("references", "other.md?raw=1"),
            Some("references/other.md".to_string())
        );
        assert_eq!(resolve_link("", "../outside.md"), None);
        assert_eq!(resolve_link("", "#anchor"), None);
    }
}
