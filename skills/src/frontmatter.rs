//! YAML frontmatter parsing for `SKILL.md` and reference files.
//!
//! A document is expected to look like:
//!
//! ```markdown
//! ---
//! name: skill-name
//! description: What this skill does. Use when ...
//! metadata:
//!   author: someone
//!   version: "1.0"
//! ---
//!
//! # Overview
//! ...
//! ```
//!
//! The header is parsed with `serde_yaml` and converted into [`Value`] so that
//! field checks can match on every shape a value may take.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::FrontmatterError;

const DELIMITER: &str = "---";

/// A frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An explicit `null`, `~`, or a key with nothing after the colon.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// Any YAML number, kept in its textual form.
    Number(String),
    /// A string scalar.
    String(String),
    /// A sequence.
    List(Vec<Value>),
    /// A nested mapping. Non-scalar keys are dropped.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the string content if this is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the entries if this is a mapping.
    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Whether the value carries no content: null, whitespace-only string,
    /// empty list or empty mapping.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Short name of the value's shape, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "mapping",
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Self::Null,
            serde_yaml::Value::Bool(b) => Self::Bool(b),
            serde_yaml::Value::Number(n) => Self::Number(n.to_string()),
            serde_yaml::Value::String(s) => Self::String(s),
            serde_yaml::Value::Sequence(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_yaml::Value::Mapping(map) => Self::Map(convert_mapping(map)),
            serde_yaml::Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

fn convert_mapping(map: serde_yaml::Mapping) -> BTreeMap<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| scalar_key(&key).map(|key| (key, Value::from(value))))
        .collect()
}

fn scalar_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parsed frontmatter of a single file, with provenance.
#[derive(Debug, Clone)]
pub struct Frontmatter {
    fields: BTreeMap<String, Value>,
    key_lines: BTreeMap<String, usize>,
    lines: RangeInclusive<usize>,
}

impl Frontmatter {
    /// Get a top-level field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a dotted path such as `metadata.author`.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_map()?.get(segment)?;
        }
        Some(current)
    }

    /// Line (1-indexed, in the whole file) where a top-level key, or the
    /// top-level key of a dotted path, is declared.
    #[must_use]
    pub fn line_of(&self, path: &str) -> Option<usize> {
        let top = path.split('.').next()?;
        self.key_lines.get(top).copied()
    }

    /// Top-level keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Line range occupied by the header, delimiters included.
    #[must_use]
    pub const fn lines(&self) -> &RangeInclusive<usize> {
        &self.lines
    }
}

/// Markdown content following the frontmatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    /// Body text.
    pub text: String,
    /// Line number (1-indexed) of the first body line within the file.
    pub first_line: usize,
}

/// A markdown file split into header and body.
#[derive(Debug, Clone)]
pub struct Document {
    /// The parsed header, or why it couldn't be parsed.
    pub frontmatter: Result<Frontmatter, FrontmatterError>,
    /// The body. `None` when the header never closes, since the body's extent
    /// is then unknown.
    pub body: Option<Body>,
}

/// Split `content` into frontmatter and body and parse the frontmatter.
///
/// Never fails: header problems are carried in [`Document::frontmatter`]. A
/// file without any header keeps its whole content as the body.
#[must_use]
pub fn parse_document(content: &str) -> Document {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let is_delimiter = |line: &str| line.trim_end() == DELIMITER;

    let Some(first) = lines.next().filter(|line| is_delimiter(line)) else {
        return Document {
            frontmatter: Err(FrontmatterError::Missing),
            body: Some(Body {
                text: content.to_string(),
                first_line: 1,
            }),
        };
    };

    let mut offset = first.len();
    let mut closing = None;
    for (idx, line) in lines.enumerate() {
        if is_delimiter(line) {
            // idx 0 is the second line of the file
            closing = Some((offset, offset + line.len(), idx + 2));
            break;
        }
        offset += line.len();
    }

    let Some((header_end, body_start, closing_line)) = closing else {
        return Document {
            frontmatter: Err(FrontmatterError::Unterminated),
            body: None,
        };
    };

    let header = &content[first.len()..header_end];
    let body = Body {
        text: content[body_start..].to_string(),
        first_line: closing_line + 1,
    };

    let frontmatter = parse_header(header).map(|fields| Frontmatter {
        fields,
        key_lines: key_lines(header),
        lines: 1..=closing_line,
    });

    Document {
        frontmatter,
        body: Some(body),
    }
}

fn parse_header(header: &str) -> Result<BTreeMap<String, Value>, FrontmatterError> {
    let parsed: serde_yaml::Value =
        serde_yaml::from_str(header).map_err(|err| FrontmatterError::InvalidYaml {
            line: err.location().map(|loc| loc.line() + 1),
            message: err.to_string(),
        })?;

    match Value::from(parsed) {
        Value::Null => Ok(BTreeMap::new()),
        Value::Map(fields) => Ok(fields),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

/// Map each top-level key to the file line it is declared on.
fn key_lines(header: &str) -> BTreeMap<String, usize> {
    let mut lines = BTreeMap::new();
    for (idx, line) in header.lines().enumerate() {
        if line.starts_with([' ', '\t', '-', '#']) {
            continue;
        }
        if let Some((key, _)) = line.split_once(':') {
            let key = key.trim().trim_matches(|c| c == '"' || c == '\'');
            if !key.is_empty() {
                // header starts on file line 2
                lines.entry(key.to_string()).or_insert(idx + 2);
            }
        }
    }
    lines
}

/// Number of newline-delimited lines in `content`.
#[must_use]
pub fn count_lines(content: &str) -> usize {
    content.lines().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Document {
        parse_document(content)
    }

    #[test]
    fn test_parse_nested_frontmatter() {
        let doc = parse(
            "---\nname: pdf-tools\ndescription: Work with PDFs. Use when editing PDFs.\nlicense: MIT\nmetadata:\n  author: jane\n  version: 1.2\n---\n\n# Overview\n",
        );
        let fm = doc.frontmatter.expect("frontmatter parses");
        assert_eq!(fm.get("name").and_then(Value::as_str), Some("pdf-tools"));
        assert_eq!(
            fm.lookup("metadata.author").and_then(Value::as_str),
            Some("jane")
        );
        assert_eq!(
            fm.lookup("metadata.version"),
            Some(&Value::Number("1.2".to_string()))
        );
        assert_eq!(fm.line_of("license"), Some(4));
        assert_eq!(fm.line_of("metadata.author"), Some(5));
        assert_eq!(fm.lines(), &(1..=8));

        let body = doc.body.expect("body present");
        assert_eq!(body.first_line, 9);
        assert!(body.text.contains("# Overview"));
    }

    #[test]
    fn test_missing_frontmatter_keeps_body() {
        let doc = parse("# Just a heading\n\nText.\n");
        assert!(matches!(doc.frontmatter, Err(FrontmatterError::Missing)));
        assert_eq!(doc.body.map(|b| b.first_line), Some(1));
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let doc = parse("---\nname: test\n\nNo closing delimiter");
        assert!(matches!(doc.frontmatter, Err(FrontmatterError::Unterminated)));
        assert!(doc.body.is_none());
    }

    #[test]
    fn test_invalid_yaml_reports_file_line() {
        let doc = parse("---\nname: ok\ndescription: [unclosed\n---\nbody\n");
        match doc.frontmatter {
            Err(FrontmatterError::InvalidYaml { line, .. }) => {
                assert!(line.is_some_and(|l| l >= 3));
            }
            other => panic!("expected invalid yaml, got {other:?}"),
        }
        assert!(doc.body.is_some());
    }

    #[test]
    fn test_scalar_header_is_not_a_mapping() {
        let doc = parse("---\njust a string\n---\n");
        assert!(matches!(doc.frontmatter, Err(FrontmatterError::NotAMapping)));
    }

    #[test]
    fn test_empty_header_is_empty_mapping() {
        let doc = parse("---\n---\nbody\n");
        let fm = doc.frontmatter.expect("empty header parses");
        assert_eq!(fm.keys().count(), 0);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let doc = parse("\u{feff}---\nname: bom-skill\n---\n");
        assert!(doc.frontmatter.is_ok());
    }

    #[test]
    fn test_blank_values() {
        assert!(Value::Null.is_blank());
        assert!(Value::String("   ".into()).is_blank());
        assert!(Value::List(Vec::new()).is_blank());
        assert!(!Value::Number("0".into()).is_blank());
    }

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(""), 0);
        assert_eq!(count_lines("a\nb\n"), 2);
        assert_eq!(count_lines("a\nb"), 2);
    }
}
