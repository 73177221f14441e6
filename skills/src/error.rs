//! Error types for the skill validator.
//!
//! Only conditions that end the whole run live here. Anything that goes wrong
//! inside a single skill is reported as a [`ValidationIssue`](crate::ValidationIssue)
//! instead.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a validation run.
#[derive(Debug, Error)]
pub enum SkillError {
    /// Failed to read a path that the run depends on.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Path that couldn't be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A targeted path does not exist.
    #[error("skill path {path} does not exist")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A targeted path exists but is not a directory.
    #[error("skill path {path} is not a directory")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// The validator configuration could not be parsed.
    #[error("invalid validator configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// A size threshold pair is inconsistent.
    #[error("size thresholds for {kind} must satisfy warn < max (got warn={warn}, max={max})")]
    InvalidThresholds {
        /// Which file kind the thresholds apply to.
        kind: &'static str,
        /// Configured warning threshold.
        warn: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Reasons a markdown file's frontmatter header could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontmatterError {
    /// The file does not open with a `---` delimiter.
    #[error("file has no YAML frontmatter block")]
    Missing,

    /// The opening `---` is never closed.
    #[error("frontmatter is missing its closing '---' delimiter")]
    Unterminated,

    /// The header is not valid YAML.
    #[error("frontmatter is not valid YAML: {message}")]
    InvalidYaml {
        /// Parser message.
        message: String,
        /// 1-indexed line in the file, when the parser reports one.
        line: Option<usize>,
    },

    /// The header parsed, but not as a key/value mapping.
    #[error("frontmatter must be a YAML mapping of field names to values")]
    NotAMapping,
}
