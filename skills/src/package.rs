//! In-memory snapshot of a skill directory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::frontmatter::{Document, count_lines, parse_document};

/// Name of the entry-point file of every skill.
pub const SKILL_MD: &str = "SKILL.md";
/// Directory holding on-demand reference documents.
pub const REFERENCES_DIR: &str = "references";
/// Directory holding executable helpers.
pub const SCRIPTS_DIR: &str = "scripts";
/// Directory holding static assets.
pub const ASSETS_DIR: &str = "assets";

/// A markdown file belonging to a skill, parsed into header and body.
#[derive(Debug, Clone)]
pub struct MarkdownFile {
    /// Path as reported in issues (skill root joined with `relative`).
    pub path: PathBuf,
    /// Path relative to the skill root, `/`-separated.
    pub relative: String,
    /// Parsed header and body.
    pub document: Document,
    /// Number of lines in the file.
    pub line_count: usize,
}

impl MarkdownFile {
    /// Parse `content` as the file at `relative` inside the skill at `root`.
    #[must_use]
    pub fn parse(root: &Path, relative: &str, content: &str) -> Self {
        let path = join_relative(root, relative);
        Self {
            document: parse_document(content),
            line_count: count_lines(content),
            relative: relative.to_string(),
            path,
        }
    }

    /// File name without directories.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.relative
            .rsplit_once('/')
            .map_or(self.relative.as_str(), |(_, name)| name)
    }
}

/// A skill package, constructed once per run from a directory snapshot.
///
/// Rules only ever see this snapshot; nothing is read from disk after loading.
#[derive(Debug, Clone)]
pub struct SkillPackage {
    /// Skill name, taken from the directory name.
    pub name: String,
    /// The skill directory as given on the command line or discovered.
    pub root: PathBuf,
    /// The parsed `SKILL.md`, if present.
    pub skill_md: Option<MarkdownFile>,
    /// Markdown files under `references/`, sorted by path.
    pub references: Vec<MarkdownFile>,
    /// Every file under `references/` (markdown or not), relative to the root.
    pub reference_paths: BTreeSet<String>,
    /// Files under `scripts/`, relative to the root.
    pub scripts: Vec<String>,
    /// Files under `assets/`, relative to the root.
    pub assets: Vec<String>,
    /// Every entry in the tree except the contents of `references/`,
    /// `scripts/` and `assets/`, relative to the root and sorted.
    pub entries: Vec<String>,
}

impl SkillPackage {
    /// Create an empty package for the directory at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: directory_name(&root),
            root,
            skill_md: None,
            references: Vec::new(),
            reference_paths: BTreeSet::new(),
            scripts: Vec::new(),
            assets: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Add `SKILL.md` with the given content.
    #[must_use]
    pub fn with_skill_md(mut self, content: &str) -> Self {
        self.skill_md = Some(MarkdownFile::parse(&self.root, SKILL_MD, content));
        self.add_entry(SKILL_MD);
        self
    }

    /// Add a reference file. `file_name` is relative to `references/`.
    #[must_use]
    pub fn with_reference(mut self, file_name: &str, content: &str) -> Self {
        let relative = format!("{REFERENCES_DIR}/{file_name}");
        self.reference_paths.insert(relative.clone());
        self.add_entry(REFERENCES_DIR);
        self.references
            .push(MarkdownFile::parse(&self.root, &relative, content));
        self.references.sort_by(|a, b| a.relative.cmp(&b.relative));
        self
    }

    /// Record a tree entry outside `references/`, `scripts/` and `assets/`.
    #[must_use]
    pub fn with_entry(mut self, relative: &str) -> Self {
        self.add_entry(relative);
        self
    }

    pub(crate) fn add_entry(&mut self, relative: &str) {
        if let Err(pos) = self.entries.binary_search_by(|e| e.as_str().cmp(relative)) {
            self.entries.insert(pos, relative.to_string());
        }
    }

    /// Path of an entry as reported in issues.
    #[must_use]
    pub fn path_of(&self, relative: &str) -> PathBuf {
        join_relative(&self.root, relative)
    }

    /// Path of `SKILL.md` as reported in issues.
    #[must_use]
    pub fn skill_md_path(&self) -> PathBuf {
        self.path_of(SKILL_MD)
    }
}

/// Last component of `path`, falling back to the whole path.
pub(crate) fn directory_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn join_relative(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}
