//! Line-count thresholds.

use tracing::debug;

use super::Rule;
use crate::config::SizeThresholds;
use crate::package::MarkdownFile;
use crate::{RuleId, SkillPackage, ValidationIssue};

/// The kinds of file the size thresholds distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// The skill entry point.
    SkillMd,
    /// A file under `references/`.
    Reference,
}

/// Flags files whose line count crosses the warn or max threshold of their kind.
#[derive(Debug, Clone)]
pub struct SizeRule {
    limits: [(FileKind, SizeThresholds); 2],
}

impl SizeRule {
    /// Build the rule from per-kind thresholds.
    #[must_use]
    pub const fn new(skill_md: SizeThresholds, reference: SizeThresholds) -> Self {
        Self {
            limits: [
                (FileKind::SkillMd, skill_md),
                (FileKind::Reference, reference),
            ],
        }
    }

    /// Thresholds applied to `kind`.
    #[must_use]
    pub fn thresholds(&self, kind: FileKind) -> SizeThresholds {
        self.limits
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(SizeThresholds::REFERENCE, |(_, t)| *t)
    }

    fn audit(
        &self,
        package: &SkillPackage,
        file: &MarkdownFile,
        kind: FileKind,
    ) -> Option<ValidationIssue> {
        let thresholds = self.thresholds(kind);
        let lines = file.line_count;

        if thresholds.within_target(lines) == Some(false) {
            debug!(file = %file.path.display(), lines, "outside target size");
        }

        match thresholds.classify(lines)? {
            RuleId::SizeExceeded => Some(ValidationIssue::error(
                RuleId::SizeExceeded,
                &package.name,
                &file.path,
                format!(
                    "{} has {lines} lines; it must stay below {}",
                    file.relative, thresholds.max
                ),
            )),
            rule_id => Some(ValidationIssue::warning(
                rule_id,
                &package.name,
                &file.path,
                format!(
                    "{} has {lines} lines; consider splitting it (warns above {}, fails at {})",
                    file.relative, thresholds.warn, thresholds.max
                ),
            )),
        }
    }
}

impl Default for SizeRule {
    fn default() -> Self {
        Self::new(SizeThresholds::SKILL_MD, SizeThresholds::REFERENCE)
    }
}

impl Rule for SizeRule {
    fn name(&self) -> &'static str {
        "size"
    }

    fn check(&self, package: &SkillPackage) -> Vec<ValidationIssue> {
        let skill_md = package
            .skill_md
            .iter()
            .map(|file| (file, FileKind::SkillMd));
        let references = package
            .references
            .iter()
            .map(|file| (file, FileKind::Reference));

        skill_md
            .chain(references)
            .filter_map(|(file, kind)| self.audit(package, file, kind))
            .collect()
    }
}
