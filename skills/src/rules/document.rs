//! Presence of `SKILL.md` and readability of every frontmatter header.

use super::Rule;
use crate::package::MarkdownFile;
use crate::{FrontmatterError, RuleId, SkillPackage, ValidationIssue};

/// Reports a missing `SKILL.md` and frontmatter that is absent or malformed.
///
/// Rules that depend on frontmatter skip any file this rule reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRule;

impl Rule for DocumentRule {
    fn name(&self) -> &'static str {
        "document"
    }

    fn check(&self, package: &SkillPackage) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        match &package.skill_md {
            Some(file) => issues.extend(header_issue(package, file)),
            None => issues.push(ValidationIssue::error(
                RuleId::SkillMdMissing,
                &package.name,
                package.skill_md_path(),
                "skill directory has no SKILL.md",
            )),
        }

        issues.extend(
            package
                .references
                .iter()
                .filter_map(|file| header_issue(package, file)),
        );
        issues
    }
}

fn header_issue(package: &SkillPackage, file: &MarkdownFile) -> Option<ValidationIssue> {
    let err = file.document.frontmatter.as_ref().err()?;
    let (rule_id, line) = match err {
        FrontmatterError::Missing => (RuleId::FrontmatterMissing, None),
        FrontmatterError::Unterminated => (RuleId::FrontmatterInvalidYaml, Some(1)),
        FrontmatterError::InvalidYaml { line, .. } => (RuleId::FrontmatterInvalidYaml, *line),
        FrontmatterError::NotAMapping => (RuleId::FrontmatterInvalidYaml, Some(2)),
    };
    Some(
        ValidationIssue::error(rule_id, &package.name, &file.path, err.to_string()).at_line(line),
    )
}
