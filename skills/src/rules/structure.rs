//! Required sections of `SKILL.md` and the ban on inline code.

use super::{Rule, body_of};
use crate::markdown::Outline;
use crate::{RuleId, SkillPackage, ValidationIssue};

/// Sections every `SKILL.md` must contain, in any order.
pub const REQUIRED_SECTIONS: [&str; 5] = [
    "Overview",
    "Quick Reference",
    "Common Mistakes",
    "Delegation",
    "References",
];

/// Checks that `SKILL.md` has every required level-1/2 section and no fenced
/// code blocks. Code examples belong in `references/`.
#[derive(Debug, Clone)]
pub struct StructureRule {
    sections: Vec<String>,
}

impl Default for StructureRule {
    fn default() -> Self {
        Self::with_sections(REQUIRED_SECTIONS)
    }
}

impl StructureRule {
    /// Require a custom set of section titles.
    pub fn with_sections<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sections: sections.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for StructureRule {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn check(&self, package: &SkillPackage) -> Vec<ValidationIssue> {
        let Some(file) = &package.skill_md else {
            return Vec::new();
        };
        let Some(body) = body_of(file) else {
            return Vec::new();
        };

        let outline = Outline::parse(body);
        let mut issues = Vec::new();

        for section in &self.sections {
            if outline.find_section(section).is_none() {
                issues.push(ValidationIssue::error(
                    RuleId::RequiredSectionMissing,
                    &package.name,
                    &file.path,
                    format!("missing required section \"{section}\""),
                ));
            }
        }

        for line in outline.fenced_blocks {
            issues.push(
                ValidationIssue::error(
                    RuleId::CodeExampleInSkillMd,
                    &package.name,
                    &file.path,
                    "fenced code block in SKILL.md; move code examples into references/",
                )
                .at_line(Some(line)),
            );
        }

        issues
    }
}
