//! Directory and file naming rules.

use std::sync::LazyLock;

use super::{Rule, frontmatter_of};
use crate::frontmatter::Value;
use crate::{RuleId, SkillPackage, ValidationIssue};

/// Lowercase kebab-case: starts with a letter, single hyphens between runs.
static RE_KEBAB_CASE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("valid regex"));

const MIN_NAME_LENGTH: usize = 4;
const MAX_NAME_LENGTH: usize = 64;
const MIN_REFERENCE_STEM_LENGTH: usize = 4;

/// Substrings a skill name may not contain, compared case-insensitively.
pub const RESERVED_TERMS: &[&str] = &["anthropic", "claude"];

/// Checks the skill directory name, its agreement with `frontmatter.name`,
/// reserved terms, and reference file names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamingRule;

impl Rule for NamingRule {
    fn name(&self) -> &'static str {
        "naming"
    }

    fn check(&self, package: &SkillPackage) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let skill_md = package.skill_md_path();

        if let Some(problem) = name_format_problem(&package.name) {
            issues.push(ValidationIssue::error(
                RuleId::NameFormatInvalid,
                &package.name,
                &package.root,
                format!("directory name '{}' {problem}", package.name),
            ));
        }

        let declared = package.skill_md.as_ref().and_then(frontmatter_of).and_then(|fm| {
            fm.get("name")
                .and_then(Value::as_str)
                .map(|name| (name, fm.line_of("name")))
        });

        if let Some((name, line)) = declared {
            if name != package.name {
                issues.push(
                    ValidationIssue::error(
                        RuleId::NameMismatch,
                        &package.name,
                        &skill_md,
                        format!(
                            "frontmatter name '{name}' does not match directory name '{}'",
                            package.name
                        ),
                    )
                    .at_line(line),
                );
            }
        }

        let candidates = std::iter::once((package.name.as_str(), None)).chain(declared);
        for (candidate, line) in candidates {
            if let Some(term) = reserved_term(candidate) {
                issues.push(
                    ValidationIssue::error(
                        RuleId::NameReservedTerm,
                        &package.name,
                        &skill_md,
                        format!("skill name '{candidate}' contains reserved term '{term}'"),
                    )
                    .at_line(line),
                );
                break;
            }
        }

        for reference in &package.references {
            let file_name = reference.file_name();
            let stem = file_name.strip_suffix(".md").unwrap_or(file_name);
            if !RE_KEBAB_CASE.is_match(stem) || stem.chars().count() < MIN_REFERENCE_STEM_LENGTH {
                issues.push(ValidationIssue::error(
                    RuleId::ReferenceNameFormatInvalid,
                    &package.name,
                    &reference.path,
                    format!(
                        "reference file name '{file_name}' must be kebab-case with at least {MIN_REFERENCE_STEM_LENGTH} characters before the extension"
                    ),
                ));
            }
        }

        issues
    }
}

/// Describe why `name` is not a valid skill name, if it isn't.
fn name_format_problem(name: &str) -> Option<String> {
    let length = name.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) {
        return Some(format!(
            "is {length} characters; it must be {MIN_NAME_LENGTH}-{MAX_NAME_LENGTH}"
        ));
    }
    if !RE_KEBAB_CASE.is_match(name) {
        return Some(
            "must be lowercase kebab-case (a-z, 0-9, single hyphens, starting with a letter)"
                .to_string(),
        );
    }
    None
}

fn reserved_term(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    RESERVED_TERMS
        .iter()
        .copied()
        .find(|term| lower.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(dir: &str, name: &str) -> SkillPackage {
        SkillPackage::new(format!("skills/{dir}"))
            .with_skill_md(&format!("---\nname: {name}\ndescription: x\n---\n"))
    }

    fn ids(issues: &[ValidationIssue]) -> Vec<RuleId> {
        issues.iter().map(|i| i.rule_id).collect()
    }

    #[test]
    fn test_valid_names() {
        assert!(NamingRule.check(&skill("pdf-tools", "pdf-tools")).is_empty());
        assert!(NamingRule.check(&skill("web2-search", "web2-search")).is_empty());
    }

    #[test]
    fn test_invalid_directory_names() {
        for dir in ["PDF-tools", "pdf_tools", "-pdf-tools", "pdf-tools-", "pdf--tools", "abc", "9lives"] {
            let issues = NamingRule.check(&skill(dir, dir));
            assert_eq!(
                ids(&issues),
                vec![RuleId::NameFormatInvalid],
                "directory {dir}"
            );
        }
        let long = "a".repeat(65);
        assert_eq!(
            ids(&NamingRule.check(&skill(&long, &long))),
            vec![RuleId::NameFormatInvalid]
        );
    }

    #[test]
    fn test_name_mismatch_is_reported_once() {
        let issues = NamingRule.check(&skill("pdf-tools", "pdf-helper"));
        assert_eq!(ids(&issues), vec![RuleId::NameMismatch]);
        assert_eq!(issues[0].line, Some(2));
    }

    #[test]
    fn test_reserved_terms() {
        let issues = NamingRule.check(&skill("claude-helper", "claude-helper"));
        assert_eq!(ids(&issues), vec![RuleId::NameReservedTerm]);

        let issues = NamingRule.check(&skill("pdf-tools", "Anthropic-PDF"));
        assert_eq!(
            ids(&issues),
            vec![RuleId::NameMismatch, RuleId::NameReservedTerm]
        );
    }

    #[test]
    fn test_reference_names() {
        let package = skill("pdf-tools", "pdf-tools")
            .with_reference("form-fields.md", "---\n---\n")
            .with_reference("api.md", "---\n---\n")
            .with_reference("Forms_Guide.md", "---\n---\n");
        let issues = NamingRule.check(&package);
        assert_eq!(
            ids(&issues),
            vec![
                RuleId::ReferenceNameFormatInvalid,
                RuleId::ReferenceNameFormatInvalid
            ]
        );
        assert!(issues[0].file_path.ends_with("Forms_Guide.md"));
        assert!(issues[1].file_path.ends_with("api.md"));
    }
}
