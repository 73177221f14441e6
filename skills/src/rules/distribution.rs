//! Files the packaging tool strips from installed skill bundles.

use super::Rule;
use crate::{RuleId, SkillPackage, ValidationIssue};

/// File names that must not ship inside a skill.
pub const DISALLOWED_FILE_NAMES: [&str; 2] = ["README.md", "metadata.json"];

/// Flags `README.md`, `metadata.json` and `_`-prefixed entries anywhere in the
/// skill tree outside `references/`, `scripts/` and `assets/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistributionRule;

impl Rule for DistributionRule {
    fn name(&self) -> &'static str {
        "distribution"
    }

    fn check(&self, package: &SkillPackage) -> Vec<ValidationIssue> {
        package
            .entries
            .iter()
            .filter_map(|entry| {
                let name = entry.rsplit('/').next().unwrap_or(entry);
                let reason = if DISALLOWED_FILE_NAMES.contains(&name) {
                    format!("'{name}' is excluded from skill bundles; fold its content into SKILL.md or references/")
                } else if name.starts_with('_') {
                    format!("'{name}' starts with '_' and is excluded from skill bundles")
                } else {
                    return None;
                };
                Some(ValidationIssue::error(
                    RuleId::DisallowedDistributionFile,
                    &package.name,
                    package.path_of(entry),
                    reason,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_flags_exact_paths() {
        let package = SkillPackage::new("skills/pdf-tools")
            .with_skill_md("---\n---\n")
            .with_entry("README.md")
            .with_entry("docs")
            .with_entry("docs/metadata.json")
            .with_entry("_drafts")
            .with_entry("LICENSE");

        let issues = DistributionRule.check(&package);
        let paths: Vec<_> = issues.iter().map(|i| i.file_path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("skills/pdf-tools").join("README.md"),
                Path::new("skills/pdf-tools").join("_drafts"),
                Path::new("skills/pdf-tools").join("docs").join("metadata.json"),
            ]
        );
        assert!(issues.iter().all(|i| i.rule_id == RuleId::DisallowedDistributionFile));
    }

    #[test]
    fn test_clean_tree() {
        let package = SkillPackage::new("skills/pdf-tools")
            .with_skill_md("---\n---\n")
            .with_reference("_private-notes.md", "---\n---\n");
        assert!(DistributionRule.check(&package).is_empty());
    }
}
