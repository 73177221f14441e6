//! Entry point tying the loader, the rules and the aggregator together.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::loader::{SkillLoader, ensure_directory};
use crate::package::directory_name;
use crate::report::{RunSummary, aggregate};
use crate::rules::RuleSet;
use crate::{RuleId, SkillError, SkillPackage, ValidationIssue, ValidatorConfig};

/// Issues found in one skill directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillOutcome {
    /// Skill name, taken from the directory name.
    pub skill_name: String,
    /// Every issue found, unsorted.
    pub issues: Vec<ValidationIssue>,
}

impl SkillOutcome {
    /// Outcome for a skill whose validation could not complete.
    #[must_use]
    pub fn unreadable(dir: &Path, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        let skill_name = directory_name(dir);
        let issue = ValidationIssue::error(RuleId::SkillUnreadable, &skill_name, path, message);
        Self {
            skill_name,
            issues: vec![issue],
        }
    }
}

/// Runs a [`RuleSet`] over skill directories.
///
/// # Example
///
/// ```rust,ignore
/// let validator = Validator::new(ValidatorConfig::default());
/// let summary = validator.run(&[PathBuf::from("skills/pdf-tools")]).await?;
/// print!("{summary}");
/// ```
#[derive(Debug)]
pub struct Validator {
    rules: RuleSet,
    config: ValidatorConfig,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl Validator {
    /// A validator running every built-in rule.
    #[must_use]
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            rules: RuleSet::builtin(&config),
            config,
        }
    }

    /// A validator running a custom rule set.
    #[must_use]
    pub const fn with_rules(rules: RuleSet, config: ValidatorConfig) -> Self {
        Self { rules, config }
    }

    /// The configuration this validator was built with.
    #[must_use]
    pub const fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Run every rule against an already loaded package.
    #[must_use]
    pub fn check(&self, package: &SkillPackage) -> Vec<ValidationIssue> {
        self.rules.check(package)
    }

    /// Load and check one skill directory.
    ///
    /// Read failures inside the skill become a `SKILL_UNREADABLE` issue so
    /// that sibling skills are still validated.
    pub async fn validate_dir(&self, dir: &Path) -> SkillOutcome {
        match SkillLoader::load(dir).await {
            Ok(package) => {
                let issues = self.check(&package);
                debug!(skill = %package.name, issues = issues.len(), "validated skill");
                SkillOutcome {
                    skill_name: package.name,
                    issues,
                }
            }
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "skill could not be read");
                let path = match &err {
                    SkillError::ReadFile { path, .. } => path.clone(),
                    _ => dir.to_path_buf(),
                };
                SkillOutcome::unreadable(dir, path, err.to_string())
            }
        }
    }

    /// Validate every target and aggregate the results.
    ///
    /// All targets are checked for existence before any validation starts.
    ///
    /// # Errors
    ///
    /// Returns an error if a target is missing or is not a directory.
    pub async fn run(&self, targets: &[PathBuf]) -> Result<RunSummary, SkillError> {
        for target in targets {
            ensure_directory(target).await?;
        }

        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            outcomes.push(self.validate_dir(target).await);
        }
        Ok(self.summarize(outcomes))
    }

    /// Aggregate per-skill outcomes into a run summary, honoring strict mode.
    #[must_use]
    pub fn summarize(&self, outcomes: impl IntoIterator<Item = SkillOutcome>) -> RunSummary {
        let mut names = Vec::new();
        let mut issues = Vec::new();
        for outcome in outcomes {
            names.push(outcome.skill_name);
            issues.extend(outcome.issues);
        }
        aggregate(names, issues, self.config.strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future::block_on;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_target_is_fatal() {
        let dir = tempdir().unwrap();
        let validator = Validator::default();
        let result = block_on(validator.run(&[dir.path().join("no-such-skill")]));
        assert!(matches!(result, Err(SkillError::NotFound { .. })));
    }

    #[test]
    fn test_file_target_is_fatal() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("SKILL.md");
        fs::write(&file, "---\n---\n").unwrap();
        let result = block_on(Validator::default().run(&[file]));
        assert!(matches!(result, Err(SkillError::NotADirectory { .. })));
    }

    #[test]
    fn test_empty_skill_reports_missing_skill_md() {
        let dir = tempdir().unwrap();
        let skill = dir.path().join("empty-skill");
        fs::create_dir(&skill).unwrap();

        let summary = block_on(Validator::default().run(&[skill])).unwrap();
        assert_eq!(summary.failed, 1);
        let report = &summary.reports[0];
        assert_eq!(report.skill_name, "empty-skill");
        assert!(
            report
                .issues
                .iter()
                .any(|i| i.rule_id == RuleId::SkillMdMissing)
        );
    }

    #[test]
    fn test_strict_mode_fails_on_warnings() {
        let validator = Validator::new(ValidatorConfig::default().strict(true));
        let outcome = SkillOutcome {
            skill_name: "pdf-tools".to_string(),
            issues: vec![ValidationIssue::warning(
                RuleId::SizeWarning,
                "pdf-tools",
                "skills/pdf-tools/references/long-guide.md",
                "long",
            )],
        };
        assert!(!validator.summarize([outcome]).is_success());
    }

    #[test]
    fn test_broken_header_suppresses_body_checks() {
        let package = SkillPackage::new("skills/pdf-tools")
            .with_skill_md("# Overview\n\n```sh\nx\n```\n");
        let ids: Vec<_> = Validator::default()
            .check(&package)
            .iter()
            .map(|i| i.rule_id)
            .collect();
        assert_eq!(ids, vec![RuleId::FrontmatterMissing]);

        let package = SkillPackage::new("skills/pdf-tools")
            .with_skill_md("---\nname: [broken\n---\n## References\n\n- [x](references/x.md)\n")
            .with_reference("form-fields.md", "See [merging](merging.md).\n");
        let ids: Vec<_> = Validator::default()
            .check(&package)
            .iter()
            .map(|i| i.rule_id)
            .collect();
        assert_eq!(
            ids,
            vec![RuleId::FrontmatterInvalidYaml, RuleId::FrontmatterMissing]
        );
    }

    #[test]
    fn test_custom_rule_set() {
        let config = ValidatorConfig::default().strict(true);
        let validator = Validator::with_rules(RuleSet::new(), config.clone());
        assert_eq!(validator.config(), &config);
        assert!(validator.check(&SkillPackage::new("skills/PDF_Tools")).is_empty());
    }

    #[test]
    fn test_unreadable_outcome() {
        let outcome = SkillOutcome::unreadable(
            Path::new("skills/pdf-tools"),
            "skills/pdf-tools/SKILL.md",
            "permission denied",
        );
        assert_eq!(outcome.skill_name, "pdf-tools");
        assert_eq!(outcome.issues[0].rule_id, RuleId::SkillUnreadable);
        assert!(outcome.issues[0].is_error());
    }
}
