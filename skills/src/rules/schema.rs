//! Frontmatter field requirements for `SKILL.md` and reference files.

use std::path::Path;

use super::{Rule, frontmatter_of};
use crate::frontmatter::{Frontmatter, Value};
use crate::{RuleId, SkillPackage, ValidationIssue};

/// Maximum length for descriptions (in characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Fields allowed in `SKILL.md` frontmatter.
pub const ALLOWED_FIELDS: [&str; 6] = [
    "name",
    "description",
    "license",
    "allowed-tools",
    "metadata",
    "compatibility",
];

/// Phrases a description must contain so the agent knows when to load the skill.
const TRIGGER_PHRASES: [&str; 2] = ["Use when", "Use for"];

/// The only accepted license.
const REQUIRED_LICENSE: &str = "MIT";

/// Validates required and optional frontmatter fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRule;

impl Rule for SchemaRule {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn check(&self, package: &SkillPackage) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if let Some(file) = &package.skill_md {
            if let Some(fm) = frontmatter_of(file) {
                let mut fields = Fields::new(package, &file.path, fm, &mut issues);
                fields.check_skill_md();
            }
        }

        for file in &package.references {
            if let Some(fm) = frontmatter_of(file) {
                let mut fields = Fields::new(package, &file.path, fm, &mut issues);
                fields.check_reference();
            }
        }

        issues
    }
}

/// Field checks against one file's frontmatter.
struct Fields<'a> {
    skill: &'a str,
    path: &'a Path,
    fm: &'a Frontmatter,
    issues: &'a mut Vec<ValidationIssue>,
}

impl<'a> Fields<'a> {
    fn new(
        package: &'a SkillPackage,
        path: &'a Path,
        fm: &'a Frontmatter,
        issues: &'a mut Vec<ValidationIssue>,
    ) -> Self {
        Self {
            skill: &package.name,
            path,
            fm,
            issues,
        }
    }

    fn check_skill_md(&mut self) {
        self.required_string("name");
        self.description();

        if let Some(license) = self.required_string("license") {
            if license.trim() != REQUIRED_LICENSE {
                self.emit(
                    RuleId::LicenseInvalid,
                    "license",
                    format!("license must be '{REQUIRED_LICENSE}', found '{license}'"),
                );
            }
        }

        match self.fm.get("metadata") {
            Some(other) if !other.is_blank() && other.as_map().is_none() => {
                self.wrong_type("metadata", "a mapping", other);
            }
            _ => {
                self.required_scalar("metadata.author");
                self.required_scalar("metadata.version");
            }
        }

        match self.fm.get("allowed-tools") {
            None | Some(Value::String(_) | Value::List(_)) => {}
            Some(other) => self.wrong_type("allowed-tools", "a string or list", other),
        }

        match self.fm.get("compatibility") {
            None | Some(Value::String(_)) => {}
            Some(other) => self.wrong_type("compatibility", "a string", other),
        }

        let unknown: Vec<String> = self
            .fm
            .keys()
            .filter(|key| !ALLOWED_FIELDS.contains(key))
            .map(ToString::to_string)
            .collect();
        for key in unknown {
            let line = self.fm.line_of(&key);
            self.issues.push(
                ValidationIssue::warning(
                    RuleId::FieldUnknown,
                    self.skill,
                    self.path,
                    format!(
                        "unknown frontmatter field '{key}' (allowed: {})",
                        ALLOWED_FIELDS.join(", ")
                    ),
                )
                .at_line(line),
            );
        }
    }

    fn check_reference(&mut self) {
        self.required_string("title");
        self.required_string("description");

        match self.fm.get("tags") {
            Some(Value::List(items)) if !items.is_empty() => {}
            Some(value @ (Value::String(_) | Value::Map(_) | Value::Bool(_) | Value::Number(_)))
                if !value.is_blank() =>
            {
                self.wrong_type("tags", "a list", value);
            }
            _ => self.emit(
                RuleId::RequiredFieldMissing,
                "tags",
                "required field 'tags' must be a non-empty list",
            ),
        }
    }

    fn description(&mut self) {
        let description = match self.fm.get("description") {
            None | Some(Value::Null) => {
                self.missing("description");
                return;
            }
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                self.wrong_type("description", "a string", other);
                return;
            }
        };

        let length = description.chars().count();
        if description.trim().is_empty() || length > MAX_DESCRIPTION_LENGTH {
            self.emit(
                RuleId::DescriptionLengthInvalid,
                "description",
                format!("description is {length} characters; it must be 1-{MAX_DESCRIPTION_LENGTH}"),
            );
        }

        if !TRIGGER_PHRASES.iter().any(|phrase| description.contains(phrase)) {
            self.emit(
                RuleId::DescriptionMissingTrigger,
                "description",
                "description must say when to use the skill (include \"Use when\" or \"Use for\")",
            );
        }

        if description.contains(['<', '>']) {
            self.emit(
                RuleId::DescriptionContainsMarkup,
                "description",
                "description must not contain '<' or '>' (no XML/HTML tags)",
            );
        }
    }

    /// A string field that must be present and non-blank.
    fn required_string(&mut self, key: &str) -> Option<&'a str> {
        let fm = self.fm;
        match fm.lookup(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            Some(value) if !value.is_blank() => {
                self.wrong_type(key, "a string", value);
                None
            }
            _ => {
                self.missing(key);
                None
            }
        }
    }

    /// A scalar field (string, number or boolean) that must be present and non-blank.
    fn required_scalar(&mut self, key: &str) {
        let fm = self.fm;
        match fm.lookup(key) {
            Some(value @ (Value::List(_) | Value::Map(_))) if !value.is_blank() => {
                self.wrong_type(key, "a scalar", value);
            }
            Some(value) if !value.is_blank() => {}
            _ => self.missing(key),
        }
    }

    fn missing(&mut self, key: &str) {
        self.emit(
            RuleId::RequiredFieldMissing,
            key,
            format!("required field '{key}' is missing or empty"),
        );
    }

    fn wrong_type(&mut self, key: &str, expected: &str, found: &Value) {
        self.emit(
            RuleId::FieldTypeInvalid,
            key,
            format!("field '{key}' must be {expected}, found {}", found.kind()),
        );
    }

    fn emit(&mut self, rule_id: RuleId, key: &str, message: impl Into<String>) {
        let line = self.fm.line_of(key);
        self.issues.push(
            ValidationIssue::error(rule_id, self.skill, self.path, message).at_line(line),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_HEADER: &str = "---\nname: pdf-tools\ndescription: Fill and merge PDF forms. Use when the user works with PDFs.\nlicense: MIT\nmetadata:\n  author: jane\n  version: \"1.0\"\n---\n";

    fn check_skill_md(content: &str) -> Vec<ValidationIssue> {
        SchemaRule.check(&SkillPackage::new("skills/pdf-tools").with_skill_md(content))
    }

    fn ids(issues: &[ValidationIssue]) -> Vec<RuleId> {
        issues.iter().map(|i| i.rule_id).collect()
    }

    #[test]
    fn test_valid_skill_md() {
        assert!(check_skill_md(VALID_HEADER).is_empty());
    }

    #[test]
    fn test_numeric_version_is_accepted() {
        let content = VALID_HEADER.replace("version: \"1.0\"", "version: 2");
        assert!(check_skill_md(&content).is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let issues = check_skill_md("---\nname: pdf-tools\ndescription: Use when testing.\n---\n");
        let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            ids(&issues),
            vec![RuleId::RequiredFieldMissing; 3],
            "{messages:?}"
        );
        assert!(messages[0].contains("'license'"));
        assert!(messages[1].contains("'metadata.author'"));
        assert!(messages[2].contains("'metadata.version'"));
    }

    #[test]
    fn test_description_rules_map_one_to_one() {
        let content = VALID_HEADER.replace(
            "Fill and merge PDF forms. Use when the user works with PDFs.",
            "Handles <pdf> files",
        );
        let issues = check_skill_md(&content);
        assert_eq!(
            ids(&issues),
            vec![
                RuleId::DescriptionMissingTrigger,
                RuleId::DescriptionContainsMarkup
            ]
        );
        assert_eq!(issues[0].line, Some(3));
    }

    #[test]
    fn test_description_too_long() {
        let long = format!("Use when {}", "x".repeat(MAX_DESCRIPTION_LENGTH));
        let content = VALID_HEADER.replace(
            "Fill and merge PDF forms. Use when the user works with PDFs.",
            &long,
        );
        assert_eq!(
            ids(&check_skill_md(&content)),
            vec![RuleId::DescriptionLengthInvalid]
        );
    }

    #[test]
    fn test_trigger_phrase_is_case_sensitive() {
        let content = VALID_HEADER.replace("Use when", "use when");
        assert_eq!(
            ids(&check_skill_md(&content)),
            vec![RuleId::DescriptionMissingTrigger]
        );
    }

    #[test]
    fn test_license_must_be_mit() {
        let content = VALID_HEADER.replace("license: MIT", "license: Apache-2.0");
        assert_eq!(ids(&check_skill_md(&content)), vec![RuleId::LicenseInvalid]);
    }

    #[test]
    fn test_type_errors_and_unknown_fields() {
        let content = VALID_HEADER.replace(
            "license: MIT\n",
            "license: MIT\nallowed-tools: 3\nversion: 1\n",
        );
        let issues = check_skill_md(&content);
        assert_eq!(
            ids(&issues),
            vec![RuleId::FieldTypeInvalid, RuleId::FieldUnknown]
        );
        assert_eq!(issues[1].severity, crate::Severity::Warning);
        assert_eq!(issues[1].line, Some(6));
    }

    #[test]
    fn test_metadata_must_be_mapping() {
        let content = VALID_HEADER.replace(
            "metadata:\n  author: jane\n  version: \"1.0\"\n",
            "metadata: jane\n",
        );
        assert_eq!(ids(&check_skill_md(&content)), vec![RuleId::FieldTypeInvalid]);
    }

    #[test]
    fn test_reference_fields() {
        let package = SkillPackage::new("skills/pdf-tools")
            .with_reference(
                "form-fields.md",
                "---\ntitle: Form fields\ndescription: Field types\ntags: [forms, pdf]\n---\n",
            )
            .with_reference("merging.md", "---\ntitle: Merging\ntags: []\n---\n")
            .with_reference("splitting.md", "---\ntitle: Split\ndescription: x\ntags: pdf\n---\n");

        let issues = SchemaRule.check(&package);
        assert_eq!(
            ids(&issues),
            vec![
                RuleId::RequiredFieldMissing,
                RuleId::RequiredFieldMissing,
                RuleId::FieldTypeInvalid
            ]
        );
        assert!(issues[0].file_path.ends_with("merging.md"));
        assert!(issues[0].message.contains("'description'"));
        assert!(issues[1].message.contains("'tags'"));
        assert!(issues[2].file_path.ends_with("splitting.md"));
    }

    #[test]
    fn test_broken_frontmatter_is_skipped() {
        assert!(check_skill_md("# no header\n").is_empty());
    }
}
