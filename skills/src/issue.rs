//! Validation issues emitted by rules.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// How serious an issue is.
///
/// Ordered so that `Error > Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Printed, but does not fail the skill.
    Warning,
    /// Fails the skill.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Stable identifiers for every check the validator performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum RuleId {
    FrontmatterMissing,
    FrontmatterInvalidYaml,
    SkillMdMissing,
    SkillUnreadable,
    NameFormatInvalid,
    NameMismatch,
    NameReservedTerm,
    ReferenceNameFormatInvalid,
    RequiredFieldMissing,
    FieldTypeInvalid,
    FieldUnknown,
    LicenseInvalid,
    DescriptionLengthInvalid,
    DescriptionMissingTrigger,
    DescriptionContainsMarkup,
    RequiredSectionMissing,
    CodeExampleInSkillMd,
    SizeWarning,
    SizeExceeded,
    DisallowedDistributionFile,
    BrokenReferenceLink,
    CrossReferenceForbidden,
}

impl RuleId {
    /// The identifier as printed in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FrontmatterMissing => "FRONTMATTER_MISSING",
            Self::FrontmatterInvalidYaml => "FRONTMATTER_INVALID_YAML",
            Self::SkillMdMissing => "SKILL_MD_MISSING",
            Self::SkillUnreadable => "SKILL_UNREADABLE",
            Self::NameFormatInvalid => "NAME_FORMAT_INVALID",
            Self::NameMismatch => "NAME_MISMATCH",
            Self::NameReservedTerm => "NAME_RESERVED_TERM",
            Self::ReferenceNameFormatInvalid => "REFERENCE_NAME_FORMAT_INVALID",
            Self::RequiredFieldMissing => "REQUIRED_FIELD_MISSING",
            Self::FieldTypeInvalid => "FIELD_TYPE_INVALID",
            Self::FieldUnknown => "FIELD_UNKNOWN",
            Self::LicenseInvalid => "LICENSE_INVALID",
            Self::DescriptionLengthInvalid => "DESCRIPTION_LENGTH_INVALID",
            Self::DescriptionMissingTrigger => "DESCRIPTION_MISSING_TRIGGER",
            Self::DescriptionContainsMarkup => "DESCRIPTION_CONTAINS_MARKUP",
            Self::RequiredSectionMissing => "REQUIRED_SECTION_MISSING",
            Self::CodeExampleInSkillMd => "CODE_EXAMPLE_IN_SKILL_MD",
            Self::SizeWarning => "SIZE_WARNING",
            Self::SizeExceeded => "SIZE_EXCEEDED",
            Self::DisallowedDistributionFile => "DISALLOWED_DISTRIBUTION_FILE",
            Self::BrokenReferenceLink => "BROKEN_REFERENCE_LINK",
            Self::CrossReferenceForbidden => "CROSS_REFERENCE_FORBIDDEN",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding against one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Which check produced the issue.
    pub rule_id: RuleId,
    /// How serious it is.
    pub severity: Severity,
    /// Human-readable explanation.
    pub message: String,
    /// Name of the skill (its directory name).
    pub skill_name: String,
    /// The offending file or directory.
    pub file_path: PathBuf,
    /// 1-indexed line, when the issue points inside a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ValidationIssue {
    /// Create an error-severity issue.
    pub fn error(
        rule_id: RuleId,
        skill_name: impl Into<String>,
        file_path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id,
            severity: Severity::Error,
            message: message.into(),
            skill_name: skill_name.into(),
            file_path: file_path.into(),
            line: None,
        }
    }

    /// Create a warning-severity issue.
    pub fn warning(
        rule_id: RuleId,
        skill_name: impl Into<String>,
        file_path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(rule_id, skill_name, file_path, message)
        }
    }

    /// Attach a line number.
    #[must_use]
    pub const fn at_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    /// Whether this issue fails its skill.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Path the issue points at.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} \u{2014} {} ({}",
            self.severity,
            self.rule_id,
            self.message,
            self.file_path.display()
        )?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        f.write_str(")")
    }
}
