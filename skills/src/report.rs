//! Aggregation of issues into per-skill reports.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::ValidationIssue;

/// Outcome for one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Skill name.
    pub skill_name: String,
    /// Whether the skill passed.
    pub passed: bool,
    /// Issues, errors first.
    pub issues: Vec<ValidationIssue>,
}

/// Every report of a run, ordered by skill name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// One report per skill.
    pub reports: Vec<ValidationReport>,
    /// Number of skills that passed.
    pub passed: usize,
    /// Number of skills that failed.
    pub failed: usize,
}

impl RunSummary {
    /// Whether every skill passed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            let status = if report.passed { "passed" } else { "failed" };
            writeln!(f, "{}: {status}", report.skill_name)?;
            for issue in &report.issues {
                writeln!(f, "  {issue}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{} passed, {} failed", self.passed, self.failed)
    }
}

/// Group `issues` by skill and build the run summary.
///
/// `skills` lists every validated skill so that skills without issues still
/// get a report. Issues within a skill are sorted by severity (errors first),
/// rule id, then path, with line and message breaking any remaining ties.
/// A skill passes when it has no errors, or no issues at all when `strict`.
pub fn aggregate<I, S>(skills: I, issues: Vec<ValidationIssue>, strict: bool) -> RunSummary
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut groups: BTreeMap<String, Vec<ValidationIssue>> = skills
        .into_iter()
        .map(|name| (name.into(), Vec::new()))
        .collect();
    for issue in issues {
        groups.entry(issue.skill_name.clone()).or_default().push(issue);
    }

    let mut summary = RunSummary::default();
    for (skill_name, mut issues) in groups {
        issues.sort_by(|a, b| {
            (Reverse(a.severity), a.rule_id.as_str(), &a.file_path, a.line, &a.message).cmp(&(
                Reverse(b.severity),
                b.rule_id.as_str(),
                &b.file_path,
                b.line,
                &b.message,
            ))
        });

        let passed = if strict {
            issues.is_empty()
        } else {
            !issues.iter().any(ValidationIssue::is_error)
        };
        if passed {
            summary.passed += 1;
        } else {
            summary.failed += 1;
        }

        summary.reports.push(ValidationReport {
            skill_name,
            passed,
            issues,
        });
    }
    summary
}
