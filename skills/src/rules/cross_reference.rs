//! Link integrity between `SKILL.md` and its reference files.

use super::{Rule, body_of};
use crate::markdown::{Outline, is_external, resolve_link};
use crate::package::{MarkdownFile, REFERENCES_DIR};
use crate::{RuleId, SkillPackage, ValidationIssue};

const REFERENCES_SECTION: &str = "References";

/// Checks that every link in the `References` section of `SKILL.md` resolves
/// to a file under `references/`, and that reference files never link to one
/// another. References stay one level deep from `SKILL.md`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossReferenceRule;

impl Rule for CrossReferenceRule {
    fn name(&self) -> &'static str {
        "cross-reference"
    }

    fn check(&self, package: &SkillPackage) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if let Some(file) = &package.skill_md {
            check_references_section(package, file, &mut issues);
        }
        for file in &package.references {
            check_reference_links(package, file, &mut issues);
        }

        issues
    }
}

fn in_references_dir(path: &str) -> bool {
    path.strip_prefix(REFERENCES_DIR)
        .is_some_and(|rest| rest.starts_with('/'))
}

fn check_references_section(
    package: &SkillPackage,
    file: &MarkdownFile,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(body) = body_of(file) else {
        return;
    };
    let outline = Outline::parse(body);

    for link in outline.section_links(REFERENCES_SECTION) {
        if is_external(&link.target) {
            continue;
        }
        let resolved = resolve_link("", &link.target);
        let ok = resolved.as_deref().is_some_and(|path| {
            in_references_dir(path) && package.reference_paths.contains(path)
        });
        if !ok {
            issues.push(
                ValidationIssue::error(
                    RuleId::BrokenReferenceLink,
                    &package.name,
                    &file.path,
                    format!(
                        "link '{}' does not resolve to a file under {REFERENCES_DIR}/",
                        link.target
                    ),
                )
                .at_line(Some(link.line)),
            );
        }
    }
}

fn check_reference_links(
    package: &SkillPackage,
    file: &MarkdownFile,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(body) = body_of(file) else {
        return;
    };
    let base = file
        .relative
        .rsplit_once('/')
        .map_or("", |(dir, _)| dir);

    for link in Outline::parse(body).links {
        if is_external(&link.target) {
            continue;
        }
        let Some(resolved) = resolve_link(base, &link.target) else {
            continue;
        };
        if in_references_dir(&resolved) && resolved != file.relative {
            issues.push(
                ValidationIssue::error(
                    RuleId::CrossReferenceForbidden,
                    &package.name,
                    &file.path,
                    format!(
                        "reference files must be self-contained; link '{}' points at {resolved}",
                        link.target
                    ),
                )
                .at_line(Some(link.line)),
            );
        }
    }
}
