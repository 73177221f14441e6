//! Rule registry and the built-in rules.
//!
//! Every rule is a pure function from a loaded [`SkillPackage`] to the issues
//! it finds. Adding a check means registering another [`Rule`]; existing rules
//! are never touched.

mod cross_reference;
mod distribution;
mod document;
mod naming;
mod schema;
mod size;
mod structure;

use std::fmt::Debug;

use tracing::debug;

pub use cross_reference::CrossReferenceRule;
pub use distribution::DistributionRule;
pub use document::DocumentRule;
pub use naming::NamingRule;
pub use schema::SchemaRule;
pub use size::{FileKind, SizeRule};
pub use structure::{REQUIRED_SECTIONS, StructureRule};

use crate::frontmatter::{Body, Frontmatter};
use crate::package::MarkdownFile;
use crate::{SkillPackage, ValidationIssue, ValidatorConfig};

/// A single structural check.
pub trait Rule: Debug + Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Inspect a package and return every issue found.
    fn check(&self, package: &SkillPackage) -> Vec<ValidationIssue>;
}

/// Ordered collection of rules.
///
/// # Example
///
/// ```rust,ignore
/// let rules = RuleSet::builtin(&ValidatorConfig::default());
/// let issues = rules.check(&package);
/// ```
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    /// Create an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in rules, configured from `config`.
    #[must_use]
    pub fn builtin(config: &ValidatorConfig) -> Self {
        let mut rules = Self::new();
        rules.register(DocumentRule);
        rules.register(NamingRule);
        rules.register(SchemaRule);
        rules.register(StructureRule::default());
        rules.register(SizeRule::new(config.skill_md, config.reference));
        rules.register(DistributionRule);
        rules.register(CrossReferenceRule);
        rules
    }

    /// Add a rule.
    pub fn register(&mut self, rule: impl Rule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Names of the registered rules, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule against `package` and concatenate the results.
    #[must_use]
    pub fn check(&self, package: &SkillPackage) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for rule in &self.rules {
            let found = rule.check(package);
            debug!(skill = %package.name, rule = rule.name(), issues = found.len(), "rule finished");
            issues.extend(found);
        }
        issues
    }
}

/// The file's frontmatter, if it parsed.
fn frontmatter_of(file: &MarkdownFile) -> Option<&Frontmatter> {
    file.document.frontmatter.as_ref().ok()
}

/// The file's body, only when its header parsed. A file with a missing or
/// malformed header gets its frontmatter issue and nothing else.
fn body_of(file: &MarkdownFile) -> Option<&Body> {
    frontmatter_of(file)?;
    file.document.body.as_ref()
}
