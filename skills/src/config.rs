//! Validator configuration.
//!
//! All fields are optional in the JSON form and fall back to the documented
//! defaults:
//!
//! ```json
//! {
//!   "skill_md":  { "target": [100, 150], "warn": 400, "max": 500 },
//!   "reference": { "warn": 500, "max": 750 },
//!   "strict": false
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{RuleId, SkillError};

/// Line-count thresholds for one kind of file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeThresholds {
    /// Ideal line range. Informational only, never reported.
    #[serde(default)]
    pub target: Option<(usize, usize)>,
    /// Above this many lines a warning is emitted.
    pub warn: usize,
    /// At or above this many lines an error is emitted.
    pub max: usize,
}

impl SizeThresholds {
    /// Thresholds for `SKILL.md`.
    pub const SKILL_MD: Self = Self {
        target: Some((100, 150)),
        warn: 400,
        max: 500,
    };

    /// Thresholds for files under `references/`.
    pub const REFERENCE: Self = Self {
        target: None,
        warn: 500,
        max: 750,
    };

    /// Classify a line count, returning the rule it breaches if any.
    #[must_use]
    pub const fn classify(&self, lines: usize) -> Option<RuleId> {
        if lines >= self.max {
            Some(RuleId::SizeExceeded)
        } else if lines > self.warn {
            Some(RuleId::SizeWarning)
        } else {
            None
        }
    }

    /// Whether `lines` lies inside the target range. `None` when there is no
    /// target.
    #[must_use]
    pub const fn within_target(&self, lines: usize) -> Option<bool> {
        match self.target {
            Some((low, high)) => Some(lines >= low && lines <= high),
            None => None,
        }
    }

    fn validate(&self, kind: &'static str) -> Result<(), SkillError> {
        if self.warn < self.max {
            Ok(())
        } else {
            Err(SkillError::InvalidThresholds {
                kind,
                warn: self.warn,
                max: self.max,
            })
        }
    }
}

/// Static configuration handed to the rules at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Size thresholds for `SKILL.md`.
    pub skill_md: SizeThresholds,
    /// Size thresholds for reference files.
    pub reference: SizeThresholds,
    /// Treat warnings as failures.
    pub strict: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            skill_md: SizeThresholds::SKILL_MD,
            reference: SizeThresholds::REFERENCE,
            strict: false,
        }
    }
}

impl ValidatorConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SkillError::InvalidConfig`] for malformed JSON or unknown
    /// fields and [`SkillError::InvalidThresholds`] when `warn >= max`.
    pub fn from_json(json: &str) -> Result<Self, SkillError> {
        let config: Self = serde_json::from_str(json)?;
        config.skill_md.validate("SKILL.md")?;
        config.reference.validate("reference files")?;
        Ok(config)
    }

    /// Enable or disable strict mode.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_thresholds() {
        let t = SizeThresholds::REFERENCE;
        assert_eq!(t.classify(500), None);
        assert_eq!(t.classify(501), Some(RuleId::SizeWarning));
        assert_eq!(t.classify(749), Some(RuleId::SizeWarning));
        assert_eq!(t.classify(750), Some(RuleId::SizeExceeded));
        assert_eq!(t.classify(751), Some(RuleId::SizeExceeded));
    }

    #[test]
    fn test_skill_md_thresholds() {
        let t = SizeThresholds::SKILL_MD;
        assert_eq!(t.classify(30), None);
        assert_eq!(t.classify(401), Some(RuleId::SizeWarning));
        assert_eq!(t.classify(500), Some(RuleId::SizeExceeded));
        assert_eq!(t.within_target(120), Some(true));
        assert_eq!(t.within_target(30), Some(false));
        assert_eq!(SizeThresholds::REFERENCE.within_target(30), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            ValidatorConfig::from_json(r#"{ "reference": { "warn": 100, "max": 200 } }"#)
                .expect("parse config");
        assert_eq!(config.skill_md, SizeThresholds::SKILL_MD);
        assert_eq!(config.reference.max, 200);
        assert!(!config.strict);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ValidatorConfig::from_json(r#"{ "stirct": true }"#);
        assert!(matches!(result, Err(SkillError::InvalidConfig(_))));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let result = ValidatorConfig::from_json(r#"{ "skill_md": { "warn": 500, "max": 400 } }"#);
        assert!(matches!(result, Err(SkillError::InvalidThresholds { .. })));
    }
}
