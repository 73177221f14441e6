//! Structural validator for Agent Skills packages.
//!
//! A skill is a directory with a `SKILL.md` entry point and optional
//! `references/`, `scripts/` and `assets/` folders. This crate loads such a
//! directory, runs a set of independent rules over it and aggregates the
//! resulting issues into a per-skill report.
//!
//! # Structure
//!
//! ```text
//! skills/
//! └── pdf-tools/
//!     ├── SKILL.md           # Frontmatter + Overview, Quick Reference, ...
//!     ├── references/        # One level deep, self-contained guides
//!     ├── scripts/
//!     └── assets/
//! ```
//!
//! # SKILL.md Format
//!
//! ```markdown
//! ---
//! name: pdf-tools
//! description: Fill and merge PDF forms. Use when the user hands over a PDF.
//! license: MIT
//! metadata:
//!   author: docs-team
//!   version: "1.2.0"
//! ---
//!
//! # Overview
//! ...
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use skillcheck_skills::{SkillLoader, Validator, ValidatorConfig};
//!
//! let targets = SkillLoader::new().add_path("skills").discover().await?;
//! let validator = Validator::new(ValidatorConfig::default());
//! let summary = validator.run(&targets).await?;
//!
//! print!("{summary}");
//! std::process::exit(i32::from(!summary.is_success()));
//! ```

mod config;
mod error;
pub mod frontmatter;
mod issue;
mod loader;
pub mod markdown;
mod package;
mod report;
pub mod rules;
mod validator;

pub use config::{SizeThresholds, ValidatorConfig};
pub use error::{FrontmatterError, SkillError};
pub use issue::{RuleId, Severity, ValidationIssue};
pub use loader::{SkillLoader, ensure_directory};
pub use package::{
    ASSETS_DIR, MarkdownFile, REFERENCES_DIR, SCRIPTS_DIR, SKILL_MD, SkillPackage,
};
pub use report::{RunSummary, ValidationReport, aggregate};
pub use rules::{Rule, RuleSet};
pub use validator::{SkillOutcome, Validator};
