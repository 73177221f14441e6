//! Command-line front end for the skill validator.
//!
//! # Usage
//!
//! Run from the repository that holds the skills, not from this workspace,
//! whose own `skills/` directory is the library crate.
//!
//! ```bash
//! # Validate every skill under ./skills
//! validate-skills
//!
//! # Validate specific skills, failing on warnings too
//! validate-skills skills/pdf-tools skills/web-search --strict
//!
//! # Another collection, custom thresholds, machine-readable output
//! validate-skills --skills-dir ../agent-skills --config skillcheck.json --format json
//! ```
//!
//! Exit code is 0 when every skill passes and 1 otherwise, including when a
//! target path is missing.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use skillcheck_skills::{
    RunSummary, SkillLoader, SkillOutcome, Validator, ValidatorConfig, ensure_directory,
};
use tracing::{debug, error};

/// Validate Agent Skill packages.
#[derive(Parser, Debug, Clone)]
#[command(name = "validate-skills", version, about)]
pub struct Args {
    /// Skill directories to validate. Defaults to every skill under `--skills-dir`.
    pub paths: Vec<PathBuf>,

    /// Directory whose subdirectories are skills, relative to the working
    /// directory.
    #[arg(long, default_value = "skills")]
    pub skills_dir: PathBuf,

    /// Path to a validator configuration file (JSON).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Treat warnings as failures.
    #[arg(long)]
    pub strict: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    pub verbose: bool,
}

/// How the run summary is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One block per skill followed by a totals line.
    Text,
    /// The run summary as pretty-printed JSON.
    Json,
}

/// Rendered result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Report to print on stdout.
    pub output: String,
    /// Whether every skill passed.
    pub success: bool,
}

/// Load the configuration named by `args`, applying command-line overrides.
///
/// # Errors
///
/// Returns an error if the configuration file can't be read or parsed.
pub async fn load_config(args: &Args) -> Result<ValidatorConfig> {
    let config = match &args.config {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read config from {}", path.display()))?;
            ValidatorConfig::from_json(&json)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => ValidatorConfig::default(),
    };
    let strict = config.strict || args.strict;
    Ok(config.strict(strict))
}

/// Resolve the skill directories to validate.
///
/// # Errors
///
/// Returns an error if an explicit path, or the skills directory when no
/// paths are given, is missing or not a directory.
pub async fn resolve_targets(args: &Args) -> Result<Vec<PathBuf>> {
    if args.paths.is_empty() {
        return SkillLoader::new()
            .add_path(&args.skills_dir)
            .discover()
            .await
            .with_context(|| format!("failed to list skills in {}", args.skills_dir.display()));
    }

    for path in &args.paths {
        ensure_directory(path).await?;
    }
    Ok(args.paths.clone())
}

/// Validate every target concurrently, one task per skill.
///
/// A task that panics is reported as an unreadable skill; the other skills
/// are unaffected.
pub async fn validate_all(validator: Arc<Validator>, targets: Vec<PathBuf>) -> RunSummary {
    let handles: Vec<_> = targets
        .into_iter()
        .map(|dir| {
            let validator = Arc::clone(&validator);
            let task_dir = dir.clone();
            let handle = tokio::spawn(async move { validator.validate_dir(&task_dir).await });
            (dir, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (dir, handle) in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                error!(dir = %dir.display(), error = %err, "validation task failed");
                outcomes.push(SkillOutcome::unreadable(
                    &dir,
                    &dir,
                    format!("validation did not complete: {err}"),
                ));
            }
        }
    }

    validator.summarize(outcomes)
}

/// Run the validator as described by `args`.
///
/// # Errors
///
/// Returns an error for fatal conditions: an unreadable or invalid
/// configuration, or a missing target.
pub async fn run(args: &Args) -> Result<Outcome> {
    let validator = Arc::new(Validator::new(load_config(args).await?));
    let targets = resolve_targets(args).await?;
    debug!(
        targets = targets.len(),
        strict = validator.config().strict,
        "starting validation"
    );

    let summary = validate_all(validator, targets).await;
    let output = match args.format {
        OutputFormat::Text => summary.to_string(),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&summary)
                .context("failed to serialize report")?;
            json.push('\n');
            json
        }
    };

    Ok(Outcome {
        output,
        success: summary.is_success(),
    })
}
