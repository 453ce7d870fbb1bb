//! Aggregator: folds findings into the final report.
//!
//! The policy is fixed:
//! 1. Any ERROR finding → `passed = false`
//! 2. Warnings are listed but never change `passed`
//! 3. Pass lines are kept for display only

use chrono::Utc;
use std::path::Path;

use crate::profile::ValidationProfile;
use crate::types::{Finding, ValidationReport, ValidationResult};

/// The Aggregator builds a [`ValidationReport`] from ordered findings.
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Build the report for one run.
    ///
    /// Findings must already be in check order; their order is preserved in
    /// `errors` and `warnings`.
    pub fn aggregate(
        &self,
        profile: &ValidationProfile,
        project_dir: &Path,
        env_file: Option<String>,
        findings: Vec<Finding>,
    ) -> ValidationReport {
        let result = ValidationResult::from_findings(&findings);

        let troubleshooting = if result.passed {
            Vec::new()
        } else {
            profile.troubleshooting.clone()
        };

        ValidationReport {
            profile: profile.name.clone(),
            project_dir: project_dir.display().to_string(),
            env_file,
            findings,
            result,
            troubleshooting,
            validated_at: Utc::now(),
        }
    }

    /// One-line verdict for the report.
    pub fn headline(&self, report: &ValidationReport) -> String {
        let verdict = if report.passed() { "PASSED" } else { "FAILED" };
        format!("{} setup validation {}", report.profile, verdict)
    }

    /// Counts line, e.g. "2 errors, 1 warning".
    pub fn counts(&self, report: &ValidationReport) -> String {
        let errors = report.result.errors.len();
        let warnings = report.result.warnings.len();
        format!(
            "{} error{}, {} warning{}",
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" }
        )
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
