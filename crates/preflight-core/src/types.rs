//! Core types shared by checks, the aggregator and the runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::evidence::Evidence;

/// How much a finding matters to the overall result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational success line ("found", "reachable").
    Pass,

    /// Advisory; never affects `passed`.
    Warning,

    /// Blocks the overall pass.
    Error,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

/// The family of check that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Environment file presence and configuration keys.
    Environment,

    /// Structural shape of configured URLs.
    UrlFormat,

    /// HTTP reachability of configured endpoints.
    Connectivity,

    /// Expected files in the project tree.
    ProjectFile,

    /// Dependency manifest membership.
    Package,
}

impl CheckKind {
    /// Heading used when printing findings grouped by check.
    pub fn heading(&self) -> &'static str {
        match self {
            CheckKind::Environment => "Checking environment variables",
            CheckKind::UrlFormat => "Validating URL formats",
            CheckKind::Connectivity => "Testing endpoint connectivity",
            CheckKind::ProjectFile => "Checking project structure",
            CheckKind::Package => "Checking installed packages",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckKind::Environment => "environment",
            CheckKind::UrlFormat => "url_format",
            CheckKind::Connectivity => "connectivity",
            CheckKind::ProjectFile => "project_file",
            CheckKind::Package => "package",
        };
        f.write_str(name)
    }
}

/// One observation made by a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub check: CheckKind,
    pub severity: Severity,
    pub message: String,
    pub evidence: Evidence,
}

impl Finding {
    pub fn pass(check: CheckKind, message: impl Into<String>, evidence: Evidence) -> Self {
        Self {
            check,
            severity: Severity::Pass,
            message: message.into(),
            evidence,
        }
    }

    pub fn warning(check: CheckKind, message: impl Into<String>, evidence: Evidence) -> Self {
        Self {
            check,
            severity: Severity::Warning,
            message: message.into(),
            evidence,
        }
    }

    pub fn error(check: CheckKind, message: impl Into<String>, evidence: Evidence) -> Self {
        Self {
            check,
            severity: Severity::Error,
            message: message.into(),
            evidence,
        }
    }
}

/// The externally visible verdict of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Derive the verdict from findings, preserving their order.
    pub fn from_findings(findings: &[Finding]) -> Self {
        let errors: Vec<String> = findings
            .iter()
            .filter(|f| f.severity.is_error())
            .map(|f| f.message.clone())
            .collect();
        let warnings = findings
            .iter()
            .filter(|f| f.severity.is_warning())
            .map(|f| f.message.clone())
            .collect();

        Self {
            passed: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Process exit code for automation callers.
    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }
}

/// Full record of a validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Display name of the profile that was checked
    pub profile: String,

    /// Directory the run inspected
    pub project_dir: String,

    /// The environment file that was read, if any
    pub env_file: Option<String>,

    /// Every finding, in check order
    pub findings: Vec<Finding>,

    /// Verdict derived from `findings`
    pub result: ValidationResult,

    /// Tips shown when the run fails
    #[serde(default)]
    pub troubleshooting: Vec<String>,

    pub validated_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.result.passed
    }

    /// Findings produced by one check family.
    pub fn findings_for(&self, check: CheckKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.check == check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity, message: &str) -> Finding {
        Finding {
            check: CheckKind::Environment,
            severity,
            message: message.to_string(),
            evidence: Evidence::from_path("test"),
        }
    }

    #[test]
    fn test_result_ignores_pass_lines() {
        let findings = vec![
            finding(Severity::Pass, "found"),
            finding(Severity::Warning, "w1"),
            finding(Severity::Error, "e1"),
            finding(Severity::Warning, "w2"),
        ];

        let result = ValidationResult::from_findings(&findings);
        assert!(!result.passed);
        assert_eq!(result.errors, vec!["e1"]);
        assert_eq!(result.warnings, vec!["w1", "w2"]);
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn test_warnings_never_fail() {
        let findings = vec![finding(Severity::Warning, "only a warning")];
        let result = ValidationResult::from_findings(&findings);
        assert!(result.passed);
        assert_eq!(result.exit_code(), 0);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
