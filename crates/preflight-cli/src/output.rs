//! Console rendering of validation reports.

use std::io::{self, Write};

use preflight_core::{Aggregator, CheckKind, Severity, ValidationReport};

const RULE_WIDTH: usize = 50;

fn marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Pass => "✅",
        Severity::Warning => "⚠️ ",
        Severity::Error => "❌",
    }
}

/// Human-readable report: findings grouped by check, then the verdict.
pub fn render_text(report: &ValidationReport, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "🔍 Validating {} setup...", report.profile)?;

    let mut current: Option<CheckKind> = None;
    for finding in &report.findings {
        if current != Some(finding.check) {
            writeln!(out)?;
            writeln!(out, "📋 {}...", finding.check.heading())?;
            current = Some(finding.check);
        }
        writeln!(out, "   {} {}", marker(finding.severity), finding.message)?;
    }

    let aggregator = Aggregator::new();
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    let verdict = if report.passed() { "✅" } else { "❌" };
    writeln!(out, "{} {}", verdict, aggregator.headline(report))?;
    writeln!(out)?;

    if !report.result.errors.is_empty() {
        writeln!(out, "Errors:")?;
        for error in &report.result.errors {
            writeln!(out, "   {} {}", marker(Severity::Error), error)?;
        }
        writeln!(out)?;
    }

    if !report.result.warnings.is_empty() {
        writeln!(out, "Warnings:")?;
        for warning in &report.result.warnings {
            writeln!(out, "   {} {}", marker(Severity::Warning), warning)?;
        }
        writeln!(out)?;
    }

    if !report.troubleshooting.is_empty() {
        writeln!(out, "💡 Troubleshooting:")?;
        for tip in &report.troubleshooting {
            writeln!(out, "   • {}", tip)?;
        }
    }

    Ok(())
}

/// Machine-readable report.
pub fn render_json(report: &ValidationReport, out: &mut impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use preflight_core::profile::builtin;
    use preflight_core::validate_offline;
    use std::fs;

    fn render(report: &ValidationReport) -> String {
        let mut buf = Vec::new();
        render_text(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_failed_report_lists_errors_and_tips() {
        let dir = tempfile::tempdir().unwrap();
        let profile = builtin("neon-auth").unwrap();
        let report = validate_offline(&profile, dir.path());

        let text = render(&report);
        assert!(text.starts_with("🔍 Validating Neon Auth setup..."));
        assert!(text.contains("📋 Checking environment variables..."));
        assert!(text.contains("❌ Neon Auth setup validation FAILED"));
        assert!(text.contains("Errors:\n   ❌ No .env.local or .env file found"));
        assert!(text.contains("💡 Troubleshooting:"));
    }

    #[test]
    fn test_passed_report_has_no_tips() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join(".env.local"),
            "NEON_AUTH_BASE_URL=https://ep-abc.neonauth.us-east-1.aws.neon.build/mydb/auth\n",
        )
        .unwrap();
        fs::create_dir_all(root.join("app/api/auth/[...path]")).unwrap();
        fs::write(root.join("app/api/auth/[...path]/route.ts"), "").unwrap();
        fs::write(
            root.join("package.json"),
            r#"{ "dependencies": { "@neondatabase/auth": "1.0.0" } }"#,
        )
        .unwrap();

        let profile = builtin("neon-auth").unwrap();
        let report = validate_offline(&profile, root);
        let text = render(&report);

        assert!(text.contains("✅ Neon Auth setup validation PASSED"));
        assert!(text.contains("Warnings:"));
        assert!(!text.contains("Troubleshooting"));
    }

    #[test]
    fn test_json_round_trips_result() {
        let dir = tempfile::tempdir().unwrap();
        let profile = builtin("neon-js").unwrap();
        let report = validate_offline(&profile, dir.path());

        let mut buf = Vec::new();
        render_json(&report, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["profile"], "Neon JS SDK");
        assert_eq!(value["result"]["passed"], false);
        assert_eq!(value["findings"][0]["check"], "environment");
    }
}
