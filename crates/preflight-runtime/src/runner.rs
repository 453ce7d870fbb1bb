//! Async validation runner.
//!
//! Sequences one validation run: static checks, then one probe per configured
//! endpoint, awaited one at a time in profile order, then the report.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use preflight_core::{classify, Severity, ValidationProfile, ValidationReport, Validator};

use crate::probe::EndpointProbe;

/// Runs validation with live connectivity probes.
pub struct SetupRunner {
    probe: Arc<dyn EndpointProbe>,
}

impl SetupRunner {
    pub fn new(probe: Arc<dyn EndpointProbe>) -> Self {
        Self { probe }
    }

    /// Validate a project. Never fails; problems are findings.
    pub async fn run(&self, profile: &ValidationProfile, root: &Path) -> ValidationReport {
        let inspection = Validator::new(profile, root).inspect();

        let mut probe_findings = Vec::with_capacity(inspection.endpoints().len());
        for endpoint in inspection.endpoints() {
            let url = endpoint.probe_url();
            info!(
                endpoint = %endpoint.spec.label,
                url = %url,
                probe = self.probe.name(),
                "Probing endpoint"
            );

            let outcome = self.probe.probe(&url).await;
            let finding = classify(endpoint, &outcome);

            match finding.severity {
                Severity::Pass => {}
                Severity::Warning | Severity::Error => warn!(
                    endpoint = %endpoint.spec.label,
                    severity = ?finding.severity,
                    message = %finding.message,
                    "Endpoint probe did not pass"
                ),
            }

            probe_findings.push(finding);
        }

        let report = inspection.finish(probe_findings);
        info!(
            profile = %report.profile,
            passed = report.passed(),
            errors = report.result.errors.len(),
            warnings = report.result.warnings.len(),
            "Validation finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use preflight_core::profile::builtin;
    use preflight_core::{CheckKind, ProbeOutcome};
    use std::fs;
    use std::sync::Mutex;

    /// Answers every probe with the same outcome and records the URLs.
    struct FakeProbe {
        outcome: ProbeOutcome,
        seen: Mutex<Vec<String>>,
    }

    impl FakeProbe {
        fn new(outcome: ProbeOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl EndpointProbe for FakeProbe {
        async fn probe(&self, url: &str) -> ProbeOutcome {
            self.seen.lock().unwrap().push(url.to_string());
            self.outcome.clone()
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn sdk_project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join(".env.local"),
            "NEON_AUTH_BASE_URL=https://ep-abc.neonauth.us-east-1.aws.neon.build/mydb/auth\n\
             NEXT_PUBLIC_NEON_AUTH_URL=https://ep-abc.neonauth.us-east-1.aws.neon.build/mydb/auth\n\
             NEON_DATA_API_URL=https://ep-abc.apirest.us-east-1.aws.neon.build/mydb/rest/v1\n",
        )
        .unwrap();
        fs::create_dir_all(root.join("app/api/auth/[...path]")).unwrap();
        fs::write(root.join("app/api/auth/[...path]/route.ts"), "").unwrap();
        fs::create_dir_all(root.join("lib/db")).unwrap();
        fs::write(root.join("lib/db/client.ts"), "").unwrap();
        fs::write(
            root.join("package.json"),
            r#"{ "devDependencies": { "@neondatabase/neon-js": "^0.1.0" } }"#,
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn test_probes_each_endpoint_in_order() {
        let dir = sdk_project();
        let profile = builtin("neon-js").unwrap();
        let probe = FakeProbe::new(ProbeOutcome::Status(401));

        let report = SetupRunner::new(probe.clone()).run(&profile, dir.path()).await;

        assert!(report.passed());
        assert!(report.result.warnings.is_empty(), "{:?}", report.result.warnings);
        assert_eq!(
            *probe.seen.lock().unwrap(),
            vec![
                "https://ep-abc.neonauth.us-east-1.aws.neon.build/mydb/auth/session".to_string(),
                "https://ep-abc.apirest.us-east-1.aws.neon.build/mydb/rest/v1".to_string(),
            ]
        );
        assert_eq!(report.findings_for(CheckKind::Connectivity).count(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_endpoints_fail_the_run() {
        let dir = sdk_project();
        let profile = builtin("neon-js").unwrap();
        let probe = FakeProbe::new(ProbeOutcome::Unreachable("dns error".to_string()));

        let report = SetupRunner::new(probe).run(&profile, dir.path()).await;

        assert!(!report.passed());
        assert_eq!(
            report.result.errors,
            vec![
                "Cannot connect to auth endpoint: dns error",
                "Cannot connect to data API endpoint: dns error",
            ]
        );
    }

    #[tokio::test]
    async fn test_no_probe_without_configured_url() {
        let dir = tempfile::tempdir().unwrap();
        let profile = builtin("neon-auth").unwrap();
        let probe = FakeProbe::new(ProbeOutcome::Status(200));

        let report = SetupRunner::new(probe.clone()).run(&profile, dir.path()).await;

        assert!(!report.passed());
        assert!(probe.seen.lock().unwrap().is_empty());
    }
}
