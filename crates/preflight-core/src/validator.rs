//! The validation procedure, split around the network step.
//!
//! [`Validator::inspect`] runs every static check. The caller then probes the
//! endpoints the inspection found (or skips them) and hands the probe
//! findings to [`Inspection::finish`], which restores check order:
//! environment, URL format, connectivity, project files, packages.

use std::path::PathBuf;
use tracing::debug;

use crate::checks::{
    configuration_checks, project_checks, CheckContext, ConfiguredEndpoint, EnvState,
};
use crate::env::EnvSnapshot;
use crate::probe::{classify, ProbeOutcome};
use crate::profile::ValidationProfile;
use crate::report::Aggregator;
use crate::types::{Finding, ValidationReport};

/// Runs a profile's static checks against a project directory.
pub struct Validator<'a> {
    profile: &'a ValidationProfile,
    root: PathBuf,
}

impl<'a> Validator<'a> {
    pub fn new(profile: &'a ValidationProfile, root: impl Into<PathBuf>) -> Self {
        Self {
            profile,
            root: root.into(),
        }
    }

    /// Run all static checks. Never fails; problems become findings.
    pub fn inspect(&self) -> Inspection<'a> {
        let env = match EnvSnapshot::locate(&self.root, &self.profile.env_files) {
            Ok(Some(snapshot)) => {
                debug!(
                    path = %snapshot.path().display(),
                    keys = snapshot.len(),
                    "Loaded environment file"
                );
                EnvState::Loaded(snapshot)
            }
            Ok(None) => EnvState::Missing,
            Err(e) => EnvState::Unreadable(e.to_string()),
        };

        let ctx = CheckContext {
            profile: self.profile,
            root: &self.root,
            env: &env,
        };

        let configuration: Vec<Finding> = configuration_checks()
            .iter()
            .flat_map(|check| {
                debug!(check = %check.kind(), "Running check");
                check.run(&ctx)
            })
            .collect();

        let project: Vec<Finding> = project_checks()
            .iter()
            .flat_map(|check| {
                debug!(check = %check.kind(), "Running check");
                check.run(&ctx)
            })
            .collect();

        let endpoints = ctx.configured_endpoints();
        let env_file = env.snapshot().map(|s| s.file_name().to_string());

        Inspection {
            profile: self.profile,
            root: self.root.clone(),
            env_file,
            configuration,
            endpoints,
            project,
        }
    }

    /// Validate with a synchronous probe function.
    ///
    /// Useful for callers that already have outcomes or do not need async.
    pub fn validate_with<F>(&self, mut probe: F) -> ValidationReport
    where
        F: FnMut(&ConfiguredEndpoint) -> ProbeOutcome,
    {
        let inspection = self.inspect();
        let probes = inspection
            .endpoints()
            .iter()
            .map(|endpoint| classify(endpoint, &probe(endpoint)))
            .collect();
        inspection.finish(probes)
    }

    /// Validate without any network access.
    pub fn validate_offline(&self) -> ValidationReport {
        self.inspect().finish(Vec::new())
    }
}

/// Static findings of a run, waiting for connectivity results.
#[derive(Debug, Clone)]
pub struct Inspection<'a> {
    profile: &'a ValidationProfile,
    root: PathBuf,
    env_file: Option<String>,
    configuration: Vec<Finding>,
    endpoints: Vec<ConfiguredEndpoint>,
    project: Vec<Finding>,
}

impl<'a> Inspection<'a> {
    /// Endpoints with a configured URL, in profile order. One probe each.
    pub fn endpoints(&self) -> &[ConfiguredEndpoint] {
        &self.endpoints
    }

    pub fn env_file(&self) -> Option<&str> {
        self.env_file.as_deref()
    }

    /// Merge connectivity findings and aggregate the report.
    pub fn finish(self, probe_findings: Vec<Finding>) -> ValidationReport {
        let findings = self
            .configuration
            .into_iter()
            .chain(probe_findings)
            .chain(self.project)
            .collect();

        Aggregator::new().aggregate(self.profile, &self.root, self.env_file, findings)
    }
}
