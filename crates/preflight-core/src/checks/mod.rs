//! The static checks of a validation run.
//!
//! Each check looks at one aspect of the project and reports findings. Checks
//! are independent: none reads another's findings and none aborts the run.
//!
//! - **Environment**: env file present, required keys set, companions set
//! - **UrlFormat**: configured URLs match their expected shape
//! - **ProjectFile**: expected files exist
//! - **Package**: expected packages are declared in the manifest
//!
//! Connectivity is not a static check; see [`crate::probe`].

mod environment;
mod files;
mod packages;
pub(crate) mod patterns;
mod url_format;

pub use environment::EnvironmentCheck;
pub use files::ProjectFileCheck;
pub use packages::PackageCheck;
pub use url_format::UrlFormatCheck;

use std::path::Path;

use crate::env::EnvSnapshot;
use crate::profile::{EndpointSpec, ValidationProfile};
use crate::types::{CheckKind, Finding};

/// Outcome of looking for the environment file.
#[derive(Debug, Clone)]
pub enum EnvState {
    Loaded(EnvSnapshot),
    Missing,
    Unreadable(String),
}

impl EnvState {
    pub fn snapshot(&self) -> Option<&EnvSnapshot> {
        match self {
            EnvState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// An endpoint whose URL was found in the environment file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredEndpoint {
    pub spec: EndpointSpec,
    pub url: String,
}

impl ConfiguredEndpoint {
    pub fn probe_url(&self) -> String {
        self.spec.probe_url(&self.url)
    }
}

/// Everything a check may look at.
pub struct CheckContext<'a> {
    pub profile: &'a ValidationProfile,
    pub root: &'a Path,
    pub env: &'a EnvState,
}

impl<'a> CheckContext<'a> {
    /// Endpoints whose required key has a value, in profile order.
    pub fn configured_endpoints(&self) -> Vec<ConfiguredEndpoint> {
        let Some(snapshot) = self.env.snapshot() else {
            return Vec::new();
        };

        self.profile
            .endpoints
            .iter()
            .filter_map(|spec| {
                snapshot.get(&spec.key).map(|url| ConfiguredEndpoint {
                    spec: spec.clone(),
                    url: url.to_string(),
                })
            })
            .collect()
    }
}

/// Trait for all static checks.
pub trait Check {
    /// The family this check reports under.
    fn kind(&self) -> CheckKind;

    /// Inspect the project and report findings.
    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding>;
}

/// Checks that run before the connectivity probes.
pub fn configuration_checks() -> Vec<Box<dyn Check>> {
    vec![Box::new(EnvironmentCheck::new()), Box::new(UrlFormatCheck::new())]
}

/// Checks that run after the connectivity probes.
pub fn project_checks() -> Vec<Box<dyn Check>> {
    vec![Box::new(ProjectFileCheck::new()), Box::new(PackageCheck::new())]
}
