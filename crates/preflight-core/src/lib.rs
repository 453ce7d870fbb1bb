//! # preflight-core
//!
//! Deterministic setup validation and eval scoring for the Neon plugin.
//!
//! This crate answers, without touching the network:
//! - Is the project's environment configured for the integration?
//! - Do the configured URLs look like real endpoints?
//! - Are the expected files and packages in place?
//! - How did an agent run score against the plugin's evals?
//!
//! ## Key Guarantees
//!
//! 1. **Never aborts**: every problem becomes an error or warning finding
//! 2. **Ordered**: findings follow check order, so reports are stable
//! 3. **Traceable**: every finding cites the file, key or request it came from
//!
//! Probing endpoints over HTTP lives in `preflight-runtime`; this crate only
//! classifies probe outcomes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use preflight_core::{profile, validate_offline};
//!
//! let profile = profile::builtin("neon-auth")?;
//! let report = validate_offline(&profile, "./my-app");
//! std::process::exit(report.result.exit_code());
//! ```

pub mod checks;
pub mod env;
pub mod eval;
pub mod evidence;
pub mod probe;
pub mod profile;
pub mod report;
pub mod types;
pub mod validator;

// Re-export main types at crate root
pub use checks::{Check, CheckContext, ConfiguredEndpoint, EnvState};
pub use env::{EnvError, EnvSnapshot};
pub use evidence::{Evidence, EvidenceSource};
pub use probe::{classify, ProbeOutcome};
pub use profile::{EndpointSpec, ProfileError, ValidationProfile};
pub use report::Aggregator;
pub use types::{CheckKind, Finding, Severity, ValidationReport, ValidationResult};
pub use validator::{Inspection, Validator};

use std::path::Path;

/// Validate a project with every static check and no connectivity probes.
pub fn validate_offline(profile: &ValidationProfile, root: impl AsRef<Path>) -> ValidationReport {
    Validator::new(profile, root.as_ref()).validate_offline()
}
