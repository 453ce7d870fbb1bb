//! Reachability probe outcomes and their classification.
//!
//! The network call itself lives in `preflight-runtime`; this module only
//! turns what happened into a finding, so the policy stays deterministic:
//!
//! | Outcome | Severity |
//! |---|---|
//! | 2xx or a status in `healthy_statuses` | pass |
//! | any other status | warning |
//! | DNS failure, connection refused | error |
//! | anything else (timeout, TLS, bad URL) | warning |

use serde::{Deserialize, Serialize};

use crate::checks::ConfiguredEndpoint;
use crate::evidence::Evidence;
use crate::types::{CheckKind, Finding};

/// What a single GET against an endpoint produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The server answered with this status.
    Status(u16),

    /// The host could not be resolved or refused the connection.
    Unreachable(String),

    /// The request failed in a way that proves nothing either way.
    Inconclusive(String),
}

/// Classify a probe outcome for a configured endpoint.
pub fn classify(endpoint: &ConfiguredEndpoint, outcome: &ProbeOutcome) -> Finding {
    let spec = &endpoint.spec;
    let evidence = Evidence::from_request(&endpoint.probe_url());

    match outcome {
        ProbeOutcome::Status(status) if spec.is_healthy_status(*status) => Finding::pass(
            CheckKind::Connectivity,
            format!("{} endpoint is reachable", spec.title()),
            evidence,
        ),
        ProbeOutcome::Status(status) => Finding::warning(
            CheckKind::Connectivity,
            format!("{} endpoint returned status {}", spec.title(), status),
            evidence,
        ),
        ProbeOutcome::Unreachable(message) => Finding::error(
            CheckKind::Connectivity,
            format!("Cannot connect to {} endpoint: {}", spec.label, message),
            evidence,
        ),
        ProbeOutcome::Inconclusive(message) => Finding::warning(
            CheckKind::Connectivity,
            format!("Could not verify {} endpoint: {}", spec.label, message),
            evidence,
        ),
    }
}
