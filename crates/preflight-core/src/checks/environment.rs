//! Environment Check
//!
//! Is there an environment file, and does it set every key the profile needs?

use tracing::debug;

use crate::evidence::Evidence;
use crate::types::{CheckKind, Finding};

use super::{Check, CheckContext, EnvState};

/// Checks the environment file and its keys.
pub struct EnvironmentCheck;

impl EnvironmentCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvironmentCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for EnvironmentCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Environment
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let snapshot = match ctx.env {
            EnvState::Loaded(snapshot) => snapshot,
            EnvState::Missing => {
                return vec![Finding::error(
                    self.kind(),
                    ctx.profile.missing_env_message(),
                    Evidence::from_path(ctx.profile.env_files.join(", ")),
                )];
            }
            EnvState::Unreadable(message) => {
                return vec![Finding::error(
                    self.kind(),
                    message.clone(),
                    Evidence::from_path(ctx.profile.env_files.join(", ")),
                )];
            }
        };

        let file = snapshot.file_name();
        debug!(file, keys = snapshot.len(), "Checking environment keys");

        let mut findings = Vec::new();
        for endpoint in &ctx.profile.endpoints {
            let evidence = Evidence::from_env(file, &endpoint.key);
            if snapshot.get(&endpoint.key).is_some() {
                findings.push(Finding::pass(
                    self.kind(),
                    format!("{} found in {}", endpoint.key, file),
                    evidence,
                ));
            } else {
                findings.push(Finding::error(
                    self.kind(),
                    format!("{} not found in {}", endpoint.key, file),
                    evidence,
                ));
            }

            let Some(companion) = endpoint.companion_key.as_deref() else {
                continue;
            };
            let evidence = Evidence::from_env(file, companion);
            if snapshot.get(companion).is_some() {
                findings.push(Finding::pass(
                    self.kind(),
                    format!("{} found in {}", companion, file),
                    evidence,
                ));
            } else {
                let message = match endpoint.companion_hint.as_deref() {
                    Some(hint) => format!("{} not found - {}", companion, hint),
                    None => format!("{} not found in {}", companion, file),
                };
                findings.push(Finding::warning(self.kind(), message, evidence));
            }
        }

        findings
    }
}
