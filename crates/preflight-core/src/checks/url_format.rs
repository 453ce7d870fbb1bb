//! URL Format Check
//!
//! Does each configured URL have the shape its service hands out?
//!
//! A mismatch is only ever a warning: an unconventional URL may still work,
//! and the probe that follows is the real test.

use tracing::debug;

use crate::evidence::Evidence;
use crate::types::{CheckKind, Finding};

use super::{Check, CheckContext};

/// Checks configured URLs against each endpoint's strict pattern.
pub struct UrlFormatCheck;

impl UrlFormatCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UrlFormatCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for UrlFormatCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::UrlFormat
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let env_file = ctx
            .env
            .snapshot()
            .map(|s| s.file_name().to_string())
            .unwrap_or_default();

        ctx.configured_endpoints()
            .into_iter()
            .map(|endpoint| {
                let spec = &endpoint.spec;
                let evidence = Evidence::from_env(&env_file, &spec.key);

                let regex = match spec.url_regex() {
                    Ok(regex) => regex,
                    Err(e) => {
                        return Finding::warning(
                            self.kind(),
                            format!("Could not check {} URL format: {}", spec.label, e),
                            evidence,
                        );
                    }
                };

                if regex.is_match(&endpoint.url) {
                    debug!(key = %spec.key, "URL matches expected format");
                    return Finding::pass(
                        self.kind(),
                        format!("{} URL format is valid", spec.title()),
                        evidence,
                    );
                }

                let near_miss = spec
                    .domain_marker
                    .as_deref()
                    .is_some_and(|marker| endpoint.url.contains(marker));

                let message = if near_miss {
                    format!(
                        "{} URL appears non-standard. Expected format: {}",
                        spec.title(),
                        spec.expected_format
                    )
                } else {
                    format!(
                        "{} URL may be incorrect. Expected format: {}",
                        spec.title(),
                        spec.expected_format
                    )
                };
                Finding::warning(self.kind(), message, evidence)
            })
            .collect()
    }
}
