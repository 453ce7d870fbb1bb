//! Endpoint probe abstractions.
//!
//! A probe performs the one GET that proves an endpoint exists. It never
//! fails: every transport problem is folded into a [`ProbeOutcome`], which
//! `preflight-core` classifies into a finding.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use preflight_core::ProbeOutcome;

mod http;

pub use http::HttpProbe;

/// Errors from building a probe.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Whole-request timeout used unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for probes.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Whole-request timeout. Always finite.
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProbeConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Probe abstraction allows swapping the network layer in tests.
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    /// GET the URL once and report what happened.
    async fn probe(&self, url: &str) -> ProbeOutcome;

    /// Probe name for logs.
    fn name(&self) -> &str;
}
