//! reqwest-backed probe.

use async_trait::async_trait;
use std::error::Error as StdError;
use std::io;

use preflight_core::ProbeOutcome;

use super::{EndpointProbe, ProbeConfig, ProbeError};

/// Probes endpoints with a plain HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProbeError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl EndpointProbe for HttpProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await;

        match response {
            Ok(response) => ProbeOutcome::Status(response.status().as_u16()),
            Err(e) => classify_error(&e),
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Unresolvable hosts and refused connections mean nothing is listening.
/// Everything else (timeouts, TLS, malformed URLs) is inconclusive.
fn classify_error(error: &reqwest::Error) -> ProbeOutcome {
    let detail = root_cause(error);

    if error.is_connect() && (is_refused(error) || is_dns_failure(error)) {
        ProbeOutcome::Unreachable(detail)
    } else {
        ProbeOutcome::Inconclusive(detail)
    }
}

fn chain(error: &reqwest::Error) -> impl Iterator<Item = &(dyn StdError + 'static)> {
    let mut next: Option<&(dyn StdError + 'static)> = Some(error);
    std::iter::from_fn(move || {
        let current = next?;
        next = current.source();
        Some(current)
    })
}

fn root_cause(error: &reqwest::Error) -> String {
    chain(error)
        .last()
        .map(|e| e.to_string())
        .unwrap_or_else(|| error.to_string())
}

fn is_refused(error: &reqwest::Error) -> bool {
    chain(error).any(|e| {
        e.downcast_ref::<io::Error>()
            .is_some_and(|io| io.kind() == io::ErrorKind::ConnectionRefused)
    })
}

fn is_dns_failure(error: &reqwest::Error) -> bool {
    chain(error).any(|e| {
        let message = e.to_string();
        message.contains("dns error") || message.contains("failed to lookup address")
    })
}
