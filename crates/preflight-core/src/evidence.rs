//! Evidence linking for validation findings.
//!
//! Every finding points at the thing it is about: a key in the environment
//! file, a path in the project, a manifest section, or a probed URL.

use serde::{Deserialize, Serialize};

/// Where a piece of evidence comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    EnvFile,
    Filesystem,
    Manifest,
    Network,
}

/// A pointer supporting a finding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evidence {
    /// Where the evidence comes from
    pub source: EvidenceSource,

    /// Pointer to the location (e.g., ".env.local#NEON_AUTH_BASE_URL")
    pub pointer: String,
}

impl Evidence {
    /// Evidence for a key inside an environment file.
    pub fn from_env(file: &str, key: &str) -> Self {
        Self {
            source: EvidenceSource::EnvFile,
            pointer: format!("{}#{}", file, key),
        }
    }

    /// Evidence for a project-relative path.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            source: EvidenceSource::Filesystem,
            pointer: path.into(),
        }
    }

    /// Evidence for a section of the dependency manifest.
    pub fn from_manifest(file: &str, section: &str) -> Self {
        Self {
            source: EvidenceSource::Manifest,
            pointer: format!("{}#{}", file, section),
        }
    }

    /// Evidence for an HTTP request.
    pub fn from_request(url: &str) -> Self {
        Self {
            source: EvidenceSource::Network,
            pointer: format!("GET {}", url),
        }
    }
}
