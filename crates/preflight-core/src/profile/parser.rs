//! Profile parsing from YAML/JSON.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_profile_schema;

/// Errors that can occur when loading profiles.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read profile file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Profile does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Invalid url_pattern for {key}: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("Profile validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown profile '{name}'. Available: {available}")]
    Unknown { name: String, available: String },
}

/// A configured endpoint: the env key that holds its URL, how the URL should
/// look, and how to probe it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointSpec {
    /// Required environment key holding the base URL
    pub key: String,

    /// Short name used in messages ("auth", "data API")
    pub label: String,

    /// Optional client-facing variant of `key`; absence is a warning
    #[serde(default)]
    pub companion_key: Option<String>,

    /// Consequence appended to the companion warning
    #[serde(default)]
    pub companion_hint: Option<String>,

    /// Strict structural pattern for the URL
    pub url_pattern: String,

    /// Substring a non-standard but plausible URL still carries
    #[serde(default)]
    pub domain_marker: Option<String>,

    /// Human-readable form of `url_pattern`
    pub expected_format: String,

    /// Sub-path appended to the URL for the reachability probe
    #[serde(default)]
    pub probe_path: String,

    /// Non-2xx statuses that still mean "endpoint exists"
    #[serde(default)]
    pub healthy_statuses: Vec<u16>,
}

impl EndpointSpec {
    /// Compile the strict URL pattern.
    pub fn url_regex(&self) -> Result<Regex, ProfileError> {
        Regex::new(&self.url_pattern).map_err(|source| ProfileError::InvalidPattern {
            key: self.key.clone(),
            source,
        })
    }

    /// URL that the reachability probe requests for a configured base URL.
    pub fn probe_url(&self, base_url: &str) -> String {
        if self.probe_path.is_empty() {
            return base_url.to_string();
        }
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.probe_path.trim_start_matches('/')
        )
    }

    /// Whether an HTTP status means the endpoint is present and healthy.
    pub fn is_healthy_status(&self, status: u16) -> bool {
        (200..300).contains(&status) || self.healthy_statuses.contains(&status)
    }

    /// Label with the first letter capitalised, for sentence starts.
    pub fn title(&self) -> String {
        let mut chars = self.label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A file the project is expected to contain at one of several locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRequirement {
    /// What the file is ("API route handler")
    pub description: String,

    /// Candidate project-relative paths, first match wins
    pub paths: Vec<String>,

    /// Structurally required (error) or conventional (warning)
    #[serde(default = "default_true")]
    pub required: bool,
}

/// A dependency requirement satisfied by any one of several packages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageRequirement {
    pub any_of: Vec<String>,
}

fn default_env_files() -> Vec<String> {
    vec![".env.local".to_string(), ".env".to_string()]
}

fn default_manifest() -> String {
    "package.json".to_string()
}

/// A data-driven validation check list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationProfile {
    /// Human-readable name
    pub name: String,

    /// Detailed description
    #[serde(default)]
    pub description: Option<String>,

    /// Environment files in priority order
    #[serde(default = "default_env_files")]
    pub env_files: Vec<String>,

    /// Dependency manifest file name
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Endpoints configured through environment keys
    pub endpoints: Vec<EndpointSpec>,

    /// Expected project files
    #[serde(default)]
    pub files: Vec<FileRequirement>,

    /// Expected packages
    #[serde(default)]
    pub packages: Vec<PackageRequirement>,

    /// Tips printed when the run fails
    #[serde(default)]
    pub troubleshooting: Vec<String>,
}

impl ValidationProfile {
    /// Parse a profile from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a profile from JSON string.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a profile file, choosing the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self, ProfileError> {
        validate_profile_schema(&value).map_err(ProfileError::SchemaError)?;
        let profile: ValidationProfile = serde_json::from_value(value)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Validate the profile structure beyond what the schema expresses.
    fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::MissingField("name".to_string()));
        }

        if self.env_files.is_empty() {
            return Err(ProfileError::MissingField("env_files".to_string()));
        }

        for endpoint in &self.endpoints {
            endpoint.url_regex()?;
        }

        for file in &self.files {
            if file.paths.is_empty() {
                return Err(ProfileError::ValidationError(format!(
                    "File requirement '{}' has no candidate paths",
                    file.description
                )));
            }
        }

        for package in &self.packages {
            if package.any_of.is_empty() {
                return Err(ProfileError::MissingField("packages.any_of".to_string()));
            }
        }

        self.validate_unique_keys()?;

        Ok(())
    }

    /// Ensure no environment key is claimed by two endpoints.
    fn validate_unique_keys(&self) -> Result<(), ProfileError> {
        let mut seen = HashSet::new();

        let all_keys = self.endpoints.iter().flat_map(|e| {
            std::iter::once(e.key.as_str()).chain(e.companion_key.as_deref())
        });

        for key in all_keys {
            if !seen.insert(key) {
                return Err(ProfileError::ValidationError(format!(
                    "Duplicate environment key: {}",
                    key
                )));
            }
        }

        Ok(())
    }

    /// The "no environment file" message, built from the candidate list.
    pub fn missing_env_message(&self) -> String {
        format!("No {} file found", self.env_files.join(" or "))
    }
}
