//! Package Check
//!
//! Does the dependency manifest declare one of the expected SDK packages?

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use tracing::debug;

use crate::evidence::Evidence;
use crate::types::{CheckKind, Finding};

use super::{Check, CheckContext};

type DependencyTable = BTreeMap<String, serde_json::Value>;

/// The parts of `package.json` this check reads. Absent and `null`
/// sections both count as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    #[serde(default)]
    dependencies: Option<DependencyTable>,

    #[serde(default)]
    dev_dependencies: Option<DependencyTable>,
}

impl Manifest {
    fn declares(&self, package: &str) -> bool {
        [&self.dependencies, &self.dev_dependencies]
            .into_iter()
            .flatten()
            .any(|table| table.contains_key(package))
    }
}

/// Checks package requirements against runtime and development dependencies.
pub struct PackageCheck;

impl PackageCheck {
    pub fn new() -> Self {
        Self
    }

    fn missing_message(candidates: &[String], manifest: &str) -> String {
        match candidates {
            [only] => format!("{} not found in {}", only, manifest),
            [first, second] => format!("Neither {} nor {} found in {}", first, second, manifest),
            _ => format!("None of {} found in {}", candidates.join(", "), manifest),
        }
    }
}

impl Default for PackageCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for PackageCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Package
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let manifest_name = ctx.profile.manifest.as_str();
        let path = ctx.root.join(manifest_name);
        if ctx.profile.packages.is_empty() || !path.is_file() {
            debug!(manifest = manifest_name, "No manifest to check");
            return Vec::new();
        }

        let evidence = Evidence::from_manifest(manifest_name, "dependencies");
        let manifest: Manifest = match fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()))
        {
            Ok(manifest) => manifest,
            Err(e) => {
                return vec![Finding::warning(
                    self.kind(),
                    format!("Could not parse {}: {}", manifest_name, e),
                    evidence,
                )];
            }
        };

        ctx.profile
            .packages
            .iter()
            .map(|requirement| {
                match requirement.any_of.iter().find(|p| manifest.declares(p)) {
                    Some(package) => Finding::pass(
                        self.kind(),
                        format!("{} package installed", package),
                        evidence.clone(),
                    ),
                    None => Finding::error(
                        self.kind(),
                        Self::missing_message(&requirement.any_of, manifest_name),
                        evidence.clone(),
                    ),
                }
            })
            .collect()
    }
}
