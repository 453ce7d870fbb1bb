//! Project File Check
//!
//! Are the files the integration needs where the framework expects them?

use tracing::debug;

use crate::evidence::Evidence;
use crate::types::{CheckKind, Finding};

use super::{Check, CheckContext};

/// Checks each file requirement's candidate paths; first match wins.
pub struct ProjectFileCheck;

impl ProjectFileCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProjectFileCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for ProjectFileCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::ProjectFile
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        ctx.profile
            .files
            .iter()
            .map(|requirement| {
                let found = requirement
                    .paths
                    .iter()
                    .find(|p| ctx.root.join(p.as_str()).is_file());

                // Schema guarantees at least one candidate.
                let primary = requirement.paths.first().map(String::as_str).unwrap_or("");

                match found {
                    Some(path) => {
                        debug!(path = %path, "Found {}", requirement.description);
                        Finding::pass(
                            self.kind(),
                            format!("{} found", requirement.description),
                            Evidence::from_path(path.clone()),
                        )
                    }
                    None if requirement.required => Finding::error(
                        self.kind(),
                        format!("{} not found at {}", requirement.description, primary),
                        Evidence::from_path(primary),
                    ),
                    None => Finding::warning(
                        self.kind(),
                        format!(
                            "{} not found at {} - may be in different location",
                            requirement.description, primary
                        ),
                        Evidence::from_path(primary),
                    ),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::EnvState;
    use crate::profile::builtin;
    use crate::types::Severity;
    use std::fs;
    use std::path::Path;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export {};\n").unwrap();
    }

    fn run_in(root: &Path) -> Vec<Finding> {
        let profile = builtin("neon-auth").unwrap();
        let env = EnvState::Missing;
        let ctx = CheckContext {
            profile: &profile,
            root,
            env: &env,
        };
        ProjectFileCheck::new().run(&ctx)
    }

    #[test]
    fn test_empty_project() {
        let dir = tempfile::tempdir().unwrap();
        let findings = run_in(dir.path());

        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(
            findings[0].message,
            "API route handler not found at app/api/auth/[...path]/route.ts"
        );
        assert_eq!(findings[1].severity, Severity::Warning);
        assert_eq!(
            findings[1].message,
            "Auth client file not found at lib/auth/client.ts - may be in different location"
        );
    }

    #[test]
    fn test_alternate_extension_and_location() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "app/api/auth/[...path]/route.js");
        touch(dir.path(), "src/lib/auth/client.ts");

        let findings = run_in(dir.path());
        assert!(findings.iter().all(|f| f.severity == Severity::Pass));
        assert_eq!(findings[1].evidence.pointer, "src/lib/auth/client.ts");
    }
}
