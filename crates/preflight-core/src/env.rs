//! Environment file discovery and parsing.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::checks::patterns::parse_env_line;

/// Errors from reading an environment file that exists.
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Could not read {file}: {source}")]
    Unreadable {
        file: String,
        #[source]
        source: io::Error,
    },
}

/// Key-value view of the first environment file found for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSnapshot {
    file_name: String,
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Find the first existing candidate under `root` and parse it.
    ///
    /// Returns `Ok(None)` when no candidate exists. A candidate that exists
    /// but cannot be read is reported as an error with its file name.
    /// Invalid UTF-8 is replaced, so ASCII keys are still found.
    pub fn locate(root: &Path, candidates: &[String]) -> Result<Option<Self>, EnvError> {
        for candidate in candidates {
            let path = root.join(candidate);
            if !path.is_file() {
                continue;
            }

            let bytes = fs::read(&path).map_err(|source| EnvError::Unreadable {
                file: candidate.clone(),
                source,
            })?;
            let content = String::from_utf8_lossy(&bytes);
            return Ok(Some(Self::parse(candidate.clone(), path, &content)));
        }

        Ok(None)
    }

    /// Parse raw file text. The first assignment of a key wins.
    pub fn parse(file_name: impl Into<String>, path: impl Into<PathBuf>, content: &str) -> Self {
        let mut values = BTreeMap::new();
        for (key, value) in content.lines().filter_map(parse_env_line) {
            values.entry(key).or_insert(value);
        }

        Self {
            file_name: file_name.into(),
            path: path.into(),
            values,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec![".env.local".to_string(), ".env".to_string()]
    }

    #[test]
    fn test_first_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "KEY=from-env\n").unwrap();
        fs::write(dir.path().join(".env.local"), "KEY=from-local\n").unwrap();

        let snapshot = EnvSnapshot::locate(dir.path(), &candidates())
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.file_name(), ".env.local");
        assert_eq!(snapshot.get("KEY"), Some("from-local"));
    }

    #[test]
    fn test_falls_back_to_second_candidate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "KEY=value\nOTHER=x\n").unwrap();

        let snapshot = EnvSnapshot::locate(dir.path(), &candidates())
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.file_name(), ".env");
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_read_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = b"# caf\xe9 settings\nNEON_AUTH_BASE_URL=https://auth.example\n".to_vec();
        bytes.extend_from_slice(b"LABEL=\xff\xfe\n");
        fs::write(dir.path().join(".env.local"), bytes).unwrap();

        let snapshot = EnvSnapshot::locate(dir.path(), &candidates())
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.path(), dir.path().join(".env.local"));
        assert_eq!(snapshot.get("NEON_AUTH_BASE_URL"), Some("https://auth.example"));
        assert!(snapshot.get("LABEL").is_some());
    }

    #[test]
    fn test_no_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = EnvSnapshot::locate(dir.path(), &candidates()).unwrap();
        assert!(snapshot.is_none());
    }

    #[test]
    fn test_directory_is_not_an_env_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".env.local")).unwrap();
        let snapshot = EnvSnapshot::locate(dir.path(), &candidates()).unwrap();
        assert!(snapshot.is_none());
    }

    #[test]
    fn test_first_assignment_wins() {
        let snapshot = EnvSnapshot::parse(".env", ".env", "A=1\nA=2\n# B=3\n");
        assert_eq!(snapshot.get("A"), Some("1"));
        assert_eq!(snapshot.get("B"), None);
    }

    #[test]
    fn test_prefixed_key_does_not_shadow() {
        let snapshot = EnvSnapshot::parse(
            ".env",
            ".env",
            "NEXT_PUBLIC_NEON_AUTH_URL=https://public\n",
        );
        assert_eq!(snapshot.get("NEON_AUTH_BASE_URL"), None);
        assert_eq!(snapshot.get("NEXT_PUBLIC_NEON_AUTH_URL"), Some("https://public"));
    }
}
