//! Skill knowledge map: which documentation file each skill should install.
//!
//! Prompt ids are resolved to skill keys by exact match or by a
//! `-`-delimited prefix (`neon-drizzle` owns `neon-drizzle-docs`). Two
//! delimited matches for one prompt id are an error, never a guess.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Embedded default map.
const BUILTIN_KNOWLEDGE_MAP: &str = include_str!("../../data/skill-knowledge-map.json");

/// Errors from loading or resolving the knowledge map.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Unknown skill in promptId: {0}")]
    Unknown(String),

    #[error("Ambiguous skill in promptId: {prompt_id} (matches {})", .candidates.join(", "))]
    Ambiguous {
        prompt_id: String,
        candidates: Vec<String>,
    },

    #[error("Failed to read knowledge map: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse knowledge map: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// One documentation file a skill can add to a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeFile {
    pub filename: String,

    #[serde(default)]
    pub required: bool,
}

/// What a skill installs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillKnowledge {
    pub display_name: String,
    pub files: Vec<KnowledgeFile>,
}

impl SkillKnowledge {
    /// The file whose reference proves the skill ran.
    pub fn required_file(&self) -> Option<&KnowledgeFile> {
        self.files.iter().find(|f| f.required)
    }
}

/// Skill key → knowledge, in key order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct KnowledgeMap {
    entries: BTreeMap<String, SkillKnowledge>,
}

impl KnowledgeMap {
    pub fn from_json(json: &str) -> Result<Self, KnowledgeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// The map shipped with the plugin.
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_json(BUILTIN_KNOWLEDGE_MAP)
    }

    pub fn get(&self, key: &str) -> Option<&SkillKnowledge> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Resolve the skill a prompt id belongs to.
    pub fn resolve<'m>(&'m self, prompt_id: &str) -> Result<(&'m str, &'m SkillKnowledge), KnowledgeError> {
        if let Some((key, knowledge)) = self.entries.get_key_value(prompt_id) {
            return Ok((key.as_str(), knowledge));
        }

        let matches: Vec<(&String, &SkillKnowledge)> = self
            .entries
            .iter()
            .filter(|(key, _)| {
                prompt_id
                    .strip_prefix(key.as_str())
                    .is_some_and(|rest| rest.starts_with('-'))
            })
            .collect();

        match matches.len() {
            0 => Err(KnowledgeError::Unknown(prompt_id.to_string())),
            1 => {
                let (key, knowledge) = matches[0];
                Ok((key.as_str(), knowledge))
            }
            _ => Err(KnowledgeError::Ambiguous {
                prompt_id: prompt_id.to_string(),
                candidates: matches.iter().map(|(key, _)| (*key).clone()).collect(),
            }),
        }
    }
}
