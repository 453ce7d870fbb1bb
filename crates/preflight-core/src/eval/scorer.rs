//! Locally implemented scorers.
//!
//! Each scorer grades one finished agent run and never fails: a missing or
//! malformed input becomes a `0.0` score with a reason.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::knowledge::KnowledgeMap;
use super::transcript::Transcript;
use super::EvalError;

/// Where documentation references should point.
pub const GITHUB_BASE_URL: &str = "https://raw.githubusercontent.com/neondatabase-labs/ai-rules/main";

/// Project instruction files, in lookup order.
const INSTRUCTION_FILES: [&str; 2] = ["CLAUDE.md", "claude.md"];

/// The grade of one scorer for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// In `[0, 1]`.
    pub score: f64,
    pub reason: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl ScoreResult {
    pub fn new(score: f64, reason: impl Into<String>) -> Self {
        Self {
            score,
            reason: reason.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// What a scorer may look at.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext<'a> {
    pub prompt_id: &'a str,

    /// Raw transcript: a JSON array of messages.
    pub agent_output: Option<&'a str>,

    pub working_dir: Option<&'a Path>,
}

impl<'a> ScoreContext<'a> {
    pub fn new(prompt_id: &'a str) -> Self {
        Self {
            prompt_id,
            agent_output: None,
            working_dir: None,
        }
    }

    pub fn with_agent_output(mut self, output: &'a str) -> Self {
        self.agent_output = Some(output);
        self
    }

    pub fn with_working_dir(mut self, dir: &'a Path) -> Self {
        self.working_dir = Some(dir);
        self
    }
}

/// A grading function for one run.
pub trait Scorer: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, ctx: &ScoreContext<'_>) -> ScoreResult;
}

/// Checks that the agent invoked a capability through a tool.
#[derive(Debug, Clone)]
pub struct SkillUsedScorer {
    name: String,
    tool: String,
    capability: String,
}

impl SkillUsedScorer {
    /// Scorer for a `plugin:skill` capability invoked through the `Skill` tool.
    pub fn new(capability: impl Into<String>) -> Self {
        let capability = capability.into();
        let name = format!("{}-skill-used", skill_name(&capability));
        Self {
            name,
            tool: "Skill".to_string(),
            capability,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    fn skill(&self) -> &str {
        skill_name(&self.capability)
    }
}

/// `neon-plugin:neon-drizzle` → `neon-drizzle`.
fn skill_name(capability: &str) -> &str {
    capability
        .rsplit_once(':')
        .map_or(capability, |(_, skill)| skill)
}

impl Scorer for SkillUsedScorer {
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self, ctx: &ScoreContext<'_>) -> ScoreResult {
        let Some(raw) = ctx.agent_output else {
            return ScoreResult::new(0.0, "No agent output to score");
        };

        let transcript = match Transcript::parse(raw) {
            Ok(transcript) => transcript,
            Err(e) => return ScoreResult::new(0.0, EvalError::from(e).to_string()),
        };

        let used = transcript.tool_uses().any(|tool_use| {
            tool_use.name == self.tool
                && tool_use
                    .command()
                    .is_some_and(|command| command.contains(&self.capability))
        });

        if used {
            ScoreResult::new(1.0, format!("{} skill used", self.skill()))
        } else {
            ScoreResult::new(0.0, format!("{} skill not used", self.skill()))
        }
    }
}

/// Checks that the project instructions reference the skill's documentation.
#[derive(Debug, Clone)]
pub struct DocReferenceScorer {
    name: String,
    knowledge: KnowledgeMap,
    base_url: String,
}

impl DocReferenceScorer {
    pub fn new(knowledge: KnowledgeMap) -> Self {
        Self {
            name: "claude-md-added-to-project".to_string(),
            knowledge,
            base_url: GITHUB_BASE_URL.to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn read_instructions(dir: &Path) -> Option<String> {
        INSTRUCTION_FILES
            .iter()
            .find_map(|name| fs::read_to_string(dir.join(name)).ok())
    }
}

impl Scorer for DocReferenceScorer {
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self, ctx: &ScoreContext<'_>) -> ScoreResult {
        let (key, knowledge) = match self.knowledge.resolve(ctx.prompt_id) {
            Ok(resolved) => resolved,
            Err(e) => return ScoreResult::new(0.0, e.to_string()),
        };

        let Some(required) = knowledge.required_file() else {
            return ScoreResult::new(0.0, format!("No required file found for skill: {}", key));
        };

        let Some(content) = ctx.working_dir.and_then(Self::read_instructions) else {
            return ScoreResult::new(0.0, "CLAUDE.md file not found in project");
        };

        let expected_url = format!("{}/{}", self.base_url, required.filename);
        if content.contains(&expected_url) {
            ScoreResult::new(
                1.0,
                format!(
                    "CLAUDE.md exists with correct {} documentation reference",
                    knowledge.display_name
                ),
            )
        } else {
            ScoreResult::new(
                0.5,
                format!(
                    "CLAUDE.md exists but missing {} documentation reference",
                    knowledge.display_name
                ),
            )
            .with_metadata("hint", format!("Expected URL: {}", expected_url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript_with(command: &str) -> String {
        format!(
            r#"[
                {{ "type": "user", "message": {{ "content": "go" }} }},
                {{ "type": "assistant", "message": {{ "content": [
                    {{ "type": "tool_use", "name": "Skill", "input": {{ "command": "{}" }} }}
                ] }} }}
            ]"#,
            command
        )
    }

    #[test]
    fn test_skill_used() {
        let scorer = SkillUsedScorer::new("neon-plugin:neon-drizzle");
        let output = transcript_with("neon-plugin:neon-drizzle");
        let result = scorer.score(&ScoreContext::new("build-todo-app").with_agent_output(&output));

        assert_eq!(scorer.name(), "neon-drizzle-skill-used");
        assert_eq!(result.score, 1.0);
        assert_eq!(result.reason, "neon-drizzle skill used");
    }

    #[test]
    fn test_skill_not_used() {
        let scorer = SkillUsedScorer::new("neon-plugin:neon-drizzle");
        let output = transcript_with("neon-plugin:add-neon-docs");
        let result = scorer.score(&ScoreContext::new("build-todo-app").with_agent_output(&output));

        assert_eq!(result.score, 0.0);
        assert_eq!(result.reason, "neon-drizzle skill not used");
    }

    #[test]
    fn test_skill_requires_matching_tool() {
        let scorer = SkillUsedScorer::new("neon-plugin:neon-drizzle").with_tool("SlashCommand");
        let output = transcript_with("neon-plugin:neon-drizzle");
        let result = scorer.score(&ScoreContext::new("p").with_agent_output(&output));
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_unparseable_transcript_scores_zero() {
        let scorer = SkillUsedScorer::new("neon-plugin:neon-drizzle");
        let result = scorer.score(&ScoreContext::new("p").with_agent_output("not json"));
        assert_eq!(result.score, 0.0);
        assert!(result.reason.starts_with("Could not parse transcript"));

        let result = scorer.score(&ScoreContext::new("p"));
        assert_eq!(result.score, 0.0);
    }

    fn doc_scorer() -> DocReferenceScorer {
        DocReferenceScorer::new(KnowledgeMap::builtin().unwrap())
    }

    #[test]
    fn test_doc_reference_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("CLAUDE.md"),
            format!("See {}/neon-drizzle.mdc\n", GITHUB_BASE_URL),
        )
        .unwrap();

        let result = doc_scorer().score(
            &ScoreContext::new("neon-drizzle-docs").with_working_dir(dir.path()),
        );
        assert_eq!(result.score, 1.0);
        assert_eq!(
            result.reason,
            "CLAUDE.md exists with correct Neon + Drizzle documentation reference"
        );
        assert!(result.metadata.is_none());
    }

    #[test]
    fn test_doc_reference_missing_gives_half_with_hint() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("CLAUDE.md"), "# Project\n").unwrap();

        let result = doc_scorer().score(
            &ScoreContext::new("neon-toolkit-best-practices").with_working_dir(dir.path()),
        );
        assert_eq!(result.score, 0.5);
        let metadata = result.metadata.unwrap();
        assert_eq!(
            metadata["hint"],
            format!("Expected URL: {}/neon-toolkit.mdc", GITHUB_BASE_URL)
        );
    }

    #[test]
    fn test_doc_reference_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = doc_scorer().score(
            &ScoreContext::new("neon-serverless-docs").with_working_dir(dir.path()),
        );
        assert_eq!(result.score, 0.0);
        assert_eq!(result.reason, "CLAUDE.md file not found in project");
    }

    #[test]
    fn test_doc_reference_unknown_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            doc_scorer().score(&ScoreContext::new("build-todo-app").with_working_dir(dir.path()));
        assert_eq!(result.score, 0.0);
        assert_eq!(result.reason, "Unknown skill in promptId: build-todo-app");
    }

    #[test]
    fn test_doc_reference_without_required_file() {
        let map = KnowledgeMap::from_json(
            r#"{ "neon-x": { "displayName": "X", "files": [{ "filename": "x.mdc" }] } }"#,
        )
        .unwrap();
        let result = DocReferenceScorer::new(map).score(&ScoreContext::new("neon-x-docs"));
        assert_eq!(result.score, 0.0);
        assert_eq!(result.reason, "No required file found for skill: neon-x");
    }

    #[test]
    fn test_custom_base_url_trims_slash() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("CLAUDE.md"),
            "https://mirror.example/rules/neon-drizzle.mdc",
        )
        .unwrap();

        let scorer = doc_scorer().with_base_url("https://mirror.example/rules/");
        let result =
            scorer.score(&ScoreContext::new("neon-drizzle-docs").with_working_dir(dir.path()));
        assert_eq!(result.score, 1.0);
    }
}
