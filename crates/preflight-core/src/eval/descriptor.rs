//! Eval descriptors: what the external eval engine should run.
//!
//! Serialized as camelCase JSON, the shape the engine consumes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use super::knowledge::KnowledgeMap;
use super::scorer::{DocReferenceScorer, Scorer, SkillUsedScorer};
use super::EvalError;

/// One prompt given to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalPrompt {
    pub id: String,
    pub prompt: String,
}

impl EvalPrompt {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
        }
    }
}

/// A plugin loaded into the agent for every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PluginRef {
    Local { path: PathBuf },
}

/// Options passed through to the agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentOptions {
    #[serde(default)]
    pub plugins: Vec<PluginRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// How the engine schedules iterations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ExecutionMode {
    Parallel,
    ParallelLimit { concurrency: u32 },
    Sequential,
}

/// When the engine removes per-run temp directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TempDirCleanup {
    Always,
    OnFailure,
    Never,
}

/// A scorer attached to an eval.
///
/// `build-success` and `test-success` run inside the engine; the others are
/// implemented in [`super::scorer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ScorerSpec {
    BuildSuccess,
    TestSuccess,
    SkillUsed {
        name: String,
        capability: String,
        #[serde(default = "default_tool")]
        tool: String,
    },
    DocReference {
        name: String,
        #[serde(default, rename = "baseUrl", skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
}

fn default_tool() -> String {
    "Skill".to_string()
}

impl ScorerSpec {
    pub fn skill_used(capability: &str) -> Self {
        let scorer = SkillUsedScorer::new(capability);
        ScorerSpec::SkillUsed {
            name: scorer.name().to_string(),
            capability: capability.to_string(),
            tool: default_tool(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ScorerSpec::BuildSuccess => "build-success",
            ScorerSpec::TestSuccess => "test-success",
            ScorerSpec::SkillUsed { name, .. } | ScorerSpec::DocReference { name, .. } => name,
        }
    }

    /// Instantiate a local scorer. `None` for engine-owned scorers.
    pub fn build(&self, knowledge: &KnowledgeMap) -> Option<Box<dyn Scorer>> {
        match self {
            ScorerSpec::BuildSuccess | ScorerSpec::TestSuccess => None,
            ScorerSpec::SkillUsed {
                name,
                capability,
                tool,
            } => Some(Box::new(
                SkillUsedScorer::new(capability.as_str())
                    .with_name(name.as_str())
                    .with_tool(tool.as_str()),
            )),
            ScorerSpec::DocReference { name, base_url } => {
                let mut scorer = DocReferenceScorer::new(knowledge.clone()).with_name(name.as_str());
                if let Some(base_url) = base_url {
                    scorer = scorer.with_base_url(base_url.as_str());
                }
                Some(Box::new(scorer))
            }
        }
    }
}

/// A complete eval run description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalDescriptor {
    pub name: String,
    pub prompts: Vec<EvalPrompt>,
    pub project_dir: PathBuf,
    pub iterations: u32,
    pub scorers: Vec<ScorerSpec>,
    pub claude_code_options: AgentOptions,
    pub results_dir: PathBuf,
    pub execution: ExecutionMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir_cleanup: Option<TempDirCleanup>,
}

impl EvalDescriptor {
    pub fn prompt(&self, id: &str) -> Option<&EvalPrompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    pub fn prompt_ids(&self) -> impl Iterator<Item = &str> {
        self.prompts.iter().map(|p| p.id.as_str())
    }

    /// Check the descriptor is runnable.
    pub fn validate(&self) -> Result<(), EvalError> {
        let invalid = |msg: String| Err(EvalError::InvalidDescriptor(msg));

        if self.name.trim().is_empty() {
            return invalid("name must not be empty".to_string());
        }
        if self.prompts.is_empty() {
            return invalid(format!("{}: at least one prompt is required", self.name));
        }
        if self.iterations == 0 {
            return invalid(format!("{}: iterations must be at least 1", self.name));
        }
        if self.scorers.is_empty() {
            return invalid(format!("{}: at least one scorer is required", self.name));
        }
        if let ExecutionMode::ParallelLimit { concurrency: 0 } = self.execution {
            return invalid(format!("{}: concurrency must be at least 1", self.name));
        }

        let mut seen = HashSet::new();
        for prompt in &self.prompts {
            if !seen.insert(prompt.id.as_str()) {
                return invalid(format!("{}: duplicate prompt id '{}'", self.name, prompt.id));
            }
        }

        let mut names = HashSet::new();
        for scorer in &self.scorers {
            if !names.insert(scorer.name()) {
                return invalid(format!("{}: duplicate scorer '{}'", self.name, scorer.name()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor() -> EvalDescriptor {
        EvalDescriptor {
            name: "eval-sample".to_string(),
            prompts: vec![EvalPrompt::new("one", "Do one thing.")],
            project_dir: PathBuf::from("/evals/sample/eval-input"),
            iterations: 3,
            scorers: vec![
                ScorerSpec::BuildSuccess,
                ScorerSpec::skill_used("neon-plugin:neon-drizzle"),
            ],
            claude_code_options: AgentOptions {
                plugins: vec![PluginRef::Local {
                    path: PathBuf::from("/plugin"),
                }],
                system_prompt: None,
            },
            results_dir: PathBuf::from("/evals/sample/eval-results"),
            execution: ExecutionMode::ParallelLimit { concurrency: 6 },
            temp_dir_cleanup: Some(TempDirCleanup::OnFailure),
        }
    }

    #[test]
    fn test_engine_json_shape() {
        let value = serde_json::to_value(descriptor()).unwrap();

        assert_eq!(value["projectDir"], json!("/evals/sample/eval-input"));
        assert_eq!(
            value["execution"],
            json!({ "mode": "parallel-limit", "concurrency": 6 })
        );
        assert_eq!(value["tempDirCleanup"], json!("on-failure"));
        assert_eq!(
            value["claudeCodeOptions"],
            json!({ "plugins": [{ "type": "local", "path": "/plugin" }] })
        );
        assert_eq!(value["scorers"][0], json!({ "type": "build-success" }));
        assert_eq!(
            value["scorers"][1]["name"],
            json!("neon-drizzle-skill-used")
        );
    }

    #[test]
    fn test_optional_fields_omitted() {
        let mut d = descriptor();
        d.temp_dir_cleanup = None;
        d.execution = ExecutionMode::Parallel;
        let value = serde_json::to_value(d).unwrap();

        assert!(value.get("tempDirCleanup").is_none());
        assert_eq!(value["execution"], json!({ "mode": "parallel" }));
    }

    #[test]
    fn test_scorer_locality() {
        let map = KnowledgeMap::builtin().unwrap();
        let d = descriptor();
        assert!(d.scorers[0].build(&map).is_none());
        assert_eq!(
            d.scorers[1].build(&map).unwrap().name(),
            "neon-drizzle-skill-used"
        );
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        assert!(descriptor().validate().is_ok());

        let mut d = descriptor();
        d.prompts.push(EvalPrompt::new("one", "Again."));
        assert!(matches!(d.validate(), Err(EvalError::InvalidDescriptor(_))));

        let mut d = descriptor();
        d.execution = ExecutionMode::ParallelLimit { concurrency: 0 };
        assert!(d.validate().is_err());

        let mut d = descriptor();
        d.iterations = 0;
        assert!(d.validate().is_err());
    }
}
