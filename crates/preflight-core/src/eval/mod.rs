//! Eval configuration and the scorers this crate runs itself.
//!
//! Descriptors are handed to an external eval engine. After a run, the local
//! scorers ([`SkillUsedScorer`], [`DocReferenceScorer`]) can be replayed
//! against its transcript and working directory with [`score_run`].

mod builtin;
mod descriptor;
mod knowledge;
mod scorer;
mod transcript;

pub use builtin::{builtin, builtin_names};
pub use descriptor::{
    AgentOptions, EvalDescriptor, EvalPrompt, ExecutionMode, PluginRef, ScorerSpec,
    TempDirCleanup,
};
pub use knowledge::{KnowledgeError, KnowledgeFile, KnowledgeMap, SkillKnowledge};
pub use scorer::{
    DocReferenceScorer, ScoreContext, ScoreResult, Scorer, SkillUsedScorer, GITHUB_BASE_URL,
};
pub use transcript::{
    ContentBlock, MessageBody, MessageContent, ToolUse, Transcript, TranscriptMessage,
};

use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors from loading or scoring evals.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Unknown eval '{name}' (available: {available})")]
    UnknownEval { name: String, available: String },

    #[error("Prompt '{prompt_id}' is not part of eval '{eval}'")]
    UnknownPrompt { eval: String, prompt_id: String },

    #[error("Invalid eval descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Could not parse transcript: {0}")]
    Transcript(#[from] serde_json::Error),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
}

/// Load a knowledge map from a file, or the embedded one.
pub fn load_knowledge(path: Option<&Path>) -> Result<KnowledgeMap, EvalError> {
    let map = match path {
        Some(path) => KnowledgeMap::from_file(path)?,
        None => KnowledgeMap::builtin()?,
    };
    Ok(map)
}

/// Result of one scorer for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScorerRun {
    Scored {
        scorer: String,
        #[serde(flatten)]
        result: ScoreResult,
    },
    Skipped {
        scorer: String,
        reason: String,
    },
}

impl ScorerRun {
    pub fn scorer(&self) -> &str {
        match self {
            ScorerRun::Scored { scorer, .. } | ScorerRun::Skipped { scorer, .. } => scorer,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            ScorerRun::Scored { result, .. } => Some(result.score),
            ScorerRun::Skipped { .. } => None,
        }
    }
}

/// All scorer results of one run, in descriptor order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunScores {
    pub eval: String,
    pub prompt_id: String,
    pub scores: Vec<ScorerRun>,
}

impl RunScores {
    /// Mean of the scored results, if any scorer ran.
    pub fn mean(&self) -> Option<f64> {
        let scored: Vec<f64> = self.scores.iter().filter_map(ScorerRun::score).collect();
        if scored.is_empty() {
            None
        } else {
            Some(scored.iter().sum::<f64>() / scored.len() as f64)
        }
    }
}

/// Replay the descriptor's local scorers against one finished run.
///
/// Engine-owned scorers are reported as skipped. An invalid descriptor is
/// rejected before any scorer runs.
pub fn score_run(
    descriptor: &EvalDescriptor,
    knowledge: &KnowledgeMap,
    ctx: &ScoreContext<'_>,
) -> Result<RunScores, EvalError> {
    descriptor.validate()?;

    if descriptor.prompt(ctx.prompt_id).is_none() {
        return Err(EvalError::UnknownPrompt {
            eval: descriptor.name.clone(),
            prompt_id: ctx.prompt_id.to_string(),
        });
    }

    let scores = descriptor
        .scorers
        .iter()
        .map(|spec| match spec.build(knowledge) {
            Some(scorer) => {
                let result = scorer.score(ctx);
                debug!(scorer = scorer.name(), score = result.score, "Scored run");
                ScorerRun::Scored {
                    scorer: scorer.name().to_string(),
                    result,
                }
            }
            None => ScorerRun::Skipped {
                scorer: spec.name().to_string(),
                reason: "runs inside the eval engine".to_string(),
            },
        })
        .collect();

    Ok(RunScores {
        eval: descriptor.name.clone(),
        prompt_id: ctx.prompt_id.to_string(),
        scores,
    })
}
