//! Eval descriptors shipped with the plugin.
//!
//! Paths are resolved against the plugin root, which is also the local plugin
//! loaded into the agent.

use std::path::Path;

use super::descriptor::{
    AgentOptions, EvalDescriptor, EvalPrompt, ExecutionMode, PluginRef, ScorerSpec,
    TempDirCleanup,
};
use super::EvalError;

const ADD_NEON_DOCS: &str = "add-neon-docs";
const NEON_DRIZZLE: &str = "neon-drizzle";

const NEXTJS_PARAMS_PROMPT: &str = "Next.js 15+ App Router: params are Promises. Always use:
    async function GET(request: NextRequest, { params }: { params: Promise<{ id: string }> }) {
      const { id } = await params;
    }
    Never use old synchronous params pattern: { params: { id: string } }";

/// Names accepted by [`builtin`].
pub fn builtin_names() -> &'static [&'static str] {
    &[ADD_NEON_DOCS, NEON_DRIZZLE]
}

/// Load a built-in eval descriptor. The descriptor is validated before it
/// is returned.
pub fn builtin(name: &str, plugin_root: &Path) -> Result<EvalDescriptor, EvalError> {
    let descriptor = match name {
        ADD_NEON_DOCS => add_neon_docs(plugin_root),
        NEON_DRIZZLE => neon_drizzle(plugin_root),
        _ => {
            return Err(EvalError::UnknownEval {
                name: name.to_string(),
                available: builtin_names().join(", "),
            })
        }
    };
    descriptor.validate()?;
    Ok(descriptor)
}

fn local_plugin(plugin_root: &Path) -> PluginRef {
    PluginRef::Local {
        path: plugin_root.to_path_buf(),
    }
}

fn add_neon_docs(plugin_root: &Path) -> EvalDescriptor {
    let eval_dir = plugin_root.join("evals").join("add-neon-knowledge-skill");

    EvalDescriptor {
        name: "eval-add-neon-docs-skills".to_string(),
        prompts: vec![
            EvalPrompt::new("neon-drizzle-docs", "Add docs about neon and drizzle."),
            EvalPrompt::new(
                "neon-drizzle-best-practices",
                "Add best practices docs about neon and drizzle.",
            ),
            EvalPrompt::new("neon-serverless-docs", "Add docs about neon serverless."),
            EvalPrompt::new(
                "neon-serverless-best-practices",
                "Add best practices docs about neon serverless driver.",
            ),
            EvalPrompt::new("neon-toolkit-docs", "Add docs about neon toolkit."),
            EvalPrompt::new(
                "neon-toolkit-best-practices",
                "Add best practices docs about neon toolkit for ephemeral databases.",
            ),
        ],
        project_dir: eval_dir.join("eval-input"),
        iterations: 10,
        scorers: vec![
            ScorerSpec::BuildSuccess,
            ScorerSpec::skill_used("neon-plugin:add-neon-docs"),
            ScorerSpec::DocReference {
                name: "claude-md-added-to-project".to_string(),
                base_url: None,
            },
        ],
        claude_code_options: AgentOptions {
            plugins: vec![local_plugin(plugin_root)],
            system_prompt: None,
        },
        results_dir: eval_dir.join("eval-results"),
        execution: ExecutionMode::Parallel,
        temp_dir_cleanup: None,
    }
}

fn neon_drizzle(plugin_root: &Path) -> EvalDescriptor {
    let eval_dir = plugin_root.join("evals").join("neon-drizzle-skill");

    EvalDescriptor {
        name: "eval-neon-drizzle-skill".to_string(),
        prompts: vec![
            EvalPrompt::new(
                "build-todo-app",
                "I want to build a todo application with Neon and Drizzle. Create an integration test using drizzle syntax in __tests__/ that verifies you can add a todo to the database and query it back successfully.",
            ),
            EvalPrompt::new(
                "build-notes-app",
                "I want to create a new notes application with Neon, Drizzle and Next.js.  Create an integration test using drizzle syntax in __tests__/ that verifies you can add a note to the database and query it back successfully.",
            ),
        ],
        project_dir: eval_dir.join("eval-input"),
        iterations: 10,
        scorers: vec![
            ScorerSpec::BuildSuccess,
            ScorerSpec::skill_used("neon-plugin:neon-drizzle"),
            ScorerSpec::TestSuccess,
        ],
        claude_code_options: AgentOptions {
            plugins: vec![local_plugin(plugin_root)],
            system_prompt: Some(NEXTJS_PARAMS_PROMPT.to_string()),
        },
        results_dir: eval_dir.join("eval-results"),
        execution: ExecutionMode::ParallelLimit { concurrency: 6 },
        temp_dir_cleanup: Some(TempDirCleanup::OnFailure),
    }
}
