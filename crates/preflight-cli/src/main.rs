//! Preflight CLI
//!
//! The `preflight` command validates a project's Neon setup and scores eval
//! runs of the Neon plugin.
//!
//! ## Commands
//!
//! - `validate`: Check env, URLs, endpoints, files and packages
//! - `profiles`: List built-in validation profiles
//! - `eval`: Inspect eval descriptors and score finished runs

mod output;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};

use preflight_core::eval::{self, ScoreContext};
use preflight_core::profile::{self, ValidationProfile};
use preflight_core::validate_offline;
use preflight_runtime::{HttpProbe, ProbeConfig, SetupRunner};

#[derive(Parser)]
#[command(name = "preflight")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Neon plugin setup validation and eval scoring", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project's setup against a profile
    Validate {
        /// Built-in profile name
        #[arg(short, long, default_value = "neon-auth", conflicts_with = "profile_file")]
        profile: String,

        /// Custom profile (YAML or JSON)
        #[arg(long)]
        profile_file: Option<PathBuf>,

        /// Project directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Skip endpoint connectivity probes
        #[arg(long)]
        offline: bool,

        /// Per-request probe timeout, 10s unless set (e.g. "30s", "500ms")
        #[arg(long, value_parser = humantime::parse_duration)]
        timeout: Option<Duration>,

        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List built-in validation profiles
    Profiles,

    /// Eval descriptors and scorers
    Eval {
        #[command(subcommand)]
        action: EvalAction,
    },
}

#[derive(Subcommand)]
enum EvalAction {
    /// List built-in evals
    List,

    /// Print an eval descriptor as engine JSON
    Show {
        /// Eval name
        name: String,

        /// Plugin root the descriptor paths are resolved against
        #[arg(long, default_value = ".")]
        plugin_root: PathBuf,
    },

    /// Replay local scorers against a finished run
    Score {
        /// Eval name
        name: String,

        /// Prompt id of the run
        #[arg(long)]
        prompt_id: String,

        /// Transcript file (JSON array of messages)
        #[arg(long)]
        transcript: Option<PathBuf>,

        /// Working directory the run left behind
        #[arg(long)]
        workdir: Option<PathBuf>,

        /// Knowledge map JSON (default: built-in)
        #[arg(long)]
        knowledge_map: Option<PathBuf>,

        /// Plugin root the descriptor paths are resolved against
        #[arg(long, default_value = ".")]
        plugin_root: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    telemetry::init_tracing(cli.json_logs, level);

    match cli.command {
        Commands::Validate {
            profile,
            profile_file,
            dir,
            offline,
            timeout,
            format,
        } => {
            let profile = load_profile(&profile, profile_file.as_deref())?;
            cmd_validate(&profile, &dir, offline, timeout, format).await
        }
        Commands::Profiles => cmd_profiles(),
        Commands::Eval { action } => match action {
            EvalAction::List => cmd_eval_list(),
            EvalAction::Show { name, plugin_root } => cmd_eval_show(&name, &plugin_root),
            EvalAction::Score {
                name,
                prompt_id,
                transcript,
                workdir,
                knowledge_map,
                plugin_root,
            } => cmd_eval_score(
                &name,
                &prompt_id,
                transcript.as_deref(),
                workdir.as_deref(),
                knowledge_map.as_deref(),
                &plugin_root,
            ),
        },
    }
}

fn load_profile(name: &str, file: Option<&Path>) -> Result<ValidationProfile> {
    match file {
        Some(path) => ValidationProfile::from_file(path)
            .with_context(|| format!("Failed to load profile from {}", path.display())),
        None => profile::builtin(name).context("Failed to load built-in profile"),
    }
}

async fn cmd_validate(
    profile: &ValidationProfile,
    dir: &Path,
    offline: bool,
    timeout: Option<Duration>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let report = if offline {
        info!("Offline mode: skipping endpoint connectivity probes");
        validate_offline(profile, dir)
    } else {
        let mut config = ProbeConfig::default();
        if let Some(timeout) = timeout {
            config = config.with_timeout(timeout);
        }
        let probe = HttpProbe::new(&config).context("Failed to set up endpoint probe")?;
        SetupRunner::new(Arc::new(probe)).run(profile, dir).await
    };

    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => output::render_text(&report, &mut stdout)?,
        OutputFormat::Json => output::render_json(&report, &mut stdout)?,
    }
    stdout.flush()?;

    Ok(exit_code(report.passed()))
}

fn exit_code(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_profiles() -> Result<ExitCode> {
    for name in profile::builtin_names() {
        let profile = profile::builtin(name)?;
        let description = profile.description.as_deref().unwrap_or(&profile.name);
        println!("{:<12} {}", name, description);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_eval_list() -> Result<ExitCode> {
    for name in eval::builtin_names() {
        let descriptor = eval::builtin(name, Path::new("."))?;
        println!(
            "{:<16} {} prompts x {} iterations",
            name,
            descriptor.prompts.len(),
            descriptor.iterations
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_eval_show(name: &str, plugin_root: &Path) -> Result<ExitCode> {
    let descriptor = eval::builtin(name, plugin_root)?;
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(ExitCode::SUCCESS)
}

fn cmd_eval_score(
    name: &str,
    prompt_id: &str,
    transcript: Option<&Path>,
    workdir: Option<&Path>,
    knowledge_map: Option<&Path>,
    plugin_root: &Path,
) -> Result<ExitCode> {
    let descriptor = eval::builtin(name, plugin_root)?;
    let knowledge = eval::load_knowledge(knowledge_map).context("Failed to load knowledge map")?;

    let agent_output = transcript
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read transcript {}", path.display()))
        })
        .transpose()?;

    let mut ctx = ScoreContext::new(prompt_id);
    if let Some(output) = agent_output.as_deref() {
        ctx = ctx.with_agent_output(output);
    }
    if let Some(dir) = workdir {
        ctx = ctx.with_working_dir(dir);
    }

    let scores = eval::score_run(&descriptor, &knowledge, &ctx)?;
    println!("{}", serde_json::to_string_pretty(&scores)?);
    Ok(ExitCode::SUCCESS)
}
