//! scrivener - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use scrivener::commit::{
    CONTEXT_ONLY_MESSAGE, CommitMessage, DiffAcquirer, DiffOutcome, DiffResult, LOCK_FILES_MESSAGE,
    synthesize, write_commit_message,
};
use scrivener::git::{GitGuard, SystemRunner, check_git_installed};
use scrivener::llm::{ProviderSettings, get_provider, load_dotenv};

const SEPARATOR: &str = "------------------------";

/// Generate a commit message for pending changes using an LLM.
#[derive(Parser, Debug)]
#[command(name = "scrivener")]
#[command(about = "Generate emoji conventional commit messages with an LLM")]
#[command(version)]
struct Cli {
    /// Write the message to .git/COMMIT_EDITMSG for use in a commit hook
    #[arg(long)]
    hook: bool,

    /// LLM provider (anthropic, openai, openai-compatible); overrides PROVIDER
    #[arg(long)]
    provider: Option<String>,

    /// Model to use for this run; overrides MODEL_NAME and provider defaults
    #[arg(long)]
    model: Option<String>,

    /// Repository to inspect
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Real environment variables take precedence over .env
    load_dotenv(&cli.repo);

    check_git_installed().context("git is required")?;

    // Step 1: Acquire the diff
    let acquirer = DiffAcquirer::new(GitGuard::new(SystemRunner::in_dir(&cli.repo)));
    let diff = match acquirer.acquire() {
        Ok(diff) => diff,
        Err(e) if e.is_policy_violation() => {
            return Err(e).context("Refusing to run git command");
        }
        Err(e) => {
            error!("Error getting git diff: {}", e);
            DiffResult::empty()
        }
    };

    // Step 2: Pick a canned message or ask the provider
    let message = match diff.classify() {
        DiffOutcome::LockFiles => CommitMessage::new(LOCK_FILES_MESSAGE),
        DiffOutcome::ContextOnly => CommitMessage::new(CONTEXT_ONLY_MESSAGE),
        DiffOutcome::Empty => {
            eprintln!("No changes to analyze");
            return Ok(ExitCode::FAILURE);
        }
        DiffOutcome::Changes(text) => {
            let settings = ProviderSettings::from_env();
            let provider = get_provider(cli.provider.as_deref(), &settings)
                .context("Failed to configure LLM provider")?;

            match synthesize(text, provider.as_ref(), cli.model.as_deref()).await {
                Some(message) => message,
                None => {
                    eprintln!("Failed to generate commit message");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    };

    // Step 3: Output
    println!("\nGenerated commit message:");
    println!("{}", SEPARATOR);
    println!("{}", message);
    println!("{}", SEPARATOR);

    if cli.hook {
        let path = write_commit_message(&cli.repo, &message)
            .context("Failed to write commit message for hook")?;
        debug!("Commit message written to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

/// Log to stderr so stdout carries only the message. `RUST_LOG` wins over
/// `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
