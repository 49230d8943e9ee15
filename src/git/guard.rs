//! Allowlisted git execution.
//!
//! Only `git diff` may run, and only with the literal arguments declared
//! below. Every requested token is checked against the allowlist and swapped
//! for the matching `'static` literal before it reaches a [`CommandRunner`],
//! so no value derived from repository content, file names or user input can
//! ever become a command or a flag. Arguments are passed as a discrete argv
//! list; no shell is involved.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::GitError;

/// The only git subcommand the guard will run.
pub const GIT_DIFF: &str = "diff";

/// Compare the index against HEAD (staged changes).
pub const ARG_CACHED: &str = "--cached";

/// List paths instead of patch text.
pub const ARG_NAME_ONLY: &str = "--name-only";

/// One commit back from the current HEAD.
pub const ARG_HEAD_PREVIOUS: &str = "HEAD~1";

const ALLOWED_SUBCOMMANDS: &[&str] = &[GIT_DIFF];
const ALLOWED_ARGS: &[&str] = &[ARG_CACHED, ARG_NAME_ONLY, ARG_HEAD_PREVIOUS];

/// A git invocation that passed the allowlist.
///
/// Only [`GitGuard::authorize`] can build one, and it only ever stores the
/// allowlisted literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedCommand {
    subcommand: &'static str,
    args: Vec<&'static str>,
}

impl AllowedCommand {
    pub fn subcommand(&self) -> &'static str {
        self.subcommand
    }

    pub fn args(&self) -> &[&'static str] {
        &self.args
    }

    /// Arguments following the `git` program name.
    pub fn argv(&self) -> Vec<&'static str> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.subcommand);
        argv.extend(self.args.iter().copied());
        argv
    }
}

/// Raw result of a finished git process.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
}

/// Spawns the git process for an authorized command.
///
/// This abstraction allows the guard to be tested without a real git binary
/// and lets tests assert that rejected requests never reach a process.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    fn run(&self, command: &AllowedCommand) -> Result<RunOutput, GitError>;
}

/// Runner that spawns the system `git` binary.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    working_dir: Option<PathBuf>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run git inside `dir` instead of the process working directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: Some(dir.as_ref().to_path_buf()),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &AllowedCommand) -> Result<RunOutput, GitError> {
        let mut cmd = Command::new("git");
        cmd.args(command.argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::NotInstalled
            } else {
                GitError::SpawnFailed(e)
            }
        })?;

        Ok(RunOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: output.stdout,
        })
    }
}

/// Check that a `git` executable is reachable through PATH.
pub fn check_git_installed() -> Result<(), GitError> {
    which::which("git").map(|_| ()).map_err(|_| GitError::NotInstalled)
}

/// Validates git requests against the allowlist and executes them.
pub struct GitGuard<R> {
    runner: R,
}

impl<R: CommandRunner> GitGuard<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Validate a request without running anything.
    pub fn authorize(command_name: &str, args: &[&str]) -> Result<AllowedCommand, GitError> {
        let subcommand = ALLOWED_SUBCOMMANDS
            .iter()
            .copied()
            .find(|allowed| *allowed == command_name)
            .ok_or_else(|| GitError::UnauthorizedCommand(command_name.to_string()))?;

        let args = args
            .iter()
            .map(|arg| {
                ALLOWED_ARGS
                    .iter()
                    .copied()
                    .find(|allowed| allowed == arg)
                    .ok_or_else(|| GitError::UnauthorizedArgument((*arg).to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AllowedCommand { subcommand, args })
    }

    /// Run `git <command_name> <args..>` and return its stdout.
    ///
    /// The whole request is validated before the runner is touched; a single
    /// unknown token rejects it. Standard error is discarded and a non-zero
    /// exit is reported as [`GitError::CommandFailed`] without retrying.
    pub fn execute(&self, command_name: &str, args: &[&str]) -> Result<String, GitError> {
        let command = Self::authorize(command_name, args)?;
        debug!("Running git {}", command.argv().join(" "));

        let output = self.runner.run(&command)?;
        if !output.success {
            return Err(GitError::CommandFailed {
                exit_code: output.exit_code,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
