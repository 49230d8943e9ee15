//! Persisting a generated message for `git commit` to pick up.

use std::io::Write;
use std::path::{Path, PathBuf};

use git2::Repository;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::commit::message::CommitMessage;
use crate::error::HookError;

/// File git reads the pending commit message from.
pub const COMMIT_EDITMSG: &str = "COMMIT_EDITMSG";

/// Write `message` to `<git-dir>/COMMIT_EDITMSG` of the repository containing
/// `repo_dir`, replacing any previous content.
///
/// The git directory is discovered rather than assumed to be `.git`, so
/// linked worktrees and submodules write to the right place. The file is
/// written to a temporary sibling first and renamed into place.
pub fn write_commit_message(
    repo_dir: &Path,
    message: &CommitMessage,
) -> Result<PathBuf, HookError> {
    let repo = Repository::discover(repo_dir).map_err(HookError::RepositoryNotFound)?;
    let git_dir = repo.path();
    let target = git_dir.join(COMMIT_EDITMSG);

    let mut file = NamedTempFile::new_in(git_dir).map_err(HookError::WriteFailed)?;
    file.write_all(message.as_str().as_bytes())
        .map_err(HookError::WriteFailed)?;
    file.write_all(b"\n").map_err(HookError::WriteFailed)?;
    file.persist(&target)
        .map_err(|e| HookError::WriteFailed(e.error))?;

    debug!("Wrote commit message to {}", target.display());
    Ok(target)
}
