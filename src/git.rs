//! Thin wrappers around the `git` binary for reading the pushed revision.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use crate::error::{HookError, Result};

/// Revision reader bound to one repository directory. Every operation shells
/// out to `git` and fails with the tool's combined output on non-zero exit.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// Resolves a ref name (e.g. `refs/heads/main`) to its short branch name.
    pub async fn resolve_ref_to_branch(&self, ref_name: &str) -> Result<String> {
        let out = self.run(&["rev-parse", "--abbrev-ref", ref_name]).await?;
        Ok(String::from_utf8_lossy(&out).trim().to_string())
    }

    /// Reads a single formatted field of a commit, e.g. `%an` for the author
    /// name or `%B` for the full message.
    pub async fn commit_field(&self, commit: &str, format: &str) -> Result<String> {
        let format_arg = format!("--format={format}");
        let out = self.run(&["log", "-1", commit, &format_arg, "--"]).await?;
        Ok(String::from_utf8_lossy(&out).trim().to_string())
    }

    /// Reads a file's bytes as they existed at the given revision, never from
    /// the working copy. A path missing at that revision is reported
    /// distinctly from other git failures.
    pub async fn read_file_at_revision(&self, revision: &str, path: &str) -> Result<Vec<u8>> {
        let object = format!("{revision}:{path}");
        match self.run(&["cat-file", "-p", &object]).await {
            Ok(bytes) => Ok(bytes),
            Err(HookError::GitOperationFailed { message, .. }) if is_missing_object(&message) => {
                Err(HookError::PathNotFoundAtRevision {
                    revision: revision.to_string(),
                    path: path.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        debug!("Running (cwd = '{}'): git {}", self.repo_dir.display(), args.join(" "));
        let output = Command::new("git")
            .current_dir(&self.repo_dir)
            .args(args)
            .output()
            .await?;
        if !output.status.success() {
            let mut combined = output.stdout;
            combined.extend_from_slice(&output.stderr);
            return Err(HookError::GitOperationFailed {
                operation: format!("git {}", args.join(" ")),
                message: String::from_utf8_lossy(&combined).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

/// Repository name for the hook's working directory: the directory basename
/// with the bare-repo `.git` suffix stripped.
pub fn repo_name_from_dir(dir: &Path) -> String {
    let base = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.strip_suffix(".git").unwrap_or(&base).to_string()
}

// git's wording differs between object-not-found and path-not-in-tree.
fn is_missing_object(message: &str) -> bool {
    message.contains("does not exist in")
        || message.contains("Not a valid object name")
        || message.contains("exists on disk, but not in")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_name_strips_bare_suffix() {
        assert_eq!(repo_name_from_dir(Path::new("/srv/git/my-repo.git")), "my-repo");
        assert_eq!(repo_name_from_dir(Path::new("/srv/git/my-repo")), "my-repo");
    }

    #[test]
    fn repo_name_strips_only_trailing_suffix() {
        assert_eq!(repo_name_from_dir(Path::new("/srv/git.gitlab/repo.git")), "repo");
    }

    #[test]
    fn classifies_missing_object_messages() {
        assert!(is_missing_object("fatal: path 'ci.toml' does not exist in 'abc123'"));
        assert!(is_missing_object("fatal: Not a valid object name abc123:ci.toml"));
        assert!(!is_missing_object("fatal: not a git repository"));
    }
}
