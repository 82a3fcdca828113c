//! Commit metadata gathered once for the pushed revision.

use crate::error::Result;
use crate::git::GitCli;
use crate::pipeline::PushEvent;

/// Everything the CI backends need to know about the pushed commit. Built
/// exactly once per invocation and shared read-only by every backend; adapters
/// never query git themselves.
#[derive(Debug, Clone)]
pub struct CommitMetadata {
    pub repo: String,
    pub branch: String,
    pub commit: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
}

impl CommitMetadata {
    /// Populates every field from the new revision of the push. Any git
    /// failure here is fatal for the whole hook: without commit identity
    /// there is nothing meaningful to dispatch.
    pub async fn collect(git: &GitCli, repo_name: &str, event: &PushEvent) -> Result<Self> {
        let branch = git.resolve_ref_to_branch(&event.ref_name).await?;
        let message = git.commit_field(&event.new_rev, "%B").await?;
        let author_name = git.commit_field(&event.new_rev, "%an").await?;
        let author_email = git.commit_field(&event.new_rev, "%ae").await?;

        Ok(Self {
            repo: repo_name.to_string(),
            branch,
            commit: event.new_rev.clone(),
            message,
            author_name,
            author_email,
        })
    }
}
