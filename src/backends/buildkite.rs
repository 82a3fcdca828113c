//! Buildkite REST-trigger adapter.

use serde::{Deserialize, Serialize};

use crate::config::CiConfig;
use crate::error::{HookError, Result};
use crate::metadata::CommitMetadata;

use super::{CiBackend, TriggerRequest};

const API_HOST: &str = "api.buildkite.com";

/// Triggers a build through Buildkite's REST API. Enabled only when both the
/// organization slug and the API token are present in the environment.
#[derive(Debug, Clone)]
pub struct Buildkite {
    org: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct BuildPayload<'a> {
    commit: &'a str,
    branch: &'a str,
    message: &'a str,
    author: Author<'a>,
}

#[derive(Debug, Serialize)]
struct Author<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct BuildResponse {
    web_url: String,
    state: String,
}

impl Buildkite {
    pub fn new(org: Option<String>, token: Option<String>) -> Self {
        Self { org, token }
    }
}

impl CiBackend for Buildkite {
    fn name(&self) -> &'static str {
        "buildkite"
    }

    fn build_request(&self, meta: &CommitMetadata, _config: &CiConfig) -> Result<TriggerRequest> {
        let org = self
            .org
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(HookError::MissingCredential("BUILDKITE_ORG_SLUG"))?;
        let token = self
            .token
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(HookError::MissingCredential("BUILDKITE_API_TOKEN"))?;

        let payload = BuildPayload {
            commit: &meta.commit,
            branch: &meta.branch,
            message: &meta.message,
            author: Author {
                name: &meta.author_name,
                email: &meta.author_email,
            },
        };

        Ok(TriggerRequest {
            url: format!(
                "https://{API_HOST}/v2/organizations/{org}/pipelines/{}/builds",
                sanitize_repo_name(&meta.repo)
            ),
            body: serde_json::to_value(&payload)?,
            bearer_token: Some(token.to_string()),
        })
    }

    fn parse_response(&self, body: &[u8]) -> Result<String> {
        let response: BuildResponse = serde_json::from_slice(body)?;
        Ok(format!("{}:\t{}", response.state, response.web_url))
    }
}

/// Buildkite pipeline slugs reserve `.`, so every literal dot in the
/// repository name becomes `-dot-`. Nothing else changes.
pub fn sanitize_repo_name(name: &str) -> String {
    name.replace('.', "-dot-")
}
