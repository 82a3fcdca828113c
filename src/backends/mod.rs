//! CI backend adapters and the dispatch driver that isolates their failures.

pub mod buildkite;
pub mod tekton;

use tracing::{debug, error};

use crate::config::CiConfig;
use crate::error::{HookError, Result};
use crate::metadata::CommitMetadata;

pub use buildkite::Buildkite;
pub use tekton::Tekton;

/// A fully prepared trigger call: where to POST, what JSON to send, and
/// whether to attach a bearer token. Building one performs no I/O.
#[derive(Debug, Clone)]
pub struct TriggerRequest {
    pub url: String,
    pub body: serde_json::Value,
    pub bearer_token: Option<String>,
}

/// The capability set every CI backend implements: construct the request from
/// the shared commit metadata, and turn a 2xx response body into the one-line
/// summary shown to the pusher.
pub trait CiBackend {
    fn name(&self) -> &'static str;

    /// Fails when required credentials are absent; no network call is made in
    /// that case.
    fn build_request(&self, meta: &CommitMetadata, config: &CiConfig) -> Result<TriggerRequest>;

    fn parse_response(&self, body: &[u8]) -> Result<String>;
}

/// Outcome of one backend trigger. Failures of any kind end up here instead
/// of propagating: a downed or misconfigured backend must not fail the push
/// or suppress the other backends.
#[derive(Debug, Clone)]
pub struct BackendResult {
    pub backend: &'static str,
    pub succeeded: bool,
    pub summary: String,
}

impl BackendResult {
    fn ok(backend: &'static str, summary: String) -> Self {
        Self {
            backend,
            succeeded: true,
            summary,
        }
    }

    fn failed(backend: &'static str, error: &HookError) -> Self {
        Self {
            backend,
            succeeded: false,
            summary: error.to_string(),
        }
    }
}

/// Runs one adapter end to end and captures its outcome. Every error path,
/// including a non-2xx response, converges on a failed `BackendResult`.
pub async fn run_backend(
    client: &reqwest::Client,
    backend: &dyn CiBackend,
    meta: &CommitMetadata,
    config: &CiConfig,
) -> BackendResult {
    let name = backend.name();
    match trigger(client, backend, meta, config).await {
        Ok(summary) => BackendResult::ok(name, summary),
        Err(e) => {
            error!("Send to {} failed: {}", name, e);
            BackendResult::failed(name, &e)
        }
    }
}

async fn trigger(
    client: &reqwest::Client,
    backend: &dyn CiBackend,
    meta: &CommitMetadata,
    config: &CiConfig,
) -> Result<String> {
    let request = backend.build_request(meta, config)?;

    let mut builder = client.post(&request.url).json(&request.body);
    if let Some(token) = &request.bearer_token {
        builder = builder.bearer_auth(token);
    }

    let response = builder.send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(HookError::UnexpectedStatus {
            backend: backend.name(),
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).trim().to_string(),
        });
    }

    let summary = backend.parse_response(&body)?;
    debug!("{} accepted trigger: {}", backend.name(), summary);
    Ok(summary)
}

/// Runs every configured adapter in order. Adapters share no mutable state;
/// one outcome per adapter is always produced.
pub async fn dispatch(
    client: &reqwest::Client,
    backends: &[Box<dyn CiBackend>],
    meta: &CommitMetadata,
    config: &CiConfig,
) -> Vec<BackendResult> {
    let mut results = Vec::with_capacity(backends.len());
    for backend in backends {
        results.push(run_backend(client, backend.as_ref(), meta, config).await);
    }
    results
}
