//! Tekton Triggers webhook adapter.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CiConfig;
use crate::error::{HookError, Result};
use crate::metadata::CommitMetadata;

use super::{CiBackend, TriggerRequest};

/// Posts the push event to a Tekton EventListener. Enabled only when the
/// endpoint URL is present in the environment; the listener needs no auth
/// header.
#[derive(Debug, Clone)]
pub struct Tekton {
    endpoint: Option<String>,
}

#[derive(Debug, Serialize)]
struct EventPayload<'a> {
    repo: &'a str,
    branch: &'a str,
    commit: &'a str,
    message: &'a str,
    author: &'a str,
    email: &'a str,
    #[serde(rename = "tektonPipeline", skip_serializing_if = "Option::is_none")]
    tekton_pipeline: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
struct EventResponse {
    #[serde(rename = "eventListenerUID", default)]
    event_listener_uid: String,
    #[serde(rename = "eventID", default)]
    event_id: String,
}

impl Tekton {
    pub fn new(endpoint: Option<String>) -> Self {
        Self { endpoint }
    }
}

impl CiBackend for Tekton {
    fn name(&self) -> &'static str {
        "tekton"
    }

    fn build_request(&self, meta: &CommitMetadata, config: &CiConfig) -> Result<TriggerRequest> {
        let endpoint = self
            .endpoint
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(HookError::MissingCredential("TEKTON_TRIGGERS_ENDPOINT"))?;

        let payload = EventPayload {
            repo: &meta.repo,
            branch: &meta.branch,
            commit: &meta.commit,
            message: &meta.message,
            author: &meta.author_name,
            email: &meta.author_email,
            tekton_pipeline: config.tekton.pipeline.as_deref(),
        };

        Ok(TriggerRequest {
            url: endpoint.to_string(),
            body: serde_json::to_value(&payload)?,
            bearer_token: None,
        })
    }

    fn parse_response(&self, body: &[u8]) -> Result<String> {
        let response: EventResponse = serde_json::from_slice(body)?;
        debug!(
            "Tekton accepted event: listener={} event={}",
            response.event_listener_uid, response.event_id
        );
        Ok(format!("event-id:\t{}", response.event_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TektonSection;

    fn fixture() -> CommitMetadata {
        CommitMetadata {
            repo: "my-repo".to_string(),
            branch: "main".to_string(),
            commit: "abc123".to_string(),
            message: "fix bug".to_string(),
            author_name: "Jane Doe".to_string(),
            author_email: "jane@example.com".to_string(),
        }
    }

    #[test]
    fn payload_omits_pipeline_when_unset() {
        let backend = Tekton::new(Some("https://tekton.local/hook".into()));
        let request = backend.build_request(&fixture(), &CiConfig::default()).unwrap();
        assert_eq!(
            serde_json::to_string(&request.body).unwrap(),
            r#"{"repo":"my-repo","branch":"main","commit":"abc123","message":"fix bug","author":"Jane Doe","email":"jane@example.com"}"#
        );
        assert!(request.bearer_token.is_none());
    }

    #[test]
    fn payload_carries_pipeline_override() {
        let backend = Tekton::new(Some("https://tekton.local/hook".into()));
        let config = CiConfig {
            tekton: TektonSection {
                pipeline: Some("deploy".to_string()),
            },
        };
        let request = backend.build_request(&fixture(), &config).unwrap();
        assert_eq!(request.body["tektonPipeline"], "deploy");
    }

    #[test]
    fn missing_endpoint_fails_before_any_network() {
        let backend = Tekton::new(None);
        assert!(matches!(
            backend.build_request(&fixture(), &CiConfig::default()),
            Err(HookError::MissingCredential("TEKTON_TRIGGERS_ENDPOINT"))
        ));
    }

    #[test]
    fn response_summary_is_event_id() {
        let backend = Tekton::new(Some("https://tekton.local/hook".into()));
        let summary = backend.parse_response(br#"{"eventID":"e1"}"#).unwrap();
        assert_eq!(summary, "event-id:\te1");
    }

    #[test]
    fn response_fields_tolerate_absence() {
        let backend = Tekton::new(Some("https://tekton.local/hook".into()));
        let summary = backend
            .parse_response(br#"{"eventListenerUID":"u1"}"#)
            .unwrap();
        assert_eq!(summary, "event-id:\t");
    }
}
