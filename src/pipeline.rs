//! The post-receive pipeline: gate, gather, dispatch, report.

use std::env;
use std::io::BufRead;
use std::str::FromStr;

use tracing::{info, warn};

use crate::backends::{self, Buildkite, CiBackend, Tekton};
use crate::config::CiConfig;
use crate::error::{HookError, Result};
use crate::git::{GitCli, repo_name_from_dir};
use crate::metadata::CommitMetadata;
use crate::options::{PushOptions, SKIP_OPTION};
use crate::report;

/// One updated ref as reported on the hook's stdin:
/// `<old-rev> <new-rev> <ref-name>`. Only the first line is consumed; a push
/// updating several refs triggers CI for the first one only.
#[derive(Debug, Clone, PartialEq)]
pub struct PushEvent {
    pub old_rev: String,
    pub new_rev: String,
    pub ref_name: String,
}

impl FromStr for PushEvent {
    type Err = HookError;

    fn from_str(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(old_rev), Some(new_rev), Some(ref_name)) => Ok(Self {
                old_rev: old_rev.to_string(),
                new_rev: new_rev.to_string(),
                ref_name: ref_name.to_string(),
            }),
            _ => Err(HookError::MalformedInput(format!(
                "expected '<old-rev> <new-rev> <ref-name>', got {line:?}"
            ))),
        }
    }
}

/// Backend credentials and endpoints, resolved from the environment exactly
/// once at pipeline start. Each adapter is enabled by the presence of its own
/// variables; any combination may be set.
#[derive(Debug, Default, Clone)]
pub struct BackendEnv {
    pub buildkite_org: Option<String>,
    pub buildkite_token: Option<String>,
    pub tekton_endpoint: Option<String>,
}

impl BackendEnv {
    pub fn from_env() -> Self {
        Self {
            buildkite_org: env::var("BUILDKITE_ORG_SLUG").ok(),
            buildkite_token: env::var("BUILDKITE_API_TOKEN").ok(),
            tekton_endpoint: env::var("TEKTON_TRIGGERS_ENDPOINT").ok(),
        }
    }

    /// The fixed adapter list, in report order.
    pub fn backends(&self) -> Vec<Box<dyn CiBackend>> {
        vec![
            Box::new(Buildkite::new(
                self.buildkite_org.clone(),
                self.buildkite_token.clone(),
            )),
            Box::new(Tekton::new(self.tekton_endpoint.clone())),
        ]
    }
}

/// Runs the whole hook against the current working directory and stdin.
/// Returns `Ok` on skip and on completion even when every backend failed;
/// only a metadata failure (or unreadable input) is fatal.
pub async fn run() -> Result<()> {
    let options = PushOptions::from_env();
    if options.skip_requested() {
        info!("Skipping CI: push option {} set", SKIP_OPTION);
        return Ok(());
    }

    let cwd = env::current_dir()?;
    let repo_name = repo_name_from_dir(&cwd);

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let event: PushEvent = line.parse()?;

    let env = BackendEnv::from_env();
    let report = run_push(&GitCli::new(cwd), &repo_name, &event, &env).await?;
    print!("{report}");
    Ok(())
}

/// The pipeline proper, separated from process-level I/O: metadata (fatal on
/// error), then revision-pinned config (soft), then independent dispatch to
/// every backend, then the rendered report.
pub async fn run_push(
    git: &GitCli,
    repo_name: &str,
    event: &PushEvent,
    env: &BackendEnv,
) -> Result<String> {
    let meta = CommitMetadata::collect(git, repo_name, event).await?;
    info!(
        "Dispatching CI for {}@{} ({})",
        meta.repo, meta.branch, meta.commit
    );

    let config = CiConfig::load(git, &event.new_rev).await;
    if config != CiConfig::default() {
        info!("Using committed CI config: {:?}", config);
    }

    let client = reqwest::Client::new();
    let results = backends::dispatch(&client, &env.backends(), &meta, &config).await;
    for result in &results {
        if !result.succeeded {
            warn!("{} trigger failed: {}", result.backend, result.summary);
        }
    }
    Ok(report::render(&results))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hook_input_line() {
        let event: PushEvent = "0000 abc123 refs/heads/main".parse().unwrap();
        assert_eq!(event.old_rev, "0000");
        assert_eq!(event.new_rev, "abc123");
        assert_eq!(event.ref_name, "refs/heads/main");
    }

    #[test]
    fn tolerates_trailing_whitespace_and_newline() {
        let event: PushEvent = "0000 abc123 refs/heads/main\n".parse().unwrap();
        assert_eq!(event.ref_name, "refs/heads/main");
    }

    #[test]
    fn rejects_short_input() {
        assert!("0000 abc123".parse::<PushEvent>().is_err());
        assert!("".parse::<PushEvent>().is_err());
    }

    #[test]
    fn backend_list_is_buildkite_then_tekton() {
        let env = BackendEnv::default();
        let names: Vec<_> = env.backends().iter().map(|b| b.name()).collect();
        assert_eq!(names, ["buildkite", "tekton"]);
    }
}
