//! Repository-embedded CI configuration, read at the pushed revision.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::git::GitCli;

/// Well-known config path inside the repository.
pub const CI_CONFIG_PATH: &str = "ci.toml";

/// Per-repository CI overrides committed alongside the code. Read at the new
/// revision, so the config honored is exactly the one in the pushed commit.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct CiConfig {
    #[serde(default)]
    pub tekton: TektonSection,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TektonSection {
    /// Pipeline-name override, consumed only by the Tekton payload.
    pub pipeline: Option<String>,
}

impl CiConfig {
    /// Loads `ci.toml` as of `revision`. Most repositories do not carry one,
    /// so absence and decode failures are soft: a warning and the default
    /// config, never an abort.
    pub async fn load(git: &GitCli, revision: &str) -> Self {
        let bytes = match git.read_file_at_revision(revision, CI_CONFIG_PATH).await {
            Ok(b) => b,
            Err(e) => {
                warn!("Failed to get {}: {}", CI_CONFIG_PATH, e);
                return Self::default();
            }
        };
        match Self::parse(&bytes) {
            Ok(config) => {
                debug!("Loaded {} at {}: {:?}", CI_CONFIG_PATH, revision, config);
                config
            }
            Err(e) => {
                warn!("Failed to parse {}: {}", CI_CONFIG_PATH, e);
                Self::default()
            }
        }
    }

    fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(toml::from_str(text)?)
    }
}
