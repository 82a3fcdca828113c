use std::io;

/// Custom error type for post-receive-ci operations
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Git operation failed: {operation}\n{message}")]
    GitOperationFailed { operation: String, message: String },

    #[error("'{path}' does not exist at revision {revision}")]
    PathNotFoundAtRevision { revision: String, path: String },

    #[error("Malformed hook input: {0}")]
    MalformedInput(String),

    #[error("Missing credential: no {0} found")]
    MissingCredential(&'static str),

    #[error("Unexpected response from {backend}: {status}\n{body}")]
    UnexpectedStatus {
        backend: &'static str,
        status: u16,
        body: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Helper type for Results that use HookError
pub type Result<T> = std::result::Result<T, HookError>;
