//! Error taxonomy for a publish run.
//!
//! Every fatal condition of the pipeline maps to one variant. The `Display`
//! text is what ends up on the `::error::` annotation line, so it is kept
//! short and free of debug formatting.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    /// A required environment variable is unset or empty.
    #[error("{0} is not set.")]
    MissingEnv(&'static str),

    /// The registry endpoint is not an absolute http(s) URL.
    #[error("REGISTRY_API is not a valid http(s) URL ({url}): {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("{} not found in repository root.", path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("Failed to read {}: {error}", path.display())]
    ManifestRead {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to parse {}: {error}", path.display())]
    ManifestParse {
        path: PathBuf,
        error: serde_json::Error,
    },

    /// Entry content could not be loaded while running in strict mode.
    #[error("Content for entry {id} could not be loaded from {}: {reason}", path.display())]
    EntryContent {
        id: String,
        path: PathBuf,
        reason: String,
    },

    /// The HTTP client itself could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// No response was received (DNS, connect, reset, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A response was received with a status outside 200..300.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },
}

impl PublishError {
    pub fn is_network(&self) -> bool {
        matches!(self, PublishError::Network(_))
    }

    /// HTTP status of an API rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            PublishError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
