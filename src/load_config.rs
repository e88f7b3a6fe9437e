//! `load_config` module: resolves the publish configuration from environment variables.
//!
//! This is the only place the process environment is consulted. The result is an immutable
//! [`PublishConfig`] that the CLI hands down to every later step, so no other module reads
//! ambient state.
//!
//! # Variables
//! - `REGISTRY_API`: publish endpoint, optional, defaults to [`DEFAULT_REGISTRY_API`]
//! - `OIDC_TOKEN`: bearer token, required
//! - `GITHUB_REPOSITORY`: repository identifier, required
//! - `GITHUB_SHA`: commit identifier, required
//!
//! Empty values are treated as unset.

use std::time::Duration;

use reqwest::Url;
use tracing::{error, info};

use crate::error::PublishError;

pub const DEFAULT_REGISTRY_API: &str = "https://nuxt.ineceper.my.id/api/v1/publish";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_REGISTRY_API: &str = "REGISTRY_API";
pub const ENV_TOKEN: &str = "OIDC_TOKEN";
pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_COMMIT: &str = "GITHUB_SHA";

#[derive(Clone)]
pub struct PublishConfig {
    pub endpoint: Url,
    pub token: String,
    pub repository: String,
    pub commit: String,
    /// Upper bound for the whole request/response exchange.
    pub timeout: Duration,
}

// The token never reaches logs or debug output.
impl std::fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &"<redacted>")
            .field("repository", &self.repository)
            .field("commit", &self.commit)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PublishConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Builds a [`PublishConfig`] from a variable lookup.
///
/// Required variables are checked in a fixed order (`OIDC_TOKEN`, `GITHUB_REPOSITORY`,
/// `GITHUB_SHA`) and the first missing one is reported.
pub fn load_config<F>(lookup: F) -> Result<PublishConfig, PublishError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

    let require = |name: &'static str| {
        var(name).ok_or_else(|| {
            error!(var = name, "Required environment variable not set");
            PublishError::MissingEnv(name)
        })
    };

    let token = require(ENV_TOKEN)?;
    let repository = require(ENV_REPOSITORY)?;
    let commit = require(ENV_COMMIT)?;

    let raw_endpoint = var(ENV_REGISTRY_API).unwrap_or_else(|| DEFAULT_REGISTRY_API.to_string());
    let endpoint = parse_endpoint(&raw_endpoint)?;

    info!(
        endpoint = %endpoint,
        repository = %repository,
        commit = %commit,
        "Publish configuration resolved"
    );

    Ok(PublishConfig {
        endpoint,
        token,
        repository,
        commit,
        timeout: DEFAULT_TIMEOUT,
    })
}

/// Reads the configuration from the process environment.
pub fn load_config_from_env() -> Result<PublishConfig, PublishError> {
    load_config(|name| std::env::var(name).ok())
}

fn parse_endpoint(raw: &str) -> Result<Url, PublishError> {
    let url = Url::parse(raw).map_err(|e| PublishError::InvalidEndpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err(PublishError::InvalidEndpoint {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        }),
        other => Err(PublishError::InvalidEndpoint {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
