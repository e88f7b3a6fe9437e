#![doc = "Publisher: submits the payload to the registry over HTTP(S) with bearer authentication."]
//
//! # Publisher
//!
//! The [`Publisher`] trait is the seam between the pipeline and the network. The pipeline only
//! needs "send this payload, give me the response body or an error", so tests can swap in the
//! `mockall`-generated `MockPublisher` and never open a socket.
//!
//! [`RegistryClient`] is the real implementation, built on `reqwest`:
//! - one POST per call, no retries, redirects are not followed
//! - `Authorization: Bearer <token>`, `Content-Type: application/json`, fixed user agent
//! - bounded by the configured timeout
//! - any 2xx status resolves with the body text, anything else is [`PublishError::Api`]
//! - failures before a response arrives are [`PublishError::Network`]

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Url;
use tracing::{debug, error, info};

use crate::error::PublishError;
use crate::load_config::PublishConfig;
use crate::payload::SubmissionPayload;

pub const USER_AGENT: &str = "Rulebix-Publish-Action";

/// Sends a submission payload somewhere and reports the outcome.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Submit `payload`, returning the registry's response body on success.
    async fn publish(&self, payload: &SubmissionPayload) -> Result<String, PublishError>;
}

pub struct RegistryClient {
    client: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl RegistryClient {
    pub fn new(config: &PublishConfig) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build HTTP client");
                PublishError::Client(error_chain(&e))
            })?;

        info!(
            endpoint = %config.endpoint,
            timeout_secs = config.timeout.as_secs(),
            "Initialised registry client"
        );

        Ok(RegistryClient {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl Publisher for RegistryClient {
    async fn publish(&self, payload: &SubmissionPayload) -> Result<String, PublishError> {
        debug!(endpoint = %self.endpoint, repo = %payload.repo, "Posting publish payload");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Publish request failed before a response was received");
                PublishError::Network(error_chain(&e))
            })?;

        let status = response.status();
        let text = response
            .bytes()
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(|e| {
                error!(error = ?e, %status, "Failed to read registry response body");
                PublishError::Network(error_chain(&e))
            })?;

        if status.is_success() {
            info!(status = status.as_u16(), "Registry accepted publish request");
            Ok(text)
        } else {
            error!(status = status.as_u16(), body = %text, "Registry rejected publish request");
            Err(PublishError::Api {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}

/// Flattens an error and its sources into one line, outermost first.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
