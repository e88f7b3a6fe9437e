//! The submission body sent to the registry.

use serde::Serialize;

use crate::manifest::Manifest;

/// `{ repo, commit, config }`, where `config` is the whole enriched manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub repo: String,
    pub commit: String,
    pub config: Manifest,
}

impl SubmissionPayload {
    pub fn new(repo: impl Into<String>, commit: impl Into<String>, config: Manifest) -> Self {
        SubmissionPayload {
            repo: repo.into(),
            commit: commit.into(),
            config,
        }
    }
}
