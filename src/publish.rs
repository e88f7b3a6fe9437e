//! High-level pipeline: manifest load → entry content resolution → payload → submission.
//!
//! [`prepare`] does everything up to (and including) building the payload and touches only the
//! filesystem. [`publish`] runs `prepare` and hands the payload to a [`Publisher`]. Each step
//! fails fast: the first error is returned and nothing after it runs, so a broken manifest never
//! reaches the network.
//!
//! The configuration is passed in explicitly; nothing here reads the process environment.

use std::path::PathBuf;

use tracing::{error, info};

use crate::content::{resolve_entries, ResolveOptions, ResolveReport};
use crate::error::PublishError;
use crate::load_config::PublishConfig;
use crate::manifest::load_manifest;
use crate::payload::SubmissionPayload;
use crate::upload::Publisher;

/// Where to find the manifest and how to resolve its entries.
#[derive(Debug, Clone)]
pub struct PublishJob {
    pub manifest_path: PathBuf,
    pub resolve: ResolveOptions,
}

/// A payload ready to send, together with what happened while building it.
#[derive(Debug)]
pub struct PreparedPublish {
    pub payload: SubmissionPayload,
    pub entries: usize,
    pub resolve: ResolveReport,
}

#[derive(Debug)]
pub struct PublishReport {
    pub entries: usize,
    pub loaded: usize,
    pub skipped: usize,
    /// Response body returned by the registry, unparsed.
    pub response: String,
}

pub fn prepare(config: &PublishConfig, job: &PublishJob) -> Result<PreparedPublish, PublishError> {
    let mut manifest = load_manifest(&job.manifest_path)?;
    let entries = manifest.entry_count();

    let resolve = resolve_entries(&mut manifest, &job.resolve)?;
    info!(
        entries,
        loaded = resolve.loaded.len(),
        skipped = resolve.skipped.len(),
        "[PUBLISH] Entries resolved"
    );

    let payload = SubmissionPayload::new(config.repository.clone(), config.commit.clone(), manifest);

    Ok(PreparedPublish {
        payload,
        entries,
        resolve,
    })
}

pub async fn publish<P>(
    config: &PublishConfig,
    job: &PublishJob,
    publisher: &P,
) -> Result<PublishReport, PublishError>
where
    P: Publisher + ?Sized,
{
    info!(repository = %config.repository, commit = %config.commit, "[PUBLISH] Starting publish pipeline");
    let prepared = prepare(config, job)?;

    println!("Sending publish request to {}...", config.endpoint);
    let response = match publisher.publish(&prepared.payload).await {
        Ok(body) => {
            info!(response_len = body.len(), "[PUBLISH] Registry accepted payload");
            body
        }
        Err(e) => {
            error!(error = %e, "[PUBLISH][ERROR] Submission failed");
            return Err(e);
        }
    };

    Ok(PublishReport {
        entries: prepared.entries,
        loaded: prepared.resolve.loaded.len(),
        skipped: prepared.resolve.skipped.len(),
        response,
    })
}
