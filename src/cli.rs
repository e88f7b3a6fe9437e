use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::content::ResolveOptions;
use crate::load_config::load_config_from_env;
use crate::manifest::DEFAULT_MANIFEST_FILE;
use crate::publish::{prepare, publish, PublishJob};
use crate::upload::RegistryClient;

/// CLI for rulebix-publish: inline entry content into spec.json and publish it.
#[derive(Parser, Debug)]
#[clap(
    name = "rulebix-publish",
    version,
    about = "Publish a repository's spec.json, with entry content inlined, to the Rulebix registry",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Options used when no subcommand is given
    #[clap(flatten)]
    pub publish: PublishArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve entry content and submit the manifest (the default)
    Publish(PublishArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// Path to the manifest, relative to the working directory
    #[clap(long, default_value = DEFAULT_MANIFEST_FILE)]
    pub manifest: PathBuf,

    /// Request timeout in seconds
    #[clap(long, env = "PUBLISH_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Fail when an entry's content file is missing or unreadable
    #[clap(long)]
    pub strict: bool,

    /// Build and print the payload without sending it
    #[clap(long)]
    pub dry_run: bool,

    /// Load additional environment variables from this file first
    #[clap(long)]
    pub env_file: Option<PathBuf>,
}

/// What a successful run did.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Published,
    DryRun,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<Outcome> {
    let args = match cli.command {
        Some(Commands::Publish(args)) => args,
        None => cli.publish,
    };

    if let Some(env_file) = &args.env_file {
        dotenvy::from_path(env_file)
            .with_context(|| format!("Failed to load env file {}", env_file.display()))?;
        tracing::info!(env_file = %env_file.display(), "Loaded environment file");
    }

    // Configuration gates everything else: no file or network access before this succeeds.
    let config = load_config_from_env()?.with_timeout(Duration::from_secs(args.timeout_secs));

    let base_dir = std::env::current_dir().context("Failed to determine working directory")?;
    let job = PublishJob {
        // Relative manifest paths resolve against the working directory.
        manifest_path: args.manifest.clone(),
        resolve: ResolveOptions::new(base_dir).strict(args.strict),
    };

    if args.dry_run {
        let prepared = prepare(&config, &job)?;
        let rendered = serde_json::to_string_pretty(&prepared.payload)
            .context("Failed to render payload")?;
        println!("{rendered}");
        tracing::info!(entries = prepared.entries, "Dry run complete, nothing sent");
        return Ok(Outcome::DryRun);
    }

    let client = RegistryClient::new(&config)?;
    let report = publish(&config, &job, &client).await?;
    tracing::info!(
        entries = report.entries,
        loaded = report.loaded,
        skipped = report.skipped,
        "Publish complete"
    );
    println!("Successfully published to Rulebix Registry.");
    Ok(Outcome::Published)
}
