use clap::Parser;
use rulebix_publish::annotate;
use rulebix_publish::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing for the CLI; stdout is reserved for progress and payload output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Help and version output keep clap's own stream and exit code.
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            annotate::error(e.to_string().trim());
            std::process::exit(1);
        }
    };
    tracing::info!("CLI arguments parsed, invoking run");

    match run(cli).await {
        Ok(outcome) => {
            tracing::info!(?outcome, "CLI completed successfully");
        }
        Err(e) => {
            annotate::error(&format!("{e:#}"));
            std::process::exit(1);
        }
    }
}
