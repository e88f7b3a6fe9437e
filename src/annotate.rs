//! GitHub Actions workflow-command annotations.
//!
//! Lines written here are picked up by the runner and shown on the job summary.
//! Both go to stderr; progress output stays on stdout.

use tracing::{error, warn};

pub fn warning(message: &str) {
    warn!(annotation = "warning", "{message}");
    eprintln!("{}", format_annotation("warning", message));
}

pub fn error(message: &str) {
    error!(annotation = "error", "{message}");
    eprintln!("{}", format_annotation("error", message));
}

/// Formats one workflow-command line. Newlines are escaped so the whole
/// message stays on a single annotation.
pub fn format_annotation(level: &str, message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::{level}::{escaped}")
}
