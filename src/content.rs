//! Entry content resolution: inlines each entry's backing file into the manifest.
//!
//! Entries are visited in manifest order. For each one the content path is derived
//! from its [`EntryKind`](crate::entry::EntryKind), anchored at [`ResolveOptions::base_dir`],
//! and read as UTF-8. The text is stored under a new `content` field; nothing else on
//! the entry is touched.
//!
//! A missing or unreadable file is a warning, not a failure, unless
//! [`ResolveOptions::strict`] is set.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::annotate;
use crate::entry::EntryRef;
use crate::error::PublishError;
use crate::manifest::Manifest;

pub const CONTENT_FIELD: &str = "content";

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Directory relative entry paths are resolved against.
    pub base_dir: PathBuf,
    /// Treat missing or unreadable entry files as fatal.
    pub strict: bool,
}

impl ResolveOptions {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        ResolveOptions {
            base_dir: base_dir.into(),
            strict: false,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// An entry that was left without content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub id: String,
    pub path: Option<PathBuf>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotFound,
    Unreadable(String),
    NoPath,
    /// The item in `entries` is not a JSON object.
    NotAnObject,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolveReport {
    /// Ids of entries whose content was inlined.
    pub loaded: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
}

enum ReadOutcome {
    Loaded(String),
    NotFound,
    Unreadable(io::Error),
}

/// Reads every entry's content file into its `content` field.
pub fn resolve_entries(
    manifest: &mut Manifest,
    options: &ResolveOptions,
) -> Result<ResolveReport, PublishError> {
    let mut report = ResolveReport::default();

    for (index, value) in manifest.entries_mut().enumerate() {
        let Some(object) = value.as_object_mut() else {
            let id = format!("entries[{index}]");
            skip(options, &mut report, id, None, SkipReason::NotAnObject)?;
            continue;
        };

        let entry = EntryRef::from_object(object);
        let id = entry.display_id().to_string();

        let Some(relative) = entry.content_path() else {
            skip(options, &mut report, id, None, SkipReason::NoPath)?;
            continue;
        };

        let absolute = options.base_dir.join(&relative);
        debug!(entry = %id, kind = ?entry.kind, path = %absolute.display(), "Resolved entry content path");

        match read_content(&absolute) {
            ReadOutcome::Loaded(text) => {
                println!("Reading content for {} from {}", id, relative.display());
                info!(entry = %id, path = %relative.display(), bytes = text.len(), "Entry content loaded");
                object.insert(CONTENT_FIELD.to_string(), Value::String(text));
                report.loaded.push(id);
            }
            ReadOutcome::NotFound => {
                skip(options, &mut report, id, Some(relative), SkipReason::NotFound)?;
            }
            ReadOutcome::Unreadable(e) => {
                let reason = SkipReason::Unreadable(e.to_string());
                skip(options, &mut report, id, Some(relative), reason)?;
            }
        }
    }

    info!(
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        "Entry content resolution finished"
    );
    Ok(report)
}

fn read_content(path: &Path) -> ReadOutcome {
    if !path.exists() {
        return ReadOutcome::NotFound;
    }
    match fs::read_to_string(path) {
        Ok(text) => ReadOutcome::Loaded(text),
        // Deleted between the existence check and the read.
        Err(e) if e.kind() == io::ErrorKind::NotFound => ReadOutcome::NotFound,
        Err(e) => ReadOutcome::Unreadable(e),
    }
}

fn skip(
    options: &ResolveOptions,
    report: &mut ResolveReport,
    id: String,
    path: Option<PathBuf>,
    reason: SkipReason,
) -> Result<(), PublishError> {
    let shown = path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    if options.strict {
        warn!(entry = %id, ?reason, "Entry content missing in strict mode");
        let detail = match &reason {
            SkipReason::NotFound => "file not found".to_string(),
            SkipReason::Unreadable(cause) => cause.clone(),
            SkipReason::NoPath => "entry has no path".to_string(),
            SkipReason::NotAnObject => "entry is not an object".to_string(),
        };
        return Err(PublishError::EntryContent {
            id,
            path: path.unwrap_or_default(),
            reason: detail,
        });
    }

    let message = match &reason {
        SkipReason::NotFound => {
            format!("File not found for entry {id}: {shown}. Content will be empty.")
        }
        SkipReason::Unreadable(cause) => {
            format!("Could not read file for entry {id}: {shown} ({cause}). Content will be empty.")
        }
        SkipReason::NoPath => format!("Entry {id} has no path. Content will be empty."),
        SkipReason::NotAnObject => {
            format!("Entry {id} is not an object and was left unchanged.")
        }
    };
    annotate::warning(&message);
    report.skipped.push(SkippedEntry { id, path, reason });
    Ok(())
}
