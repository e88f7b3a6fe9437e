//! Manifest loading: reads `spec.json` and keeps it as an untyped JSON document.
//!
//! Only `entries` is interpreted; every other top-level field is carried through
//! to the payload unchanged.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::PublishError;

pub const DEFAULT_MANIFEST_FILE: &str = "spec.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    document: Value,
}

impl Manifest {
    pub fn from_value(document: Value) -> Self {
        Manifest { document }
    }

    /// Number of entries, counting a missing or non-array `entries` field as zero.
    pub fn entry_count(&self) -> usize {
        self.entries().map_or(0, |entries| entries.len())
    }

    pub fn entries(&self) -> Option<&Vec<Value>> {
        self.document.get("entries").and_then(Value::as_array)
    }

    /// All entry values in manifest order, objects or not.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.document
            .get_mut("entries")
            .and_then(Value::as_array_mut)
            .into_iter()
            .flatten()
    }

    pub fn as_value(&self) -> &Value {
        &self.document
    }

    pub fn into_value(self) -> Value {
        self.document
    }
}

/// Reads and parses the manifest at `path`.
///
/// Fails with [`PublishError::ManifestNotFound`] when the file is absent and
/// [`PublishError::ManifestParse`] when it is not valid JSON.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest, PublishError> {
    let path_ref = path.as_ref();
    info!(manifest_path = ?path_ref, "Loading manifest");

    if !path_ref.exists() {
        error!(manifest_path = ?path_ref, "Manifest file not found");
        return Err(PublishError::ManifestNotFound {
            path: path_ref.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, manifest_path = ?path_ref, "Failed to read manifest");
        PublishError::ManifestRead {
            path: path_ref.to_path_buf(),
            error: e,
        }
    })?;

    let document: Value = serde_json::from_str(&content).map_err(|e| {
        error!(error = %e, manifest_path = ?path_ref, "Failed to parse manifest JSON");
        PublishError::ManifestParse {
            path: path_ref.to_path_buf(),
            error: e,
        }
    })?;

    let manifest = Manifest::from_value(document);
    let count = manifest.entry_count();
    println!("Read {}, found {} entries.", path_ref.display(), count);
    info!(entries = count, "Manifest parsed");
    debug!(manifest = %manifest.document, "Manifest contents");

    Ok(manifest)
}
