//! Entry model: a read-only view over one manifest entry plus the closed set of entry kinds.
//!
//! Entries stay as raw JSON objects so that unknown fields pass through untouched;
//! [`EntryRef`] only interprets the handful of fields the resolver needs.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

pub const SKILL_FILE_NAME: &str = "SKILL.md";
pub const UNKNOWN_ID: &str = "<unknown>";

/// What kind of entry this is, and therefore where its content lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Content is read from `path` exactly as given.
    Generic,
    /// `path` names a skill directory containing `SKILL.md`, or the file itself.
    Skill,
}

impl EntryKind {
    pub fn from_type(kind: Option<&str>) -> Self {
        match kind {
            Some("skill") => EntryKind::Skill,
            _ => EntryKind::Generic,
        }
    }

    /// Applies this kind's normalisation rule to the entry's declared path.
    ///
    /// A skill path whose text already ends in `SKILL.md` names the file itself
    /// (`skills/bar/SKILL.md`, `skills/MYSKILL.md`); anything else is a directory.
    pub fn content_path(&self, path: &Path) -> PathBuf {
        match self {
            EntryKind::Generic => path.to_path_buf(),
            EntryKind::Skill => {
                if path.to_string_lossy().ends_with(SKILL_FILE_NAME) {
                    path.to_path_buf()
                } else {
                    path.join(SKILL_FILE_NAME)
                }
            }
        }
    }
}

/// Borrowed view of the recognised fields of one entry.
#[derive(Debug, Clone, Copy)]
pub struct EntryRef<'a> {
    pub id: Option<&'a str>,
    pub kind: EntryKind,
    pub path: Option<&'a str>,
}

impl<'a> EntryRef<'a> {
    pub fn from_object(object: &'a Map<String, Value>) -> Self {
        EntryRef {
            id: object.get("id").and_then(Value::as_str),
            kind: EntryKind::from_type(object.get("type").and_then(Value::as_str)),
            path: object.get("path").and_then(Value::as_str),
        }
    }

    pub fn display_id(&self) -> &'a str {
        self.id.unwrap_or(UNKNOWN_ID)
    }

    /// The path content should be read from, relative to the working directory
    /// unless the declared path is absolute. `None` when the entry has no path.
    pub fn content_path(&self) -> Option<PathBuf> {
        self.path.map(|p| self.kind.content_path(Path::new(p)))
    }
}
