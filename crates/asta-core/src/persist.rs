// Persistence adapter: write-through of the draft plan to the local store,
// and export/import of plan files.
//
// Imports are checked against a fixed field schema before anything is
// constructed. Only shape is checked; budget, ordering and uniqueness rules
// are left to the ledger and the views, so an imported plan may be one the
// editor itself would never produce.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::draft::roles::Role;
use crate::draft::selection::Selection;
use crate::store::Database;

/// Store key used when the configuration does not name one.
pub const DEFAULT_STORAGE_KEY: &str = "fantacalcio-selection";

/// Export file name used when the plan has no team name.
pub const DEFAULT_EXPORT_FILENAME: &str = "fantacalcio-selection.json";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file is not valid JSON: {0}")]
    NotJson(String),

    #[error("file must contain a JSON object")]
    NotAnObject,

    #[error("field `{field}` {message}")]
    Validation { field: String, message: String },

    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize plan: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Import schema
// ---------------------------------------------------------------------------

/// Expected kind of each top-level field of a plan file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Bids,
    Roles,
    Names,
}

/// The plan file contract, checked in this order. `exportedAt` and any other
/// field not listed here is ignored.
const SELECTION_SCHEMA: [(&str, FieldKind); 7] = [
    ("teamName", FieldKind::Text),
    ("bids", FieldKind::Bids),
    ("roles", FieldKind::Roles),
    ("strikers", FieldKind::Names),
    ("centrals", FieldKind::Names),
    ("defenders", FieldKind::Names),
    ("goalkeepers", FieldKind::Names),
];

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ImportError {
    ImportError::Validation {
        field: field.into(),
        message: message.into(),
    }
}

fn is_bid(value: &Value) -> bool {
    value.as_u64().is_some_and(|v| v <= u64::from(u32::MAX))
}

fn is_role_code(value: &Value) -> bool {
    value.as_str().and_then(Role::from_code).is_some()
}

fn check_field(record: &Map<String, Value>, name: &str, kind: FieldKind) -> Result<(), ImportError> {
    let Some(value) = record.get(name) else {
        return Err(invalid(name, "is missing"));
    };

    let (accepts, message): (fn(&Value) -> bool, &str) = match kind {
        FieldKind::Text if value.is_string() => return Ok(()),
        FieldKind::Text => return Err(invalid(name, "must be text")),
        FieldKind::Bids => (is_bid, "must be a non-negative whole number"),
        FieldKind::Roles => (is_role_code, "must be one of A, C, D, P"),
        FieldKind::Names => (Value::is_string, "must be text"),
    };

    let Some(items) = value.as_array() else {
        return Err(invalid(name, "must be a list"));
    };
    match items.iter().position(|item| !accepts(item)) {
        Some(i) => Err(invalid(format!("{name}[{i}]"), message)),
        None => Ok(()),
    }
}

/// Validate a parsed plan document against the schema and build the plan.
pub fn selection_from_value(value: Value) -> Result<Selection, ImportError> {
    let Some(record) = value.as_object() else {
        return Err(ImportError::NotAnObject);
    };
    for (name, kind) in SELECTION_SCHEMA {
        check_field(record, name, kind)?;
    }

    // Role codes are accepted case-insensitively; normalize before decoding.
    let mut value = value;
    if let Some(roles) = value.get_mut("roles").and_then(Value::as_array_mut) {
        for role in roles.iter_mut() {
            if let Some(parsed) = role.as_str().and_then(Role::from_code) {
                *role = Value::String(parsed.code().to_string());
            }
        }
    }

    decode_record(value)
}

/// Build the plan from a record that already passed the schema. A failure
/// here still means the record's shape is wrong, not its syntax.
fn decode_record(value: Value) -> Result<Selection, ImportError> {
    serde_json::from_value(value).map_err(|e| invalid("record", e.to_string()))
}

/// Parse and validate the text of a plan file.
pub fn import_from_str(contents: &str) -> Result<Selection, ImportError> {
    let value: Value =
        serde_json::from_str(contents).map_err(|e| ImportError::NotJson(e.to_string()))?;
    selection_from_value(value)
}

/// Read a plan file and validate it. One-shot: no retry.
pub async fn import_from_file(path: &Path) -> Result<Selection, ImportError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ImportError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    let selection = import_from_str(&contents)?;
    info!("Imported plan '{}' from {}", selection.team_name, path.display());
    Ok(selection)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedSelection<'a> {
    #[serde(flatten)]
    selection: &'a Selection,
    exported_at: DateTime<Utc>,
}

/// File name for an exported plan: the team name with each run of
/// whitespace (and any path separator) replaced by `_`, or
/// [`DEFAULT_EXPORT_FILENAME`] when the name is blank.
pub fn export_filename(team_name: &str) -> String {
    if team_name.trim().is_empty() {
        return DEFAULT_EXPORT_FILENAME.to_string();
    }
    let mut name = String::with_capacity(team_name.len() + 5);
    let mut in_gap = false;
    for ch in team_name.chars() {
        if ch.is_whitespace() {
            if !in_gap {
                name.push('_');
            }
            in_gap = true;
        } else {
            name.push(if ch == '/' || ch == '\\' { '_' } else { ch });
            in_gap = false;
        }
    }
    name.push_str(".json");
    name
}

/// Serialize the plan plus its export timestamp as pretty-printed JSON.
pub fn export_bytes(selection: &Selection, exported_at: DateTime<Utc>) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(&ExportedSelection {
        selection,
        exported_at,
    })
}

/// Write the plan into `dir` under [`export_filename`], creating the
/// directory if needed. Returns the written path.
pub async fn export_to_file(selection: &Selection, dir: &Path) -> Result<PathBuf, ExportError> {
    let bytes = export_bytes(selection, Utc::now())?;
    let path = dir.join(export_filename(&selection.team_name));
    let io_err = |path: &Path, e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    tokio::fs::create_dir_all(dir).await.map_err(|e| io_err(dir, e))?;
    tokio::fs::write(&path, bytes).await.map_err(|e| io_err(&path, e))?;
    info!("Exported plan to {}", path.display());
    Ok(path)
}

// ---------------------------------------------------------------------------
// Local store write-through
// ---------------------------------------------------------------------------

/// Saves and restores the current plan under one store key.
pub struct Persistence {
    db: Database,
    key: String,
}

impl Persistence {
    pub fn new(db: Database, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write the plan, surfacing store errors.
    pub fn try_save(&self, selection: &Selection) -> anyhow::Result<()> {
        let json = serde_json::to_string(selection)?;
        self.db.save_value(&self.key, &json)
    }

    /// Write the plan, overwriting the previous record. Failures are logged
    /// and swallowed: the session keeps working from memory.
    pub fn save(&self, selection: &Selection) {
        match self.try_save(selection) {
            Ok(()) => debug!("Saved plan under key '{}'", self.key),
            Err(e) => warn!("Failed to save plan under key '{}': {:#}", self.key, e),
        }
    }

    /// The stored plan, or `None` when nothing is stored or the record
    /// cannot be read back.
    pub fn load(&self) -> Option<Selection> {
        let json = match self.db.load_value(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read plan under key '{}': {:#}", self.key, e);
                return None;
            }
        };
        match import_from_str(&json) {
            Ok(selection) => Some(selection),
            Err(e) => {
                warn!("Discarding unreadable plan under key '{}': {}", self.key, e);
                None
            }
        }
    }

    /// When the stored plan was last written, as recorded by the store.
    pub fn last_saved(&self) -> Option<String> {
        match self.db.updated_at(&self.key) {
            Ok(stamp) => stamp,
            Err(e) => {
                warn!("Failed to read save time under key '{}': {:#}", self.key, e);
                None
            }
        }
    }

    /// Remove the stored plan. Failures are logged.
    pub fn clear(&self) {
        if let Err(e) = self.db.delete_value(&self.key) {
            warn!("Failed to clear plan under key '{}': {:#}", self.key, e);
        }
    }
}
