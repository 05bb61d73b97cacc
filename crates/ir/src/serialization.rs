//! Serialization and deserialization for form files
//!
//! A stored form is a pretty-printed JSON `FormFile` wrapper carrying the
//! schema version next to the document. Bare `FormDocument` JSON is still
//! accepted on load.

use crate::{FormDocument, SCHEMA_VERSION};
use formforge_core::{BuilderError, BuilderResult, FormId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

// ============================================================================
// Constants
// ============================================================================

/// File extension for stored forms (without the leading dot)
pub const FORM_FILE_EXTENSION: &str = "form.json";

// ============================================================================
// Form File Wrapper
// ============================================================================

/// Wrapper for form files that includes version information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormFile {
    /// Schema version for migration purposes
    pub schema_version: u32,

    /// File format version
    #[serde(default)]
    pub format_version: u32,

    /// The form data
    pub form: FormDocument,
}

impl FormFile {
    /// Wrap a form at the current schema version
    pub fn new(form: FormDocument) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            format_version: 1,
            form,
        }
    }

    /// Check if migration is needed
    pub fn needs_migration(&self) -> bool {
        self.schema_version < SCHEMA_VERSION
    }

    /// Bring an older file up to the current schema version
    ///
    /// Files written by a newer build are rejected.
    pub fn migrate(&mut self) -> BuilderResult<()> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(BuilderError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found: self.schema_version,
            });
        }
        while self.schema_version < SCHEMA_VERSION {
            debug!(from = self.schema_version, "migrating form file");
            // Version 0 files predate the wrapper fields; the layout is unchanged.
            self.schema_version += 1;
        }
        Ok(())
    }
}

// ============================================================================
// Save Functions
// ============================================================================

/// Save a form to a file, creating parent directories as needed
pub fn save_form(form: &FormDocument, path: impl AsRef<Path>) -> BuilderResult<()> {
    let path = path.as_ref();
    let json = save_form_to_string(form).map_err(|e| BuilderError::FileWrite {
        path: path.to_path_buf(),
        message: format!("Failed to serialize form: {}", e),
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| BuilderError::DirectoryCreate {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    std::fs::write(path, json).map_err(|e| BuilderError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}

/// Save a form to a pretty JSON string
pub fn save_form_to_string(form: &FormDocument) -> BuilderResult<String> {
    let file = FormFile::new(form.clone());
    Ok(serde_json::to_string_pretty(&file)?)
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load a form from a file
pub fn load_form(path: impl AsRef<Path>) -> BuilderResult<FormDocument> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(BuilderError::FileRead {
            path: path.to_path_buf(),
            message: "file does not exist".to_string(),
        });
    }

    let json = std::fs::read_to_string(path).map_err(|e| BuilderError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    load_form_from_string(&json).map_err(|e| match e {
        BuilderError::JsonSerialization(je) => BuilderError::FileRead {
            path: path.to_path_buf(),
            message: format!("Invalid form file format: {}", je),
        },
        other => other,
    })
}

/// Load a form from a JSON string
///
/// Wrapped files are recognized by their `schema_version` key; anything else
/// is read as a bare document.
pub fn load_form_from_string(json: &str) -> BuilderResult<FormDocument> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.get("schema_version").is_none() {
        let form: FormDocument = serde_json::from_value(value)?;
        return Ok(form);
    }

    let mut file: FormFile = serde_json::from_value(value)?;
    if file.schema_version != SCHEMA_VERSION {
        file.migrate()?;
    }
    Ok(file.form)
}

/// Load a form from raw bytes
pub fn load_form_from_bytes(bytes: &[u8]) -> BuilderResult<FormDocument> {
    let json = std::str::from_utf8(bytes)
        .map_err(|e| BuilderError::InvalidFormFormat(format!("Invalid UTF-8: {}", e)))?;
    load_form_from_string(json)
}

// ============================================================================
// Utility Functions
// ============================================================================

/// File name a form is stored under
pub fn form_file_name(id: &FormId) -> String {
    format!("{}.{}", id, FORM_FILE_EXTENSION)
}

/// Check that an id can name a file directly inside a store directory
pub fn check_form_id(id: &FormId) -> BuilderResult<()> {
    let raw = id.as_str();
    if raw.is_empty() || raw == "." || raw == ".." || raw.contains(['/', '\\', '\0']) {
        return Err(BuilderError::persistence(format!(
            "'{}' is not a valid form id",
            raw
        )));
    }
    Ok(())
}

/// Path of a form inside a store directory
pub fn form_path(dir: impl AsRef<Path>, id: &FormId) -> BuilderResult<PathBuf> {
    check_form_id(id)?;
    Ok(dir.as_ref().join(form_file_name(id)))
}

/// Check whether a path carries the form file extension
pub fn is_form_file(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(&format!(".{}", FORM_FILE_EXTENSION)))
}

// ============================================================================
// Tests
// ============================================================================
