//! Error types for FormForge
//!
//! This module provides unified error handling across the workspace:
//! validation failures, lookups, index errors from the document model,
//! persistence failures and file/serialization errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for FormForge
#[derive(Debug, Error)]
pub enum BuilderError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Field validation failed
    #[error("Field validation failed for '{field}': {message}")]
    FieldValidation { field: String, message: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Form not found in the persistence layer
    #[error("Form not found: {0}")]
    FormNotFound(String),

    /// Template not found in the built-in template list
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// No form document is loaded in the editing session
    #[error("No form is loaded")]
    NoDocument,

    // ========================================================================
    // Model Errors
    // ========================================================================
    /// Duplicate field identifier
    #[error("Duplicate field id: '{0}' already exists in the form")]
    DuplicateField(String),

    /// Position outside the field list
    #[error("Index {index} is out of bounds for {len} fields")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Unrecognized field type token
    #[error("Unknown field type: '{0}'")]
    UnknownFieldType(String),

    // ========================================================================
    // Persistence Errors
    // ========================================================================
    /// Persistence gateway failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Invalid form file format
    #[error("Invalid form file format: {0}")]
    InvalidFormFormat(String),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: u32, found: u32 },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BuilderError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        BuilderError::Validation(msg.into())
    }

    /// Create a field validation error
    pub fn field_validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        BuilderError::FieldValidation {
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        BuilderError::Persistence(msg.into())
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BuilderError::Validation(_) | BuilderError::FieldValidation { .. }
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BuilderError::FormNotFound(_)
                | BuilderError::TemplateNotFound(_)
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            BuilderError::Io(_)
                | BuilderError::FileRead { .. }
                | BuilderError::FileWrite { .. }
                | BuilderError::DirectoryCreate { .. }
        )
    }
}

/// Result type alias using BuilderError
pub type BuilderResult<T> = Result<T, BuilderError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_error() {
        let err = BuilderError::validation("Title is required");
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Validation error: Title is required");
    }

    #[test]
    fn test_field_validation_error() {
        let err = BuilderError::field_validation("field_1", "Label cannot be empty");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Field validation failed for 'field_1': Label cannot be empty"
        );
    }

    #[test]
    fn test_not_found_errors() {
        let err = BuilderError::FormNotFound("form_1".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Form not found: form_1");

        assert!(BuilderError::TemplateNotFound("nope".into()).is_not_found());
        assert!(!BuilderError::NoDocument.is_not_found());
    }

    #[test]
    fn test_index_out_of_bounds_message() {
        let err = BuilderError::IndexOutOfBounds { index: 5, len: 2 };
        assert_eq!(err.to_string(), "Index 5 is out of bounds for 2 fields");
    }

    #[test]
    fn test_io_classification_covers_file_errors() {
        let err: BuilderError = std::io::Error::other("disk full").into();
        assert!(err.is_io());
        let err = BuilderError::FileWrite {
            path: PathBuf::from("forms/form_1.form.json"),
            message: "read-only".into(),
        };
        assert!(err.is_io());
        assert!(!BuilderError::persistence("offline").is_io());
    }
}
