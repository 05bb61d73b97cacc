//! Core types used throughout FormForge
//!
//! This module contains the identifier newtypes and the closed set of
//! field kinds shared by the document model, the editor and the CLI.

use crate::error::BuilderError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Unique Identifiers
// ============================================================================

/// Prefix for freshly generated field identifiers
pub const FIELD_ID_PREFIX: &str = "field_";

/// Prefix for freshly generated form identifiers
pub const FORM_ID_PREFIX: &str = "form_";

/// Prefix for transient drag-preview identifiers
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Identifier of a field, unique within its form
///
/// Identifiers are opaque strings. Ids loaded from storage are kept verbatim;
/// ids minted locally are `field_` followed by a v4 UUID, so they never
/// collide with each other for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, collision-free identifier
    pub fn generate() -> Self {
        Self(format!("{}{}", FIELD_ID_PREFIX, Uuid::new_v4().simple()))
    }

    /// Generate an identifier for a drag preview ghost
    pub fn temporary() -> Self {
        Self(format!("{}{}", TEMP_ID_PREFIX, Uuid::new_v4().simple()))
    }

    /// Whether this id belongs to a drag preview rather than a real field
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMP_ID_PREFIX)
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier of a form document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(String);

impl FormId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(format!("{}{}", FORM_ID_PREFIX, Uuid::new_v4().simple()))
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FormId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FormId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for FormId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Field Types
// ============================================================================

/// The kinds of input a form field can be
///
/// Every kind shares the same record shape; the kind only matters to
/// renderers and validators outside the editing core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Date,
    File,
    Rating,
    Phone,
    Url,
    Color,
    Range,
    Time,
    Datetime,
    Password,
    Hidden,
}

impl FieldType {
    /// Get the wire token for this field type (e.g. `"textarea"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Date => "date",
            FieldType::File => "file",
            FieldType::Rating => "rating",
            FieldType::Phone => "phone",
            FieldType::Url => "url",
            FieldType::Color => "color",
            FieldType::Range => "range",
            FieldType::Time => "time",
            FieldType::Datetime => "datetime",
            FieldType::Password => "password",
            FieldType::Hidden => "hidden",
        }
    }

    /// Whether the field's `options` list is meaningful
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Checkbox | FieldType::Radio
        )
    }

    /// Whether `validation.min`/`validation.max` bound a numeric value
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Number | FieldType::Range | FieldType::Rating
        )
    }

    /// All field types in palette order
    pub fn all() -> &'static [FieldType] {
        &[
            FieldType::Text,
            FieldType::Textarea,
            FieldType::Email,
            FieldType::Number,
            FieldType::Phone,
            FieldType::Url,
            FieldType::Select,
            FieldType::Radio,
            FieldType::Checkbox,
            FieldType::Rating,
            FieldType::Date,
            FieldType::Time,
            FieldType::Datetime,
            FieldType::File,
            FieldType::Color,
            FieldType::Range,
            FieldType::Password,
            FieldType::Hidden,
        ]
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BuilderError::UnknownFieldType(s.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generated_field_ids_are_unique() {
        let ids: std::collections::HashSet<FieldId> =
            (0..500).map(|_| FieldId::generate()).collect();
        assert_eq!(ids.len(), 500);
        assert!(ids.iter().all(|id| id.as_str().starts_with(FIELD_ID_PREFIX)));
    }

    #[test]
    fn test_temporary_ids() {
        let temp = FieldId::temporary();
        assert!(temp.is_temporary());
        assert!(!FieldId::generate().is_temporary());
        assert!(!FieldId::new("field_1").is_temporary());
    }

    #[test]
    fn test_field_id_serializes_as_plain_string() {
        let id = FieldId::new("field_1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"field_1\"");
        let back: FieldId = serde_json::from_str("\"field_1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_field_type_tokens() {
        for field_type in FieldType::all() {
            let parsed: FieldType = field_type.as_str().parse().unwrap();
            assert_eq!(parsed, *field_type);
        }
        assert_eq!(FieldType::all().len(), 18);
        assert_eq!(
            serde_json::to_string(&FieldType::Datetime).unwrap(),
            "\"datetime\""
        );
    }

    #[test]
    fn test_unknown_field_type() {
        let err = "signature".parse::<FieldType>().unwrap_err();
        assert!(matches!(err, BuilderError::UnknownFieldType(ref t) if t == "signature"));
    }

    #[test]
    fn test_choice_types() {
        assert!(FieldType::Select.is_choice());
        assert!(FieldType::Radio.is_choice());
        assert!(FieldType::Checkbox.is_choice());
        assert!(!FieldType::Rating.is_choice());
        assert!(!FieldType::Text.is_choice());
    }
}
