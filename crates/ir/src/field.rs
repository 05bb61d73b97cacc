//! Field definitions for form inputs
//!
//! This module contains the `Field` record, its optional validation bounds
//! and conditional-visibility rules, and `FieldChanges`, the partial update
//! applied by the property panel.

use crate::catalog::FieldCatalog;
use formforge_core::{BuilderResult, FieldId, FieldType, Validatable};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Field
// ============================================================================

/// One input definition within a form
///
/// All field types share this shape; `options` is only meaningful for
/// choice types (select, radio, checkbox).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Identifier, unique within the owning form and never changed
    pub id: FieldId,

    /// Kind of input
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Label shown above the input
    pub label: String,

    /// Placeholder text inside the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Whether an answer is mandatory
    #[serde(default)]
    pub required: bool,

    /// Choices for select/radio/checkbox fields, in display order
    #[serde(default)]
    pub options: Vec<String>,

    /// Value bounds and pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,

    /// Rules controlling when the field is shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<ConditionalLogic>,

    /// Help text rendered below the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    /// Value pre-filled in the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Field {
    /// Create a new field with a fresh identifier
    pub fn new(field_type: FieldType, label: impl Into<String>) -> Self {
        Self::with_id(FieldId::generate(), field_type, label)
    }

    /// Create a field with an explicit identifier
    pub fn with_id(id: FieldId, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id,
            field_type,
            label: label.into(),
            placeholder: None,
            required: false,
            options: Vec::new(),
            validation: None,
            conditional_logic: None,
            help_text: None,
            default_value: None,
        }
    }

    /// Create a field populated with the catalog defaults for its type
    ///
    /// The label is the humanized type name followed by " Field", the
    /// placeholder is the type's default, the field is optional, and choice
    /// types start with no options.
    pub fn for_type(field_type: FieldType) -> Self {
        Self::defaults_with_id(FieldId::generate(), field_type)
    }

    /// Create a transient drag-preview field that is never part of a form
    pub fn preview(field_type: FieldType) -> Self {
        Self::defaults_with_id(FieldId::temporary(), field_type)
    }

    fn defaults_with_id(id: FieldId, field_type: FieldType) -> Self {
        let descriptor = FieldCatalog::describe(field_type);
        let mut field = Self::with_id(id, field_type, descriptor.default_label());
        field.placeholder = Some(descriptor.default_placeholder());
        field
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the placeholder text
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the options list
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set validation bounds
    pub fn with_validation(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Set conditional visibility rules
    pub fn with_conditional_logic(mut self, logic: ConditionalLogic) -> Self {
        self.conditional_logic = Some(logic);
        self
    }

    /// Set the help text
    pub fn with_help_text(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Merge a partial update into this field
    ///
    /// Shallow merge: each attribute present in `changes` replaces the
    /// current value wholesale (including the entire `options` list).
    pub fn apply(&mut self, changes: FieldChanges) {
        let FieldChanges {
            field_type,
            label,
            placeholder,
            required,
            options,
            validation,
            conditional_logic,
            help_text,
            default_value,
        } = changes;

        if let Some(field_type) = field_type {
            self.field_type = field_type;
        }
        if let Some(label) = label {
            self.label = label;
        }
        if let Some(placeholder) = placeholder {
            self.placeholder = placeholder;
        }
        if let Some(required) = required {
            self.required = required;
        }
        if let Some(options) = options {
            self.options = options;
        }
        if let Some(validation) = validation {
            self.validation = validation;
        }
        if let Some(conditional_logic) = conditional_logic {
            self.conditional_logic = conditional_logic;
        }
        if let Some(help_text) = help_text {
            self.help_text = help_text;
        }
        if let Some(default_value) = default_value {
            self.default_value = default_value;
        }
    }

    /// Field ids referenced by this field's conditional logic
    pub fn referenced_fields(&self) -> impl Iterator<Item = &FieldId> {
        self.conditional_logic
            .iter()
            .flat_map(|logic| logic.show_if.iter().map(|c| &c.field_id))
    }
}

impl Validatable for Field {
    fn validate(&self) -> BuilderResult<()> {
        crate::validation::check_field(self).to_result()
    }
}

// ============================================================================
// FieldValidation
// ============================================================================

/// Optional bounds on a field's value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValidation {
    /// Minimum value (numeric types) or length (text types)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Maximum value (numeric types) or length (text types)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Regular expression the answer must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Message shown when validation fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldValidation {
    /// Create empty bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lower bound
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the upper bound
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the pattern
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the failure message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

// ============================================================================
// Conditional Logic
// ============================================================================

/// Show-if rules referencing other fields by id
///
/// Pure configuration: a field never owns the fields it references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalLogic {
    /// All conditions must hold for the field to be shown
    #[serde(default)]
    pub show_if: Vec<Condition>,
}

/// One comparison against another field's answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub field_id: FieldId,
    pub operator: ConditionOperator,
    pub value: ConditionValue,
}

impl Condition {
    /// Create a new condition
    pub fn new(
        field_id: impl Into<FieldId>,
        operator: ConditionOperator,
        value: impl Into<ConditionValue>,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Comparison operators for conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
}

/// Right-hand side of a condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Text(String),
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        ConditionValue::Text(s.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self {
        ConditionValue::Text(s)
    }
}

impl From<f64> for ConditionValue {
    fn from(n: f64) -> Self {
        ConditionValue::Number(n)
    }
}

// ============================================================================
// FieldChanges
// ============================================================================

/// Partial update for a field
///
/// `None` leaves an attribute untouched. For optional attributes the inner
/// `Option` is the new value, so `Some(None)` clears it; in JSON an explicit
/// `null` clears and a missing key leaves the value alone. There is no id:
/// a field keeps its id for life.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldChanges {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "explicit_null")]
    pub placeholder: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "explicit_null")]
    pub validation: Option<Option<FieldValidation>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "explicit_null")]
    pub conditional_logic: Option<Option<ConditionalLogic>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "explicit_null")]
    pub help_text: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "explicit_null")]
    pub default_value: Option<Option<String>>,
}

/// Keep an explicit JSON `null` as `Some(None)`
pub(crate) fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl FieldChanges {
    /// Create an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether applying these changes would leave a field untouched
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Change the field type
    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Change the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set or clear the placeholder
    pub fn placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Change the required flag
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Replace the whole options list
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Set or clear validation bounds
    pub fn validation(mut self, validation: Option<FieldValidation>) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Set or clear conditional logic
    pub fn conditional_logic(mut self, logic: Option<ConditionalLogic>) -> Self {
        self.conditional_logic = Some(logic);
        self
    }

    /// Set or clear the help text
    pub fn help_text(mut self, help: Option<String>) -> Self {
        self.help_text = Some(help);
        self
    }

    /// Set or clear the default value
    pub fn default_value(mut self, value: Option<String>) -> Self {
        self.default_value = Some(value);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
