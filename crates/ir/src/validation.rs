//! Validation rules for form documents
//!
//! Validation is not enforced while editing (a half-built form is a normal
//! state); it runs when a form is published and from the CLI.

use crate::field::Field;
use crate::form::FormDocument;
use formforge_core::{BuilderError, BuilderResult};
use regex::Regex;
use std::collections::HashSet;

// ============================================================================
// ValidationResult
// ============================================================================

/// Everything the rules found in one form
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// False as soon as any error is recorded
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    /// Problems that do not block publishing
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// A result with nothing reported
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Fold the findings of another rule into this result
    pub fn merge(&mut self, other: ValidationResult) {
        self.valid &= other.valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn has_error_code(&self, code: ValidationErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Collapse into a single `BuilderError::Validation` listing every error
    ///
    /// Warnings never fail the conversion.
    pub fn to_result(self) -> BuilderResult<()> {
        if self.valid {
            return Ok(());
        }
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        Err(BuilderError::validation(messages.join("; ")))
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

// ============================================================================
// ValidationError
// ============================================================================

/// One blocking problem, optionally located by a dotted path such as
/// `fields.field_1.options`
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub code: ValidationErrorCode,
    pub message: String,
    pub path: Option<String>,
}

impl ValidationError {
    pub fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{}] {}", path, self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCode {
    EmptyTitle,

    EmptyFieldId,
    PreviewFieldId,
    DuplicateFieldId,
    EmptyLabel,
    MissingOptions,
    BlankOption,
    InvalidBounds,
    InvalidPattern,

    /// A show-if condition names a field that is not in the form
    UnknownFieldReference,
    /// A show-if condition names its own field
    SelfReference,
}

// ============================================================================
// ValidationWarning
// ============================================================================

/// A finding that does not block publishing
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub code: ValidationWarningCode,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(code: ValidationWarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "warning: {}", self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationWarningCode {
    NoFields,
    NoDescription,
}

// ============================================================================
// Rules
// ============================================================================

/// One independent check over a whole form
pub trait ValidationRule {
    fn name(&self) -> &'static str;

    fn validate(&self, form: &FormDocument) -> ValidationResult;
}

// ============================================================================
// Validator
// ============================================================================

/// Runs a list of rules and merges their findings in order
#[derive(Default)]
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rule set used for publishing
    pub fn with_default_rules() -> Self {
        let mut validator = Self::new();
        validator.add_rule(Box::new(FormMetaRule));
        validator.add_rule(Box::new(FieldIdentityRule));
        validator.add_rule(Box::new(FieldContentRule));
        validator.add_rule(Box::new(ConditionalLogicRule));
        validator
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn validate(&self, form: &FormDocument) -> ValidationResult {
        self.rules
            .iter()
            .fold(ValidationResult::ok(), |mut result, rule| {
                result.merge(rule.validate(form));
                result
            })
    }
}

// ============================================================================
// Default rules
// ============================================================================

/// Rule: title present; warn on missing description or fields
pub struct FormMetaRule;

impl ValidationRule for FormMetaRule {
    fn name(&self) -> &'static str {
        "form_meta"
    }

    fn validate(&self, form: &FormDocument) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if form.title.trim().is_empty() {
            result.add_error(
                ValidationError::new(ValidationErrorCode::EmptyTitle, "Form title cannot be empty")
                    .with_path("title"),
            );
        }
        if form.description.trim().is_empty() {
            result.add_warning(ValidationWarning::new(
                ValidationWarningCode::NoDescription,
                "Form has no description",
            ));
        }
        if form.fields.is_empty() {
            result.add_warning(ValidationWarning::new(
                ValidationWarningCode::NoFields,
                "Form has no fields",
            ));
        }

        result
    }
}

/// Rule: every field id is non-empty, real, and unique
pub struct FieldIdentityRule;

impl ValidationRule for FieldIdentityRule {
    fn name(&self) -> &'static str {
        "field_identity"
    }

    fn validate(&self, form: &FormDocument) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let mut seen = HashSet::new();

        for (index, field) in form.fields.iter().enumerate() {
            let path = format!("fields[{}]", index);

            if field.id.as_str().is_empty() {
                result.add_error(
                    ValidationError::new(ValidationErrorCode::EmptyFieldId, "Field id is empty")
                        .with_path(path),
                );
                continue;
            }
            if field.id.is_temporary() {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::PreviewFieldId,
                        format!("Field '{}' has a drag-preview id", field.id),
                    )
                    .with_path(path.clone()),
                );
            }
            if !seen.insert(&field.id) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DuplicateFieldId,
                        format!("Duplicate field id: '{}'", field.id),
                    )
                    .with_path(path),
                );
            }
        }

        result
    }
}

/// Rule: per-field content checks (label, options, bounds, pattern)
pub struct FieldContentRule;

impl ValidationRule for FieldContentRule {
    fn name(&self) -> &'static str {
        "field_content"
    }

    fn validate(&self, form: &FormDocument) -> ValidationResult {
        let mut result = ValidationResult::ok();
        for field in &form.fields {
            result.merge(check_field(field));
        }
        result
    }
}

/// Rule: conditional logic only references other fields of the same form
pub struct ConditionalLogicRule;

impl ValidationRule for ConditionalLogicRule {
    fn name(&self) -> &'static str {
        "conditional_logic"
    }

    fn validate(&self, form: &FormDocument) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for field in &form.fields {
            let path = format!("fields.{}.conditionalLogic", field.id);
            for referenced in field.referenced_fields() {
                if referenced == &field.id {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::SelfReference,
                            format!("Field '{}' cannot depend on itself", field.label),
                        )
                        .with_path(path.clone()),
                    );
                } else if !form.contains_field(referenced) {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::UnknownFieldReference,
                            format!(
                                "Field '{}' depends on unknown field '{}'",
                                field.label, referenced
                            ),
                        )
                        .with_path(path.clone()),
                    );
                }
            }
        }

        result
    }
}

/// Checks that depend on a single field only
pub fn check_field(field: &Field) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let path = format!("fields.{}", field.id);

    if field.label.trim().is_empty() {
        result.add_error(
            ValidationError::new(ValidationErrorCode::EmptyLabel, "Field label cannot be empty")
                .with_path(format!("{}.label", path)),
        );
    }

    if field.field_type.is_choice() {
        if field.options.is_empty() {
            result.add_error(
                ValidationError::new(
                    ValidationErrorCode::MissingOptions,
                    format!("Field '{}' needs at least one option", field.label),
                )
                .with_path(format!("{}.options", path)),
            );
        }
        if field.options.iter().any(|o| o.trim().is_empty()) {
            result.add_error(
                ValidationError::new(
                    ValidationErrorCode::BlankOption,
                    format!("Field '{}' has a blank option", field.label),
                )
                .with_path(format!("{}.options", path)),
            );
        }
    }

    if let Some(validation) = &field.validation {
        if let (Some(min), Some(max)) = (validation.min, validation.max) {
            if min > max {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::InvalidBounds,
                        format!("Minimum {} is greater than maximum {}", min, max),
                    )
                    .with_path(format!("{}.validation", path)),
                );
            }
        }
        if let Some(pattern) = &validation.pattern {
            if let Err(e) = Regex::new(pattern) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::InvalidPattern,
                        format!("Invalid pattern '{}': {}", pattern, e),
                    )
                    .with_path(format!("{}.validation.pattern", path)),
                );
            }
        }
    }

    result
}

// ============================================================================
// Tests
// ============================================================================
