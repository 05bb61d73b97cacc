//! # FormForge IR
//!
//! The document model edited by the form builder.
//!
//! ## Core Concepts
//!
//! - **Field**: One input definition (type, label, options, validation)
//! - **FormDocument**: The editable unit, an ordered list of fields plus
//!   title, description, settings and status
//! - **FieldCatalog**: Static metadata and creation defaults per field type
//! - **FormTemplate**: Named starting points that instantiate into drafts
//! - **Validator**: Rule-based checks run before a form is published
//!

pub mod catalog;
pub mod field;
pub mod form;
pub mod serialization;
pub mod template;
pub mod validation;

// Re-export commonly used types at crate root
pub use catalog::{FieldCatalog, FieldCategory, FieldDescriptor};
pub use field::{
    Condition, ConditionOperator, ConditionValue, ConditionalLogic, Field, FieldChanges,
    FieldValidation,
};
pub use form::{
    FormDocument, FormSettings, FormStatus, InsertPosition, SettingsChanges, ThemeSettings,
};
pub use serialization::{
    FORM_FILE_EXTENSION, FormFile, load_form, load_form_from_string, save_form,
    save_form_to_string,
};
pub use template::{FieldTemplate, FormTemplate};
pub use validation::{ValidationResult, ValidationRule, Validator};

// Re-export core types that are commonly used with IR
pub use formforge_core::{BuilderError, BuilderResult, FieldId, FieldType, FormId};

/// Current schema version for form files
pub const SCHEMA_VERSION: u32 = 1;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        BuilderError,
        BuilderResult,
        // Model
        Field,
        FieldChanges,
        FieldId,
        FieldType,
        FormDocument,
        FormId,
        FormStatus,
        InsertPosition,
        // Catalog and templates
        FieldCatalog,
        FieldTemplate,
        FormTemplate,
        // Validation
        Validator,
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_covers_a_basic_edit() {
        let mut form = FormTemplate::find("contact").unwrap().instantiate_default();
        let id = form.add_field(FieldType::Rating, InsertPosition::At(0)).unwrap();
        assert_eq!(form.field_ids()[0], id);
        assert_eq!(form.fields[0].label, FieldCatalog::default_label(FieldType::Rating));
        assert!(Validator::with_default_rules().validate(&form).valid);
    }

    #[test]
    fn test_file_extension_matches_helpers() {
        let path = super::serialization::form_path("store", &FormId::new("form_1")).unwrap();
        assert!(path.to_string_lossy().ends_with(super::FORM_FILE_EXTENSION));
        assert!(super::serialization::is_form_file(&path));
    }
}
