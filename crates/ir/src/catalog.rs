//! Field catalog
//!
//! Static registry describing every field type: the palette label, a short
//! description, an icon name, the palette category, and the defaults used
//! when a new field of that type is created.

use formforge_core::FieldType;
use heck::ToTitleCase;

// ============================================================================
// FieldCategory
// ============================================================================

/// Palette grouping for field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    Basic,
    Choice,
    DateTime,
    Media,
    Advanced,
}

impl FieldCategory {
    /// Get the display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldCategory::Basic => "Basic Fields",
            FieldCategory::Choice => "Choice Fields",
            FieldCategory::DateTime => "Date & Time",
            FieldCategory::Media => "Media Fields",
            FieldCategory::Advanced => "Advanced Fields",
        }
    }

    /// All categories in palette order
    pub fn all() -> &'static [FieldCategory] {
        &[
            FieldCategory::Basic,
            FieldCategory::Choice,
            FieldCategory::DateTime,
            FieldCategory::Media,
            FieldCategory::Advanced,
        ]
    }
}

impl std::fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// FieldDescriptor
// ============================================================================

/// Display metadata and defaults for one field type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The described field type
    pub field_type: FieldType,
    /// Palette label (e.g. "Short Text")
    pub label: &'static str,
    /// One-line palette description
    pub description: &'static str,
    /// Icon name in the palette's icon set
    pub icon: &'static str,
    /// Palette category
    pub category: FieldCategory,
    /// Whether the type is gated behind a paid plan
    pub premium: bool,
}

impl FieldDescriptor {
    /// Label given to a freshly created field: humanized type name + " Field"
    pub fn default_label(&self) -> String {
        format!("{} Field", self.field_type.as_str().to_title_case())
    }

    /// Placeholder given to a freshly created field
    pub fn default_placeholder(&self) -> String {
        match self.field_type {
            FieldType::Textarea => "Enter your response...".to_string(),
            other => format!("Enter {}...", other.as_str()),
        }
    }

    /// Whether the type carries a list of options
    pub fn is_choice(&self) -> bool {
        self.field_type.is_choice()
    }
}

// ============================================================================
// FieldCatalog
// ============================================================================

/// Read-only lookup over all field types
pub struct FieldCatalog;

impl FieldCatalog {
    /// Describe a field type
    pub fn describe(field_type: FieldType) -> FieldDescriptor {
        use FieldCategory::*;

        let (label, description, icon, category) = match field_type {
            FieldType::Text => ("Short Text", "Single line text input", "type", Basic),
            FieldType::Textarea => ("Long Text", "Multi-line text area", "file-text", Basic),
            FieldType::Email => ("Email", "Email address field", "mail", Basic),
            FieldType::Number => ("Number", "Numeric input field", "hash", Basic),
            FieldType::Phone => ("Phone", "Phone number field", "phone", Basic),
            FieldType::Url => ("Website URL", "URL input field", "link", Basic),
            FieldType::Select => ("Dropdown", "Select from options", "chevron-down", Choice),
            FieldType::Radio => ("Multiple Choice", "Single selection", "check-square", Choice),
            FieldType::Checkbox => ("Checkboxes", "Multiple selection", "check-square", Choice),
            FieldType::Rating => ("Rating", "Star rating field", "star", Choice),
            FieldType::Date => ("Date", "Date picker", "calendar", DateTime),
            FieldType::Time => ("Time", "Time picker", "clock", DateTime),
            FieldType::Datetime => ("Date & Time", "Date and time picker", "calendar", DateTime),
            FieldType::File => ("File Upload", "File attachment field", "upload", Media),
            FieldType::Color => ("Color Picker", "Color selection", "palette", Advanced),
            FieldType::Range => ("Slider", "Range slider", "toggle-left", Advanced),
            FieldType::Password => ("Password", "Password input", "eye-off", Advanced),
            FieldType::Hidden => ("Hidden Field", "Hidden value field", "eye", Advanced),
        };

        FieldDescriptor {
            field_type,
            label,
            description,
            icon,
            category,
            premium: false,
        }
    }

    /// Describe every field type in palette order
    pub fn all() -> Vec<FieldDescriptor> {
        FieldType::all().iter().map(|t| Self::describe(*t)).collect()
    }

    /// Describe the field types belonging to one palette category
    pub fn by_category(category: FieldCategory) -> Vec<FieldDescriptor> {
        Self::all()
            .into_iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Label a new field of this type receives
    pub fn default_label(field_type: FieldType) -> String {
        Self::describe(field_type).default_label()
    }
}

// ============================================================================
// Tests
// ============================================================================
