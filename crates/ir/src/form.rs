//! Form documents
//!
//! This module contains `FormDocument`, the editable aggregate of an ordered
//! field list plus title, description, settings and status, together with
//! the mutation primitives the editing session drives.

use crate::field::{Field, FieldChanges};
use crate::template::FieldTemplate;
use chrono::{DateTime, Utc};
use formforge_core::{
    BuilderError, BuilderResult, FieldId, FieldType, FormId, Timestamped, Validatable,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// FormDocument
// ============================================================================

/// The editable unit: one form and its ordered fields
///
/// Field order is display order. The field list never contains two fields
/// with the same id; every mutation below preserves that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    /// Form identifier
    pub id: FormId,

    /// Title shown at the top of the form
    pub title: String,

    /// Description shown under the title
    #[serde(default)]
    pub description: String,

    /// Fields in display order
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Theme and submission policy
    #[serde(default)]
    pub settings: FormSettings,

    /// Publication status
    #[serde(default)]
    pub status: FormStatus,

    /// Number of submissions received (display only)
    #[serde(default)]
    pub submissions: u64,

    /// Revision counter assigned by the persistence layer
    #[serde(default)]
    pub version: u32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl FormDocument {
    /// Create an empty draft form
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: FormId::generate(),
            title: title.into(),
            description: String::new(),
            fields: Vec::new(),
            settings: FormSettings::default(),
            status: FormStatus::Draft,
            submissions: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a draft form from a list of field templates
    ///
    /// Each template becomes a field with a freshly generated id, so two
    /// forms created from the same template never share field ids.
    pub fn from_template(
        templates: &[FieldTemplate],
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let mut form = Self::new(title);
        form.description = description.into();
        form.fields = templates.iter().map(FieldTemplate::instantiate).collect();
        form
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the fields, replacing any existing ones
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    /// Copy this form under a new id as a fresh draft
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        Self {
            id: FormId::generate(),
            title: format!("{} (Copy)", self.title),
            status: FormStatus::Draft,
            submissions: 0,
            version: 0,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    // ========================================================================
    // Form Metadata
    // ========================================================================

    /// Replace the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Merge a partial settings edit; keys left out keep their values
    pub fn update_settings(&mut self, changes: SettingsChanges) {
        changes.apply(&mut self.settings);
    }

    /// Replace the status
    pub fn set_status(&mut self, status: FormStatus) {
        self.status = status;
    }

    // ========================================================================
    // Field Management
    // ========================================================================

    /// Add a field of the given type with catalog defaults
    ///
    /// Returns the new field's id. Fails with `IndexOutOfBounds` (and leaves
    /// the form untouched) when `position` is past the end of the list.
    pub fn add_field(
        &mut self,
        field_type: FieldType,
        position: InsertPosition,
    ) -> BuilderResult<FieldId> {
        self.insert_field(Field::for_type(field_type), position)
    }

    /// Insert a prepared field
    ///
    /// Rejects fields whose id is already present or is a drag-preview id.
    pub fn insert_field(
        &mut self,
        field: Field,
        position: InsertPosition,
    ) -> BuilderResult<FieldId> {
        if field.id.is_temporary() {
            return Err(BuilderError::field_validation(
                field.id.as_str(),
                "preview fields cannot be inserted into a form",
            ));
        }
        if self.contains_field(&field.id) {
            return Err(BuilderError::DuplicateField(field.id.to_string()));
        }

        let index = match position {
            InsertPosition::End => self.fields.len(),
            InsertPosition::At(index) if index <= self.fields.len() => index,
            InsertPosition::At(index) => {
                return Err(BuilderError::IndexOutOfBounds {
                    index,
                    len: self.fields.len(),
                });
            }
        };

        let id = field.id.clone();
        self.fields.insert(index, field);
        Ok(id)
    }

    /// Merge changes into the field with the given id
    ///
    /// Returns `false` and changes nothing when the id is not present.
    pub fn update_field(&mut self, id: &FieldId, changes: FieldChanges) -> bool {
        match self.field_mut(id) {
            Some(field) => {
                field.apply(changes);
                true
            }
            None => false,
        }
    }

    /// Remove the field with the given id, returning it if it was present
    pub fn delete_field(&mut self, id: &FieldId) -> Option<Field> {
        let index = self.field_index(id)?;
        Some(self.fields.remove(index))
    }

    /// Move the field at `from` so that it ends up at index `to`
    ///
    /// Splice-out then splice-in: `to` is an index into the list after the
    /// field has been removed. Either index at or past the end fails with
    /// `IndexOutOfBounds` and leaves the list untouched.
    pub fn reorder_field(&mut self, from: usize, to: usize) -> BuilderResult<()> {
        let len = self.fields.len();
        if from >= len {
            return Err(BuilderError::IndexOutOfBounds { index: from, len });
        }
        if to >= len {
            return Err(BuilderError::IndexOutOfBounds { index: to, len });
        }

        let moved = self.fields.remove(from);
        self.fields.insert(to, moved);
        Ok(())
    }

    /// Get a field by id
    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }

    /// Get a mutable field by id
    pub fn field_mut(&mut self, id: &FieldId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| &f.id == id)
    }

    /// Position of a field in display order
    pub fn field_index(&self, id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|f| &f.id == id)
    }

    /// Check whether a field id is present
    pub fn contains_field(&self, id: &FieldId) -> bool {
        self.field_index(id).is_some()
    }

    /// Field ids in display order
    pub fn field_ids(&self) -> Vec<FieldId> {
        self.fields.iter().map(|f| f.id.clone()).collect()
    }

    /// Number of fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of required fields
    pub fn required_count(&self) -> usize {
        self.fields.iter().filter(|f| f.required).count()
    }

    /// Whether the form has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Timestamped for FormDocument {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Validatable for FormDocument {
    fn validate(&self) -> BuilderResult<()> {
        crate::validation::Validator::with_default_rules()
            .validate(self)
            .to_result()
    }
}

// ============================================================================
// InsertPosition
// ============================================================================

/// Where a new field lands in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertPosition {
    /// Append after the last field
    #[default]
    End,
    /// Insert before the field currently at this index (`len` appends)
    At(usize),
}

// ============================================================================
// FormStatus
// ============================================================================

/// Publication status of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl FormStatus {
    /// Get the display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FormStatus::Draft => "Draft",
            FormStatus::Published => "Published",
            FormStatus::Archived => "Archived",
        }
    }

    /// Whether the form accepts submissions
    pub fn accepts_submissions(&self) -> bool {
        matches!(self, FormStatus::Published)
    }
}

impl std::fmt::Display for FormStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// FormSettings
// ============================================================================

/// Theme and submission policy for a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSettings {
    /// Colors and font
    pub theme: ThemeSettings,

    /// Whether one respondent may submit more than once
    pub allow_multiple_submissions: bool,

    /// Whether respondents must sign in
    pub require_auth: bool,

    /// Whether a progress bar is shown
    pub show_progress_bar: bool,

    /// Message shown after submitting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thank_you_message: Option<String>,

    /// Page to redirect to after submitting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    /// Stop accepting submissions after this many
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_submissions: Option<u64>,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            theme: ThemeSettings::default(),
            allow_multiple_submissions: true,
            require_auth: false,
            show_progress_bar: false,
            thank_you_message: None,
            redirect_url: None,
            max_submissions: None,
        }
    }
}

/// Partial update for `FormSettings`
///
/// Shallow like `FieldChanges`: `theme` is replaced as a whole, and for the
/// optional settings an explicit `null` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_multiple_submissions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_auth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_progress_bar: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::field::explicit_null"
    )]
    pub thank_you_message: Option<Option<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::field::explicit_null"
    )]
    pub redirect_url: Option<Option<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::field::explicit_null"
    )]
    pub max_submissions: Option<Option<u64>>,
}

impl SettingsChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn theme(mut self, theme: ThemeSettings) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn require_auth(mut self, require_auth: bool) -> Self {
        self.require_auth = Some(require_auth);
        self
    }

    pub fn thank_you_message(mut self, message: Option<String>) -> Self {
        self.thank_you_message = Some(message);
        self
    }

    /// Write every present key into `settings`
    pub fn apply(self, settings: &mut FormSettings) {
        let SettingsChanges {
            theme,
            allow_multiple_submissions,
            require_auth,
            show_progress_bar,
            thank_you_message,
            redirect_url,
            max_submissions,
        } = self;

        if let Some(theme) = theme {
            settings.theme = theme;
        }
        if let Some(allow) = allow_multiple_submissions {
            settings.allow_multiple_submissions = allow;
        }
        if let Some(require_auth) = require_auth {
            settings.require_auth = require_auth;
        }
        if let Some(show) = show_progress_bar {
            settings.show_progress_bar = show;
        }
        if let Some(message) = thank_you_message {
            settings.thank_you_message = message;
        }
        if let Some(url) = redirect_url {
            settings.redirect_url = url;
        }
        if let Some(max) = max_submissions {
            settings.max_submissions = max;
        }
    }
}

/// Colors and font of a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeSettings {
    pub primary_color: String,
    pub background_color: String,
    pub font_family: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: "#8B5CF6".to_string(),
            background_color: "#FFFFFF".to_string(),
            font_family: "Inter".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn form_with(ids: &[&str]) -> FormDocument {
        FormDocument::new("Test").with_fields(
            ids.iter()
                .map(|id| Field::with_id(FieldId::new(*id), FieldType::Text, *id))
                .collect(),
        )
    }

    fn ids(form: &FormDocument) -> Vec<String> {
        form.fields.iter().map(|f| f.id.to_string()).collect()
    }

    #[test]
    fn test_new_form_defaults() {
        let form = FormDocument::new("Contact");
        assert_eq!(form.title, "Contact");
        assert_eq!(form.status, FormStatus::Draft);
        assert!(form.is_empty());
        assert!(form.settings.allow_multiple_submissions);
        assert_eq!(form.settings.theme.primary_color, "#8B5CF6");
    }

    #[test]
    fn test_add_field_appends_by_default() {
        let mut form = form_with(&["a", "b"]);
        let id = form.add_field(FieldType::Rating, InsertPosition::End).unwrap();
        assert_eq!(form.field_count(), 3);
        assert_eq!(form.fields[2].id, id);
        assert_eq!(form.fields[2].field_type, FieldType::Rating);
        assert!(!form.fields[2].required);
    }

    #[test]
    fn test_add_field_at_position() {
        let mut form = form_with(&["a", "b"]);
        let id = form.add_field(FieldType::Email, InsertPosition::At(1)).unwrap();
        assert_eq!(form.field_index(&id), Some(1));

        let end = form.add_field(FieldType::Text, InsertPosition::At(3)).unwrap();
        assert_eq!(form.field_index(&end), Some(3));
    }

    #[test]
    fn test_add_field_past_end_is_rejected() {
        let mut form = form_with(&["a"]);
        let err = form
            .add_field(FieldType::Text, InsertPosition::At(5))
            .unwrap_err();
        assert!(matches!(err, BuilderError::IndexOutOfBounds { index: 5, len: 1 }));
        assert_eq!(ids(&form), vec!["a"]);
    }

    #[test]
    fn test_added_ids_never_collide() {
        let mut form = FormDocument::new("Many");
        for field_type in FieldType::all().iter().cycle().take(200) {
            form.add_field(*field_type, InsertPosition::End).unwrap();
        }
        let unique: HashSet<_> = form.field_ids().into_iter().collect();
        assert_eq!(unique.len(), 200);
    }

    #[test]
    fn test_insert_duplicate_or_temporary_rejected() {
        let mut form = form_with(&["a"]);
        let dup = Field::with_id(FieldId::new("a"), FieldType::Text, "again");
        assert!(matches!(
            form.insert_field(dup, InsertPosition::End),
            Err(BuilderError::DuplicateField(_))
        ));
        assert!(
            form.insert_field(Field::preview(FieldType::Text), InsertPosition::End)
                .is_err()
        );
        assert_eq!(form.field_count(), 1);
    }

    #[test]
    fn test_update_field() {
        let mut form = form_with(&["a"]);
        assert!(form.update_field(&FieldId::new("a"), FieldChanges::new().label("Name")));
        assert_eq!(form.fields[0].label, "Name");

        let before = form.clone();
        assert!(!form.update_field(&FieldId::new("zzz"), FieldChanges::new().label("x")));
        assert_eq!(form, before);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut form = form_with(&["a", "b", "c"]);
        let removed = form.delete_field(&FieldId::new("b")).unwrap();
        assert_eq!(removed.id.as_str(), "b");
        assert_eq!(ids(&form), vec!["a", "c"]);

        assert!(form.delete_field(&FieldId::new("b")).is_none());
        assert_eq!(ids(&form), vec!["a", "c"]);
    }

    #[test]
    fn test_reorder_splice_semantics() {
        let mut form = form_with(&["a", "b", "c", "d"]);
        form.reorder_field(0, 2).unwrap();
        assert_eq!(ids(&form), vec!["b", "c", "a", "d"]);

        form.reorder_field(3, 0).unwrap();
        assert_eq!(ids(&form), vec!["d", "b", "c", "a"]);

        form.reorder_field(1, 1).unwrap();
        assert_eq!(ids(&form), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_reorder_out_of_bounds_is_untouched() {
        let mut form = form_with(&["a", "b"]);
        assert!(form.reorder_field(2, 0).is_err());
        assert!(form.reorder_field(0, 2).is_err());
        assert_eq!(ids(&form), vec!["a", "b"]);

        let mut empty = FormDocument::new("Empty");
        assert!(empty.reorder_field(0, 0).is_err());
    }

    #[test]
    fn test_reorder_is_permutation_for_all_index_pairs() {
        let original = form_with(&["a", "b", "c", "d", "e"]);
        let mut expected: Vec<String> = ids(&original);
        expected.sort();

        for from in 0..5 {
            for to in 0..5 {
                let mut form = original.clone();
                form.reorder_field(from, to).unwrap();
                let mut got = ids(&form);
                assert_eq!(got.len(), 5);
                assert_eq!(form.fields[to].id, original.fields[from].id);
                got.sort();
                assert_eq!(got, expected);
            }
        }
    }

    #[test]
    fn test_from_template_assigns_fresh_ids() {
        let templates = vec![
            FieldTemplate::new(FieldType::Text, "Full Name").required(),
            FieldTemplate::new(FieldType::Select, "Plan").with_options(["Basic", "Pro"]),
        ];
        let first = FormDocument::from_template(&templates, "Order", "Place an order");
        let second = FormDocument::from_template(&templates, "Order", "Place an order");

        assert_eq!(first.field_count(), 2);
        assert_eq!(first.description, "Place an order");
        assert_eq!(first.status, FormStatus::Draft);
        assert!(first.fields[0].required);
        assert_eq!(first.fields[1].options, vec!["Basic", "Pro"]);
        assert_ne!(first.fields[0].id, second.fields[0].id);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_duplicate() {
        let mut form = form_with(&["a"]);
        form.status = FormStatus::Published;
        form.submissions = 12;
        let copy = form.duplicate();
        assert_ne!(copy.id, form.id);
        assert_eq!(copy.title, "Test (Copy)");
        assert_eq!(copy.status, FormStatus::Draft);
        assert_eq!(copy.submissions, 0);
        assert_eq!(copy.fields, form.fields);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: FormSettings =
            serde_json::from_str(r##"{"requireAuth":true,"theme":{"primaryColor":"#10B981"}}"##)
                .unwrap();
        assert!(settings.require_auth);
        assert!(settings.allow_multiple_submissions);
        assert_eq!(settings.theme.primary_color, "#10B981");
        assert_eq!(settings.theme.font_family, "Inter");
    }

    #[test]
    fn test_settings_changes_merge_shallowly() {
        let mut form = FormDocument::new("Settings");
        form.settings.thank_you_message = Some("Thanks!".to_string());
        form.settings.theme.primary_color = "#10B981".to_string();

        let changes: SettingsChanges = serde_json::from_str(r#"{"requireAuth":true}"#).unwrap();
        form.update_settings(changes);

        assert!(form.settings.require_auth);
        assert_eq!(form.settings.thank_you_message.as_deref(), Some("Thanks!"));
        assert_eq!(form.settings.theme.primary_color, "#10B981");
        assert!(form.settings.allow_multiple_submissions);
    }

    #[test]
    fn test_settings_changes_null_clears() {
        let mut form = FormDocument::new("Settings");
        form.settings.thank_you_message = Some("Thanks!".to_string());
        form.settings.max_submissions = Some(10);

        let changes: SettingsChanges =
            serde_json::from_str(r#"{"thankYouMessage":null}"#).unwrap();
        assert_eq!(changes, SettingsChanges::new().thank_you_message(None));
        form.update_settings(changes);

        assert!(form.settings.thank_you_message.is_none());
        assert_eq!(form.settings.max_submissions, Some(10));
        assert!(SettingsChanges::new().is_empty());
    }
}
