//! Form templates
//!
//! Field templates are id-less field blueprints; form templates bundle a
//! list of them with a name and category. Instantiating a template always
//! mints fresh field ids.

use crate::field::Field;
use crate::form::FormDocument;
use formforge_core::{BuilderError, BuilderResult, FieldId, FieldType};
use serde::{Deserialize, Serialize};

// ============================================================================
// FieldTemplate
// ============================================================================

/// Blueprint for a field, without an identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTemplate {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

impl FieldTemplate {
    /// Create a new optional field template
    pub fn new(field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            field_type,
            label: label.into(),
            required: false,
            placeholder: None,
            options: Vec::new(),
        }
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the placeholder
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

    /// Build a field from this template with a freshly generated id
    pub fn instantiate(&self) -> Field {
        let mut field = Field::with_id(FieldId::generate(), self.field_type, self.label.clone());
        field.required = self.required;
        field.placeholder = self.placeholder.clone();
        field.options = self.options.clone();
        field
    }
}

impl From<&Field> for FieldTemplate {
    /// Strip a field down to a template, dropping its id
    fn from(field: &Field) -> Self {
        Self {
            field_type: field.field_type,
            label: field.label.clone(),
            required: field.required,
            placeholder: field.placeholder.clone(),
            options: field.options.clone(),
        }
    }
}

// ============================================================================
// FormTemplate
// ============================================================================

/// A named starting point for a new form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub fields: Vec<FieldTemplate>,
}

impl FormTemplate {
    fn builtin(
        id: &str,
        name: &str,
        description: &str,
        category: &str,
        fields: Vec<FieldTemplate>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            premium: false,
            fields,
        }
    }

    /// Create a draft form from this template with the given title/description
    pub fn instantiate(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> FormDocument {
        FormDocument::from_template(&self.fields, title, description)
    }

    /// Create a draft form titled after the template itself
    pub fn instantiate_default(&self) -> FormDocument {
        self.instantiate(self.name.clone(), self.description.clone())
    }

    /// Built-in templates in display order
    pub fn builtins() -> Vec<FormTemplate> {
        use FieldType::*;

        let mut order = Self::builtin(
            "order",
            "Order Form",
            "Product order form with payment details",
            "Business",
            vec![
                FieldTemplate::new(Text, "Full Name").required(),
                FieldTemplate::new(Email, "Email Address").required(),
                FieldTemplate::new(Select, "Product")
                    .with_options(["Basic Plan", "Pro Plan", "Enterprise Plan"])
                    .required(),
                FieldTemplate::new(Number, "Quantity").required(),
                FieldTemplate::new(Textarea, "Special Instructions"),
            ],
        );
        order.premium = true;

        vec![
            Self::builtin(
                "blank",
                "Blank Form",
                "Start from scratch with a completely blank form",
                "Basic",
                Vec::new(),
            ),
            Self::builtin(
                "contact",
                "Contact Form",
                "Simple contact form with name, email, and message",
                "Business",
                vec![
                    FieldTemplate::new(Text, "Full Name").required(),
                    FieldTemplate::new(Email, "Email Address").required(),
                    FieldTemplate::new(Text, "Subject"),
                    FieldTemplate::new(Textarea, "Message").required(),
                ],
            ),
            Self::builtin(
                "feedback",
                "Feedback Survey",
                "Collect customer feedback with ratings and comments",
                "Survey",
                vec![
                    FieldTemplate::new(Text, "Name"),
                    FieldTemplate::new(Email, "Email"),
                    FieldTemplate::new(Rating, "Overall Satisfaction").required(),
                    FieldTemplate::new(Select, "How did you hear about us?").with_options([
                        "Google",
                        "Social Media",
                        "Friend",
                        "Advertisement",
                    ]),
                    FieldTemplate::new(Textarea, "Additional Comments"),
                ],
            ),
            Self::builtin(
                "registration",
                "Event Registration",
                "Registration form for events and workshops",
                "Event",
                vec![
                    FieldTemplate::new(Text, "Full Name").required(),
                    FieldTemplate::new(Email, "Email Address").required(),
                    FieldTemplate::new(Phone, "Phone Number").required(),
                    FieldTemplate::new(Select, "Event Session")
                        .with_options(["Morning Session", "Afternoon Session", "Full Day"])
                        .required(),
                    FieldTemplate::new(Checkbox, "Dietary Restrictions").with_options([
                        "Vegetarian",
                        "Vegan",
                        "Gluten-Free",
                        "None",
                    ]),
                ],
            ),
            Self::builtin(
                "survey",
                "Customer Survey",
                "Comprehensive survey for market research",
                "Survey",
                vec![
                    FieldTemplate::new(Number, "Age"),
                    FieldTemplate::new(Radio, "Gender").with_options([
                        "Male",
                        "Female",
                        "Other",
                        "Prefer not to say",
                    ]),
                    FieldTemplate::new(Select, "Income Range").with_options([
                        "Under $25k",
                        "$25k-$50k",
                        "$50k-$75k",
                        "$75k-$100k",
                        "Over $100k",
                    ]),
                    FieldTemplate::new(Rating, "Product Satisfaction").required(),
                    FieldTemplate::new(Textarea, "Suggestions for Improvement"),
                ],
            ),
            order,
        ]
    }

    /// Look up a built-in template by id
    pub fn find(id: &str) -> BuilderResult<FormTemplate> {
        Self::builtins()
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| BuilderError::TemplateNotFound(id.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
