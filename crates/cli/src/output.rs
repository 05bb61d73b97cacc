//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use formforge_ir::validation::ValidationResult;
use formforge_ir::{FieldCatalog, FieldCategory, FormDocument, FormStatus, FormTemplate};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

/// Serialize a value as JSON, pretty or compact
pub fn to_json<T: Serialize>(data: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };
    Ok(json)
}

fn status_label(status: FormStatus) -> String {
    match status {
        FormStatus::Draft => status.display_name().yellow().to_string(),
        FormStatus::Published => status.display_name().green().to_string(),
        FormStatus::Archived => status.display_name().dimmed().to_string(),
    }
}

/// Palette listing grouped by category
pub fn render_catalog() -> String {
    let mut out = String::new();
    for category in FieldCategory::all() {
        let _ = writeln!(out, "{}", category.display_name().underline());
        for descriptor in FieldCatalog::by_category(*category) {
            let _ = writeln!(
                out,
                "  {:<10} {:<16} {}",
                descriptor.field_type.as_str().blue(),
                descriptor.label,
                descriptor.description.dimmed()
            );
        }
        out.push('\n');
    }
    out
}

/// Built-in template listing
pub fn render_templates(templates: &[FormTemplate]) -> String {
    let mut out = String::new();
    for template in templates {
        let premium = if template.premium {
            format!(" {}", "premium".magenta())
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "{:<14} {} ({} fields, {}){}",
            template.id.blue(),
            template.name.bold(),
            template.fields.len(),
            template.category,
            premium
        );
        let _ = writeln!(out, "{:<14} {}", "", template.description.dimmed());
    }
    out
}

/// One line per stored form
pub fn render_form_list(forms: &[FormDocument]) -> String {
    if forms.is_empty() {
        return "No forms stored\n".to_string();
    }
    let mut out = String::new();
    for form in forms {
        let _ = writeln!(
            out,
            "{}  {}  [{}]  {} fields, v{}",
            form.id.as_str().blue(),
            form.title.bold(),
            status_label(form.status),
            form.field_count(),
            form.version
        );
    }
    out
}

/// Form header followed by its fields in display order
pub fn render_form(form: &FormDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", form.title.bold().underline());
    if !form.description.is_empty() {
        let _ = writeln!(out, "{}", form.description);
    }
    let _ = writeln!(
        out,
        "id: {}  status: {}  version: {}  updated: {}",
        form.id.as_str().blue(),
        status_label(form.status),
        form.version,
        form.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out.push('\n');

    if form.fields.is_empty() {
        let _ = writeln!(out, "  {}", "(no fields)".dimmed());
    }
    for (index, field) in form.fields.iter().enumerate() {
        let required = if field.required {
            " *".red().to_string()
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "  {:>2}. {}{} ({})",
            index + 1,
            field.label,
            required,
            field.field_type.as_str().blue()
        );
        if !field.options.is_empty() {
            let _ = writeln!(out, "      options: {}", field.options.join(", ").dimmed());
        }
    }
    out
}

/// Validation report for one form
pub fn render_validation(name: &str, result: &ValidationResult) -> String {
    let mut out = String::new();
    if result.valid {
        let _ = writeln!(out, "{} {}", "✓".green(), name);
    } else {
        let _ = writeln!(out, "{} {}", "✗".red(), name);
    }
    for error in &result.errors {
        let _ = writeln!(out, "    {} {}", "error:".red(), error);
    }
    for warning in &result.warnings {
        let _ = writeln!(out, "    {} {}", "warning:".yellow(), warning.message);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use formforge_ir::Validator;

    #[test]
    fn test_catalog_lists_every_type() {
        let text = render_catalog();
        assert!(text.contains("Short Text"));
        assert!(text.contains("Date & Time"));
        assert!(text.contains("Hidden Field"));
    }

    #[test]
    fn test_templates_mark_premium() {
        let text = render_templates(&FormTemplate::builtins());
        assert!(text.contains("Contact Form"));
        assert!(text.contains("premium"));
    }

    #[test]
    fn test_render_form_lists_fields_in_order() {
        let form = FormTemplate::find("contact").unwrap().instantiate_default();
        let text = render_form(&form);
        let name = text.find("Full Name").unwrap();
        let message = text.find("Message").unwrap();
        assert!(name < message);
        assert!(text.contains("Draft"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(render_form_list(&[]), "No forms stored\n");
    }

    #[test]
    fn test_render_validation() {
        let form = FormDocument::new("");
        let result = Validator::with_default_rules().validate(&form);
        let text = render_validation("broken", &result);
        assert!(text.contains("Form title cannot be empty"));
        assert!(text.contains("Form has no fields"));
    }

    #[test]
    fn test_json_output() {
        let form = FormDocument::new("Json");
        let compact = to_json(&form, false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(to_json(&form, true).unwrap().contains('\n'));
    }
}
