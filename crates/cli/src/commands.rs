//! Subcommand handlers

use crate::output::{self, OutputFormat};
use anyhow::{Context, Result, bail};
use formforge_core::FormId;
use formforge_editor::{
    EditorCommand, EditorSession, FileGateway, PersistenceGateway, SaveOutcome,
};
use formforge_ir::serialization::{is_form_file, load_form};
use formforge_ir::validation::ValidationResult;
use formforge_ir::{FieldCatalog, FormDocument, FormStatus, FormTemplate, Validator};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Shared state for one CLI invocation
pub struct CommandContext {
    pub gateway: FileGateway,
    pub format: OutputFormat,
    pub pretty: bool,
}

impl CommandContext {
    fn print_json<T: Serialize>(&self, data: &T) -> Result<()> {
        println!("{}", output::to_json(data, self.pretty)?);
        Ok(())
    }

    async fn open(&self, form: &str) -> Result<EditorSession> {
        let mut session = EditorSession::new();
        session
            .load(&self.gateway, &FormId::new(form))
            .await
            .with_context(|| format!("could not open form '{}'", form))?;
        Ok(session)
    }
}

#[derive(Serialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    field_type: String,
    label: &'static str,
    description: &'static str,
    category: String,
    default_label: String,
    default_placeholder: String,
    choice: bool,
}

pub fn catalog(ctx: &CommandContext) -> Result<()> {
    match ctx.format {
        OutputFormat::Text => print!("{}", output::render_catalog()),
        OutputFormat::Json => {
            let entries: Vec<_> = FieldCatalog::all()
                .into_iter()
                .map(|d| CatalogEntry {
                    field_type: d.field_type.to_string(),
                    label: d.label,
                    description: d.description,
                    category: d.category.to_string(),
                    default_label: d.default_label(),
                    default_placeholder: d.default_placeholder(),
                    choice: d.is_choice(),
                })
                .collect();
            ctx.print_json(&entries)?;
        }
    }
    Ok(())
}

pub fn templates(ctx: &CommandContext) -> Result<()> {
    let templates = FormTemplate::builtins();
    match ctx.format {
        OutputFormat::Text => print!("{}", output::render_templates(&templates)),
        OutputFormat::Json => ctx.print_json(&templates)?,
    }
    Ok(())
}

pub async fn new_form(
    ctx: &CommandContext,
    template: &str,
    title: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let template = FormTemplate::find(template)?;
    let form = template.instantiate(
        title.unwrap_or_else(|| template.name.clone()),
        description.unwrap_or_else(|| template.description.clone()),
    );
    let stored = ctx.gateway.save(&form).await?;
    info!(form = %stored.id, template = %template.id, "created form");

    match ctx.format {
        OutputFormat::Text => println!("Created {} ({})", stored.title, stored.id),
        OutputFormat::Json => ctx.print_json(&stored)?,
    }
    Ok(())
}

pub async fn duplicate(ctx: &CommandContext, form: &str) -> Result<()> {
    let session = ctx.open(form).await?;
    let original = session.document().context("form was not loaded")?;
    let stored = ctx.gateway.save(&original.duplicate()).await?;

    match ctx.format {
        OutputFormat::Text => println!("Created {} ({})", stored.title, stored.id),
        OutputFormat::Json => ctx.print_json(&stored)?,
    }
    Ok(())
}

pub async fn list(ctx: &CommandContext) -> Result<()> {
    let forms = ctx.gateway.list().await?;
    match ctx.format {
        OutputFormat::Text => print!("{}", output::render_form_list(&forms)),
        OutputFormat::Json => ctx.print_json(&forms)?,
    }
    Ok(())
}

pub async fn show(ctx: &CommandContext, form: &str) -> Result<()> {
    let session = ctx.open(form).await?;
    let document = session.document().context("form was not loaded")?;
    match ctx.format {
        OutputFormat::Text => print!("{}", output::render_form(document)),
        OutputFormat::Json => ctx.print_json(document)?,
    }
    Ok(())
}

#[derive(Serialize)]
struct ValidationReport {
    name: String,
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationReport {
    fn new(name: String, result: &ValidationResult) -> Self {
        Self {
            name,
            valid: result.valid,
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
            warnings: result.warnings.iter().map(|w| w.message.clone()).collect(),
        }
    }
}

/// Collect the forms a `validate` target refers to
async fn validation_targets(
    ctx: &CommandContext,
    target: &str,
) -> Result<Vec<(String, FormDocument)>> {
    let path = Path::new(target);
    if path.is_dir() {
        let mut forms = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && is_form_file(entry.path()) {
                debug!(path = %entry.path().display(), "validating file");
                let form = load_form(entry.path())?;
                forms.push((entry.path().display().to_string(), form));
            }
        }
        return Ok(forms);
    }
    if path.is_file() {
        return Ok(vec![(target.to_string(), load_form(path)?)]);
    }

    let form = ctx
        .gateway
        .load(&FormId::new(target))
        .await
        .with_context(|| format!("'{}' is neither a path nor a stored form", target))?;
    Ok(vec![(form.id.to_string(), form)])
}

pub async fn validate(ctx: &CommandContext, target: &str) -> Result<()> {
    let validator = Validator::with_default_rules();
    let forms = validation_targets(ctx, target).await?;
    if forms.is_empty() {
        bail!("no form files found under '{}'", target);
    }

    let results: Vec<_> = forms
        .iter()
        .map(|(name, form)| (name, validator.validate(form)))
        .collect();

    let reports: Vec<_> = results
        .iter()
        .map(|(name, result)| ValidationReport::new(name.to_string(), result))
        .collect();

    match ctx.format {
        OutputFormat::Text => {
            for (name, result) in &results {
                print!("{}", output::render_validation(name, result));
            }
        }
        OutputFormat::Json => ctx.print_json(&reports)?,
    }

    let failed = reports.iter().filter(|r| !r.valid).count();
    if failed > 0 {
        bail!("{} of {} form(s) failed validation", failed, reports.len());
    }
    Ok(())
}

#[derive(Serialize)]
struct EditReport {
    form: String,
    commands: usize,
    changed: usize,
    saved: bool,
}

pub async fn edit(ctx: &CommandContext, form: &str, script: &Path, dry_run: bool) -> Result<()> {
    let json = std::fs::read_to_string(script)
        .with_context(|| format!("could not read script {}", script.display()))?;
    let commands = EditorCommand::parse_script(&json)
        .with_context(|| format!("invalid edit script {}", script.display()))?;

    let mut session = ctx.open(form).await?;
    let total = commands.len();
    let mut changed = 0;
    for (index, command) in commands.into_iter().enumerate() {
        let name = command.name();
        let outcome = session
            .apply(command)
            .with_context(|| format!("command {} ({}) failed", index + 1, name))?;
        debug!(index, command = name, ?outcome, "applied command");
        if outcome.changed() {
            changed += 1;
        }
    }

    let saved = if dry_run {
        false
    } else {
        session.save(&ctx.gateway).await?.is_saved()
    };

    match ctx.format {
        OutputFormat::Text => {
            println!("Applied {} command(s), {} changed the form", total, changed);
            if saved {
                println!("Saved {}", session.display_title());
            } else if dry_run {
                println!("Dry run: nothing saved");
            } else {
                println!("No changes to save");
            }
        }
        OutputFormat::Json => ctx.print_json(&EditReport {
            form: form.to_string(),
            commands: total,
            changed,
            saved,
        })?,
    }
    Ok(())
}

pub async fn publish(ctx: &CommandContext, form: &str) -> Result<()> {
    let mut session = ctx.open(form).await?;
    session
        .set_status(FormStatus::Published)
        .with_context(|| format!("form '{}' cannot be published", form))?;

    match session.save(&ctx.gateway).await? {
        SaveOutcome::Saved | SaveOutcome::SavedWithPendingChanges => {}
        other => bail!("publishing '{}' was not saved: {:?}", form, other),
    }

    let document = session.document().context("form was not loaded")?;
    match ctx.format {
        OutputFormat::Text => println!("Published {} ({})", document.title, document.id),
        OutputFormat::Json => ctx.print_json(document)?,
    }
    Ok(())
}
