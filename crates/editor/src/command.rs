//! Editor commands
//!
//! Serializable edits that can be replayed against a session, one per user
//! action. A script is a JSON array of commands:
//!
//! ```json
//! [
//!   { "action": "set_title", "title": "Event signup" },
//!   { "action": "drag", "source": "palette-email", "target": "form-canvas" },
//!   { "action": "update_selected", "changes": { "required": true } }
//! ]
//! ```

use crate::drag::DragOutcome;
use crate::session::EditorSession;
use formforge_core::{BuilderResult, FieldId, FieldType};
use formforge_ir::{FieldChanges, FormStatus, InsertPosition, SettingsChanges};
use serde::{Deserialize, Serialize};

/// One replayable edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditorCommand {
    SetTitle {
        title: String,
    },
    SetDescription {
        description: String,
    },
    AddField {
        #[serde(rename = "type")]
        field_type: FieldType,
        #[serde(default)]
        position: InsertPosition,
    },
    UpdateField {
        field_id: FieldId,
        changes: FieldChanges,
    },
    DeleteField {
        field_id: FieldId,
    },
    ReorderField {
        from: usize,
        to: usize,
    },
    Select {
        #[serde(default)]
        field_id: Option<FieldId>,
    },
    UpdateSelected {
        changes: FieldChanges,
    },
    Drag {
        source: String,
        #[serde(default)]
        target: Option<String>,
    },
    SetStatus {
        status: FormStatus,
    },
    SetSettings {
        settings: SettingsChanges,
    },
}

/// What applying a command did
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The document changed
    Applied,
    /// A field was created
    FieldAdded(FieldId),
    /// Only the selection changed
    Selected,
    /// Nothing changed (missing field, nothing selected)
    NoChange,
    /// Result of a drag gesture
    Drag(DragOutcome),
}

impl CommandOutcome {
    /// Whether the document changed
    pub fn changed(&self) -> bool {
        match self {
            CommandOutcome::Applied | CommandOutcome::FieldAdded(_) => true,
            CommandOutcome::Drag(outcome) => outcome.changed(),
            CommandOutcome::Selected | CommandOutcome::NoChange => false,
        }
    }
}

impl EditorCommand {
    /// Parse a JSON array of commands
    pub fn parse_script(json: &str) -> BuilderResult<Vec<EditorCommand>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Short name used in logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            EditorCommand::SetTitle { .. } => "set_title",
            EditorCommand::SetDescription { .. } => "set_description",
            EditorCommand::AddField { .. } => "add_field",
            EditorCommand::UpdateField { .. } => "update_field",
            EditorCommand::DeleteField { .. } => "delete_field",
            EditorCommand::ReorderField { .. } => "reorder_field",
            EditorCommand::Select { .. } => "select",
            EditorCommand::UpdateSelected { .. } => "update_selected",
            EditorCommand::Drag { .. } => "drag",
            EditorCommand::SetStatus { .. } => "set_status",
            EditorCommand::SetSettings { .. } => "set_settings",
        }
    }
}

fn changed(applied: bool) -> CommandOutcome {
    if applied {
        CommandOutcome::Applied
    } else {
        CommandOutcome::NoChange
    }
}

impl EditorSession {
    /// Apply one command
    ///
    /// Errors are the ones the underlying operation reports (no document,
    /// index out of range, a form that fails validation on publish).
    pub fn apply(&mut self, command: EditorCommand) -> BuilderResult<CommandOutcome> {
        let outcome = match command {
            EditorCommand::SetTitle { title } => {
                self.set_title(title)?;
                CommandOutcome::Applied
            }
            EditorCommand::SetDescription { description } => {
                self.set_description(description)?;
                CommandOutcome::Applied
            }
            EditorCommand::AddField {
                field_type,
                position,
            } => CommandOutcome::FieldAdded(self.add_field(field_type, position)?),
            EditorCommand::UpdateField { field_id, changes } => {
                changed(self.update_field(&field_id, changes))
            }
            EditorCommand::DeleteField { field_id } => {
                changed(self.delete_field(&field_id).is_some())
            }
            EditorCommand::ReorderField { from, to } => {
                self.reorder_field(from, to)?;
                CommandOutcome::Applied
            }
            EditorCommand::Select { field_id } => {
                self.select(field_id);
                CommandOutcome::Selected
            }
            EditorCommand::UpdateSelected { changes } => changed(self.update_selected(changes)),
            EditorCommand::Drag { source, target } => {
                self.drag_start(&source);
                CommandOutcome::Drag(self.drag_end(&source, target.as_deref()))
            }
            EditorCommand::SetStatus { status } => {
                self.set_status(status)?;
                CommandOutcome::Applied
            }
            EditorCommand::SetSettings { settings } => {
                self.set_settings(settings)?;
                CommandOutcome::Applied
            }
        };
        Ok(outcome)
    }

    /// Apply commands in order, stopping at the first error
    pub fn apply_all(
        &mut self,
        commands: impl IntoIterator<Item = EditorCommand>,
    ) -> BuilderResult<Vec<CommandOutcome>> {
        commands.into_iter().map(|c| self.apply(c)).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
