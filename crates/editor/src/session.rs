//! Editing session
//!
//! `EditorSession` owns at most one `FormDocument` and everything the editor
//! tracks around it: the draft/dirty flag, the selected field, the drag
//! preview and the load/save bookkeeping.
//!
//! Loads and saves are split into `begin_*`/`complete_*` pairs so that the
//! session can keep accepting edits while a gateway call is in flight. Each
//! ticket carries the session epoch (bumped on every load, open and clear)
//! and saves additionally carry a sequence number and the revision they
//! snapshotted. Completions from an older epoch, or older than a save
//! response already applied, are discarded.

use crate::drag::{self, DragOutcome, DragPreview, DragSource, DragState, DropAction, DropTarget};
use crate::gateway::PersistenceGateway;
use formforge_core::{BuilderError, BuilderResult, FieldId, FieldType, FormId};
use formforge_ir::{
    Field, FieldChanges, FormDocument, FormStatus, InsertPosition, SettingsChanges, Validator,
};
use std::collections::HashSet;
use tracing::{debug, info, trace, warn};

// ============================================================================
// Draft State
// ============================================================================

/// Whether the open document has unsaved changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftState {
    /// Matches the last persisted copy
    #[default]
    Clean,
    /// Has local edits not yet saved
    Dirty,
}

impl DraftState {
    pub fn is_dirty(&self) -> bool {
        matches!(self, DraftState::Dirty)
    }
}

// ============================================================================
// Selection State
// ============================================================================

/// The field whose properties are being edited
///
/// Held by id only. An id that is not in the document is a legal selection
/// that resolves to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    field: Option<FieldId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection
    pub fn select(&mut self, field: Option<FieldId>) {
        self.field = field;
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.field = None;
    }

    /// The selected id, if any
    pub fn field(&self) -> Option<&FieldId> {
        self.field.as_ref()
    }

    /// Check if a specific field is selected
    pub fn is_selected(&self, id: &FieldId) -> bool {
        self.field.as_ref() == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.field.is_none()
    }
}

// ============================================================================
// Session Status
// ============================================================================

/// Lifecycle of the session's document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No document open
    #[default]
    Empty,
    /// Waiting for the gateway to return a form
    Loading(FormId),
    /// A document is open for editing
    Ready,
    /// Loading failed; the caller has to clear or load again
    Failed(String),
}

// ============================================================================
// Tickets and Outcomes
// ============================================================================

/// Handle for an in-flight load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    epoch: u64,
    form_id: FormId,
}

impl LoadTicket {
    /// Form being loaded
    pub fn form_id(&self) -> &FormId {
        &self.form_id
    }
}

/// Result of completing a load
#[derive(Debug)]
pub enum LoadOutcome {
    /// The document is open
    Loaded,
    /// The gateway failed or the document was unusable; the session is in `Failed`
    Failed(BuilderError),
    /// The session moved on before the result arrived
    Discarded,
}

/// Handle for an in-flight save, holding the snapshot to persist
#[derive(Debug, Clone)]
pub struct SaveTicket {
    epoch: u64,
    sequence: u64,
    revision: u64,
    document: FormDocument,
}

impl SaveTicket {
    /// Snapshot to hand to the gateway
    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    /// Order in which saves were started within the session
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Result of a save
#[derive(Debug)]
pub enum SaveOutcome {
    /// Nothing to save
    Unchanged,
    /// Stored; the session is clean
    Saved,
    /// Stored, but edits made after the snapshot keep the session dirty
    SavedWithPendingChanges,
    /// The gateway failed; the session stays dirty
    Failed(BuilderError),
    /// Superseded by a newer save or by a load/clear
    Discarded,
}

impl SaveOutcome {
    /// Whether the gateway accepted the snapshot
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved | SaveOutcome::SavedWithPendingChanges)
    }
}

// ============================================================================
// EditorSession
// ============================================================================

/// One editing session over at most one form
#[derive(Debug, Default)]
pub struct EditorSession {
    document: Option<FormDocument>,
    status: SessionStatus,
    draft: DraftState,
    selection: Selection,
    drag: DragState,
    last_error: Option<String>,
    /// Bumped on every successful mutation
    revision: u64,
    /// Bumped whenever the document is replaced or released
    epoch: u64,
    next_save: u64,
    last_applied_save: Option<u64>,
}

impl EditorSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The open document
    pub fn document(&self) -> Option<&FormDocument> {
        self.document.as_ref()
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, SessionStatus::Loading(_))
    }

    pub fn draft_state(&self) -> DraftState {
        self.draft
    }

    /// Whether there are unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.draft.is_dirty()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Last load or save error, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Local edit counter
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Title for a window or prompt, with a marker when dirty
    pub fn display_title(&self) -> String {
        let title = self
            .document
            .as_ref()
            .map(|d| d.title.as_str())
            .unwrap_or("Untitled");
        let dirty = if self.is_dirty() { " *" } else { "" };
        format!("{}{}", title, dirty)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Replace everything with a fresh baseline
    fn reset(&mut self, document: Option<FormDocument>, status: SessionStatus) {
        self.epoch += 1;
        self.document = document;
        self.status = status;
        self.draft = DraftState::Clean;
        self.selection.clear();
        self.drag.stop();
        self.last_error = None;
        self.last_applied_save = None;
    }

    /// Open a document directly, e.g. one just created from a template
    pub fn open(&mut self, document: FormDocument) {
        info!(form = %document.id, fields = document.field_count(), "opened form");
        self.reset(Some(document), SessionStatus::Ready);
    }

    /// Release the document; pending load and save results will be discarded
    pub fn clear(&mut self) {
        debug!("cleared session");
        self.reset(None, SessionStatus::Empty);
    }

    /// Start loading a form, dropping whatever was open
    pub fn begin_load(&mut self, form_id: FormId) -> LoadTicket {
        self.reset(None, SessionStatus::Loading(form_id.clone()));
        LoadTicket {
            epoch: self.epoch,
            form_id,
        }
    }

    /// Apply the gateway's answer to a load
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: BuilderResult<FormDocument>,
    ) -> LoadOutcome {
        if ticket.epoch != self.epoch {
            debug!(form = %ticket.form_id, "discarding stale load result");
            return LoadOutcome::Discarded;
        }

        match result.and_then(reject_duplicate_ids) {
            Ok(document) => {
                info!(form = %document.id, fields = document.field_count(), "loaded form");
                self.document = Some(document);
                self.status = SessionStatus::Ready;
                self.draft = DraftState::Clean;
                LoadOutcome::Loaded
            }
            Err(e) => {
                warn!(form = %ticket.form_id, error = %e, "failed to load form");
                self.status = SessionStatus::Failed(e.to_string());
                self.last_error = Some(e.to_string());
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Load a form through the gateway
    pub async fn load(
        &mut self,
        gateway: &dyn PersistenceGateway,
        form_id: &FormId,
    ) -> BuilderResult<()> {
        let ticket = self.begin_load(form_id.clone());
        let result = gateway.load(form_id).await;
        match self.complete_load(ticket, result) {
            LoadOutcome::Loaded => Ok(()),
            LoadOutcome::Failed(e) => Err(e),
            LoadOutcome::Discarded => Err(BuilderError::persistence(format!(
                "load of '{}' was superseded",
                form_id
            ))),
        }
    }

    // ========================================================================
    // Saving
    // ========================================================================

    /// Snapshot the document for saving
    ///
    /// Returns `None` when there is nothing to save: no document, or no
    /// changes since the last save.
    pub fn begin_save(&mut self) -> Option<SaveTicket> {
        if !self.is_dirty() {
            trace!("save skipped: session is clean");
            return None;
        }
        let document = self.document.clone()?;
        self.next_save += 1;
        Some(SaveTicket {
            epoch: self.epoch,
            sequence: self.next_save,
            revision: self.revision,
            document,
        })
    }

    /// Apply the gateway's answer to a save
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: BuilderResult<FormDocument>,
    ) -> SaveOutcome {
        if ticket.epoch != self.epoch {
            debug!(sequence = ticket.sequence, "discarding save result for a replaced document");
            return SaveOutcome::Discarded;
        }
        if self.last_applied_save.is_some_and(|last| ticket.sequence <= last) {
            debug!(sequence = ticket.sequence, "discarding superseded save result");
            return SaveOutcome::Discarded;
        }

        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                warn!(sequence = ticket.sequence, error = %e, "save failed");
                self.last_error = Some(e.to_string());
                return SaveOutcome::Failed(e);
            }
        };

        self.last_applied_save = Some(ticket.sequence);
        self.last_error = None;

        if ticket.revision == self.revision {
            info!(form = %saved.id, version = saved.version, "saved form");
            self.document = Some(saved);
            self.draft = DraftState::Clean;
            SaveOutcome::Saved
        } else {
            info!(
                form = %saved.id,
                version = saved.version,
                "saved form; newer local edits remain unsaved"
            );
            if let Some(document) = self.document.as_mut() {
                document.version = saved.version;
                document.updated_at = saved.updated_at;
            }
            SaveOutcome::SavedWithPendingChanges
        }
    }

    /// Save through the gateway if there is anything to save
    ///
    /// Gateway failures are returned as `Err`; the session stays dirty.
    pub async fn save(&mut self, gateway: &dyn PersistenceGateway) -> BuilderResult<SaveOutcome> {
        let Some(ticket) = self.begin_save() else {
            return Ok(SaveOutcome::Unchanged);
        };
        let result = gateway.save(ticket.document()).await;
        match self.complete_save(ticket, result) {
            SaveOutcome::Failed(e) => Err(e),
            outcome => Ok(outcome),
        }
    }

    // ========================================================================
    // Document Mutations
    // ========================================================================

    fn document_mut(&mut self) -> BuilderResult<&mut FormDocument> {
        self.document.as_mut().ok_or(BuilderError::NoDocument)
    }

    fn mark_dirty(&mut self) {
        self.draft = DraftState::Dirty;
        self.revision += 1;
    }

    /// Replace the title
    pub fn set_title(&mut self, title: impl Into<String>) -> BuilderResult<()> {
        self.document_mut()?.set_title(title);
        self.mark_dirty();
        Ok(())
    }

    /// Replace the description
    pub fn set_description(&mut self, description: impl Into<String>) -> BuilderResult<()> {
        self.document_mut()?.set_description(description);
        self.mark_dirty();
        Ok(())
    }

    /// Merge a partial settings edit into the form's settings
    pub fn set_settings(&mut self, changes: SettingsChanges) -> BuilderResult<()> {
        self.document_mut()?.update_settings(changes);
        self.mark_dirty();
        Ok(())
    }

    /// Change the publication status
    ///
    /// Publishing runs the validator first and is refused with a
    /// `Validation` error if the form has problems.
    pub fn set_status(&mut self, status: FormStatus) -> BuilderResult<()> {
        let document = self.document_mut()?;
        if status == FormStatus::Published {
            Validator::with_default_rules().validate(document).to_result()?;
        }
        document.set_status(status);
        info!(form = %document.id, status = %status, "changed form status");
        self.mark_dirty();
        Ok(())
    }

    /// Add a field of the given type with catalog defaults
    pub fn add_field(
        &mut self,
        field_type: FieldType,
        position: InsertPosition,
    ) -> BuilderResult<FieldId> {
        let id = self.document_mut()?.add_field(field_type, position)?;
        debug!(field = %id, field_type = %field_type, "added field");
        self.mark_dirty();
        Ok(id)
    }

    /// Merge changes into a field
    ///
    /// Returns `false` without marking the session dirty when there is no
    /// document or no such field.
    pub fn update_field(&mut self, id: &FieldId, changes: FieldChanges) -> bool {
        let updated = self
            .document
            .as_mut()
            .is_some_and(|d| d.update_field(id, changes));
        if updated {
            self.mark_dirty();
        } else {
            debug!(field = %id, "update ignored: no such field");
        }
        updated
    }

    /// Remove a field, clearing the selection if it pointed at it
    pub fn delete_field(&mut self, id: &FieldId) -> Option<Field> {
        let removed = self.document.as_mut().and_then(|d| d.delete_field(id));
        match removed {
            Some(_) => {
                if self.selection.is_selected(id) {
                    self.selection.clear();
                }
                self.mark_dirty();
            }
            None => debug!(field = %id, "delete ignored: no such field"),
        }
        removed
    }

    /// Move the field at `from` to `to` (index after removal)
    pub fn reorder_field(&mut self, from: usize, to: usize) -> BuilderResult<()> {
        self.document_mut()?.reorder_field(from, to)?;
        self.mark_dirty();
        Ok(())
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Replace the selection; the id is not checked
    pub fn select(&mut self, field: Option<FieldId>) {
        self.selection.select(field);
    }

    /// The selected field, if it exists in the document
    pub fn selected_field(&self) -> Option<&Field> {
        let id = self.selection.field()?;
        self.document.as_ref()?.field(id)
    }

    /// Apply property edits to the selected field
    pub fn update_selected(&mut self, changes: FieldChanges) -> bool {
        match self.selection.field().cloned() {
            Some(id) => self.update_field(&id, changes),
            None => {
                debug!("property edit ignored: nothing selected");
                false
            }
        }
    }

    // ========================================================================
    // Drag and Drop
    // ========================================================================

    /// A drag left the palette or a field
    pub fn drag_start(&mut self, source: &str) {
        let source = DragSource::parse(source);
        let preview = drag::preview_for(&source, self.document.as_ref());
        if preview.is_none() {
            debug!(source = %source, "drag source has no preview");
        }
        self.drag.start(preview);
    }

    /// Pointer moved over a target; visual feedback only
    pub fn drag_over(&self, source: &str, target: Option<&str>) {
        trace!(source, ?target, "drag over");
    }

    /// A drag was released, possibly outside any target
    pub fn drag_end(&mut self, source: &str, target: Option<&str>) -> DragOutcome {
        self.drag.stop();

        let source = DragSource::parse(source);
        let target = target.map(DropTarget::parse);
        let action = match drag::plan_drop(&source, target.as_ref(), self.document.as_ref()) {
            Ok(action) => action,
            Err(reason) => {
                debug!(source = %source, %reason, "drop ignored");
                return DragOutcome::Ignored(reason);
            }
        };

        match action {
            DropAction::Append(field_type) => {
                match self.add_field(field_type, InsertPosition::End) {
                    Ok(id) => {
                        self.select(Some(id.clone()));
                        DragOutcome::Inserted(id)
                    }
                    Err(e) => {
                        debug!(error = %e, "palette drop ignored");
                        DragOutcome::Failed(e.to_string())
                    }
                }
            }
            DropAction::Reorder { from, to } => match self.reorder_field(from, to) {
                Ok(()) => DragOutcome::Reordered { from, to },
                Err(e) => {
                    debug!(error = %e, "reorder drop ignored");
                    DragOutcome::Failed(e.to_string())
                }
            },
        }
    }

    /// Field shown under the pointer, if a drag is in progress
    pub fn dragged_preview(&self) -> Option<&Field> {
        self.drag.resolve(self.document.as_ref())
    }

    /// Raw drag preview state
    pub fn drag_preview(&self) -> Option<&DragPreview> {
        self.drag.preview()
    }
}

// ============================================================================
// Tests
// ============================================================================

/// Field ids must be unique for selection and drop targeting to resolve
fn reject_duplicate_ids(document: FormDocument) -> BuilderResult<FormDocument> {
    let mut seen = HashSet::with_capacity(document.fields.len());
    for field in &document.fields {
        if !seen.insert(&field.id) {
            return Err(BuilderError::DuplicateField(field.id.to_string()));
        }
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DropIgnored;
    use crate::gateway::InMemoryGateway;
    use formforge_ir::FormTemplate;

    fn field(id: &str, field_type: FieldType) -> Field {
        Field::with_id(FieldId::new(id), field_type, id.to_uppercase())
    }

    fn session_with(fields: Vec<Field>) -> EditorSession {
        let mut session = EditorSession::new();
        session.open(FormDocument::new("Test").with_fields(fields));
        session
    }

    fn ids(session: &EditorSession) -> Vec<String> {
        session
            .document()
            .map(|d| d.fields.iter().map(|f| f.id.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = EditorSession::new();
        assert_eq!(session.status(), &SessionStatus::Empty);
        assert!(!session.is_dirty());
        assert!(!session.has_document());
        assert_eq!(session.display_title(), "Untitled");
    }

    #[test]
    fn test_open_template_is_clean() {
        let mut session = EditorSession::new();
        let form = FormTemplate::find("contact").unwrap().instantiate_default();
        session.open(form);
        assert_eq!(session.status(), &SessionStatus::Ready);
        assert!(!session.is_dirty());
        assert_eq!(session.document().unwrap().field_count(), 4);
    }

    #[test]
    fn test_add_field_ids_are_unique() {
        let mut session = session_with(vec![]);
        for field_type in FieldType::all().iter().chain(FieldType::all()) {
            session.add_field(*field_type, InsertPosition::End).unwrap();
        }
        let mut all = ids(&session);
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    fn assert_marks_dirty(name: &str, mutate: impl FnOnce(&mut EditorSession)) {
        let mut session =
            session_with(vec![field("a", FieldType::Text), field("b", FieldType::Email)]);
        assert!(!session.is_dirty());
        mutate(&mut session);
        assert!(session.is_dirty(), "{} should mark the session dirty", name);
    }

    #[test]
    fn test_every_mutation_marks_dirty() {
        assert_marks_dirty("add", |s| {
            s.add_field(FieldType::Text, InsertPosition::End).unwrap();
        });
        assert_marks_dirty("update", |s| {
            assert!(s.update_field(&FieldId::new("a"), FieldChanges::new().label("New")));
        });
        assert_marks_dirty("delete", |s| {
            assert!(s.delete_field(&FieldId::new("a")).is_some());
        });
        assert_marks_dirty("reorder", |s| s.reorder_field(0, 1).unwrap());
        assert_marks_dirty("title", |s| s.set_title("Renamed").unwrap());
        assert_marks_dirty("description", |s| s.set_description("Described").unwrap());
        assert_marks_dirty("settings", |s| {
            s.set_settings(SettingsChanges::new().require_auth(true)).unwrap()
        });
        assert_marks_dirty("archive", |s| s.set_status(FormStatus::Archived).unwrap());
    }

    #[test]
    fn test_not_found_mutations_stay_clean() {
        let mut session = session_with(vec![field("a", FieldType::Text)]);
        let missing = FieldId::new("missing");

        assert!(!session.update_field(&missing, FieldChanges::new().required(true)));
        assert!(session.delete_field(&missing).is_none());
        assert!(matches!(
            session.reorder_field(0, 3),
            Err(BuilderError::IndexOutOfBounds { index: 3, len: 1 })
        ));
        assert!(!session.is_dirty());
        assert_eq!(session.revision(), 0);
    }

    #[test]
    fn test_equal_index_reorder_marks_dirty() {
        let mut session = session_with(vec![field("a", FieldType::Text)]);
        session.reorder_field(0, 0).unwrap();
        assert!(session.is_dirty());
        assert_eq!(ids(&session), vec!["a"]);
    }

    #[test]
    fn test_mutations_without_document() {
        let mut session = EditorSession::new();
        assert!(matches!(session.set_title("x"), Err(BuilderError::NoDocument)));
        assert!(matches!(
            session.add_field(FieldType::Text, InsertPosition::End),
            Err(BuilderError::NoDocument)
        ));
        assert!(!session.update_field(&FieldId::new("a"), FieldChanges::new()));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut session =
            session_with(vec![field("a", FieldType::Text), field("b", FieldType::Email)]);
        session.select(Some(FieldId::new("a")));
        assert_eq!(session.selected_field().unwrap().label, "A");

        session.delete_field(&FieldId::new("b"));
        assert!(session.selection().is_selected(&FieldId::new("a")));

        session.delete_field(&FieldId::new("a"));
        assert!(session.selection().is_empty());
        assert_eq!(ids(&session), Vec::<String>::new());
    }

    #[test]
    fn test_select_missing_id_resolves_to_nothing() {
        let mut session = session_with(vec![field("a", FieldType::Text)]);
        session.select(Some(FieldId::new("nope")));
        assert!(!session.selection().is_empty());
        assert!(session.selected_field().is_none());
        assert!(!session.update_selected(FieldChanges::new().label("x")));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_update_selected_routes_to_field() {
        let mut session = session_with(vec![field("a", FieldType::Select)]);
        assert!(!session.update_selected(FieldChanges::new().required(true)));

        session.select(Some(FieldId::new("a")));
        assert!(session.update_selected(FieldChanges::new().options(["One", "Two"])));
        let selected = session.selected_field().unwrap();
        assert_eq!(selected.options, vec!["One", "Two"]);
        assert!(session.is_dirty());
    }

    // ------------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------------

    #[test]
    fn test_palette_drop_appends_and_selects() {
        let mut session =
            session_with(vec![field("a", FieldType::Text), field("b", FieldType::Email)]);

        session.drag_start("palette-rating");
        let ghost = session.dragged_preview().unwrap();
        assert!(ghost.id.is_temporary());
        assert_eq!(ghost.label, "Rating Field");

        let outcome = session.drag_end("palette-rating", Some("form-canvas"));
        let new_id = match outcome {
            DragOutcome::Inserted(id) => id,
            other => panic!("expected insert, got {:?}", other),
        };

        let document = session.document().unwrap();
        assert_eq!(document.field_count(), 3);
        let added = &document.fields[2];
        assert_eq!(added.id, new_id);
        assert_eq!(added.field_type, FieldType::Rating);
        assert!(!added.required);
        assert!(!added.id.is_temporary());
        assert!(!["a", "b"].contains(&added.id.as_str()));
        assert!(session.selection().is_selected(&new_id));
        assert!(session.dragged_preview().is_none());
        assert!(session.is_dirty());
    }

    #[test]
    fn test_palette_select_onto_empty_drop_zone() {
        let mut session = session_with(vec![]);
        session.drag_start("palette-select");
        session.drag_end("palette-select", Some("form-canvas"));

        let document = session.document().unwrap();
        assert_eq!(document.field_count(), 1);
        assert_eq!(document.fields[0].field_type, FieldType::Select);
        assert!(document.fields[0].options.is_empty());

        session.drag_end("palette-text", Some("canvas-drop-zone"));
        assert_eq!(session.document().unwrap().field_count(), 2);
    }

    #[test]
    fn test_field_drop_reorders() {
        let mut session = session_with(vec![
            field("a", FieldType::Text),
            field("b", FieldType::Email),
            field("c", FieldType::Number),
        ]);
        session.drag_start("c");
        assert_eq!(session.dragged_preview().unwrap().label, "C");

        let outcome = session.drag_end("c", Some("a"));
        assert_eq!(outcome, DragOutcome::Reordered { from: 2, to: 0 });
        assert_eq!(ids(&session), vec!["c", "a", "b"]);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_drag_no_ops_never_touch_fields() {
        let mut session =
            session_with(vec![field("a", FieldType::Text), field("b", FieldType::Email)]);
        let gestures: Vec<(&str, Option<&str>, DropIgnored)> = vec![
            ("a", None, DropIgnored::NoTarget),
            ("palette-rating", None, DropIgnored::NoTarget),
            ("a", Some("a"), DropIgnored::SameField),
            ("a", Some("zzz"), DropIgnored::UnknownField(FieldId::new("zzz"))),
            ("zzz", Some("a"), DropIgnored::UnknownField(FieldId::new("zzz"))),
            ("palette-text", Some("b"), DropIgnored::PaletteOffCanvas),
            (
                "palette-wormhole",
                Some("form-canvas"),
                DropIgnored::UnknownPaletteType("wormhole".to_string()),
            ),
            ("b", Some("form-canvas"), DropIgnored::FieldOnCanvas),
        ];

        for (source, target, reason) in gestures {
            session.drag_start(source);
            let outcome = session.drag_end(source, target);
            assert_eq!(outcome, DragOutcome::Ignored(reason));
            assert_eq!(ids(&session), vec!["a", "b"]);
            assert!(session.dragged_preview().is_none());
        }
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_drag_without_document_is_ignored() {
        let mut session = EditorSession::new();
        session.drag_start("palette-text");
        assert!(session.dragged_preview().is_some());
        let outcome = session.drag_end("palette-text", Some("form-canvas"));
        assert_eq!(outcome, DragOutcome::Ignored(DropIgnored::NoDocument));
        assert!(session.drag_preview().is_none());
    }

    #[test]
    fn test_existing_preview_follows_deletion() {
        let mut session = session_with(vec![field("a", FieldType::Text)]);
        session.drag_start("a");
        session.delete_field(&FieldId::new("a"));
        assert!(session.drag_preview().is_some());
        assert!(session.dragged_preview().is_none());
    }

    // ------------------------------------------------------------------------
    // Load and save
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_reorder_then_save_scenario() {
        let form = FormDocument::new("Scenario")
            .with_fields(vec![field("A", FieldType::Text), field("B", FieldType::Email)]);
        let form_id = form.id.clone();
        let gateway = InMemoryGateway::with_forms([form]);
        let mut session = EditorSession::new();

        session.load(&gateway, &form_id).await.unwrap();
        assert!(!session.is_dirty());

        session.reorder_field(0, 1).unwrap();
        assert_eq!(ids(&session), vec!["B", "A"]);
        assert!(session.is_dirty());

        let outcome = session.save(&gateway).await.unwrap();
        assert!(matches!(outcome, SaveOutcome::Saved));
        assert!(!session.is_dirty());
        assert_eq!(ids(&session), vec!["B", "A"]);
        assert_eq!(session.document().unwrap().version, 1);
        let stored = gateway.get(&form_id).unwrap();
        assert_eq!(stored.field_ids(), session.document().unwrap().field_ids());
    }

    #[tokio::test]
    async fn test_save_when_clean_is_noop() {
        let gateway = InMemoryGateway::new();
        let mut session = session_with(vec![]);
        let outcome = session.save(&gateway).await.unwrap();
        assert!(matches!(outcome, SaveOutcome::Unchanged));
        assert!(gateway.is_empty());
        assert!(session.begin_save().is_none());
    }

    #[tokio::test]
    async fn test_save_failure_keeps_dirty() {
        let gateway = InMemoryGateway::new();
        gateway.fail_saves(true);
        let mut session = session_with(vec![field("a", FieldType::Text)]);
        session.set_title("Edited").unwrap();

        let err = session.save(&gateway).await.unwrap_err();
        assert!(matches!(err, BuilderError::Persistence(_)));
        assert!(session.is_dirty());
        assert!(session.last_error().is_some());
        assert_eq!(session.document().unwrap().title, "Edited");

        gateway.fail_saves(false);
        assert!(session.save(&gateway).await.unwrap().is_saved());
        assert!(!session.is_dirty());
        assert!(session.last_error().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_is_terminal() {
        let gateway = InMemoryGateway::new();
        let mut session = EditorSession::new();
        let err = session.load(&gateway, &FormId::new("form_missing")).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(session.status(), SessionStatus::Failed(_)));
        assert!(!session.has_document());

        session.clear();
        assert_eq!(session.status(), &SessionStatus::Empty);
    }

    #[test]
    fn test_edits_during_save_keep_session_dirty() {
        let mut session = session_with(vec![field("a", FieldType::Text)]);
        session.set_title("First").unwrap();

        let ticket = session.begin_save().unwrap();
        session.set_title("Second").unwrap();

        let mut stored = ticket.document().clone();
        stored.version = 1;
        let outcome = session.complete_save(ticket, Ok(stored));

        assert!(matches!(outcome, SaveOutcome::SavedWithPendingChanges));
        assert!(session.is_dirty());
        let document = session.document().unwrap();
        assert_eq!(document.title, "Second");
        assert_eq!(document.version, 1);
    }

    #[test]
    fn test_out_of_order_saves_last_response_wins() {
        let mut session = session_with(vec![field("a", FieldType::Text)]);
        session.set_title("One").unwrap();
        let first = session.begin_save().unwrap();
        session.set_title("Two").unwrap();
        let second = session.begin_save().unwrap();

        let second_doc = second.document().clone();
        assert!(matches!(
            session.complete_save(second, Ok(second_doc)),
            SaveOutcome::Saved
        ));
        assert!(!session.is_dirty());

        let first_doc = first.document().clone();
        assert!(matches!(
            session.complete_save(first, Ok(first_doc)),
            SaveOutcome::Discarded
        ));
        assert!(!session.is_dirty());
        assert_eq!(session.document().unwrap().title, "Two");
    }

    #[test]
    fn test_load_result_after_clear_is_discarded() {
        let mut session = EditorSession::new();
        let ticket = session.begin_load(FormId::new("form_slow"));
        assert!(session.is_loading());

        session.clear();
        let outcome = session.complete_load(ticket, Ok(FormDocument::new("Late")));
        assert!(matches!(outcome, LoadOutcome::Discarded));
        assert!(!session.has_document());
        assert_eq!(session.status(), &SessionStatus::Empty);
    }

    #[test]
    fn test_save_result_after_reload_is_discarded() {
        let mut session = session_with(vec![field("a", FieldType::Text)]);
        session.set_title("Edited").unwrap();
        let ticket = session.begin_save().unwrap();

        session.open(FormDocument::new("Other"));
        let stale = ticket.document().clone();
        assert!(matches!(
            session.complete_save(ticket, Ok(stale)),
            SaveOutcome::Discarded
        ));
        assert_eq!(session.document().unwrap().title, "Other");
    }

    #[test]
    fn test_publish_requires_valid_form() {
        let mut session = session_with(vec![field("a", FieldType::Select)]);
        let err = session.set_status(FormStatus::Published).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.document().unwrap().status, FormStatus::Draft);
        assert!(!session.is_dirty());

        session.update_field(&FieldId::new("a"), FieldChanges::new().options(["Yes", "No"]));
        session.set_status(FormStatus::Published).unwrap();
        assert_eq!(session.document().unwrap().status, FormStatus::Published);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_load_rejects_duplicate_field_ids() {
        let form = FormDocument::new("Twins")
            .with_fields(vec![field("a", FieldType::Text), field("a", FieldType::Email)]);
        let mut session = EditorSession::new();
        let ticket = session.begin_load(form.id.clone());

        let outcome = session.complete_load(ticket, Ok(form));
        assert!(matches!(
            outcome,
            LoadOutcome::Failed(BuilderError::DuplicateField(ref id)) if id == "a"
        ));
        assert!(matches!(session.status(), SessionStatus::Failed(_)));
        assert!(!session.has_document());
    }

    #[test]
    fn test_load_with_block_on() {
        let form = FormDocument::new("Blocking");
        let id = form.id.clone();
        let gateway = InMemoryGateway::with_forms([form]);
        let mut session = EditorSession::new();
        tokio_test::block_on(session.load(&gateway, &id)).unwrap();
        assert_eq!(session.display_title(), "Blocking");
        session.set_title("Blocking 2").unwrap();
        assert_eq!(session.display_title(), "Blocking 2 *");
    }
}
