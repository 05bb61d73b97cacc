//! Drag-reorder engine
//!
//! Drag sources and drop targets arrive as opaque string tokens from the
//! palette/canvas UI. Palette tokens are `palette-<type>`; the canvas is
//! either `form-canvas` or its empty-state `canvas-drop-zone`. Every other
//! token names a field id.
//!
//! `plan_drop` decides what a completed drop means for a document without
//! touching it; the session executes the plan.

use formforge_core::{FieldId, FieldType};
use formforge_ir::{Field, FormDocument};
use std::fmt;

// ============================================================================
// Tokens
// ============================================================================

/// Prefix carried by palette drag sources
pub const PALETTE_PREFIX: &str = "palette-";

/// Id of the canvas root drop target
pub const CANVAS_ROOT_ID: &str = "form-canvas";

/// Id of the canvas drop zone shown while the form has no fields
pub const CANVAS_DROP_ZONE_ID: &str = "canvas-drop-zone";

/// Token for dragging a field type out of the palette
pub fn palette_token(field_type: FieldType) -> String {
    format!("{}{}", PALETTE_PREFIX, field_type)
}

// ============================================================================
// DragSource
// ============================================================================

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    /// A field type from the palette
    Palette(FieldType),
    /// A palette token whose type is not recognised
    UnknownPalette(String),
    /// An existing field, by id
    Field(FieldId),
}

impl DragSource {
    /// Classify a source token
    pub fn parse(token: &str) -> Self {
        match token.strip_prefix(PALETTE_PREFIX) {
            Some(raw) => match raw.parse::<FieldType>() {
                Ok(field_type) => DragSource::Palette(field_type),
                Err(_) => DragSource::UnknownPalette(raw.to_string()),
            },
            None => DragSource::Field(FieldId::new(token)),
        }
    }

    /// Whether the source came from the palette
    pub fn is_palette(&self) -> bool {
        matches!(self, DragSource::Palette(_) | DragSource::UnknownPalette(_))
    }
}

impl fmt::Display for DragSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragSource::Palette(field_type) => write!(f, "{}{}", PALETTE_PREFIX, field_type),
            DragSource::UnknownPalette(raw) => write!(f, "{}{}", PALETTE_PREFIX, raw),
            DragSource::Field(id) => write!(f, "{}", id),
        }
    }
}

// ============================================================================
// DropTarget
// ============================================================================

/// Where a drag was released
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// The canvas root or its empty-state drop zone
    Canvas,
    /// An existing field, by id
    Field(FieldId),
}

impl DropTarget {
    /// Classify a target token
    pub fn parse(token: &str) -> Self {
        match token {
            CANVAS_ROOT_ID | CANVAS_DROP_ZONE_ID => DropTarget::Canvas,
            other => DropTarget::Field(FieldId::new(other)),
        }
    }
}

// ============================================================================
// Drag State
// ============================================================================

/// Field shown under the pointer while dragging
#[derive(Debug, Clone, PartialEq)]
pub enum DragPreview {
    /// Transient field synthesized from a palette source
    Ghost(Field),
    /// A live field of the current document, resolved on read
    Existing(FieldId),
}

/// State for an in-progress drag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragState {
    preview: Option<DragPreview>,
}

impl DragState {
    /// Create an idle drag state
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging with the given preview
    pub fn start(&mut self, preview: Option<DragPreview>) {
        self.preview = preview;
    }

    /// Stop dragging
    pub fn stop(&mut self) {
        self.preview = None;
    }

    /// Whether a preview is being shown
    pub fn is_dragging(&self) -> bool {
        self.preview.is_some()
    }

    /// The current preview, if any
    pub fn preview(&self) -> Option<&DragPreview> {
        self.preview.as_ref()
    }

    /// Resolve the preview to a field for display
    pub fn resolve<'a>(&'a self, form: Option<&'a FormDocument>) -> Option<&'a Field> {
        match self.preview.as_ref()? {
            DragPreview::Ghost(field) => Some(field),
            DragPreview::Existing(id) => form?.field(id),
        }
    }
}

/// Build the preview for a drag source
///
/// Palette sources get a ghost with a temporary id; field sources are kept
/// only if the field exists in `form`.
pub fn preview_for(source: &DragSource, form: Option<&FormDocument>) -> Option<DragPreview> {
    match source {
        DragSource::Palette(field_type) => Some(DragPreview::Ghost(Field::preview(*field_type))),
        DragSource::UnknownPalette(_) => None,
        DragSource::Field(id) => form
            .filter(|f| f.contains_field(id))
            .map(|_| DragPreview::Existing(id.clone())),
    }
}

// ============================================================================
// Drop Planning
// ============================================================================

/// Mutation a completed drop asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    /// Append a new field of this type
    Append(FieldType),
    /// Move the field at `from` to `to`
    Reorder { from: usize, to: usize },
}

/// Why a drop had no effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropIgnored {
    /// Released outside any target
    NoTarget,
    /// No form is open
    NoDocument,
    /// Palette token with an unrecognised type
    UnknownPaletteType(String),
    /// Palette item released over something other than the canvas
    PaletteOffCanvas,
    /// Field released over the canvas rather than another field
    FieldOnCanvas,
    /// Field released over itself
    SameField,
    /// Source or target id is not in the form
    UnknownField(FieldId),
}

impl fmt::Display for DropIgnored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropIgnored::NoTarget => write!(f, "dropped outside any target"),
            DropIgnored::NoDocument => write!(f, "no form is open"),
            DropIgnored::UnknownPaletteType(raw) => write!(f, "unknown palette type '{}'", raw),
            DropIgnored::PaletteOffCanvas => write!(f, "palette item dropped off the canvas"),
            DropIgnored::FieldOnCanvas => write!(f, "field dropped on the canvas"),
            DropIgnored::SameField => write!(f, "field dropped on itself"),
            DropIgnored::UnknownField(id) => write!(f, "unknown field '{}'", id),
        }
    }
}

/// What a completed drag did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// A palette item became a new field, now selected
    Inserted(FieldId),
    /// A field moved
    Reordered { from: usize, to: usize },
    /// The gesture had no effect
    Ignored(DropIgnored),
    /// The planned mutation was rejected by the document
    Failed(String),
}

impl DragOutcome {
    /// Whether the document changed
    pub fn changed(&self) -> bool {
        matches!(self, DragOutcome::Inserted(_) | DragOutcome::Reordered { .. })
    }
}

/// Decide what a drop of `source` onto `target` does to `form`
pub fn plan_drop(
    source: &DragSource,
    target: Option<&DropTarget>,
    form: Option<&FormDocument>,
) -> Result<DropAction, DropIgnored> {
    let target = target.ok_or(DropIgnored::NoTarget)?;
    let form = form.ok_or(DropIgnored::NoDocument)?;

    match (source, target) {
        (DragSource::Palette(field_type), DropTarget::Canvas) => Ok(DropAction::Append(*field_type)),
        (DragSource::UnknownPalette(raw), _) => Err(DropIgnored::UnknownPaletteType(raw.clone())),
        (DragSource::Palette(_), DropTarget::Field(_)) => Err(DropIgnored::PaletteOffCanvas),
        (DragSource::Field(_), DropTarget::Canvas) => Err(DropIgnored::FieldOnCanvas),
        (DragSource::Field(from_id), DropTarget::Field(to_id)) => {
            if from_id == to_id {
                return Err(DropIgnored::SameField);
            }
            let from = form
                .field_index(from_id)
                .ok_or_else(|| DropIgnored::UnknownField(from_id.clone()))?;
            let to = form
                .field_index(to_id)
                .ok_or_else(|| DropIgnored::UnknownField(to_id.clone()))?;
            Ok(DropAction::Reorder { from, to })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
