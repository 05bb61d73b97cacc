//! # FormForge Editor
//!
//! The editing session that sits between a form builder UI and storage.
//!
//! - **EditorSession**: owns one form, tracks dirty state and selection
//! - **Drag engine**: turns palette/canvas drag tokens into inserts and reorders
//! - **PersistenceGateway**: async load/save boundary, with in-memory and
//!   file-backed implementations
//! - **EditorCommand**: serializable edits for scripted replay
//!

pub mod command;
pub mod drag;
pub mod gateway;
pub mod session;

pub use command::{CommandOutcome, EditorCommand};
pub use drag::{
    CANVAS_DROP_ZONE_ID, CANVAS_ROOT_ID, DragOutcome, DragPreview, DragSource, DropIgnored,
    DropTarget, PALETTE_PREFIX, palette_token,
};
pub use gateway::{FileGateway, InMemoryGateway, PersistenceGateway};
pub use session::{
    DraftState, EditorSession, LoadOutcome, LoadTicket, SaveOutcome, SaveTicket, Selection,
    SessionStatus,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
