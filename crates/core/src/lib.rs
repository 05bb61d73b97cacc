//! # FormForge Core
//!
//! Core types, traits, and error handling for FormForge.
//!
//! This crate provides the foundational building blocks used throughout
//! the workspace, including:
//!
//! - **Types**: Field and form identifiers, the closed `FieldType` set
//! - **Traits**: Common behaviors like `Validatable` and `Timestamped`
//! - **Errors**: Unified error handling with `BuilderError` and `BuilderResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{BuilderError, BuilderResult};
pub use traits::{Timestamped, Validatable};
pub use types::{FIELD_ID_PREFIX, FORM_ID_PREFIX, FieldId, FieldType, FormId, TEMP_ID_PREFIX};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
