//! Core traits for FormForge
//!
//! Self-validation and store-assigned timestamps, shared by fields and forms.

use crate::error::BuilderResult;
use chrono::{DateTime, Utc};

// ============================================================================
// Validatable
// ============================================================================

/// A value that can check its own consistency
///
/// Implementors report the first problem found; callers wanting a full
/// report use the rule-based validator in `formforge_ir::validation`.
///
/// ```rust,ignore
/// use formforge_core::{BuilderError, BuilderResult, Validatable};
///
/// struct Choice {
///     options: Vec<String>,
/// }
///
/// impl Validatable for Choice {
///     fn validate(&self) -> BuilderResult<()> {
///         if self.options.is_empty() {
///             return Err(BuilderError::validation("choice needs an option"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    fn validate(&self) -> BuilderResult<()>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

// ============================================================================
// Timestamped
// ============================================================================

/// A stored record with creation and last-write times
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    /// Record a write at the current time
    fn touch(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuilderError;

    struct Choice {
        options: Vec<String>,
    }

    impl Validatable for Choice {
        fn validate(&self) -> BuilderResult<()> {
            if self.options.is_empty() {
                return Err(BuilderError::field_validation("pick", "needs an option"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_is_valid_follows_validate() {
        let filled = Choice {
            options: vec!["Yes".to_string()],
        };
        assert!(filled.is_valid());

        let empty = Choice { options: vec![] };
        assert!(!empty.is_valid());
        assert!(empty.validate().unwrap_err().is_validation());
    }

    struct Record {
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    }

    impl Timestamped for Record {
        fn created_at(&self) -> DateTime<Utc> {
            self.created
        }

        fn updated_at(&self) -> DateTime<Utc> {
            self.updated
        }

        fn touch(&mut self) {
            self.updated = Utc::now();
        }
    }

    #[test]
    fn test_touch_moves_updated_forward() {
        let then = Utc::now() - chrono::Duration::hours(1);
        let mut record = Record {
            created: then,
            updated: then,
        };
        record.touch();
        assert!(record.updated_at() > record.created_at());
    }
}
