//! Domain model for the study curriculum and phase notes.
//!
//! # Responsibility
//! - Define plain data structures for phases, subjects, tasks and notes.
//! - Validate field constraints before anything reaches storage.
//!
//! # Invariants
//! - Identifiers are assigned by storage and never reused.
//! - Child entities are owned by exactly one parent.

pub mod curriculum;
pub mod note;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure for draft entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Required text field is empty or whitespace only.
    Blank { field: &'static str },
    /// Text field exceeds its maximum length in characters.
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

impl ModelValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field } | Self::TooLong { field, .. } => field,
        }
    }
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max, actual } => write!(
                f,
                "{field} must be at most {max} characters, got {actual}"
            ),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn require_not_blank(field: &'static str, value: &str) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::Blank { field });
    }
    Ok(())
}

pub(crate) fn require_max_chars(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ModelValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ModelValidationError::TooLong { field, max, actual });
    }
    Ok(())
}
