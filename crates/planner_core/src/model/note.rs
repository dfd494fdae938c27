//! Free-text notes attached to a phase.
//!
//! # Invariants
//! - `content` is never empty once persisted.
//! - `created_at` is assigned by storage at insertion and never changes.

use super::curriculum::PhaseId;
use super::{require_not_blank, ModelValidationError};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::{Display, Formatter};

pub type NoteId = i64;

/// Persisted note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub phase_id: PhaseId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// `created_at` as an RFC 3339 UTC string with microsecond precision.
    pub fn created_at_rfc3339(&self) -> String {
        self.created_at
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Note for phase {} at {}",
            self.phase_id,
            self.created_at_rfc3339()
        )
    }
}

/// Validated note content ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    content: String,
}

impl NewNote {
    /// Trims surrounding whitespace and rejects empty content.
    pub fn new(content: impl AsRef<str>) -> Result<Self, ModelValidationError> {
        let content = content.as_ref();
        require_not_blank("content", content)?;
        Ok(Self {
            content: content.trim().to_string(),
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
