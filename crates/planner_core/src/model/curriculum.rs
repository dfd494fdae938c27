//! Phase → subject → task hierarchy.
//!
//! # Invariants
//! - `Phase::number` is unique across all phases.
//! - `subjects` and `tasks` keep storage order (ascending id).

use super::{require_max_chars, require_not_blank, ModelValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type PhaseId = i64;
pub type SubjectId = i64;
pub type TaskId = i64;

pub const PHASE_NAME_MAX_CHARS: usize = 100;
pub const PHASE_DATE_RANGE_MAX_CHARS: usize = 100;
pub const SUBJECT_NAME_MAX_CHARS: usize = 100;
pub const TASK_DESCRIPTION_MAX_CHARS: usize = 255;

/// Top-level curriculum stage, loaded with its subjects and their tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub id: PhaseId,
    /// Unique sequence number; phases list in ascending `number`.
    pub number: i64,
    pub name: String,
    pub description: String,
    /// Free-form period label such as `2026-09 ~ 2026-12`.
    pub date_range: String,
    pub subjects: Vec<Subject>,
}

/// Named topic grouped under one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: SubjectId,
    pub phase_id: PhaseId,
    pub name: String,
    pub tasks: Vec<Task>,
}

/// Single actionable item under one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub subject_id: SubjectId,
    pub description: String,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "阶段{}: {}", self.number, self.name)
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

/// Creation payload for a phase. Phases are managed out of band (seeding).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPhase {
    pub number: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date_range: String,
}

impl NewPhase {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_not_blank("name", &self.name)?;
        require_max_chars("name", &self.name, PHASE_NAME_MAX_CHARS)?;
        require_max_chars("date_range", &self.date_range, PHASE_DATE_RANGE_MAX_CHARS)
    }
}

/// Creation payload for a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubject {
    pub name: String,
}

impl NewSubject {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_not_blank("name", &self.name)?;
        require_max_chars("name", &self.name, SUBJECT_NAME_MAX_CHARS)
    }
}

/// Creation payload for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub description: String,
}

impl NewTask {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_not_blank("description", &self.description)?;
        require_max_chars("description", &self.description, TASK_DESCRIPTION_MAX_CHARS)
    }
}
