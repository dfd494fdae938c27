//! Out-of-band curriculum loading.
//!
//! # Responsibility
//! - Parse a JSON curriculum document (phases → subjects → task strings).
//! - Write it in one transaction so a failed load leaves storage untouched.
//!
//! # Invariants
//! - Phase numbers must be unique within the document.
//! - `SeedMode::Insert` never touches existing phases.
//! - `SeedMode::Replace` deletes an existing phase with the same number
//!   (cascading to its subjects, tasks and notes) before re-creating it.

use crate::db::with_transaction;
use crate::model::curriculum::{NewPhase, NewSubject, NewTask};
use crate::repo::phase_repo::{PhaseRepository, SqlitePhaseRepository};
use crate::repo::RepoError;
use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Whole curriculum document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumSeed {
    pub phases: Vec<PhaseSeed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSeed {
    #[serde(flatten)]
    pub phase: NewPhase,
    #[serde(default)]
    pub subjects: Vec<SubjectSeed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSeed {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    Insert,
    Replace,
}

/// Counts of rows written by one seed load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub phases: usize,
    pub subjects: usize,
    pub tasks: usize,
    /// Existing phases removed in `SeedMode::Replace`.
    pub replaced: usize,
}

#[derive(Debug)]
pub enum SeedError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    DuplicateNumberInDocument(i64),
    Repo(RepoError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read seed document: {err}"),
            Self::Parse(err) => write!(f, "invalid seed document: {err}"),
            Self::DuplicateNumberInDocument(number) => {
                write!(f, "phase number {number} appears more than once in the seed document")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::DuplicateNumberInDocument(_) => None,
        }
    }
}

impl From<RepoError> for SeedError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for SeedError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

impl CurriculumSeed {
    pub fn from_json_str(text: &str) -> Result<Self, SeedError> {
        serde_json::from_str(text).map_err(SeedError::Parse)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let text = std::fs::read_to_string(path).map_err(SeedError::Io)?;
        Self::from_json_str(&text)
    }

    fn check_unique_numbers(&self) -> Result<(), SeedError> {
        let mut seen = BTreeSet::new();
        for entry in &self.phases {
            if !seen.insert(entry.phase.number) {
                return Err(SeedError::DuplicateNumberInDocument(entry.phase.number));
            }
        }
        Ok(())
    }
}

/// Writes `seed` into storage inside one transaction.
pub fn apply_seed(
    conn: &mut Connection,
    seed: &CurriculumSeed,
    mode: SeedMode,
) -> Result<SeedSummary, SeedError> {
    seed.check_unique_numbers()?;

    let summary = with_transaction(conn, |tx| -> Result<SeedSummary, SeedError> {
        let repo = SqlitePhaseRepository::try_new(tx)?;
        let mut summary = SeedSummary::default();

        for entry in &seed.phases {
            if mode == SeedMode::Replace {
                if let Some(existing) = repo.find_phase_by_number(entry.phase.number)? {
                    repo.delete_phase(existing)?;
                    summary.replaced += 1;
                }
            }

            let phase_id = repo.create_phase(&entry.phase)?;
            summary.phases += 1;

            for subject in &entry.subjects {
                let subject_id = repo.create_subject(phase_id, &NewSubject::new(&subject.name))?;
                summary.subjects += 1;

                for task in &subject.tasks {
                    repo.create_task(subject_id, &NewTask::new(task))?;
                    summary.tasks += 1;
                }
            }
        }

        Ok(summary)
    })?;

    info!(
        "event=seed_apply module=seed status=ok phases={} subjects={} tasks={} replaced={}",
        summary.phases, summary.subjects, summary.tasks, summary.replaced
    );
    Ok(summary)
}
