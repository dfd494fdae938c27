//! Phase note use-case service.
//!
//! # Responsibility
//! - Provide list/create/get/delete operations for notes scoped to a phase.
//! - Enforce the phase existence check and inbound note validation.
//!
//! # Invariants
//! - Create checks phase existence before validating content, so an unknown
//!   phase is reported even when the body is also invalid.
//! - Listing does not check phase existence; unknown phases list empty.
//! - Nothing is written when either check fails.

use crate::model::curriculum::PhaseId;
use crate::model::note::NoteId;
use crate::repo::note_repo::NoteRepository;
use crate::repo::phase_repo::PhaseRepository;
use crate::repo::{EntityRef, RepoError};
use crate::wire::{NoteInput, NoteRecord, ValidationError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Owning phase does not exist.
    PhaseNotFound(PhaseId),
    /// Note does not exist or belongs to another phase.
    NoteNotFound { phase_id: PhaseId, note_id: NoteId },
    /// Request body is not a JSON note record.
    MalformedBody(serde_json::Error),
    /// Inbound note record was rejected.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PhaseNotFound(id) => write!(f, "phase not found: {id}"),
            Self::NoteNotFound { phase_id, note_id } => {
                write!(f, "note {note_id} not found in phase {phase_id}")
            }
            Self::MalformedBody(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{}: {}", err.field, err.message),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedBody(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(EntityRef::Phase(id)) => Self::PhaseNotFound(id),
            RepoError::NotFound(EntityRef::Note { phase_id, note_id }) => {
                Self::NoteNotFound { phase_id, note_id }
            }
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for NoteServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

impl From<ValidationError> for NoteServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Note service facade over phase and note repositories.
pub struct NoteService<P: PhaseRepository, N: NoteRepository> {
    phases: P,
    notes: N,
}

impl<P: PhaseRepository, N: NoteRepository> NoteService<P, N> {
    pub fn new(phases: P, notes: N) -> Self {
        Self { phases, notes }
    }

    /// Lists notes of one phase, newest first.
    pub fn list_notes(&self, phase_id: PhaseId) -> Result<Vec<NoteRecord>, NoteServiceError> {
        let notes = self.notes.list_notes_for_phase(phase_id)?;
        Ok(notes.iter().map(NoteRecord::from).collect())
    }

    /// Creates one note for an existing phase.
    pub fn create_note(
        &self,
        phase_id: PhaseId,
        input: &NoteInput,
    ) -> Result<NoteRecord, NoteServiceError> {
        self.require_phase(phase_id)?;
        self.insert_note(phase_id, input)
    }

    /// Creates one note from a raw JSON request body.
    ///
    /// The body is only parsed once the phase is known to exist, so a missing
    /// phase is reported whatever the body contains.
    pub fn create_note_from_json(
        &self,
        phase_id: PhaseId,
        body: &[u8],
    ) -> Result<NoteRecord, NoteServiceError> {
        self.require_phase(phase_id)?;
        let input = NoteInput::from_json_bytes(body).map_err(NoteServiceError::MalformedBody)?;
        self.insert_note(phase_id, &input)
    }

    fn require_phase(&self, phase_id: PhaseId) -> Result<(), NoteServiceError> {
        if !self.phases.phase_exists(phase_id)? {
            warn!("event=note_create module=service status=error phase_id={phase_id} error_code=phase_not_found");
            return Err(NoteServiceError::PhaseNotFound(phase_id));
        }
        Ok(())
    }

    fn insert_note(
        &self,
        phase_id: PhaseId,
        input: &NoteInput,
    ) -> Result<NoteRecord, NoteServiceError> {
        let draft = input.validate()?;
        let note_id = self.notes.create_note(phase_id, &draft)?;
        let note = self
            .notes
            .get_note(phase_id, note_id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))?;

        info!("event=note_create module=service status=ok phase_id={phase_id} note_id={note_id}");
        Ok(NoteRecord::from(&note))
    }

    /// Gets one note owned by `phase_id`.
    pub fn get_note(
        &self,
        phase_id: PhaseId,
        note_id: NoteId,
    ) -> Result<NoteRecord, NoteServiceError> {
        self.notes
            .get_note(phase_id, note_id)?
            .map(|note| NoteRecord::from(&note))
            .ok_or(NoteServiceError::NoteNotFound { phase_id, note_id })
    }

    /// Deletes one note owned by `phase_id`.
    pub fn delete_note(&self, phase_id: PhaseId, note_id: NoteId) -> Result<(), NoteServiceError> {
        self.notes.delete_note(phase_id, note_id)?;
        info!("event=note_delete module=service status=ok phase_id={phase_id} note_id={note_id}");
        Ok(())
    }
}
