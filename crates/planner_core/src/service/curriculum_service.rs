//! Read-only curriculum use-cases plus out-of-band phase removal.

use crate::model::curriculum::PhaseId;
use crate::repo::phase_repo::PhaseRepository;
use crate::repo::{EntityRef, RepoError};
use crate::wire::PhaseRecord;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum CurriculumServiceError {
    PhaseNotFound(PhaseId),
    Repo(RepoError),
}

impl Display for CurriculumServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PhaseNotFound(id) => write!(f, "phase not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CurriculumServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::PhaseNotFound(_) => None,
        }
    }
}

impl From<RepoError> for CurriculumServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(EntityRef::Phase(id)) => Self::PhaseNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for CurriculumServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Curriculum service facade over a phase repository.
pub struct CurriculumService<R: PhaseRepository> {
    repo: R,
}

impl<R: PhaseRepository> CurriculumService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all phases by ascending `number`, fully nested.
    pub fn list_phases(&self) -> Result<Vec<PhaseRecord>, CurriculumServiceError> {
        let phases = self.repo.list_phases()?;
        Ok(phases.iter().map(PhaseRecord::from).collect())
    }

    /// Gets one phase with its subjects and tasks.
    pub fn get_phase(&self, id: PhaseId) -> Result<PhaseRecord, CurriculumServiceError> {
        self.repo
            .get_phase(id)?
            .map(|phase| PhaseRecord::from(&phase))
            .ok_or(CurriculumServiceError::PhaseNotFound(id))
    }

    /// Deletes one phase; subjects, tasks and notes go with it.
    pub fn delete_phase(&self, id: PhaseId) -> Result<(), CurriculumServiceError> {
        self.repo.delete_phase(id)?;
        info!("event=phase_delete module=service status=ok phase_id={id}");
        Ok(())
    }
}
