//! Core domain logic for the study planner.
//!
//! Curriculum (phase → subject → task) is read-only to API callers; notes
//! are created, listed and deleted per phase. This crate owns storage,
//! wire records and the request-level operations; transports live elsewhere.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod wire;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::curriculum::{
    NewPhase, NewSubject, NewTask, Phase, PhaseId, Subject, SubjectId, Task, TaskId,
};
pub use model::note::{NewNote, Note, NoteId};
pub use model::ModelValidationError;
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::phase_repo::{PhaseRepository, SqlitePhaseRepository};
pub use repo::{EntityRef, RepoError, RepoResult};
pub use seed::{apply_seed, CurriculumSeed, SeedError, SeedMode, SeedSummary};
pub use service::curriculum_service::{CurriculumService, CurriculumServiceError};
pub use service::note_service::{NoteService, NoteServiceError};
pub use wire::{NoteInput, NoteRecord, PhaseRecord, SubjectRecord, TaskRecord, ValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
