//! Curriculum repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Load phases fully nested with their subjects and tasks.
//! - Provide the out-of-band write paths used by seeding and maintenance.
//!
//! # Invariants
//! - Phases are listed by `number ASC`.
//! - Subjects and tasks keep storage order (`id ASC`).
//! - Deleting a phase cascades to subjects, tasks and notes.

use super::{ensure_connection_ready, EntityRef, RepoError, RepoResult};
use crate::model::curriculum::{
    NewPhase, NewSubject, NewTask, Phase, PhaseId, Subject, SubjectId, Task, TaskId,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

const PHASE_SELECT_SQL: &str = "SELECT
    id,
    number,
    name,
    description,
    date_range
FROM phases";

/// Repository interface for the phase → subject → task hierarchy.
pub trait PhaseRepository {
    /// Lists every phase ordered by `number`, fully nested.
    fn list_phases(&self) -> RepoResult<Vec<Phase>>;
    /// Gets one phase by id, fully nested.
    fn get_phase(&self, id: PhaseId) -> RepoResult<Option<Phase>>;
    /// Returns whether a phase with this id exists.
    fn phase_exists(&self, id: PhaseId) -> RepoResult<bool>;
    /// Finds the id of the phase carrying `number`.
    fn find_phase_by_number(&self, number: i64) -> RepoResult<Option<PhaseId>>;
    fn create_phase(&self, phase: &NewPhase) -> RepoResult<PhaseId>;
    fn create_subject(&self, phase_id: PhaseId, subject: &NewSubject) -> RepoResult<SubjectId>;
    fn create_task(&self, subject_id: SubjectId, task: &NewTask) -> RepoResult<TaskId>;
    /// Deletes one phase together with everything it owns.
    fn delete_phase(&self, id: PhaseId) -> RepoResult<()>;
}

/// SQLite-backed curriculum repository.
pub struct SqlitePhaseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePhaseRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PhaseRepository for SqlitePhaseRepository<'_> {
    fn list_phases(&self) -> RepoResult<Vec<Phase>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PHASE_SELECT_SQL} ORDER BY number ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut phases = Vec::new();
        while let Some(row) = rows.next()? {
            phases.push(parse_phase_row(row)?);
        }

        attach_subjects(self.conn, &mut phases, None)?;
        Ok(phases)
    }

    fn get_phase(&self, id: PhaseId) -> RepoResult<Option<Phase>> {
        let mut phase = {
            let mut stmt = self
                .conn
                .prepare(&format!("{PHASE_SELECT_SQL} WHERE id = ?1;"))?;
            let mut rows = stmt.query([id])?;
            let Some(row) = rows.next()? else {
                return Ok(None);
            };
            parse_phase_row(row)?
        };

        attach_subjects(self.conn, std::slice::from_mut(&mut phase), Some(id))?;
        Ok(Some(phase))
    }

    fn phase_exists(&self, id: PhaseId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM phases WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_phase_by_number(&self, number: i64) -> RepoResult<Option<PhaseId>> {
        let id = self
            .conn
            .query_row("SELECT id FROM phases WHERE number = ?1;", [number], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(id)
    }

    fn create_phase(&self, phase: &NewPhase) -> RepoResult<PhaseId> {
        phase.validate()?;
        if self.find_phase_by_number(phase.number)?.is_some() {
            return Err(RepoError::DuplicatePhaseNumber(phase.number));
        }

        self.conn.execute(
            "INSERT INTO phases (number, name, description, date_range)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                phase.number,
                phase.name.as_str(),
                phase.description.as_str(),
                phase.date_range.as_str(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn create_subject(&self, phase_id: PhaseId, subject: &NewSubject) -> RepoResult<SubjectId> {
        subject.validate()?;
        if !self.phase_exists(phase_id)? {
            return Err(RepoError::NotFound(EntityRef::Phase(phase_id)));
        }

        self.conn.execute(
            "INSERT INTO subjects (phase_id, name) VALUES (?1, ?2);",
            params![phase_id, subject.name.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn create_task(&self, subject_id: SubjectId, task: &NewTask) -> RepoResult<TaskId> {
        task.validate()?;
        let subject_exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM subjects WHERE id = ?1);",
            [subject_id],
            |row| row.get(0),
        )?;
        if subject_exists != 1 {
            return Err(RepoError::NotFound(EntityRef::Subject(subject_id)));
        }

        self.conn.execute(
            "INSERT INTO tasks (subject_id, description) VALUES (?1, ?2);",
            params![subject_id, task.description.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn delete_phase(&self, id: PhaseId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM phases WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Phase(id)));
        }
        Ok(())
    }
}

fn parse_phase_row(row: &Row<'_>) -> RepoResult<Phase> {
    Ok(Phase {
        id: row.get("id")?,
        number: row.get("number")?,
        name: row.get("name")?,
        description: row.get("description")?,
        date_range: row.get("date_range")?,
        subjects: Vec::new(),
    })
}

/// Loads subjects (with tasks) and distributes them onto `phases`.
///
/// `only_phase` narrows both queries to one phase; `None` loads everything.
fn attach_subjects(
    conn: &Connection,
    phases: &mut [Phase],
    only_phase: Option<PhaseId>,
) -> RepoResult<()> {
    let mut tasks_by_subject: HashMap<SubjectId, Vec<Task>> = HashMap::new();
    {
        let mut stmt = conn.prepare(
            "SELECT t.id, t.subject_id, t.description
             FROM tasks t
             INNER JOIN subjects s ON s.id = t.subject_id
             WHERE ?1 IS NULL OR s.phase_id = ?1
             ORDER BY t.id ASC;",
        )?;
        let mut rows = stmt.query([only_phase])?;
        while let Some(row) = rows.next()? {
            let task = Task {
                id: row.get("id")?,
                subject_id: row.get("subject_id")?,
                description: row.get("description")?,
            };
            tasks_by_subject.entry(task.subject_id).or_default().push(task);
        }
    }

    let mut subjects_by_phase: HashMap<PhaseId, Vec<Subject>> = HashMap::new();
    {
        let mut stmt = conn.prepare(
            "SELECT id, phase_id, name
             FROM subjects
             WHERE ?1 IS NULL OR phase_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([only_phase])?;
        while let Some(row) = rows.next()? {
            let id: SubjectId = row.get("id")?;
            let subject = Subject {
                id,
                phase_id: row.get("phase_id")?,
                name: row.get("name")?,
                tasks: tasks_by_subject.remove(&id).unwrap_or_default(),
            };
            subjects_by_phase
                .entry(subject.phase_id)
                .or_default()
                .push(subject);
        }
    }

    if !tasks_by_subject.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "{} task group(s) reference subjects outside the loaded set",
            tasks_by_subject.len()
        )));
    }

    for phase in phases.iter_mut() {
        phase.subjects = subjects_by_phase.remove(&phase.id).unwrap_or_default();
    }
    Ok(())
}
