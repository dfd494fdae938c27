//! Maintenance subcommands that run against storage without the HTTP server.

use anyhow::{Context, Result};
use planner_core::{
    apply_seed, CurriculumSeed, CurriculumService, Phase, PhaseId, PhaseRepository, SeedMode,
    SeedSummary, SqlitePhaseRepository,
};
use rusqlite::Connection;
use std::fmt::{self, Write};
use std::path::Path;

pub fn seed(conn: &mut Connection, file: &Path, replace: bool) -> Result<SeedSummary> {
    let document = CurriculumSeed::from_file(file)
        .with_context(|| format!("loading seed document `{}`", file.display()))?;
    let mode = if replace {
        SeedMode::Replace
    } else {
        SeedMode::Insert
    };
    Ok(apply_seed(conn, &document, mode)?)
}

pub fn phases(conn: &Connection) -> Result<String> {
    let phases = SqlitePhaseRepository::try_new(conn)?.list_phases()?;
    let mut out = String::new();
    render_curriculum(&mut out, &phases)?;
    Ok(out)
}

pub fn delete_phase(conn: &Connection, id: PhaseId) -> Result<()> {
    CurriculumService::new(SqlitePhaseRepository::try_new(conn)?).delete_phase(id)?;
    Ok(())
}

/// Renders phases as an indented tree, one line per phase, subject and task.
pub fn render_curriculum(out: &mut impl Write, phases: &[Phase]) -> fmt::Result {
    for phase in phases {
        writeln!(out, "{phase} [id={}] {}", phase.id, phase.date_range)?;
        for subject in &phase.subjects {
            writeln!(out, "  {phase} - {}", subject.name)?;
            for task in &subject.tasks {
                writeln!(out, "    - {task}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::db::open_db_in_memory;

    #[test]
    fn seed_then_render_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("curriculum.json");
        std::fs::write(
            &file,
            r#"{"phases":[{"number":1,"name":"Foundations","date_range":"Sep-Dec",
                "subjects":[{"name":"Math","tasks":["limits"]}]}]}"#,
        )
        .unwrap();

        let mut conn = open_db_in_memory().unwrap();
        let summary = seed(&mut conn, &file, false).unwrap();
        assert_eq!(summary.tasks, 1);

        let rendered = phases(&conn).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("阶段1: Foundations [id="));
        assert!(lines[0].ends_with("Sep-Dec"));
        assert_eq!(lines[1], "  阶段1: Foundations - Math");
        assert_eq!(lines[2], "    - limits");

        let id = SqlitePhaseRepository::try_new(&conn)
            .unwrap()
            .find_phase_by_number(1)
            .unwrap()
            .unwrap();
        delete_phase(&conn, id).unwrap();
        assert!(phases(&conn).unwrap().is_empty());
        assert!(delete_phase(&conn, id).is_err());
    }

    #[test]
    fn render_curriculum_writes_one_line_per_node() {
        use planner_core::{Subject, Task};

        let phases = vec![Phase {
            id: 4,
            number: 2,
            name: "Core".to_string(),
            description: String::new(),
            date_range: "2027-01 ~ 2027-06".to_string(),
            subjects: vec![Subject {
                id: 8,
                phase_id: 4,
                name: "Physics".to_string(),
                tasks: vec![Task {
                    id: 9,
                    subject_id: 8,
                    description: "mechanics".to_string(),
                }],
            }],
        }];

        let mut out = String::new();
        render_curriculum(&mut out, &phases).unwrap();
        assert_eq!(
            out,
            "阶段2: Core [id=4] 2027-01 ~ 2027-06\n  阶段2: Core - Physics\n    - mechanics\n"
        );

        let mut empty = String::new();
        render_curriculum(&mut empty, &[]).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn seed_reports_missing_file_with_path() {
        let mut conn = open_db_in_memory().unwrap();
        let err = seed(&mut conn, Path::new("/nonexistent/seed.json"), false).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/seed.json"));
    }
}
