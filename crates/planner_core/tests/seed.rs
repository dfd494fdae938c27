use planner_core::db::open_db_in_memory;
use planner_core::{
    apply_seed, CurriculumSeed, CurriculumService, NoteInput, NoteService, PhaseRepository,
    RepoError, SeedError, SeedMode, SqliteNoteRepository, SqlitePhaseRepository,
};

const SEED: &str = r#"{
    "phases": [
        {
            "number": 2,
            "name": "Core",
            "description": "core courses",
            "date_range": "2027-01 ~ 2027-06",
            "subjects": [{"name": "Physics", "tasks": ["mechanics"]}]
        },
        {
            "number": 1,
            "name": "Foundations",
            "description": "basics",
            "date_range": "2026-09 ~ 2026-12",
            "subjects": [
                {"name": "Math", "tasks": ["limits", "series"]},
                {"name": "English"}
            ]
        }
    ]
}"#;

#[test]
fn seed_document_loads_into_nested_phases() {
    let mut conn = open_db_in_memory().unwrap();
    let seed = CurriculumSeed::from_json_str(SEED).unwrap();

    let summary = apply_seed(&mut conn, &seed, SeedMode::Insert).unwrap();
    assert_eq!(summary.phases, 2);
    assert_eq!(summary.subjects, 3);
    assert_eq!(summary.tasks, 3);
    assert_eq!(summary.replaced, 0);

    let service = CurriculumService::new(SqlitePhaseRepository::try_new(&conn).unwrap());
    let phases = service.list_phases().unwrap();
    assert_eq!(phases[0].name, "Foundations");
    assert_eq!(phases[0].subjects[0].tasks[1].description, "series");
    assert!(phases[0].subjects[1].tasks.is_empty());
    assert_eq!(phases[1].subjects[0].name, "Physics");
}

#[test]
fn seed_insert_rejects_existing_number_and_rolls_back() {
    let mut conn = open_db_in_memory().unwrap();
    let seed = CurriculumSeed::from_json_str(SEED).unwrap();
    apply_seed(&mut conn, &seed, SeedMode::Insert).unwrap();

    let err = apply_seed(&mut conn, &seed, SeedMode::Insert).unwrap_err();
    assert!(matches!(err, SeedError::Repo(RepoError::DuplicatePhaseNumber(2))));

    let phases = SqlitePhaseRepository::try_new(&conn)
        .unwrap()
        .list_phases()
        .unwrap();
    assert_eq!(phases.len(), 2);
}

#[test]
fn seed_replace_recreates_phase_and_drops_its_notes() {
    let mut conn = open_db_in_memory().unwrap();
    let seed = CurriculumSeed::from_json_str(SEED).unwrap();
    apply_seed(&mut conn, &seed, SeedMode::Insert).unwrap();

    let old_id = SqlitePhaseRepository::try_new(&conn)
        .unwrap()
        .find_phase_by_number(1)
        .unwrap()
        .unwrap();
    NoteService::new(
        SqlitePhaseRepository::try_new(&conn).unwrap(),
        SqliteNoteRepository::try_new(&conn).unwrap(),
    )
    .create_note(old_id, &NoteInput::new("before reseed"))
    .unwrap();

    let summary = apply_seed(&mut conn, &seed, SeedMode::Replace).unwrap();
    assert_eq!(summary.replaced, 2);

    let repo = SqlitePhaseRepository::try_new(&conn).unwrap();
    let new_id = repo.find_phase_by_number(1).unwrap().unwrap();
    assert_ne!(new_id, old_id);
    assert_eq!(repo.list_phases().unwrap().len(), 2);

    let notes: i64 = conn
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(notes, 0);
}

#[test]
fn seed_rejects_duplicate_numbers_within_document() {
    let mut conn = open_db_in_memory().unwrap();
    let seed = CurriculumSeed::from_json_str(
        r#"{"phases": [{"number": 1, "name": "A"}, {"number": 1, "name": "B"}]}"#,
    )
    .unwrap();

    let err = apply_seed(&mut conn, &seed, SeedMode::Insert).unwrap_err();
    assert!(matches!(err, SeedError::DuplicateNumberInDocument(1)));
}

#[test]
fn seed_with_invalid_task_leaves_storage_untouched() {
    let mut conn = open_db_in_memory().unwrap();
    let long_task = "t".repeat(256);
    let seed = CurriculumSeed::from_json_str(&format!(
        r#"{{"phases": [{{"number": 1, "name": "A", "subjects": [{{"name": "S", "tasks": ["{long_task}"]}}]}}]}}"#
    ))
    .unwrap();

    let err = apply_seed(&mut conn, &seed, SeedMode::Insert).unwrap_err();
    assert!(matches!(err, SeedError::Repo(RepoError::Validation(_))));

    let phases: i64 = conn
        .query_row("SELECT COUNT(*) FROM phases;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(phases, 0);
}

#[test]
fn seed_file_errors_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(
        CurriculumSeed::from_file(&missing),
        Err(SeedError::Io(_))
    ));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{\"phases\": [").unwrap();
    assert!(matches!(
        CurriculumSeed::from_file(&broken),
        Err(SeedError::Parse(_))
    ));
}

#[test]
fn bundled_sample_curriculum_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/curriculum.sample.json");
    let seed = CurriculumSeed::from_file(path).unwrap();
    let mut conn = open_db_in_memory().unwrap();

    let summary = apply_seed(&mut conn, &seed, SeedMode::Insert).unwrap();
    assert_eq!(summary.phases, 3);
    assert_eq!(summary.subjects, 5);
    assert_eq!(summary.tasks, 11);
}
