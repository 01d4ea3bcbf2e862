use quiz_core::AppState;
use quiz_core::model::{AnswerValue, Library, Question, UserAnswer};
use storage::{JsonFileStore, SnapshotStore, load_or_default};

fn sample_state() -> AppState {
    let question = Question::new("2 + 2 = 4", AnswerValue::Judgment(true)).unwrap();
    let mut library = Library::new("arithmetic", vec![question]);
    library.answers.insert(
        0,
        UserAnswer::submitted(AnswerValue::Judgment(true), &AnswerValue::Judgment(true)),
    );

    let mut state = AppState::default();
    state.libraries.push(library);
    state
        .practice_counts
        .insert(AppState::tally_key(0, 0), 1);
    state
        .correct_streaks
        .insert(AppState::tally_key(0, 0), 1);
    state
}

#[test]
fn file_store_round_trips_a_full_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("quizbank.json"));

    let state = sample_state();
    store.save(&state).unwrap();

    let restored = store.load().unwrap().unwrap();
    assert_eq!(restored, state);
}

#[test]
fn missing_file_loads_as_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("absent.json"));

    assert!(store.load().unwrap().is_none());
    let state = load_or_default(&store).unwrap();
    assert_eq!(state, AppState::default());
}

#[test]
fn older_snapshots_merge_onto_defaults() {
    // A snapshot written before most fields existed: only libraries present.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.json");
    std::fs::write(&path, r#"{"libraries": []}"#).unwrap();

    let store = JsonFileStore::new(&path);
    let state = store.load().unwrap().unwrap();

    assert_eq!(state.cursor, 0);
    assert!(state.exam_history.is_empty());
    assert!(!state.exam.started);
    assert_eq!(state.settings.question_font_size, 12);
}

#[test]
fn clear_removes_the_snapshot_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("quizbank.json"));

    store.save(&sample_state()).unwrap();
    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());

    // Clearing again must not fail.
    store.clear().unwrap();
}

#[test]
fn save_overwrites_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("quizbank.json"));

    store.save(&sample_state()).unwrap();
    store.save(&AppState::default()).unwrap();

    let restored = store.load().unwrap().unwrap();
    assert_eq!(restored, AppState::default());
}
