use std::sync::Arc;

use quiz_core::Tab;
use quiz_core::model::AnswerValue;
use quiz_core::time::fixed_clock;
use services::AppServices;
use storage::InMemoryStore;

fn sample_rows() -> Vec<Vec<String>> {
    let rows: &[&[&str]] = &[
        &["Capital of France?", "B", "London", "Paris", "Berlin"],
        &["2 + 2 = 5", "FALSE"],
        &["Pick the primes", "AC", "2", "4", "5", "9"],
        &["Largest planet?", "C", "Mars", "Venus", "Jupiter"],
    ];
    rows.iter()
        .map(|row| row.iter().map(|cell| (*cell).to_owned()).collect())
        .collect()
}

#[test]
fn study_flow_survives_a_restart() {
    let store = InMemoryStore::new();
    let services = AppServices::new(Arc::new(store.clone()), fixed_clock()).unwrap();

    let imported = services.import_rows("smoke", &sample_rows()).unwrap();
    assert_eq!(imported, 4);

    // Practice: first right, judge wrong, multi right.
    let feedback = services.select_option('b').unwrap().unwrap();
    assert!(feedback.is_correct);

    assert!(services.next_question().unwrap());
    let feedback = services.select_option('A').unwrap().unwrap();
    assert!(!feedback.is_correct);
    assert_eq!(feedback.selected, AnswerValue::Judgment(true));

    assert!(services.next_question().unwrap());
    services.toggle_multi_option('C').unwrap();
    services.toggle_multi_option('A').unwrap();
    let feedback = services.submit_multi_select().unwrap();
    assert!(feedback.is_correct);

    services.switch_tab(Tab::PracticeWrong).unwrap();
    services.with_state(|state| {
        assert_eq!(state.practice_wrong.len(), 1);
        assert_eq!(state.practice_wrong.entries[0].original_index, 1);
        let progress = state.current_library().unwrap().progress();
        assert_eq!(progress.answered, 3);
        assert_eq!(progress.correct, 2);
    });

    // A fresh facade over the same store sees the same truth.
    drop(services);
    let resumed = AppServices::new(Arc::new(store), fixed_clock()).unwrap();
    resumed.with_state(|state| {
        assert_eq!(state.libraries.len(), 1);
        assert_eq!(state.tab, Tab::PracticeWrong);
        assert_eq!(state.practice_wrong.len(), 1);
        assert_eq!(state.streak(0), 1);
        assert_eq!(state.streak(1), 0);
    });
}

#[test]
fn exam_round_feeds_history_and_review() {
    let store = InMemoryStore::new();
    let services = AppServices::new(Arc::new(store), fixed_clock()).unwrap();
    services.import_rows("exam", &sample_rows()).unwrap();

    services.start_exam(|_| {}, |_| {}).unwrap();
    services.with_state(|state| {
        assert!(state.exam.started);
        assert_eq!(state.exam.questions.len(), 4);
        assert_eq!(state.cursor, 0);
    });

    // Answer whatever question the shuffle put first with a letter that is
    // wrong for every question in the bank.
    let first_is_judge = services.with_state(|state| {
        state.exam.questions[0].kind() == quiz_core::model::QuestionKind::Judge
    });
    if first_is_judge {
        // 2 + 2 = 5 is FALSE; picking A asserts it is true.
        services.select_exam_option('A').unwrap();
    } else {
        services.select_exam_option('H').unwrap();
    }

    let outcome = services.submit_exam().unwrap().unwrap();
    assert_eq!(outcome.score.total, 0.0);
    assert_eq!(outcome.wrong_questions, 1);

    services.switch_tab(Tab::ExamWrong).unwrap();
    services.with_state(|state| {
        assert_eq!(state.exam_history.len(), 1);
        assert_eq!(state.exam_wrong.len(), 1);
        assert!(!state.exam.started);
    });
}

#[test]
fn starting_an_exam_without_questions_is_a_domain_error() {
    let services = AppServices::new(Arc::new(InMemoryStore::new()), fixed_clock()).unwrap();
    let err = services.start_exam(|_| {}, |_| {}).unwrap_err();
    assert!(matches!(
        err,
        services::SessionError::Exam(services::ExamError::EmptyLibrary)
    ));
}
