//! Navigation and practice-mode answer recording.
//!
//! All functions take the state record by mutable reference and never touch
//! persistence; the [`AppServices`](crate::AppServices) facade snapshots the
//! state after each mutation.

use quiz_core::model::{AnswerValue, QuestionKind, UserAnswer};
use quiz_core::{AppState, StudyMode};

use crate::error::AnswerError;

/// Immediate feedback for a submitted practice answer.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeFeedback {
    pub selected: AnswerValue,
    pub is_correct: bool,
    pub kind: QuestionKind,
}

//
// ─── NAVIGATION ────────────────────────────────────────────────────────────────
//

/// Step the cursor back. Returns false at the first question, cursor untouched.
pub fn prev_question(state: &mut AppState) -> bool {
    if state.cursor > 0 {
        state.cursor -= 1;
        true
    } else {
        false
    }
}

/// Step the cursor forward within the active sequence (exam questions while an
/// exam runs, the active library otherwise). Returns false at the last
/// question, cursor untouched; the caller decides how to phrase the boundary
/// message for the current mode.
pub fn next_question(state: &mut AppState) -> bool {
    let count = state.active_question_count();
    if count > 0 && state.cursor + 1 < count {
        state.cursor += 1;
        true
    } else {
        false
    }
}

/// Jump straight to a question. Returns false when out of bounds.
pub fn jump_to_question(state: &mut AppState, index: usize) -> bool {
    if index < state.active_question_count() {
        state.cursor = index;
        true
    } else {
        false
    }
}

//
// ─── ANSWER RECORDING ──────────────────────────────────────────────────────────
//

/// Judge questions present as two options: A asserts the statement, B denies it.
pub(crate) fn judge_selection(letter: char) -> Option<bool> {
    match letter {
        'A' => Some(true),
        'B' => Some(false),
        _ => None,
    }
}

/// Record an answer for the current single/judge question.
///
/// No-op (returns `None`) outside practice mode, during an exam, or when the
/// current question is multiple choice. The answer is submitted immediately:
/// correctness is exact equality with the key, and the running tallies update:
/// a correct answer extends the question's streak, an incorrect one resets
/// it to zero.
pub fn select_option(state: &mut AppState, letter: char) -> Option<PracticeFeedback> {
    if state.mode != StudyMode::Practice || state.exam.started {
        return None;
    }

    let letter = letter.to_ascii_uppercase();
    let index = state.cursor;
    let library_index = state.current_library;

    let question = state.current_library()?.question(index)?;
    let key = question.answer.clone();
    let kind = question.kind();

    let selected = match kind {
        QuestionKind::Single => AnswerValue::Single(letter),
        QuestionKind::Judge => AnswerValue::Judgment(judge_selection(letter)?),
        QuestionKind::Multi => return None,
    };

    let answer = UserAnswer::submitted(selected, &key);
    let feedback = PracticeFeedback {
        selected: answer.selected.clone(),
        is_correct: answer.is_correct,
        kind,
    };

    state.current_library_mut()?.answers.insert(index, answer);
    record_outcome(state, library_index, index, feedback.is_correct);
    Some(feedback)
}

/// Toggle a letter in the current multi question's draft selection.
///
/// The draft persists immediately but stays unsubmitted; once submitted the
/// selection is locked and further toggles are ignored.
pub fn toggle_multi_option(state: &mut AppState, letter: char) {
    if state.mode != StudyMode::Practice || state.exam.started {
        return;
    }

    let letter = letter.to_ascii_uppercase();
    let index = state.cursor;
    let Some(question) = state.current_library().and_then(|lib| lib.question(index)) else {
        return;
    };
    if question.kind() != QuestionKind::Multi {
        return;
    }

    let Some(library) = state.current_library_mut() else {
        return;
    };
    let answer = library
        .answers
        .entry(index)
        .or_insert_with(UserAnswer::draft_multi);
    if answer.is_submitted {
        return;
    }
    answer.selected.toggle(letter);
}

/// Submit the current multi question's draft selection.
///
/// # Errors
///
/// Returns `AnswerError::EmptySelection` when nothing is picked yet, and
/// `AnswerError::NotMultipleChoice` when the current question is not multi.
pub fn submit_multi_select(state: &mut AppState) -> Result<PracticeFeedback, AnswerError> {
    let index = state.cursor;
    let library_index = state.current_library;

    let key = {
        let question = state
            .current_library()
            .and_then(|lib| lib.question(index))
            .ok_or(AnswerError::EmptySelection)?;
        if question.kind() != QuestionKind::Multi {
            return Err(AnswerError::NotMultipleChoice);
        }
        question.answer.clone()
    };

    let library = state
        .current_library_mut()
        .ok_or(AnswerError::EmptySelection)?;
    let answer = library
        .answers
        .get_mut(&index)
        .ok_or(AnswerError::EmptySelection)?;
    if answer.selected.is_empty() {
        return Err(AnswerError::EmptySelection);
    }

    let is_correct = answer.selected == key;
    answer.is_submitted = true;
    answer.is_correct = is_correct;
    let feedback = PracticeFeedback {
        selected: answer.selected.clone(),
        is_correct,
        kind: QuestionKind::Multi,
    };

    record_outcome(state, library_index, index, is_correct);
    Ok(feedback)
}

/// Update the per-question tallies: the practice count always grows, the
/// correct counter tracks the current streak (reset on a miss).
fn record_outcome(state: &mut AppState, library: usize, question: usize, is_correct: bool) {
    let key = AppState::tally_key(library, question);
    *state.practice_counts.entry(key.clone()).or_insert(0) += 1;
    if is_correct {
        *state.correct_streaks.entry(key).or_insert(0) += 1;
    } else {
        state.correct_streaks.insert(key, 0);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use quiz_core::model::{Library, Question};

    fn state_with(questions: Vec<Question>) -> AppState {
        let mut state = AppState::default();
        state.libraries.push(Library::new("demo", questions));
        state
    }

    fn single(prompt: &str, key: char) -> Question {
        Question::new(prompt, AnswerValue::Single(key)).unwrap()
    }

    fn judge(prompt: &str, key: bool) -> Question {
        Question::new(prompt, AnswerValue::Judgment(key)).unwrap()
    }

    fn multi(prompt: &str, keys: &[char]) -> Question {
        Question::new(
            prompt,
            AnswerValue::Multiple(keys.iter().copied().collect::<BTreeSet<_>>()),
        )
        .unwrap()
    }

    #[test]
    fn prev_at_first_question_stays_put() {
        let mut state = state_with(vec![single("q1", 'A'), single("q2", 'B')]);
        assert!(!prev_question(&mut state));
        assert_eq!(state.cursor, 0);

        assert!(next_question(&mut state));
        assert!(prev_question(&mut state));
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn next_at_last_question_stays_put() {
        let mut state = state_with(vec![single("q1", 'A'), single("q2", 'B')]);
        state.cursor = 1;
        assert!(!next_question(&mut state));
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn next_follows_the_exam_sequence_while_started() {
        let mut state = state_with(vec![single("q1", 'A')]);
        state
            .exam
            .begin(vec![single("e1", 'A'), single("e2", 'B'), single("e3", 'C')]);
        assert!(next_question(&mut state));
        assert!(next_question(&mut state));
        assert!(!next_question(&mut state));
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn jump_rejects_out_of_bounds_targets() {
        let mut state = state_with(vec![single("q1", 'A'), single("q2", 'B')]);
        assert!(jump_to_question(&mut state, 1));
        assert_eq!(state.cursor, 1);
        assert!(!jump_to_question(&mut state, 2));
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn correct_single_answer_is_recorded_and_counted() {
        let mut state = state_with(vec![single("q1", 'A')]);
        let feedback = select_option(&mut state, 'a').unwrap();

        assert!(feedback.is_correct);
        assert_eq!(feedback.selected, AnswerValue::Single('A'));

        let answer = state.current_library().unwrap().answer(0).unwrap();
        assert!(answer.is_submitted);
        assert!(answer.is_correct);
        assert_eq!(state.practice_count(0), 1);
        assert_eq!(state.streak(0), 1);
    }

    #[test]
    fn judge_letters_translate_before_comparison() {
        let mut state = state_with(vec![judge("q1", true)]);
        let feedback = select_option(&mut state, 'A').unwrap();
        assert!(feedback.is_correct);
        assert_eq!(feedback.selected, AnswerValue::Judgment(true));

        let feedback = select_option(&mut state, 'B').unwrap();
        assert!(!feedback.is_correct);

        // Judge questions only present options A and B.
        assert!(select_option(&mut state, 'C').is_none());
    }

    #[test]
    fn select_option_ignores_multi_questions_and_recite_mode() {
        let mut state = state_with(vec![multi("q1", &['A', 'B'])]);
        assert!(select_option(&mut state, 'A').is_none());

        let mut state = state_with(vec![single("q1", 'A')]);
        state.mode = StudyMode::Recite;
        assert!(select_option(&mut state, 'A').is_none());
    }

    #[test]
    fn a_miss_resets_the_streak() {
        let mut state = state_with(vec![single("q1", 'A')]);
        select_option(&mut state, 'A').unwrap();
        select_option(&mut state, 'A').unwrap();
        select_option(&mut state, 'A').unwrap();
        assert_eq!(state.streak(0), 3);
        assert_eq!(state.practice_count(0), 3);

        select_option(&mut state, 'B').unwrap();
        assert_eq!(state.streak(0), 0);
        assert_eq!(state.practice_count(0), 4);

        select_option(&mut state, 'A').unwrap();
        assert_eq!(state.streak(0), 1);
    }

    #[test]
    fn multi_draft_toggles_and_locks_after_submission() {
        let mut state = state_with(vec![multi("q1", &['A', 'C'])]);

        toggle_multi_option(&mut state, 'A');
        toggle_multi_option(&mut state, 'B');
        toggle_multi_option(&mut state, 'B');
        toggle_multi_option(&mut state, 'C');

        let feedback = submit_multi_select(&mut state).unwrap();
        assert!(feedback.is_correct);

        // Submitted: further toggles are ignored.
        toggle_multi_option(&mut state, 'D');
        let answer = state.current_library().unwrap().answer(0).unwrap();
        assert_eq!(
            answer.selected,
            AnswerValue::Multiple(BTreeSet::from(['A', 'C']))
        );
    }

    #[test]
    fn multi_submission_is_order_independent() {
        let mut state = state_with(vec![multi("q1", &['B', 'D'])]);
        toggle_multi_option(&mut state, 'D');
        toggle_multi_option(&mut state, 'B');
        assert!(submit_multi_select(&mut state).unwrap().is_correct);
    }

    #[test]
    fn empty_multi_submission_is_a_validation_error() {
        let mut state = state_with(vec![multi("q1", &['A'])]);
        assert_eq!(
            submit_multi_select(&mut state).unwrap_err(),
            AnswerError::EmptySelection
        );

        toggle_multi_option(&mut state, 'A');
        toggle_multi_option(&mut state, 'A');
        assert_eq!(
            submit_multi_select(&mut state).unwrap_err(),
            AnswerError::EmptySelection
        );
    }

    #[test]
    fn multi_submission_rejects_non_multi_questions() {
        let mut state = state_with(vec![single("q1", 'A')]);
        assert_eq!(
            submit_multi_select(&mut state).unwrap_err(),
            AnswerError::NotMultipleChoice
        );
    }

    #[test]
    fn example_three_singles_two_correct_one_wrong() {
        let mut state = state_with(vec![single("q1", 'A'), single("q2", 'B'), single("q3", 'C')]);

        assert!(select_option(&mut state, 'A').unwrap().is_correct);
        next_question(&mut state);
        assert!(!select_option(&mut state, 'X').unwrap().is_correct);
        next_question(&mut state);
        assert!(select_option(&mut state, 'C').unwrap().is_correct);

        let progress = state.current_library().unwrap().progress();
        assert_eq!(progress.answered, 3);
        assert_eq!(progress.correct, 2);

        crate::wrong_service::generate_practice_wrong(&mut state);
        assert_eq!(state.practice_wrong.len(), 1);
        assert_eq!(state.practice_wrong.entries[0].original_index, 1);
        assert_eq!(state.practice_wrong.entries[0].question.prompt, "q2");
    }
}
