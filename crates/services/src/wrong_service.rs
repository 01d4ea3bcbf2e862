//! Wrong-question review lists: derivation, navigation, and pruning.
//!
//! Both lists are derived views rebuilt from scratch on demand: the practice
//! list from the active library's submitted answers, the exam list from the
//! whole exam history.

use std::collections::HashSet;

use quiz_core::model::{AnswerValue, QuestionKind, WrongEntry};
use quiz_core::{AppState, WrongList};

/// Rebuild the practice-wrong list by scanning the active library in order for
/// submitted, incorrect answers. The cursor resets to the first entry.
pub fn generate_practice_wrong(state: &mut AppState) {
    let entries = state
        .current_library()
        .map(|lib| {
            lib.questions
                .iter()
                .enumerate()
                .filter_map(|(index, question)| {
                    lib.answer(index)
                        .filter(|answer| answer.is_submitted && !answer.is_correct)
                        .map(|answer| WrongEntry::new(question.clone(), index, answer.clone()))
                })
                .collect()
        })
        .unwrap_or_default();

    state.practice_wrong.reset(entries);
}

/// Rebuild the exam-wrong list by flattening every history record's wrong
/// questions in chronological order, de-duplicating by (prompt, answer key).
/// First occurrence wins. Indices are not used as identity because exam
/// question sets are shuffled copies.
pub fn generate_exam_wrong(state: &mut AppState) {
    let mut seen: HashSet<(&str, &AnswerValue)> = HashSet::new();
    let mut entries = Vec::new();

    for record in &state.exam_history {
        for entry in &record.wrong_questions {
            if seen.insert(entry.dedup_key()) {
                entries.push(entry.clone());
            }
        }
    }

    state.exam_wrong.reset(entries);
}

//
// ─── REVIEW-LIST CURSORS ───────────────────────────────────────────────────────
//

fn prev_entry(list: &mut WrongList) -> bool {
    if list.cursor == 0 {
        return false;
    }
    let left = list.cursor;
    list.cursor -= 1;
    // Drop the draft cached under the index we left so a revisit starts clean.
    list.drafts.remove(&left);
    true
}

fn next_entry(list: &mut WrongList) -> bool {
    if list.cursor + 1 >= list.entries.len() {
        return false;
    }
    let left = list.cursor;
    list.cursor += 1;
    list.drafts.remove(&left);
    true
}

pub fn prev_practice_wrong(state: &mut AppState) -> bool {
    prev_entry(&mut state.practice_wrong)
}

pub fn next_practice_wrong(state: &mut AppState) -> bool {
    next_entry(&mut state.practice_wrong)
}

pub fn prev_exam_wrong(state: &mut AppState) -> bool {
    prev_entry(&mut state.exam_wrong)
}

pub fn next_exam_wrong(state: &mut AppState) -> bool {
    next_entry(&mut state.exam_wrong)
}

/// Toggle a letter in the draft selection for the list's current multi entry.
pub fn toggle_wrong_draft(list: &mut WrongList, letter: char) {
    let letter = letter.to_ascii_uppercase();
    let Some(entry) = list.entries.get(list.cursor) else {
        return;
    };
    if entry.question.kind() != QuestionKind::Multi {
        return;
    }
    let draft = list.drafts.entry(list.cursor).or_default();
    if !draft.insert(letter) {
        draft.remove(&letter);
    }
}

fn remove_current(list: &mut WrongList) -> bool {
    if list.cursor >= list.entries.len() {
        return false;
    }
    list.entries.remove(list.cursor);
    // Entry indices shifted; cached drafts no longer line up.
    list.drafts.clear();
    if list.cursor >= list.entries.len() {
        list.cursor = list.entries.len().saturating_sub(1);
    }
    true
}

/// Drop the practice-wrong entry under the cursor, clamping the cursor.
pub fn remove_current_practice_wrong(state: &mut AppState) -> bool {
    remove_current(&mut state.practice_wrong)
}

/// Drop the exam-wrong entry under the cursor, clamping the cursor.
pub fn remove_current_exam_wrong(state: &mut AppState) -> bool {
    remove_current(&mut state.exam_wrong)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use quiz_core::model::{ExamRecord, GradedExam, Library, Question, UserAnswer};
    use quiz_core::time::fixed_now;

    fn single(prompt: &str, key: char) -> Question {
        Question::new(prompt, AnswerValue::Single(key)).unwrap()
    }

    fn wrong_answer(question: &Question, picked: char) -> UserAnswer {
        UserAnswer::submitted(AnswerValue::Single(picked), &question.answer)
    }

    fn record_with(wrong: Vec<WrongEntry>) -> ExamRecord {
        ExamRecord::new(
            GradedExam {
                score: quiz_core::model::ExamScore::default(),
                wrong,
            },
            fixed_now(),
        )
    }

    #[test]
    fn practice_wrong_is_rebuilt_from_library_truth() {
        let mut state = AppState::default();
        let mut library = Library::new(
            "demo",
            vec![single("q1", 'A'), single("q2", 'B'), single("q3", 'C')],
        );
        library
            .answers
            .insert(0, wrong_answer(&library.questions[0], 'B'));
        library
            .answers
            .insert(2, wrong_answer(&library.questions[2], 'C'));
        state.libraries.push(library);

        generate_practice_wrong(&mut state);
        assert_eq!(state.practice_wrong.len(), 1);
        assert_eq!(state.practice_wrong.entries[0].original_index, 0);

        // Re-answer correctly; regeneration reflects the new truth.
        let key = state.libraries[0].questions[0].answer.clone();
        state
            .libraries[0]
            .answers
            .insert(0, UserAnswer::submitted(AnswerValue::Single('A'), &key));
        generate_practice_wrong(&mut state);
        assert!(state.practice_wrong.is_empty());
    }

    #[test]
    fn exam_wrong_deduplicates_by_prompt_and_answer_key() {
        let q = single("duplicated", 'A');
        let entry = WrongEntry::new(q.clone(), 3, wrong_answer(&q, 'B'));
        let same_again = WrongEntry::new(q.clone(), 9, wrong_answer(&q, 'C'));
        let other = WrongEntry::new(single("unique", 'D'), 0, wrong_answer(&q, 'B'));

        let mut state = AppState::default();
        state.exam_history.push(record_with(vec![entry.clone()]));
        state
            .exam_history
            .push(record_with(vec![same_again, other.clone()]));

        generate_exam_wrong(&mut state);
        assert_eq!(state.exam_wrong.len(), 2);
        // First occurrence wins: the answer attached is from the first record.
        assert_eq!(state.exam_wrong.entries[0].original_index, 3);
        assert_eq!(state.exam_wrong.entries[1].question.prompt, "unique");
    }

    #[test]
    fn same_prompt_with_different_keys_stays_distinct() {
        let first = single("prompt", 'A');
        let second = single("prompt", 'B');
        let mut state = AppState::default();
        state.exam_history.push(record_with(vec![
            WrongEntry::new(first.clone(), 0, wrong_answer(&first, 'C')),
            WrongEntry::new(second.clone(), 1, wrong_answer(&second, 'C')),
        ]));

        generate_exam_wrong(&mut state);
        assert_eq!(state.exam_wrong.len(), 2);
    }

    #[test]
    fn cursors_are_boundary_checked_and_clear_left_drafts() {
        let mut state = AppState::default();
        let q = Question::new("multi", AnswerValue::Multiple(BTreeSet::from(['A', 'B']))).unwrap();
        state.practice_wrong.reset(vec![
            WrongEntry::new(q.clone(), 0, UserAnswer::draft_multi()),
            WrongEntry::new(q.clone(), 1, UserAnswer::draft_multi()),
        ]);

        assert!(!prev_practice_wrong(&mut state));

        toggle_wrong_draft(&mut state.practice_wrong, 'A');
        assert!(state.practice_wrong.drafts.contains_key(&0));

        assert!(next_practice_wrong(&mut state));
        assert!(!state.practice_wrong.drafts.contains_key(&0));
        assert!(!next_practice_wrong(&mut state));
        assert_eq!(state.practice_wrong.cursor, 1);

        toggle_wrong_draft(&mut state.practice_wrong, 'B');
        assert!(prev_practice_wrong(&mut state));
        assert!(state.practice_wrong.drafts.is_empty());
    }

    #[test]
    fn removing_the_last_entry_clamps_the_cursor() {
        let q = single("q", 'A');
        let mut state = AppState::default();
        state.exam_wrong.reset(vec![
            WrongEntry::new(q.clone(), 0, wrong_answer(&q, 'B')),
            WrongEntry::new(q.clone(), 1, wrong_answer(&q, 'B')),
        ]);
        state.exam_wrong.cursor = 1;

        assert!(remove_current_exam_wrong(&mut state));
        assert_eq!(state.exam_wrong.cursor, 0);
        assert!(remove_current_exam_wrong(&mut state));
        assert_eq!(state.exam_wrong.cursor, 0);
        assert!(!remove_current_exam_wrong(&mut state));
    }
}
