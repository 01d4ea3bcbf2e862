//! Exam lifecycle: start (shuffle + countdown), answer selection, submission.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::BTreeSet;

use quiz_core::AppState;
use quiz_core::model::{AnswerValue, ExamRecord, ExamScore, QuestionKind};

use crate::error::ExamError;
use crate::practice_service::judge_selection;

/// What the presenter gets back from a submitted exam.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamOutcome {
    pub score: ExamScore,
    pub passed: bool,
    pub wrong_questions: usize,
}

/// Start an exam over the active library.
///
/// Takes a full copy of the library's questions, shuffles it uniformly, resets
/// the exam answers and the cursor, and arms the 90-minute countdown state.
/// The caller owns the wall-clock timer that drives the countdown down.
///
/// # Errors
///
/// Returns `ExamError::EmptyLibrary` if the active library has no questions.
pub fn start_exam(state: &mut AppState) -> Result<(), ExamError> {
    let mut rng = thread_rng();
    start_exam_with_rng(state, &mut rng)
}

/// Like [`start_exam`], with an injected RNG for deterministic tests.
///
/// # Errors
///
/// Returns `ExamError::EmptyLibrary` if the active library has no questions.
pub fn start_exam_with_rng<R: Rng + ?Sized>(
    state: &mut AppState,
    rng: &mut R,
) -> Result<(), ExamError> {
    let mut questions = state
        .current_library()
        .map(|lib| lib.questions.clone())
        .unwrap_or_default();
    if questions.is_empty() {
        return Err(ExamError::EmptyLibrary);
    }

    questions.as_mut_slice().shuffle(rng);
    state.exam.begin(questions);
    state.cursor = 0;
    Ok(())
}

/// Record a selection for the current exam question.
///
/// Unlike practice there is no per-question submission lock: single and judge
/// selections overwrite freely, multi selections toggle membership in a set
/// that initializes lazily. Nothing is scored until the whole exam submits.
pub fn select_exam_option(state: &mut AppState, letter: char) {
    if !state.exam.started {
        return;
    }

    let letter = letter.to_ascii_uppercase();
    let index = state.cursor;
    let Some(kind) = state.exam.questions.get(index).map(|q| q.kind()) else {
        return;
    };

    match kind {
        QuestionKind::Single => {
            state.exam.answers.insert(index, AnswerValue::Single(letter));
        }
        QuestionKind::Judge => {
            if let Some(value) = judge_selection(letter) {
                state
                    .exam
                    .answers
                    .insert(index, AnswerValue::Judgment(value));
            }
        }
        QuestionKind::Multi => {
            state
                .exam
                .answers
                .entry(index)
                .or_insert_with(|| AnswerValue::Multiple(BTreeSet::new()))
                .toggle(letter);
        }
    }
}

/// Submit the exam and append a history record.
///
/// Single-flight: the `started` flag is checked first, so the manual submit
/// path and the timer-expiry path can both call this in the same tick and
/// exactly one history record is appended. Returns `None` when no exam is
/// running. The transient exam state is cleared afterward.
pub fn submit_exam(state: &mut AppState, now: DateTime<Utc>) -> Option<ExamOutcome> {
    if !state.exam.started {
        return None;
    }

    let graded = state.exam.grade();
    let outcome = ExamOutcome {
        score: graded.score,
        passed: graded.score.is_passing(),
        wrong_questions: graded.wrong.len(),
    };

    state.exam_history.push(ExamRecord::new(graded, now));
    state.exam.clear();
    Some(outcome)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
