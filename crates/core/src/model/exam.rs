use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::answer::{AnswerValue, UserAnswer};
use crate::model::question::{Question, QuestionKind};
use crate::model::wrong::WrongEntry;

/// Fixed exam length: 90 minutes in whole seconds.
pub const EXAM_DURATION_SECS: u32 = 90 * 60;

/// Raw-point pass mark. Deliberately not a percentage of the attainable total;
/// the score scale is a product decision inherited from the question banks.
pub const PASS_MARK: f64 = 60.0;

//
// ─── EXAM SESSION ──────────────────────────────────────────────────────────────
//

/// Transient state of a running exam: a shuffled copy of the active library's
/// questions plus the selections made so far.
///
/// Unlike practice answers, exam selections carry no submitted flag and may be
/// changed freely until the whole exam is submitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExamSession {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answers: BTreeMap<usize, AnswerValue>,
    #[serde(default)]
    pub time_left: u32,
    #[serde(default)]
    pub started: bool,
}

impl ExamSession {
    /// Arm the session with an already-shuffled question list.
    pub fn begin(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.answers = BTreeMap::new();
        self.time_left = EXAM_DURATION_SECS;
        self.started = true;
    }

    /// Drop all transient state, returning to `not_started`.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.questions.len().saturating_sub(self.answers.len())
    }

    /// Grade every question against its key.
    ///
    /// Answered questions score their effective points into the total and the
    /// per-kind subtotal when correct, and join the wrong list otherwise.
    /// Unanswered questions score zero and are excluded from the wrong list;
    /// that exclusion is an observable contract of the score reports, not an
    /// oversight to repair here.
    #[must_use]
    pub fn grade(&self) -> GradedExam {
        let mut score = ExamScore::default();
        let mut wrong = Vec::new();

        for (index, question) in self.questions.iter().enumerate() {
            let Some(selected) = self.answers.get(&index) else {
                continue;
            };

            if *selected == question.answer {
                let points = question.effective_points();
                score.total += points;
                match question.kind() {
                    QuestionKind::Single => score.single += points,
                    QuestionKind::Multi => score.multi += points,
                    QuestionKind::Judge => score.judge += points,
                }
            } else {
                wrong.push(WrongEntry::new(
                    question.clone(),
                    index,
                    UserAnswer::submitted(selected.clone(), &question.answer),
                ));
            }
        }

        GradedExam { score, wrong }
    }
}

//
// ─── SCORING ───────────────────────────────────────────────────────────────────
//

/// Score breakdown for one graded exam.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExamScore {
    pub total: f64,
    pub single: f64,
    pub multi: f64,
    pub judge: f64,
}

impl ExamScore {
    #[must_use]
    pub fn is_passing(&self) -> bool {
        self.total >= PASS_MARK
    }
}

/// Result of grading an exam session: the score plus the missed questions.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedExam {
    pub score: ExamScore,
    pub wrong: Vec<WrongEntry>,
}

//
// ─── HISTORY ───────────────────────────────────────────────────────────────────
//

/// Immutable record of one submitted exam. Appended to history, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub id: Uuid,
    pub taken_at: DateTime<Utc>,
    pub score: ExamScore,
    pub passed: bool,
    #[serde(default)]
    pub wrong_questions: Vec<WrongEntry>,
}

impl ExamRecord {
    #[must_use]
    pub fn new(graded: GradedExam, taken_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            taken_at,
            passed: graded.score.is_passing(),
            score: graded.score,
            wrong_questions: graded.wrong,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
