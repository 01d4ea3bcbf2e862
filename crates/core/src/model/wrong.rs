use serde::{Deserialize, Serialize};

use crate::model::answer::{AnswerValue, UserAnswer};
use crate::model::question::Question;

/// A missed question captured for review, with the answer that missed it.
///
/// `original_index` points into the sequence the entry was taken from: the
/// library order for practice mistakes, the shuffled exam order for exam
/// mistakes. Exam indices are not stable across sessions, which is why exam
/// review lists de-duplicate by prompt and answer key instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrongEntry {
    pub question: Question,
    pub original_index: usize,
    pub answer: UserAnswer,
}

impl WrongEntry {
    #[must_use]
    pub fn new(question: Question, original_index: usize, answer: UserAnswer) -> Self {
        Self {
            question,
            original_index,
            answer,
        }
    }

    /// Identity used when de-duplicating across exam history records.
    #[must_use]
    pub fn dedup_key(&self) -> (&str, &AnswerValue) {
        (self.question.prompt.as_str(), &self.question.answer)
    }
}
