use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::question::QuestionKind;

//
// ─── ANSWER VALUE ──────────────────────────────────────────────────────────────
//

/// A concrete answer, used both as a question's key and as a user's selection.
///
/// Sharing one shape makes correctness checks plain equality: `Multiple` holds
/// an ordered set, so comparing two multi answers is inherently independent of
/// the order the letters were picked in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerValue {
    Single(char),
    Multiple(BTreeSet<char>),
    Judgment(bool),
}

impl AnswerValue {
    /// The question kind this value's shape belongs to.
    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self {
            AnswerValue::Single(_) => QuestionKind::Single,
            AnswerValue::Multiple(_) => QuestionKind::Multi,
            AnswerValue::Judgment(_) => QuestionKind::Judge,
        }
    }

    /// True when a multi selection holds no letters yet. Scalar values are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Multiple(letters) => letters.is_empty(),
            _ => false,
        }
    }

    /// Toggle a letter in a multi selection: insert if absent, remove if present.
    ///
    /// No-op on scalar values.
    pub fn toggle(&mut self, letter: char) {
        if let AnswerValue::Multiple(letters) = self {
            if !letters.insert(letter) {
                letters.remove(&letter);
            }
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Single(letter) => write!(f, "{letter}"),
            AnswerValue::Multiple(letters) => {
                for letter in letters {
                    write!(f, "{letter}")?;
                }
                Ok(())
            }
            AnswerValue::Judgment(true) => write!(f, "TRUE"),
            AnswerValue::Judgment(false) => write!(f, "FALSE"),
        }
    }
}

//
// ─── USER ANSWER ───────────────────────────────────────────────────────────────
//

/// A recorded answer to one question.
///
/// `is_submitted` is monotonic: once an answer is submitted it stays submitted
/// (a fresh submission may replace the record, never un-submit it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub selected: AnswerValue,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub is_submitted: bool,
}

impl UserAnswer {
    /// A submitted answer, graded against the question's key.
    #[must_use]
    pub fn submitted(selected: AnswerValue, key: &AnswerValue) -> Self {
        let is_correct = selected == *key;
        Self {
            selected,
            is_correct,
            is_submitted: true,
        }
    }

    /// An unsubmitted multi-select draft with no letters picked.
    #[must_use]
    pub fn draft_multi() -> Self {
        Self {
            selected: AnswerValue::Multiple(BTreeSet::new()),
            is_correct: false,
            is_submitted: false,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_equality_ignores_pick_order() {
        let mut first = AnswerValue::Multiple(BTreeSet::new());
        first.toggle('C');
        first.toggle('A');

        let mut second = AnswerValue::Multiple(BTreeSet::new());
        second.toggle('A');
        second.toggle('C');

        assert_eq!(first, second);
    }

    #[test]
    fn toggle_removes_an_already_picked_letter() {
        let mut value = AnswerValue::Multiple(BTreeSet::new());
        value.toggle('B');
        value.toggle('B');
        assert!(value.is_empty());
    }

    #[test]
    fn submitted_grades_against_the_key() {
        let key = AnswerValue::Single('A');
        assert!(UserAnswer::submitted(AnswerValue::Single('A'), &key).is_correct);
        assert!(!UserAnswer::submitted(AnswerValue::Single('B'), &key).is_correct);

        let judge_key = AnswerValue::Judgment(true);
        assert!(UserAnswer::submitted(AnswerValue::Judgment(true), &judge_key).is_correct);
    }

    #[test]
    fn display_concatenates_multi_letters_in_order() {
        let value = AnswerValue::Multiple(BTreeSet::from(['C', 'A', 'B']));
        assert_eq!(value.to_string(), "ABC");
        assert_eq!(AnswerValue::Judgment(false).to_string(), "FALSE");
    }
}
