use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::answer::UserAnswer;
use crate::model::question::Question;

//
// ─── LIBRARY ───────────────────────────────────────────────────────────────────
//

/// One imported question bank with its per-question answer records.
///
/// Answers are keyed by question index. `original_order` is carried for
/// snapshots written by builds that shuffled practice questions in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answers: BTreeMap<usize, UserAnswer>,
    #[serde(default)]
    pub original_order: Option<Vec<usize>>,
}

impl Library {
    #[must_use]
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            name: name.into(),
            questions,
            answers: BTreeMap::new(),
            original_order: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&UserAnswer> {
        self.answers.get(&index)
    }

    /// Derived answering statistics over this library.
    #[must_use]
    pub fn progress(&self) -> LibraryProgress {
        let mut answered = 0;
        let mut correct = 0;
        for answer in self.answers.values() {
            if answer.is_submitted {
                answered += 1;
                if answer.is_correct {
                    correct += 1;
                }
            }
        }
        LibraryProgress {
            total: self.questions.len(),
            answered,
            correct,
        }
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Aggregated view of answering progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryProgress {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
}

impl LibraryProgress {
    /// Share of submitted answers that were correct, rounded to whole percent.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        if self.answered == 0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (self.correct as f64 / self.answered as f64 * 100.0).round() as u32;
        pct
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
