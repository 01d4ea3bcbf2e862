use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answer::AnswerValue;

/// Upper bound on option texts a question may carry (letters A through H).
pub const MAX_OPTIONS: usize = 8;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt must not be empty")]
    EmptyPrompt,

    #[error("too many options: {len} (maximum {MAX_OPTIONS})")]
    TooManyOptions { len: usize },
}

//
// ─── QUESTION KIND ─────────────────────────────────────────────────────────────
//

/// The three question flavors the bank supports.
///
/// - `Single`: one correct option letter.
/// - `Multi`: a set of correct option letters, submitted all at once.
/// - `Judge`: a true/false statement, presented as options A (true) and B (false).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    Single,
    Multi,
    Judge,
}

impl QuestionKind {
    /// Point value used when a question carries no explicit one.
    #[must_use]
    pub fn default_points(self) -> f64 {
        match self {
            QuestionKind::Single => 0.5,
            QuestionKind::Multi => 1.0,
            QuestionKind::Judge => 1.0,
        }
    }

    /// Short label for display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::Single => "single",
            QuestionKind::Multi => "multi",
            QuestionKind::Judge => "judge",
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One importable question: prompt, answer key, option texts, and metadata.
///
/// The answer key doubles as the type discriminant: its [`AnswerValue`] shape
/// decides whether this is a single-choice, multi-choice, or judgment question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub answer: AnswerValue,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub points: Option<f64>,
}

fn default_difficulty() -> String {
    "medium".to_owned()
}

fn default_category() -> String {
    "uncategorized".to_owned()
}

impl Question {
    /// Create a question with default metadata.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` if the prompt is blank.
    pub fn new(prompt: impl Into<String>, answer: AnswerValue) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        Ok(Self {
            prompt,
            answer,
            options: Vec::new(),
            explanation: String::new(),
            difficulty: default_difficulty(),
            category: default_category(),
            points: None,
        })
    }

    /// Attach option texts (positionally A through H).
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::TooManyOptions` if more than [`MAX_OPTIONS`] are given.
    pub fn with_options(mut self, options: Vec<String>) -> Result<Self, QuestionError> {
        if options.len() > MAX_OPTIONS {
            return Err(QuestionError::TooManyOptions { len: options.len() });
        }
        self.options = options;
        Ok(self)
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.answer.kind()
    }

    /// The score this question is worth, falling back to the kind default.
    #[must_use]
    pub fn effective_points(&self) -> f64 {
        self.points.unwrap_or_else(|| self.kind().default_points())
    }

    /// Option text for a letter, if that option exists and is non-empty.
    #[must_use]
    pub fn option_text(&self, letter: char) -> Option<&str> {
        let slot = (letter.to_ascii_uppercase() as usize).checked_sub('A' as usize)?;
        self.options
            .get(slot)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
