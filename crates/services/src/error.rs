//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;

/// Errors emitted by the importer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("no valid questions found in the input")]
    NoQuestions,

    #[error("malformed import input: {0}")]
    Malformed(String),
}

/// Errors emitted while recording practice answers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("select at least one option before submitting")]
    EmptySelection,

    #[error("the current question is not multiple choice")]
    NotMultipleChoice,
}

/// Errors emitted by the exam lifecycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("the active library has no questions")]
    EmptyLibrary,
}

/// Umbrella error for the `AppServices` facade.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Answer(#[from] AnswerError),

    #[error(transparent)]
    Exam(#[from] ExamError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
