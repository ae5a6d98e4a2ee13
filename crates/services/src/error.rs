//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionError, QuestionId, StudentError};
use storage::StorageError;

/// Errors emitted by `QuestionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionServiceError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error("no question with id {0} in the bank")]
    UnknownQuestion(QuestionId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StudentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudentServiceError {
    #[error(transparent)]
    Student(#[from] StudentError),
    #[error("unknown student slot {0}")]
    UnknownStudent(usize),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by quiz sessions when a transition is not allowed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has not started")]
    NotStarted,
    #[error("quiz already started")]
    AlreadyStarted,
    #[error("no question left to answer")]
    NoPendingQuestion,
    #[error("{remaining} question(s) still unanswered")]
    Unfinished { remaining: usize },
    #[error("quiz already graded")]
    AlreadyGraded,
    #[error("quiz has not been graded")]
    NotGraded,
}
