#![forbid(unsafe_code)]

pub mod admin;
pub mod error;
pub mod question_service;
pub mod quiz;
pub mod student_service;

pub use quiz_core::Clock;

pub use admin::AdminCredentials;
pub use error::{QuestionServiceError, QuizError, StudentServiceError};
pub use question_service::{QuestionEntry, QuestionService};
pub use quiz::{AnswerOutcome, QuestionView, QuizGrade, QuizProgress, QuizSession, QuizState};
pub use student_service::{StudentService, StudentSlot};
