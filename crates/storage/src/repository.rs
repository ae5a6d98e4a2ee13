use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use quiz_core::model::{Question, StudentAccount};
use thiserror::Error;

use crate::format::DecodeError;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed record in {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("refusing to rewrite {target}: {reason}")]
    PartialLoad { target: String, reason: String },

    #[error("connection error: {0}")]
    Connection(String),
}

/// Questions recovered by a load, plus what went wrong along the way.
///
/// A load only fails outright when the source cannot be opened; truncation and mid-read
/// failures are reported here next to the records that were recovered.
#[derive(Debug, Default)]
pub struct LoadedQuestions {
    pub questions: Vec<Question>,
    pub truncated: bool,
    pub interrupted: Option<StorageError>,
}

/// Accounts recovered by a load, plus what was skipped.
///
/// A roster that is not [`complete`](Self::is_complete) must not be written back whole: the
/// skipped records exist only in the stored copy.
#[derive(Debug, Default)]
pub struct LoadedStudents {
    pub students: Vec<StudentAccount>,
    /// Records dropped for lacking a username or password.
    pub incomplete: usize,
    /// The last record had no closing blank line and was skipped.
    pub unterminated_tail: bool,
    pub interrupted: Option<StorageError>,
}

impl LoadedStudents {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.incomplete == 0 && !self.unterminated_tail && self.interrupted.is_none()
    }
}

/// Repository contract for the question bank.
pub trait QuestionRepository: Send + Sync {
    /// Load every question in stored order. A missing source is an empty bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Read` if the source exists but cannot be opened.
    fn load_questions(&self) -> Result<LoadedQuestions, StorageError>;

    /// Replace the stored bank with `questions`, in order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Write` if the rewrite fails.
    fn save_questions(&self, questions: &[Question]) -> Result<(), StorageError>;
}

/// Repository contract for student accounts.
pub trait StudentRepository: Send + Sync {
    /// Load every account in stored order. A missing source is an empty roster.
    ///
    /// A read failure midway is reported in [`LoadedStudents::interrupted`] next to the accounts
    /// recovered before it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Decode` for a malformed score, or `StorageError::Read` if the
    /// source exists but cannot be opened.
    fn load_students(&self) -> Result<LoadedStudents, StorageError>;

    /// Append one account without touching existing records.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Write` if the append fails.
    fn append_student(&self, student: &StudentAccount) -> Result<(), StorageError>;

    /// Replace the stored roster with `students`, in order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Write` if the rewrite fails.
    fn save_students(&self, students: &[StudentAccount]) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
    students: Arc<Mutex<Vec<StudentAccount>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(questions: Vec<Question>) -> Self {
        let repo = Self::new();
        *repo.questions.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = questions;
        repo
    }

    /// Make every subsequent write fail with `StorageError::Write`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self, target: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Write {
                path: PathBuf::from(target),
                source: io::Error::other("writes disabled"),
            });
        }
        Ok(())
    }
}

impl QuestionRepository for InMemoryRepository {
    fn load_questions(&self) -> Result<LoadedQuestions, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(LoadedQuestions {
            questions: guard.clone(),
            ..LoadedQuestions::default()
        })
    }

    fn save_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        self.check_writable("memory:questions")?;
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = questions.to_vec();
        Ok(())
    }
}

impl StudentRepository for InMemoryRepository {
    fn load_students(&self) -> Result<LoadedStudents, StorageError> {
        let guard = self
            .students
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(LoadedStudents {
            students: guard.clone(),
            ..LoadedStudents::default()
        })
    }

    fn append_student(&self, student: &StudentAccount) -> Result<(), StorageError> {
        self.check_writable("memory:students")?;
        let mut guard = self
            .students
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(student.clone());
        Ok(())
    }

    fn save_students(&self, students: &[StudentAccount]) -> Result<(), StorageError> {
        self.check_writable("memory:students")?;
        let mut guard = self
            .students
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = students.to_vec();
        Ok(())
    }
}

/// Aggregates question and student repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub students: Arc<dyn StudentRepository>,
}
