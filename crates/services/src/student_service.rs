use std::fmt;
use std::sync::Arc;

use quiz_core::model::{StudentAccount, position_by_credentials};
use storage::{StorageError, StudentRepository};
use tracing::{debug, info, warn};

use crate::error::StudentServiceError;
use crate::quiz::QuizGrade;

/// Position of an account in the loaded roster.
///
/// Usernames may repeat, so the slot is what identifies a logged-in student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StudentSlot(usize);

impl StudentSlot {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StudentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-memory roster plus the repository it came from.
///
/// Signups are appended to the repository one record at a time; the roster is only rewritten
/// when scores are persisted, and only if every stored record was loaded.
pub struct StudentService {
    repo: Arc<dyn StudentRepository>,
    students: Vec<StudentAccount>,
    load_warning: Option<StorageError>,
    /// Why a full rewrite would lose stored records, if it would.
    rewrite_blocked: Option<String>,
}

impl StudentService {
    /// Load every account from `repo`.
    ///
    /// A read that breaks off midway keeps the accounts recovered so far; the problem is
    /// available from [`Self::load_warning`].
    ///
    /// # Errors
    ///
    /// Returns `StudentServiceError::Storage` if the roster cannot be opened or decoded.
    pub fn load(repo: Arc<dyn StudentRepository>) -> Result<Self, StudentServiceError> {
        let loaded = repo.load_students()?;
        let rewrite_blocked = if loaded.interrupted.is_some() {
            Some("the stored roster could not be read to the end".to_owned())
        } else if loaded.unterminated_tail {
            Some("the last stored record has no closing blank line".to_owned())
        } else if loaded.incomplete > 0 {
            Some(format!(
                "{} stored record(s) lack a username or password",
                loaded.incomplete
            ))
        } else {
            None
        };
        if let Some(reason) = &rewrite_blocked {
            warn!(reason = %reason, "student roster only partially loaded; rewrites disabled");
        }

        debug!(count = loaded.students.len(), "student roster loaded");
        Ok(Self {
            repo,
            students: loaded.students,
            load_warning: loaded.interrupted,
            rewrite_blocked,
        })
    }

    /// Empty roster over a repository that could not be loaded.
    ///
    /// Signups still append; [`Self::save_all`] refuses to overwrite the stored records.
    #[must_use]
    pub fn unread(repo: Arc<dyn StudentRepository>) -> Self {
        Self {
            repo,
            students: Vec::new(),
            load_warning: None,
            rewrite_blocked: Some("the stored roster could not be loaded".to_owned()),
        }
    }

    /// Problem encountered while reading, if any.
    #[must_use]
    pub fn load_warning(&self) -> Option<&StorageError> {
        self.load_warning.as_ref()
    }

    #[must_use]
    pub fn students(&self) -> &[StudentAccount] {
        &self.students
    }

    #[must_use]
    pub fn account(&self, slot: StudentSlot) -> Option<&StudentAccount> {
        self.students.get(slot.0)
    }

    /// Create an account and append it to the repository.
    ///
    /// Duplicate usernames are accepted.
    ///
    /// # Errors
    ///
    /// Returns `StudentServiceError::Student` for invalid credentials (nothing is stored), or
    /// `StudentServiceError::Storage` if the append fails; the account is still usable for the
    /// rest of the session in that case.
    pub fn signup(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<StudentSlot, StudentServiceError> {
        let account = StudentAccount::new(username, password)?;
        self.students.push(account);
        let slot = StudentSlot(self.students.len() - 1);

        self.repo.append_student(&self.students[slot.0])?;
        info!(username, "student signed up");
        Ok(slot)
    }

    /// First account whose username and password both match exactly.
    #[must_use]
    pub fn login(&self, username: &str, password: &str) -> Option<StudentSlot> {
        position_by_credentials(&self.students, username, password).map(StudentSlot)
    }

    /// Add a quiz grade to the account's score.
    ///
    /// With `persist` unset the new score lives only in memory, matching a plain quiz run; with
    /// it set the whole roster is rewritten.
    ///
    /// # Errors
    ///
    /// Returns `StudentServiceError::UnknownStudent` for a stale slot, or
    /// `StudentServiceError::Storage` if persisting fails.
    pub fn record_grade(
        &mut self,
        slot: StudentSlot,
        grade: &QuizGrade,
        persist: bool,
    ) -> Result<(), StudentServiceError> {
        let account = self
            .students
            .get_mut(slot.0)
            .ok_or(StudentServiceError::UnknownStudent(slot.0))?;
        account.add_score(grade.points());
        debug!(
            username = account.username(),
            score = account.score(),
            persist,
            "quiz grade recorded"
        );

        if persist {
            self.save_all()?;
        }
        Ok(())
    }

    /// Rewrite the repository with the current roster.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::PartialLoad` when the roster was not fully loaded (the rewrite
    /// would drop stored records), or `StorageError` if the repository write fails.
    pub fn save_all(&self) -> Result<(), StorageError> {
        if let Some(reason) = &self.rewrite_blocked {
            return Err(StorageError::PartialLoad {
                target: "student roster".to_owned(),
                reason: reason.clone(),
            });
        }
        self.repo.save_students(&self.students)
    }
}
