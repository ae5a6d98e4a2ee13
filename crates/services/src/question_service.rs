use std::sync::Arc;

use quiz_core::model::{Question, QuestionDraft, QuestionId};
use storage::{QuestionRepository, StorageError};
use tracing::{info, warn};

use crate::error::QuestionServiceError;

/// A question together with its in-memory identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionEntry {
    pub id: QuestionId,
    pub question: Question,
}

/// Owns the question bank for the lifetime of the process.
///
/// The repository is read once when the service is built. Every mutation rewrites the whole
/// bank; a failed rewrite is returned to the caller while the in-memory bank keeps the change.
pub struct QuestionService {
    repo: Arc<dyn QuestionRepository>,
    entries: Vec<QuestionEntry>,
    next_id: u64,
    load_warning: Option<StorageError>,
}

impl QuestionService {
    /// Load the bank from `repo`.
    ///
    /// Never fails: if the source cannot be opened or a read breaks off midway, the bank keeps
    /// whatever was recovered and the problem is available from [`Self::load_warning`].
    #[must_use]
    pub fn load(repo: Arc<dyn QuestionRepository>) -> Self {
        let (questions, load_warning) = match repo.load_questions() {
            Ok(loaded) => (loaded.questions, loaded.interrupted),
            Err(err) => {
                warn!(error = %err, "question bank could not be read; starting empty");
                (Vec::new(), Some(err))
            }
        };

        let mut service = Self {
            repo,
            entries: Vec::with_capacity(questions.len()),
            next_id: 1,
            load_warning,
        };
        for question in questions {
            if !question.answer_is_listed() {
                warn!(text = question.text(), "multiple choice answer is not one of its choices");
            }
            service.push(question);
        }
        service
    }

    fn push(&mut self, question: Question) -> QuestionId {
        let id = QuestionId::new(self.next_id);
        self.next_id += 1;
        self.entries.push(QuestionEntry { id, question });
        id
    }

    /// Problem encountered while loading, if any.
    #[must_use]
    pub fn load_warning(&self) -> Option<&StorageError> {
        self.load_warning.as_ref()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn list(&self) -> &[QuestionEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.question)
    }

    /// Owned copy of the questions in bank order, for quiz sessions.
    #[must_use]
    pub fn questions(&self) -> Vec<Question> {
        self.entries
            .iter()
            .map(|entry| entry.question.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a question and rewrite the bank.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Storage` if the rewrite fails; the question stays in the
    /// in-memory bank regardless.
    pub fn add(&mut self, question: Question) -> Result<QuestionId, QuestionServiceError> {
        let id = self.push(question);
        self.save_all()?;
        info!(%id, total = self.entries.len(), "question added");
        Ok(id)
    }

    /// Validate a draft, then [`Self::add`] it.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Question` for invalid drafts (nothing is added), or
    /// `QuestionServiceError::Storage` if the rewrite fails.
    pub fn add_draft(&mut self, draft: QuestionDraft) -> Result<QuestionId, QuestionServiceError> {
        let question = draft.validate()?;
        self.add(question)
    }

    /// Remove the question with identity `id` and rewrite the bank.
    ///
    /// Questions with identical content but a different id are left alone.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::UnknownQuestion` if `id` is not in the bank, or
    /// `QuestionServiceError::Storage` if the rewrite fails (the removal is kept in memory).
    pub fn remove(&mut self, id: QuestionId) -> Result<Question, QuestionServiceError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(QuestionServiceError::UnknownQuestion(id))?;
        let removed = self.entries.remove(index).question;
        self.save_all()?;
        info!(%id, total = self.entries.len(), "question removed");
        Ok(removed)
    }

    /// Rewrite the backing store with the current bank, in order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the repository write fails.
    pub fn save_all(&self) -> Result<(), StorageError> {
        let questions: Vec<Question> = self.questions();
        self.repo.save_questions(&questions)
    }
}
