use std::fmt;

use chrono::{DateTime, Utc};
use quiz_core::Clock;
use quiz_core::model::Question;

use super::progress::QuizProgress;
use super::view::QuestionView;
use crate::error::QuizError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Lifecycle of a quiz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    NotStarted,
    InProgress,
    Graded,
    Terminal,
}

/// Result of answering one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// 1-based position of the answered question.
    pub number: usize,
    pub given: String,
    pub expected: String,
    pub correct: bool,
}

/// Final `score / total` of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizGrade {
    pub score: usize,
    pub total: usize,
}

impl QuizGrade {
    #[must_use]
    pub fn new(score: usize, total: usize) -> Self {
        Self { score, total }
    }

    /// Score as account points.
    #[must_use]
    pub fn points(&self) -> i32 {
        i32::try_from(self.score).unwrap_or(i32::MAX)
    }
}

impl fmt::Display for QuizGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.score, self.total)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Sequential quiz over a fixed question list.
///
/// Questions are asked in the order given, one at a time, with no skipping or going back.
/// The session never writes anywhere; recording the grade is up to the caller.
pub struct QuizSession {
    questions: Vec<Question>,
    state: QuizState,
    current: usize,
    outcomes: Vec<AnswerOutcome>,
    clock: Clock,
    started_at: Option<DateTime<Utc>>,
    graded_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    #[must_use]
    pub fn new(questions: Vec<Question>, clock: Clock) -> Self {
        Self {
            questions,
            state: QuizState::NotStarted,
            current: 0,
            outcomes: Vec::new(),
            clock,
            started_at: None,
            graded_at: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> QuizState {
        self.state
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn graded_at(&self) -> Option<DateTime<Utc>> {
        self.graded_at
    }

    #[must_use]
    pub fn outcomes(&self) -> &[AnswerOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.correct).count()
    }

    /// Every question has been answered.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.questions.len(),
            answered: self.outcomes.len(),
        }
    }

    /// # Errors
    ///
    /// Returns `QuizError::AlreadyStarted` unless the session is `NotStarted`.
    pub fn start(&mut self) -> Result<(), QuizError> {
        if self.state != QuizState::NotStarted {
            return Err(QuizError::AlreadyStarted);
        }
        self.state = QuizState::InProgress;
        self.started_at = Some(self.clock.now());
        Ok(())
    }

    /// The question awaiting an answer, while the quiz is in progress.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.state == QuizState::InProgress {
            self.questions.get(self.current)
        } else {
            None
        }
    }

    #[must_use]
    pub fn current_view(&self) -> Option<QuestionView> {
        self.current_question()
            .map(|question| QuestionView::new(self.current + 1, question))
    }

    /// Check `input` against the current question and advance.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotStarted` before `start`, `QuizError::AlreadyGraded` after
    /// grading, or `QuizError::NoPendingQuestion` once every question is answered.
    pub fn answer_current(&mut self, input: &str) -> Result<&AnswerOutcome, QuizError> {
        match self.state {
            QuizState::NotStarted => return Err(QuizError::NotStarted),
            QuizState::Graded | QuizState::Terminal => return Err(QuizError::AlreadyGraded),
            QuizState::InProgress => {}
        }
        let Some(question) = self.questions.get(self.current) else {
            return Err(QuizError::NoPendingQuestion);
        };

        let outcome = AnswerOutcome {
            number: self.current + 1,
            given: input.to_owned(),
            expected: question.answer().to_owned(),
            correct: question.check_answer(input),
        };
        self.outcomes.push(outcome);
        self.current += 1;

        self.outcomes.last().ok_or(QuizError::NoPendingQuestion)
    }

    /// Close an in-progress quiz whose questions are all answered.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotStarted`, `QuizError::Unfinished` while questions remain, or
    /// `QuizError::AlreadyGraded`.
    pub fn grade(&mut self) -> Result<QuizGrade, QuizError> {
        match self.state {
            QuizState::NotStarted => return Err(QuizError::NotStarted),
            QuizState::Graded | QuizState::Terminal => return Err(QuizError::AlreadyGraded),
            QuizState::InProgress => {}
        }
        if !self.is_finished() {
            return Err(QuizError::Unfinished {
                remaining: self.questions.len() - self.current,
            });
        }

        self.state = QuizState::Graded;
        self.graded_at = Some(self.clock.now());
        Ok(QuizGrade::new(self.score(), self.questions.len()))
    }

    /// Move a graded quiz to its terminal state, returning the grade once more.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotGraded` unless the quiz is `Graded`.
    pub fn finish(&mut self) -> Result<QuizGrade, QuizError> {
        if self.state != QuizState::Graded {
            return Err(QuizError::NotGraded);
        }
        self.state = QuizState::Terminal;
        Ok(QuizGrade::new(self.score(), self.questions.len()))
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("state", &self.state)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score())
            .field("started_at", &self.started_at)
            .field("graded_at", &self.graded_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
