use std::fmt;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("answer cannot be empty")]
    EmptyAnswer,

    #[error("a multiple choice question needs at least one choice")]
    NoChoices,

    #[error("choice {index} is empty")]
    EmptyChoice { index: usize },

    #[error("{field} must fit on a single line")]
    MultiLine { field: &'static str },
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

/// Discriminant of a [`Question`], doubling as the record type tag on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
}

impl QuestionKind {
    pub const MULTIPLE_CHOICE_TAG: &'static str = "MCQ";
    pub const TRUE_FALSE_TAG: &'static str = "TrueFalse";

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::MultipleChoice => Self::MULTIPLE_CHOICE_TAG,
            Self::TrueFalse => Self::TRUE_FALSE_TAG,
        }
    }

    /// Matches a record tag line exactly (case-sensitive, no trimming).
    #[must_use]
    pub fn from_tag(line: &str) -> Option<Self> {
        match line {
            Self::MULTIPLE_CHOICE_TAG => Some(Self::MultipleChoice),
            Self::TRUE_FALSE_TAG => Some(Self::TrueFalse),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Operator-entered question, validated before it reaches the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub answer: String,
    /// `Some` for multiple choice, `None` for true/false.
    pub choices: Option<Vec<String>>,
}

impl QuestionDraft {
    #[must_use]
    pub fn true_false(text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            answer: answer.into(),
            choices: None,
        }
    }

    #[must_use]
    pub fn multiple_choice(
        text: impl Into<String>,
        choices: Vec<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            answer: answer.into(),
            choices: Some(choices),
        }
    }

    /// Validate the draft into a [`Question`].
    ///
    /// The answer of a multiple choice draft is not required to be one of its choices.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if text, answer or any choice is blank or spans several lines,
    /// or if a multiple choice draft has no choices.
    pub fn validate(self) -> Result<Question, QuestionError> {
        check_line("question text", &self.text, QuestionError::EmptyText)?;
        check_line("answer", &self.answer, QuestionError::EmptyAnswer)?;

        match self.choices {
            None => Ok(Question::true_false(self.text, self.answer)),
            Some(choices) => {
                if choices.is_empty() {
                    return Err(QuestionError::NoChoices);
                }
                for (index, choice) in choices.iter().enumerate() {
                    check_line("choice", choice, QuestionError::EmptyChoice { index })?;
                }
                Ok(Question::multiple_choice(self.text, choices, self.answer))
            }
        }
    }
}

fn check_line(field: &'static str, value: &str, empty: QuestionError) -> Result<(), QuestionError> {
    if value.contains(['\n', '\r']) {
        return Err(QuestionError::MultiLine { field });
    }
    if value.trim().is_empty() {
        return Err(empty);
    }
    Ok(())
}

/// Splits a comma-separated choice list, trimming each entry and dropping blanks.
#[must_use]
pub fn parse_choice_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|choice| !choice.is_empty())
        .map(str::to_owned)
        .collect()
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A quiz question.
///
/// Both variants grade answers the same way: case-insensitive equality with the stored answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    MultipleChoice {
        text: String,
        choices: Vec<String>,
        answer: String,
    },
    TrueFalse {
        text: String,
        answer: String,
    },
}

impl Question {
    /// Builds a multiple choice question without validation (used when decoding records).
    #[must_use]
    pub fn multiple_choice(
        text: impl Into<String>,
        choices: Vec<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self::MultipleChoice {
            text: text.into(),
            choices,
            answer: answer.into(),
        }
    }

    /// Builds a true/false question without validation (used when decoding records).
    #[must_use]
    pub fn true_false(text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self::TrueFalse {
            text: text.into(),
            answer: answer.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            Self::TrueFalse { .. } => QuestionKind::TrueFalse,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::MultipleChoice { text, .. } | Self::TrueFalse { text, .. } => text,
        }
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        match self {
            Self::MultipleChoice { answer, .. } | Self::TrueFalse { answer, .. } => answer,
        }
    }

    /// Choice list for multiple choice questions.
    #[must_use]
    pub fn choices(&self) -> Option<&[String]> {
        match self {
            Self::MultipleChoice { choices, .. } => Some(choices),
            Self::TrueFalse { .. } => None,
        }
    }

    /// Case-insensitive comparison of `candidate` against the stored answer.
    #[must_use]
    pub fn check_answer(&self, candidate: &str) -> bool {
        let answer = self.answer();
        candidate.eq_ignore_ascii_case(answer) || candidate.to_lowercase() == answer.to_lowercase()
    }

    /// False when a multiple choice answer is not among the listed choices.
    ///
    /// Such a question loads fine but can only be answered correctly by typing the stored
    /// answer verbatim.
    #[must_use]
    pub fn answer_is_listed(&self) -> bool {
        match self {
            Self::MultipleChoice {
                choices, answer, ..
            } => choices.iter().any(|choice| choice == answer),
            Self::TrueFalse { .. } => true,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
